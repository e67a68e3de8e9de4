//! Move sources - the external drivers that propose one step per agent per turn.
//!
//! These are harness drivers only: scripted plans for reproducible
//! scenarios and a seeded random walk for invariant fuzzing. Neither
//! plans paths or reacts to what the agents have seen.

use maze_env::{AgentId, TeamId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, VecDeque};

/// The 8-neighbourhood, clockwise from north.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Proposes moves for agents.
pub trait MoveSource {
    /// The step `agent` should attempt this turn, or `None` to skip it.
    fn next_move(&mut self, turn: u64, team: TeamId, agent: AgentId) -> Option<(i32, i32)>;

    /// Returns the name of this source.
    fn name(&self) -> &str;
}

/// Fixed per-agent move queues.
///
/// Each call pops the next step for that agent; agents without a queue,
/// or whose queue ran dry, skip their turn.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMoves {
    scripts: HashMap<AgentId, VecDeque<(i32, i32)>>,
}

impl ScriptedMoves {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plan for an agent.
    pub fn with_script(mut self, agent: AgentId, steps: impl IntoIterator<Item = (i32, i32)>) -> Self {
        self.scripts.entry(agent).or_default().extend(steps);
        self
    }

    /// Steps not yet handed out, across all agents.
    pub fn remaining(&self) -> usize {
        self.scripts.values().map(VecDeque::len).sum()
    }
}

impl MoveSource for ScriptedMoves {
    fn next_move(&mut self, _turn: u64, _team: TeamId, agent: AgentId) -> Option<(i32, i32)> {
        self.scripts.get_mut(&agent)?.pop_front()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Uniform random steps over the 8-neighbourhood.
///
/// Seeded ChaCha8, so a seed always yields the same sequence for the same
/// sequence of calls.
#[derive(Debug, Clone)]
pub struct RandomWalk {
    rng: ChaCha8Rng,
}

impl RandomWalk {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl MoveSource for RandomWalk {
    fn next_move(&mut self, _turn: u64, _team: TeamId, _agent: AgentId) -> Option<(i32, i32)> {
        Some(DIRECTIONS[self.rng.gen_range(0..DIRECTIONS.len())])
    }

    fn name(&self) -> &str {
        "random_walk"
    }
}
