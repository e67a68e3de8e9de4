//! Teams of agents with pooled vision.

use crate::agent::Agent;

use maze_env::{AgentId, Position, TeamId};
use std::collections::{BTreeMap, HashSet};

/// A group of agents sharing discovered-tile knowledge.
#[derive(Debug, Clone)]
pub struct Team {
    id: TeamId,

    /// Display color, cosmetic only
    color: Option<String>,

    /// Stored for future behavior; no logic reads it yet
    selfishness: f64,

    /// Member agents keyed by id. Agents are never removed.
    agents: BTreeMap<AgentId, Agent>,

    /// Union of every member's discovered tiles
    discovered: HashSet<Position>,
}

impl Team {
    /// Creates an empty team.
    pub fn new(id: TeamId, color: Option<String>, selfishness: f64) -> Self {
        Self {
            id,
            color,
            selfishness,
            agents: BTreeMap::new(),
            discovered: HashSet::new(),
        }
    }

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn selfishness(&self) -> f64 {
        self.selfishness
    }

    /// Member agents in ascending id order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub(crate) fn agents_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.values_mut()
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Adds an agent keyed by its id.
    ///
    /// An agent already registered under the same id is replaced.
    pub fn add_agent(&mut self, agent: Agent) {
        self.agents.insert(agent.id(), agent);
    }

    /// True if any member stands on `pos`.
    pub fn occupies(&self, pos: Position) -> bool {
        self.agents.values().any(|a| a.position() == pos)
    }

    /// Pools the members' discoveries and hands the union back to each member.
    ///
    /// Returns the number of tiles new to the team set.
    pub fn share_vision(&mut self) -> usize {
        let before = self.discovered.len();
        for agent in self.agents.values() {
            self.discovered.extend(agent.discovered_tiles().iter().copied());
        }

        for agent in self.agents.values_mut() {
            agent.update_discovered_tiles(self.discovered.iter().copied());
        }

        self.discovered.len() - before
    }

    /// True iff any member has latched the goal flag.
    pub fn has_won(&self) -> bool {
        self.agents.values().any(Agent::has_reached_goal)
    }

    /// Current position of every member.
    pub fn get_agent_positions(&self) -> BTreeMap<AgentId, Position> {
        self.agents
            .iter()
            .map(|(id, agent)| (*id, agent.position()))
            .collect()
    }

    /// Team-level shared knowledge.
    pub fn get_discovered_tiles(&self) -> &HashSet<Position> {
        &self.discovered
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Team {} ({}): {} agents, {} tiles discovered",
            self.id,
            self.color.as_deref().unwrap_or("no color"),
            self.agents.len(),
            self.discovered.len()
        )
    }
}
