//! Invariant oracle for simulation.
//!
//! The oracle watches a controller from the outside after every turn and
//! records any breach of the game's invariants:
//! - Discovered tiles (per agent and per team) only grow
//! - No two teams share a tile
//! - Game over never reverts and the winner never changes
//! - The turn counter never goes backwards

use maze_core::GameController;
use maze_env::{AgentId, MazeEnvironment, Position, TeamId};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// A broken invariant, tagged with the turn it was observed on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("turn {turn}: agent {agent} forgot discovered tiles")]
    AgentKnowledgeShrank { turn: u64, agent: AgentId },

    #[error("turn {turn}: team {team} forgot discovered tiles")]
    TeamKnowledgeShrank { turn: u64, team: TeamId },

    #[error("turn {turn}: teams {first} and {second} share tile {position}")]
    SharedTile {
        turn: u64,
        position: Position,
        first: TeamId,
        second: TeamId,
    },

    #[error("turn {turn}: game over was reverted")]
    GameOverReverted { turn: u64 },

    #[error("turn {turn}: winner changed from {before:?} to {after:?}")]
    WinnerChanged {
        turn: u64,
        before: Option<TeamId>,
        after: Option<TeamId>,
    },

    #[error("turn went backwards from {before} to {after}")]
    TurnRegressed { before: u64, after: u64 },
}

/// The Oracle - remembers the last observation and checks the next one against it.
#[derive(Debug, Default)]
pub struct InvariantOracle {
    agent_tiles: HashMap<AgentId, HashSet<Position>>,
    team_tiles: HashMap<TeamId, HashSet<Position>>,
    last_turn: u64,
    game_over: bool,
    winner: Option<TeamId>,
    observations: u64,
    violations: Vec<Violation>,
}

impl InvariantOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the controller's current state and remembers it.
    pub fn observe<M: MazeEnvironment>(&mut self, game: &GameController<M>) {
        let turn = game.turn();

        if turn < self.last_turn {
            self.violations.push(Violation::TurnRegressed {
                before: self.last_turn,
                after: turn,
            });
        }

        let mut occupied: HashMap<Position, TeamId> = HashMap::new();
        for team in game.teams() {
            let tiles = team.get_discovered_tiles();
            if let Some(previous) = self.team_tiles.get(&team.id()) {
                if !previous.is_subset(tiles) {
                    self.violations.push(Violation::TeamKnowledgeShrank { turn, team: team.id() });
                }
            }
            self.team_tiles.insert(team.id(), tiles.clone());

            for agent in team.agents() {
                let tiles = agent.discovered_tiles();
                if let Some(previous) = self.agent_tiles.get(&agent.id()) {
                    if !previous.is_subset(tiles) {
                        self.violations.push(Violation::AgentKnowledgeShrank { turn, agent: agent.id() });
                    }
                }
                self.agent_tiles.insert(agent.id(), tiles.clone());

                match occupied.get(&agent.position()) {
                    Some(&other) if other != team.id() => {
                        self.violations.push(Violation::SharedTile {
                            turn,
                            position: agent.position(),
                            first: other,
                            second: team.id(),
                        });
                    }
                    _ => {
                        occupied.insert(agent.position(), team.id());
                    }
                }
            }
        }

        if self.game_over {
            if !game.is_game_over() {
                self.violations.push(Violation::GameOverReverted { turn });
            }
            if game.winning_team() != self.winner {
                self.violations.push(Violation::WinnerChanged {
                    turn,
                    before: self.winner,
                    after: game.winning_team(),
                });
            }
        }

        self.last_turn = turn;
        self.game_over |= game.is_game_over();
        if self.winner.is_none() {
            self.winner = game.winning_team();
        }
        self.observations += 1;
    }

    /// True if nothing has been violated so far.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Number of `observe` calls.
    pub fn observations(&self) -> u64 {
        self.observations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::ControllerConfig;
    use maze_env::GridMaze;

    fn game() -> GameController<GridMaze> {
        let maze = GridMaze::open(5, 5)
            .with_start(TeamId(0), Position::new(0, 0))
            .with_start(TeamId(1), Position::new(4, 4))
            .with_goal(Position::new(2, 2));
        let mut game = GameController::with_config(maze, ControllerConfig::default().with_vision_range(1));
        game.initialize_teams();
        game
    }

    #[test]
    fn test_clean_game() {
        let mut oracle = InvariantOracle::new();
        let mut game = game();
        oracle.observe(&game);

        game.move_agent(AgentId(0), TeamId(0), 1, 1);
        game.update();
        oracle.observe(&game);
        game.move_agent(AgentId(0), TeamId(0), 1, 1);
        game.update();
        oracle.observe(&game);
        game.update();
        oracle.observe(&game);

        assert!(oracle.is_clean(), "{:?}", oracle.violations());
        assert_eq!(oracle.observations(), 4);
    }

    #[test]
    fn test_detects_shrinking_knowledge() {
        let mut oracle = InvariantOracle::new();
        let mut moved = game();
        moved.move_agent(AgentId(0), TeamId(0), 1, 1);
        moved.update();
        oracle.observe(&moved);

        // A fresh game has strictly less knowledge
        oracle.observe(&game());

        assert!(oracle
            .violations()
            .iter()
            .any(|v| matches!(v, Violation::AgentKnowledgeShrank { agent: AgentId(0), .. })));
        assert!(oracle
            .violations()
            .iter()
            .any(|v| matches!(v, Violation::TeamKnowledgeShrank { team: TeamId(0), .. })));
        assert!(oracle
            .violations()
            .iter()
            .any(|v| matches!(v, Violation::TurnRegressed { before: 1, after: 0 })));
    }

    #[test]
    fn test_detects_reverted_game_over() {
        let mut oracle = InvariantOracle::new();
        let mut finished = game();
        finished.move_agent(AgentId(0), TeamId(0), 1, 1);
        finished.move_agent(AgentId(0), TeamId(0), 1, 1);
        finished.update();
        oracle.observe(&finished);

        let mut running = game();
        running.update();
        oracle.observe(&running);

        assert!(oracle
            .violations()
            .iter()
            .any(|v| matches!(v, Violation::GameOverReverted { .. })));
        assert!(oracle.violations().iter().any(|v| matches!(
            v,
            Violation::WinnerChanged { before: Some(TeamId(0)), after: None, .. }
        )));
    }

    #[test]
    fn test_detects_shared_tile() {
        // Malformed start table puts both teams on one tile
        let maze = GridMaze::open(3, 3)
            .with_start(TeamId(0), Position::new(1, 1))
            .with_start(TeamId(1), Position::new(1, 1));
        let mut game = GameController::new(maze);
        game.initialize_teams();

        let mut oracle = InvariantOracle::new();
        oracle.observe(&game);

        assert_eq!(
            oracle.violations(),
            &[Violation::SharedTile {
                turn: 0,
                position: Position::new(1, 1),
                first: TeamId(0),
                second: TeamId(1),
            }]
        );
    }
}
