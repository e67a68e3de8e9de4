//! Read-only snapshots of a game for presentation layers.

use maze_env::{AgentId, Position, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Per-team part of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamState {
    pub agent_positions: BTreeMap<AgentId, Position>,

    /// Shared discovered tiles, in no particular order
    pub discovered_tiles: Vec<Position>,
}

impl TeamState {
    /// The discovered tiles as a set.
    pub fn discovered_set(&self) -> HashSet<Position> {
        self.discovered_tiles.iter().copied().collect()
    }
}

/// Snapshot of the whole game returned by `GameController::get_game_state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub turn: u64,
    pub teams: BTreeMap<TeamId, TeamState>,
    pub game_over: bool,
    pub winning_team: Option<TeamId>,
}

impl GameState {
    /// Structural equality that ignores the order of discovered tiles.
    pub fn equivalent(&self, other: &GameState) -> bool {
        self.turn == other.turn
            && self.game_over == other.game_over
            && self.winning_team == other.winning_team
            && self.teams.len() == other.teams.len()
            && self.teams.iter().all(|(id, team)| {
                other.teams.get(id).is_some_and(|o| {
                    team.agent_positions == o.agent_positions
                        && team.discovered_set() == o.discovered_set()
                })
            })
    }

    /// Serializes the snapshot as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(tiles: Vec<Position>) -> GameState {
        let mut teams = BTreeMap::new();
        teams.insert(
            TeamId(0),
            TeamState {
                agent_positions: BTreeMap::from([(AgentId(0), Position::new(1, 1))]),
                discovered_tiles: tiles,
            },
        );
        GameState {
            turn: 3,
            teams,
            game_over: false,
            winning_team: None,
        }
    }

    #[test]
    fn test_equivalent_ignores_tile_order() {
        let a = state(vec![Position::new(0, 0), Position::new(1, 1)]);
        let b = state(vec![Position::new(1, 1), Position::new(0, 0)]);

        assert_ne!(a, b);
        assert!(a.equivalent(&b));
    }

    #[test]
    fn test_equivalent_detects_differences() {
        let a = state(vec![Position::new(0, 0)]);
        let mut b = state(vec![Position::new(0, 0)]);
        b.turn = 4;
        assert!(!a.equivalent(&b));

        let c = state(vec![Position::new(2, 2)]);
        assert!(!a.equivalent(&c));
    }

    #[test]
    fn test_json_shape() {
        let json = state(vec![Position::new(0, 0)]).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["turn"], 3);
        assert_eq!(value["game_over"], false);
        assert!(value["winning_team"].is_null());
        assert_eq!(value["teams"]["0"]["agent_positions"]["0"]["x"], 1);
        assert_eq!(value["teams"]["0"]["discovered_tiles"][0]["y"], 0);
    }
}
