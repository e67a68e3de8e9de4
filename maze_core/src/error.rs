//! Diagnostics for rejected moves.

use maze_env::{AgentId, Position, TeamId};
use thiserror::Error;

/// Why the controller refused a move.
///
/// `GameController::move_agent` collapses all of these to `false`;
/// `try_move_agent` exposes them for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// No team registered under this id
    #[error("Unknown team: {0}")]
    UnknownTeam(TeamId),

    /// The team has no agent with this id
    #[error("Team {team} has no agent {agent}")]
    UnknownAgent { team: TeamId, agent: AgentId },

    /// The step leaves the coordinate range entirely
    #[error("Move ({dx}, {dy}) from {position} is out of range")]
    OutOfRange { position: Position, dx: i32, dy: i32 },

    /// The maze rejected the destination (wall or out of bounds)
    #[error("Illegal destination {0}")]
    IllegalDestination(Position),

    /// An agent of another team stands on the destination
    #[error("Tile {position} occupied by team {occupant}")]
    TileOccupied { position: Position, occupant: TeamId },
}

impl MoveError {
    /// Short label for counters and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            MoveError::UnknownTeam(_) => "unknown_team",
            MoveError::UnknownAgent { .. } => "unknown_agent",
            MoveError::OutOfRange { .. } => "out_of_range",
            MoveError::IllegalDestination(_) => "illegal_destination",
            MoveError::TileOccupied { .. } => "tile_occupied",
        }
    }
}
