//! Maze Core - Turn-based multi-team maze controller
//!
//! Teams of agents move through a grid maze, pool what they have seen
//! (shared fog of war), and the game ends when an agent reaches the goal:
//! 1. **Agents** compute candidate steps and remember every tile they saw
//! 2. **Teams** share vision between members and report a win via a latched flag
//! 3. **GameController** validates moves, runs the turn cycle and snapshots state
//!
//! The maze itself (walls, bounds, line of sight) is consumed through
//! `maze_env::MazeEnvironment`.

pub mod agent;
pub mod config;
pub mod controller;
pub mod error;
pub mod state;
pub mod team;

// Re-export key types for convenience
pub use agent::Agent;
pub use config::ControllerConfig;
pub use controller::{GameController, GamePhase};
pub use error::MoveError;
pub use state::{GameState, TeamState};
pub use team::Team;
