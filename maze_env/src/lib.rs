//! Maze Environment Abstraction Layer
//!
//! This crate defines the narrow interface through which the game controller
//! consults the maze, plus two reference implementations used by the
//! simulation harness and tests.
//!
//! # Core Concept: The Collaborator
//!
//! The controller never looks at walls directly. Everything it needs is
//! behind `MazeEnvironment`:
//! - Start table (`start_positions()`)
//! - Move legality (`is_valid_move()`)
//! - Line of sight (`get_visible_tiles()`)
//! - Win tile (`goal_position()`)
//! - Optional time-varying walls, declared via `capabilities()`
//!
//! # Example
//!
//! ```
//! use maze_env::{GridMaze, MazeEnvironment, Position};
//!
//! let maze = GridMaze::parse("0.#\n..G\n").unwrap();
//! assert!(maze.is_valid_move(Position::new(1, 0)));
//! assert!(!maze.is_valid_move(Position::new(2, 0)));
//! assert_eq!(maze.goal_position(), Some(Position::new(2, 1)));
//! ```

mod error;
mod grid;
mod maze;
mod shifting;
mod types;

pub use error::MazeError;
pub use grid::GridMaze;
pub use maze::{MazeCapabilities, MazeEnvironment};
pub use shifting::ShiftingMaze;
pub use types::{AgentId, Position, TeamId};
