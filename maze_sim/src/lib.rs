//! Deterministic simulation harness for the maze controller.
//!
//! Drives a [`maze_core::GameController`] through whole games with
//! scripted or seeded-random moves, and checks the game's invariants
//! from the outside after every turn.
//!
//! # Core Principle: One Seed
//!
//! Every source of randomness (move choice, shifting walls) is derived
//! from a single 64-bit seed, so any failing run can be replayed exactly.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                      SimWorld                        │
//! │  ┌────────────┐   proposals   ┌──────────────────┐   │
//! │  │ MoveSource │──────────────►│  GameController  │   │
//! │  │ (scripted/ │               │   teams, agents  │   │
//! │  │  random)   │               │        │         │   │
//! │  └────────────┘               │  ┌─────▼──────┐  │   │
//! │                               │  │ MazeEnv    │  │   │
//! │                               │  └────────────┘  │   │
//! │                               └────────┬─────────┘   │
//! │                                        │ after update │
//! │                               ┌────────▼─────────┐   │
//! │                               │ InvariantOracle  │   │
//! │                               └──────────────────┘   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use maze_sim::{ScenarioRunner, ScenarioId};
//!
//! let result = ScenarioRunner::new(42).run(ScenarioId::Diagonal);
//! assert!(result.passed);
//! ```

mod exporter;
mod moves;
mod oracle;
mod runner;
mod world;
pub mod scenarios;

pub use exporter::{SimEvent, SimExport, SimFrame};
pub use moves::{MoveSource, RandomWalk, ScriptedMoves, DIRECTIONS};
pub use oracle::{InvariantOracle, Violation};
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use scenarios::ScenarioId;
pub use world::{SimConfig, SimMaze, SimWorld, TurnReport, TEAM_COLORS};
