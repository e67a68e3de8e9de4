//! The maze collaborator interface consumed by the game controller.

use crate::types::{Position, TeamId};
use std::collections::HashSet;

/// Optional features a maze declares up front.
///
/// The controller reads these once at construction instead of probing
/// the maze on every turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MazeCapabilities {
    /// The maze has time-varying walls advanced by `update_dynamic_walls`.
    pub dynamic_walls: bool,
}

impl MazeCapabilities {
    /// A static maze with no optional features.
    pub const STATIC: Self = Self { dynamic_walls: false };

    /// A maze whose walls change between turns.
    pub const DYNAMIC: Self = Self { dynamic_walls: true };
}

/// The interface a maze exposes to the controller.
///
/// Wall layout, bounds and line-of-sight geometry all live behind this
/// trait; the controller never inspects the grid directly.
///
/// # Implementations
///
/// - `GridMaze` - static grid parsed from an ASCII layout
/// - `ShiftingMaze` - grid whose walls toggle from a seeded RNG each turn
pub trait MazeEnvironment {
    /// Start coordinates per team, in table order.
    ///
    /// Consulted once when the controller initializes its teams.
    fn start_positions(&self) -> &[(TeamId, Vec<Position>)];

    /// True iff `pos` is in bounds and not blocked by a wall.
    fn is_valid_move(&self, pos: Position) -> bool;

    /// Tiles visible from `pos` with the given vision radius.
    fn get_visible_tiles(&self, pos: Position, vision_range: u32) -> HashSet<Position>;

    /// The goal tile, if this maze has one.
    ///
    /// Without a goal no win condition is ever evaluated.
    fn goal_position(&self) -> Option<Position>;

    /// Optional features supported by this maze.
    fn capabilities(&self) -> MazeCapabilities {
        MazeCapabilities::STATIC
    }

    /// Advances time-varying maze state.
    ///
    /// Only called when `capabilities().dynamic_walls` is set.
    fn update_dynamic_walls(&mut self) {}
}

impl<M: MazeEnvironment + ?Sized> MazeEnvironment for &mut M {
    fn start_positions(&self) -> &[(TeamId, Vec<Position>)] {
        (**self).start_positions()
    }

    fn is_valid_move(&self, pos: Position) -> bool {
        (**self).is_valid_move(pos)
    }

    fn get_visible_tiles(&self, pos: Position, vision_range: u32) -> HashSet<Position> {
        (**self).get_visible_tiles(pos, vision_range)
    }

    fn goal_position(&self) -> Option<Position> {
        (**self).goal_position()
    }

    fn capabilities(&self) -> MazeCapabilities {
        (**self).capabilities()
    }

    fn update_dynamic_walls(&mut self) {
        (**self).update_dynamic_walls()
    }
}

impl<M: MazeEnvironment + ?Sized> MazeEnvironment for Box<M> {
    fn start_positions(&self) -> &[(TeamId, Vec<Position>)] {
        (**self).start_positions()
    }

    fn is_valid_move(&self, pos: Position) -> bool {
        (**self).is_valid_move(pos)
    }

    fn get_visible_tiles(&self, pos: Position, vision_range: u32) -> HashSet<Position> {
        (**self).get_visible_tiles(pos, vision_range)
    }

    fn goal_position(&self) -> Option<Position> {
        (**self).goal_position()
    }

    fn capabilities(&self) -> MazeCapabilities {
        (**self).capabilities()
    }

    fn update_dynamic_walls(&mut self) {
        (**self).update_dynamic_walls()
    }
}
