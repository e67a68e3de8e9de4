//! Grid maze with walls that shift between turns.

use crate::grid::GridMaze;
use crate::maze::{MazeCapabilities, MazeEnvironment};
use crate::types::{Position, TeamId};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// A `GridMaze` whose walls toggle on every `update_dynamic_walls` call.
///
/// Each update flips `flips_per_turn` tiles picked by a seeded ChaCha8 RNG,
/// so the same seed always produces the same wall history. Start tiles and
/// the goal are never walled. Agents standing on a tile that becomes a wall
/// are not displaced.
#[derive(Debug, Clone)]
pub struct ShiftingMaze {
    grid: GridMaze,

    rng: ChaCha8Rng,

    /// Tiles eligible for toggling
    candidates: Vec<Position>,

    flips_per_turn: usize,

    /// Number of updates applied so far
    generation: u64,
}

impl ShiftingMaze {
    /// Wraps a grid with the given seed and flip count.
    pub fn new(grid: GridMaze, seed: u64, flips_per_turn: usize) -> Self {
        let goal = grid.goal_position();
        let candidates = grid
            .tiles()
            .filter(|pos| Some(*pos) != goal && !grid.is_start(*pos))
            .collect();

        Self {
            grid,
            rng: ChaCha8Rng::seed_from_u64(seed),
            candidates,
            flips_per_turn,
            generation: 0,
        }
    }

    /// The current wall layout.
    pub fn grid(&self) -> &GridMaze {
        &self.grid
    }

    /// Number of wall updates applied.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl MazeEnvironment for ShiftingMaze {
    fn start_positions(&self) -> &[(TeamId, Vec<Position>)] {
        self.grid.start_positions()
    }

    fn is_valid_move(&self, pos: Position) -> bool {
        self.grid.is_valid_move(pos)
    }

    fn get_visible_tiles(&self, pos: Position, vision_range: u32) -> HashSet<Position> {
        self.grid.get_visible_tiles(pos, vision_range)
    }

    fn goal_position(&self) -> Option<Position> {
        self.grid.goal_position()
    }

    fn capabilities(&self) -> MazeCapabilities {
        MazeCapabilities::DYNAMIC
    }

    fn update_dynamic_walls(&mut self) {
        self.generation += 1;
        if self.candidates.is_empty() {
            return;
        }

        for _ in 0..self.flips_per_turn {
            let pos = self.candidates[self.rng.gen_range(0..self.candidates.len())];
            let walled = self.grid.is_wall(pos);
            self.grid.set_wall(pos, !walled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> GridMaze {
        GridMaze::open(6, 6)
            .with_start(TeamId(0), Position::new(0, 0))
            .with_start(TeamId(1), Position::new(5, 5))
            .with_goal(Position::new(3, 3))
    }

    #[test]
    fn test_declares_dynamic_capability() {
        let maze = ShiftingMaze::new(base(), 42, 3);
        assert!(maze.capabilities().dynamic_walls);
        assert!(!base().capabilities().dynamic_walls);
    }

    #[test]
    fn test_deterministic_per_seed() {
        let mut a = ShiftingMaze::new(base(), 7, 4);
        let mut b = ShiftingMaze::new(base(), 7, 4);

        for _ in 0..10 {
            a.update_dynamic_walls();
            b.update_dynamic_walls();
            assert_eq!(a.grid(), b.grid());
        }
        assert_eq!(a.generation(), 10);
    }

    #[test]
    fn test_never_walls_starts_or_goal() {
        let mut maze = ShiftingMaze::new(base(), 99, 10);

        for _ in 0..50 {
            maze.update_dynamic_walls();
            assert!(maze.is_valid_move(Position::new(0, 0)));
            assert!(maze.is_valid_move(Position::new(5, 5)));
            assert!(maze.is_valid_move(Position::new(3, 3)));
        }
    }

    #[test]
    fn test_walls_actually_change() {
        let mut maze = ShiftingMaze::new(base(), 1, 1);
        maze.update_dynamic_walls();
        // One flip on an open grid always adds exactly one wall
        assert_eq!(maze.grid().wall_count(), 1);
    }
}
