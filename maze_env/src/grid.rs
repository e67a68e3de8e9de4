//! Static grid maze parsed from an ASCII layout.
//!
//! Layout characters:
//! - `#` wall
//! - `.` floor
//! - `G` goal (floor)
//! - `0`-`9` start tile for the team with that id (floor)

use crate::error::MazeError;
use crate::maze::MazeEnvironment;
use crate::types::{Position, TeamId};

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// A rectangular maze with static walls.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMaze {
    width: usize,
    height: usize,

    /// Row-major wall flags
    walls: Vec<bool>,

    goal: Option<Position>,

    /// Start table, in team order
    starts: Vec<(TeamId, Vec<Position>)>,
}

impl GridMaze {
    /// Creates an open maze with no walls, starts or goal.
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            walls: vec![false; width * height],
            goal: None,
            starts: Vec::new(),
        }
    }

    /// Parses an ASCII layout.
    ///
    /// Blank lines are skipped and trailing whitespace is ignored. Start
    /// tiles are grouped by team id (ascending), each team's starts in
    /// row-major order.
    pub fn parse(layout: &str) -> Result<Self, MazeError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();

        let width = rows.first().ok_or(MazeError::EmptyLayout)?.chars().count();
        let mut maze = Self::open(width, rows.len());
        let mut starts: BTreeMap<TeamId, Vec<Position>> = BTreeMap::new();

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(MazeError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, ch) in row.chars().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                match ch {
                    '#' => maze.walls[y * width + x] = true,
                    '.' => {}
                    'G' => {
                        if maze.goal.replace(pos).is_some() {
                            return Err(MazeError::DuplicateGoal);
                        }
                    }
                    c if c.is_ascii_digit() => {
                        let team = TeamId(c.to_digit(10).unwrap_or_default());
                        starts.entry(team).or_default().push(pos);
                    }
                    other => return Err(MazeError::unknown_tile(y, x, other)),
                }
            }
        }

        maze.starts = starts.into_iter().collect();
        Ok(maze)
    }

    /// Reads and parses a layout file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MazeError> {
        let layout = std::fs::read_to_string(path)?;
        Self::parse(&layout)
    }

    /// Sets the goal tile.
    pub fn with_goal(mut self, goal: Position) -> Self {
        self.goal = Some(goal);
        self
    }

    /// Appends a start tile for a team.
    ///
    /// Teams appear in the start table in the order they were first added.
    pub fn with_start(mut self, team: TeamId, pos: Position) -> Self {
        match self.starts.iter_mut().find(|(id, _)| *id == team) {
            Some((_, positions)) => positions.push(pos),
            None => self.starts.push((team, vec![pos])),
        }
        self
    }

    /// Builder form of `set_wall`.
    pub fn with_wall(mut self, pos: Position) -> Self {
        self.set_wall(pos, true);
        self
    }

    /// Sets or clears a wall. Returns false if `pos` is out of bounds.
    pub fn set_wall(&mut self, pos: Position, wall: bool) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.walls[i] = wall;
                true
            }
            None => false,
        }
    }

    /// Grid width in tiles.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in tiles.
    pub fn height(&self) -> usize {
        self.height
    }

    /// True if `pos` lies on the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// True if `pos` is on the grid and walled.
    pub fn is_wall(&self, pos: Position) -> bool {
        self.index(pos).map(|i| self.walls[i]).unwrap_or(false)
    }

    /// Number of walled tiles.
    pub fn wall_count(&self) -> usize {
        self.walls.iter().filter(|w| **w).count()
    }

    /// True if any start table entry is at `pos`.
    pub fn is_start(&self, pos: Position) -> bool {
        self.starts
            .iter()
            .any(|(_, positions)| positions.contains(&pos))
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Position::new(x as i32, y as i32))
        })
    }

    /// Renders the maze back to its ASCII layout.
    ///
    /// Teams with ids above 9 have no layout character and render as floor.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x as i32, y as i32);
                let ch = if self.is_wall(pos) {
                    '#'
                } else if self.goal == Some(pos) {
                    'G'
                } else {
                    self.starts
                        .iter()
                        .find(|(_, positions)| positions.contains(&pos))
                        .and_then(|(team, _)| char::from_digit(team.0, 10))
                        .unwrap_or('.')
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }

    /// True if no wall sits strictly between `from` and `to`.
    ///
    /// Walks a Bresenham line from `to` back to `from`; the endpoints
    /// themselves never block. Each step is monotone on both axes, so the
    /// walk stops as soon as it heads away from the grid.
    pub fn line_of_sight(&self, from: Position, to: Position) -> bool {
        let (fx, fy) = (i64::from(from.x), i64::from(from.y));
        let (mut x, mut y) = (i64::from(to.x), i64::from(to.y));
        let (width, height) = (self.width as i64, self.height as i64);

        let dx = (fx - x).abs();
        let dy = -(fy - y).abs();
        let sx = if x < fx { 1 } else { -1 };
        let sy = if y < fy { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if x == fx && y == fy {
                return true;
            }
            let leaving = (x < 0 && sx < 0) || (x >= width && sx > 0) || (y < 0 && sy < 0) || (y >= height && sy > 0);
            if leaving {
                return true;
            }
            // Between two i32 endpoints, so the casts are lossless
            let current = Position::new(x as i32, y as i32);
            if current != to && self.is_wall(current) {
                return false;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }
}

impl MazeEnvironment for GridMaze {
    fn start_positions(&self) -> &[(TeamId, Vec<Position>)] {
        &self.starts
    }

    fn is_valid_move(&self, pos: Position) -> bool {
        self.in_bounds(pos) && !self.is_wall(pos)
    }

    /// Square (Chebyshev) neighbourhood clipped to the grid, minus tiles
    /// hidden behind walls. Walls themselves are visible.
    fn get_visible_tiles(&self, pos: Position, vision_range: u32) -> HashSet<Position> {
        let mut visible = HashSet::new();
        if self.width == 0 || self.height == 0 {
            return visible;
        }

        let r = i32::try_from(vision_range).unwrap_or(i32::MAX);
        let max_x = self.width as i32 - 1;
        let max_y = self.height as i32 - 1;

        for y in pos.y.saturating_sub(r).max(0)..=pos.y.saturating_add(r).min(max_y) {
            for x in pos.x.saturating_sub(r).max(0)..=pos.x.saturating_add(r).min(max_x) {
                let tile = Position::new(x, y);
                if self.line_of_sight(pos, tile) {
                    visible.insert(tile);
                }
            }
        }

        visible
    }

    fn goal_position(&self) -> Option<Position> {
        self.goal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = "
0..#.
.#.#.
..G..
.#.#.
.#..1
";

    #[test]
    fn test_parse_layout() {
        let maze = GridMaze::parse(LAYOUT).unwrap();

        assert_eq!(maze.width(), 5);
        assert_eq!(maze.height(), 5);
        assert_eq!(maze.goal_position(), Some(Position::new(2, 2)));
        assert_eq!(
            maze.start_positions(),
            &[
                (TeamId(0), vec![Position::new(0, 0)]),
                (TeamId(1), vec![Position::new(4, 4)]),
            ]
        );
        assert!(maze.is_wall(Position::new(3, 0)));
        assert_eq!(maze.wall_count(), 6);
    }

    #[test]
    fn test_render_matches_layout() {
        let maze = GridMaze::parse(LAYOUT).unwrap();
        assert_eq!(maze.render(), LAYOUT.trim_start());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(GridMaze::parse("\n\n"), Err(MazeError::EmptyLayout)));
        assert!(matches!(
            GridMaze::parse("...\n..\n"),
            Err(MazeError::RaggedRow { row: 1, expected: 3, found: 2 })
        ));
        assert!(matches!(
            GridMaze::parse("..x\n"),
            Err(MazeError::UnknownTile { row: 0, col: 2, ch: 'x' })
        ));
        assert!(matches!(GridMaze::parse("G.G\n"), Err(MazeError::DuplicateGoal)));
    }

    #[test]
    fn test_valid_moves() {
        let maze = GridMaze::parse(LAYOUT).unwrap();

        assert!(maze.is_valid_move(Position::new(1, 0)));
        assert!(!maze.is_valid_move(Position::new(3, 0))); // wall
        assert!(!maze.is_valid_move(Position::new(-1, 0)));
        assert!(!maze.is_valid_move(Position::new(5, 0)));
        assert!(!maze.is_valid_move(Position::new(0, 5)));
    }

    #[test]
    fn test_visibility_clipped_to_grid() {
        let maze = GridMaze::open(5, 5);

        let corner = maze.get_visible_tiles(Position::new(0, 0), 1);
        assert_eq!(corner.len(), 4);

        let center = maze.get_visible_tiles(Position::new(2, 2), 1);
        assert_eq!(center.len(), 9);

        let everything = maze.get_visible_tiles(Position::new(2, 2), 10);
        assert_eq!(everything.len(), 25);
    }

    #[test]
    fn test_walls_block_sight() {
        // Viewer at (0, 1) looking right through a wall at (1, 1)
        let maze = GridMaze::open(4, 3).with_wall(Position::new(1, 1));
        let visible = maze.get_visible_tiles(Position::new(0, 1), 3);

        assert!(visible.contains(&Position::new(1, 1))); // the wall itself
        assert!(!visible.contains(&Position::new(2, 1)));
        assert!(!visible.contains(&Position::new(3, 1)));
        assert!(visible.contains(&Position::new(0, 0)));
    }

    #[test]
    fn test_far_viewer_sees_without_overflow() {
        let maze = GridMaze::open(1, 1);
        let visible = maze.get_visible_tiles(Position::new(-2_000_000_000, 0), u32::MAX);
        assert_eq!(visible, HashSet::from([Position::new(0, 0)]));

        let walled = GridMaze::open(3, 1).with_wall(Position::new(1, 0));
        let corner = Position::new(i32::MIN, i32::MIN);
        assert!(walled.line_of_sight(corner, Position::new(0, 0)));
        assert!(!walled.line_of_sight(Position::new(i32::MAX, 0), Position::new(0, 0)));
    }

    #[test]
    fn test_builder_start_order() {
        let maze = GridMaze::open(3, 3)
            .with_start(TeamId(5), Position::new(0, 0))
            .with_start(TeamId(2), Position::new(2, 2))
            .with_start(TeamId(5), Position::new(1, 0));

        let teams: Vec<TeamId> = maze.start_positions().iter().map(|(t, _)| *t).collect();
        assert_eq!(teams, vec![TeamId(5), TeamId(2)]);
        assert_eq!(maze.start_positions()[0].1.len(), 2);
        assert!(maze.is_start(Position::new(1, 0)));
    }
}
