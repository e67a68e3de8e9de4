//! Common types shared by the maze and the controller.

use serde::{Deserialize, Serialize};

/// Unique identifier for a team.
///
/// Used as the map key for teams and as the winner marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TeamId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Unique identifier for an agent, global across all teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A tile coordinate on the maze grid.
///
/// Signed so that candidate positions off the grid can be expressed
/// and rejected by the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a position from its coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by (dx, dy), or `None` if either
    /// coordinate leaves the `i32` range.
    pub fn checked_offset(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_offset() {
        let p = Position::new(2, 3);
        assert_eq!(p.checked_offset(1, -1), Some(Position::new(3, 2)));
        assert_eq!(p.checked_offset(i32::MAX, 0), None);
        assert_eq!(p.checked_offset(0, i32::MIN), Some(Position::new(2, i32::MIN + 3)));
        assert_eq!(Position::new(-1, 0).checked_offset(i32::MIN, 0), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TeamId(7).to_string(), "7");
        assert_eq!(AgentId(3).to_string(), "3");
        assert_eq!(Position::new(-1, 4).to_string(), "(-1, 4)");
    }
}
