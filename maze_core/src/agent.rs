//! A single movable agent and its private view of the maze.

use maze_env::{AgentId, Position, TeamId};
use std::collections::HashSet;

/// An agent belonging to exactly one team.
///
/// Position changes are unchecked here; legality is decided by the
/// controller and the maze before `update_position` is called.
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    team_id: TeamId,
    position: Position,

    /// Vision radius, fixed at creation
    vision_range: u32,

    /// Every tile this agent (or a teammate, after sharing) has seen
    discovered: HashSet<Position>,

    /// Latched once the agent stands on the goal
    goal_reached: bool,
}

impl Agent {
    /// Creates an agent with an empty view.
    pub fn new(id: AgentId, team_id: TeamId, position: Position, vision_range: u32) -> Self {
        Self {
            id,
            team_id,
            position,
            vision_range,
            discovered: HashSet::new(),
            goal_reached: false,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn vision_range(&self) -> u32 {
        self.vision_range
    }

    pub fn discovered_tiles(&self) -> &HashSet<Position> {
        &self.discovered
    }

    pub fn has_reached_goal(&self) -> bool {
        self.goal_reached
    }

    /// Computes the candidate position for a step of (dx, dy).
    ///
    /// Pure; the agent does not move. Any magnitude is allowed, `None`
    /// only when the candidate is not representable.
    pub fn move_by(&self, dx: i32, dy: i32) -> Option<Position> {
        self.position.checked_offset(dx, dy)
    }

    /// Overwrites the agent's position.
    pub fn update_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Merges `tiles` into the discovered set.
    ///
    /// Returns how many tiles were new.
    pub fn update_discovered_tiles<I>(&mut self, tiles: I) -> usize
    where
        I: IntoIterator<Item = Position>,
    {
        let before = self.discovered.len();
        self.discovered.extend(tiles);
        self.discovered.len() - before
    }

    /// Latches the goal flag if the agent stands on `goal`.
    ///
    /// Never clears the flag.
    pub fn check_goal_reached(&mut self, goal: Option<Position>) {
        if goal == Some(self.position) {
            self.goal_reached = true;
        }
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Agent {} (team {}) at {}", self.id, self.team_id, self.position)?;
        if self.goal_reached {
            write!(f, " [goal]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent_at(x: i32, y: i32) -> Agent {
        Agent::new(AgentId(0), TeamId(0), Position::new(x, y), 2)
    }

    #[test]
    fn test_move_is_pure() {
        let agent = agent_at(1, 1);
        assert_eq!(agent.move_by(3, -4), Some(Position::new(4, -3)));
        assert_eq!(agent.move_by(0, i32::MAX), None);
        assert_eq!(agent.position(), Position::new(1, 1));
    }

    #[test]
    fn test_discovered_tiles_only_grow() {
        let mut agent = agent_at(0, 0);

        let added = agent.update_discovered_tiles([Position::new(0, 0), Position::new(1, 0)]);
        assert_eq!(added, 2);

        // Re-adding is idempotent
        let added = agent.update_discovered_tiles([Position::new(1, 0)]);
        assert_eq!(added, 0);
        assert_eq!(agent.discovered_tiles().len(), 2);

        // An empty update never shrinks
        agent.update_discovered_tiles(std::iter::empty());
        assert_eq!(agent.discovered_tiles().len(), 2);
    }

    #[test]
    fn test_goal_latch() {
        let mut agent = agent_at(0, 0);
        let goal = Some(Position::new(1, 1));

        agent.check_goal_reached(goal);
        assert!(!agent.has_reached_goal());

        agent.check_goal_reached(None);
        assert!(!agent.has_reached_goal());

        agent.update_position(Position::new(1, 1));
        agent.check_goal_reached(goal);
        assert!(agent.has_reached_goal());

        // Stepping off the goal keeps the latch
        agent.update_position(Position::new(2, 2));
        agent.check_goal_reached(goal);
        assert!(agent.has_reached_goal());
    }

    #[test]
    fn test_display() {
        let mut agent = Agent::new(AgentId(4), TeamId(1), Position::new(2, 3), 1);
        assert_eq!(agent.to_string(), "Agent 4 (team 1) at (2, 3)");

        agent.check_goal_reached(Some(Position::new(2, 3)));
        assert_eq!(agent.to_string(), "Agent 4 (team 1) at (2, 3) [goal]");
    }
}
