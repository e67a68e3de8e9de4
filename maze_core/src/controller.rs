//! Game Controller - Owns the maze and the teams and drives the turn cycle.
//!
//! # Turn cycle
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  move_agent() × N     (external driver, one per agent)   │
//! │        │  validate: team → agent → maze → other teams    │
//! │        ▼                                                 │
//! │  update()                                                │
//! │    1. dynamic walls   (only if the maze declared it)     │
//! │    2. refresh vision + goal latch for every agent        │
//! │    3. share_vision() for every team                      │
//! │    4. check_win_conditions()                             │
//! │    5. turn += 1                                          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The controller is single-threaded. Embedding it behind a network or
//! thread pool needs external serialization (one lock around the whole
//! controller): the occupancy scan in `move_agent` is not atomic with
//! respect to other agents moving.

use crate::agent::Agent;
use crate::config::ControllerConfig;
use crate::error::MoveError;
use crate::state::{GameState, TeamState};
use crate::team::Team;

use maze_env::{AgentId, MazeCapabilities, MazeEnvironment, Position, TeamId};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Lifecycle of a game. `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    Finished,
}

/// The aggregate root for one game session.
///
/// Generic over the maze so tests and the simulator can plug in any
/// `MazeEnvironment`, including a borrowed `&mut` maze.
pub struct GameController<M: MazeEnvironment> {
    /// The maze collaborator
    maze: M,

    /// Resolved once from the maze at construction
    capabilities: MazeCapabilities,

    config: ControllerConfig,

    /// Teams in insertion order (win tie-break order)
    teams: Vec<Team>,

    /// TeamId -> index into `teams`
    team_index: HashMap<TeamId, usize>,

    current_turn: u64,

    game_over: bool,

    winning_team: Option<TeamId>,

    /// Next agent id handed out by `initialize_teams`
    next_agent_id: u32,
}

impl<M: MazeEnvironment> GameController<M> {
    /// Creates a controller with the default configuration.
    pub fn new(maze: M) -> Self {
        Self::with_config(maze, ControllerConfig::default())
    }

    /// Creates a controller with an explicit configuration.
    pub fn with_config(maze: M, config: ControllerConfig) -> Self {
        let capabilities = maze.capabilities();
        debug!(
            game = %config.name,
            dynamic_walls = capabilities.dynamic_walls,
            "Controller created"
        );

        Self {
            maze,
            capabilities,
            config,
            teams: Vec::new(),
            team_index: HashMap::new(),
            current_turn: 0,
            game_over: false,
            winning_team: None,
            next_agent_id: 0,
        }
    }

    /// Creates and registers a team.
    ///
    /// Re-adding an existing id replaces the old team, dropping its agents.
    /// The replacement keeps the old team's place in iteration order.
    pub fn add_team(
        &mut self,
        team_id: TeamId,
        color: Option<String>,
        selfishness: f64,
    ) -> &mut Team {
        let team = Team::new(team_id, color, selfishness);

        let existing = self.team_index.get(&team_id).copied();
        let idx = match existing {
            Some(idx) => {
                warn!(
                    team = %team_id,
                    dropped_agents = self.teams[idx].agent_count(),
                    "Team re-registered, previous team replaced"
                );
                self.teams[idx] = team;
                idx
            }
            None => {
                self.teams.push(team);
                self.team_index.insert(team_id, self.teams.len() - 1);
                self.teams.len() - 1
            }
        };

        &mut self.teams[idx]
    }

    /// Spawns one agent per start coordinate in the maze's start table.
    ///
    /// Teams missing from the controller are created with the configured
    /// defaults. Each agent gets a fresh id and is seeded with what it can
    /// see from its start tile.
    ///
    /// Not idempotent: a second call spawns a second set of agents.
    pub fn initialize_teams(&mut self) {
        let table: Vec<(TeamId, Vec<Position>)> = self.maze.start_positions().to_vec();
        let vision_range = self.config.default_vision_range;

        for (team_id, starts) in table {
            if !self.team_index.contains_key(&team_id) {
                let color = self.config.default_color.clone();
                let selfishness = self.config.default_selfishness;
                self.add_team(team_id, color, selfishness);
            }

            let idx = self.team_index[&team_id];
            for pos in starts {
                let mut agent = Agent::new(AgentId(self.next_agent_id), team_id, pos, vision_range);
                agent.update_discovered_tiles(self.maze.get_visible_tiles(pos, vision_range));
                self.next_agent_id += 1;

                debug!(agent = %agent.id(), team = %team_id, position = %pos, "Agent spawned");
                self.teams[idx].add_agent(agent);
            }
        }
    }

    /// Attempts to move an agent by (dx, dy).
    ///
    /// Returns false without touching any state if the team or agent is
    /// unknown, the maze rejects the destination, or another team's agent
    /// stands there. See `try_move_agent` for the reason.
    pub fn move_agent(&mut self, agent_id: AgentId, team_id: TeamId, dx: i32, dy: i32) -> bool {
        match self.try_move_agent(agent_id, team_id, dx, dy) {
            Ok(pos) => {
                debug!(agent = %agent_id, team = %team_id, position = %pos, "Move accepted");
                true
            }
            Err(e) => {
                debug!(agent = %agent_id, team = %team_id, reason = e.kind(), "Move rejected: {}", e);
                false
            }
        }
    }

    /// Same as `move_agent`, reporting why a move was rejected.
    ///
    /// On success returns the agent's new position.
    pub fn try_move_agent(
        &mut self,
        agent_id: AgentId,
        team_id: TeamId,
        dx: i32,
        dy: i32,
    ) -> Result<Position, MoveError> {
        let idx = *self
            .team_index
            .get(&team_id)
            .ok_or(MoveError::UnknownTeam(team_id))?;

        let unknown_agent = MoveError::UnknownAgent {
            team: team_id,
            agent: agent_id,
        };
        let agent = self.teams[idx].agent(agent_id).ok_or_else(|| unknown_agent.clone())?;
        let candidate = agent.move_by(dx, dy).ok_or(MoveError::OutOfRange {
            position: agent.position(),
            dx,
            dy,
        })?;
        let vision_range = agent.vision_range();

        if !self.maze.is_valid_move(candidate) {
            return Err(MoveError::IllegalDestination(candidate));
        }

        // Only other teams block; teammates may share a tile
        if let Some(occupant) = self
            .teams
            .iter()
            .filter(|t| t.id() != team_id)
            .find(|t| t.occupies(candidate))
        {
            return Err(MoveError::TileOccupied {
                position: candidate,
                occupant: occupant.id(),
            });
        }

        let visible = self.maze.get_visible_tiles(candidate, vision_range);
        let goal = self.maze.goal_position();

        let agent = self.teams[idx].agent_mut(agent_id).ok_or(unknown_agent)?;
        agent.update_position(candidate);
        agent.update_discovered_tiles(visible);
        if goal.is_some() {
            agent.check_goal_reached(goal);
        }

        Ok(candidate)
    }

    /// Ends the game if any team has won.
    ///
    /// Teams are checked in insertion order and the first winner takes it,
    /// so simultaneous winners resolve the same way on every run. Does
    /// nothing when the maze has no goal or the game is already over.
    pub fn check_win_conditions(&mut self) {
        if self.game_over || self.maze.goal_position().is_none() {
            return;
        }

        if let Some(team) = self.teams.iter().find(|t| t.has_won()) {
            self.game_over = true;
            self.winning_team = Some(team.id());
            info!(
                game = %self.config.name,
                team = %team.id(),
                turn = self.current_turn,
                "Game over, team reached the goal"
            );
        }
    }

    /// Advances the game by one turn.
    ///
    /// No-op once the game is finished. The turn counter advances even on
    /// the turn that produces a winner.
    pub fn update(&mut self) {
        if self.game_over {
            return;
        }

        if self.capabilities.dynamic_walls {
            self.maze.update_dynamic_walls();
        }

        // Vision must be refreshed before sharing and before the win check
        let goal = self.maze.goal_position();
        for team in &mut self.teams {
            for agent in team.agents_mut() {
                let visible = self.maze.get_visible_tiles(agent.position(), agent.vision_range());
                agent.update_discovered_tiles(visible);
                agent.check_goal_reached(goal);
            }
        }

        for team in &mut self.teams {
            let shared = team.share_vision();
            if shared > 0 {
                debug!(team = %team.id(), new_tiles = shared, "Vision shared");
            }
        }

        self.check_win_conditions();

        self.current_turn += 1;
    }

    /// Snapshot of turn, per-team positions and knowledge, and outcome.
    pub fn get_game_state(&self) -> GameState {
        let teams = self
            .teams
            .iter()
            .map(|team| {
                let state = TeamState {
                    agent_positions: team.get_agent_positions(),
                    discovered_tiles: team.get_discovered_tiles().iter().copied().collect(),
                };
                (team.id(), state)
            })
            .collect();

        GameState {
            turn: self.current_turn,
            teams,
            game_over: self.game_over,
            winning_team: self.winning_team,
        }
    }

    pub fn turn(&self) -> u64 {
        self.current_turn
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winning_team(&self) -> Option<TeamId> {
        self.winning_team
    }

    pub fn phase(&self) -> GamePhase {
        if self.game_over {
            GamePhase::Finished
        } else {
            GamePhase::Running
        }
    }

    /// Teams in insertion order.
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter()
    }

    pub fn team(&self, team_id: TeamId) -> Option<&Team> {
        self.team_index.get(&team_id).map(|&idx| &self.teams[idx])
    }

    /// Total agents across all teams.
    pub fn agent_count(&self) -> usize {
        self.teams.iter().map(Team::agent_count).sum()
    }

    pub fn maze(&self) -> &M {
        &self.maze
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn capabilities(&self) -> MazeCapabilities {
        self.capabilities
    }
}

impl<M: MazeEnvironment> std::fmt::Display for GameController<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Turn: {}", self.current_turn)?;
        writeln!(f, "Teams: {}", self.teams.len())?;

        for team in &self.teams {
            writeln!(f, "- {}", team)?;
            for agent in team.agents() {
                writeln!(f, "  - {}", agent)?;
            }
        }

        if let (true, Some(winner)) = (self.game_over, self.winning_team) {
            writeln!(f, "Game over! Team {} wins!", winner)?;
        }

        Ok(())
    }
}
