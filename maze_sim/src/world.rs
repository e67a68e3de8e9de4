//! SimWorld - The simulation harness container.

use crate::exporter::{SimEvent, SimExport, SimFrame};
use crate::moves::MoveSource;
use crate::oracle::InvariantOracle;
use crate::runner::ScenarioMetrics;

use maze_core::{ControllerConfig, GameController, MoveError};
use maze_env::{AgentId, MazeEnvironment, TeamId};
use tracing::debug;

/// Colors handed to teams in registration order.
pub const TEAM_COLORS: [&str; 6] = ["red", "blue", "green", "yellow", "purple", "orange"];

/// Any maze the harness can drive.
pub type SimMaze = Box<dyn MazeEnvironment>;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Turn limit; the run stops earlier if a team wins
    pub max_turns: u64,

    /// Vision radius for every agent
    pub vision_range: u32,

    /// Walls toggled per turn on shifting mazes
    pub wall_flips_per_turn: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_turns: 200,
            vision_range: 2,
            wall_flips_per_turn: 2,
        }
    }
}

/// What happened during one `tick`.
#[derive(Debug, Clone, Default)]
pub struct TurnReport {
    /// Turn number after the update
    pub turn: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub events: Vec<SimEvent>,
}

/// The SimWorld - one controller, one move source, one oracle.
pub struct SimWorld {
    /// Configuration
    pub config: SimConfig,

    game: GameController<SimMaze>,

    moves: Box<dyn MoveSource>,

    oracle: InvariantOracle,

    metrics: ScenarioMetrics,
}

impl SimWorld {
    /// Creates a world with teams registered in the maze's start-table order.
    pub fn new(config: SimConfig, maze: SimMaze, moves: Box<dyn MoveSource>) -> Self {
        Self::with_team_order(config, maze, moves, &[])
    }

    /// Creates a world, registering `order` first and the rest of the
    /// start table after it.
    ///
    /// Registration order is the win tie-break order.
    pub fn with_team_order(
        config: SimConfig,
        maze: SimMaze,
        moves: Box<dyn MoveSource>,
        order: &[TeamId],
    ) -> Self {
        let controller_config = ControllerConfig::default()
            .with_name("maze-sim")
            .with_vision_range(config.vision_range);

        let mut registration: Vec<TeamId> = order.to_vec();
        for (team, _) in maze.start_positions() {
            if !registration.contains(team) {
                registration.push(*team);
            }
        }

        let mut game = GameController::with_config(maze, controller_config);
        for (i, team) in registration.into_iter().enumerate() {
            let color = TEAM_COLORS[i % TEAM_COLORS.len()].to_string();
            game.add_team(team, Some(color), 0.0);
        }
        game.initialize_teams();

        let mut oracle = InvariantOracle::new();
        oracle.observe(&game);

        debug!(
            seed = config.seed,
            agents = game.agent_count(),
            moves = moves.name(),
            "SimWorld created"
        );

        Self {
            config,
            game,
            moves,
            oracle,
            metrics: ScenarioMetrics::default(),
        }
    }

    /// Runs one turn: one proposed move per agent, then `update()`.
    pub fn tick(&mut self) -> TurnReport {
        let turn = self.game.turn();
        let mut report = TurnReport::default();

        let roster: Vec<(TeamId, AgentId)> = self
            .game
            .teams()
            .flat_map(|t| t.agents().map(move |a| (t.id(), a.id())))
            .collect();

        for (team, agent) in roster {
            let Some((dx, dy)) = self.moves.next_move(turn, team, agent) else {
                continue;
            };

            match self.game.try_move_agent(agent, team, dx, dy) {
                Ok(_) => {
                    report.accepted += 1;
                    self.metrics.moves_accepted += 1;
                }
                Err(e) => {
                    report.rejected += 1;
                    self.metrics.record_rejection(&e);
                    if let MoveError::TileOccupied { .. } = e {
                        report.events.push(SimEvent::warn(format!("agent {}: {}", agent, e)));
                    }
                }
            }
        }

        let was_over = self.game.is_game_over();
        self.game.update();
        if let (false, Some(winner)) = (was_over, self.game.winning_team()) {
            report.events.push(SimEvent::info(format!("team {} reached the goal", winner)));
        }

        self.oracle.observe(&self.game);
        report.turn = self.game.turn();
        report
    }

    /// Ticks until a team wins or the turn limit is hit.
    ///
    /// With an export, records the starting state and one frame per turn.
    pub fn run(&mut self, mut export: Option<&mut SimExport>) {
        if let Some(export) = export.as_deref_mut() {
            export.add_frame(SimFrame::new(self.game.get_game_state(), 0, 0));
        }

        while !self.game.is_game_over() && self.game.turn() < self.config.max_turns {
            let report = self.tick();

            if let Some(export) = export.as_deref_mut() {
                let mut frame = SimFrame::new(self.game.get_game_state(), report.accepted, report.rejected);
                frame.events = report.events;
                export.add_frame(frame);
            }

            if report.turn % 25 == 0 {
                debug!(
                    "  turn={} | accepted={} | rejected={}",
                    report.turn, self.metrics.moves_accepted, self.metrics.moves_rejected
                );
            }
        }

        self.metrics.tiles_discovered = self
            .game
            .teams()
            .map(|t| t.get_discovered_tiles().len())
            .sum();
    }

    pub fn game(&self) -> &GameController<SimMaze> {
        &self.game
    }

    pub fn oracle(&self) -> &InvariantOracle {
        &self.oracle
    }

    pub fn metrics(&self) -> &ScenarioMetrics {
        &self.metrics
    }

    /// Returns the current turn.
    pub fn turn(&self) -> u64 {
        self.game.turn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{RandomWalk, ScriptedMoves};
    use maze_env::{GridMaze, Position};

    fn maze() -> SimMaze {
        Box::new(
            GridMaze::open(5, 5)
                .with_start(TeamId(0), Position::new(0, 0))
                .with_start(TeamId(1), Position::new(4, 4))
                .with_goal(Position::new(2, 2)),
        )
    }

    #[test]
    fn test_sim_world_creation() {
        let world = SimWorld::new(SimConfig::default(), maze(), Box::new(ScriptedMoves::new()));

        assert_eq!(world.game().agent_count(), 2);
        assert_eq!(world.turn(), 0);
        assert_eq!(world.game().team(TeamId(0)).unwrap().color(), Some("red"));
        assert_eq!(world.game().team(TeamId(1)).unwrap().color(), Some("blue"));
    }

    #[test]
    fn test_team_order() {
        let world = SimWorld::with_team_order(
            SimConfig::default(),
            maze(),
            Box::new(ScriptedMoves::new()),
            &[TeamId(1)],
        );

        let order: Vec<TeamId> = world.game().teams().map(|t| t.id()).collect();
        assert_eq!(order, vec![TeamId(1), TeamId(0)]);
    }

    #[test]
    fn test_sim_world_tick() {
        let moves = ScriptedMoves::new()
            .with_script(AgentId(0), [(1, 1), (1, 1)])
            .with_script(AgentId(1), [(0, 1)]); // off the grid
        let mut world = SimWorld::new(SimConfig::default(), maze(), Box::new(moves));

        let report = world.tick();
        assert_eq!(report.turn, 1);
        assert_eq!(report.accepted, 1);
        assert_eq!(report.rejected, 1);
        assert_eq!(world.metrics().illegal_destination, 1);

        let report = world.tick();
        assert!(world.game().is_game_over());
        assert_eq!(report.events.len(), 1);
    }

    #[test]
    fn test_run_stops_at_turn_limit() {
        let config = SimConfig {
            max_turns: 30,
            ..Default::default()
        };
        let sealed = GridMaze::open(5, 5)
            .with_start(TeamId(0), Position::new(0, 0))
            .with_start(TeamId(1), Position::new(4, 4));
        let mut world = SimWorld::new(config, Box::new(sealed), Box::new(RandomWalk::new(3)));

        let mut export = SimExport::new("test", 3);
        world.run(Some(&mut export));

        assert_eq!(world.turn(), 30);
        assert_eq!(export.frames.len(), 31);
        assert!(world.oracle().is_clean());
        assert!(world.metrics().tiles_discovered > 0);
    }
}
