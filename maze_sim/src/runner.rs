//! Scenario runner - builds a world per scenario, runs it, and judges the outcome.

use crate::exporter::SimExport;
use crate::moves::{MoveSource, RandomWalk, ScriptedMoves};
use crate::scenarios::ScenarioId;
use crate::world::{SimConfig, SimMaze, SimWorld};

use maze_core::MoveError;
use maze_env::{AgentId, GridMaze, MazeError, Position, ShiftingMaze, TeamId};
use serde::Serialize;
use tracing::{debug, info, warn};

const CORRIDOR: &str = include_str!("../layouts/corridor.txt");
const SEALED: &str = include_str!("../layouts/sealed.txt");
const ARENA: &str = include_str!("../layouts/arena.txt");

/// Results from running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario (or custom maze) that was run
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Turns executed
    pub turns: u64,

    pub winning_team: Option<TeamId>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,

    /// Invariant violations reported by the oracle
    pub violations: Vec<String>,

    /// Failure message if any
    pub failure_reason: Option<String>,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScenarioMetrics {
    pub moves_accepted: u64,

    /// All rejected moves
    pub moves_rejected: u64,

    /// Rejected by the maze (wall or out of bounds) or out of range
    pub illegal_destination: u64,

    /// Rejected because another team held the tile
    pub tile_occupied: u64,

    /// Unknown team or agent
    pub unknown_target: u64,

    /// Sum of team-level discovered tiles at the end
    pub tiles_discovered: usize,
}

impl ScenarioMetrics {
    /// Counts a rejected move by reason.
    pub fn record_rejection(&mut self, error: &MoveError) {
        self.moves_rejected += 1;
        match error {
            MoveError::IllegalDestination(_) | MoveError::OutOfRange { .. } => self.illegal_destination += 1,
            MoveError::TileOccupied { .. } => self.tile_occupied += 1,
            MoveError::UnknownTeam(_) | MoveError::UnknownAgent { .. } => self.unknown_target += 1,
        }
    }
}

/// Runs scenarios.
pub struct ScenarioRunner {
    config: SimConfig,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self {
            config: SimConfig {
                seed,
                ..SimConfig::default()
            },
        }
    }

    /// Sets the turn limit.
    pub fn with_turns(mut self, turns: u64) -> Self {
        self.config.max_turns = turns;
        self
    }

    /// Sets the agents' vision radius.
    pub fn with_vision(mut self, range: u32) -> Self {
        self.config.vision_range = range;
        self
    }

    /// Sets how many walls toggle per turn on shifting mazes.
    pub fn with_wall_flips(mut self, flips: usize) -> Self {
        self.config.wall_flips_per_turn = flips;
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        self.execute(scenario, None)
    }

    /// Runs a scenario, recording one frame per turn.
    pub fn run_recorded(&self, scenario: ScenarioId) -> (ScenarioResult, SimExport) {
        let mut export = SimExport::new(scenario.name(), self.config.seed);
        let result = self.execute(scenario, Some(&mut export));
        export.finalize(result.passed, result.winning_team);
        (result, export)
    }

    /// Random walk on a caller-supplied maze.
    ///
    /// Passes when the oracle saw no invariant violations.
    pub fn run_maze(&self, name: &str, maze: GridMaze, mut export: Option<&mut SimExport>) -> ScenarioResult {
        info!("Starting custom maze: {} (seed={})", name, self.config.seed);

        if let Some(export) = export.as_deref_mut() {
            export.layout = Some(maze.render());
        }

        let mut world = SimWorld::new(self.config.clone(), Box::new(maze), self.random_walk());
        world.run(export.as_deref_mut());

        let result = self.conclude(name, &world, Vec::new());
        if let Some(export) = export {
            export.finalize(result.passed, result.winning_team);
        }
        result
    }

    fn execute(&self, scenario: ScenarioId, export: Option<&mut SimExport>) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.config.seed);
        debug!("  {}", scenario.description());

        let outcome = match scenario {
            ScenarioId::Diagonal => self.run_diagonal(export),
            ScenarioId::Corridor => self.run_corridor(export),
            ScenarioId::Sealed => self.run_sealed(export),
            ScenarioId::Shifting => self.run_shifting(export),
            ScenarioId::Chaos => self.run_chaos(export),
        };

        outcome.unwrap_or_else(|e| {
            warn!("Scenario {} could not be built: {}", scenario.name(), e);
            ScenarioResult {
                scenario: scenario.name().to_string(),
                seed: self.config.seed,
                passed: false,
                turns: 0,
                winning_team: None,
                metrics: ScenarioMetrics::default(),
                violations: Vec::new(),
                failure_reason: Some(format!("maze error: {}", e)),
            }
        })
    }

    /// MZ-001: Diagonal - the canonical two-move win.
    ///
    /// 5x5 open grid, team 0 at (0,0), team 1 at (4,4), goal at (2,2),
    /// vision 1. Team 0 steps (+1,+1) twice and wins on turn 2.
    fn run_diagonal(&self, export: Option<&mut SimExport>) -> Result<ScenarioResult, MazeError> {
        let maze = GridMaze::open(5, 5)
            .with_start(TeamId(0), Position::new(0, 0))
            .with_start(TeamId(1), Position::new(4, 4))
            .with_goal(Position::new(2, 2));
        let config = SimConfig {
            vision_range: 1,
            ..self.config.clone()
        };
        let moves = ScriptedMoves::new().with_script(AgentId(0), [(1, 1), (1, 1)]);

        let (mut world, export) = self.start(config, Box::new(maze.clone()), Box::new(moves), export, &maze);
        world.run(export);

        let mut failures = Vec::new();
        expect_winner(&world, Some(TeamId(0)), &mut failures);
        if world.turn() != 2 {
            failures.push(format!("expected win on turn 2, got turn {}", world.turn()));
        }

        Ok(self.conclude(ScenarioId::Diagonal.name(), &world, failures))
    }

    /// MZ-002: Corridor - mirrored race where move order decides the goal.
    ///
    /// Both agents need six steps. Team 0 moves first each turn, so on the
    /// last turn team 1 finds the goal occupied.
    fn run_corridor(&self, export: Option<&mut SimExport>) -> Result<ScenarioResult, MazeError> {
        let maze = GridMaze::parse(CORRIDOR)?;
        let west = [(0, 1), (0, 1), (1, 0), (1, 0), (1, 0), (1, 0)];
        let east = [(0, 1), (0, 1), (-1, 0), (-1, 0), (-1, 0), (-1, 0)];
        let moves = ScriptedMoves::new()
            .with_script(AgentId(0), west)
            .with_script(AgentId(1), east);

        let (mut world, export) = self.start(self.config.clone(), Box::new(maze.clone()), Box::new(moves), export, &maze);
        world.run(export);

        let mut failures = Vec::new();
        expect_winner(&world, Some(TeamId(0)), &mut failures);
        if world.metrics().tile_occupied == 0 {
            failures.push("team 1 was never blocked at the goal".to_string());
        }

        Ok(self.conclude(ScenarioId::Corridor.name(), &world, failures))
    }

    /// MZ-003: Sealed - unreachable goal, run must hit the turn limit.
    fn run_sealed(&self, export: Option<&mut SimExport>) -> Result<ScenarioResult, MazeError> {
        let maze = GridMaze::parse(SEALED)?;

        let (mut world, export) = self.start(self.config.clone(), Box::new(maze.clone()), self.random_walk(), export, &maze);
        world.run(export);

        let mut failures = Vec::new();
        expect_winner(&world, None, &mut failures);
        if world.turn() != self.config.max_turns {
            failures.push(format!(
                "stopped at turn {} before the limit {}",
                world.turn(),
                self.config.max_turns
            ));
        }

        Ok(self.conclude(ScenarioId::Sealed.name(), &world, failures))
    }

    /// MZ-004: Shifting - dynamic walls under a random walk.
    fn run_shifting(&self, export: Option<&mut SimExport>) -> Result<ScenarioResult, MazeError> {
        let grid = GridMaze::parse(ARENA)?;
        let wall_seed = self.config.seed.wrapping_mul(0x517cc1b727220a95);
        let maze = ShiftingMaze::new(grid.clone(), wall_seed, self.config.wall_flips_per_turn);

        let (mut world, export) = self.start(self.config.clone(), Box::new(maze), self.random_walk(), export, &grid);
        world.run(export);

        let mut failures = Vec::new();
        if !world.game().capabilities().dynamic_walls {
            failures.push("shifting maze did not declare dynamic walls".to_string());
        }

        Ok(self.conclude(ScenarioId::Shifting.name(), &world, failures))
    }

    /// MZ-005: Chaos - four teams, static arena, random walk.
    fn run_chaos(&self, export: Option<&mut SimExport>) -> Result<ScenarioResult, MazeError> {
        let maze = GridMaze::parse(ARENA)?;

        let (mut world, export) = self.start(self.config.clone(), Box::new(maze.clone()), self.random_walk(), export, &maze);
        world.run(export);

        let mut failures = Vec::new();
        if world.game().teams().count() != 4 {
            failures.push(format!("expected 4 teams, found {}", world.game().teams().count()));
        }

        Ok(self.conclude(ScenarioId::Chaos.name(), &world, failures))
    }

    /// Builds a world and stamps the layout into the export.
    fn start<'a>(
        &self,
        config: SimConfig,
        maze: SimMaze,
        moves: Box<dyn MoveSource>,
        export: Option<&'a mut SimExport>,
        layout: &GridMaze,
    ) -> (SimWorld, Option<&'a mut SimExport>) {
        let export = export.map(|e| {
            e.layout = Some(layout.render());
            e
        });
        (SimWorld::new(config, maze, moves), export)
    }

    fn random_walk(&self) -> Box<dyn MoveSource> {
        Box::new(RandomWalk::new(self.config.seed.wrapping_mul(0x9e3779b97f4a7c15)))
    }

    /// Folds scenario checks and oracle violations into a result.
    fn conclude(&self, name: &str, world: &SimWorld, mut failures: Vec<String>) -> ScenarioResult {
        let violations: Vec<String> = world.oracle().violations().iter().map(ToString::to_string).collect();
        failures.extend(violations.iter().cloned());

        let passed = failures.is_empty();
        let game = world.game();
        if passed {
            info!(
                "✓ {} complete: {} turns, winner={:?}, {} tiles discovered",
                name,
                game.turn(),
                game.winning_team(),
                world.metrics().tiles_discovered
            );
        } else {
            warn!("✗ {} failed: {}", name, failures.join("; "));
        }

        ScenarioResult {
            scenario: name.to_string(),
            seed: self.config.seed,
            passed,
            turns: game.turn(),
            winning_team: game.winning_team(),
            metrics: world.metrics().clone(),
            violations,
            failure_reason: if passed { None } else { Some(failures.join("; ")) },
        }
    }
}

fn expect_winner(world: &SimWorld, expected: Option<TeamId>, failures: &mut Vec<String>) {
    let actual = world.game().winning_team();
    if actual != expected {
        failures.push(format!("expected winner {:?}, got {:?}", expected, actual));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_scenario() {
        let result = ScenarioRunner::new(42).run(ScenarioId::Diagonal);

        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.winning_team, Some(TeamId(0)));
        assert_eq!(result.turns, 2);
        assert_eq!(result.metrics.moves_accepted, 2);
    }

    #[test]
    fn test_corridor_scenario() {
        let result = ScenarioRunner::new(42).run(ScenarioId::Corridor);

        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.turns, 6);
        assert_eq!(result.metrics.tile_occupied, 1);
        assert_eq!(result.metrics.moves_accepted, 11);
    }

    #[test]
    fn test_sealed_scenario() {
        let result = ScenarioRunner::new(7).with_turns(40).run(ScenarioId::Sealed);

        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.turns, 40);
        assert_eq!(result.winning_team, None);
    }

    #[test]
    fn test_shifting_scenario() {
        let result = ScenarioRunner::new(42)
            .with_turns(60)
            .with_wall_flips(4)
            .run(ScenarioId::Shifting);

        assert!(result.passed, "{:?}", result.failure_reason);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_chaos_deterministic() {
        let runner1 = ScenarioRunner::new(42).with_turns(80);
        let runner2 = ScenarioRunner::new(42).with_turns(80);

        let result1 = runner1.run(ScenarioId::Chaos);
        let result2 = runner2.run(ScenarioId::Chaos);

        assert!(result1.passed, "{:?}", result1.failure_reason);
        assert_eq!(result1.turns, result2.turns);
        assert_eq!(result1.winning_team, result2.winning_team);
        assert_eq!(result1.metrics, result2.metrics);
    }

    #[test]
    fn test_recorded_frames() {
        let (result, export) = ScenarioRunner::new(42).run_recorded(ScenarioId::Diagonal);

        assert_eq!(export.frames.len() as u64, result.turns + 1);
        assert!(export.passed);
        assert_eq!(export.winning_team, Some(TeamId(0)));
        assert_eq!(export.layout.as_deref().map(|l| l.lines().count()), Some(5));
    }

    #[test]
    fn test_custom_maze() {
        let maze = GridMaze::parse(ARENA).unwrap();
        let mut export = SimExport::new("arena", 9);
        let result = ScenarioRunner::new(9)
            .with_turns(25)
            .run_maze("arena", maze, Some(&mut export));

        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.scenario, "arena");
        assert!(export.layout.is_some());
        assert_eq!(export.frames.len() as u64, result.turns + 1);
    }

    #[test]
    fn test_record_rejection() {
        let mut metrics = ScenarioMetrics::default();
        metrics.record_rejection(&MoveError::UnknownTeam(TeamId(3)));
        metrics.record_rejection(&MoveError::IllegalDestination(Position::new(-1, 0)));
        metrics.record_rejection(&MoveError::OutOfRange {
            position: Position::new(0, 0),
            dx: i32::MIN,
            dy: -1,
        });

        assert_eq!(metrics.moves_rejected, 3);
        assert_eq!(metrics.unknown_target, 1);
        assert_eq!(metrics.illegal_destination, 2);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(16))]

            #[test]
            fn random_walks_keep_invariants(seed in any::<u64>()) {
                let runner = ScenarioRunner::new(seed).with_turns(40);

                for scenario in [ScenarioId::Chaos, ScenarioId::Shifting, ScenarioId::Sealed] {
                    let result = runner.run(scenario);
                    prop_assert!(result.violations.is_empty(), "{:?}", result.violations);
                }
            }
        }
    }
}
