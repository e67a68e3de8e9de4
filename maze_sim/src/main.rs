//! Maze simulator CLI
//!
//! Run seeded maze games and check the controller's invariants.

use anyhow::{bail, Context, Result};
use clap::Parser;
use maze_env::GridMaze;
use maze_sim::{ScenarioId, ScenarioResult, ScenarioRunner, SimExport};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Maze game simulation CLI
#[derive(Parser, Debug)]
#[command(name = "maze-sim")]
#[command(about = "Run deterministic maze game simulations", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Scenario to run (diagonal, corridor, sealed, shifting, chaos, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,

    /// Number of consecutive seeds to test (for CI mode)
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Turn limit per game
    #[arg(short, long, default_value = "200")]
    turns: u64,

    /// Vision radius for every agent
    #[arg(long, default_value = "2")]
    vision: u32,

    /// Walls toggled per turn in the shifting scenario
    #[arg(long, default_value = "2")]
    wall_flips: usize,

    /// Random-walk a maze loaded from an ASCII layout file instead of a scenario
    #[arg(short, long)]
    maze: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Export per-turn frames to a JSON file
    #[arg(long)]
    export: Option<String>,
}

enum Target {
    Scenarios(Vec<ScenarioId>),
    Layout(String, GridMaze),
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")?;

    if !args.json {
        info!("Maze Simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    let target = match &args.maze {
        Some(path) => {
            let maze = GridMaze::from_file(path)
                .with_context(|| format!("Failed to load maze from {}", path.display()))?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "custom".to_string());
            Target::Layout(name, maze)
        }
        None if args.scenario == "all" => Target::Scenarios(ScenarioId::all()),
        None => {
            let scenario = args.scenario.parse::<ScenarioId>().map_err(|e| {
                anyhow::anyhow!("{}. Available scenarios: diagonal, corridor, sealed, shifting, chaos, all", e)
            })?;
            Target::Scenarios(vec![scenario])
        }
    };

    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .context("System clock is before the Unix epoch")?
            .as_nanos() as u64
    } else {
        args.seed
    };

    if let Some(export_path) = &args.export {
        if args.seeds > 1 || matches!(&target, Target::Scenarios(s) if s.len() > 1) {
            bail!("--export only supports a single scenario and seed");
        }
        info!("Running with export to: {}", export_path);

        let runner = runner(&args, base_seed);
        let (result, export) = match target {
            Target::Scenarios(scenarios) => runner.run_recorded(scenarios[0]),
            Target::Layout(name, maze) => {
                let mut export = SimExport::new(&name, base_seed);
                let result = runner.run_maze(&name, maze, Some(&mut export));
                (result, export)
            }
        };

        export
            .write_to_file(export_path)
            .with_context(|| format!("Failed to write export to {}", export_path))?;
        info!("Exported {} frames to {}", export.frames.len(), export_path);

        return finish(&args, vec![result]);
    }

    // Run simulations
    let mut all_results: Vec<ScenarioResult> = Vec::new();
    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);
        let runner = runner(&args, seed);

        match &target {
            Target::Scenarios(scenarios) => {
                for scenario in scenarios {
                    let result = runner.run(*scenario);
                    report(&args, &result);
                    all_results.push(result);
                }
            }
            Target::Layout(name, maze) => {
                let result = runner.run_maze(name, maze.clone(), None);
                report(&args, &result);
                all_results.push(result);
            }
        }
    }

    finish(&args, all_results)
}

fn runner(args: &Args, seed: u64) -> ScenarioRunner {
    ScenarioRunner::new(seed)
        .with_turns(args.turns)
        .with_vision(args.vision)
        .with_wall_flips(args.wall_flips)
}

fn report(args: &Args, result: &ScenarioResult) {
    if args.json {
        return;
    }
    if result.passed {
        info!(
            "✓ {} (seed={}) PASSED in {} turns, winner={:?}",
            result.scenario, result.seed, result.turns, result.winning_team
        );
    } else {
        error!(
            "✗ {} (seed={}) FAILED: {}",
            result.scenario,
            result.seed,
            result.failure_reason.as_deref().unwrap_or("unknown")
        );
    }
}

/// Prints the summary and exits non-zero if any run failed.
fn finish(args: &Args, all_results: Vec<ScenarioResult>) -> Result<()> {
    let total = all_results.len();
    let failed_count = all_results.iter().filter(|r| !r.passed).count();

    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "passed": total - failed_count,
            "failed": failed_count,
            "results": all_results,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        if args.export.is_some() {
            report(args, &all_results[0]);
        }
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if failed_count == 0 {
            info!("✅ All {} runs passed!", total);
        } else {
            error!("❌ {}/{} runs failed!", failed_count, total);
            for result in all_results.iter().filter(|r| !r.passed) {
                error!(
                    "  - {} seed={}: {}",
                    result.scenario,
                    result.seed,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
    Ok(())
}
