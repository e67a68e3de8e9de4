//! JSON exporter for visualization.
//!
//! Exports one frame per turn so an external renderer can replay how the
//! fog of war lifted.

use maze_core::GameState;
use maze_env::TeamId;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// A single turn of simulation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimFrame {
    /// Snapshot taken after the turn's update
    pub state: GameState,

    /// Moves accepted during this turn
    pub moves_accepted: u64,

    /// Moves rejected during this turn
    pub moves_rejected: u64,

    /// Notable events (rejections, game over)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub events: Vec<SimEvent>,
}

impl SimFrame {
    /// Builds a frame, sorting discovered tiles so output is stable across runs.
    pub fn new(mut state: GameState, moves_accepted: u64, moves_rejected: u64) -> Self {
        for team in state.teams.values_mut() {
            team.discovered_tiles.sort();
        }
        Self {
            state,
            moves_accepted,
            moves_rejected,
            events: Vec::new(),
        }
    }
}

/// Simulation event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimEvent {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl SimEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: None,
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: Some("warn".to_string()),
        }
    }
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Maze layout as ASCII, when the maze is a grid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    /// All frames, first one is the state before turn 1
    pub frames: Vec<SimFrame>,

    /// Final results
    pub passed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_team: Option<TeamId>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            layout: None,
            frames: Vec::new(),
            passed: false,
            winning_team: None,
        }
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: SimFrame) {
        self.frames.push(frame);
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, passed: bool, winning_team: Option<TeamId>) {
        self.passed = passed;
        self.winning_team = winning_team;
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
