//! Controller configuration.

/// Configuration for a `GameController`.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Game's logical name (for logging)
    pub name: String,

    /// Vision radius given to every spawned agent (default: 2)
    pub default_vision_range: u32,

    /// Color for teams auto-created by `initialize_teams` (default: none)
    pub default_color: Option<String>,

    /// Selfishness for auto-created teams (default: 0.0)
    pub default_selfishness: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            name: "maze-game".to_string(),
            default_vision_range: 2,
            default_color: None,
            default_selfishness: 0.0,
        }
    }
}

impl ControllerConfig {
    /// Sets the vision radius for spawned agents.
    pub fn with_vision_range(mut self, range: u32) -> Self {
        self.default_vision_range = range;
        self
    }

    /// Sets the logical name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
