//! Scenario catalogue for the simulation harness.

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// MZ-001: Diagonal walk to the goal on an open 5x5 grid
    Diagonal,

    /// MZ-002: Symmetric corridor race, decided by move order
    Corridor,

    /// MZ-003: Goal walled in, game must run to the turn limit
    Sealed,

    /// MZ-004: Random walk on a maze whose walls shift every turn
    Shifting,

    /// MZ-005: Four-team random walk on a static arena
    Chaos,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Diagonal,
            ScenarioId::Corridor,
            ScenarioId::Sealed,
            ScenarioId::Shifting,
            ScenarioId::Chaos,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Diagonal => "diagonal",
            ScenarioId::Corridor => "corridor",
            ScenarioId::Sealed => "sealed",
            ScenarioId::Shifting => "shifting",
            ScenarioId::Chaos => "chaos",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Diagonal => "Team 0 steps (+1,+1) twice onto the goal, wins on the next update",
            ScenarioId::Corridor => "Two teams race down mirrored corridors, first mover takes the goal",
            ScenarioId::Sealed => "Goal enclosed by walls, no team can ever win",
            ScenarioId::Shifting => "Random walk while walls toggle each turn",
            ScenarioId::Chaos => "Four teams random-walking a walled arena",
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "diagonal" | "mz-001" => Ok(ScenarioId::Diagonal),
            "corridor" | "mz-002" => Ok(ScenarioId::Corridor),
            "sealed" | "mz-003" => Ok(ScenarioId::Sealed),
            "shifting" | "dynamic" | "mz-004" => Ok(ScenarioId::Shifting),
            "chaos" | "mz-005" => Ok(ScenarioId::Chaos),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for id in ScenarioId::all() {
            assert_eq!(id.name().parse::<ScenarioId>(), Ok(id));
            assert_eq!(id.to_string(), id.name());
        }
    }

    #[test]
    fn test_aliases_and_errors() {
        assert_eq!("MZ-004".parse::<ScenarioId>(), Ok(ScenarioId::Shifting));
        assert_eq!("Dynamic".parse::<ScenarioId>(), Ok(ScenarioId::Shifting));
        assert_eq!(
            "labyrinth".parse::<ScenarioId>(),
            Err("Unknown scenario: labyrinth".to_string())
        );
    }
}
