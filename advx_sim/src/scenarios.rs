//! Deterministic attack-session scenarios.

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// ATK-001: Default configuration soak with invariant checks
    Baseline,

    /// ATK-002: Staged epsilon values including out-of-range writes
    EpsilonSweep,

    /// ATK-003: All 16 defense subsets, multiplier monotonicity
    DefenseMatrix,

    /// ATK-004: Every attack from a fresh engine, replay equality
    AttackSweep,

    /// ATK-005: 500-step run, buffer caps and counter monotonicity
    Endurance,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Baseline,
            ScenarioId::EpsilonSweep,
            ScenarioId::DefenseMatrix,
            ScenarioId::AttackSweep,
            ScenarioId::Endurance,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Baseline => "baseline",
            ScenarioId::EpsilonSweep => "epsilon_sweep",
            ScenarioId::DefenseMatrix => "defense_matrix",
            ScenarioId::AttackSweep => "attack_sweep",
            ScenarioId::Endurance => "endurance",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Baseline => "Default config for N steps; bounds and statistics identities",
            ScenarioId::EpsilonSweep => "Staged epsilon values incl. out-of-range; stored value always clamped",
            ScenarioId::DefenseMatrix => "All 16 defense subsets; multiplier floor and monotonicity",
            ScenarioId::AttackSweep => "Each attack from a fresh engine; identical re-run replays identically",
            ScenarioId::Endurance => "500 steps; history pinned at 60, log bounded, counters monotone",
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
            "baseline" | "atk-001" => Ok(ScenarioId::Baseline),
            "epsilon_sweep" | "epsilonsweep" | "atk-002" => Ok(ScenarioId::EpsilonSweep),
            "defense_matrix" | "defensematrix" | "atk-003" => Ok(ScenarioId::DefenseMatrix),
            "attack_sweep" | "attacksweep" | "atk-004" => Ok(ScenarioId::AttackSweep),
            "endurance" | "atk-005" => Ok(ScenarioId::Endurance),
            _ => Err(format!(
                "Unknown scenario: {} (expected one of: baseline, epsilon_sweep, defense_matrix, attack_sweep, endurance)",
                s
            )),
        }
    }
}
