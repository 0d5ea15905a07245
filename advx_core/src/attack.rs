//! Attack identities and their static profiles.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Attack identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackKind {
    /// Fast Gradient Sign Method: weak but single-step
    Fgsm,

    /// Projected Gradient Descent: iterative, stronger
    Pgd,

    /// Carlini & Wagner: optimization-based, near-certain
    Cw,

    /// DeepFool: minimal perturbation toward the decision boundary
    DeepFool,
}

/// Static per-attack constants driving the simulation model.
///
/// `base_success_rate` values match the original backend's rate table;
/// `base_confidence_drop` encodes the weak-but-fast vs. strong-but-slow
/// trade-off in confidence points per successful step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackProfile {
    /// Display name used in log lines and tables
    pub name: &'static str,

    /// Probability scale of a step succeeding, in (0, 1]
    pub base_success_rate: f64,

    /// Confidence points removed by an unmitigated success
    pub base_confidence_drop: f64,

    /// Relative cost class, display only
    pub speed: SpeedClass,
}

/// Coarse cost classification of an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedClass {
    Fast,
    Moderate,
    Slow,
}

const FGSM: AttackProfile = AttackProfile {
    name: "FGSM",
    base_success_rate: 0.85,
    base_confidence_drop: 12.0,
    speed: SpeedClass::Fast,
};

const PGD: AttackProfile = AttackProfile {
    name: "PGD",
    base_success_rate: 0.92,
    base_confidence_drop: 18.0,
    speed: SpeedClass::Moderate,
};

const CW: AttackProfile = AttackProfile {
    name: "C&W",
    base_success_rate: 0.96,
    base_confidence_drop: 25.0,
    speed: SpeedClass::Slow,
};

const DEEPFOOL: AttackProfile = AttackProfile {
    name: "DeepFool",
    base_success_rate: 0.89,
    base_confidence_drop: 15.0,
    speed: SpeedClass::Moderate,
};

impl AttackKind {
    /// Returns all attacks in fixed display order.
    pub fn all() -> Vec<AttackKind> {
        vec![
            AttackKind::Fgsm,
            AttackKind::Pgd,
            AttackKind::Cw,
            AttackKind::DeepFool,
        ]
    }

    /// Returns the wire identifier.
    pub fn name(&self) -> &'static str {
        match self {
            AttackKind::Fgsm => "fgsm",
            AttackKind::Pgd => "pgd",
            AttackKind::Cw => "cw",
            AttackKind::DeepFool => "deepfool",
        }
    }

    /// Returns the display name.
    pub fn label(&self) -> &'static str {
        self.profile().name
    }

    /// Returns a one-line description.
    pub fn description(&self) -> &'static str {
        match self {
            AttackKind::Fgsm => "single sign-gradient step, fast and cheap",
            AttackKind::Pgd => "iterative gradient steps projected into the epsilon ball",
            AttackKind::Cw => "optimization-based minimal distortion, slow but near-certain",
            AttackKind::DeepFool => "iterative walk to the nearest decision boundary",
        }
    }

    /// Returns the static profile for this attack.
    pub fn profile(&self) -> &'static AttackProfile {
        match self {
            AttackKind::Fgsm => &FGSM,
            AttackKind::Pgd => &PGD,
            AttackKind::Cw => &CW,
            AttackKind::DeepFool => &DEEPFOOL,
        }
    }
}

impl std::fmt::Display for AttackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for AttackKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fgsm" => Ok(AttackKind::Fgsm),
            "pgd" => Ok(AttackKind::Pgd),
            "cw" | "c&w" | "carlini-wagner" => Ok(AttackKind::Cw),
            "deepfool" | "deep_fool" => Ok(AttackKind::DeepFool),
            other => Err(EngineError::unknown_attack(other)),
        }
    }
}
