//! Defense identities, static profiles, and the stacking model.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Fraction of a defense's effectiveness that applies per stacking step.
/// Stacking is multiplicative, so additional defenses help less and less.
pub const DEFENSE_STACK_FACTOR: f64 = 0.4;

/// Lower bound on the stacked multiplier: defenses mitigate attacks but
/// never fully neutralize them.
pub const DEFENSE_MULTIPLIER_FLOOR: f64 = 0.1;

/// Defense identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseKind {
    /// Retraining on adversarial examples
    AdversarialTraining,

    /// Denoising / transformation of inputs before inference
    InputPreprocessing,

    /// Temperature-softened distillation of the model
    DefensiveDistillation,

    /// Bit-depth reduction and smoothing of input features
    FeatureSqueezing,
}

/// Static per-defense constants.
///
/// Effectiveness and overhead come from the original backend's defense
/// table; overhead is inference latency cost in milliseconds, display
/// only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefenseProfile {
    /// Display name
    pub name: &'static str,

    /// Base mitigation strength in (0, 1)
    pub effectiveness: f64,

    /// Added inference latency in ms, display only
    pub overhead_ms: f64,

    /// Whether a fresh session starts with this defense enabled
    pub enabled_by_default: bool,
}

const ADVERSARIAL_TRAINING: DefenseProfile = DefenseProfile {
    name: "Adversarial Training",
    effectiveness: 0.78,
    overhead_ms: 2.3,
    enabled_by_default: false,
};

const INPUT_PREPROCESSING: DefenseProfile = DefenseProfile {
    name: "Input Preprocessing",
    effectiveness: 0.45,
    overhead_ms: 0.5,
    enabled_by_default: true,
};

const DEFENSIVE_DISTILLATION: DefenseProfile = DefenseProfile {
    name: "Defensive Distillation",
    effectiveness: 0.62,
    overhead_ms: 1.8,
    enabled_by_default: false,
};

const FEATURE_SQUEEZING: DefenseProfile = DefenseProfile {
    name: "Feature Squeezing",
    effectiveness: 0.55,
    overhead_ms: 0.8,
    enabled_by_default: true,
};

impl DefenseKind {
    /// Returns all defenses in fixed display order.
    pub fn all() -> Vec<DefenseKind> {
        vec![
            DefenseKind::AdversarialTraining,
            DefenseKind::InputPreprocessing,
            DefenseKind::DefensiveDistillation,
            DefenseKind::FeatureSqueezing,
        ]
    }

    /// Returns the wire identifier.
    pub fn name(&self) -> &'static str {
        match self {
            DefenseKind::AdversarialTraining => "adversarial_training",
            DefenseKind::InputPreprocessing => "input_preprocessing",
            DefenseKind::DefensiveDistillation => "defensive_distillation",
            DefenseKind::FeatureSqueezing => "feature_squeezing",
        }
    }

    /// Returns the display name.
    pub fn label(&self) -> &'static str {
        self.profile().name
    }

    /// Returns the static profile for this defense.
    pub fn profile(&self) -> &'static DefenseProfile {
        match self {
            DefenseKind::AdversarialTraining => &ADVERSARIAL_TRAINING,
            DefenseKind::InputPreprocessing => &INPUT_PREPROCESSING,
            DefenseKind::DefensiveDistillation => &DEFENSIVE_DISTILLATION,
            DefenseKind::FeatureSqueezing => &FEATURE_SQUEEZING,
        }
    }

    /// Index into the engine's enabled-flags array. Matches the `all()`
    /// order.
    pub(crate) fn index(&self) -> usize {
        match self {
            DefenseKind::AdversarialTraining => 0,
            DefenseKind::InputPreprocessing => 1,
            DefenseKind::DefensiveDistillation => 2,
            DefenseKind::FeatureSqueezing => 3,
        }
    }
}

impl std::fmt::Display for DefenseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DefenseKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "adversarial_training" | "adversarialtraining" => Ok(DefenseKind::AdversarialTraining),
            "input_preprocessing" | "inputpreprocessing" => Ok(DefenseKind::InputPreprocessing),
            "defensive_distillation" | "defensivedistillation" => {
                Ok(DefenseKind::DefensiveDistillation)
            }
            "feature_squeezing" | "featuresqueezing" => Ok(DefenseKind::FeatureSqueezing),
            other => Err(EngineError::unknown_defense(other)),
        }
    }
}

/// Computes the attack multiplier for a set of enabled defenses.
///
/// Starts at 1.0 and multiplies in `(1 - effectiveness * 0.4)` per
/// enabled defense, floored at [`DEFENSE_MULTIPLIER_FLOOR`]. Lower means
/// stronger mitigation; 1.0 means undefended.
pub fn stacked_multiplier<I>(enabled: I) -> f64
where
    I: IntoIterator<Item = DefenseKind>,
{
    let product = enabled.into_iter().fold(1.0, |m, kind| {
        m * (1.0 - kind.profile().effectiveness * DEFENSE_STACK_FACTOR)
    });
    product.max(DEFENSE_MULTIPLIER_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_all_covers_every_defense() {
        let all = DefenseKind::all();
        assert_eq!(all.len(), 4);
        for (i, kind) in all.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_default_enabled_set() {
        let defaults: Vec<DefenseKind> = DefenseKind::all()
            .into_iter()
            .filter(|k| k.profile().enabled_by_default)
            .collect();
        assert_eq!(
            defaults,
            vec![DefenseKind::InputPreprocessing, DefenseKind::FeatureSqueezing]
        );
    }

    #[test]
    fn test_name_roundtrip() {
        for kind in DefenseKind::all() {
            let parsed: DefenseKind = kind.name().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        // camelCase ids from the original frontend parse too
        assert_eq!(
            "adversarialTraining".parse::<DefenseKind>().unwrap(),
            DefenseKind::AdversarialTraining
        );
    }

    #[test]
    fn test_parse_unknown_rejected() {
        let err = "firewall".parse::<DefenseKind>().unwrap_err();
        assert_eq!(err, EngineError::UnknownDefense("firewall".to_string()));
    }

    #[test]
    fn test_multiplier_golden_values() {
        assert_relative_eq!(stacked_multiplier([]), 1.0);
        // Default pair: (1 - 0.45*0.4) * (1 - 0.55*0.4)
        assert_relative_eq!(
            stacked_multiplier([DefenseKind::InputPreprocessing, DefenseKind::FeatureSqueezing]),
            0.6396,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            stacked_multiplier(DefenseKind::all()),
            0.3309136896,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_multiplier_monotone_under_inclusion() {
        // Adding any defense to any subset never raises the multiplier.
        let all = DefenseKind::all();
        for bits in 0u32..16 {
            let subset: Vec<DefenseKind> = all
                .iter()
                .copied()
                .enumerate()
                .filter(|(i, _)| bits & (1 << i) != 0)
                .map(|(_, k)| k)
                .collect();
            let base = stacked_multiplier(subset.clone());
            assert!(base >= DEFENSE_MULTIPLIER_FLOOR && base <= 1.0);
            for extra in all.iter().copied() {
                if subset.contains(&extra) {
                    continue;
                }
                let mut grown = subset.clone();
                grown.push(extra);
                assert!(stacked_multiplier(grown) <= base);
            }
        }
        // And the full stack is strictly better than nothing.
        assert!(stacked_multiplier(all) < stacked_multiplier([]));
    }
}
