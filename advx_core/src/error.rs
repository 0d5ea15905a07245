//! Error types for the engine's parse boundary.
//!
//! Engine operations themselves are total (inputs are clamped or made
//! unrepresentable by the enums); errors only exist where strings enter
//! the system.

use thiserror::Error;

/// Errors produced when mapping external names onto engine identities.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The name does not match any known attack.
    #[error("unknown attack '{0}' (expected one of: fgsm, pgd, cw, deepfool)")]
    UnknownAttack(String),

    /// The name does not match any known defense.
    #[error("unknown defense '{0}' (expected one of: adversarial_training, input_preprocessing, defensive_distillation, feature_squeezing)")]
    UnknownDefense(String),
}

impl EngineError {
    /// Creates an unknown-attack error.
    pub fn unknown_attack(name: impl Into<String>) -> Self {
        Self::UnknownAttack(name.into())
    }

    /// Creates an unknown-defense error.
    pub fn unknown_defense(name: impl Into<String>) -> Self {
        Self::UnknownDefense(name.into())
    }
}
