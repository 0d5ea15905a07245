//! Session statistics derived from engine state.
//!
//! All three figures are display-oriented integers: a percentage of
//! successful attacks, an 8-bit pixel-equivalent perturbation size, and
//! the percentage of attack strength the enabled defenses absorb.

use serde::{Deserialize, Serialize};

/// Aggregate statistics for one simulation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Total steps executed since construction or the last reset
    pub attack_count: u64,
    /// Steps whose draw beat the effectiveness threshold
    pub success_count: u64,
    /// `success_count / attack_count` as a rounded percentage
    pub success_rate: u32,
    /// `epsilon * 255`, rounded to the nearest integer
    pub perturbation: u32,
    /// Rounded percentage of attack strength removed by defenses
    pub defense_effectiveness: u32,
}

/// Rounded success percentage; zero when no attacks have run.
pub fn success_rate(success_count: u64, attack_count: u64) -> u32 {
    if attack_count == 0 {
        return 0;
    }
    (success_count as f64 / attack_count as f64 * 100.0).round() as u32
}

/// Epsilon rescaled to the 8-bit pixel range for display.
pub fn perturbation_norm(epsilon: f64) -> u32 {
    (epsilon * 255.0).round() as u32
}

/// How much of the attack the defense stack removes, as a percentage.
pub fn defense_effect_percent(defense_multiplier: f64) -> u32 {
    ((1.0 - defense_multiplier) * 100.0).round() as u32
}
