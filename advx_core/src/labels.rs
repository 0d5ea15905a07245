//! Synthetic classifier output.
//!
//! The simulation never runs a model; it fabricates plausible-looking
//! classification results from the deterministic hash. The vocabulary
//! leads with the panda/gibbon/macaque trio of the classic FGSM demo.

use serde::{Deserialize, Serialize};

use crate::rng;

/// Fixed label vocabulary for the pretend classifier.
pub const VOCABULARY: [&str; 10] = [
    "panda",
    "gibbon",
    "macaque",
    "capuchin",
    "mandrill",
    "lemur",
    "marmoset",
    "baboon",
    "orangutan",
    "tamarin",
];

/// Share of the non-top probability mass assigned to each alternative.
/// The ranges `w * [0.9, 1.1]` are pairwise disjoint, so jittered shares
/// stay strictly descending.
const ALT_WEIGHTS: [f64; 4] = [0.45, 0.22, 0.13, 0.08];

/// One label with its confidence, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub confidence: f64,
}

/// A synthetic classification: top label plus four runners-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Top-1 label
    pub label: String,

    /// Top-1 confidence in percent
    pub confidence: f64,

    /// Four alternatives with strictly descending confidences, all
    /// below the top
    pub alternatives: Vec<LabelScore>,

    /// Whether this prediction was generated under attack
    pub adversarial: bool,
}

impl Prediction {
    /// Returns the full ranked list, top first, for chart consumption.
    pub fn ranked(&self) -> Vec<LabelScore> {
        let mut out = Vec::with_capacity(1 + self.alternatives.len());
        out.push(LabelScore {
            label: self.label.clone(),
            confidence: self.confidence,
        });
        out.extend(self.alternatives.iter().cloned());
        out
    }
}

/// Generates a synthetic prediction from a seed.
///
/// The top label comes from `index_hash(seed)`, its confidence from a
/// band drawn at `seed + 1` ([85, 99) clean, [20, 70) adversarial).
/// Alternatives are the next four vocabulary entries cyclically, with
/// confidences carved as jittered shares (`seed + 2 + k`) out of the
/// mass left below the top.
pub fn predict(seed: f64, adversarial: bool) -> Prediction {
    let idx = rng::index_hash(seed, VOCABULARY.len());
    let confidence = if adversarial {
        rng::range_hash(seed + 1.0, 20.0, 70.0)
    } else {
        rng::range_hash(seed + 1.0, 85.0, 99.0)
    };

    // Bounding the mass by the top confidence keeps every alternative
    // below the top even at the low end of the adversarial band.
    let mass = (100.0 - confidence).min(confidence);
    let alternatives = ALT_WEIGHTS
        .iter()
        .enumerate()
        .map(|(k, weight)| {
            let jitter = 0.9 + 0.2 * rng::unit_hash(seed + 2.0 + k as f64);
            LabelScore {
                label: VOCABULARY[(idx + k + 1) % VOCABULARY.len()].to_string(),
                confidence: mass * weight * jitter,
            }
        })
        .collect();

    Prediction {
        label: VOCABULARY[idx].to_string(),
        confidence,
        alternatives,
        adversarial,
    }
}
