//! Session exporter - writes attack sessions to JSON for offline replay.
//!
//! An export is a frame per engine step plus an optional full snapshot
//! of the final state. Everything in it is reproducible from the seed
//! alone, so the file doubles as a regression fixture: re-run the seed,
//! re-export, diff.

use advx_core::{AttackKind, AttackResult, EngineSnapshot, NodeRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One engine step, flattened for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionFrame {
    /// Step index (1-based)
    pub step: u64,

    /// Confidence after the step
    pub confidence: f64,

    /// Whether the step beat the effectiveness threshold
    pub success: bool,

    /// Attack active during the step
    pub attack: AttackKind,

    /// Perturbation budget during the step
    pub epsilon: f64,

    /// Highlighted network nodes after the step
    pub attacked_nodes: Vec<NodeRef>,
}

impl SessionFrame {
    /// Builds a frame from a step result and the node set it produced.
    pub fn from_result(result: &AttackResult, attacked: &BTreeSet<NodeRef>) -> Self {
        Self {
            step: result.step,
            confidence: result.confidence,
            success: result.success,
            attack: result.attack,
            epsilon: result.epsilon,
            attacked_nodes: attacked.iter().copied().collect(),
        }
    }
}

/// A complete recorded session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExport {
    /// Scenario or mode that produced the session
    pub scenario: String,

    /// Seed the session ran under
    pub seed: u64,

    /// Highest step index recorded
    pub steps: u64,

    /// Per-step frames, oldest first
    pub frames: Vec<SessionFrame>,

    /// Whether the session completed without a failed check
    pub passed: bool,

    /// Full engine state at the end of the session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_snapshot: Option<EngineSnapshot>,
}

impl SessionExport {
    /// Creates an empty export.
    pub fn new(scenario: impl Into<String>, seed: u64) -> Self {
        Self {
            scenario: scenario.into(),
            seed,
            steps: 0,
            frames: Vec::new(),
            passed: true,
            final_snapshot: None,
        }
    }

    /// Appends a frame and advances the recorded step count.
    pub fn add_frame(&mut self, frame: SessionFrame) {
        self.steps = frame.step;
        self.frames.push(frame);
    }

    /// Records the outcome and final engine state.
    pub fn finalize(&mut self, passed: bool, snapshot: EngineSnapshot) {
        self.passed = passed;
        self.final_snapshot = Some(snapshot);
    }

    /// Writes the export as pretty-printed JSON.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
