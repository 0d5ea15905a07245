//! AdversarialX simulation engine.
//!
//! A deterministic, seeded simulation of adversarial machine-learning
//! attacks (FGSM, PGD, C&W, DeepFool) against a conceptual image
//! classifier. The engine maps a configuration of attack, perturbation
//! budget, and enabled defenses to a synthetic confidence trajectory,
//! success/failure outcomes, and a perturbed-node set for a fabricated
//! network diagram. No real inference and no gradients: the numeric
//! model stands in for adversarial ML.
//!
//! # Core Principle: Replayable Sessions
//!
//! All entropy derives from a single integer seed threaded through a
//! trigonometric hash ([`rng::unit_hash`]). Two engines built from the
//! same seed and driven through the same operations produce identical
//! trajectories, predictions, logs, and node sets. There is no hidden
//! clock and no global state; each [`AttackEngine`] is an independent
//! session owned by its caller.
//!
//! # Usage
//!
//! ```
//! use advx_core::{AttackEngine, AttackKind};
//!
//! let mut engine = AttackEngine::new();
//! engine.set_attack(AttackKind::Pgd);
//! let result = engine.step();
//! assert!(result.confidence < 97.2);
//! ```

pub mod attack;
pub mod defense;
pub mod engine;
pub mod error;
pub mod labels;
pub mod metrics;
pub mod rng;
pub mod visualization;

#[cfg(feature = "dashboard")]
pub mod dashboard;

pub use attack::{AttackKind, AttackProfile, SpeedClass};
pub use defense::{stacked_multiplier, DefenseKind, DefenseProfile};
pub use engine::{
    AttackEngine, AttackResult, DefenseMetric, EngineSnapshot, HistoryPoint, LogEntry,
    Severity,
};
pub use error::EngineError;
pub use labels::{predict, LabelScore, Prediction};
pub use metrics::SessionStats;
pub use visualization::{
    model_architecture, ArchLayer, Frame, NetworkView, NodeRef, NodeView,
};
