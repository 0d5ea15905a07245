//! AdversarialX Attack-Session Harness
//!
//! This crate drives the deterministic attack engine through scripted
//! scenarios and live sessions, and records the transcripts.
//!
//! # Core Principle: One Seed In, One Transcript Out
//!
//! Every mode starts from a single 64-bit seed and a declarative
//! configuration:
//! - **Scenarios**: Scripted runs (ATK-001..005) that check the
//!   engine's published invariants from the outside
//! - **Sessions**: Watch, batch, and dashboard modes that step one
//!   configured engine and optionally export every frame as JSON
//! - **Replay**: Re-running a seed reproduces the transcript exactly,
//!   so exports double as regression fixtures
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       advx-sim CLI                       │
//! │  ┌────────────────┐  ┌──────────────┐  ┌──────────────┐  │
//! │  │ ScenarioRunner │  │ Watch/Batch  │  │  Dashboard   │  │
//! │  │  ATK-001..005  │  │   Session    │  │  (feature)   │  │
//! │  └───────┬────────┘  └──────┬───────┘  └──────┬───────┘  │
//! │          │                  │                 │          │
//! │  ┌───────▼──────────────────▼─────────────────▼───────┐  │
//! │  │              advx_core::AttackEngine               │  │
//! │  │        (trig-hash PRNG, replayable session)        │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use advx_sim::ScenarioRunner;
//! use advx_sim::scenarios::ScenarioId;
//!
//! let result = ScenarioRunner::new(42).with_steps(10).run(ScenarioId::Baseline);
//! assert!(result.passed);
//! ```

mod exporter;
mod runner;
mod session;
pub mod scenarios;

pub use exporter::{SessionExport, SessionFrame};
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
#[cfg(feature = "dashboard")]
pub use session::run_dashboard;
pub use session::{run_batch, run_watch, SessionConfig};
