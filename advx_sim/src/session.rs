//! Session drivers - realtime watch, batch export, and dashboard modes.
//!
//! A session is one configured engine stepped to completion. Watch mode
//! paces steps on a tokio interval and stops on Ctrl-C or a step limit;
//! batch mode runs the same loop as fast as it can. Both write a
//! [`SessionExport`] when an export path is configured.

use crate::exporter::{SessionExport, SessionFrame};

use advx_core::{AttackEngine, AttackKind, DefenseKind, EngineSnapshot};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::info;

/// Configuration for a live or batch session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session seed
    pub seed: u64,

    /// Attack override, engine default when absent
    pub attack: Option<AttackKind>,

    /// Epsilon override, clamped by the engine
    pub epsilon: Option<f64>,

    /// Defenses to force on before the first step
    pub enable_defenses: Vec<DefenseKind>,

    /// Defenses to force off before the first step
    pub disable_defenses: Vec<DefenseKind>,

    /// Milliseconds between watch-mode steps
    pub interval_ms: u64,

    /// Step limit, unbounded watch when absent
    pub steps: Option<u64>,

    /// Where to write the session JSON
    pub export: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            attack: None,
            epsilon: None,
            enable_defenses: Vec::new(),
            disable_defenses: Vec::new(),
            interval_ms: 1500,
            steps: None,
            export: None,
        }
    }
}

impl SessionConfig {
    /// Builds an engine with this configuration applied.
    ///
    /// Disables win over enables when a defense appears in both lists.
    pub fn build_engine(&self) -> AttackEngine {
        let mut engine = AttackEngine::with_seed(self.seed);
        if let Some(attack) = self.attack {
            engine.set_attack(attack);
        }
        if let Some(epsilon) = self.epsilon {
            engine.set_epsilon(epsilon);
        }
        for kind in &self.enable_defenses {
            engine.set_defense(*kind, true);
        }
        for kind in &self.disable_defenses {
            engine.set_defense(*kind, false);
        }
        engine
    }
}

/// Runs a paced session until Ctrl-C or the configured step limit.
pub fn run_watch(config: &SessionConfig) -> io::Result<EngineSnapshot> {
    let mut engine = config.build_engine();
    let mut export = config
        .export
        .as_ref()
        .map(|_| SessionExport::new("watch", config.seed));

    info!(
        "Watch session: seed={} interval={}ms (Ctrl-C to stop)",
        config.seed, config.interval_ms
    );

    let runtime = Runtime::new()?;
    runtime.block_on(async {
        let mut ticker = tokio::time::interval(Duration::from_millis(config.interval_ms.max(1)));
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let result = engine.step();
                    let stats = engine.statistics();
                    info!(
                        "step {:>4} | {:<8} | {} | confidence {:6.2}% | hit rate {:>3}%",
                        result.step,
                        result.attack.name(),
                        if result.success { "HIT " } else { "MISS" },
                        result.confidence,
                        stats.success_rate
                    );
                    if let Some(export) = export.as_mut() {
                        export.add_frame(SessionFrame::from_result(&result, &engine.attacked_nodes()));
                    }
                    if let Some(limit) = config.steps {
                        if engine.attack_count() >= limit {
                            break;
                        }
                    }
                }
                _ = &mut ctrl_c => {
                    info!("Interrupt received, stopping session");
                    break;
                }
            }
        }
    });

    write_export(config, export, &engine)?;
    Ok(engine.snapshot())
}

/// Runs an unpaced session for the configured number of steps.
pub fn run_batch(config: &SessionConfig) -> io::Result<EngineSnapshot> {
    let steps = config.steps.unwrap_or(60);
    let mut engine = config.build_engine();
    let mut export = config
        .export
        .as_ref()
        .map(|_| SessionExport::new("batch", config.seed));

    info!("Batch session: seed={} steps={}", config.seed, steps);
    for _ in 0..steps {
        let result = engine.step();
        if let Some(export) = export.as_mut() {
            export.add_frame(SessionFrame::from_result(&result, &engine.attacked_nodes()));
        }
    }

    let stats = engine.statistics();
    info!(
        "Batch complete: {} steps, {} hits ({}%), final confidence {:.2}%",
        stats.attack_count,
        stats.success_count,
        stats.success_rate,
        engine.confidence()
    );

    write_export(config, export, &engine)?;
    Ok(engine.snapshot())
}

/// Runs a session behind the terminal dashboard.
///
/// The engine steps on a worker thread and streams telemetry over a
/// bounded channel; the dashboard owns the terminal on this thread.
/// The worker exits when the dashboard hangs up or the step limit is
/// reached.
#[cfg(feature = "dashboard")]
pub fn run_dashboard(config: &SessionConfig) -> io::Result<()> {
    use advx_core::dashboard::{AttackDashboard, TelemetryFrame};
    use crossbeam::channel;
    use std::thread;

    let (tx, rx) = channel::bounded(64);
    let worker_config = config.clone();
    let interval = Duration::from_millis(config.interval_ms.max(50));
    let limit = config.steps;

    let worker = thread::spawn(move || {
        let mut engine = worker_config.build_engine();
        loop {
            let result = engine.step();
            let frame = TelemetryFrame::from_result(&result, &engine.statistics());
            if tx.send(frame).is_err() {
                break;
            }
            if let Some(limit) = limit {
                if engine.attack_count() >= limit {
                    break;
                }
            }
            thread::sleep(interval);
        }
    });

    let mut dashboard = AttackDashboard::new(rx);
    dashboard.run()?;
    let _ = worker.join();
    Ok(())
}

fn write_export(
    config: &SessionConfig,
    export: Option<SessionExport>,
    engine: &AttackEngine,
) -> io::Result<()> {
    if let (Some(path), Some(mut export)) = (config.export.as_ref(), export) {
        export.finalize(true, engine.snapshot());
        export.write_to_file(path)?;
        info!("Session written to {}", path.display());
    }
    Ok(())
}
