//! Scenario runner - executes deterministic attack-session scenarios.
//!
//! Each scenario drives one or more engines through a scripted
//! configuration and checks the engine's published invariants from the
//! outside: bounds, counter identities, buffer caps, defense-stacking
//! monotonicity, and replay equality. A scenario fails on the first
//! violated check and reports why.

use crate::scenarios::ScenarioId;

use advx_core::{AttackEngine, AttackKind, DefenseKind};
use tracing::{debug, info};

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether the scenario passed all checks
    pub passed: bool,

    /// Total engine steps executed
    pub steps_run: u64,

    /// Confidence of the last engine at the end of the run
    pub final_confidence: f64,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during the run
    pub metrics: ScenarioMetrics,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default)]
pub struct ScenarioMetrics {
    /// Total attack steps across all engines in the run
    pub attacks: u64,

    /// Steps that beat the effectiveness threshold
    pub hits: u64,

    /// Rounded hit percentage
    pub success_rate: u32,

    /// Lowest confidence observed during the run
    pub min_confidence: f64,

    /// Highest confidence observed during the run
    pub max_confidence: f64,
}

/// Tracks observed confidence extremes and hit counts across a run.
#[derive(Debug, Clone)]
struct MetricsTracker {
    attacks: u64,
    hits: u64,
    min_confidence: f64,
    max_confidence: f64,
}

impl MetricsTracker {
    fn new() -> Self {
        Self {
            attacks: 0,
            hits: 0,
            min_confidence: f64::INFINITY,
            max_confidence: f64::NEG_INFINITY,
        }
    }

    fn observe(&mut self, confidence: f64, success: bool) {
        self.attacks += 1;
        if success {
            self.hits += 1;
        }
        self.min_confidence = self.min_confidence.min(confidence);
        self.max_confidence = self.max_confidence.max(confidence);
    }

    fn into_metrics(self) -> ScenarioMetrics {
        let success_rate = if self.attacks == 0 {
            0
        } else {
            (self.hits as f64 / self.attacks as f64 * 100.0).round() as u32
        };
        ScenarioMetrics {
            attacks: self.attacks,
            hits: self.hits,
            success_rate,
            min_confidence: if self.min_confidence.is_finite() {
                self.min_confidence
            } else {
                0.0
            },
            max_confidence: if self.max_confidence.is_finite() {
                self.max_confidence
            } else {
                0.0
            },
        }
    }
}

/// Checks the always-true engine invariants.
fn check_invariants(engine: &AttackEngine) -> Result<(), String> {
    let confidence = engine.confidence();
    if !(5.0..=100.0).contains(&confidence) {
        return Err(format!("confidence {:.4} outside [5, 100]", confidence));
    }
    let epsilon = engine.epsilon();
    if !(0.001..=0.1).contains(&epsilon) {
        return Err(format!("epsilon {:.6} outside [0.001, 0.1]", epsilon));
    }
    if engine.success_count() > engine.attack_count() {
        return Err(format!(
            "success count {} exceeds attack count {}",
            engine.success_count(),
            engine.attack_count()
        ));
    }
    if engine.confidence_history().len() > 60 {
        return Err(format!(
            "history length {} exceeds capacity 60",
            engine.confidence_history().len()
        ));
    }
    if engine.attack_log().len() > 12 {
        return Err(format!(
            "log length {} exceeds capacity 12",
            engine.attack_log().len()
        ));
    }
    Ok(())
}

/// Checks the published success-rate identity.
fn check_statistics_identity(engine: &AttackEngine) -> Result<(), String> {
    let stats = engine.statistics();
    let expected = if stats.attack_count == 0 {
        0
    } else {
        (stats.success_count as f64 / stats.attack_count as f64 * 100.0).round() as u32
    };
    if stats.success_rate != expected {
        return Err(format!(
            "success rate {} does not match {}/{} attacks",
            stats.success_rate, stats.success_count, stats.attack_count
        ));
    }
    Ok(())
}

/// Runs attack-session scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Steps per engine run
    steps: u64,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self { seed, steps: 60 }
    }

    /// Sets the steps per engine run.
    pub fn with_steps(mut self, steps: u64) -> Self {
        self.steps = steps.max(1);
        self
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);

        match scenario {
            ScenarioId::Baseline => self.run_baseline(),
            ScenarioId::EpsilonSweep => self.run_epsilon_sweep(),
            ScenarioId::DefenseMatrix => self.run_defense_matrix(),
            ScenarioId::AttackSweep => self.run_attack_sweep(),
            ScenarioId::Endurance => self.run_endurance(),
        }
    }

    /// ATK-001: Baseline - default configuration soak.
    ///
    /// Bounds, counter, and statistics identities must hold after every
    /// step of an unmodified engine.
    fn run_baseline(&self) -> ScenarioResult {
        info!("ATK-001: Baseline - default config soak");

        let mut engine = AttackEngine::with_seed(self.seed);
        let mut tracker = MetricsTracker::new();
        let mut failure: Option<String> = None;

        for step in 1..=self.steps {
            let result = engine.step();
            tracker.observe(result.confidence, result.success);

            if let Err(reason) = check_invariants(&engine)
                .and_then(|_| check_statistics_identity(&engine))
            {
                failure = Some(format!("step {}: {}", step, reason));
                break;
            }
            if engine.attack_count() != step {
                failure = Some(format!(
                    "step {}: attack count is {}",
                    step,
                    engine.attack_count()
                ));
                break;
            }

            if step % 20 == 0 {
                debug!(
                    "  step {:>3} | confidence {:6.2}% | hits {}",
                    step,
                    engine.confidence(),
                    engine.success_count()
                );
            }
        }

        let passed = failure.is_none();
        info!(
            "Baseline complete: {} steps, final confidence {:.2}%",
            engine.attack_count(),
            engine.confidence()
        );

        ScenarioResult {
            scenario: ScenarioId::Baseline,
            seed: self.seed,
            passed,
            steps_run: engine.attack_count(),
            final_confidence: engine.confidence(),
            failure_reason: failure,
            metrics: tracker.into_metrics(),
        }
    }

    /// ATK-002: EpsilonSweep - staged epsilon values.
    ///
    /// The stored epsilon must equal the clamped value after every
    /// write, including far out-of-range and non-finite input.
    fn run_epsilon_sweep(&self) -> ScenarioResult {
        info!("ATK-002: EpsilonSweep - staged epsilon writes");

        // (written value, expected stored value)
        let stages: &[(f64, f64)] = &[
            (0.03, 0.03),
            (0.001, 0.001),
            (0.0005, 0.001),
            (0.05, 0.05),
            (999.0, 0.1),
            (-5.0, 0.001),
            (0.07, 0.07),
            (0.1, 0.1),
        ];

        let mut engine = AttackEngine::with_seed(self.seed);
        let mut tracker = MetricsTracker::new();
        let mut failure: Option<String> = None;

        'stages: for &(written, expected) in stages {
            engine.set_epsilon(written);
            if (engine.epsilon() - expected).abs() > 1e-12 {
                failure = Some(format!(
                    "set_epsilon({}) stored {:.6}, expected {:.6}",
                    written,
                    engine.epsilon(),
                    expected
                ));
                break;
            }

            for _ in 0..5 {
                let result = engine.step();
                tracker.observe(result.confidence, result.success);
                if let Err(reason) = check_invariants(&engine) {
                    failure = Some(format!("epsilon {}: {}", written, reason));
                    break 'stages;
                }
            }
            debug!(
                "  epsilon {:>7} -> stored {:.3} | confidence {:6.2}%",
                written,
                engine.epsilon(),
                engine.confidence()
            );
        }

        // Non-finite writes must leave the stored value untouched.
        if failure.is_none() {
            let before = engine.epsilon();
            engine.set_epsilon(f64::NAN);
            engine.set_epsilon(f64::INFINITY);
            engine.set_epsilon(f64::NEG_INFINITY);
            if engine.epsilon() != before {
                failure = Some(format!(
                    "non-finite write changed epsilon from {} to {}",
                    before,
                    engine.epsilon()
                ));
            }
        }

        let passed = failure.is_none();
        info!(
            "EpsilonSweep complete: {} writes, {} steps",
            stages.len() + 3,
            engine.attack_count()
        );

        ScenarioResult {
            scenario: ScenarioId::EpsilonSweep,
            seed: self.seed,
            passed,
            steps_run: engine.attack_count(),
            final_confidence: engine.confidence(),
            failure_reason: failure,
            metrics: tracker.into_metrics(),
        }
    }

    /// ATK-003: DefenseMatrix - all 16 defense subsets.
    ///
    /// The stacked multiplier must stay within [0.1, 1], never increase
    /// when a defense is added, and sit strictly below 1 with all four
    /// enabled.
    fn run_defense_matrix(&self) -> ScenarioResult {
        info!("ATK-003: DefenseMatrix - 16 defense subsets");

        let kinds = DefenseKind::all();
        let mut multipliers = [0.0f64; 16];
        let mut tracker = MetricsTracker::new();
        let mut failure: Option<String> = None;
        let mut steps_run = 0u64;
        let mut final_confidence = 0.0;

        'masks: for mask in 0..16usize {
            let mut engine = AttackEngine::with_seed(self.seed);
            for (bit, kind) in kinds.iter().enumerate() {
                engine.set_defense(*kind, mask & (1 << bit) != 0);
            }

            let multiplier = engine.defense_multiplier();
            if !(0.1..=1.0).contains(&multiplier) {
                failure = Some(format!(
                    "subset {:04b}: multiplier {:.6} outside [0.1, 1]",
                    mask, multiplier
                ));
                break;
            }
            multipliers[mask] = multiplier;

            // Exercise the subset for a few steps.
            for _ in 0..3 {
                let result = engine.step();
                tracker.observe(result.confidence, result.success);
                steps_run += 1;
                if let Err(reason) = check_invariants(&engine) {
                    failure = Some(format!("subset {:04b}: {}", mask, reason));
                    break 'masks;
                }
            }
            final_confidence = engine.confidence();
            debug!("  subset {:04b} | multiplier {:.4}", mask, multiplier);
        }

        if failure.is_none() {
            // Adding a defense never raises the multiplier.
            for mask in 0..16usize {
                for bit in 0..4usize {
                    if mask & (1 << bit) == 0 {
                        let bigger = mask | (1 << bit);
                        if multipliers[bigger] > multipliers[mask] {
                            failure = Some(format!(
                                "multiplier rose from {:.6} to {:.6} when adding {} to {:04b}",
                                multipliers[mask],
                                multipliers[bigger],
                                kinds[bit].name(),
                                mask
                            ));
                        }
                    }
                }
            }
            if failure.is_none() && multipliers[15] >= multipliers[0] {
                failure = Some(format!(
                    "all four defenses ({:.6}) not strictly below none ({:.6})",
                    multipliers[15], multipliers[0]
                ));
            }
        }

        let passed = failure.is_none();
        info!(
            "DefenseMatrix complete: multipliers {:.4} (none) .. {:.4} (all four)",
            multipliers[0], multipliers[15]
        );

        ScenarioResult {
            scenario: ScenarioId::DefenseMatrix,
            seed: self.seed,
            passed,
            steps_run,
            final_confidence,
            failure_reason: failure,
            metrics: tracker.into_metrics(),
        }
    }

    /// ATK-004: AttackSweep - every attack from a fresh engine.
    ///
    /// Each attack runs twice from the same seed; the two runs must
    /// replay identically.
    fn run_attack_sweep(&self) -> ScenarioResult {
        info!("ATK-004: AttackSweep - replay equality per attack");

        let mut tracker = MetricsTracker::new();
        let mut failure: Option<String> = None;
        let mut steps_run = 0u64;
        let mut final_confidence = 0.0;

        'attacks: for attack in AttackKind::all() {
            let mut first = AttackEngine::with_seed(self.seed);
            let mut second = AttackEngine::with_seed(self.seed);
            first.set_attack(attack);
            second.set_attack(attack);

            for _ in 0..self.steps {
                let a = first.step();
                let b = second.step();
                tracker.observe(a.confidence, a.success);
                steps_run += 1;

                if a != b {
                    failure = Some(format!(
                        "{}: replay diverged at step {}",
                        attack.name(),
                        a.step
                    ));
                    break 'attacks;
                }
                if let Err(reason) = check_invariants(&first) {
                    failure = Some(format!("{}: {}", attack.name(), reason));
                    break 'attacks;
                }
            }

            if first.confidence_history() != second.confidence_history()
                || first.attacked_nodes() != second.attacked_nodes()
            {
                failure = Some(format!("{}: final state diverged", attack.name()));
                break;
            }

            final_confidence = first.confidence();
            debug!(
                "  {:width$} | final confidence {:6.2}% | hits {}",
                attack.name(),
                first.confidence(),
                first.success_count(),
                width = 8
            );
        }

        let passed = failure.is_none();
        info!("AttackSweep complete: {} steps across 4 attacks", steps_run);

        ScenarioResult {
            scenario: ScenarioId::AttackSweep,
            seed: self.seed,
            passed,
            steps_run,
            final_confidence,
            failure_reason: failure,
            metrics: tracker.into_metrics(),
        }
    }

    /// ATK-005: Endurance - 500-step run.
    ///
    /// History must pin at 60 entries with the oldest retained step
    /// equal to `attack_count - 59`; the log stays within capacity and
    /// the counters stay monotone.
    fn run_endurance(&self) -> ScenarioResult {
        info!("ATK-005: Endurance - long-run buffer caps");

        let target = self.steps.max(500);
        let mut engine = AttackEngine::with_seed(self.seed);
        let mut tracker = MetricsTracker::new();
        let mut failure: Option<String> = None;
        let mut last_success_count = 0u64;

        for step in 1..=target {
            let result = engine.step();
            tracker.observe(result.confidence, result.success);

            if engine.attack_count() != step {
                failure = Some(format!(
                    "step {}: attack count is {}",
                    step,
                    engine.attack_count()
                ));
                break;
            }
            if engine.success_count() < last_success_count {
                failure = Some(format!("step {}: success count decreased", step));
                break;
            }
            last_success_count = engine.success_count();

            if let Err(reason) = check_invariants(&engine) {
                failure = Some(format!("step {}: {}", step, reason));
                break;
            }
        }

        if failure.is_none() {
            let history = engine.confidence_history();
            if history.len() != 60 {
                failure = Some(format!("history length {} after {} steps", history.len(), target));
            } else if history[0].step != engine.attack_count() - 59 {
                failure = Some(format!(
                    "oldest retained step {} != attack count {} - 59",
                    history[0].step,
                    engine.attack_count()
                ));
            }
        }

        let passed = failure.is_none();
        info!(
            "Endurance complete: {} steps, {} hits, history pinned at {}",
            engine.attack_count(),
            engine.success_count(),
            engine.confidence_history().len()
        );

        ScenarioResult {
            scenario: ScenarioId::Endurance,
            seed: self.seed,
            passed,
            steps_run: engine.attack_count(),
            final_confidence: engine.confidence(),
            failure_reason: failure,
            metrics: tracker.into_metrics(),
        }
    }
}
