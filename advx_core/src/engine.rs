//! The attack simulation engine.
//!
//! One `AttackEngine` instance is one session: a seed counter, the
//! current confidence of the pretend classifier, the active attack and
//! defense configuration, and the bounded history/log buffers. Every
//! observable number flows from the seed counter through `unit_hash`,
//! so a session replays bit-for-bit from its construction seed.
//!
//! The engine does no I/O and never logs; callers own it outright and
//! read state through owned snapshots.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::attack::AttackKind;
use crate::defense::{self, DefenseKind};
use crate::labels::{self, Prediction};
use crate::metrics::{self, SessionStats};
use crate::rng;
use crate::visualization::{self, Frame, NetworkView, NodeRef};

/// Confidence reported by the unattacked classifier.
pub const BASE_CONFIDENCE: f64 = 97.2;

/// Hard bounds on reported confidence, applied after every step.
pub const CONFIDENCE_MIN: f64 = 5.0;
pub const CONFIDENCE_MAX: f64 = 100.0;

/// Bounds and default for the perturbation budget.
pub const EPSILON_MIN: f64 = 0.001;
pub const EPSILON_MAX: f64 = 0.1;
pub const DEFAULT_EPSILON: f64 = 0.03;

/// Seed used by `new()`.
pub const DEFAULT_SEED: u64 = 42;

/// Retained confidence-history points.
pub const HISTORY_CAPACITY: usize = 60;

/// Retained attack-log entries.
pub const LOG_CAPACITY: usize = 12;

/// Epsilon at which an attack runs at its published strength.
const REFERENCE_EPSILON: f64 = 0.03;

/// Success probability never exceeds this, whatever the configuration.
const EFFECTIVENESS_CAP: f64 = 0.98;

/// Epsilon scaling saturates here for the success roll (the confidence
/// drop keeps the raw ratio).
const EPSILON_MULTIPLIER_CAP: f64 = 2.0;

/// A successful attack cannot push confidence below this.
const SUCCESS_FLOOR: f64 = 15.0;

/// A failed attack still grazes confidence but cannot exceed this.
const FAILURE_CEILING: f64 = 99.0;

/// A single drop never takes more than `confidence - DROP_GUARD`.
const DROP_GUARD: f64 = 10.0;

/// Fraction of the drop applied when the attack fails.
const FAILED_DROP_FACTOR: f64 = 0.3;

/// Log-entry severity, for display filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Danger,
}

/// One point of the bounded confidence history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Step index at which this point was recorded (1-based)
    pub step: u64,

    /// Confidence after the step
    pub value: f64,

    /// Attack active during the step
    pub attack: AttackKind,

    /// Whether the step beat the effectiveness threshold
    pub success: bool,
}

/// One entry of the bounded attack log, most recent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,

    /// Logical step index. Wall-clock stamping is the caller's concern;
    /// logical time keeps replays identical.
    pub timestamp: u64,
}

/// Everything a single `step()` produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackResult {
    /// Step index (equals `attack_count` after the step)
    pub step: u64,

    /// Whether the draw beat the effectiveness threshold
    pub success: bool,

    /// Confidence the step was entitled to remove. On failure only
    /// a fraction of it is actually applied.
    pub confidence_drop: f64,

    /// Confidence after the step
    pub confidence: f64,

    /// Fresh clean prediction
    pub original: Prediction,

    /// Fresh prediction under perturbation
    pub adversarial: Prediction,

    pub attack: AttackKind,
    pub epsilon: f64,

    /// Reported optimization iterations (cosmetic; >1 only for PGD)
    pub iterations: u32,
}

/// One row of the defense panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseMetric {
    pub kind: DefenseKind,
    pub name: String,
    pub effectiveness: f64,
    pub overhead_ms: f64,
    pub enabled: bool,
}

/// Owned point-in-time view of the whole session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub confidence: f64,
    pub epsilon: f64,
    pub attack: AttackKind,
    pub attack_count: u64,
    pub success_count: u64,
    pub original: Prediction,
    pub adversarial: Option<Prediction>,
    pub statistics: SessionStats,
    pub defenses: Vec<DefenseMetric>,
    pub history: Vec<HistoryPoint>,
    pub log: Vec<LogEntry>,
    pub network: NetworkView,
}

/// The simulation engine. One instance per session, single writer.
#[derive(Debug, Clone)]
pub struct AttackEngine {
    /// Seed passed at construction; `reset()` returns to it
    initial_seed: u64,

    /// Monotone counter driving the deterministic hash
    rng_seed: u64,

    /// Current top-class confidence, in [5, 100]
    confidence: f64,

    /// Perturbation budget, clamped to [0.001, 0.1]
    epsilon: f64,

    /// Active attack
    attack: AttackKind,

    /// Enabled flags indexed by `DefenseKind::index()`
    defenses: [bool; 4],

    attack_count: u64,
    success_count: u64,

    /// Confidence trajectory, oldest first, capacity 60
    history: VecDeque<HistoryPoint>,

    /// Attack log, most recent first, capacity 12
    log: VecDeque<LogEntry>,

    /// Highlighted nodes, recomputed from scratch each step
    attacked: BTreeSet<NodeRef>,

    /// Latest clean prediction
    original: Prediction,

    /// Latest perturbed prediction; `None` until the first step
    adversarial: Option<Prediction>,
}

impl AttackEngine {
    /// Creates an engine with the default seed (42).
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates an engine with an explicit seed, for parallel sessions
    /// and replay tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            initial_seed: seed,
            rng_seed: seed,
            confidence: BASE_CONFIDENCE,
            epsilon: DEFAULT_EPSILON,
            attack: AttackKind::Fgsm,
            defenses: default_defense_flags(),
            attack_count: 0,
            success_count: 0,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            log: VecDeque::with_capacity(LOG_CAPACITY),
            attacked: BTreeSet::new(),
            original: labels::predict(seed as f64, false),
            adversarial: None,
        }
    }

    /// Restores all defaults, including the construction seed, and
    /// returns the resulting snapshot. Idempotent.
    pub fn reset(&mut self) -> EngineSnapshot {
        *self = Self::with_seed(self.initial_seed);
        self.snapshot()
    }

    /// Selects the active attack for subsequent steps.
    pub fn set_attack(&mut self, attack: AttackKind) {
        self.attack = attack;
    }

    /// Stores a perturbation budget, clamped to [0.001, 0.1].
    /// Non-finite input leaves the stored value untouched.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        if !epsilon.is_finite() {
            return;
        }
        self.epsilon = epsilon.clamp(EPSILON_MIN, EPSILON_MAX);
    }

    /// Flips one defense and returns its new state.
    pub fn toggle_defense(&mut self, kind: DefenseKind) -> bool {
        let flag = &mut self.defenses[kind.index()];
        *flag = !*flag;
        *flag
    }

    /// Sets one defense to an absolute state and returns it.
    pub fn set_defense(&mut self, kind: DefenseKind, enabled: bool) -> bool {
        self.defenses[kind.index()] = enabled;
        enabled
    }

    /// Executes one attack step.
    ///
    /// Advances the seed counter, rolls success against the configured
    /// attack/defense/epsilon effectiveness, applies the confidence
    /// drop, regenerates predictions and the attacked-node set, and
    /// records history and log entries.
    pub fn step(&mut self) -> AttackResult {
        self.rng_seed += 1;
        self.attack_count += 1;

        let profile = self.attack.profile();
        let defense_mult = self.defense_multiplier();
        let eps_mult = self.epsilon / REFERENCE_EPSILON;

        let effectiveness = (profile.base_success_rate
            * defense_mult
            * eps_mult.min(EPSILON_MULTIPLIER_CAP))
        .min(EFFECTIVENESS_CAP);

        let draw = rng::unit_hash(self.rng_seed as f64);
        let success = draw < effectiveness;

        // Raw epsilon scaling here, so oversized budgets overshoot the
        // published drop, but a single step never takes confidence more
        // than 10 points from gone.
        let drop = (profile.base_confidence_drop * defense_mult * eps_mult)
            .min((self.confidence - DROP_GUARD).max(0.0));

        if success {
            self.confidence = (self.confidence - drop).max(SUCCESS_FLOOR);
            self.success_count += 1;
        } else {
            self.confidence =
                (self.confidence - drop * FAILED_DROP_FACTOR).min(FAILURE_CEILING);
        }
        self.confidence = self.confidence.clamp(CONFIDENCE_MIN, CONFIDENCE_MAX);

        self.push_history(HistoryPoint {
            step: self.attack_count,
            value: self.confidence,
            attack: self.attack,
            success,
        });

        self.original = labels::predict(self.rng_seed as f64, false);
        let adversarial = labels::predict(self.rng_seed as f64 + 1000.0, true);
        self.adversarial = Some(adversarial.clone());

        self.attacked =
            visualization::attacked_node_set(self.confidence, self.rng_seed as f64);

        let severity = if success { Severity::Danger } else { Severity::Info };
        let message = format!(
            "{}: {} → {} ({:.1}%)",
            self.attack.label(),
            self.original.label,
            adversarial.label,
            self.confidence
        );
        self.push_log(message, severity);

        let iterations = match self.attack {
            AttackKind::Pgd => {
                10 + (rng::unit_hash(self.rng_seed as f64 + 500.0) * 30.0) as u32
            }
            _ => 1,
        };

        AttackResult {
            step: self.attack_count,
            success,
            confidence_drop: drop,
            confidence: self.confidence,
            original: self.original.clone(),
            adversarial,
            attack: self.attack,
            epsilon: self.epsilon,
            iterations,
        }
    }

    /// Product of `(1 - effectiveness * 0.4)` over enabled defenses,
    /// floored at 0.1.
    pub fn defense_multiplier(&self) -> f64 {
        defense::stacked_multiplier(self.enabled_defenses())
    }

    /// Defenses currently enabled, in fixed display order.
    pub fn enabled_defenses(&self) -> Vec<DefenseKind> {
        DefenseKind::all()
            .into_iter()
            .filter(|kind| self.defenses[kind.index()])
            .collect()
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn attack(&self) -> AttackKind {
        self.attack
    }

    pub fn attack_count(&self) -> u64 {
        self.attack_count
    }

    pub fn success_count(&self) -> u64 {
        self.success_count
    }

    /// Current value of the seed counter.
    pub fn current_seed(&self) -> u64 {
        self.rng_seed
    }

    pub fn defense_enabled(&self, kind: DefenseKind) -> bool {
        self.defenses[kind.index()]
    }

    pub fn original_prediction(&self) -> &Prediction {
        &self.original
    }

    pub fn adversarial_prediction(&self) -> Option<&Prediction> {
        self.adversarial.as_ref()
    }

    /// Confidence trajectory, oldest first.
    pub fn confidence_history(&self) -> Vec<HistoryPoint> {
        self.history.iter().cloned().collect()
    }

    /// Attack log, most recent first.
    pub fn attack_log(&self) -> Vec<LogEntry> {
        self.log.iter().cloned().collect()
    }

    /// Currently highlighted nodes.
    pub fn attacked_nodes(&self) -> BTreeSet<NodeRef> {
        self.attacked.clone()
    }

    /// Aggregate session statistics.
    pub fn statistics(&self) -> SessionStats {
        SessionStats {
            attack_count: self.attack_count,
            success_count: self.success_count,
            success_rate: metrics::success_rate(self.success_count, self.attack_count),
            perturbation: metrics::perturbation_norm(self.epsilon),
            defense_effectiveness: metrics::defense_effect_percent(
                self.defense_multiplier(),
            ),
        }
    }

    /// Defense panel rows, in fixed display order.
    pub fn defense_metrics(&self) -> Vec<DefenseMetric> {
        DefenseKind::all()
            .into_iter()
            .map(|kind| {
                let profile = kind.profile();
                DefenseMetric {
                    kind,
                    name: profile.name.to_string(),
                    effectiveness: profile.effectiveness,
                    overhead_ms: profile.overhead_ms,
                    enabled: self.defenses[kind.index()],
                }
            })
            .collect()
    }

    /// Projection of the network diagram with current attack flags.
    pub fn network_view(&self, frame: Frame) -> NetworkView {
        NetworkView::project(frame, &self.attacked)
    }

    /// Owned combined view of the whole session.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            confidence: self.confidence,
            epsilon: self.epsilon,
            attack: self.attack,
            attack_count: self.attack_count,
            success_count: self.success_count,
            original: self.original.clone(),
            adversarial: self.adversarial.clone(),
            statistics: self.statistics(),
            defenses: self.defense_metrics(),
            history: self.confidence_history(),
            log: self.attack_log(),
            network: self.network_view(Frame::default()),
        }
    }

    fn push_history(&mut self, point: HistoryPoint) {
        self.history.push_back(point);
        while self.history.len() > HISTORY_CAPACITY {
            self.history.pop_front();
        }
    }

    fn push_log(&mut self, message: String, severity: Severity) {
        self.log.push_front(LogEntry {
            message,
            severity,
            timestamp: self.attack_count,
        });
        while self.log.len() > LOG_CAPACITY {
            self.log.pop_back();
        }
    }
}

impl Default for AttackEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn default_defense_flags() -> [bool; 4] {
    let mut flags = [false; 4];
    for kind in DefenseKind::all() {
        flags[kind.index()] = kind.profile().enabled_by_default;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn disarmed(engine: &mut AttackEngine) {
        for kind in DefenseKind::all() {
            engine.set_defense(kind, false);
        }
    }

    #[test]
    fn test_fresh_engine_defaults() {
        let engine = AttackEngine::new();
        assert_relative_eq!(engine.confidence(), 97.2);
        assert_eq!(engine.attack_count(), 0);
        assert_eq!(engine.success_count(), 0);
        assert_relative_eq!(engine.epsilon(), 0.03);
        assert_eq!(engine.attack(), AttackKind::Fgsm);
        assert!(engine.confidence_history().is_empty());
        assert!(engine.attack_log().is_empty());
        assert!(engine.attacked_nodes().is_empty());
        assert!(engine.adversarial_prediction().is_none());
        assert_eq!(engine.statistics().success_rate, 0);
        assert!(engine.defense_enabled(DefenseKind::InputPreprocessing));
        assert!(engine.defense_enabled(DefenseKind::FeatureSqueezing));
        assert!(!engine.defense_enabled(DefenseKind::AdversarialTraining));
        assert!(!engine.defense_enabled(DefenseKind::DefensiveDistillation));
    }

    #[test]
    fn test_pgd_single_step_golden() {
        // First draw from seed 43 is 0.0799622470..., well under the
        // 0.588432 effectiveness of PGD through the default defenses.
        let mut engine = AttackEngine::with_seed(42);
        engine.set_attack(AttackKind::Pgd);
        let result = engine.step();

        assert!(result.success);
        assert_eq!(result.step, 1);
        assert_eq!(result.attack, AttackKind::Pgd);
        assert_relative_eq!(result.confidence_drop, 11.5128, max_relative = 1e-9);
        assert_relative_eq!(result.confidence, 85.6872, max_relative = 1e-9);
        assert_relative_eq!(engine.confidence(), 85.6872, max_relative = 1e-9);
        assert_eq!(result.iterations, 12);
        assert!(result.adversarial.adversarial);
        assert!(!result.original.adversarial);
    }

    #[test]
    fn test_fgsm_trajectory_golden() {
        let mut engine = AttackEngine::new();
        let expected = [
            (89.5248, true),
            (81.8496, true),
            (79.54704, false),
            (77.24448, false),
            (69.56928, true),
            (61.89408, true),
        ];
        for (value, success) in expected {
            let result = engine.step();
            assert_eq!(result.success, success);
            assert_relative_eq!(result.confidence, value, max_relative = 1e-9);
        }
        assert_eq!(engine.attack_count(), 6);
        assert_eq!(engine.success_count(), 4);
        assert_eq!(engine.statistics().success_rate, 67);
    }

    #[test]
    fn test_full_budget_cw_pins_success_floor() {
        let mut engine = AttackEngine::new();
        engine.set_attack(AttackKind::Cw);
        engine.set_epsilon(0.1);
        disarmed(&mut engine);

        let first = engine.step();
        assert!(first.success);
        assert_relative_eq!(first.confidence_drop, 250.0 / 3.0, max_relative = 1e-9);
        assert_relative_eq!(first.confidence, 15.0, max_relative = 1e-9);

        // Further successes stay pinned: the drop is capped at
        // confidence - 10 and the success floor pulls back to 15.
        for _ in 0..5 {
            let result = engine.step();
            assert!(result.success);
            assert_relative_eq!(result.confidence, 15.0, max_relative = 1e-9);
        }

        // The seventh draw misses; the failure graze dips below the
        // floor, and the next success recovers it.
        let miss = engine.step();
        assert!(!miss.success);
        assert_relative_eq!(miss.confidence, 13.5, max_relative = 1e-9);

        let recover = engine.step();
        assert!(recover.success);
        assert_relative_eq!(recover.confidence_drop, 3.5, max_relative = 1e-9);
        assert_relative_eq!(recover.confidence, 15.0, max_relative = 1e-9);
    }

    #[test]
    fn test_large_epsilon_overshoots_published_drop() {
        // The success roll caps epsilon scaling at 2x, but the applied
        // drop keeps the raw ratio (0.1 / 0.03).
        let mut engine = AttackEngine::new();
        engine.set_epsilon(0.1);
        let result = engine.step();
        assert!(result.success);
        assert_relative_eq!(result.confidence_drop, 25.584, max_relative = 1e-9);
        assert_relative_eq!(result.confidence, 71.616, max_relative = 1e-9);
    }

    #[test]
    fn test_identical_sessions_replay_identically() {
        let mut a = AttackEngine::with_seed(7);
        let mut b = AttackEngine::with_seed(7);

        let script = |engine: &mut AttackEngine| {
            let mut results = Vec::new();
            engine.set_attack(AttackKind::DeepFool);
            results.push(engine.step());
            engine.set_epsilon(0.08);
            engine.toggle_defense(DefenseKind::AdversarialTraining);
            results.push(engine.step());
            results.push(engine.step());
            engine.set_attack(AttackKind::Cw);
            results.push(engine.step());
            results
        };

        let ra = script(&mut a);
        let rb = script(&mut b);
        assert_eq!(ra, rb);
        assert_eq!(a.confidence_history(), b.confidence_history());
        assert_eq!(a.attacked_nodes(), b.attacked_nodes());
        assert_eq!(a.attack_log(), b.attack_log());
    }

    #[test]
    fn test_reset_restores_defaults_and_replays() {
        let mut engine = AttackEngine::new();
        engine.set_attack(AttackKind::Pgd);
        engine.set_epsilon(0.09);
        engine.toggle_defense(DefenseKind::DefensiveDistillation);
        for _ in 0..10 {
            engine.step();
        }

        let snapshot = engine.reset();
        assert_relative_eq!(snapshot.confidence, 97.2);
        assert_eq!(snapshot.attack_count, 0);
        assert_eq!(snapshot.attack, AttackKind::Fgsm);
        assert_relative_eq!(snapshot.epsilon, 0.03);
        assert!(snapshot.history.is_empty());
        assert!(snapshot.log.is_empty());
        assert!(snapshot.adversarial.is_none());

        // Post-reset trajectory matches a fresh engine.
        let mut fresh = AttackEngine::new();
        assert_eq!(engine.step(), fresh.step());
    }

    #[test]
    fn test_history_eviction_keeps_newest_sixty() {
        let mut engine = AttackEngine::new();
        for _ in 0..75 {
            engine.step();
        }
        let history = engine.confidence_history();
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history[0].step, engine.attack_count() - 59);
        assert_eq!(history.last().unwrap().step, 75);
    }

    #[test]
    fn test_log_bounded_and_most_recent_first() {
        let mut engine = AttackEngine::new();
        for _ in 0..20 {
            engine.step();
        }
        let log = engine.attack_log();
        assert_eq!(log.len(), LOG_CAPACITY);
        assert_eq!(log[0].timestamp, 20);
        for pair in log.windows(2) {
            assert!(pair[0].timestamp > pair[1].timestamp);
        }
        assert!(log[0].message.contains("FGSM"));
    }

    #[test]
    fn test_epsilon_clamping() {
        let mut engine = AttackEngine::new();
        engine.set_epsilon(999.0);
        assert_relative_eq!(engine.epsilon(), 0.1);
        engine.set_epsilon(-5.0);
        assert_relative_eq!(engine.epsilon(), 0.001);
        engine.set_epsilon(0.05);
        assert_relative_eq!(engine.epsilon(), 0.05);
        engine.set_epsilon(f64::NAN);
        assert_relative_eq!(engine.epsilon(), 0.05);
        engine.set_epsilon(f64::INFINITY);
        assert_relative_eq!(engine.epsilon(), 0.05);
    }

    #[test]
    fn test_defense_toggle_and_set() {
        let mut engine = AttackEngine::new();
        assert!(!engine.toggle_defense(DefenseKind::InputPreprocessing));
        assert!(engine.toggle_defense(DefenseKind::InputPreprocessing));
        assert!(engine.set_defense(DefenseKind::AdversarialTraining, true));
        assert!(engine.defense_enabled(DefenseKind::AdversarialTraining));
        assert!(!engine.set_defense(DefenseKind::AdversarialTraining, false));

        let rows = engine.defense_metrics();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].name, "Adversarial Training");
        assert!(!rows[0].enabled);
        assert!(rows[1].enabled);
    }

    #[test]
    fn test_attacked_nodes_follow_confidence() {
        let mut engine = AttackEngine::new();
        engine.step();
        // Confidence still above 80 after one default FGSM step.
        assert!(engine.attacked_nodes().is_empty());

        engine.step();
        engine.step();
        // Three steps land at 79.5, below the display threshold.
        assert!(engine.confidence() < 80.0);
        assert!(!engine.attacked_nodes().is_empty());
        assert_eq!(
            engine.network_view(Frame::default()).attacked_count(),
            engine.attacked_nodes().len()
        );
    }

    #[test]
    fn test_snapshot_is_complete_at_construction() {
        let snapshot = AttackEngine::new().snapshot();
        assert_relative_eq!(snapshot.confidence, 97.2);
        assert_eq!(snapshot.statistics.attack_count, 0);
        assert_eq!(snapshot.statistics.perturbation, 8);
        assert_eq!(snapshot.defenses.len(), 4);
        assert_eq!(snapshot.network.nodes.len(), 29);
        assert_eq!(snapshot.original.label, "marmoset");
    }

    #[derive(Debug, Clone)]
    enum Op {
        Step,
        SetEpsilon(f64),
        SetAttack(AttackKind),
        Toggle(DefenseKind),
        Reset,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => Just(Op::Step),
            2 => prop_oneof![
                any::<f64>(),
                -10.0..10.0f64,
            ]
            .prop_map(Op::SetEpsilon),
            1 => (0usize..4).prop_map(|i| Op::SetAttack(AttackKind::all()[i])),
            1 => (0usize..4).prop_map(|i| Op::Toggle(DefenseKind::all()[i])),
            1 => Just(Op::Reset),
        ]
    }

    proptest! {
        #[test]
        fn test_bounds_hold_over_arbitrary_sequences(
            seed in 0u64..10_000,
            ops in proptest::collection::vec(op_strategy(), 1..80),
        ) {
            let mut engine = AttackEngine::with_seed(seed);
            for op in ops {
                match op {
                    Op::Step => {
                        engine.step();
                    }
                    Op::SetEpsilon(value) => engine.set_epsilon(value),
                    Op::SetAttack(kind) => engine.set_attack(kind),
                    Op::Toggle(kind) => {
                        engine.toggle_defense(kind);
                    }
                    Op::Reset => {
                        engine.reset();
                    }
                }
                prop_assert!((5.0..=100.0).contains(&engine.confidence()));
                prop_assert!((0.001..=0.1).contains(&engine.epsilon()));
                prop_assert!(engine.success_count() <= engine.attack_count());
                prop_assert!(engine.confidence_history().len() <= HISTORY_CAPACITY);
                prop_assert!(engine.attack_log().len() <= LOG_CAPACITY);
            }
        }

        #[test]
        fn test_step_count_advances_by_one(
            seed in 0u64..1_000,
            steps in 1usize..40,
        ) {
            let mut engine = AttackEngine::with_seed(seed);
            for expected in 1..=steps {
                let result = engine.step();
                prop_assert_eq!(result.step, expected as u64);
                prop_assert_eq!(engine.attack_count(), expected as u64);
            }
        }
    }
}
