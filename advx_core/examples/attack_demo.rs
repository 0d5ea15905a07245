//! Attack Session Demo - Scripted Adversarial Session
//! ====================================================
//!
//! Demonstrates:
//! - Stepping the engine through an escalating attack script
//! - Budget and defense changes mid-session
//! - Reading statistics, the attack log, and the perturbed-node diagram
//!
//! Run:
//! ```bash
//! cargo run -p advx_core --example attack_demo
//! ```

use advx_core::{AttackEngine, AttackKind, DefenseKind, Frame};

fn print_step(result: &advx_core::AttackResult) {
    println!(
        "step {:>2} | {:<8} | {} | confidence {:6.2}% | {:>2} iterations",
        result.step,
        result.attack.name(),
        if result.success { "HIT " } else { "MISS" },
        result.confidence,
        result.iterations,
    );
}

fn main() {
    let mut engine = AttackEngine::with_seed(42);

    println!("AdversarialX demo session (seed 42)");
    println!(
        "clean prediction: {} ({:.1}%)",
        engine.original_prediction().label,
        engine.original_prediction().confidence
    );
    println!();

    // Phase 1: probe with FGSM at the default budget.
    for _ in 0..4 {
        print_step(&engine.step());
    }

    // Phase 2: escalate to PGD with a full budget, defenses down.
    println!("-- escalating: pgd, epsilon 0.1, defenses down --");
    engine.set_attack(AttackKind::Pgd);
    engine.set_epsilon(0.1);
    for kind in DefenseKind::all() {
        engine.set_defense(kind, false);
    }
    for _ in 0..4 {
        print_step(&engine.step());
    }

    // Phase 3: raise every defense and watch the attack stall.
    println!("-- all four defenses up --");
    for kind in DefenseKind::all() {
        engine.set_defense(kind, true);
    }
    for _ in 0..4 {
        print_step(&engine.step());
    }

    println!();
    let stats = engine.statistics();
    println!(
        "attacks: {}  hits: {}  hit rate: {}%",
        stats.attack_count, stats.success_count, stats.success_rate
    );
    println!(
        "perturbation: {}/255  defense effect: {}%",
        stats.perturbation, stats.defense_effectiveness
    );

    let network = engine.network_view(Frame::default());
    println!(
        "perturbed nodes: {}/{}",
        network.attacked_count(),
        network.nodes.len()
    );

    println!();
    println!("attack log (most recent first):");
    for entry in engine.attack_log() {
        println!("  [{:>2}] {}", entry.timestamp, entry.message);
    }
}
