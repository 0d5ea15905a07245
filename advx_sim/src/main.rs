//! AdversarialX Simulator CLI
//!
//! Run deterministic attack-session scenarios, live watch sessions, and
//! recorded exports against the AdversarialX engine.

use advx_core::{AttackKind, DefenseKind};
use advx_sim::scenarios::ScenarioId;
use advx_sim::{ScenarioResult, ScenarioRunner, SessionConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// AdversarialX deterministic attack simulator
#[derive(Parser, Debug)]
#[command(name = "advx-sim")]
#[command(about = "Run deterministic adversarial-attack sessions", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Scenario to run (baseline, epsilon_sweep, defense_matrix, attack_sweep, endurance, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,

    /// Steps per engine run (scenario and session modes)
    #[arg(long)]
    steps: Option<u64>,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Step one live engine at a fixed interval until Ctrl-C
    #[arg(short, long)]
    watch: bool,

    /// Milliseconds between watch-mode steps
    #[arg(long, default_value = "1500")]
    interval_ms: u64,

    /// Attack for session modes (fgsm, pgd, cw, deepfool)
    #[arg(short, long)]
    attack: Option<String>,

    /// Perturbation budget for session modes, clamped to [0.001, 0.1]
    #[arg(short, long)]
    epsilon: Option<f64>,

    /// Defense to force on before the first step (repeatable)
    #[arg(long)]
    enable_defense: Vec<String>,

    /// Defense to force off before the first step (repeatable)
    #[arg(long)]
    disable_defense: Vec<String>,

    /// Record the session to a JSON file
    #[arg(long)]
    export: Option<String>,

    /// Live terminal dashboard (requires the 'dashboard' feature)
    #[arg(short, long)]
    dashboard: bool,
}

fn parse_attack(name: &str) -> AttackKind {
    name.parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

fn parse_defense(name: &str) -> DefenseKind {
    name.parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if !args.json {
        info!("AdversarialX Simulator v0.1.0");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos() as u64
    } else {
        args.seed
    };

    let config = SessionConfig {
        seed: base_seed,
        attack: args.attack.as_deref().map(parse_attack),
        epsilon: args.epsilon,
        enable_defenses: args.enable_defense.iter().map(|s| parse_defense(s)).collect(),
        disable_defenses: args.disable_defense.iter().map(|s| parse_defense(s)).collect(),
        interval_ms: args.interval_ms,
        steps: args.steps,
        export: args.export.clone().map(PathBuf::from),
    };

    // Handle --dashboard mode
    if args.dashboard {
        #[cfg(feature = "dashboard")]
        {
            if let Err(e) = advx_sim::run_dashboard(&config) {
                error!("Dashboard failed: {:?}", e);
                std::process::exit(1);
            }
            return;
        }
        #[cfg(not(feature = "dashboard"))]
        {
            eprintln!("Error: this binary was built without the 'dashboard' feature");
            eprintln!("Rebuild with: cargo run -p advx_sim --features dashboard -- --dashboard");
            std::process::exit(1);
        }
    }

    // Handle --watch mode
    if args.watch {
        match advx_sim::run_watch(&config) {
            Ok(snapshot) => {
                info!(
                    "Watch session finished: {} steps, final confidence {:.2}%",
                    snapshot.attack_count, snapshot.confidence
                );
            }
            Err(e) => {
                error!("Watch session failed: {:?}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Handle --export mode (recorded batch session)
    if config.export.is_some() {
        if args.scenario != "all" {
            eprintln!("Error: --export records a session, not a scenario; combine it with --watch or drop --scenario");
            std::process::exit(1);
        }
        match advx_sim::run_batch(&config) {
            Ok(snapshot) => {
                info!(
                    "✓ Session (seed={}) recorded, final confidence {:.2}%",
                    base_seed, snapshot.confidence
                );
            }
            Err(e) => {
                error!("Session export failed: {:?}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Parse scenarios
    let scenarios: Vec<ScenarioId> = if args.scenario == "all" {
        ScenarioId::all()
    } else {
        vec![args.scenario.parse().unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        })]
    };

    let mut runner = ScenarioRunner::new(base_seed);
    if let Some(steps) = args.steps {
        runner = runner.with_steps(steps);
    }

    // Track results
    let mut all_results: Vec<ScenarioResult> = Vec::new();
    let mut failed_count = 0;

    for scenario in &scenarios {
        let result = runner.run(*scenario);

        if !args.json {
            if result.passed {
                info!("✓ {} (seed={}) PASSED", scenario.name(), base_seed);
            } else {
                error!(
                    "✗ {} (seed={}) FAILED: {}",
                    scenario.name(),
                    base_seed,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }

        if !result.passed {
            failed_count += 1;
        }

        all_results.push(result);
    }

    // Summary
    let total = all_results.len();
    let passed = total - failed_count;

    if args.json {
        // JSON output for CI parsing
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": all_results.iter().map(|r| {
                serde_json::json!({
                    "scenario": r.scenario.name(),
                    "seed": r.seed,
                    "passed": r.passed,
                    "steps": r.steps_run,
                    "final_confidence": r.final_confidence,
                    "success_rate": r.metrics.success_rate,
                    "failure_reason": r.failure_reason,
                })
            }).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&summary).unwrap());
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if failed_count == 0 {
            info!("✅ All {} scenario runs passed!", total);
        } else {
            error!("❌ {}/{} scenario runs failed!", failed_count, total);

            // List failed runs
            for result in &all_results {
                if !result.passed {
                    error!(
                        "  - {} seed={}: {}",
                        result.scenario.name(),
                        result.seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }
        }
    }

    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
}
