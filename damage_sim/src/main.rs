//! damage_sim - run a damage scenario against attribute_core stores
//!
//! Run with: `damage_sim scenarios/skirmish.toml --seed 42`
//! Event logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=debug`).

mod runner;
mod scenario;

use anyhow::Result;
use clap::Parser;
use runner::Runner;
use scenario::Scenario;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Resolve every hit in a scenario and print what happened
#[derive(Parser)]
#[command(name = "damage_sim")]
#[command(about = "Damage scenario runner", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario TOML file
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// RNG seed (overrides the scenario's own seed)
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,

    /// Resolve different targets on parallel threads
    #[arg(short, long)]
    parallel: bool,

    /// Print each entity's replication state as JSON at the end
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let scenario = Scenario::load(&cli.scenario)?;
    let seed = cli.seed.or(scenario.seed).unwrap_or(0);
    info!(
        scenario = %cli.scenario.display(),
        seed,
        entities = scenario.entities.len(),
        hits = scenario.hits.len(),
        "scenario loaded"
    );

    let runner = Runner::new(&scenario, seed)?;
    let outcomes = if cli.parallel {
        runner.run_parallel(&scenario)?
    } else {
        runner.run(&scenario)?
    };

    println!("=== Hits ===");
    for outcome in &outcomes {
        println!("{:>12}: {}", outcome.target, outcome.report.summary());
    }

    println!();
    println!("=== Final State ===");
    for (id, health, armor) in runner.final_state()? {
        let status = if health > 0.0 { "" } else { " (dead)" };
        println!("{id:>12}: health {health:.1}, armor {armor:.1}{status}");
    }

    if cli.json {
        println!();
        for (id, json) in runner.replication_dump()? {
            println!("{id}: {json}");
        }
    }

    Ok(())
}

/// Log to stderr so report output on stdout stays clean
fn setup_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
