//! RTH Consensus Procurement Reference — Demo CLI
//!
//! Runs one or all of the three procurement demo scenarios. Each scenario
//! uses real RTH components (policy, in-memory store, consensus engine)
//! wired together with mock inspection data.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- milestone-signoff
//!   cargo run -p demo -- rogue-verifier
//!   cargo run -p demo -- split-panel

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rth_ref_procurement::scenarios::{milestone_signoff, rogue_verifier, split_panel};

// ── CLI definition ────────────────────────────────────────────────────────────

/// RTH — quorum/circular-statistics consensus procurement demo.
///
/// Each subcommand runs one or all of the three milestone-verification
/// scenarios, demonstrating quorum gating, outlier exclusion, and the
/// decision rule.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "RTH consensus procurement reference demo",
    long_about = "Runs RTH consensus demo scenarios showing quorum gating,\n\
                  circular aggregation, outlier exclusion, and decision audit."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three procurement scenarios in sequence.
    RunAll,
    /// Scenario 1: Clean Milestone Sign-off (tight cluster → authorize).
    MilestoneSignoff,
    /// Scenario 2: Rogue Verifier Exclusion (outlier filtered, then authorize).
    RogueVerifier,
    /// Scenario 3: Split Panel Rejection (dispersed evidence → reject).
    SplitPanel,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging. Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::MilestoneSignoff => milestone_signoff::run_scenario(),
        Command::RogueVerifier => rogue_verifier::run_scenario(),
        Command::SplitPanel => split_panel::run_scenario(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> rth_contracts::error::RthResult<()> {
    milestone_signoff::run_scenario()?;
    rogue_verifier::run_scenario()?;
    split_panel::run_scenario()?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("RTH — Quorum Circular-Statistics Consensus");
    println!("Procurement Reference Demo");
    println!("==========================================");
    println!();
    println!("RTH consensus pipeline per session:");
    println!("  [1] Session opened with a fixed distinct-verifier quorum (>= 2)");
    println!("  [2] Inspectors submit measurements; repeats replace, never duplicate");
    println!("  [3] Quorum crossed -> session Ready; finalize becomes eligible");
    println!("  [4] Finalize: encode phases -> exclude outliers -> aggregate");
    println!("  [5] Confidence >= threshold -> AUTHORIZE, else REJECT;");
    println!("      decision + phase matrix persisted exactly once");
    println!();
}
