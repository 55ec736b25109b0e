use std::path::PathBuf;

use clap::Parser;

use twohundred_bench::config::{BenchmarkConfig, ResolvedOutputs};
use twohundred_bench::logging::init_logging;
use twohundred_bench::tournament::TournamentRunner;
use twohundred_core::AppInfo;

/// Match harness for Two Hundred agents.
#[derive(Debug, Parser)]
#[command(
    name = "twohundred-bench",
    author,
    version,
    about = "Deterministic Two Hundred match harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of matches to play.
    #[arg(long, value_name = "MATCHES")]
    matches: Option<usize>,

    /// Override the RNG seed for match generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Keep both teams on their configured sides for every match.
    #[arg(long)]
    no_swap: bool,

    /// Exit after validating the configuration (no matches are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(matches) = cli.matches {
        config.matches.count = matches;
    }

    if let Some(seed) = cli.seed {
        config.matches.seed = Some(seed);
    }

    if cli.no_swap {
        config.matches.swap_sides = false;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let matches = config.matches.count;
    let lineup = config
        .teams
        .iter()
        .map(|team| team.name.as_str())
        .collect::<Vec<_>>()
        .join(" vs ");

    println!(
        "Loaded configuration '{run_id}' for {} {}: {lineup} over {matches} match(es)",
        AppInfo::name(),
        AppInfo::version()
    );

    let _logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = TournamentRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: matches skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Run complete for '{run_id}': {} matches → {} rows at {}",
        summary.matches_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    for (name, wins) in &summary.wins {
        println!("  {name}: {wins} win(s)");
    }
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
