// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Market Balance Runner
//
// Plays scripted strategies through the DeFi Degen market and reports how
// balances, XP and risk penalties spread across seeds.
//
// Usage:
//   cargo run --release --bin balance                    # All strategies, 30 runs each
//   cargo run --release --bin balance -- --runs 5        # Quick mode
//   cargo run --release --bin balance -- degen           # Filter by name
//   cargo run --release --bin balance -- --seed 42       # Custom base seed
//   RUST_LOG=debug cargo run --bin balance -- --runs 1   # Trace every day

mod monte_carlo;
mod report;
mod strategies;

use abc_defi_engine::config::MarketConfig;
use report::*;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use strategies::Strategy;
use tracing_subscriber::EnvFilter;

// ─── CLI Parsing ─────────────────────────────────────────────────────────────

const DEFAULT_RUNS: usize = 30;

#[derive(Debug, PartialEq)]
struct CliArgs {
    runs: usize,
    seed: u64,
    filter: Option<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut cli = CliArgs { runs: DEFAULT_RUNS, seed: 0, filter: None };
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--runs" => {
                let value = args.next().ok_or("--runs needs a value")?;
                cli.runs = match value.parse::<usize>() {
                    Ok(0) | Err(_) => return Err(format!("--runs expects a positive count, got `{value}`")),
                    Ok(n) => n,
                };
            }
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                cli.seed = value.parse().map_err(|_| format!("--seed expects an unsigned integer, got `{value}`"))?;
            }
            flag if flag.starts_with('-') => return Err(format!("unknown flag `{flag}`")),
            extra if cli.filter.is_some() => return Err(format!("only one strategy filter allowed, got `{extra}`")),
            name => cli.filter = Some(name.to_string()),
        }
    }
    Ok(cli)
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("balance: {e}");
            std::process::exit(2);
        }
    };
    let to_run: Vec<Strategy> = match &cli.filter {
        Some(f) => Strategy::ALL.into_iter().filter(|s| s.matches(f)).collect(),
        None => Strategy::ALL.to_vec(),
    };

    if to_run.is_empty() {
        eprintln!("No strategies match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    let config = MarketConfig::default();

    println!("\n  DeFi Degen Balance Runner v{}", env!("CARGO_PKG_VERSION"));
    println!("  PRNG: ChaCha8Rng | Runs/strategy: {} | Base seed: {}", cli.runs, cli.seed);
    println!("  Running {} strategy(ies) over {} days...\n", to_run.len(), config.max_days);
    println!(
        "  {:<14} {:>16} {:>9} {:>12} {:>10} {:>8} {:>6}",
        "Strategy", "Final $DAI", "Median", "XP", "Penalty", "Win%", "Clean"
    );
    println!("  {}", "-".repeat(82));

    let suite_start = Instant::now();
    let mut reports = Vec::new();

    for strategy in to_run {
        let report = monte_carlo::run_monte_carlo(strategy, &config, cli.runs, cli.seed);
        println!(
            "  {:<14} {:>9.0}±{:<6.0} {:>9.0} {:>6.1}±{:<5.1} {:>10.1} {:>7.1}% {:>5.0}%",
            report.label,
            report.final_balance.mean,
            report.final_balance.ci95,
            report.final_balance.median,
            report.earned_xp.mean,
            report.earned_xp.ci95,
            report.risk_penalty.mean,
            report.win_rate.mean,
            report.invariant_pass_rate * 100.0,
        );
        reports.push(report);
    }

    let total = reports.len();
    let clean = reports.iter().filter(|r| r.invariant_pass_rate >= 1.0).count();
    let violated = total - clean;

    println!("  {}", "-".repeat(82));
    println!(
        "  Total: {}  Clean: {}  Violated: {}  Suite time: {:.1}s\n",
        total,
        clean,
        violated,
        suite_start.elapsed().as_secs_f64()
    );

    // ─── Write JSON Report ───────────────────────────────────────────────

    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis().to_string();
    let report = BalanceReport {
        timestamp: timestamp.clone(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_runs_per_strategy: cli.runs,
        base_seed: cli.seed,
        summary: Summary { total, clean, violated },
        strategies: reports,
    };

    let dir = std::path::Path::new("balance-results");
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("balance-{timestamp}.json"));
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    println!("  Results saved to: {}\n", path.display());

    if violated > 0 {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<CliArgs, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_and_overrides() {
        assert_eq!(args(&[]), Ok(CliArgs { runs: DEFAULT_RUNS, seed: 0, filter: None }));
        assert_eq!(
            args(&["--runs", "5", "degen", "--seed", "42"]),
            Ok(CliArgs { runs: 5, seed: 42, filter: Some("degen".into()) })
        );
    }

    #[test]
    fn malformed_values_are_reported() {
        assert!(args(&["--runs", "lots"]).unwrap_err().contains("lots"));
        assert!(args(&["--runs", "0"]).is_err());
        assert!(args(&["--runs"]).is_err());
        assert!(args(&["--seed", "-3"]).is_err());
        assert!(args(&["--fast"]).is_err());
        assert!(args(&["steady", "degen"]).is_err());
    }
}
