// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Balance Monte Carlo
//
// Each strategy plays N full cycles with seeds base..base+N and the market
// invariants are checked after every action.

use abc_defi_engine::config::MarketConfig;
use abc_defi_engine::market::sim::{OutcomeKind, PlayerAction};
use abc_defi_engine::market::{DayStep, DegenGame};
use abc_defi_engine::RecordingSink;
use tracing::{debug, warn};

use crate::report::*;
use crate::strategies::Strategy;

/// Play one cycle with `strategy`.
pub fn run_single(strategy: Strategy, config: &MarketConfig, seed: u64) -> RunResult {
    let mut game = DegenGame::with_config(config.clone(), seed);
    let mut sink = RecordingSink::default();
    let mut result = RunResult {
        strategy: strategy.name().to_string(),
        seed,
        days: 0,
        final_balance: 0.0,
        earned_xp: 0,
        risk_penalty: 0,
        wins: 0,
        losses: 0,
        ignores: 0,
        violations: Vec::new(),
    };

    if let Err(e) = game.start() {
        result.violations.push(format!("start failed: {e}"));
        return result;
    }

    loop {
        let state = game.state();
        let Some(event) = state.event() else {
            result.violations.push(format!("day {}: no event dealt", state.day));
            break;
        };
        let (day, before) = (state.day, state.balance);
        let action = strategy.decide(state, event);

        match game.act(action) {
            Ok(outcome) => match (action, outcome.kind) {
                (PlayerAction::Ignore, _) => result.ignores += 1,
                (_, OutcomeKind::Positive) => result.wins += 1,
                (_, OutcomeKind::Negative) => result.losses += 1,
                _ => {}
            },
            Err(e) => {
                result.violations.push(format!("day {day}: action rejected: {e}"));
                break;
            }
        }
        check_day(&game, action, before, &mut result.violations);

        match game.continue_day(&mut sink) {
            Ok(DayStep::Advanced { day }) => debug!(strategy = strategy.name(), seed, day, "next day"),
            Ok(DayStep::Finished { earned_xp }) => {
                result.earned_xp = earned_xp;
                break;
            }
            Err(e) => {
                result.violations.push(format!("continue failed: {e}"));
                break;
            }
        }
    }

    let state = game.state();
    result.days = state.day;
    result.final_balance = state.final_value();
    result.risk_penalty = state.risk_penalty;
    if sink.total() != f64::from(result.earned_xp) {
        result.violations.push(format!("paid {} XP but reported {}", sink.total(), result.earned_xp));
    }
    if !result.violations.is_empty() {
        warn!(strategy = strategy.name(), seed, violations = result.violations.len(), "invariants broken");
    }
    result
}

fn check_day(game: &DegenGame, action: PlayerAction, before: f64, violations: &mut Vec<String>) {
    let state = game.state();
    if state.history.len() != state.day as usize + 1 {
        violations.push(format!("day {}: history length {}", state.day, state.history.len()));
    }
    if state.balance < 0.0 {
        violations.push(format!("day {}: negative balance {:.2}", state.day, state.balance));
    }
    let idle = match action {
        PlayerAction::Ignore => true,
        PlayerAction::Invest { percent } => percent == 0.0,
    };
    if idle && state.balance != before {
        violations.push(format!("day {}: balance moved without a stake", state.day));
    }
}

/// Run `n_runs` cycles of `strategy` and aggregate.
pub fn run_monte_carlo(strategy: Strategy, config: &MarketConfig, n_runs: usize, base_seed: u64) -> StrategyReport {
    let results: Vec<RunResult> = (0..n_runs)
        .map(|i| run_single(strategy, config, base_seed + i as u64))
        .collect();
    aggregate(strategy, results)
}

fn aggregate(strategy: Strategy, results: Vec<RunResult>) -> StrategyReport {
    let n = results.len();
    let clean = results.iter().filter(|r| r.violations.is_empty()).count();

    let stat = |f: fn(&RunResult) -> f64| Stats::from_samples(&results.iter().map(f).collect::<Vec<_>>());
    let final_balance = stat(|r| r.final_balance);
    let earned_xp = stat(|r| f64::from(r.earned_xp));
    let risk_penalty = stat(|r| f64::from(r.risk_penalty));
    let win_rate = stat(|r| {
        let decided = r.wins + r.losses;
        if decided == 0 { 0.0 } else { f64::from(r.wins) / f64::from(decided) * 100.0 }
    });

    StrategyReport {
        name: strategy.name().to_string(),
        label: strategy.label().to_string(),
        n_runs: n,
        invariant_pass_rate: if n == 0 { 1.0 } else { clean as f64 / n as f64 },
        final_balance,
        earned_xp,
        risk_penalty,
        win_rate,
        individual_runs: results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_strategy_keeps_the_invariants() {
        let config = MarketConfig::default();
        for strategy in Strategy::ALL {
            let report = run_monte_carlo(strategy, &config, 5, 11);
            assert_eq!(report.invariant_pass_rate, 1.0, "{}", strategy.name());
            assert!(report.individual_runs.iter().all(|r| r.days == config.max_days));
        }
    }

    #[test]
    fn paper_hands_never_moves_the_balance() {
        let config = MarketConfig::default();
        let run = run_single(Strategy::PaperHands, &config, 3);
        assert_eq!(run.final_balance, config.initial_balance);
        assert_eq!(run.ignores, config.max_days);
        assert_eq!(run.earned_xp, config.survivor_xp);
    }
}
