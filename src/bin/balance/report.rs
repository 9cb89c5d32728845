// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Balance Report Types

use serde::Serialize;

// ─── Statistics ──────────────────────────────────────────────────────────────

/// Spread of one metric across a strategy's runs. Balances are heavily
/// skewed by full-degen wipeouts, so the deciles sit next to the mean.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    /// Half width of the normal-approximation 95% interval around `mean`.
    pub ci95: f64,
    pub p10: f64,
    pub median: f64,
    pub p90: f64,
    pub min: f64,
    pub max: f64,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let mut sorted: Vec<f64> = samples.iter().copied().filter(|x| x.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Self::default();
        };

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let sum_sq: f64 = sorted.iter().map(|x| (x - mean) * (x - mean)).sum();
        let std_dev = if n > 1 { (sum_sq / (n - 1) as f64).sqrt() } else { 0.0 };
        let at = |q: f64| sorted[((n - 1) as f64 * q).round() as usize];

        Self {
            n,
            mean,
            std_dev,
            ci95: 1.96 * std_dev / (n as f64).sqrt(),
            p10: at(0.1),
            median: at(0.5),
            p90: at(0.9),
            min,
            max,
        }
    }
}

// ─── Single Playthrough ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub strategy: String,
    pub seed: u64,
    pub days: u32,
    pub final_balance: f64,
    pub earned_xp: u32,
    pub risk_penalty: u32,
    pub wins: u32,
    pub losses: u32,
    pub ignores: u32,
    /// Broken market invariants seen during the run, e.g. "day 3: history length 3".
    pub violations: Vec<String>,
}

// ─── Per-Strategy Aggregate ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct StrategyReport {
    pub name: String,
    pub label: String,
    pub n_runs: usize,
    pub invariant_pass_rate: f64,
    pub final_balance: Stats,
    pub earned_xp: Stats,
    pub risk_penalty: Stats,
    pub win_rate: Stats,
    pub individual_runs: Vec<RunResult>,
}

// ─── Top-Level Report ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BalanceReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_strategy: usize,
    pub base_seed: u64,
    pub summary: Summary,
    pub strategies: Vec<StrategyReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub clean: usize,
    pub violated: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_constant_samples() {
        let s = Stats::from_samples(&[4.0, 4.0, 4.0]);
        assert_eq!(s.mean, 4.0);
        assert_eq!(s.ci95, 0.0);
        assert_eq!(Stats::from_samples(&[]).n, 0);
    }

    #[test]
    fn deciles_ignore_non_finite_runs() {
        let samples: Vec<f64> = (0..=10).map(f64::from).chain([f64::NAN]).collect();
        let s = Stats::from_samples(&samples);
        assert_eq!(s.n, 11);
        assert_eq!((s.p10, s.median, s.p90), (1.0, 5.0, 9.0));
        assert_eq!((s.min, s.max), (0.0, 10.0));
    }
}
