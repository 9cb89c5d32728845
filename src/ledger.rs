// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - XP Ledger

use serde::{Deserialize, Serialize};
use tracing::info;
use wasm_bindgen::prelude::*;

use crate::config::LedgerConfig;
use crate::types::{Notification, XpAward, XpSink, MAX_SINGLE_AWARD};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LedgerError {
    #[error("xp amount must be a positive finite number, got {0}")]
    InvalidAmount(f64),
    #[error("xp amount {0} exceeds the single-award cap of {MAX_SINGLE_AWARD}")]
    TooLarge(f64),
}

// ─── Level Curve ─────────────────────────────────────────────────────────────

/// XP needed to clear `level` is `base * level^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelCurve {
    pub base: f64,
    pub exponent: f64,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self::from(&LedgerConfig::default())
    }
}

impl From<&LedgerConfig> for LevelCurve {
    fn from(cfg: &LedgerConfig) -> Self {
        Self { base: cfg.base_xp, exponent: cfg.exponent }
    }
}

impl LevelCurve {
    pub fn threshold(&self, level: u32) -> f64 {
        self.base * (level as f64).powf(self.exponent)
    }

    /// Total XP consumed by clearing levels `1..level`.
    pub fn consumed_below(&self, level: u32) -> f64 {
        (1..level).map(|l| self.threshold(l)).sum()
    }
}

// ─── Ledger State ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerState {
    pub xp: f64,
    pub level: u32,
    pub next_level_xp: f64,
    pub lifetime_xp: f64,
}

impl LedgerState {
    pub fn initial(curve: &LevelCurve) -> Self {
        Self { xp: 0.0, level: 1, next_level_xp: curve.threshold(1), lifetime_xp: 0.0 }
    }
}

/// Pure reducer: fold `award` into `state`, cascading through as many level
/// thresholds as it covers. Returns the new state and every level reached.
pub fn apply_xp(state: LedgerState, award: XpAward, curve: &LevelCurve) -> (LedgerState, Vec<u32>) {
    let mut next = state;
    next.xp += award.amount();
    next.lifetime_xp += award.amount();

    let mut gained = Vec::new();
    while next.xp >= next.next_level_xp {
        next.xp -= next.next_level_xp;
        next.level += 1;
        next.next_level_xp = curve.threshold(next.level);
        gained.push(next.level);
    }
    (next, gained)
}

// ─── XpLedger (session store) ────────────────────────────────────────────────

/// The one XP store shared by every activity. Activities never own it; they
/// receive it as an [`XpSink`] when an action can pay out.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct XpLedger {
    pub(crate) state: LedgerState,
    pub(crate) curve: LevelCurve,
    pub(crate) outbox: Vec<Notification>,
}

impl Default for XpLedger {
    fn default() -> Self {
        Self::with_curve(LevelCurve::default())
    }
}

impl XpLedger {
    pub fn with_curve(curve: LevelCurve) -> Self {
        Self { state: LedgerState::initial(&curve), curve, outbox: Vec::new() }
    }

    pub fn from_config(cfg: &LedgerConfig) -> Self {
        Self::with_curve(LevelCurve::from(cfg))
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn curve(&self) -> &LevelCurve {
        &self.curve
    }

    /// Add XP. Zero is a no-op; anything negative, non-finite or above
    /// [`MAX_SINGLE_AWARD`] is rejected and leaves the ledger untouched.
    pub fn add_xp(&mut self, amount: f64) -> Result<Vec<u32>, LedgerError> {
        if amount == 0.0 {
            return Ok(Vec::new());
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let award = XpAward::new(amount).ok_or(LedgerError::TooLarge(amount))?;
        Ok(self.credit(award, "manual"))
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }
}

impl XpSink for XpLedger {
    fn credit(&mut self, award: XpAward, source: &str) -> Vec<u32> {
        let (next, gained) = apply_xp(self.state, award, &self.curve);
        self.state = next;
        info!(source, amount = award.amount(), level = next.level, xp = next.xp, "xp credited");
        for level in &gained {
            info!(level, "level up");
            self.outbox.push(Notification::success(
                "Level Up!",
                format!("Congratulations! You've reached level {level}!"),
            ));
        }
        gained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn first_level_up_carries_remainder() {
        let mut ledger = XpLedger::default();
        assert_eq!(ledger.add_xp(200.0).unwrap(), vec![2]);
        let s = ledger.state();
        assert_eq!(s.level, 2);
        assert!((s.xp - 50.0).abs() < 1e-9);
        assert!((s.next_level_xp - 424.264_068_7).abs() < 1e-6);
    }

    #[test]
    fn cascades_several_levels_in_one_award() {
        let mut ledger = XpLedger::default();
        let curve = *ledger.curve();
        let amount = curve.consumed_below(5) + 1.0;
        assert_eq!(ledger.add_xp(amount).unwrap(), vec![2, 3, 4, 5]);
        let notes = ledger.take_notifications();
        assert_eq!(notes.len(), 4);
        assert!(notes[3].description.contains("level 5"));
        assert!(ledger.take_notifications().is_empty());
    }

    #[test]
    fn zero_is_noop_and_bad_amounts_are_rejected() {
        let mut ledger = XpLedger::default();
        assert!(ledger.add_xp(0.0).unwrap().is_empty());
        assert_eq!(ledger.add_xp(-5.0), Err(LedgerError::InvalidAmount(-5.0)));
        assert!(matches!(ledger.add_xp(f64::NAN), Err(LedgerError::InvalidAmount(_))));
        assert_eq!(ledger.add_xp(2e9), Err(LedgerError::TooLarge(2e9)));
        assert_eq!(*ledger.state(), LedgerState::initial(ledger.curve()));
    }

    #[test]
    fn rapid_awards_conserve_xp() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut ledger = XpLedger::default();
        let mut total = 0.0;
        for _ in 0..500 {
            let amount = rng.gen_range(0.0..400.0);
            total += amount;
            ledger.add_xp(amount).unwrap();
            let s = ledger.state();
            assert!(s.xp < s.next_level_xp);
        }
        let s = ledger.state();
        let accounted = ledger.curve().consumed_below(s.level) + s.xp;
        assert!((accounted - total).abs() < 1e-6 * total);
        assert!((s.lifetime_xp - total).abs() < 1e-6 * total);
    }
}
