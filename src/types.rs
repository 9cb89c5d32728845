// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Shared Type Definitions

use serde::{Deserialize, Serialize};

/// Largest amount a single award may carry. Anything above is treated as a caller bug.
pub const MAX_SINGLE_AWARD: f64 = 1_000_000_000.0;

// ─── Notification Variant ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Default,
    Success,
    Destructive,
}

// ─── Notification ────────────────────────────────────────────────────────────

/// A user-visible toast. The engine only produces these; the UI renders them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub variant: Variant,
    #[serde(default)]
    pub duration_ms: Option<u32>,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Default,
            duration_ms: None,
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { variant: Variant::Success, ..Self::new(title, description) }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { variant: Variant::Destructive, ..Self::new(title, description) }
    }

    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

// ─── XpAward ─────────────────────────────────────────────────────────────────

/// A validated XP amount: finite, strictly positive, at most [`MAX_SINGLE_AWARD`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct XpAward(f64);

impl XpAward {
    /// Returns `None` for zero, negative, non-finite or oversized amounts.
    pub fn new(amount: f64) -> Option<Self> {
        if amount.is_finite() && amount > 0.0 && amount <= MAX_SINGLE_AWARD {
            Some(Self(amount))
        } else {
            None
        }
    }

    pub fn amount(&self) -> f64 {
        self.0
    }
}

// ─── XpSink ──────────────────────────────────────────────────────────────────

/// Anything that can receive XP. Activities hold no ledger of their own; the
/// caller hands them the sink when an action may pay out.
pub trait XpSink {
    /// Credit `award`, returning the levels reached in ascending order.
    fn credit(&mut self, award: XpAward, source: &str) -> Vec<u32>;
}

/// Sink that only records awards. Used by the balance runner and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub awards: Vec<(String, f64)>,
}

impl RecordingSink {
    pub fn total(&self) -> f64 {
        self.awards.iter().map(|(_, amount)| amount).sum()
    }
}

impl XpSink for RecordingSink {
    fn credit(&mut self, award: XpAward, source: &str) -> Vec<u32> {
        self.awards.push((source.to_string(), award.amount()));
        Vec::new()
    }
}

/// Pay `amount` into `sink` if it forms a valid award. Returns the amount paid.
pub(crate) fn pay_out(sink: &mut dyn XpSink, amount: f64, source: &str) -> f64 {
    match XpAward::new(amount) {
        Some(award) => {
            sink.credit(award, source);
            award.amount()
        }
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn award_rejects_non_positive_and_non_finite() {
        assert!(XpAward::new(0.0).is_none());
        assert!(XpAward::new(-1.0).is_none());
        assert!(XpAward::new(f64::NAN).is_none());
        assert!(XpAward::new(f64::INFINITY).is_none());
        assert!(XpAward::new(MAX_SINGLE_AWARD * 2.0).is_none());
        assert_eq!(XpAward::new(12.5).map(|a| a.amount()), Some(12.5));
    }

    #[test]
    fn pay_out_skips_zero() {
        let mut sink = RecordingSink::default();
        assert_eq!(pay_out(&mut sink, 0.0, "quiz"), 0.0);
        assert_eq!(pay_out(&mut sink, 15.0, "quiz"), 15.0);
        assert_eq!(sink.awards, vec![("quiz".to_string(), 15.0)]);
    }

    #[test]
    fn notification_serializes_variant_lowercase() {
        let n = Notification::destructive("Swap Failed", "try again").with_duration(5000);
        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains("\"destructive\""));
        assert!(json.contains("5000"));
    }
}
