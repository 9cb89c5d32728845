// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Challenge Scoring Rules

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// XP for one correct answer at this tier.
    pub fn xp(self) -> u32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 10,
            Difficulty::Hard => 15,
        }
    }
}

/// Uniform (Fisher-Yates) permutation of `items`.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

/// Correct answers needed to pass: `ceil(total * ratio)`.
pub fn pass_mark(total: usize, ratio: f64) -> usize {
    (total as f64 * ratio.clamp(0.0, 1.0)).ceil() as usize
}

/// One-shot reward latch. Once claimed it stays shut until [`rearm`] is
/// called by an explicit restart.
///
/// [`rearm`]: RewardGate::rearm
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardGate {
    claimed: bool,
}

impl RewardGate {
    pub fn is_open(&self) -> bool {
        !self.claimed
    }

    /// Close the gate. Returns `true` only for the call that closed it.
    pub fn claim(&mut self) -> bool {
        !std::mem::replace(&mut self.claimed, true)
    }

    pub fn rearm(&mut self) {
        self.claimed = false;
    }
}

/// Running tally for one attempt.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub answered: u32,
    pub correct: u32,
    pub xp: u32,
}

impl Tally {
    pub fn record(&mut self, correct: bool, xp: u32) {
        self.answered += 1;
        if correct {
            self.correct += 1;
            self.xp += xp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn difficulty_tiers() {
        assert_eq!(Difficulty::Easy.xp(), 5);
        assert_eq!(Difficulty::Medium.xp(), 10);
        assert_eq!(Difficulty::Hard.xp(), 15);
    }

    #[test]
    fn pass_mark_rounds_up() {
        assert_eq!(pass_mark(4, 0.75), 3);
        assert_eq!(pass_mark(5, 0.75), 4);
        assert_eq!(pass_mark(6, 0.0), 0);
        assert_eq!(pass_mark(3, 1.0), 3);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let items: Vec<u32> = (1..=6).collect();
        let mut out = shuffled(&items, &mut rng);
        out.sort_unstable();
        assert_eq!(out, items);
    }

    #[test]
    fn gate_claims_once_until_rearmed() {
        let mut gate = RewardGate::default();
        assert!(gate.claim());
        assert!(!gate.claim());
        assert!(!gate.is_open());
        gate.rearm();
        assert!(gate.claim());
    }
}
