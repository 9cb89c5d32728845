// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Market Sentiment

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Euphoric,
    Bullish,
    #[default]
    Neutral,
    Bearish,
    Panic,
}

impl Sentiment {
    pub const ALL: [Sentiment; 5] = [
        Sentiment::Euphoric,
        Sentiment::Bullish,
        Sentiment::Neutral,
        Sentiment::Bearish,
        Sentiment::Panic,
    ];

    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_roll(rng.gen::<f64>())
    }

    /// Cumulative weights: panic 5%, bearish 15%, neutral 50%, bullish 20%,
    /// euphoric 10%.
    pub fn from_roll(r: f64) -> Self {
        if r < 0.05 {
            Sentiment::Panic
        } else if r < 0.20 {
            Sentiment::Bearish
        } else if r < 0.70 {
            Sentiment::Neutral
        } else if r < 0.90 {
            Sentiment::Bullish
        } else {
            Sentiment::Euphoric
        }
    }

    /// Added to an event's failure chance. Buying tops in euphoria is the
    /// riskiest move in the game.
    pub fn failure_adjustment(self) -> f64 {
        match self {
            Sentiment::Panic => 0.25,
            Sentiment::Bearish => 0.10,
            Sentiment::Euphoric => 0.30,
            Sentiment::Bullish => -0.05,
            Sentiment::Neutral => 0.0,
        }
    }

    pub fn profit_scale(self) -> f64 {
        match self {
            Sentiment::Euphoric => 1.5,
            Sentiment::Bullish => 1.2,
            Sentiment::Neutral => 1.0,
            Sentiment::Bearish => 0.8,
            Sentiment::Panic => 0.5,
        }
    }

    pub fn is_risk_on(self) -> bool {
        matches!(self, Sentiment::Bullish | Sentiment::Euphoric)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Euphoric => "euphoric",
            Sentiment::Bullish => "bullish",
            Sentiment::Neutral => "neutral",
            Sentiment::Bearish => "bearish",
            Sentiment::Panic => "panic",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn roll_thresholds_are_cumulative() {
        assert_eq!(Sentiment::from_roll(0.0), Sentiment::Panic);
        assert_eq!(Sentiment::from_roll(0.05), Sentiment::Bearish);
        assert_eq!(Sentiment::from_roll(0.19), Sentiment::Bearish);
        assert_eq!(Sentiment::from_roll(0.20), Sentiment::Neutral);
        assert_eq!(Sentiment::from_roll(0.75), Sentiment::Bullish);
        assert_eq!(Sentiment::from_roll(0.95), Sentiment::Euphoric);
    }

    #[test]
    fn roll_distribution_roughly_matches_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let n = 20_000;
        let neutral = (0..n).filter(|_| Sentiment::roll(&mut rng) == Sentiment::Neutral).count();
        let share = neutral as f64 / n as f64;
        assert!((share - 0.5).abs() < 0.02, "neutral share {share}");
    }
}
