// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Balance Runner Strategies

use abc_defi_engine::market::events::MarketEvent;
use abc_defi_engine::market::sentiment::Sentiment;
use abc_defi_engine::market::sim::{failure_chance, MarketState, PlayerAction};

/// A scripted player for the DeFi Degen market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Never invests.
    PaperHands,
    /// Quarter stake on everything.
    Steady,
    /// All in, every day.
    FullDegen,
    /// Skips high-risk events and anything more likely to fail than not.
    RiskAware,
    /// Buys fear, sells greed.
    Contrarian,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::PaperHands,
        Strategy::Steady,
        Strategy::FullDegen,
        Strategy::RiskAware,
        Strategy::Contrarian,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::PaperHands => "PAPER_HANDS",
            Strategy::Steady => "STEADY_25",
            Strategy::FullDegen => "FULL_DEGEN",
            Strategy::RiskAware => "RISK_AWARE",
            Strategy::Contrarian => "CONTRARIAN",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Strategy::PaperHands => "Paper Hands",
            Strategy::Steady => "Steady 25%",
            Strategy::FullDegen => "Full Degen",
            Strategy::RiskAware => "Risk Aware",
            Strategy::Contrarian => "Contrarian",
        }
    }

    pub fn decide(self, state: &MarketState, event: &MarketEvent) -> PlayerAction {
        match self {
            Strategy::PaperHands => PlayerAction::Ignore,
            Strategy::Steady => PlayerAction::Invest { percent: 25.0 },
            Strategy::FullDegen => PlayerAction::Invest { percent: 100.0 },
            Strategy::RiskAware => {
                if event.high_risk || failure_chance(event, state.sentiment) > 0.5 {
                    PlayerAction::Ignore
                } else {
                    PlayerAction::Invest { percent: 25.0 }
                }
            }
            Strategy::Contrarian => match state.sentiment {
                Sentiment::Panic | Sentiment::Bearish => PlayerAction::Invest { percent: 50.0 },
                Sentiment::Euphoric => PlayerAction::Ignore,
                _ => PlayerAction::Invest { percent: 10.0 },
            },
        }
    }

    pub fn matches(self, filter: &str) -> bool {
        let f = filter.to_lowercase();
        self.name().to_lowercase().contains(&f) || self.label().to_lowercase().contains(&f)
    }
}
