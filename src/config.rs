// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Engine Configuration

//! Tunables for every activity. All sections default to the shipped game
//! balance, so a host only overrides what it needs:
//!
//! ```json
//! { "market": { "max_days": 10 }, "chat": { "xp_reward": 50 } }
//! ```

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, format!("{value} is outside [0, 1]")));
    }
    Ok(())
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(field, format!("{value} must be a positive number")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ledger: LedgerConfig,
    pub market: MarketConfig,
    pub chat: ChatConfig,
    pub quiz: QuizConfig,
    pub rug_pull: RugPullConfig,
    pub whack: WhackConfig,
    pub quests: QuestConfig,
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ledger.base_xp.is_finite() && self.ledger.base_xp >= 1.0) {
            return Err(invalid("ledger.base_xp", "must be at least 1"));
        }
        if !(1.0..=4.0).contains(&self.ledger.exponent) {
            return Err(invalid("ledger.exponent", "must be within 1..=4"));
        }

        if self.market.max_days == 0 {
            return Err(invalid("market.max_days", "a cycle needs at least one day"));
        }
        check_positive("market.initial_balance", self.market.initial_balance)?;
        if !(0.0..=100.0).contains(&self.market.default_investment_pct) {
            return Err(invalid("market.default_investment_pct", "must be within 0..=100"));
        }
        if !(0.0..=100.0).contains(&self.market.ignore_preview_pct) {
            return Err(invalid("market.ignore_preview_pct", "must be within 0..=100"));
        }

        if self.chat.ambient_interval_ms == 0 {
            return Err(invalid("chat.ambient_interval_ms", "interval cannot be zero"));
        }

        check_probability("quiz.pass_ratio", self.quiz.pass_ratio)?;
        check_probability("rug_pull.pass_ratio", self.rug_pull.pass_ratio)?;

        if self.whack.duration_secs == 0 {
            return Err(invalid("whack.duration_secs", "round cannot be zero seconds"));
        }
        if self.whack.refresh_ms == 0 {
            return Err(invalid("whack.refresh_ms", "interval cannot be zero"));
        }
        check_probability("whack.scammer_chance", self.whack.scammer_chance)?;
        check_probability("whack.hide_chance", self.whack.hide_chance)?;
        check_probability("whack.double_chance", self.whack.double_chance)?;
        if !(self.whack.xp_per_point.is_finite() && self.whack.xp_per_point >= 0.0) {
            return Err(invalid("whack.xp_per_point", "must be a non-negative number"));
        }

        check_probability("quests.failure_rate", self.quests.failure_rate)?;
        check_positive("quests.liquidity_ratio", self.quests.liquidity_ratio)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Level curve: XP to clear `level` is `base_xp * level^exponent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub base_xp: f64,
    pub exponent: f64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { base_xp: 150.0, exponent: 1.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub max_days: u32,
    pub initial_balance: f64,
    /// Upper bound of the end-of-cycle award.
    pub xp_reward: u32,
    pub default_investment_pct: f64,
    /// Award when the final value is at or below 10% of the starting balance.
    pub rekt_xp: u32,
    /// Award for finishing at a loss without getting wiped out.
    pub survivor_xp: u32,
    /// Stake used to price the "you missed out" message when ignoring an event.
    pub ignore_preview_pct: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            max_days: 30,
            initial_balance: 1000.0,
            xp_reward: 250,
            default_investment_pct: 25.0,
            rekt_xp: 5,
            survivor_xp: 10,
            ignore_preview_pct: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub xp_reward: u32,
    pub notice_delay_ms: u64,
    pub greeting_delay_ms: u64,
    pub link_delay_ms: u64,
    pub replay_delay_ms: u64,
    pub ambient_first_ms: u64,
    pub ambient_second_ms: u64,
    pub ambient_interval_ms: u64,
    /// Fake XYZ drained when the player signs the malicious transaction.
    pub simulated_loss: f64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            xp_reward: 100,
            notice_delay_ms: 2000,
            greeting_delay_ms: 1000,
            link_delay_ms: 2500,
            replay_delay_ms: 500,
            ambient_first_ms: 500,
            ambient_second_ms: 1500,
            ambient_interval_ms: 6000,
            simulated_loss: 10_000.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Fraction of correct answers needed before the quiz pays out. Zero means
    /// any positive score is enough.
    pub pass_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RugPullConfig {
    pub xp_reward: u32,
    pub pass_ratio: f64,
}

impl Default for RugPullConfig {
    fn default() -> Self {
        Self { xp_reward: 150, pass_ratio: 0.75 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhackConfig {
    pub duration_secs: u32,
    pub refresh_ms: u64,
    pub scammer_chance: f64,
    pub hide_chance: f64,
    pub double_chance: f64,
    pub xp_per_point: f64,
}

impl Default for WhackConfig {
    fn default() -> Self {
        Self {
            duration_secs: 30,
            refresh_ms: 1000,
            scammer_chance: 0.7,
            hide_chance: 0.6,
            double_chance: 0.2,
            xp_per_point: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestConfig {
    pub faucet_xp: u32,
    pub swap_xp: u32,
    pub liquidity_xp: u32,
    pub scam_alert_xp: u32,
    /// Chance that a simulated swap or deposit is "reverted".
    pub failure_rate: f64,
    /// XP tokens per CLASS token in the liquidity pool.
    pub liquidity_ratio: f64,
    /// Delay before the fake airdrop prompt pops up.
    pub scam_alert_delay_ms: u64,
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            faucet_xp: 50,
            swap_xp: 75,
            liquidity_xp: 100,
            scam_alert_xp: 5,
            failure_rate: 0.1,
            liquidity_ratio: 0.8,
            scam_alert_delay_ms: 3000,
        }
    }
}
