// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - On-Chain Quests

//! Practice quests against mock chain services: claim from a faucet, swap
//! two tokens, provide liquidity. Each quest pays its XP the first time it
//! succeeds. The desk also hosts the fake "free NFT" signature prompt that
//! pops up a few seconds after the challenges page opens.
//!
//! Token lookup and faucet dispensing sit behind [`TokenCatalog`] and
//! [`FaucetProvider`] so a real backend can replace the mocks.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

use crate::config::QuestConfig;
use crate::scoring::RewardGate;
use crate::timers::TimerQueue;
use crate::types::{pay_out, Notification, XpSink};

pub const XP_SOURCE: &str = "quests";

pub const CLASS_ADDRESS: &str = "0x0000000000000000000000000000000000000001";
pub const XP_ADDRESS: &str = "0x0000000000000000000000000000000000000002";

const CLASS_SELL_RATE: f64 = 0.8;
const OTHER_SELL_RATE: f64 = 1.2;
/// Relative slack allowed on the second side of a liquidity deposit.
const RATIO_TOLERANCE: f64 = 0.01;

// ─── Providers ───────────────────────────────────────────────────────────────

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub symbol: String,
    pub address: String,
}

impl Asset {
    pub fn new(symbol: &str, address: &str) -> Self {
        Self { symbol: symbol.to_string(), address: address.to_string() }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FaucetReceipt {
    pub message: String,
    pub tx_hash: String,
}

/// Source of the tradable token list.
pub trait TokenCatalog {
    fn assets(&self) -> Vec<Asset>;
}

/// Dispenses test tokens to an address.
pub trait FaucetProvider {
    fn dispense(&mut self, token: &str, recipient: &str) -> Result<FaucetReceipt, QuestError>;
}

/// The two classroom tokens, CLASS and XP.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockCatalog;

impl TokenCatalog for MockCatalog {
    fn assets(&self) -> Vec<Asset> {
        vec![Asset::new("CLASS", CLASS_ADDRESS), Asset::new("XP", XP_ADDRESS)]
    }
}

/// Always succeeds with a fixed hash.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockFaucet;

impl FaucetProvider for MockFaucet {
    fn dispense(&mut self, _token: &str, _recipient: &str) -> Result<FaucetReceipt, QuestError> {
        Ok(FaucetReceipt {
            message: "Tokens dispensed successfully!".to_string(),
            tx_hash: "0x1234567890abcdef".to_string(),
        })
    }
}

// ─── Errors / results ────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum QuestError {
    #[error("select a token and enter your address")]
    MissingInput,
    #[error("amount must be a positive number, got {0}")]
    InvalidAmount(f64),
    #[error("cannot swap a token for itself")]
    SameToken,
    #[error("unknown token {0}")]
    UnknownToken(String),
    #[error("the catalog offers no token pair")]
    NoPair,
    #[error("{0:?} transaction reverted")]
    TransactionFailed(QuestKind),
    #[error("faucet unavailable: {0}")]
    Faucet(String),
    #[error("the airdrop prompt is not open")]
    AlertClosed,
    #[error("no quest named `{0}`")]
    UnknownQuest(String),
    #[error("pool ratio needs {expected} of the second token, got {got}")]
    RatioMismatch { expected: f64, got: f64 },
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestKind {
    Faucet,
    Swap,
    Liquidity,
}

impl std::str::FromStr for QuestKind {
    type Err = QuestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "faucet" => Ok(QuestKind::Faucet),
            "swap" => Ok(QuestKind::Swap),
            "liquidity" => Ok(QuestKind::Liquidity),
            other => Err(QuestError::UnknownQuest(other.to_string())),
        }
    }
}

impl QuestKind {
    /// Quest board id.
    pub fn id(self) -> u32 {
        match self {
            QuestKind::Faucet => 4,
            QuestKind::Swap => 2,
            QuestKind::Liquidity => 3,
        }
    }

    fn slot(self) -> usize {
        match self {
            QuestKind::Faucet => 0,
            QuestKind::Swap => 1,
            QuestKind::Liquidity => 2,
        }
    }

    fn blurb(self) -> &'static str {
        match self {
            QuestKind::Faucet => "using the faucet",
            QuestKind::Swap => "swapping tokens",
            QuestKind::Liquidity => "providing liquidity",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestReceipt {
    pub quest: QuestKind,
    pub message: String,
    pub tx_hash: String,
    /// Zero when the quest had already been completed.
    pub xp_awarded: u32,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlertState {
    #[default]
    Pending,
    Open,
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Task {
    ShowAlert,
}

// ─── QuestDesk (session) ─────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct QuestDesk {
    pub(crate) config: QuestConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) catalog: Box<dyn TokenCatalog>,
    pub(crate) faucet: Box<dyn FaucetProvider>,
    pub(crate) quests: [RewardGate; 3],
    pub(crate) timers: TimerQueue<Task>,
    pub(crate) alert: AlertState,
    pub(crate) alert_reward: RewardGate,
    pub(crate) outbox: Vec<Notification>,
}

impl QuestDesk {
    pub fn with_config(config: QuestConfig, seed: u64) -> Self {
        Self::with_providers(config, seed, Box::new(MockCatalog), Box::new(MockFaucet))
    }

    pub fn with_providers(
        config: QuestConfig,
        seed: u64,
        catalog: Box<dyn TokenCatalog>,
        faucet: Box<dyn FaucetProvider>,
    ) -> Self {
        let mut timers = TimerQueue::new();
        timers.schedule_once(config.scam_alert_delay_ms, Task::ShowAlert);
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            catalog,
            faucet,
            quests: Default::default(),
            timers,
            alert: AlertState::Pending,
            alert_reward: RewardGate::default(),
            outbox: Vec::new(),
        }
    }

    pub fn assets(&self) -> Vec<Asset> {
        self.catalog.assets()
    }

    pub fn is_completed(&self, quest: QuestKind) -> bool {
        !self.quests[quest.slot()].is_open()
    }

    pub fn alert(&self) -> AlertState {
        self.alert
    }

    fn find(&self, address: &str) -> Result<Asset, QuestError> {
        self.catalog
            .assets()
            .into_iter()
            .find(|a| a.address == address)
            .ok_or_else(|| QuestError::UnknownToken(address.to_string()))
    }

    // ─── Faucet ──────────────────────────────────────────────────────────────

    pub fn request_faucet(
        &mut self,
        token: &str,
        recipient: &str,
        sink: &mut dyn XpSink,
    ) -> Result<QuestReceipt, QuestError> {
        let recipient = recipient.trim();
        if token.is_empty() || recipient.is_empty() {
            return Err(QuestError::MissingInput);
        }
        self.find(token)?;
        let receipt = match self.faucet.dispense(token, recipient) {
            Ok(receipt) => receipt,
            Err(err) => {
                self.outbox.push(Notification::destructive(
                    "Faucet Request Failed",
                    "Could not dispense tokens. Please try again later.",
                ));
                return Err(err);
            }
        };
        let short: String = receipt.tx_hash.chars().take(10).collect();
        self.outbox.push(Notification::new("Success!", format!("{} Tx: {short}...", receipt.message)));
        Ok(self.complete(QuestKind::Faucet, receipt, sink))
    }

    // ─── Swap ────────────────────────────────────────────────────────────────

    /// Output estimate for selling `amount` of `from` into `to`.
    pub fn quote_swap(&self, from: &str, to: &str, amount: f64) -> Result<f64, QuestError> {
        check_amount(amount)?;
        if from == to {
            return Err(QuestError::SameToken);
        }
        let sold = self.find(from)?;
        self.find(to)?;
        let rate = if sold.symbol == "CLASS" { CLASS_SELL_RATE } else { OTHER_SELL_RATE };
        Ok(amount * rate)
    }

    pub fn swap(&mut self, from: &str, to: &str, amount: f64, sink: &mut dyn XpSink) -> Result<QuestReceipt, QuestError> {
        let out = self.quote_swap(from, to, amount)?;
        self.settle_tx(QuestKind::Swap)?;
        let receipt = FaucetReceipt { message: "Swap successful!".to_string(), tx_hash: self.fake_hash() };
        info!(from, to, amount, out, "swap executed");
        self.outbox.push(Notification::new(
            "Swap Submitted!",
            format!("{} Tx: {}", receipt.message, receipt.tx_hash),
        ));
        Ok(self.complete(QuestKind::Swap, receipt, sink))
    }

    // ─── Liquidity ───────────────────────────────────────────────────────────

    /// The pool pair: the first two catalog entries.
    pub fn liquidity_pair(&self) -> Result<(Asset, Asset), QuestError> {
        let mut assets = self.catalog.assets().into_iter();
        match (assets.next(), assets.next()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(QuestError::NoPair),
        }
    }

    /// Matching second-side amount for `amount_a` of the first token.
    pub fn quote_liquidity(&self, amount_a: f64) -> Result<f64, QuestError> {
        check_amount(amount_a)?;
        Ok(amount_a * self.config.liquidity_ratio)
    }

    pub fn add_liquidity(&mut self, amount_a: f64, amount_b: f64, sink: &mut dyn XpSink) -> Result<QuestReceipt, QuestError> {
        let (a, b) = self.liquidity_pair()?;
        let expected = self.quote_liquidity(amount_a)?;
        check_amount(amount_b)?;
        if (amount_b - expected).abs() > expected * RATIO_TOLERANCE {
            return Err(QuestError::RatioMismatch { expected, got: amount_b });
        }
        self.settle_tx(QuestKind::Liquidity)?;
        let receipt = FaucetReceipt { message: "Liquidity added successfully!".to_string(), tx_hash: self.fake_hash() };
        info!(amount_a, token_a = %a.symbol, amount_b, token_b = %b.symbol, "liquidity added");
        self.outbox.push(Notification::new(
            "Liquidity Added!",
            format!("{} Tx: {}", receipt.message, receipt.tx_hash),
        ));
        Ok(self.complete(QuestKind::Liquidity, receipt, sink))
    }

    // ----

    /// Roll the simulated revert.
    fn settle_tx(&mut self, quest: QuestKind) -> Result<(), QuestError> {
        if self.rng.gen::<f64>() < self.config.failure_rate {
            warn!(?quest, "simulated transaction reverted");
            let (title, body) = match quest {
                QuestKind::Liquidity => (
                    "Failed to Add Liquidity",
                    "The transaction could not be completed. Please try again.",
                ),
                _ => ("Swap Failed", "The swap could not be completed. Please try again."),
            };
            self.outbox.push(Notification::destructive(title, body));
            return Err(QuestError::TransactionFailed(quest));
        }
        Ok(())
    }

    fn fake_hash(&mut self) -> String {
        let bits: u64 = self.rng.gen::<u64>() & 0xff_ffff_ffff;
        format!("0x{bits:010x}...")
    }

    fn complete(&mut self, quest: QuestKind, receipt: FaucetReceipt, sink: &mut dyn XpSink) -> QuestReceipt {
        let mut xp_awarded = 0;
        if self.quests[quest.slot()].claim() {
            let xp = match quest {
                QuestKind::Faucet => self.config.faucet_xp,
                QuestKind::Swap => self.config.swap_xp,
                QuestKind::Liquidity => self.config.liquidity_xp,
            };
            pay_out(sink, xp as f64, XP_SOURCE);
            xp_awarded = xp;
            self.outbox.push(Notification::new(
                "Quest Complete!",
                format!("You earned {xp} XP for {}!", quest.blurb()),
            ));
        }
        QuestReceipt { quest, message: receipt.message, tx_hash: receipt.tx_hash, xp_awarded }
    }

    // ─── Airdrop prompt ──────────────────────────────────────────────────────

    pub fn advance(&mut self, elapsed_ms: u64) {
        let until = self.timers.now().saturating_add(elapsed_ms);
        while let Some(Task::ShowAlert) = self.timers.pop_due(until) {
            if self.alert == AlertState::Pending {
                self.alert = AlertState::Open;
            }
        }
        self.timers.settle(until);
    }

    /// "This is a SCAM!" Pays the spotting bonus once.
    pub fn report_scam(&mut self, sink: &mut dyn XpSink) -> Result<u32, QuestError> {
        self.close_alert()?;
        if !self.alert_reward.claim() {
            return Ok(0);
        }
        let xp = self.config.scam_alert_xp;
        pay_out(sink, xp as f64, XP_SOURCE);
        self.outbox.push(
            Notification::success(
                "Scam Avoided! \u{1f389}",
                format!(
                    "Great job! You spotted your first scam and earned {xp} XP. Always be vigilant!"
                ),
            )
            .with_duration(5000),
        );
        Ok(xp)
    }

    /// "Sign & Claim NFT". Nothing is lost, but the player is told off.
    pub fn sign_scam(&mut self) -> Result<(), QuestError> {
        self.close_alert()?;
        self.outbox.push(
            Notification::destructive(
                "Uh Oh! You're Rekt! \u{1f480}",
                "Signing unknown transactions can be risky. Luckily, this was just a simulation! Always verify DApps and transaction details.",
            )
            .with_duration(7000),
        );
        Ok(())
    }

    fn close_alert(&mut self) -> Result<(), QuestError> {
        if self.alert != AlertState::Open {
            return Err(QuestError::AlertClosed);
        }
        self.alert = AlertState::Dismissed;
        Ok(())
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }
}

fn check_amount(amount: f64) -> Result<(), QuestError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(QuestError::InvalidAmount(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordingSink;

    fn reliable() -> QuestDesk {
        QuestDesk::with_config(QuestConfig { failure_rate: 0.0, ..QuestConfig::default() }, 5)
    }

    struct DryFaucet;

    impl FaucetProvider for DryFaucet {
        fn dispense(&mut self, _token: &str, _recipient: &str) -> Result<FaucetReceipt, QuestError> {
            Err(QuestError::Faucet("rate limited".into()))
        }
    }

    #[test]
    fn swap_quotes_follow_direction() {
        let desk = reliable();
        assert_eq!(desk.quote_swap(CLASS_ADDRESS, XP_ADDRESS, 10.0), Ok(8.0));
        assert_eq!(desk.quote_swap(XP_ADDRESS, CLASS_ADDRESS, 10.0), Ok(12.0));
        assert_eq!(desk.quote_swap(XP_ADDRESS, XP_ADDRESS, 1.0), Err(QuestError::SameToken));
        assert_eq!(desk.quote_swap(XP_ADDRESS, CLASS_ADDRESS, -1.0), Err(QuestError::InvalidAmount(-1.0)));
        assert!(matches!(desk.quote_swap("0xdead", CLASS_ADDRESS, 1.0), Err(QuestError::UnknownToken(_))));
    }

    #[test]
    fn each_quest_pays_once() {
        let mut desk = reliable();
        let mut sink = RecordingSink::default();
        assert_eq!(desk.request_faucet(CLASS_ADDRESS, "0xabc", &mut sink).unwrap().xp_awarded, 50);
        assert_eq!(desk.request_faucet(CLASS_ADDRESS, "0xabc", &mut sink).unwrap().xp_awarded, 0);
        assert_eq!(desk.swap(CLASS_ADDRESS, XP_ADDRESS, 5.0, &mut sink).unwrap().xp_awarded, 75);
        assert_eq!(desk.add_liquidity(10.0, 8.0, &mut sink).unwrap().xp_awarded, 100);
        assert_eq!(desk.add_liquidity(10.0, 8.0, &mut sink).unwrap().xp_awarded, 0);
        assert_eq!(sink.total(), 225.0);
        assert!(desk.is_completed(QuestKind::Swap));
    }

    #[test]
    fn liquidity_must_match_the_pool_ratio() {
        let mut desk = reliable();
        let mut sink = RecordingSink::default();
        assert_eq!(desk.quote_liquidity(10.0), Ok(8.0));
        assert_eq!(
            desk.add_liquidity(10.0, 100.0, &mut sink),
            Err(QuestError::RatioMismatch { expected: 8.0, got: 100.0 })
        );
        assert_eq!(desk.add_liquidity(10.0, -8.0, &mut sink), Err(QuestError::InvalidAmount(-8.0)));
        assert!(!desk.is_completed(QuestKind::Liquidity));
        assert!(sink.awards.is_empty());
        assert_eq!(desk.add_liquidity(10.0, 8.05, &mut sink).unwrap().xp_awarded, 100);
    }

    #[test]
    fn faucet_needs_inputs_and_reports_provider_errors() {
        let mut sink = RecordingSink::default();
        let mut desk = reliable();
        assert_eq!(desk.request_faucet(CLASS_ADDRESS, "  ", &mut sink), Err(QuestError::MissingInput));
        let mut dry = QuestDesk::with_providers(QuestConfig::default(), 1, Box::new(MockCatalog), Box::new(DryFaucet));
        assert!(matches!(dry.request_faucet(XP_ADDRESS, "0xabc", &mut sink), Err(QuestError::Faucet(_))));
        assert_eq!(dry.take_notifications()[0].title, "Faucet Request Failed");
        assert!(sink.awards.is_empty());
    }

    #[test]
    fn reverted_transactions_pay_nothing() {
        let mut desk = QuestDesk::with_config(QuestConfig { failure_rate: 1.0, ..QuestConfig::default() }, 3);
        let mut sink = RecordingSink::default();
        assert_eq!(
            desk.swap(CLASS_ADDRESS, XP_ADDRESS, 1.0, &mut sink),
            Err(QuestError::TransactionFailed(QuestKind::Swap))
        );
        assert!(!desk.is_completed(QuestKind::Swap));
        assert!(sink.awards.is_empty());
    }

    #[test]
    fn failure_rate_is_roughly_respected() {
        let mut desk = QuestDesk::with_config(QuestConfig::default(), 42);
        let mut sink = RecordingSink::default();
        let failures = (0..2000)
            .filter(|_| desk.swap(CLASS_ADDRESS, XP_ADDRESS, 1.0, &mut sink).is_err())
            .count();
        assert!((100..300).contains(&failures), "failures = {failures}");
    }

    #[test]
    fn airdrop_prompt_opens_after_delay_and_pays_once() {
        let mut desk = reliable();
        let mut sink = RecordingSink::default();
        assert_eq!(desk.report_scam(&mut sink), Err(QuestError::AlertClosed));
        desk.advance(2999);
        assert_eq!(desk.alert(), AlertState::Pending);
        desk.advance(1);
        assert_eq!(desk.alert(), AlertState::Open);
        assert_eq!(desk.report_scam(&mut sink), Ok(5));
        assert_eq!(desk.sign_scam(), Err(QuestError::AlertClosed));
        desk.advance(60_000);
        assert_eq!(desk.alert(), AlertState::Dismissed);
        assert_eq!(sink.total(), 5.0);
    }

    #[test]
    fn signing_the_airdrop_warns() {
        let mut desk = reliable();
        desk.advance(3000);
        desk.sign_scam().unwrap();
        let notes = desk.take_notifications();
        assert_eq!(notes[0].variant, crate::types::Variant::Destructive);
        assert_eq!(notes[0].duration_ms, Some(7000));
    }
}
