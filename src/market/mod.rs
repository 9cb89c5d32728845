// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - DeFi Degen Market Simulator

pub mod events;
pub mod sentiment;
pub mod sim;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;
use wasm_bindgen::prelude::*;

use crate::config::MarketConfig;
use crate::scoring::RewardGate;
use crate::types::{pay_out, Notification, XpSink};
use events::MarketEvent;
use sentiment::Sentiment;
use sim::{ActionOutcome, HistoryPoint, MarketState, PlayerAction};

pub const XP_SOURCE: &str = "defi-degen";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MarketError {
    #[error("the cycle is over -- restart to play again")]
    GameOver,
    #[error("decide on today's event before moving on")]
    EventPending,
    #[error("no event is waiting for a decision")]
    NoActiveEvent,
    #[error("investment percentage must be within 0..=100, got {0}")]
    InvalidPercentage(f64),
    #[error("no cycle in progress -- call start first")]
    NotPlaying,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    #[default]
    Idle,
    Playing,
    Finished,
}

/// Result of moving past an outcome screen.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DayStep {
    Advanced { day: u32 },
    Finished {
        #[serde(rename = "earnedXp")]
        earned_xp: u32,
    },
}

/// Everything the UI needs to draw the game in one object.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MarketView<'a> {
    pub phase: GamePhase,
    pub day: u32,
    pub max_days: u32,
    pub balance: f64,
    pub sentiment: Sentiment,
    pub risk_penalty: u32,
    pub investment_pct: f64,
    pub current_event: Option<&'static MarketEvent>,
    pub last_outcome: Option<&'a ActionOutcome>,
    pub status: Option<&'a str>,
    pub earned_xp: u32,
    pub history: &'a [HistoryPoint],
}

// ─── DegenGame (session) ─────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct DegenGame {
    pub(crate) config: MarketConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) state: MarketState,
    pub(crate) phase: GamePhase,
    pub(crate) investment_pct: f64,
    pub(crate) last_outcome: Option<ActionOutcome>,
    pub(crate) status: Option<String>,
    pub(crate) earned_xp: u32,
    pub(crate) reward: RewardGate,
    pub(crate) outbox: Vec<Notification>,
}

impl DegenGame {
    pub fn with_config(config: MarketConfig, seed: u64) -> Self {
        Self {
            state: MarketState::new(&config),
            investment_pct: config.default_investment_pct,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            phase: GamePhase::Idle,
            last_outcome: None,
            status: None,
            earned_xp: 0,
            reward: RewardGate::default(),
            outbox: Vec::new(),
        }
    }

    pub fn state(&self) -> &MarketState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn investment_pct(&self) -> f64 {
        self.investment_pct
    }

    pub fn last_outcome(&self) -> Option<&ActionOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn view(&self) -> MarketView<'_> {
        MarketView {
            phase: self.phase,
            day: self.state.day,
            max_days: self.state.max_days,
            balance: self.state.balance,
            sentiment: self.state.sentiment,
            risk_penalty: self.state.risk_penalty,
            investment_pct: self.investment_pct,
            current_event: self.state.event(),
            last_outcome: self.last_outcome.as_ref(),
            status: self.status.as_deref(),
            earned_xp: self.earned_xp,
            history: &self.state.history,
        }
    }

    /// Fresh cycle: wipe state, re-arm the reward and deal day 1.
    pub fn start(&mut self) -> Result<(), MarketError> {
        self.state = MarketState::new(&self.config);
        self.phase = GamePhase::Playing;
        self.investment_pct = self.config.default_investment_pct;
        self.last_outcome = None;
        self.status = None;
        self.earned_xp = 0;
        self.reward.rearm();
        self.state = sim::advance_day(&self.state, &mut self.rng)?;
        Ok(())
    }

    pub fn restart(&mut self) -> Result<(), MarketError> {
        self.start()?;
        self.outbox.push(Notification::new("Restarting Cycle!", "Fresh start, fresh pain. Good luck!"));
        Ok(())
    }

    pub fn set_investment_pct(&mut self, percent: f64) -> Result<(), MarketError> {
        sim::validate_percent(percent)?;
        self.investment_pct = percent;
        Ok(())
    }

    /// Act on today's event. `Invest` uses the percent carried by the action.
    pub fn act(&mut self, action: PlayerAction) -> Result<&ActionOutcome, MarketError> {
        if self.phase != GamePhase::Playing {
            return Err(MarketError::NotPlaying);
        }
        let (next, outcome) = sim::resolve_action_with_preview(
            &self.state,
            action,
            self.config.ignore_preview_pct,
            &mut self.rng,
        )?;
        self.state = next;
        self.status = Some(outcome.status.clone());
        Ok(&*self.last_outcome.insert(outcome))
    }

    /// Invest at the current slider value.
    pub fn invest(&mut self) -> Result<&ActionOutcome, MarketError> {
        let percent = self.investment_pct;
        self.act(PlayerAction::Invest { percent })
    }

    pub fn ignore(&mut self) -> Result<&ActionOutcome, MarketError> {
        self.act(PlayerAction::Ignore)
    }

    /// Leave the outcome screen: open the next day, or close the cycle and
    /// pay out if the day budget is spent.
    pub fn continue_day(&mut self, sink: &mut dyn XpSink) -> Result<DayStep, MarketError> {
        if self.phase != GamePhase::Playing {
            return Err(MarketError::NotPlaying);
        }
        if self.state.current_event.is_some() {
            return Err(MarketError::EventPending);
        }
        if self.state.is_over() {
            return Ok(DayStep::Finished { earned_xp: self.finish(sink) });
        }
        self.state = sim::advance_day(&self.state, &mut self.rng)?;
        self.last_outcome = None;
        self.status = None;
        Ok(DayStep::Advanced { day: self.state.day })
    }

    fn finish(&mut self, sink: &mut dyn XpSink) -> u32 {
        self.phase = GamePhase::Finished;
        let final_value = self.state.final_value();
        let summary = format!(
            "Survived {} days! Final Value: ${:.2} DAI. Ponzi Score: {}.",
            self.state.day, final_value, self.state.risk_penalty
        );
        let earned = sim::final_xp(&self.state, &self.config);
        self.earned_xp = earned;
        self.status = Some(summary.clone());
        info!(final_value, risk_penalty = self.state.risk_penalty, earned, "market cycle finished");

        if self.reward.is_open() {
            if earned > 0 && self.reward.claim() {
                pay_out(sink, earned as f64, XP_SOURCE);
                let note = Notification::new(
                    "Cycle Complete!",
                    format!("{summary} You earned {earned} XP!"),
                )
                .with_duration(7000);
                self.outbox.push(if earned > self.config.survivor_xp {
                    Notification { variant: crate::types::Variant::Success, ..note }
                } else {
                    note
                });
            } else {
                self.outbox.push(
                    Notification::new("Cycle Complete!", format!("{summary} No XP earned."))
                        .with_duration(7000),
                );
            }
        }
        earned
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordingSink;

    fn play_out(game: &mut DegenGame, sink: &mut RecordingSink) -> u32 {
        game.start().unwrap();
        loop {
            game.invest().unwrap();
            match game.continue_day(sink).unwrap() {
                DayStep::Advanced { .. } => {}
                DayStep::Finished { earned_xp } => return earned_xp,
            }
        }
    }

    #[test]
    fn start_deals_day_one() {
        let mut game = DegenGame::with_config(MarketConfig::default(), 11);
        game.start().unwrap();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state().day, 1);
        assert_eq!(game.state().history.len(), 2);
        assert!(game.state().current_event.is_some());
    }

    #[test]
    fn cannot_skip_a_pending_event() {
        let mut game = DegenGame::with_config(MarketConfig::default(), 1);
        let mut sink = RecordingSink::default();
        assert_eq!(game.continue_day(&mut sink).unwrap_err(), MarketError::NotPlaying);
        game.start().unwrap();
        assert_eq!(game.continue_day(&mut sink).unwrap_err(), MarketError::EventPending);
        game.ignore().unwrap();
        assert_eq!(game.ignore().unwrap_err(), MarketError::NoActiveEvent);
    }

    #[test]
    fn full_cycle_pays_at_most_once() {
        let cfg = MarketConfig { max_days: 5, ..MarketConfig::default() };
        let mut game = DegenGame::with_config(cfg, 2024);
        let mut sink = RecordingSink::default();
        let earned = play_out(&mut game, &mut sink);
        assert_eq!(game.phase(), GamePhase::Finished);
        assert_eq!(game.state().day, 5);
        assert_eq!(sink.total(), earned as f64);
        assert_eq!(game.continue_day(&mut sink).unwrap_err(), MarketError::NotPlaying);
        let notes = game.take_notifications();
        assert_eq!(notes.iter().filter(|n| n.title == "Cycle Complete!").count(), 1);
    }

    #[test]
    fn restart_resets_and_notifies() {
        let cfg = MarketConfig { max_days: 3, ..MarketConfig::default() };
        let mut game = DegenGame::with_config(cfg, 5);
        let mut sink = RecordingSink::default();
        play_out(&mut game, &mut sink);
        game.set_investment_pct(80.0).unwrap();
        game.restart().unwrap();
        assert_eq!(game.state().day, 1);
        assert_eq!(game.investment_pct(), 25.0);
        assert_eq!(game.state().risk_penalty, 0);
        assert!(game.take_notifications().iter().any(|n| n.title == "Restarting Cycle!"));
    }

    #[test]
    fn slider_rejects_out_of_range() {
        let mut game = DegenGame::with_config(MarketConfig::default(), 0);
        assert!(game.set_investment_pct(101.0).is_err());
        assert_eq!(game.investment_pct(), 25.0);
    }

    #[test]
    fn view_serializes() {
        let mut game = DegenGame::with_config(MarketConfig::default(), 3);
        game.start().unwrap();
        let json = serde_json::to_value(game.view()).unwrap();
        assert_eq!(json["phase"], "playing");
        assert_eq!(json["day"], 1);
        assert!(json["currentEvent"]["title"].is_string());
    }
}
