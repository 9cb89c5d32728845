// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy")

pub mod types;
pub mod config;
pub mod timers;
pub mod ledger;
pub mod scoring;
pub mod market;
pub mod chat;
pub mod quiz;
pub mod rugpull;
pub mod whack;
pub mod quests;
pub mod profile;

pub use types::*;
pub use config::{ConfigError, EngineConfig};
pub use ledger::{LedgerError, LedgerState, LevelCurve, XpLedger};
pub use market::{DegenGame, MarketError};
pub use chat::{ChatError, ScamChat};
pub use quiz::{Quiz, QuizError};
pub use rugpull::{RugPullChallenge, RugPullError};
pub use whack::{WhackError, WhackGame};
pub use quests::{QuestDesk, QuestError};
pub use profile::{Profile, ProfileError};

use serde::Serialize;
use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────
//
// Every session exposes a constructor taking a seed plus `fromConfig(json, seed)`.
// Actions that can pay XP take the page's `XpLedger` as an argument.

fn install_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn load_config(json: &str) -> Result<EngineConfig, JsValue> {
    EngineConfig::from_json(json).map_err(js_err)
}

// ─── XpLedger ────────────────────────────────────────────────────────────────

#[wasm_bindgen]
impl XpLedger {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        install_panic_hook();
        Self::default()
    }

    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config_json(json: &str) -> Result<XpLedger, JsValue> {
        install_panic_hook();
        Ok(Self::from_config(&load_config(json)?.ledger))
    }

    /// Returns the levels reached, if any.
    #[wasm_bindgen(js_name = addXp)]
    pub fn js_add_xp(&mut self, amount: f64) -> Result<Vec<u32>, JsValue> {
        self.add_xp(amount).map_err(js_err)
    }

    #[wasm_bindgen(getter)]
    pub fn xp(&self) -> f64 {
        self.state.xp
    }

    #[wasm_bindgen(getter)]
    pub fn level(&self) -> u32 {
        self.state.level
    }

    #[wasm_bindgen(getter = nextLevelXp)]
    pub fn next_level_xp(&self) -> f64 {
        self.state.next_level_xp
    }

    #[wasm_bindgen(getter = lifetimeXp)]
    pub fn lifetime_xp(&self) -> f64 {
        self.state.lifetime_xp
    }

    pub fn snapshot(&self) -> JsValue {
        to_js(&self.state)
    }

    #[wasm_bindgen(js_name = takeNotifications)]
    pub fn js_take_notifications(&mut self) -> JsValue {
        to_js(&self.take_notifications())
    }
}

// ─── DegenGame ───────────────────────────────────────────────────────────────

#[wasm_bindgen]
impl DegenGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        install_panic_hook();
        Self::with_config(config::MarketConfig::default(), seed)
    }

    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config_json(json: &str, seed: u64) -> Result<DegenGame, JsValue> {
        install_panic_hook();
        Ok(Self::with_config(load_config(json)?.market, seed))
    }

    #[wasm_bindgen(js_name = view)]
    pub fn js_view(&self) -> JsValue {
        to_js(&self.view())
    }

    #[wasm_bindgen(js_name = start)]
    pub fn js_start(&mut self) -> Result<(), JsValue> {
        self.start().map_err(js_err)
    }

    #[wasm_bindgen(js_name = restart)]
    pub fn js_restart(&mut self) -> Result<(), JsValue> {
        self.restart().map_err(js_err)
    }

    #[wasm_bindgen(js_name = setInvestmentPct)]
    pub fn js_set_investment_pct(&mut self, percent: f64) -> Result<(), JsValue> {
        self.set_investment_pct(percent).map_err(js_err)
    }

    #[wasm_bindgen(js_name = invest)]
    pub fn js_invest(&mut self) -> Result<JsValue, JsValue> {
        self.invest().map(to_js).map_err(js_err)
    }

    #[wasm_bindgen(js_name = ignore)]
    pub fn js_ignore(&mut self) -> Result<JsValue, JsValue> {
        self.ignore().map(to_js).map_err(js_err)
    }

    #[wasm_bindgen(js_name = continueDay)]
    pub fn js_continue_day(&mut self, ledger: &mut XpLedger) -> Result<JsValue, JsValue> {
        self.continue_day(ledger).map(|step| to_js(&step)).map_err(js_err)
    }

    #[wasm_bindgen(js_name = takeNotifications)]
    pub fn js_take_notifications(&mut self) -> JsValue {
        to_js(&self.take_notifications())
    }
}

// ─── ScamChat ────────────────────────────────────────────────────────────────

#[wasm_bindgen]
impl ScamChat {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        install_panic_hook();
        Self::with_config(config::ChatConfig::default(), seed)
    }

    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config_json(json: &str, seed: u64) -> Result<ScamChat, JsValue> {
        install_panic_hook();
        Ok(Self::with_config(load_config(json)?.chat, seed))
    }

    #[wasm_bindgen(js_name = snapshot)]
    pub fn js_snapshot(&self) -> JsValue {
        to_js(&self.snapshot())
    }

    #[wasm_bindgen(js_name = start)]
    pub fn js_start(&mut self) {
        self.start();
    }

    #[wasm_bindgen(js_name = reset)]
    pub fn js_reset(&mut self) {
        self.reset();
    }

    #[wasm_bindgen(js_name = requestHelp)]
    pub fn js_request_help(&mut self, option: &str) -> Result<(), JsValue> {
        self.request_help(option).map_err(js_err)
    }

    /// `"group"` or `"dm"`.
    #[wasm_bindgen(js_name = switchView)]
    pub fn js_switch_view(&mut self, view: &str) -> Result<(), JsValue> {
        let target: chat::ChatView = view.parse().map_err(js_err)?;
        self.switch_view(target).map_err(js_err)
    }

    #[wasm_bindgen(js_name = chooseProblem)]
    pub fn js_choose_problem(&mut self, option: &str) -> Result<(), JsValue> {
        self.choose_problem(option).map_err(js_err)
    }

    #[wasm_bindgen(js_name = openLink)]
    pub fn js_open_link(&mut self) -> Result<JsValue, JsValue> {
        self.open_link().map(|prompt| to_js(&prompt)).map_err(js_err)
    }

    #[wasm_bindgen(js_name = identifyScam)]
    pub fn js_identify_scam(&mut self, ledger: &mut XpLedger) -> Result<(), JsValue> {
        self.identify_scam(ledger).map_err(js_err)
    }

    #[wasm_bindgen(js_name = declineSign)]
    pub fn js_decline_sign(&mut self, ledger: &mut XpLedger) -> Result<(), JsValue> {
        self.decline_sign(ledger).map_err(js_err)
    }

    #[wasm_bindgen(js_name = confirmSign)]
    pub fn js_confirm_sign(&mut self) -> Result<(), JsValue> {
        self.confirm_sign().map_err(js_err)
    }

    #[wasm_bindgen(js_name = advance)]
    pub fn js_advance(&mut self, elapsed_ms: u32) {
        self.advance(u64::from(elapsed_ms));
    }

    #[wasm_bindgen(js_name = takeNotifications)]
    pub fn js_take_notifications(&mut self) -> JsValue {
        to_js(&self.take_notifications())
    }
}

// ─── Quiz ────────────────────────────────────────────────────────────────────

/// What the UI may show before an answer is submitted.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionCard {
    index: usize,
    total: usize,
    id: u32,
    prompt: &'static str,
    options: [&'static str; 4],
    difficulty: scoring::Difficulty,
}

#[wasm_bindgen]
impl Quiz {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        install_panic_hook();
        Self::with_config(config::QuizConfig::default(), seed)
    }

    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config_json(json: &str, seed: u64) -> Result<Quiz, JsValue> {
        install_panic_hook();
        Ok(Self::with_config(load_config(json)?.quiz, seed))
    }

    #[wasm_bindgen(js_name = currentQuestion)]
    pub fn js_current_question(&self) -> JsValue {
        match self.current() {
            Some(q) => to_js(&QuestionCard {
                index: self.index,
                total: self.order.len(),
                id: q.id,
                prompt: q.prompt,
                options: q.options,
                difficulty: q.difficulty,
            }),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = submit)]
    pub fn js_submit(&mut self, choice: &str) -> Result<JsValue, JsValue> {
        self.submit(choice).map(to_js).map_err(js_err)
    }

    #[wasm_bindgen(js_name = next)]
    pub fn js_next(&mut self, ledger: &mut XpLedger) -> Result<JsValue, JsValue> {
        self.next(ledger).map(|step| to_js(&step)).map_err(js_err)
    }

    #[wasm_bindgen(js_name = restart)]
    pub fn js_restart(&mut self) {
        self.restart();
    }

    #[wasm_bindgen(js_name = tally)]
    pub fn js_tally(&self) -> JsValue {
        to_js(&self.tally())
    }

    #[wasm_bindgen(js_name = takeNotifications)]
    pub fn js_take_notifications(&mut self) -> JsValue {
        to_js(&self.take_notifications())
    }
}

// ─── RugPullChallenge ────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioCard {
    index: usize,
    total: usize,
    id: u32,
    name: &'static str,
    description: &'static str,
}

#[wasm_bindgen]
impl RugPullChallenge {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        install_panic_hook();
        Self::with_config(config::RugPullConfig::default(), seed)
    }

    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config_json(json: &str, seed: u64) -> Result<RugPullChallenge, JsValue> {
        install_panic_hook();
        Ok(Self::with_config(load_config(json)?.rug_pull, seed))
    }

    #[wasm_bindgen(js_name = currentScenario)]
    pub fn js_current_scenario(&self) -> JsValue {
        match self.current() {
            Some(s) => to_js(&ScenarioCard {
                index: self.index,
                total: self.order.len(),
                id: s.id,
                name: s.name,
                description: s.description,
            }),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = answer)]
    pub fn js_answer(&mut self, guess_rug: bool, ledger: &mut XpLedger) -> Result<JsValue, JsValue> {
        self.answer(guess_rug, ledger).map(to_js).map_err(js_err)
    }

    #[wasm_bindgen(js_name = next)]
    pub fn js_next(&mut self) -> Result<(), JsValue> {
        self.next().map_err(js_err)
    }

    #[wasm_bindgen(js_name = restart)]
    pub fn js_restart(&mut self) {
        self.restart();
    }

    #[wasm_bindgen(js_name = isCompleted)]
    pub fn js_is_completed(&self) -> bool {
        self.is_completed()
    }

    #[wasm_bindgen(js_name = takeNotifications)]
    pub fn js_take_notifications(&mut self) -> JsValue {
        to_js(&self.take_notifications())
    }
}

// ─── WhackGame ───────────────────────────────────────────────────────────────

#[wasm_bindgen]
impl WhackGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        install_panic_hook();
        Self::with_config(config::WhackConfig::default(), seed)
    }

    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config_json(json: &str, seed: u64) -> Result<WhackGame, JsValue> {
        install_panic_hook();
        Ok(Self::with_config(load_config(json)?.whack, seed))
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[wasm_bindgen(getter = timeLeft)]
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    #[wasm_bindgen(getter = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[wasm_bindgen(js_name = board)]
    pub fn js_board(&self) -> JsValue {
        to_js(self.board())
    }

    #[wasm_bindgen(js_name = start)]
    pub fn js_start(&mut self) {
        self.start();
    }

    /// Returns the round result when the clock ran out, otherwise `null`.
    #[wasm_bindgen(js_name = advance)]
    pub fn js_advance(&mut self, elapsed_ms: u32, ledger: &mut XpLedger) -> JsValue {
        match self.advance(u64::from(elapsed_ms), ledger) {
            Some(result) => to_js(&result),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = whack)]
    pub fn js_whack(&mut self, index: usize) -> Result<JsValue, JsValue> {
        self.whack(index).map(|hit| to_js(&hit)).map_err(js_err)
    }

    #[wasm_bindgen(js_name = stop)]
    pub fn js_stop(&mut self, ledger: &mut XpLedger) -> Result<JsValue, JsValue> {
        self.stop(ledger).map(|r| to_js(&r)).map_err(js_err)
    }

    #[wasm_bindgen(js_name = reset)]
    pub fn js_reset(&mut self) {
        self.reset();
    }

    #[wasm_bindgen(js_name = takeNotifications)]
    pub fn js_take_notifications(&mut self) -> JsValue {
        to_js(&self.take_notifications())
    }
}

// ─── QuestDesk ───────────────────────────────────────────────────────────────

#[wasm_bindgen]
impl QuestDesk {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        install_panic_hook();
        Self::with_config(config::QuestConfig::default(), seed)
    }

    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config_json(json: &str, seed: u64) -> Result<QuestDesk, JsValue> {
        install_panic_hook();
        Ok(Self::with_config(load_config(json)?.quests, seed))
    }

    #[wasm_bindgen(js_name = assets)]
    pub fn js_assets(&self) -> JsValue {
        to_js(&self.assets())
    }

    #[wasm_bindgen(js_name = requestFaucet)]
    pub fn js_request_faucet(&mut self, token: &str, recipient: &str, ledger: &mut XpLedger) -> Result<JsValue, JsValue> {
        self.request_faucet(token, recipient, ledger).map(|r| to_js(&r)).map_err(js_err)
    }

    #[wasm_bindgen(js_name = quoteSwap)]
    pub fn js_quote_swap(&self, from: &str, to: &str, amount: f64) -> Result<f64, JsValue> {
        self.quote_swap(from, to, amount).map_err(js_err)
    }

    #[wasm_bindgen(js_name = swap)]
    pub fn js_swap(&mut self, from: &str, to: &str, amount: f64, ledger: &mut XpLedger) -> Result<JsValue, JsValue> {
        self.swap(from, to, amount, ledger).map(|r| to_js(&r)).map_err(js_err)
    }

    #[wasm_bindgen(js_name = quoteLiquidity)]
    pub fn js_quote_liquidity(&self, amount_a: f64) -> Result<f64, JsValue> {
        self.quote_liquidity(amount_a).map_err(js_err)
    }

    #[wasm_bindgen(js_name = addLiquidity)]
    pub fn js_add_liquidity(&mut self, amount_a: f64, amount_b: f64, ledger: &mut XpLedger) -> Result<JsValue, JsValue> {
        self.add_liquidity(amount_a, amount_b, ledger).map(|r| to_js(&r)).map_err(js_err)
    }

    /// `"faucet"`, `"swap"` or `"liquidity"`.
    #[wasm_bindgen(js_name = isCompleted)]
    pub fn js_is_completed(&self, quest: &str) -> Result<bool, JsValue> {
        let kind: quests::QuestKind = quest.parse().map_err(js_err)?;
        Ok(self.is_completed(kind))
    }

    #[wasm_bindgen(js_name = advance)]
    pub fn js_advance(&mut self, elapsed_ms: u32) {
        self.advance(u64::from(elapsed_ms));
    }

    #[wasm_bindgen(js_name = alertState)]
    pub fn js_alert_state(&self) -> JsValue {
        to_js(&self.alert())
    }

    #[wasm_bindgen(js_name = reportScam)]
    pub fn js_report_scam(&mut self, ledger: &mut XpLedger) -> Result<u32, JsValue> {
        self.report_scam(ledger).map_err(js_err)
    }

    #[wasm_bindgen(js_name = signScam)]
    pub fn js_sign_scam(&mut self) -> Result<(), JsValue> {
        self.sign_scam().map_err(js_err)
    }

    #[wasm_bindgen(js_name = takeNotifications)]
    pub fn js_take_notifications(&mut self) -> JsValue {
        to_js(&self.take_notifications())
    }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[wasm_bindgen]
impl Profile {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        install_panic_hook();
        Self::default()
    }

    #[wasm_bindgen(getter = username)]
    pub fn js_username(&self) -> String {
        self.username.clone()
    }

    #[wasm_bindgen(getter = avatar)]
    pub fn js_avatar(&self) -> Option<String> {
        self.avatar.clone()
    }

    /// Returns whether anything changed.
    #[wasm_bindgen(js_name = save)]
    pub fn js_save(&mut self, username: &str, avatar: Option<String>) -> Result<bool, JsValue> {
        self.save(username, avatar.as_deref()).map_err(js_err)
    }

    #[wasm_bindgen(js_name = progress)]
    pub fn js_progress(&self, ledger: &XpLedger) -> JsValue {
        to_js(&self.progress(ledger.state()))
    }

    #[wasm_bindgen(js_name = leaderboard)]
    pub fn js_leaderboard(&self, ledger: &XpLedger) -> JsValue {
        to_js(&self.leaderboard(ledger.state().lifetime_xp, profile::LEADERBOARD_SIZE))
    }

    #[wasm_bindgen(js_name = takeNotifications)]
    pub fn js_take_notifications(&mut self) -> JsValue {
        to_js(&self.take_notifications())
    }
}

#[wasm_bindgen(js_name = truncateAddress)]
pub fn js_truncate_address(address: Option<String>) -> String {
    profile::truncate_address(address.as_deref())
}
