// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Market Simulation Core

//! Seedable, side-effect-free market rules. Every transition takes the
//! current state by reference and returns a new one, so a rejected action
//! leaves the caller's state exactly as it was.

use std::collections::BTreeSet;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use super::events::{self, EventKind, EventScript, MarketEvent, CATALOG};
use super::sentiment::Sentiment;
use super::MarketError;
use crate::config::MarketConfig;

/// Failure chance bounds applied before any event-specific override.
const MIN_FAILURE: f64 = 0.05;
const MAX_FAILURE: f64 = 0.95;

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub day: u32,
    pub value: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketState {
    pub day: u32,
    pub max_days: u32,
    pub initial_balance: f64,
    pub balance: f64,
    pub sentiment: Sentiment,
    pub current_event: Option<u32>,
    pub used_event_ids: BTreeSet<u32>,
    /// Grows with every failed investment and shrinks the final award.
    pub risk_penalty: u32,
    pub history: Vec<HistoryPoint>,
}

impl MarketState {
    pub fn new(cfg: &MarketConfig) -> Self {
        Self {
            day: 0,
            max_days: cfg.max_days,
            initial_balance: cfg.initial_balance,
            balance: cfg.initial_balance,
            sentiment: Sentiment::Neutral,
            current_event: None,
            used_event_ids: BTreeSet::new(),
            risk_penalty: 0,
            history: vec![HistoryPoint { day: 0, value: cfg.initial_balance }],
        }
    }

    pub fn event(&self) -> Option<&'static MarketEvent> {
        self.current_event.and_then(events::by_id)
    }

    pub fn is_over(&self) -> bool {
        self.day >= self.max_days
    }

    pub fn final_value(&self) -> f64 {
        self.history.last().map(|p| p.value).unwrap_or(self.balance)
    }
}

// ─── Actions & Outcomes ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerAction {
    /// Stake `percent` (0..=100) of the current balance on the event.
    Invest { percent: f64 },
    Ignore,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Positive,
    Negative,
    Neutral,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    pub kind: OutcomeKind,
    pub description: String,
    /// Realised balance change. Zero for ignores and empty stakes.
    pub profit: f64,
    /// One-line log of the day, e.g. "Day 4: You chose to Invest. Gained $12.00 DAI!"
    pub status: String,
}

// ─── Day Advance ─────────────────────────────────────────────────────────────

/// Roll sentiment, deal an unused event and open the next day.
pub fn advance_day<R: Rng + ?Sized>(state: &MarketState, rng: &mut R) -> Result<MarketState, MarketError> {
    if state.is_over() {
        return Err(MarketError::GameOver);
    }
    if state.current_event.is_some() {
        return Err(MarketError::EventPending);
    }

    let mut next = state.clone();
    next.day += 1;
    next.sentiment = Sentiment::roll(rng);

    let mut available: Vec<&MarketEvent> =
        CATALOG.iter().filter(|e| !next.used_event_ids.contains(&e.id)).collect();
    if available.is_empty() {
        warn!(day = next.day, "event deck exhausted, reshuffling");
        next.used_event_ids.clear();
        available = CATALOG.iter().collect();
    }
    let event = available[rng.gen_range(0..available.len())];
    next.used_event_ids.insert(event.id);
    next.current_event = Some(event.id);
    if let Some(forced) = event.sentiment {
        next.sentiment = forced;
    }
    next.history.push(HistoryPoint { day: next.day, value: next.balance });

    debug!(day = next.day, event = event.id, sentiment = %next.sentiment, "day advanced");
    Ok(next)
}

// ─── Risk Model ──────────────────────────────────────────────────────────────

/// Probability that backing `event` goes wrong under `sentiment`.
pub fn failure_chance(event: &MarketEvent, sentiment: Sentiment) -> f64 {
    if event.script == Some(EventScript::ForcedFailure) {
        return 1.0;
    }
    if event.kind == EventKind::NftOpportunity {
        return if sentiment.is_risk_on() { 0.30 } else { 0.85 };
    }
    let mut chance = if event.high_risk { 0.40 } else { 0.15 };
    if event.delayed {
        chance += 0.20;
    }
    chance += sentiment.failure_adjustment();
    chance.clamp(MIN_FAILURE, MAX_FAILURE)
}

fn profit_multiplier<R: Rng + ?Sized>(event: &MarketEvent, sentiment: Sentiment, rng: &mut R) -> f64 {
    let mut m = if event.volatile_upside() {
        rng.gen_range(0.5..2.0)
    } else {
        rng.gen_range(0.1..0.5)
    };
    match event.kind {
        EventKind::NftOpportunity => m *= 1.2,
        EventKind::Microcap => m *= 2.0,
        _ => {}
    }
    (m * sentiment.profit_scale()).max(0.0)
}

fn loss_factor<R: Rng + ?Sized>(event: &MarketEvent, rng: &mut R) -> f64 {
    if event.total_loss_on_failure() {
        1.0
    } else {
        rng.gen_range(0.3..0.7)
    }
}

// ─── Player Action ───────────────────────────────────────────────────────────

/// Stake used to price a "missed out" message when no other is given.
pub const DEFAULT_PREVIEW_PCT: f64 = 25.0;

/// Resolve the player's decision on the pending event. One uniform draw
/// decides failure; an ignore reuses that same draw to narrate what investing
/// would have done.
pub fn resolve_action<R: Rng + ?Sized>(
    state: &MarketState,
    action: PlayerAction,
    rng: &mut R,
) -> Result<(MarketState, ActionOutcome), MarketError> {
    resolve_action_with_preview(state, action, DEFAULT_PREVIEW_PCT, rng)
}

/// [`resolve_action`] with the ignore preview priced at `preview_pct` of the
/// balance instead of the default quarter stake.
pub fn resolve_action_with_preview<R: Rng + ?Sized>(
    state: &MarketState,
    action: PlayerAction,
    preview_pct: f64,
    rng: &mut R,
) -> Result<(MarketState, ActionOutcome), MarketError> {
    let event = state.event().ok_or(MarketError::NoActiveEvent)?;
    if let PlayerAction::Invest { percent } = action {
        validate_percent(percent)?;
    }

    let roll: f64 = rng.gen();
    let failed = roll < failure_chance(event, state.sentiment);
    let hint = format!(" Hint: {}", event.clue);

    let mut next = state.clone();
    let outcome = match action {
        PlayerAction::Invest { percent } => {
            let stake = state.balance * percent / 100.0;
            let mut status = format!("Day {}: You chose to Invest.", state.day);
            if stake <= 0.0 {
                status.push_str(" Selected 0% to invest.");
                ActionOutcome {
                    kind: OutcomeKind::Neutral,
                    description: "You observed the event but chose not to invest any DAI.".into(),
                    profit: 0.0,
                    status,
                }
            } else if failed {
                let loss = stake * loss_factor(event, rng);
                next.balance -= loss;
                next.risk_penalty += if event.high_risk { 15 } else { 5 };
                status.push_str(&format!(" Investment failed. Lost ${loss:.2} DAI."));
                ActionOutcome {
                    kind: OutcomeKind::Negative,
                    description: failure_text(event, state.sentiment, stake, loss, &hint),
                    profit: -loss,
                    status,
                }
            } else {
                let profit = stake * profit_multiplier(event, state.sentiment, rng);
                next.balance += profit;
                status.push_str(&format!(" Gained ${profit:.2} DAI!"));
                ActionOutcome {
                    kind: OutcomeKind::Positive,
                    description: success_text(event, state.sentiment, stake, profit),
                    profit,
                    status,
                }
            }
        }
        PlayerAction::Ignore => {
            let status =
                format!("Day {}: You chose to Ignore. Market sentiment: {}.", state.day, state.sentiment);
            let description = if failed {
                let verdict = if event.high_risk { "a rug/scam" } else { "a losing trade" };
                format!("You ignored '{}'. Good call! It turned out to be {verdict}.{hint}", event.title)
            } else {
                // Priced against the preview stake, not the slider.
                let preview = state.balance * preview_pct / 100.0;
                let missed = preview * profit_multiplier(event, state.sentiment, rng);
                format!(
                    "You ignored '{}'. Turns out it pumped! You missed out on a potential profit of ~${missed:.2} DAI.",
                    event.title
                )
            };
            ActionOutcome { kind: OutcomeKind::Neutral, description, profit: 0.0, status }
        }
    };

    next.balance = next.balance.max(0.0);
    next.current_event = None;
    if let Some(last) = next.history.last_mut() {
        last.value = next.balance;
    }
    Ok((next, outcome))
}

pub(crate) fn validate_percent(percent: f64) -> Result<(), MarketError> {
    if percent.is_finite() && (0.0..=100.0).contains(&percent) {
        Ok(())
    } else {
        Err(MarketError::InvalidPercentage(percent))
    }
}

fn failure_text(event: &MarketEvent, sentiment: Sentiment, stake: f64, loss: f64, hint: &str) -> String {
    let title = event.title;
    match (event.script, event.kind) {
        (Some(EventScript::ForcedFailure), _) => format!(
            "Investing during '{title}' backfired due to uncertainty! Lost ${loss:.2} DAI.{hint}"
        ),
        (_, EventKind::ScamOpportunity) => format!(
            "It was a trap! The '{title}' rugged. Lost your full investment of ${stake:.2} DAI.{hint}"
        ),
        (_, EventKind::NftOpportunity) => format!(
            "The NFT hype died! Investment in '{title}' rugged or went to zero. Lost ${loss:.2} DAI.{hint}"
        ),
        (Some(EventScript::LatePump), _) => format!(
            "Chased the pump too late! Elon's tweet was yesterday. Lost ${loss:.2} DAI.{hint}"
        ),
        (_, kind) if sentiment == Sentiment::Euphoric && kind != EventKind::MarketShift => format!(
            "Bought the top! Investment based on '{title}' failed during market euphoria. Lost ${loss:.2} DAI. Remember: Bear markets are born in Euphoria.{hint}"
        ),
        (_, EventKind::Microcap) => format!(
            "The microcap '{title}' turned out to be worthless! Lost your full investment of ${stake:.2} DAI.{hint}"
        ),
        _ => format!("Investment based on '{title}' failed. Lost ${loss:.2} DAI.{hint}"),
    }
}

fn success_text(event: &MarketEvent, sentiment: Sentiment, stake: f64, profit: f64) -> String {
    let title = event.title;
    match event.kind {
        EventKind::NftOpportunity => format!(
            "Mint successful / Floor pumped on '{title}'! Your investment of ${stake:.2} DAI yielded a profit of ${profit:.2} DAI!"
        ),
        EventKind::Microcap => format!(
            "Moonshot! The microcap '{title}' exploded! Your investment of ${stake:.2} DAI yielded a profit of ${profit:.2} DAI!"
        ),
        _ => {
            let flavour = match (event.script, sentiment) {
                (Some(EventScript::CapitulationBuy), Sentiment::Panic) => " Buying during extreme fear paid off!",
                (Some(EventScript::ContrarianBuy), Sentiment::Panic) => {
                    " Contrarian investing during extreme fear worked this time!"
                }
                _ => "",
            };
            format!(
                "Good call on '{title}'! Your investment of ${stake:.2} DAI yielded a profit of ${profit:.2} DAI!{flavour}"
            )
        }
    }
}

// ─── Termination ─────────────────────────────────────────────────────────────

/// End-of-cycle award. Profit earns up to `cfg.xp_reward` (full award at
/// +100%), scaled down by the risk penalty but never below a tenth; losses get
/// a flat consolation.
pub fn final_xp(state: &MarketState, cfg: &MarketConfig) -> u32 {
    let reward = cfg.xp_reward as f64;
    let final_value = state.final_value();
    let perf = final_value / state.initial_balance;
    let xp = if perf > 1.0 {
        let damping = (1.0 - state.risk_penalty as f64 / 100.0).max(0.1);
        (reward * (perf - 1.0).min(1.0) * damping).floor()
    } else if final_value <= 0.1 * state.initial_balance {
        cfg.rekt_xp as f64
    } else {
        cfg.survivor_xp as f64
    };
    xp.clamp(0.0, reward) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn state_with(event_id: u32, sentiment: Sentiment) -> MarketState {
        let mut s = MarketState::new(&MarketConfig::default());
        s.day = 1;
        s.history.push(HistoryPoint { day: 1, value: s.balance });
        s.current_event = Some(event_id);
        s.sentiment = sentiment;
        s
    }

    #[test]
    fn failure_chance_rules() {
        let ev = |id| events::by_id(id).unwrap();
        // high risk + delayed + panic = 0.85
        assert!((failure_chance(ev(7), Sentiment::Panic) - 0.85).abs() < 1e-9);
        // low risk, bullish: 0.15 - 0.05
        assert!((failure_chance(ev(9), Sentiment::Bullish) - 0.10).abs() < 1e-9);
        // clamp high: high risk + delayed + euphoric = 0.90, still within bounds
        assert!((failure_chance(ev(25), Sentiment::Euphoric) - 0.90).abs() < 1e-9);
        assert_eq!(failure_chance(ev(12), Sentiment::Euphoric), 0.30);
        assert_eq!(failure_chance(ev(12), Sentiment::Neutral), 0.85);
        assert_eq!(failure_chance(ev(3), Sentiment::Bullish), 1.0);
    }

    #[test]
    fn forced_failure_always_loses() {
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let s = state_with(3, Sentiment::Bearish);
            let (next, out) = resolve_action(&s, PlayerAction::Invest { percent: 50.0 }, &mut rng).unwrap();
            assert_eq!(out.kind, OutcomeKind::Negative);
            assert!(next.balance < s.balance);
            assert!(out.description.contains("backfired"));
            assert_eq!(next.risk_penalty, 5);
        }
    }

    #[test]
    fn zero_percent_never_moves_balance() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let s = state_with(22, Sentiment::Panic);
        let (next, out) = resolve_action(&s, PlayerAction::Invest { percent: 0.0 }, &mut rng).unwrap();
        assert_eq!(next.balance, s.balance);
        assert_eq!(out.kind, OutcomeKind::Neutral);
        assert!(next.current_event.is_none());
    }

    #[test]
    fn ignore_reuses_the_invest_draw() {
        for seed in 0..100 {
            let s = state_with(1, Sentiment::Neutral);
            let mut a = ChaCha8Rng::seed_from_u64(seed);
            let mut b = ChaCha8Rng::seed_from_u64(seed);
            let (_, invest) = resolve_action(&s, PlayerAction::Invest { percent: 25.0 }, &mut a).unwrap();
            let (after, ignore) = resolve_action(&s, PlayerAction::Ignore, &mut b).unwrap();
            assert_eq!(after.balance, s.balance);
            let dodged = ignore.description.contains("Good call!");
            assert_eq!(dodged, invest.kind == OutcomeKind::Negative, "seed {seed}");
        }
    }

    #[test]
    fn rejects_bad_percentages_and_missing_event() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let s = state_with(5, Sentiment::Neutral);
        for pct in [-1.0, 100.5, f64::NAN] {
            assert!(matches!(
                resolve_action(&s, PlayerAction::Invest { percent: pct }, &mut rng),
                Err(MarketError::InvalidPercentage(_))
            ));
        }
        let idle = MarketState::new(&MarketConfig::default());
        assert_eq!(
            resolve_action(&idle, PlayerAction::Ignore, &mut rng).unwrap_err(),
            MarketError::NoActiveEvent
        );
    }

    #[test]
    fn advance_day_deals_every_event_before_repeating() {
        let cfg = MarketConfig { max_days: 60, ..MarketConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut s = MarketState::new(&cfg);
        let mut first_cycle = Vec::new();
        for _ in 0..30 {
            s = advance_day(&s, &mut rng).unwrap();
            first_cycle.push(s.current_event.unwrap());
            assert_eq!(s.history.len() as u32, s.day + 1);
            s.current_event = None;
        }
        first_cycle.sort_unstable();
        assert_eq!(first_cycle, (1..=30).collect::<Vec<_>>());
        s = advance_day(&s, &mut rng).unwrap();
        assert_eq!(s.used_event_ids.len(), 1);
    }

    #[test]
    fn advance_day_refuses_pending_and_finished() {
        let cfg = MarketConfig { max_days: 1, ..MarketConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let s = advance_day(&MarketState::new(&cfg), &mut rng).unwrap();
        assert_eq!(advance_day(&s, &mut rng).unwrap_err(), MarketError::EventPending);
        let mut done = s.clone();
        done.current_event = None;
        assert_eq!(advance_day(&done, &mut rng).unwrap_err(), MarketError::GameOver);
    }

    #[test]
    fn final_xp_tiers() {
        let cfg = MarketConfig::default();
        let mut s = MarketState::new(&cfg);
        s.history.last_mut().unwrap().value = 1500.0;
        assert_eq!(final_xp(&s, &cfg), 125);
        s.risk_penalty = 50;
        assert_eq!(final_xp(&s, &cfg), 62);
        s.risk_penalty = 500;
        assert_eq!(final_xp(&s, &cfg), 12);
        s.history.last_mut().unwrap().value = 5000.0;
        s.risk_penalty = 0;
        assert_eq!(final_xp(&s, &cfg), 250);
        s.history.last_mut().unwrap().value = 50.0;
        assert_eq!(final_xp(&s, &cfg), 5);
        s.history.last_mut().unwrap().value = 800.0;
        assert_eq!(final_xp(&s, &cfg), 10);
    }
}
