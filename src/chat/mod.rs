// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Scam Chat State Machine

//! A scripted phishing roleplay. The player asks for help in a group chat,
//! a fake support bot slides into their DMs and eventually sends a wallet
//! drainer link. The run ends either with the scam identified (XP) or with
//! the malicious transaction signed (simulated loss).
//!
//! Bot latency and group chatter are [`TimerQueue`] tasks owned by the
//! session. The host moves time with [`ScamChat::advance`]; view switches,
//! terminal stages and [`ScamChat::reset`] cancel whatever is pending.

pub mod script;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};
use wasm_bindgen::prelude::*;

use crate::config::ChatConfig;
use crate::scoring::RewardGate;
use crate::timers::TimerQueue;
use crate::types::{pay_out, Notification, XpSink};
use script::SignPrompt;

pub const XP_SOURCE: &str = "scam-chat";

// ---------------------------------------------------------------------------
// Stages, views, messages
// ---------------------------------------------------------------------------

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "camelCase")]
pub enum ChatStage {
    #[default]
    NotStarted,
    AwaitingHelpRequest,
    HelpRequested,
    /// The bot has "noticed" the request; a DM notification is showing.
    DmPending,
    DmOpened,
    AwaitingProblem,
    ProblemSent,
    LinkSent,
    ScamIdentified,
    Scammed,
}

impl ChatStage {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ChatStage::ScamIdentified | ChatStage::Scammed)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatView {
    #[default]
    Group,
    Dm,
}

impl std::str::FromStr for ChatView {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group" => Ok(ChatView::Group),
            "dm" => Ok(ChatView::Dm),
            other => Err(ChatError::UnknownOption(other.to_string())),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Sender {
    User,
    Bot,
    System,
    OtherUser,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    /// Virtual clock time the message appeared.
    pub at_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<&'static str>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("the challenge has not been started")]
    NotStarted,
    #[error("the challenge is already resolved -- reset to play again")]
    Resolved,
    #[error("this action is only available in the {0:?} view")]
    WrongView(ChatView),
    #[error("not available at stage {actual:?} (needs {expected:?})")]
    WrongStage { expected: ChatStage, actual: ChatStage },
    #[error("`{0}` is not one of the offered options")]
    UnknownOption(String),
    #[error("no direct message yet -- ask for help in the group first")]
    DmUnavailable,
    #[error("no transaction prompt is open")]
    NoSignPrompt,
    #[error("answer the transaction prompt first")]
    SignPromptOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Task {
    Ambient,
    BotNotices,
    BotGreeting,
    BotSendsLink,
    ReplayLink,
}

/// Serializable picture of the session for the UI.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChatSnapshot<'a> {
    pub stage: ChatStage,
    pub stage_index: u8,
    pub view: ChatView,
    pub messages: &'a [ChatMessage],
    pub bot_typing: bool,
    pub dm_notification: bool,
    pub sign_prompt: Option<SignPrompt>,
    pub help_options: &'static [&'static str],
    pub problem_options: &'static [&'static str],
    pub completed: bool,
    pub scammed: bool,
}

// ---------------------------------------------------------------------------
// ScamChat (session)
// ---------------------------------------------------------------------------

#[wasm_bindgen]
pub struct ScamChat {
    pub(crate) config: ChatConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) timers: TimerQueue<Task>,
    pub(crate) stage: ChatStage,
    pub(crate) view: ChatView,
    pub(crate) messages: Vec<ChatMessage>,
    pub(crate) bot_typing: bool,
    pub(crate) dm_notification: bool,
    pub(crate) sign_prompt: bool,
    pub(crate) reward: RewardGate,
    pub(crate) outbox: Vec<Notification>,
}

impl ScamChat {
    pub fn with_config(config: ChatConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            timers: TimerQueue::new(),
            stage: ChatStage::NotStarted,
            view: ChatView::Group,
            messages: Vec::new(),
            bot_typing: false,
            dm_notification: false,
            sign_prompt: false,
            reward: RewardGate::default(),
            outbox: Vec::new(),
        }
    }

    pub fn stage(&self) -> ChatStage {
        self.stage
    }

    pub fn view(&self) -> ChatView {
        self.view
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn snapshot(&self) -> ChatSnapshot<'_> {
        let dm_options = self.view == ChatView::Dm && self.stage == ChatStage::AwaitingProblem;
        let group_options = self.view == ChatView::Group && self.stage == ChatStage::AwaitingHelpRequest;
        ChatSnapshot {
            stage: self.stage,
            stage_index: self.stage.index(),
            view: self.view,
            messages: &self.messages,
            bot_typing: self.bot_typing,
            dm_notification: self.dm_notification,
            sign_prompt: self.sign_prompt.then(|| SignPrompt::for_loss(self.config.simulated_loss)),
            help_options: if group_options { &script::HELP_OPTIONS } else { &[] },
            problem_options: if dm_options { &script::PROBLEM_OPTIONS } else { &[] },
            completed: self.stage == ChatStage::ScamIdentified,
            scammed: self.stage == ChatStage::Scammed,
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────────

    pub fn start(&mut self) {
        self.clear_session();
        self.stage = ChatStage::AwaitingHelpRequest;
        self.push(Sender::System, script::joined_group());
        self.arm_ambient(true);
    }

    /// Back to stage 0 with nothing pending.
    pub fn reset(&mut self) {
        self.clear_session();
    }

    fn clear_session(&mut self) {
        self.timers.clear();
        self.stage = ChatStage::NotStarted;
        self.view = ChatView::Group;
        self.messages.clear();
        self.bot_typing = false;
        self.dm_notification = false;
        self.sign_prompt = false;
        self.reward.rearm();
    }

    fn arm_ambient(&mut self, fresh: bool) {
        let cfg = &self.config;
        self.timers.schedule_once(cfg.ambient_first_ms, Task::Ambient);
        if fresh {
            self.timers.schedule_once(cfg.ambient_second_ms, Task::Ambient);
        }
        self.timers.schedule_every(cfg.ambient_interval_ms, cfg.ambient_interval_ms, Task::Ambient);
    }

    fn push(&mut self, sender: Sender, text: String) {
        self.messages.push(ChatMessage {
            sender,
            text,
            at_ms: self.timers.now(),
            username: None,
            link: None,
        });
    }

    fn guard(&self, view: ChatView, expected: ChatStage) -> Result<(), ChatError> {
        self.guard_active()?;
        if self.view != view {
            return Err(ChatError::WrongView(view));
        }
        if self.stage != expected {
            return Err(ChatError::WrongStage { expected, actual: self.stage });
        }
        Ok(())
    }

    fn guard_active(&self) -> Result<(), ChatError> {
        if self.stage == ChatStage::NotStarted {
            return Err(ChatError::NotStarted);
        }
        if self.stage.is_terminal() {
            return Err(ChatError::Resolved);
        }
        Ok(())
    }

    // ─── Player actions ──────────────────────────────────────────────────────

    pub fn request_help(&mut self, option: &str) -> Result<(), ChatError> {
        self.guard(ChatView::Group, ChatStage::AwaitingHelpRequest)?;
        let text = pick(&script::HELP_OPTIONS, option)?;
        self.push(Sender::User, text.to_string());
        self.stage = ChatStage::HelpRequested;
        self.timers.schedule_once(self.config.notice_delay_ms, Task::BotNotices);
        Ok(())
    }

    pub fn switch_view(&mut self, target: ChatView) -> Result<(), ChatError> {
        self.guard_active()?;
        if self.view == target {
            return Ok(());
        }
        if self.sign_prompt {
            return Err(ChatError::SignPromptOpen);
        }
        if target == ChatView::Dm && self.stage < ChatStage::HelpRequested {
            return Err(ChatError::DmUnavailable);
        }

        self.timers.clear();
        self.view = target;
        self.messages.clear();
        self.bot_typing = false;
        debug!(view = ?target, stage = ?self.stage, "chat view switched");

        match target {
            ChatView::Group => {
                self.push(Sender::System, script::viewing_group());
                self.arm_ambient(false);
            }
            ChatView::Dm => {
                self.dm_notification = false;
                self.push(Sender::System, script::dm_opened());
                match self.stage {
                    ChatStage::HelpRequested | ChatStage::DmPending | ChatStage::DmOpened => {
                        self.stage = ChatStage::DmOpened;
                        self.bot_typing = true;
                        self.timers.schedule_once(self.config.greeting_delay_ms, Task::BotGreeting);
                    }
                    ChatStage::ProblemSent => {
                        self.bot_typing = true;
                        self.timers.schedule_once(self.config.link_delay_ms, Task::BotSendsLink);
                    }
                    ChatStage::LinkSent => {
                        self.timers.schedule_once(self.config.replay_delay_ms, Task::ReplayLink);
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    pub fn choose_problem(&mut self, option: &str) -> Result<(), ChatError> {
        self.guard(ChatView::Dm, ChatStage::AwaitingProblem)?;
        let text = pick(&script::PROBLEM_OPTIONS, option)?;
        self.push(Sender::User, text.to_string());
        self.stage = ChatStage::ProblemSent;
        self.bot_typing = true;
        self.timers.schedule_once(self.config.link_delay_ms, Task::BotSendsLink);
        Ok(())
    }

    /// Click the phishing link: opens the fake approval dialog.
    pub fn open_link(&mut self) -> Result<SignPrompt, ChatError> {
        self.guard(ChatView::Dm, ChatStage::LinkSent)?;
        self.sign_prompt = true;
        Ok(SignPrompt::for_loss(self.config.simulated_loss))
    }

    pub fn identify_scam(&mut self, sink: &mut dyn XpSink) -> Result<(), ChatError> {
        self.guard(ChatView::Dm, ChatStage::LinkSent)?;
        self.sign_prompt = false;
        self.resolve(ChatStage::ScamIdentified);
        self.push(Sender::System, script::IDENTIFIED.to_string());
        if self.reward.claim() {
            let xp = self.config.xp_reward;
            pay_out(sink, xp as f64, XP_SOURCE);
            self.outbox.push(
                Notification::success("Scam Spotted! \u{2705}", script::spotted_toast(xp)).with_duration(7000),
            );
        }
        Ok(())
    }

    /// Reject the approval dialog. Same result as identifying the scam.
    pub fn decline_sign(&mut self, sink: &mut dyn XpSink) -> Result<(), ChatError> {
        self.guard(ChatView::Dm, ChatStage::LinkSent)?;
        if !self.sign_prompt {
            return Err(ChatError::NoSignPrompt);
        }
        self.identify_scam(sink)
    }

    pub fn confirm_sign(&mut self) -> Result<(), ChatError> {
        self.guard(ChatView::Dm, ChatStage::LinkSent)?;
        if !self.sign_prompt {
            return Err(ChatError::NoSignPrompt);
        }
        self.sign_prompt = false;
        self.resolve(ChatStage::Scammed);
        let loss = self.config.simulated_loss;
        self.push(Sender::System, script::drained(loss));
        self.outbox.push(
            Notification::destructive("Uh Oh! Wallet Drained!", script::drained_toast(loss)).with_duration(10_000),
        );
        Ok(())
    }

    fn resolve(&mut self, stage: ChatStage) {
        self.timers.clear();
        self.bot_typing = false;
        self.stage = stage;
        info!(stage = ?stage, at_ms = self.timers.now(), "scam chat resolved");
    }

    // ─── Clock ───────────────────────────────────────────────────────────────

    /// Run the virtual clock forward `elapsed_ms`, firing whatever falls due.
    pub fn advance(&mut self, elapsed_ms: u64) {
        let until = self.timers.now().saturating_add(elapsed_ms);
        while let Some(task) = self.timers.pop_due(until) {
            self.fire(task);
        }
        self.timers.settle(until);
    }

    fn fire(&mut self, task: Task) {
        match task {
            Task::Ambient => {
                if self.view == ChatView::Group && self.guard_active().is_ok() {
                    let username = script::USERNAMES[self.rng.gen_range(0..script::USERNAMES.len())];
                    let text = script::AMBIENT_MESSAGES[self.rng.gen_range(0..script::AMBIENT_MESSAGES.len())];
                    self.messages.push(ChatMessage {
                        sender: Sender::OtherUser,
                        text: text.to_string(),
                        at_ms: self.timers.now(),
                        username: Some(username),
                        link: None,
                    });
                }
            }
            Task::BotNotices => {
                if self.stage == ChatStage::HelpRequested {
                    self.stage = ChatStage::DmPending;
                    self.dm_notification = true;
                }
            }
            Task::BotGreeting => {
                if self.view == ChatView::Dm && self.stage == ChatStage::DmOpened {
                    self.bot_typing = false;
                    self.push(Sender::Bot, script::bot_greeting());
                    self.stage = ChatStage::AwaitingProblem;
                }
            }
            Task::BotSendsLink => {
                if self.view == ChatView::Dm && self.stage == ChatStage::ProblemSent {
                    self.bot_typing = false;
                    self.push_link();
                    self.stage = ChatStage::LinkSent;
                }
            }
            Task::ReplayLink => {
                if self.view == ChatView::Dm && self.stage == ChatStage::LinkSent {
                    self.push_link();
                }
            }
        }
    }

    fn push_link(&mut self) {
        self.messages.push(ChatMessage {
            sender: Sender::Bot,
            text: script::scam_link(),
            at_ms: self.timers.now(),
            username: None,
            link: Some(script::FAKE_WEBSITE),
        });
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }
}

fn pick(options: &[&'static str], choice: &str) -> Result<&'static str, ChatError> {
    options
        .iter()
        .copied()
        .find(|o| *o == choice)
        .ok_or_else(|| ChatError::UnknownOption(choice.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordingSink;

    fn chat() -> ScamChat {
        ScamChat::with_config(ChatConfig::default(), 99)
    }

    /// Drive a fresh chat up to the link decision point.
    fn to_link(c: &mut ScamChat) {
        c.start();
        c.request_help(script::HELP_OPTIONS[0]).unwrap();
        c.advance(2000);
        assert_eq!(c.stage(), ChatStage::DmPending);
        c.switch_view(ChatView::Dm).unwrap();
        c.advance(1000);
        assert_eq!(c.stage(), ChatStage::AwaitingProblem);
        c.choose_problem(script::PROBLEM_OPTIONS[2]).unwrap();
        c.advance(2500);
        assert_eq!(c.stage(), ChatStage::LinkSent);
    }

    #[test]
    fn ambient_chatter_only_in_group() {
        let mut c = chat();
        c.start();
        c.advance(1500);
        let others = |c: &ScamChat| c.messages().iter().filter(|m| m.sender == Sender::OtherUser).count();
        assert_eq!(others(&c), 2);
        c.advance(4500);
        assert_eq!(others(&c), 3);
        c.request_help(script::HELP_OPTIONS[1]).unwrap();
        c.switch_view(ChatView::Dm).unwrap();
        c.advance(60_000);
        assert_eq!(others(&c), 0);
    }

    #[test]
    fn bot_notices_after_delay() {
        let mut c = chat();
        c.start();
        c.request_help("Is admin available?").unwrap();
        c.advance(1999);
        assert_eq!(c.stage(), ChatStage::HelpRequested);
        assert!(!c.snapshot().dm_notification);
        c.advance(1);
        assert!(c.snapshot().dm_notification);
    }

    #[test]
    fn identify_pays_once_and_is_terminal() {
        let mut c = chat();
        let mut sink = RecordingSink::default();
        to_link(&mut c);
        c.identify_scam(&mut sink).unwrap();
        assert_eq!(c.stage(), ChatStage::ScamIdentified);
        assert_eq!(c.pending_timers(), 0);
        assert_eq!(c.identify_scam(&mut sink), Err(ChatError::Resolved));
        assert_eq!(c.open_link().unwrap_err(), ChatError::Resolved);
        assert_eq!(c.switch_view(ChatView::Group), Err(ChatError::Resolved));
        assert_eq!(sink.total(), 100.0);
        c.advance(100_000);
        assert_eq!(c.stage(), ChatStage::ScamIdentified);
    }

    #[test]
    fn signing_drains_and_pays_nothing() {
        let mut c = chat();
        let mut sink = RecordingSink::default();
        to_link(&mut c);
        assert_eq!(c.confirm_sign(), Err(ChatError::NoSignPrompt));
        let prompt = c.open_link().unwrap();
        assert_eq!(prompt.amount, "10,000 XYZ");
        c.confirm_sign().unwrap();
        assert_eq!(c.stage(), ChatStage::Scammed);
        assert!(sink.awards.is_empty());
        assert_eq!(c.decline_sign(&mut sink), Err(ChatError::Resolved));
        let notes = c.take_notifications();
        assert_eq!(notes[0].variant, crate::types::Variant::Destructive);
    }

    #[test]
    fn open_prompt_pins_the_dm_view() {
        let mut c = chat();
        let mut sink = RecordingSink::default();
        to_link(&mut c);
        c.open_link().unwrap();
        assert_eq!(c.switch_view(ChatView::Group), Err(ChatError::SignPromptOpen));
        assert_eq!(c.view(), ChatView::Dm);
        assert!(c.snapshot().sign_prompt.is_some());

        c.decline_sign(&mut sink).unwrap();
        assert_eq!(c.stage(), ChatStage::ScamIdentified);
        assert_eq!(c.confirm_sign(), Err(ChatError::Resolved));
    }

    #[test]
    fn signing_outside_the_dm_is_rejected() {
        let mut c = chat();
        to_link(&mut c);
        c.switch_view(ChatView::Group).unwrap();
        assert_eq!(c.confirm_sign(), Err(ChatError::WrongView(ChatView::Dm)));
        assert_eq!(c.stage(), ChatStage::LinkSent);
    }

    #[test]
    fn declining_the_prompt_counts_as_identifying() {
        let mut c = chat();
        let mut sink = RecordingSink::default();
        to_link(&mut c);
        c.open_link().unwrap();
        c.decline_sign(&mut sink).unwrap();
        assert_eq!(c.stage(), ChatStage::ScamIdentified);
        assert_eq!(sink.awards.len(), 1);
    }

    #[test]
    fn returning_to_dm_rearms_pending_bot_message() {
        let mut c = chat();
        c.start();
        c.request_help(script::HELP_OPTIONS[0]).unwrap();
        c.switch_view(ChatView::Dm).unwrap();
        c.advance(1000);
        c.choose_problem(script::PROBLEM_OPTIONS[0]).unwrap();
        c.advance(1000);
        // leave before the link lands: the pending send is cancelled
        c.switch_view(ChatView::Group).unwrap();
        c.advance(10_000);
        assert_eq!(c.stage(), ChatStage::ProblemSent);
        c.switch_view(ChatView::Dm).unwrap();
        assert!(c.snapshot().bot_typing);
        c.advance(2500);
        assert_eq!(c.stage(), ChatStage::LinkSent);
        // link is replayed after another round trip
        c.switch_view(ChatView::Group).unwrap();
        c.switch_view(ChatView::Dm).unwrap();
        c.advance(500);
        assert!(c.messages().iter().any(|m| m.link == Some(script::FAKE_WEBSITE)));
    }

    #[test]
    fn invalid_actions_leave_state_alone() {
        let mut c = chat();
        assert_eq!(c.request_help(script::HELP_OPTIONS[0]), Err(ChatError::NotStarted));
        c.start();
        assert_eq!(c.switch_view(ChatView::Dm), Err(ChatError::DmUnavailable));
        assert!(matches!(c.request_help("gm"), Err(ChatError::UnknownOption(_))));
        assert!(matches!(
            c.choose_problem(script::PROBLEM_OPTIONS[0]),
            Err(ChatError::WrongView(ChatView::Dm))
        ));
        assert_eq!(c.stage(), ChatStage::AwaitingHelpRequest);
    }

    #[test]
    fn reset_cancels_everything() {
        let mut c = chat();
        c.start();
        c.request_help(script::HELP_OPTIONS[0]).unwrap();
        assert!(c.pending_timers() > 0);
        c.reset();
        assert_eq!(c.pending_timers(), 0);
        assert_eq!(c.stage(), ChatStage::NotStarted);
        c.advance(10_000);
        assert!(c.messages().is_empty());
    }
}
