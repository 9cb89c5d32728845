// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Spot the Rug Pull

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;
use wasm_bindgen::prelude::*;

use crate::config::RugPullConfig;
use crate::scoring::{pass_mark, shuffled, RewardGate, Tally};
use crate::types::{pay_out, Notification, XpSink};

pub const XP_SOURCE: &str = "rug-pull";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RugPullError {
    #[error("scenario {0} has already been answered")]
    AlreadyAnswered(u32),
    #[error("answer the current scenario first")]
    NotAnswered,
    #[error("all scenarios are done -- restart to play again")]
    Finished,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub is_rug: bool,
    /// Red flags for rugs, green flags otherwise.
    pub flags: &'static [&'static str],
}

pub static SCENARIOS: [Scenario; 4] = [
    Scenario {
        id: 1,
        name: "HONEYPOT Token",
        description: "Promises 1000x gains daily! Liquidity locked for only 1 hour. Anonymous team.",
        is_rug: true,
        flags: &["Extremely high unrealistic gains", "Short liquidity lock", "Anonymous team"],
    },
    Scenario {
        id: 2,
        name: "Solid Project Coin (SPC)",
        description: "Focuses on building a real utility dApp. Team is public and doxxed. Liquidity locked for 1 year.",
        is_rug: false,
        flags: &["Realistic goals", "Public team", "Long liquidity lock"],
    },
    Scenario {
        id: 3,
        name: "MoonRocket Inu",
        description: "Just launched! Huge marketing push on social media. Contract has a function allowing the owner to disable selling.",
        is_rug: true,
        flags: &[
            "Hype-driven name",
            "Function to disable selling (honeypot characteristic)",
            "Overly aggressive marketing",
        ],
    },
    Scenario {
        id: 4,
        name: "Dev Team Token (DTT)",
        description: "Token contract verified on Etherscan. Audit completed by a reputable firm. Clear roadmap and whitepaper available.",
        is_rug: false,
        flags: &["Verified contract", "Reputable audit", "Clear documentation"],
    },
];

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub correct: bool,
    pub was_rug: bool,
    pub summary: &'static str,
    pub flags: &'static [&'static str],
    /// Set on the last scenario: whether the challenge reward was paid.
    pub completed: Option<bool>,
}

#[wasm_bindgen]
pub struct RugPullChallenge {
    pub(crate) config: RugPullConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) order: Vec<&'static Scenario>,
    pub(crate) index: usize,
    pub(crate) answered: BTreeSet<u32>,
    pub(crate) verdict: Option<Verdict>,
    pub(crate) tally: Tally,
    pub(crate) reward: RewardGate,
    pub(crate) outbox: Vec<Notification>,
}

impl RugPullChallenge {
    pub fn with_config(config: RugPullConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let all: Vec<&'static Scenario> = SCENARIOS.iter().collect();
        let order = shuffled(&all, &mut rng);
        Self {
            config,
            rng,
            order,
            index: 0,
            answered: BTreeSet::new(),
            verdict: None,
            tally: Tally::default(),
            reward: RewardGate::default(),
            outbox: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<&'static Scenario> {
        self.order.get(self.index).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.order.len()
    }

    pub fn is_completed(&self) -> bool {
        !self.reward.is_open()
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn threshold(&self) -> usize {
        pass_mark(self.order.len(), self.config.pass_ratio)
    }

    /// Grade a rug / not-rug guess on the current scenario. Answering the last
    /// scenario decides the completion reward.
    pub fn answer(&mut self, guess_rug: bool, sink: &mut dyn XpSink) -> Result<&Verdict, RugPullError> {
        let scenario = self.current().ok_or(RugPullError::Finished)?;
        if self.answered.contains(&scenario.id) {
            return Err(RugPullError::AlreadyAnswered(scenario.id));
        }
        self.answered.insert(scenario.id);

        let correct = guess_rug == scenario.is_rug;
        self.tally.record(correct, 1);
        self.outbox.push(if correct {
            Notification::new("Correct!", "Good eye for spotting the signs!")
        } else {
            Notification::destructive("Incorrect", "Let's review the flags for this one.")
        });

        let completed = (self.index + 1 == self.order.len()).then(|| self.settle(sink));
        Ok(&*self.verdict.insert(Verdict {
            correct,
            was_rug: scenario.is_rug,
            summary: if scenario.is_rug {
                "This looks like a potential rug pull."
            } else {
                "This project seems more legitimate."
            },
            flags: scenario.flags,
            completed,
        }))
    }

    fn settle(&mut self, sink: &mut dyn XpSink) -> bool {
        if !self.reward.is_open() {
            return true;
        }
        let total = self.order.len();
        let score = self.tally.correct;
        let needed = self.threshold();
        if score as usize >= needed && self.reward.claim() {
            let xp = self.config.xp_reward;
            pay_out(sink, xp as f64, XP_SOURCE);
            info!(score, total, xp, "rug-pull challenge completed");
            self.outbox.push(Notification::new(
                "Challenge Complete!",
                format!("You passed and earned {xp} XP! Score: {score}/{total}"),
            ));
            true
        } else {
            self.outbox.push(Notification::destructive(
                "Challenge Finished",
                format!(
                    "You didn't reach the required score ({needed}/{total}). Try again! Your score: {score}/{total}"
                ),
            ));
            false
        }
    }

    /// Leave the feedback screen for the next scenario.
    pub fn next(&mut self) -> Result<(), RugPullError> {
        if self.is_finished() {
            return Err(RugPullError::Finished);
        }
        if self.verdict.take().is_none() {
            return Err(RugPullError::NotAnswered);
        }
        self.index += 1;
        Ok(())
    }

    /// Reshuffle, clear the score and re-arm the reward.
    pub fn restart(&mut self) {
        let all: Vec<&'static Scenario> = SCENARIOS.iter().collect();
        self.order = shuffled(&all, &mut self.rng);
        self.index = 0;
        self.answered.clear();
        self.verdict = None;
        self.tally = Tally::default();
        self.reward.rearm();
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordingSink;

    fn run(challenge: &mut RugPullChallenge, sink: &mut RecordingSink, wrong: usize) {
        for i in 0..SCENARIOS.len() {
            let s = challenge.current().unwrap();
            let guess = if i < wrong { !s.is_rug } else { s.is_rug };
            challenge.answer(guess, sink).unwrap();
            challenge.next().unwrap();
        }
    }

    #[test]
    fn three_of_four_passes() {
        let mut c = RugPullChallenge::with_config(RugPullConfig::default(), 8);
        let mut sink = RecordingSink::default();
        assert_eq!(c.threshold(), 3);
        run(&mut c, &mut sink, 1);
        assert_eq!(sink.total(), 150.0);
        assert!(c.is_completed());
        assert!(c.is_finished());
    }

    #[test]
    fn two_of_four_fails() {
        let mut c = RugPullChallenge::with_config(RugPullConfig::default(), 8);
        let mut sink = RecordingSink::default();
        run(&mut c, &mut sink, 2);
        assert!(sink.awards.is_empty());
        let notes = c.take_notifications();
        assert!(notes.iter().any(|n| n.title == "Challenge Finished"));
    }

    #[test]
    fn resubmitting_never_regrants() {
        let mut c = RugPullChallenge::with_config(RugPullConfig::default(), 1);
        let mut sink = RecordingSink::default();
        for _ in 0..SCENARIOS.len() - 1 {
            let s = c.current().unwrap();
            c.answer(s.is_rug, &mut sink).unwrap();
            c.next().unwrap();
        }
        let last = c.current().unwrap();
        let verdict = c.answer(last.is_rug, &mut sink).unwrap();
        assert_eq!(verdict.completed, Some(true));
        for _ in 0..3 {
            assert_eq!(
                c.answer(last.is_rug, &mut sink).unwrap_err(),
                RugPullError::AlreadyAnswered(last.id)
            );
        }
        assert_eq!(sink.awards.len(), 1);
    }

    #[test]
    fn next_requires_an_answer_and_restart_rearms() {
        let mut c = RugPullChallenge::with_config(RugPullConfig::default(), 2);
        let mut sink = RecordingSink::default();
        assert_eq!(c.next().unwrap_err(), RugPullError::NotAnswered);
        run(&mut c, &mut sink, 0);
        assert_eq!(c.next().unwrap_err(), RugPullError::Finished);
        c.restart();
        assert!(!c.is_completed());
        run(&mut c, &mut sink, 0);
        assert_eq!(sink.awards.len(), 2);
    }
}
