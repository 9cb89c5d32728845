// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Crypto Quiz

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;
use wasm_bindgen::prelude::*;

use crate::config::QuizConfig;
use crate::scoring::{pass_mark, shuffled, Difficulty, RewardGate, Tally};
use crate::types::{pay_out, Notification, XpSink};

pub const XP_SOURCE: &str = "crypto-quiz";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("Please select an answer.")]
    NoSelection,
    #[error("`{0}` is not one of the options")]
    UnknownOption(String),
    #[error("this question has already been answered")]
    AlreadyAnswered,
    #[error("answer the current question first")]
    NotAnswered,
    #[error("the quiz is finished -- restart to play again")]
    Finished,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub prompt: &'static str,
    pub options: [&'static str; 4],
    pub answer: &'static str,
    pub explanation: &'static str,
    pub difficulty: Difficulty,
}

pub static QUESTIONS: [Question; 6] = [
    Question {
        id: 1,
        prompt: "What does 'DYOR' stand for in crypto?",
        options: [
            "Do Your Own Research",
            "Don't Yield Our Resources",
            "Deposit Your Own Ratio",
            "Data Yield Optimization Rate",
        ],
        answer: "Do Your Own Research",
        explanation: "DYOR emphasizes the importance of investigating a project yourself before investing.",
        difficulty: Difficulty::Easy,
    },
    Question {
        id: 2,
        prompt: "Which of these is a common red flag for a potential 'rug pull' scam?",
        options: [
            "Team is publicly known (doxxed)",
            "Liquidity locked for a long period",
            "Anonymous team and very short liquidity lock",
            "Project has a clear whitepaper",
        ],
        answer: "Anonymous team and very short liquidity lock",
        explanation: "Scammers often stay anonymous and lock liquidity only briefly (or not at all) so they can withdraw funds easily.",
        difficulty: Difficulty::Medium,
    },
    Question {
        id: 3,
        prompt: "What is 'gas' in the context of Ethereum?",
        options: [
            "A type of token",
            "The fee required to perform transactions",
            "A stablecoin",
            "The energy used for mining",
        ],
        answer: "The fee required to perform transactions",
        explanation: "Gas fees compensate miners/validators for the computational effort needed to process transactions on the network.",
        difficulty: Difficulty::Easy,
    },
    Question {
        id: 4,
        prompt: "What is the primary purpose of a 'faucet' in crypto tutorials?",
        options: [
            "To exchange real money for crypto",
            "To provide small amounts of free test tokens",
            "To secure your private keys",
            "To track market prices",
        ],
        answer: "To provide small amounts of free test tokens",
        explanation: "Faucets allow users to get no-value tokens on testnets or specific platforms to practice transactions without risking real money.",
        difficulty: Difficulty::Easy,
    },
    Question {
        id: 5,
        prompt: "A 'honeypot' smart contract typically...",
        options: [
            "Rewards users for holding tokens",
            "Allows anyone to withdraw funds",
            "Prevents buyers from selling their tokens",
            "Automatically increases token price",
        ],
        answer: "Prevents buyers from selling their tokens",
        explanation: "Honeypot contracts trap users' funds by including code that allows buying but restricts or prevents selling.",
        difficulty: Difficulty::Hard,
    },
    Question {
        id: 6,
        prompt: "When is it ok to share your wallet keys (seed phrase or private key)?",
        options: [
            "When customer support asks for it to verify your identity.",
            "To receive an airdrop or special reward.",
            "If a trusted friend needs to borrow funds quickly.",
            "NEVER. Sharing your keys gives full control of your funds.",
        ],
        answer: "NEVER. Sharing your keys gives full control of your funds.",
        explanation: "Your private keys/seed phrase grant complete access to your wallet. NEVER share them with anyone, including support, friends, or websites asking for verification.",
        difficulty: Difficulty::Hard,
    },
];

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    pub correct: bool,
    pub xp: u32,
    pub answer: &'static str,
    pub explanation: &'static str,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum QuizStep {
    Question { index: usize },
    Finished { score: u32, total: u32, awarded: u32 },
}

#[wasm_bindgen]
pub struct Quiz {
    pub(crate) config: QuizConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) order: Vec<&'static Question>,
    pub(crate) index: usize,
    pub(crate) feedback: Option<AnswerFeedback>,
    pub(crate) tally: Tally,
    pub(crate) finished: bool,
    pub(crate) reward: RewardGate,
    pub(crate) outbox: Vec<Notification>,
}

impl Quiz {
    pub fn with_config(config: QuizConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let all: Vec<&'static Question> = QUESTIONS.iter().collect();
        let order = shuffled(&all, &mut rng);
        Self {
            config,
            rng,
            order,
            index: 0,
            feedback: None,
            tally: Tally::default(),
            finished: false,
            reward: RewardGate::default(),
            outbox: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<&'static Question> {
        if self.finished {
            return None;
        }
        self.order.get(self.index).copied()
    }

    pub fn order_ids(&self) -> Vec<u32> {
        self.order.iter().map(|q| q.id).collect()
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        self.feedback.as_ref()
    }

    pub fn submit(&mut self, choice: &str) -> Result<&AnswerFeedback, QuizError> {
        let question = self.current().ok_or(QuizError::Finished)?;
        if self.feedback.is_some() {
            return Err(QuizError::AlreadyAnswered);
        }
        if choice.trim().is_empty() {
            return Err(QuizError::NoSelection);
        }
        if !question.options.iter().any(|o| *o == choice) {
            return Err(QuizError::UnknownOption(choice.to_string()));
        }
        let correct = choice == question.answer;
        let xp = if correct { question.difficulty.xp() } else { 0 };
        self.tally.record(correct, xp);
        Ok(&*self.feedback.insert(AnswerFeedback {
            correct,
            xp,
            answer: question.answer,
            explanation: question.explanation,
        }))
    }

    /// Move on from an answered question; on the last one, close the attempt
    /// and pay the accumulated XP if this attempt has not been paid yet.
    pub fn next(&mut self, sink: &mut dyn XpSink) -> Result<QuizStep, QuizError> {
        if self.finished {
            return Err(QuizError::Finished);
        }
        if self.feedback.is_none() {
            return Err(QuizError::NotAnswered);
        }
        self.feedback = None;
        if self.index + 1 < self.order.len() {
            self.index += 1;
            return Ok(QuizStep::Question { index: self.index });
        }
        self.finished = true;
        let awarded = self.settle(sink);
        Ok(QuizStep::Finished {
            score: self.tally.correct,
            total: self.order.len() as u32,
            awarded,
        })
    }

    fn settle(&mut self, sink: &mut dyn XpSink) -> u32 {
        let total = self.order.len();
        let score = self.tally.correct;
        let passed = score as usize >= pass_mark(total, self.config.pass_ratio);
        let xp = self.tally.xp;
        if passed && xp > 0 && self.reward.claim() {
            pay_out(sink, xp as f64, XP_SOURCE);
            info!(score, total, xp, "quiz completed");
            self.outbox.push(Notification::success(
                "Quiz Complete!",
                format!("Final Score: {score}/{total}. You earned {xp} XP!"),
            ));
            return xp;
        }
        let already = !self.reward.is_open();
        self.outbox.push(if already {
            Notification::new("Quiz Finished!", format!("Final Score: {score}/{total}."))
        } else {
            Notification::destructive(
                "Quiz Complete!",
                format!("Final Score: {score}/{total}. No XP earned this time."),
            )
        });
        0
    }

    /// Reshuffle and start over. Re-arms the completion reward.
    pub fn restart(&mut self) {
        let all: Vec<&'static Question> = QUESTIONS.iter().collect();
        self.order = shuffled(&all, &mut self.rng);
        self.index = 0;
        self.feedback = None;
        self.tally = Tally::default();
        self.finished = false;
        self.reward.rearm();
        self.outbox.push(Notification::new("Quiz Restarted", "Questions have been shuffled!"));
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordingSink;

    fn play(quiz: &mut Quiz, sink: &mut RecordingSink, right: bool) -> QuizStep {
        loop {
            let q = quiz.current().unwrap();
            let pick = if right {
                q.answer
            } else {
                q.options.iter().copied().find(|o| *o != q.answer).unwrap()
            };
            quiz.submit(pick).unwrap();
            let step = quiz.next(sink).unwrap();
            if let QuizStep::Finished { .. } = step {
                return step;
            }
        }
    }

    #[test]
    fn perfect_run_pays_sum_of_tiers() {
        let mut quiz = Quiz::with_config(QuizConfig::default(), 1);
        let mut sink = RecordingSink::default();
        let step = play(&mut quiz, &mut sink, true);
        // 3 easy + 1 medium + 2 hard
        assert_eq!(step, QuizStep::Finished { score: 6, total: 6, awarded: 55 });
        assert_eq!(sink.total(), 55.0);
        assert_eq!(quiz.submit("x").unwrap_err(), QuizError::Finished);
    }

    #[test]
    fn all_wrong_pays_nothing() {
        let mut quiz = Quiz::with_config(QuizConfig::default(), 2);
        let mut sink = RecordingSink::default();
        let step = play(&mut quiz, &mut sink, false);
        assert_eq!(step, QuizStep::Finished { score: 0, total: 6, awarded: 0 });
        assert!(sink.awards.is_empty());
        let notes = quiz.take_notifications();
        assert!(notes[0].description.contains("No XP earned"));
    }

    #[test]
    fn pass_ratio_gates_payout() {
        let mut quiz = Quiz::with_config(QuizConfig { pass_ratio: 1.0 }, 3);
        let mut sink = RecordingSink::default();
        // one wrong answer, then all right
        let first = quiz.current().unwrap();
        let wrong = first.options.iter().copied().find(|o| *o != first.answer).unwrap();
        quiz.submit(wrong).unwrap();
        quiz.next(&mut sink).unwrap();
        play(&mut quiz, &mut sink, true);
        assert!(sink.awards.is_empty());
    }

    #[test]
    fn submit_validation() {
        let mut quiz = Quiz::with_config(QuizConfig::default(), 4);
        let mut sink = RecordingSink::default();
        assert_eq!(quiz.next(&mut sink).unwrap_err(), QuizError::NotAnswered);
        assert_eq!(quiz.submit("  ").unwrap_err(), QuizError::NoSelection);
        assert!(matches!(quiz.submit("Bitcoin"), Err(QuizError::UnknownOption(_))));
        let answer = quiz.current().unwrap().answer;
        assert!(quiz.submit(answer).unwrap().correct);
        assert_eq!(quiz.submit(answer).unwrap_err(), QuizError::AlreadyAnswered);
        assert_eq!(quiz.tally().answered, 1);
    }

    #[test]
    fn restart_reshuffles_and_rearms() {
        let mut quiz = Quiz::with_config(QuizConfig::default(), 5);
        let mut sink = RecordingSink::default();
        play(&mut quiz, &mut sink, true);
        let mut orders = vec![quiz.order_ids()];
        for _ in 0..5 {
            quiz.restart();
            let mut ids = quiz.order_ids();
            orders.push(ids.clone());
            ids.sort_unstable();
            assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        }
        assert!(orders.windows(2).any(|w| w[0] != w[1]));
        play(&mut quiz, &mut sink, true);
        assert_eq!(sink.awards.len(), 2);
    }
}
