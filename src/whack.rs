// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Whack-a-Scammer

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;
use wasm_bindgen::prelude::*;

use crate::config::WhackConfig;
use crate::scoring::RewardGate;
use crate::timers::TimerQueue;
use crate::types::{pay_out, Notification, XpSink};

pub const XP_SOURCE: &str = "whack-a-scammer";
pub const GRID_SIZE: usize = 9;

const SCAMMER_FACES: u8 = 4;
const SAFE_FACES: u8 = 2;
const HIT_POINTS: u32 = 10;
const MISS_PENALTY: u32 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WhackError {
    #[error("no round in progress")]
    NotPlaying,
    #[error("cell {0} is off the board")]
    OutOfRange(usize),
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Hidden,
    Scammer {
        face: u8,
    },
    Safe {
        face: u8,
    },
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Hit {
    Scammer,
    Safe,
    Miss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Task {
    Countdown,
    Refresh,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub score: u32,
    pub earned_xp: u32,
}

#[wasm_bindgen]
pub struct WhackGame {
    pub(crate) config: WhackConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) timers: TimerQueue<Task>,
    pub(crate) board: [Cell; GRID_SIZE],
    pub(crate) score: u32,
    pub(crate) time_left: u32,
    pub(crate) playing: bool,
    pub(crate) reward: RewardGate,
    pub(crate) last_result: Option<RoundResult>,
    pub(crate) outbox: Vec<Notification>,
}

impl WhackGame {
    pub fn with_config(config: WhackConfig, seed: u64) -> Self {
        Self {
            time_left: config.duration_secs,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            timers: TimerQueue::new(),
            board: [Cell::Hidden; GRID_SIZE],
            score: 0,
            playing: false,
            reward: RewardGate::default(),
            last_result: None,
            outbox: Vec::new(),
        }
    }

    pub fn board(&self) -> &[Cell; GRID_SIZE] {
        &self.board
    }

    pub fn last_result(&self) -> Option<RoundResult> {
        self.last_result
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn start(&mut self) {
        self.timers.clear();
        self.board = [Cell::Hidden; GRID_SIZE];
        self.score = 0;
        self.time_left = self.config.duration_secs;
        self.playing = true;
        self.last_result = None;
        self.reward.rearm();
        self.timers.schedule_every(1000, 1000, Task::Countdown);
        self.timers.schedule_every(self.config.refresh_ms, self.config.refresh_ms, Task::Refresh);
    }

    /// Run the round clock forward. Returns the result if the round ended.
    pub fn advance(&mut self, elapsed_ms: u64, sink: &mut dyn XpSink) -> Option<RoundResult> {
        let until = self.timers.now().saturating_add(elapsed_ms);
        let mut ended = None;
        while let Some(task) = self.timers.pop_due(until) {
            match task {
                Task::Countdown => {
                    self.time_left = self.time_left.saturating_sub(1);
                    if self.time_left == 0 {
                        ended = Some(self.finish(sink));
                    }
                }
                Task::Refresh => self.refresh(),
            }
        }
        self.timers.settle(until);
        ended
    }

    fn refresh(&mut self) {
        let cfg = &self.config;
        for cell in self.board.iter_mut() {
            if *cell != Cell::Hidden && self.rng.gen::<f64>() < cfg.hide_chance {
                *cell = Cell::Hidden;
            }
        }
        let mut hidden: Vec<usize> = (0..GRID_SIZE).filter(|&i| self.board[i] == Cell::Hidden).collect();
        if hidden.is_empty() {
            return;
        }
        let spawns = if hidden.len() > 1 && self.rng.gen::<f64>() < cfg.double_chance { 2 } else { 1 };
        for _ in 0..spawns {
            let slot = hidden.swap_remove(self.rng.gen_range(0..hidden.len()));
            self.board[slot] = if self.rng.gen::<f64>() < cfg.scammer_chance {
                Cell::Scammer { face: self.rng.gen_range(0..SCAMMER_FACES) }
            } else {
                Cell::Safe { face: self.rng.gen_range(0..SAFE_FACES) }
            };
        }
    }

    pub fn whack(&mut self, index: usize) -> Result<Hit, WhackError> {
        if !self.playing {
            return Err(WhackError::NotPlaying);
        }
        let cell = self.board.get_mut(index).ok_or(WhackError::OutOfRange(index))?;
        let hit = match std::mem::take(cell) {
            Cell::Hidden => Hit::Miss,
            Cell::Scammer { .. } => {
                self.score += HIT_POINTS;
                Hit::Scammer
            }
            Cell::Safe { .. } => {
                self.score = self.score.saturating_sub(MISS_PENALTY);
                self.outbox.push(
                    Notification::destructive("Ouch!", "Don't hit the safe ones! (-5 points)")
                        .with_duration(1500),
                );
                Hit::Safe
            }
        };
        Ok(hit)
    }

    /// End the running round early. See [`WhackGame::finish`].
    pub fn stop(&mut self, sink: &mut dyn XpSink) -> Result<RoundResult, WhackError> {
        if !self.playing {
            return Err(WhackError::NotPlaying);
        }
        Ok(self.finish(sink))
    }

    /// Cancel both intervals, clear the board and pay
    /// `floor(score * xp_per_point)` once.
    fn finish(&mut self, sink: &mut dyn XpSink) -> RoundResult {
        self.timers.clear();
        self.playing = false;
        self.board = [Cell::Hidden; GRID_SIZE];
        let score = self.score;
        let mut earned_xp = 0;

        if self.reward.is_open() && score > 0 {
            let xp = (score as f64 * self.config.xp_per_point).floor() as u32;
            if xp > 0 && self.reward.claim() {
                pay_out(sink, xp as f64, XP_SOURCE);
                earned_xp = xp;
                self.outbox.push(Notification::new(
                    "Game Over!",
                    format!("Final Score: {score}. You earned {xp} XP!"),
                ));
            } else {
                self.outbox.push(Notification::new(
                    "Game Over!",
                    format!("Final Score: {score}. No XP earned this time."),
                ));
            }
        } else if self.reward.is_open() {
            self.outbox.push(Notification::new("Game Over!", format!("Final Score: {score}")));
        }
        info!(score, earned_xp, "whack round over");

        let result = RoundResult { score, earned_xp };
        self.last_result = Some(result);
        result
    }

    /// Abandon the round without paying anything.
    pub fn reset(&mut self) {
        self.timers.clear();
        self.playing = false;
        self.board = [Cell::Hidden; GRID_SIZE];
        self.score = 0;
        self.time_left = self.config.duration_secs;
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordingSink;

    fn visible(game: &WhackGame) -> usize {
        game.board().iter().filter(|c| **c != Cell::Hidden).count()
    }

    #[test]
    fn refresh_shows_one_or_two_new_faces() {
        let mut game = WhackGame::with_config(WhackConfig::default(), 17);
        let mut sink = RecordingSink::default();
        game.start();
        game.advance(1000, &mut sink);
        assert!((1..=2).contains(&visible(&game)));
        assert_eq!(game.time_left, 29);
    }

    #[test]
    fn scoring_and_floor() {
        let mut game = WhackGame::with_config(WhackConfig::default(), 1);
        game.start();
        game.board[0] = Cell::Safe { face: 0 };
        assert_eq!(game.whack(0), Ok(Hit::Safe));
        assert_eq!(game.score, 0);
        game.board[1] = Cell::Scammer { face: 2 };
        assert_eq!(game.whack(1), Ok(Hit::Scammer));
        assert_eq!(game.whack(1), Ok(Hit::Miss));
        assert_eq!(game.score, 10);
        assert_eq!(game.whack(9), Err(WhackError::OutOfRange(9)));
        assert_eq!(game.take_notifications()[0].title, "Ouch!");
    }

    #[test]
    fn round_ends_at_zero_and_pays_once() {
        let mut game = WhackGame::with_config(WhackConfig::default(), 2);
        let mut sink = RecordingSink::default();
        game.start();
        game.score = 45;
        assert!(game.advance(29_999, &mut sink).is_none());
        let result = game.advance(1, &mut sink).unwrap();
        assert_eq!(result, RoundResult { score: 45, earned_xp: 22 });
        assert_eq!(game.pending_timers(), 0);
        assert_eq!(visible(&game), 0);
        assert!(game.advance(60_000, &mut sink).is_none());
        assert_eq!(sink.awards, vec![(XP_SOURCE.to_string(), 22.0)]);
        assert_eq!(game.whack(0), Err(WhackError::NotPlaying));
    }

    #[test]
    fn stop_needs_a_running_round() {
        let mut game = WhackGame::with_config(WhackConfig::default(), 1);
        let mut sink = RecordingSink::default();
        assert_eq!(game.stop(&mut sink), Err(WhackError::NotPlaying));
        assert!(game.take_notifications().is_empty());
        assert_eq!(game.last_result(), None);

        game.start();
        game.score = 20;
        assert_eq!(game.stop(&mut sink), Ok(RoundResult { score: 20, earned_xp: 10 }));
        assert_eq!(game.stop(&mut sink), Err(WhackError::NotPlaying));
        assert_eq!(game.take_notifications().len(), 1);
        assert_eq!(game.last_result(), Some(RoundResult { score: 20, earned_xp: 10 }));
        assert_eq!(sink.total(), 10.0);
    }

    #[test]
    fn reset_tears_down_timers() {
        let mut game = WhackGame::with_config(WhackConfig::default(), 3);
        let mut sink = RecordingSink::default();
        game.start();
        assert_eq!(game.pending_timers(), 2);
        game.reset();
        assert_eq!(game.pending_timers(), 0);
        assert!(game.advance(40_000, &mut sink).is_none());
        assert!(sink.awards.is_empty());
    }
}
