// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Player Profile & Leaderboard

use serde::Serialize;
use tracing::info;
use wasm_bindgen::prelude::*;

use crate::ledger::LedgerState;
use crate::types::Notification;

pub const DEFAULT_USERNAME: &str = "CryptoLearner123";
pub const MAX_USERNAME_LEN: usize = 32;
pub const LEADERBOARD_SIZE: usize = 6;

/// Mock competitors, best first.
pub static ROSTER: [(&str, u32); 8] = [
    ("CryptoKing", 1250),
    ("DeFiDiva", 1100),
    ("NFTPioneer", 980),
    ("YieldYoda", 850),
    ("SatoshiJr", 720),
    ("BlockBaron", 650),
    ("ChainChamp", 610),
    ("AltcoinAce", 580),
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("username cannot be empty")]
    EmptyUsername,
    #[error("username is {0} characters, the limit is {MAX_USERNAME_LEN}")]
    UsernameTooLong(usize),
    #[error("avatar must be an image data URI")]
    InvalidAvatar,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub xp: f64,
    pub is_player: bool,
}

/// What the profile card shows.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressCard {
    pub username: String,
    pub level: u32,
    pub xp: u64,
    pub next_level_xp: u64,
    pub progress_pct: f64,
}

#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct Profile {
    pub(crate) username: String,
    pub(crate) avatar: Option<String>,
    pub(crate) outbox: Vec<Notification>,
}

impl Default for Profile {
    fn default() -> Self {
        Self { username: DEFAULT_USERNAME.to_string(), avatar: None, outbox: Vec::new() }
    }
}

impl Profile {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    /// Apply edited settings. Returns whether anything changed; invalid input
    /// leaves the profile untouched.
    pub fn save(&mut self, username: &str, avatar: Option<&str>) -> Result<bool, ProfileError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ProfileError::EmptyUsername);
        }
        let len = username.chars().count();
        if len > MAX_USERNAME_LEN {
            return Err(ProfileError::UsernameTooLong(len));
        }
        if let Some(uri) = avatar {
            if !uri.starts_with("data:image/") {
                self.outbox.push(Notification::destructive("Invalid File Type", "Please select an image file."));
                return Err(ProfileError::InvalidAvatar);
            }
        }

        let changed = username != self.username || avatar != self.avatar.as_deref();
        if changed {
            self.username = username.to_string();
            self.avatar = avatar.map(str::to_string);
            info!(username = %self.username, has_avatar = self.avatar.is_some(), "profile updated");
            self.outbox.push(Notification::new("Settings Saved", "Your profile details have been updated."));
        } else {
            self.outbox.push(Notification::new("No Changes", "No settings were modified."));
        }
        Ok(changed)
    }

    pub fn progress(&self, state: &LedgerState) -> ProgressCard {
        let progress_pct = if state.next_level_xp > 0.0 {
            (state.xp / state.next_level_xp * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        ProgressCard {
            username: self.username.clone(),
            level: state.level,
            xp: state.xp.floor() as u64,
            next_level_xp: state.next_level_xp.floor() as u64,
            progress_pct,
        }
    }

    /// Rank the player (by lifetime XP) among the mock roster and keep the
    /// top `size`. The player sorts below anyone they merely tie.
    pub fn leaderboard(&self, lifetime_xp: f64, size: usize) -> Vec<LeaderboardEntry> {
        let mut rows: Vec<(String, f64, bool)> = ROSTER
            .iter()
            .map(|(name, xp)| (name.to_string(), f64::from(*xp), false))
            .collect();
        rows.push((self.username.clone(), lifetime_xp.max(0.0), true));
        rows.sort_by(|a, b| b.1.total_cmp(&a.1));
        rows.into_iter()
            .take(size)
            .zip(1u32..)
            .map(|((name, xp, is_player), rank)| LeaderboardEntry { rank, name, xp, is_player })
            .collect()
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }
}

/// `0x1234...abcd`, or "Not Connected".
pub fn truncate_address(address: Option<&str>) -> String {
    match address {
        Some(addr) if addr.len() > 10 && addr.is_ascii() => {
            format!("{}...{}", &addr[..6], &addr[addr.len() - 4..])
        }
        Some(addr) if !addr.is_empty() => addr.to_string(),
        _ => "Not Connected".to_string(),
    }
}
