// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Scam Chat Script

use serde::Serialize;

pub const BOT_NAME: &str = "XYZ Customer Service";
pub const GROUP_NAME: &str = "XYZ Token Official Group";
pub const FAKE_WEBSITE: &str = "xyz-token-support-auth.web.app";

pub const HELP_OPTIONS: [&str; 3] = [
    "Wallet sync isn't working.",
    "I got a transaction error.",
    "Is admin available?",
];

pub const PROBLEM_OPTIONS: [&str; 3] = [
    "My balance isn't updating after a swap.",
    "I keep getting 'Insufficient Funds' error.",
    "The wallet app keeps crashing.",
];

pub const USERNAMES: [&str; 15] = [
    "CryptoKing88",
    "DeFiDegen",
    "NFTCollectorX",
    "WhaleWatcher",
    "ShillMaster",
    "DiamondHands",
    "MoonShotCaller",
    "AltcoinMaxi",
    "HodlerForever",
    "YieldFarmerPro",
    "GasSaver",
    "ZeroKnowledge",
    "ApeInStrong",
    "LamboDreamer",
    "PaperHandsPete",
];

pub const AMBIENT_MESSAGES: [&str; 12] = [
    "Anyone know when staking rewards are distributed?",
    "Price looking good today!",
    "Just bought more XYZ!",
    "When moon?",
    "Is the roadmap updated?",
    "This project has potential!",
    "How do I bridge tokens?",
    "Market seems volatile...",
    "Anyone else getting this error?",
    "DYOR everyone!",
    "Feeling bullish!",
    "Need help with setting up my wallet.",
];

pub fn joined_group() -> String {
    format!("You joined {GROUP_NAME}. Choose an option below if you need help.")
}

pub fn viewing_group() -> String {
    format!("You are now viewing {GROUP_NAME}.")
}

pub fn dm_opened() -> String {
    format!("You are now in a direct message with {BOT_NAME}.")
}

pub fn bot_greeting() -> String {
    format!(
        "Hello! I'm from {BOT_NAME}. I saw your message in the group. How can I help you with your wallet issue today? Please select an option below."
    )
}

pub fn scam_link() -> String {
    format!(
        "Okay, I see. Please visit our secure wallet synchronization portal to resolve this: {FAKE_WEBSITE}\n\nMake sure to connect your wallet and sign the transaction to re-sync."
    )
}

pub const IDENTIFIED: &str = "Good job! You correctly identified this as a scam. Support will NEVER DM you first or ask you to connect your wallet to a random site.";

pub fn drained(loss: f64) -> String {
    format!(
        "You signed the transaction! The scammer drained {} XYZ tokens from your wallet. Always verify URLs and transaction details carefully.",
        thousands(loss)
    )
}

pub fn drained_toast(loss: f64) -> String {
    format!(
        "You fell for the scam! This simulation cost you {} fake XYZ tokens. Learn from this!",
        thousands(loss)
    )
}

pub fn spotted_toast(xp: u32) -> String {
    format!("You earned {xp} XP. Remember: Real support rarely DMs first and avoids suspicious links!")
}

/// "10000" -> "10,000". Fractions are dropped.
fn thousands(value: f64) -> String {
    let digits = (value.max(0.0).round() as u64).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// The fake wallet approval dialog shown after opening the link.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignPrompt {
    pub website: &'static str,
    pub action: &'static str,
    pub token: &'static str,
    pub amount: String,
    pub recipient: &'static str,
    pub warning: &'static str,
}

impl SignPrompt {
    pub fn for_loss(loss: f64) -> Self {
        Self {
            website: FAKE_WEBSITE,
            action: "Approve Token Transfer",
            token: "XYZ Token",
            amount: format!("{} XYZ", thousands(loss)),
            recipient: "0xScAm...Addr3ss",
            warning: "Warning: Carefully review the details before signing. Approving this could lead to loss of funds.",
        }
    }
}
