// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Market Event Catalog

use serde::Serialize;

use super::sentiment::Sentiment;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Rumor,
    Tweet,
    MarketShift,
    ScamOpportunity,
    News,
    NftOpportunity,
    DaoDrama,
    Exploit,
    UtilityLaunch,
    Microcap,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Token {
    Garbage,
    Clown,
    Safe,
    Xyz,
}

/// Hand-written behaviour attached to a few catalog entries.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum EventScript {
    /// Investing always fails.
    ForcedFailure,
    /// Chasing yesterday's celebrity pump.
    LatePump,
    /// A win here during panic gets a "buying the dip paid off" line.
    CapitulationBuy,
    /// A win here during panic gets a contrarian-indicator line.
    ContrarianBuy,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketEvent {
    pub id: u32,
    pub kind: EventKind,
    pub title: &'static str,
    pub description: &'static str,
    /// Educational hint shown after a failed or dodged investment.
    pub clue: &'static str,
    pub token: Option<Token>,
    pub potential_gain: Option<&'static str>,
    pub high_risk: bool,
    pub delayed: bool,
    pub sentiment: Option<Sentiment>,
    pub script: Option<EventScript>,
}

impl MarketEvent {
    const fn new(
        id: u32,
        kind: EventKind,
        title: &'static str,
        description: &'static str,
        clue: &'static str,
    ) -> Self {
        Self {
            id,
            kind,
            title,
            description,
            clue,
            token: None,
            potential_gain: None,
            high_risk: false,
            delayed: false,
            sentiment: None,
            script: None,
        }
    }

    const fn risky(self) -> Self {
        Self { high_risk: true, ..self }
    }

    const fn delayed(self) -> Self {
        Self { delayed: true, ..self }
    }

    const fn token(self, token: Token) -> Self {
        Self { token: Some(token), ..self }
    }

    const fn gain(self, gain: &'static str) -> Self {
        Self { potential_gain: Some(gain), ..self }
    }

    const fn shifts(self, sentiment: Sentiment) -> Self {
        Self { sentiment: Some(sentiment), ..self }
    }

    const fn scripted(self, script: EventScript) -> Self {
        Self { script: Some(script), ..self }
    }

    /// Loses the whole stake when it fails.
    pub fn total_loss_on_failure(&self) -> bool {
        self.high_risk || matches!(self.kind, EventKind::ScamOpportunity | EventKind::Microcap)
    }

    /// Draws its profit multiplier from the volatile range.
    pub fn volatile_upside(&self) -> bool {
        self.high_risk || matches!(self.kind, EventKind::NftOpportunity | EventKind::Microcap)
    }
}

pub fn by_id(id: u32) -> Option<&'static MarketEvent> {
    CATALOG.iter().find(|e| e.id == id)
}

use EventKind::*;
use Token::*;

pub static CATALOG: [MarketEvent; 30] = [
    MarketEvent::new(1, Rumor, "Rumor Mill: New Altcoin Gaining Traction",
        "Whispers on CryptoX suggest a new altcoin could be the next big thing. Dev wallet holds 50% of supply.",
        "High dev wallet concentration often signals centralization risk or potential dump.")
        .gain("5x-10x?").risky(),
    MarketEvent::new(2, Tweet, "Influencer Tweet: Promising Project Alert!",
        "A popular crypto influencer is hyping a new project with ambitious goals. DYOR!",
        "Influencer hype without substance often leads to pump-and-dumps. Verify the claims.")
        .gain("100x (maybe)").risky(),
    MarketEvent::new(3, MarketShift, "Market Jitters",
        "Uncertainty looms as regulatory discussions intensify. Market sentiment showing signs of turning bearish.",
        "Investing during market uncertainty or \"jitters\" is often risky as sentiment can sour quickly.")
        .shifts(Sentiment::Bearish).scripted(EventScript::ForcedFailure),
    MarketEvent::new(4, ScamOpportunity, "Exclusive Presale Invitation",
        "An opportunity to invest in a promising new token before it hits the market. Limited spots available! Contract unverified.",
        "Unverified contracts are extremely risky and a common sign of scams.")
        .risky(),
    MarketEvent::new(5, Rumor, "Tech Breakthrough Announced",
        "Reports of a significant technological advancement in a lesser-known project emerge. Seems legit?",
        "Genuine tech advancements can drive value, assuming the report is accurate.")
        .token(Garbage),
    MarketEvent::new(6, MarketShift, "Market Euphoria!",
        "Green candles everywhere! A wave of optimism sweeps through the crypto space.",
        "Extreme euphoria often signals a market top. Buying during peak hype is very risky (Exit Liquidity).")
        .shifts(Sentiment::Euphoric),
    MarketEvent::new(7, News, "Major Exchange Lists $SAFE",
        "$SAFE token has just been listed on a top-tier exchange! Price jumped 30% in the last hour.",
        "Investing *after* a major listing pump (\"sell the news\") can be dangerous as early investors take profits.")
        .token(Safe).delayed().risky(),
    MarketEvent::new(8, Tweet, "Elon Mentions Altcoin Project (Yesterday!)",
        "Elon Musk tweeted about an altcoin yesterday, causing a massive pump. Is it too late to get in?",
        "Chasing pumps based on old news (even celebrity tweets) is often a losing strategy.")
        .gain("???").risky().delayed().scripted(EventScript::LatePump),
    MarketEvent::new(9, News, "Project Audit Results Released",
        "Project CLOWNCHAIN passed its security audit! Report looks clean.",
        "A successful audit from a reputable firm reduces security risks, but doesn't guarantee price appreciation.")
        .token(Clown),
    MarketEvent::new(10, ScamOpportunity, "Yield Farm Offering 1000% APY",
        "New farm just launched offering insane returns on $XYZ staking. Deposit requires approving unlimited token spend.",
        "Unsustainably high APYs and requests for unlimited token approvals are major red flags for scams.")
        .gain("1000% APY!").risky(),
    MarketEvent::new(11, MarketShift, "Massive Liquidation Cascade",
        "Panic selling triggers a cascade of liquidations across major platforms. Sentiment is rock bottom.",
        "Panic selling can present buying opportunities (\"buy the dip\"), but timing is critical and risky. Ensure the project fundamentals remain sound.")
        .shifts(Sentiment::Panic).scripted(EventScript::CapitulationBuy),
    MarketEvent::new(12, NftOpportunity, "Hyped NFT Mint LIVE!",
        "A new PFP project with huge Discord buzz is minting now! Floor could 10x, or go to zero.",
        "NFT mints are highly volatile. Success often depends on timing, overall market sentiment, and team execution, not just hype.")
        .gain("10x?").risky().delayed(),
    MarketEvent::new(13, NftOpportunity, "NFT Floor Price Speculation",
        "Talk of a major influencer sweeping the floor of the \"Bored YC Kittens\" collection. Maybe pump incoming?",
        "Speculating on NFT floor prices based on rumors is extremely risky and akin to gambling.")
        .risky().delayed(),
    MarketEvent::new(14, NftOpportunity, "\"Free\" NFT Claim Available",
        "Claim your free commemorative NFT by connecting your wallet and signing the transaction. Looks legit?",
        "\"Free\" mints requiring transaction signing (especially approvals) are often wallet drainer scams.")
        .risky(),
    MarketEvent::new(15, Exploit, "Protocol Hack Reported",
        "Breaking news: A popular DeFi protocol has been exploited. Token price is tanking.",
        "Investing in hacked projects, even after a price drop, is very risky until the vulnerability is fixed and funds are potentially recovered.")
        .token(Safe).shifts(Sentiment::Panic).risky(),
    MarketEvent::new(16, Rumor, "Partnership Speculation",
        "Rumors swirling about a potential partnership between Project CLOWNCHAIN and a major tech company.",
        "Partnership rumors can pump prices, but gains often fade if the partnership isn't confirmed or impactful (\"buy the rumor, sell the news\").")
        .token(Clown).delayed(),
    MarketEvent::new(17, MarketShift, "Stablecoin Depegs Slightly",
        "A major stablecoin briefly lost its peg, causing some market instability.",
        "Stablecoin depegs can cause widespread panic and negatively impact even unrelated assets due to loss of confidence.")
        .shifts(Sentiment::Bearish),
    MarketEvent::new(18, DaoDrama, "Dev Threatens to Fork",
        "Lead developer of GARBAGECOIN is threatening to fork the project after a community disagreement.",
        "Internal project conflicts and fork threats often negatively impact token price due to uncertainty and division.")
        .token(Garbage).risky(),
    MarketEvent::new(19, ScamOpportunity, "Telegram \"Signal Group\" Tip",
        "Got a \"guaranteed 5x\" signal from a private Telegram group. Requires buying a low-cap token immediately.",
        "Paid \"signal groups\" are often pump-and-dump schemes orchestrating exit liquidity for insiders.")
        .risky(),
    MarketEvent::new(20, News, "New Regulation Proposed",
        "Governments are discussing new regulations for DeFi. Market is reacting cautiously.",
        "Regulatory news can create long-term uncertainty or opportunity. The impact depends heavily on the specifics of the regulation.")
        .shifts(Sentiment::Neutral),
    MarketEvent::new(21, UtilityLaunch, "Project XYZ Launches Mainnet App",
        "After months of development, Project XYZ has launched its utility application on mainnet.",
        "Successful mainnet launches *can* drive price if the utility gains adoption, but often the hype is already priced in.")
        .token(Xyz),
    MarketEvent::new(22, Microcap, "New Microcap Gem? (100k Mcap)",
        "Found a token with a tiny market cap. Devs seem active on Telegram. Could this be the next 1000x?",
        "Extremely low market cap tokens are highly volatile and susceptible to manipulation or abandonment (\"rug pull\"). Risk is immense.")
        .gain("1000x?").risky(),
    MarketEvent::new(23, Exploit, "Flash Loan Exploit on DEX",
        "A DEX pool involving $SAFE was just exploited using a flash loan, manipulating the price temporarily.",
        "Flash loan exploits can cause extreme, temporary price volatility. Trading during such events is dangerous.")
        .token(Safe).shifts(Sentiment::Panic).risky(),
    MarketEvent::new(24, DaoDrama, "DAO Treasury Debate Heated",
        "Major disagreement in the GARBAGECOIN DAO over how to spend treasury funds. Contentious vote upcoming.",
        "Contentious DAO governance can signal instability and potentially lead to negative price action or forks.")
        .token(Garbage).risky(),
    MarketEvent::new(25, Rumor, "Token Unlock Approaching",
        "Large token unlock schedule for early investors of $CLOWN is coming next week.",
        "Large token unlocks often lead to selling pressure as early investors cash out, potentially decreasing the price.")
        .token(Clown).risky().delayed(),
    MarketEvent::new(26, Tweet, "Mysterious Dev Tweet",
        "Lead dev of $XYZ tweeted a cryptic message: \"Big things coming. Phase 2 imminent.\" Vague!",
        "Vague, hype-driven tweets without concrete details are often used to pump prices short-term. Be wary of \"announcements of announcements\".")
        .token(Xyz).risky(),
    MarketEvent::new(27, NftOpportunity, "NFT Project \"Migrates\" to V2",
        "The \"Sad Shibas\" NFT project announced a V2 migration. Holders need to burn V1 and mint V2. Some fees apply.",
        "V2 migrations can sometimes be legitimate upgrades, but are also used as tactics in slow rug pulls or cash grabs. Investigate the reasons and fees.")
        .risky(),
    MarketEvent::new(28, ScamOpportunity, "Airdrop Claim Requires Seed Phrase",
        "A website claims you're eligible for a huge $SAFE airdrop, but requires entering your seed phrase to verify.",
        "NEVER enter your seed phrase on any website. This is ALWAYS a scam to steal your funds.")
        .gain("Free Tokens!").risky(),
    MarketEvent::new(29, News, "Competitor Project Gains Traction",
        "A major competitor to Project CLOWNCHAIN seems to be gaining significant user adoption.",
        "Strong competition can negatively impact a project's market share and token price if they fail to innovate or retain users.")
        .token(Clown).risky(),
    MarketEvent::new(30, MarketShift, "Fear & Greed Index at \"Extreme Fear\"",
        "The Crypto Fear & Greed Index has dropped to \"Extreme Fear\" levels amidst market declines.",
        "\"Extreme Fear\" can indicate maximum pessimism, potentially signaling a market bottom (Contrarian Indicator). Buying here is risky but can be rewarding.")
        .shifts(Sentiment::Panic).risky().scripted(EventScript::ContrarianBuy),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_and_sequential() {
        let ids: HashSet<u32> = CATALOG.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), CATALOG.len());
        assert!((1..=30).all(|id| ids.contains(&id)));
    }

    #[test]
    fn scripted_entries_are_where_expected() {
        assert_eq!(by_id(3).and_then(|e| e.script), Some(EventScript::ForcedFailure));
        assert_eq!(by_id(8).and_then(|e| e.script), Some(EventScript::LatePump));
        assert_eq!(by_id(30).and_then(|e| e.sentiment), Some(Sentiment::Panic));
        assert!(by_id(31).is_none());
    }

    #[test]
    fn loss_and_upside_classes() {
        let microcap = by_id(22).unwrap();
        assert!(microcap.total_loss_on_failure() && microcap.volatile_upside());
        let audit = by_id(9).unwrap();
        assert!(!audit.total_loss_on_failure() && !audit.volatile_upside());
    }

    #[test]
    fn serializes_with_camel_case_kind() {
        let json = serde_json::to_string(by_id(12).unwrap()).unwrap();
        assert!(json.contains("\"nftOpportunity\""));
        assert!(json.contains("\"potentialGain\":\"10x?\""));
    }
}
