//! Soul classification: a fixed, ordered rule matrix over `RawProfile`.
//!
//! Rules are independent; every rule whose predicate holds contributes its
//! tag, in matrix order. A profile matching nothing is an `Explorer`.

use crate::models::{PersonaTag, RawProfile, TagColor};

/// Blue-chip NFT contracts (lower-case). BAYC, MAYC, Azuki.
pub const BLUE_CHIP_CONTRACTS: [&str; 3] = [
    "0xbc4ca0eda7647a8ab7c2061c2e118a18a936f13d",
    "0x60e4d786628fea6478f785a6d7e704777c86a7c6",
    "0xed5af388653567af2f388e6224dc7c4b3241c544",
];

const ACTIVE_VOTER_MIN_VOTES: u64 = 5;
const DEGEN_MIN_TXS: u64 = 500;
const SOCIAL_STAR_MIN_FOLLOWERS: u64 = 500;
const NEWBIE_MAX_AGE_DAYS: i64 = 30;
const NEWBIE_MAX_TXS: u64 = 50;

struct Rule {
    rank: u8,
    label: &'static str,
    color: TagColor,
    applies: fn(&RawProfile) -> bool,
}

static RULES: [Rule; 8] = [
    Rule {
        rank: 1,
        label: "DAO Governor",
        color: TagColor::Gold,
        applies: |p| p.proposal_count > 0,
    },
    Rule {
        rank: 2,
        label: "Active Voter",
        color: TagColor::Silver,
        applies: |p| p.vote_count > ACTIVE_VOTER_MIN_VOTES,
    },
    Rule {
        rank: 3,
        label: "Buidler",
        color: TagColor::Emerald,
        applies: |p| p.is_deployer,
    },
    Rule {
        rank: 4,
        label: "Degen",
        color: TagColor::Purple,
        applies: |p| p.tx_count > DEGEN_MIN_TXS,
    },
    Rule {
        rank: 5,
        label: "Whale",
        color: TagColor::Blue,
        applies: holds_blue_chip,
    },
    Rule {
        rank: 6,
        label: "Alpha Hunter",
        color: TagColor::Cyan,
        applies: |p| p.has_airdrop_nft,
    },
    Rule {
        rank: 7,
        label: "Social Star",
        color: TagColor::Orange,
        applies: |p| social_follower_count(p) > SOCIAL_STAR_MIN_FOLLOWERS,
    },
    Rule {
        rank: 8,
        label: "Newbie",
        color: TagColor::Green,
        applies: |p| {
            matches!(p.account_age_days, Some(days) if days < NEWBIE_MAX_AGE_DAYS)
                && p.tx_count < NEWBIE_MAX_TXS
        },
    },
];

const EXPLORER_RANK: u8 = 9;

/// The default persona when no rule fires.
pub fn explorer() -> PersonaTag {
    PersonaTag::new("Explorer", TagColor::Gray, EXPLORER_RANK)
}

/// Whether `contract` is on the blue-chip allow-list (case-insensitive).
pub fn is_blue_chip(contract: &str) -> bool {
    let contract = contract.trim();
    BLUE_CHIP_CONTRACTS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(contract))
}

fn holds_blue_chip(profile: &RawProfile) -> bool {
    profile
        .nfts
        .iter()
        .filter_map(|nft| nft.contract_address.as_deref())
        .any(is_blue_chip)
}

/// Farcaster followers, or Lens followers when Farcaster has none.
pub fn social_follower_count(profile: &RawProfile) -> u64 {
    let followers_on = |platform: &str| {
        profile
            .social
            .iter()
            .find(|p| p.platform.eq_ignore_ascii_case(platform))
            .map_or(0, |p| p.follower_count)
    };

    match followers_on("farcaster") {
        0 => followers_on("lens"),
        n => n,
    }
}

/// Evaluates the rule matrix. Never returns an empty list; the first tag is
/// the primary persona.
pub fn classify(profile: &RawProfile) -> Vec<PersonaTag> {
    let tags: Vec<PersonaTag> = RULES
        .iter()
        .filter(|rule| (rule.applies)(profile))
        .map(|rule| PersonaTag::new(rule.label, rule.color, rule.rank))
        .collect();

    if tags.is_empty() {
        vec![explorer()]
    } else {
        tags
    }
}
