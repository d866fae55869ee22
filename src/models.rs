use crate::identifier::Identifier;
use serde::Serialize;
use utoipa::ToSchema;

// ============ Canonical Profile ============

/// One social-platform identity (Farcaster, Lens, ENS, ...), flattened from
/// the social identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialProfile {
    /// Platform key as reported upstream (e.g. "farcaster", "lens", "ens").
    pub platform: String,
    /// Platform-specific handle.
    pub identity: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Avatar URL.
    pub avatar: Option<String>,
    /// Profile bio.
    pub description: Option<String>,
    /// Follower count resolved from the first alias the provider filled in.
    pub follower_count: u64,
    /// Following count.
    pub following_count: u64,
}

/// An NFT held by the profiled address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NftHolding {
    /// Contract address as returned upstream (case not normalized).
    pub contract_address: Option<String>,
    /// Token title.
    pub title: Option<String>,
}

/// On-chain activity summary produced by the chain activity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainActivity {
    pub tx_count: u64,
    pub nfts: Vec<NftHolding>,
    pub is_deployer: bool,
    /// `None` means unknown, never guessed.
    pub account_age_days: Option<i64>,
    pub has_airdrop_nft: bool,
}

/// The canonical merged identity record. Every field carries a defined
/// default; only `account_age_days` models "unknown".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProfile {
    pub address: Identifier,
    pub social: Vec<SocialProfile>,
    pub tx_count: u64,
    pub nfts: Vec<NftHolding>,
    pub vote_count: u64,
    pub proposal_count: u64,
    pub account_age_days: Option<i64>,
    pub is_deployer: bool,
    pub has_airdrop_nft: bool,
}

impl RawProfile {
    /// A profile with every field at its neutral default.
    pub fn neutral(address: Identifier) -> Self {
        Self {
            address,
            social: Vec::new(),
            tx_count: 0,
            nfts: Vec::new(),
            vote_count: 0,
            proposal_count: 0,
            account_age_days: None,
            is_deployer: false,
            has_airdrop_nft: false,
        }
    }
}

// ============ Classification ============

/// Display color of a persona tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Gold,
    Silver,
    Emerald,
    Purple,
    Blue,
    Cyan,
    Orange,
    Green,
    Gray,
}

/// A human-readable persona label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PersonaTag {
    pub label: String,
    pub color: TagColor,
    /// Position of the producing rule in the rule matrix. Ordering only.
    #[serde(skip)]
    pub rank: u8,
}

impl PersonaTag {
    pub fn new(label: &str, color: TagColor, rank: u8) -> Self {
        Self {
            label: label.to_string(),
            color,
            rank,
        }
    }
}

// ============ HTTP Response ============

/// Projection of `RawProfile` exposed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawProfileView {
    pub social: Vec<SocialProfile>,
    pub tx_count: u64,
    pub nfts_count: usize,
    pub vote_count: u64,
    pub proposal_count: u64,
    pub account_age_days: Option<i64>,
    /// Present (and `true`) only on the fully degraded fallback profile.
    #[serde(rename = "_fallback", skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

/// Payload of `GET /api/soul/{address}`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SoulProfile {
    #[schema(value_type = String)]
    pub address: Identifier,
    pub raw: RawProfileView,
    pub tags: Vec<PersonaTag>,
}

/// Success envelope.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SoulEnvelope {
    pub success: bool,
    pub data: SoulProfile,
}

impl SoulEnvelope {
    pub fn ok(data: SoulProfile) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Error envelope.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

/// Health check payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}
