//! Shapes the `{address, raw, tags}` payload, substituting the fallback
//! profile when aggregation produced nothing.

use crate::classifier::{classify, explorer};
use crate::errors::AggregationError;
use crate::identifier::Identifier;
use crate::models::{PersonaTag, RawProfile, RawProfileView, SoulProfile};

impl From<&RawProfile> for RawProfileView {
    fn from(profile: &RawProfile) -> Self {
        Self {
            social: profile.social.clone(),
            tx_count: profile.tx_count,
            nfts_count: profile.nfts.len(),
            vote_count: profile.vote_count,
            proposal_count: profile.proposal_count,
            account_age_days: profile.account_age_days,
            fallback: false,
        }
    }
}

pub fn assemble(profile: &RawProfile, tags: Vec<PersonaTag>) -> SoulProfile {
    SoulProfile {
        address: profile.address.clone(),
        raw: RawProfileView::from(profile),
        tags,
    }
}

/// The fully neutral profile, flagged `_fallback`, tagged `Explorer`.
pub fn fallback(address: Identifier) -> SoulProfile {
    let mut raw = RawProfileView::from(&RawProfile::neutral(address.clone()));
    raw.fallback = true;

    SoulProfile {
        address,
        raw,
        tags: vec![explorer()],
    }
}

/// Classifies a merged profile, or falls back on total aggregation failure.
pub fn build(address: Identifier, outcome: Result<RawProfile, AggregationError>) -> SoulProfile {
    match outcome {
        Ok(profile) => {
            let tags = classify(&profile);
            assemble(&profile, tags)
        }
        Err(e) => {
            tracing::error!(address = %address, error = %e, "Aggregation failed, serving fallback profile");
            fallback(address)
        }
    }
}
