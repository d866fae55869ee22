//! Merges the four provider results into one canonical `RawProfile`.
//!
//! Merging is by named field, so the result does not depend on which provider
//! answered first. Pure; no I/O.

use crate::identifier::Identifier;
use crate::models::{RawProfile, SocialProfile};
use crate::orchestrator::ProviderResults;
use crate::providers::web3bio::Web3BioEntry;
use crate::providers::SocialPayload;

impl From<Web3BioEntry> for SocialProfile {
    fn from(entry: Web3BioEntry) -> Self {
        let follower_count = entry.resolved_followers();
        let following_count = entry
            .social
            .as_ref()
            .and_then(|s| s.following)
            .unwrap_or(0);

        Self {
            platform: entry.platform.unwrap_or_default(),
            identity: entry.identity,
            display_name: entry.display_name,
            avatar: entry.avatar,
            description: entry.description,
            follower_count,
            following_count,
        }
    }
}

/// Flattens any of the social payload shapes into an ordered list, dropping
/// null and empty entries.
pub fn normalize_social(payload: SocialPayload) -> Vec<SocialProfile> {
    let entries = match payload {
        SocialPayload::List(list) | SocialPayload::Wrapped { list } => list,
        SocialPayload::Single(entry) => vec![Some(entry)],
    };

    entries
        .into_iter()
        .flatten()
        .filter(|entry| !entry.is_empty())
        .map(SocialProfile::from)
        .collect()
}

/// Builds the canonical profile. Failed providers contribute their defaults.
pub fn merge(address: Identifier, results: ProviderResults) -> RawProfile {
    let chain = results.chain.into_value();

    RawProfile {
        address,
        social: normalize_social(results.social.into_value()),
        tx_count: chain.tx_count,
        nfts: chain.nfts,
        vote_count: results.votes.into_value(),
        proposal_count: results.proposals.into_value(),
        account_age_days: chain.account_age_days,
        is_deployer: chain.is_deployer,
        has_airdrop_nft: chain.has_airdrop_nft,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use crate::models::{ChainActivity, NftHolding};
    use crate::providers::web3bio::Web3BioSocialStats;
    use crate::providers::ProviderResult;

    fn entry(platform: &str, followers: u64) -> Web3BioEntry {
        Web3BioEntry {
            platform: Some(platform.to_string()),
            social: Some(Web3BioSocialStats {
                follower: Some(followers),
                following: Some(1),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_all_shapes_flatten_identically() {
        let list = vec![Some(entry("farcaster", 10)), None, Some(entry("lens", 20))];
        let from_list = normalize_social(SocialPayload::List(list.clone()));
        let from_wrapped = normalize_social(SocialPayload::Wrapped { list });

        assert_eq!(from_list, from_wrapped);
        assert_eq!(from_list.len(), 2);
        assert_eq!(from_list[0].platform, "farcaster");
        assert_eq!(from_list[1].platform, "lens");
        assert_eq!(from_list[1].follower_count, 20);
    }

    #[test]
    fn test_single_object_becomes_one_entry() {
        let social = normalize_social(SocialPayload::Single(entry("ens", 0)));
        assert_eq!(social.len(), 1);
        assert_eq!(social[0].platform, "ens");
    }

    #[test]
    fn test_empty_entries_dropped() {
        let list = vec![Some(Web3BioEntry::default()), None];
        assert!(normalize_social(SocialPayload::List(list)).is_empty());
        assert!(normalize_social(SocialPayload::Single(Web3BioEntry::default())).is_empty());
    }

    #[test]
    fn test_merge_copies_fields_and_defaults_failures() {
        let address = Identifier::parse("0xABC").unwrap();
        let results = ProviderResults {
            social: ProviderResult::Failed(ProviderError::Status(502)),
            votes: ProviderResult::Fetched(7),
            chain: ProviderResult::Fetched(ChainActivity {
                tx_count: 12,
                nfts: vec![NftHolding {
                    contract_address: Some("0x1".to_string()),
                    title: None,
                }],
                is_deployer: true,
                account_age_days: Some(3),
                has_airdrop_nft: false,
            }),
            proposals: ProviderResult::Failed(ProviderError::MissingCredential),
        };

        let profile = merge(address.clone(), results);
        assert_eq!(profile.address, address);
        assert!(profile.social.is_empty());
        assert_eq!(profile.vote_count, 7);
        assert_eq!(profile.tx_count, 12);
        assert_eq!(profile.nfts.len(), 1);
        assert!(profile.is_deployer);
        assert_eq!(profile.account_age_days, Some(3));
        assert_eq!(profile.proposal_count, 0);
    }
}
