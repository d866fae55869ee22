#![allow(dead_code)]

use soul_identity_api::config::{Config, ProviderTimeouts};
use std::time::Duration;

pub const ADDRESS: &str = "0xabc0000000000000000000000000000000000001";

/// Config with every provider pointed at the mock server.
pub fn test_config(base: &str) -> Config {
    Config {
        port: 0,
        client_url: None,
        web3_bio_base_url: format!("{}/profile", base),
        web3_bio_api_key: None,
        snapshot_graphql_url: format!("{}/graphql", base),
        alchemy_base_url: format!("{}/v2", base),
        alchemy_api_key: Some("test-key".to_string()),
        tally_api_url: format!("{}/query", base),
        tally_api_key: Some("tally-key".to_string()),
        timeouts: ProviderTimeouts {
            social: Duration::from_secs(2),
            votes: Duration::from_secs(2),
            chain: Duration::from_secs(3),
            proposals: Duration::from_secs(2),
        },
    }
}
