//! Tally governance proposal registry. Requires `TALLY_API_KEY`.

use super::{lenient_count, read_json, GraphQlResponse, ProviderAdapter};
use crate::errors::ProviderError;
use crate::identifier::Identifier;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const PROPOSALS_QUERY: &str = "query Accounts($addresses: [Address!]!) { accounts(addresses: $addresses) { proposalsCreatedCount } }";

#[derive(Debug, Deserialize)]
struct AccountsData {
    #[serde(default)]
    accounts: Option<Vec<TallyAccount>>,
}

#[derive(Debug, Deserialize)]
struct TallyAccount {
    #[serde(
        rename = "proposalsCreatedCount",
        default,
        deserialize_with = "lenient_count"
    )]
    proposals_created_count: Option<u64>,
}

pub struct TallyAdapter {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl TallyAdapter {
    pub fn new(client: Client, api_url: String, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client,
            api_url,
            api_key,
            timeout,
        }
    }
}

#[async_trait]
impl ProviderAdapter for TallyAdapter {
    /// Proposals created by the address.
    type Output = u64;

    fn name(&self) -> &'static str {
        "tally"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, id: &Identifier) -> Result<u64, ProviderError> {
        let address = id.as_address().ok_or(ProviderError::NotApplicable)?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential)?;

        let body = json!({
            "query": PROPOSALS_QUERY,
            "variables": { "addresses": [address] },
        });

        let response = self
            .client
            .post(&self.api_url)
            .header("Api-Key", api_key)
            .json(&body)
            .send()
            .await?;
        let envelope: GraphQlResponse<AccountsData> = read_json(response).await?;

        let count = envelope
            .into_data("tally")?
            .accounts
            .unwrap_or_default()
            .first()
            .and_then(|account| account.proposals_created_count)
            .unwrap_or(0);

        tracing::debug!("Tally: {} proposals created by {}", count, address);
        Ok(count)
    }
}
