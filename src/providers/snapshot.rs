//! Snapshot hub governance votes.

use super::{read_json, GraphQlResponse, ProviderAdapter};
use crate::errors::ProviderError;
use crate::identifier::Identifier;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const VOTES_QUERY: &str =
    "query Votes($voter: String!) { votes(first: 50, where: { voter: $voter }) { id created } }";

#[derive(Debug, Deserialize)]
struct VotesData {
    #[serde(default)]
    votes: Option<Vec<SnapshotVote>>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct SnapshotVote {
    id: String,
    created: Option<i64>,
}

pub struct SnapshotAdapter {
    client: Client,
    graphql_url: String,
    timeout: Duration,
}

impl SnapshotAdapter {
    pub fn new(client: Client, graphql_url: String, timeout: Duration) -> Self {
        Self {
            client,
            graphql_url,
            timeout,
        }
    }
}

#[async_trait]
impl ProviderAdapter for SnapshotAdapter {
    /// Number of votes cast (at most 50).
    type Output = u64;

    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, id: &Identifier) -> Result<u64, ProviderError> {
        let voter = id.as_address().ok_or(ProviderError::NotApplicable)?;

        let body = json!({
            "query": VOTES_QUERY,
            "variables": { "voter": voter },
        });

        let response = self.client.post(&self.graphql_url).json(&body).send().await?;
        let envelope: GraphQlResponse<VotesData> = read_json(response).await?;
        let votes = envelope.into_data("snapshot")?.votes.unwrap_or_default();

        tracing::debug!("Snapshot: {} votes for {}", votes.len(), voter);
        Ok(votes.len() as u64)
    }
}
