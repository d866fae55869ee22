//! Web3.bio social identity aggregation (ENS / Farcaster / Lens / Basenames ...).
//!
//! Accepts both addresses and names; the API key is optional.

use super::{lenient_count, read_json, ProviderAdapter};
use crate::errors::ProviderError;
use crate::identifier::Identifier;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Follower statistics nested under `social`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Web3BioSocialStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub follower: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub following: Option<u64>,
}

/// One platform entry as returned by Web3.bio.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Web3BioEntry {
    pub platform: Option<String>,
    pub identity: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub description: Option<String>,
    pub social: Option<Web3BioSocialStats>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub follower_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub followers: Option<u64>,
}

impl Web3BioEntry {
    /// An entry with nothing that identifies a platform account.
    pub fn is_empty(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        blank(&self.platform) && blank(&self.identity) && blank(&self.display_name)
    }

    /// Follower count from the first alias the provider filled in.
    pub fn resolved_followers(&self) -> u64 {
        self.social
            .as_ref()
            .and_then(|s| s.follower)
            .or(self.follower_count)
            .or(self.followers)
            .unwrap_or(0)
    }
}

/// The three shapes Web3.bio has been seen to answer with.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SocialPayload {
    List(#[serde(deserialize_with = "lenient_entries")] Vec<Option<Web3BioEntry>>),
    Wrapped {
        #[serde(deserialize_with = "lenient_entries")]
        list: Vec<Option<Web3BioEntry>>,
    },
    Single(Web3BioEntry),
}

/// Decodes list entries one by one; a malformed entry becomes `None` instead
/// of failing the whole list.
fn lenient_entries<'de, D>(deserializer: D) -> Result<Vec<Option<Web3BioEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|value| {
            if value.is_null() {
                return None;
            }
            match serde_json::from_value::<Web3BioEntry>(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("Web3.bio: skipping malformed entry: {}", e);
                    None
                }
            }
        })
        .collect())
}

impl Default for SocialPayload {
    fn default() -> Self {
        SocialPayload::List(Vec::new())
    }
}

pub struct Web3BioAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl Web3BioAdapter {
    pub fn new(client: Client, base_url: String, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            api_key,
            timeout,
        }
    }

    fn profile_url(&self, id: &Identifier) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::Parse(format!("invalid Web3.bio base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Parse("Web3.bio base URL cannot take a path".to_string()))?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }
}

#[async_trait]
impl ProviderAdapter for Web3BioAdapter {
    type Output = SocialPayload;

    fn name(&self) -> &'static str {
        "web3bio"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, id: &Identifier) -> Result<SocialPayload, ProviderError> {
        let url = self.profile_url(id)?;
        tracing::debug!("Web3.bio: fetching profile for {}", id);

        let mut request = self.client.get(url);
        if let Some(ref key) = self.api_key {
            request = request.header("X-API-KEY", format!("Bearer {}", key));
        }

        let response = request.send().await?;
        let payload: Option<SocialPayload> = read_json(response).await?;
        Ok(payload.unwrap_or_default())
    }
}
