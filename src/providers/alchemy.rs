//! Alchemy JSON-RPC: transaction count, NFT holdings, outbound transfers and
//! account age. Requires `ALCHEMY_API_KEY`.
//!
//! The three primary sub-calls run concurrently and each one degrades only the
//! field it feeds. The adapter fails as a whole only when all three fail.

use super::{read_json, ProviderAdapter};
use crate::errors::ProviderError;
use crate::identifier::Identifier;
use crate::models::{ChainActivity, NftHolding};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

const TX_COUNT_TIMEOUT: Duration = Duration::from_secs(6);
const NFTS_TIMEOUT: Duration = Duration::from_secs(8);
const TRANSFERS_TIMEOUT: Duration = Duration::from_secs(8);
const BLOCK_TIMEOUT: Duration = Duration::from_secs(5);

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnedNfts {
    #[serde(default)]
    owned_nfts: Vec<AlchemyNft>,
}

#[derive(Debug, Deserialize)]
struct AlchemyNft {
    contract: Option<AlchemyContract>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlchemyContract {
    address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetTransfers {
    #[serde(default)]
    transfers: Vec<AssetTransfer>,
}

#[derive(Debug, Deserialize)]
struct AssetTransfer {
    #[serde(rename = "blockNum")]
    block_num: Option<String>,
    #[serde(default)]
    to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Block {
    timestamp: Option<String>,
}

/// Parses an Ethereum hex quantity such as `"0x1a"`.
pub fn parse_hex_quantity(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))?;
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

/// Whole days between a block timestamp and `now`, floored.
pub fn age_in_days(now_secs: i64, block_secs: i64) -> i64 {
    (now_secs - block_secs).div_euclid(SECONDS_PER_DAY)
}

pub struct AlchemyAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl AlchemyAdapter {
    pub fn new(client: Client, base_url: String, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            api_key,
            timeout,
        }
    }

    async fn rpc<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        id: u32,
        method: &str,
        params: Value,
        timeout: Duration,
    ) -> Result<T, ProviderError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(endpoint)
            .timeout(timeout)
            .json(&body)
            .send()
            .await?;
        let rpc: RpcResponse<T> = read_json(response).await?;

        if let Some(err) = rpc.error {
            return Err(ProviderError::Parse(format!(
                "{} failed ({}): {}",
                method, err.code, err.message
            )));
        }
        rpc.result
            .ok_or_else(|| ProviderError::Parse(format!("{} returned no result", method)))
    }

    /// Age of the account from the timestamp of its earliest outbound transfer.
    async fn account_age_days(&self, endpoint: &str, block: u64) -> Option<i64> {
        let block_hex = format!("{:#x}", block);
        let result = self
            .rpc::<Block>(
                endpoint,
                4,
                "eth_getBlockByNumber",
                json!([block_hex, false]),
                BLOCK_TIMEOUT,
            )
            .await;

        match result {
            Ok(block) => {
                let ts = block.timestamp.as_deref().and_then(parse_hex_quantity)?;
                let ts = i64::try_from(ts).ok()?;
                Some(age_in_days(Utc::now().timestamp(), ts))
            }
            Err(e) => {
                warn!(provider = "alchemy", error = %e, "Block lookup failed, account age unknown");
                None
            }
        }
    }
}

fn earliest_block(transfers: &[AssetTransfer]) -> Option<u64> {
    transfers
        .iter()
        .filter_map(|t| t.block_num.as_deref().and_then(parse_hex_quantity))
        .filter(|block| *block > 0)
        .min()
}

fn is_contract_creation(transfer: &AssetTransfer) -> bool {
    transfer.to.as_deref().map_or(true, |to| to.trim().is_empty())
}

#[async_trait]
impl ProviderAdapter for AlchemyAdapter {
    type Output = ChainActivity;

    fn name(&self) -> &'static str {
        "alchemy"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, id: &Identifier) -> Result<ChainActivity, ProviderError> {
        let address = id.as_address().ok_or(ProviderError::NotApplicable)?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential)?;
        let endpoint = format!("{}/{}", self.base_url.trim_end_matches('/'), api_key);

        let (tx_count, nfts, transfers) = tokio::join!(
            self.rpc::<String>(
                &endpoint,
                1,
                "eth_getTransactionCount",
                json!([address, "latest"]),
                TX_COUNT_TIMEOUT,
            ),
            self.rpc::<OwnedNfts>(
                &endpoint,
                2,
                "alchemy_getNFTs",
                json!([{ "owner": address, "pageSize": 50 }]),
                NFTS_TIMEOUT,
            ),
            self.rpc::<AssetTransfers>(
                &endpoint,
                3,
                "alchemy_getAssetTransfers",
                json!([{
                    "fromAddress": address,
                    "category": ["external"],
                    "maxCount": "0x64",
                }]),
                TRANSFERS_TIMEOUT,
            ),
        );

        let (tx_count, nfts, transfers) = match (tx_count, nfts, transfers) {
            (Err(e), Err(_), Err(_)) => return Err(e),
            all => all,
        };

        let mut activity = ChainActivity::default();

        match tx_count {
            Ok(hex) => activity.tx_count = parse_hex_quantity(&hex).unwrap_or(0),
            Err(e) => warn!(provider = "alchemy", error = %e, "Transaction count unavailable"),
        }

        match nfts {
            Ok(owned) => {
                activity.nfts = owned
                    .owned_nfts
                    .into_iter()
                    .map(|nft| NftHolding {
                        contract_address: nft.contract.and_then(|c| c.address),
                        title: nft.title,
                    })
                    .collect();
            }
            Err(e) => warn!(provider = "alchemy", error = %e, "NFT holdings unavailable"),
        }

        match transfers {
            Ok(AssetTransfers { transfers }) => {
                activity.is_deployer = transfers.iter().any(is_contract_creation);
                if let Some(block) = earliest_block(&transfers) {
                    activity.account_age_days = self.account_age_days(&endpoint, block).await;
                }
            }
            Err(e) => warn!(provider = "alchemy", error = %e, "Asset transfers unavailable"),
        }

        debug!(
            "Alchemy: {} txs, {} NFTs, deployer={} for {}",
            activity.tx_count,
            activity.nfts.len(),
            activity.is_deployer,
            address
        );
        Ok(activity)
    }
}
