//! External identity data providers.
//!
//! Each provider sits behind a [`ProviderAdapter`]. Adapters report failures as
//! [`ProviderError`]; [`run_adapter`] bounds them in time, observes request
//! cancellation, logs the failure and hands back a [`ProviderResult`]. Nothing
//! past this module ever sees an error from an upstream.
//!
//! # Providers
//! 1. **web3bio** - social identities (ENS, Farcaster, Lens, ...)
//! 2. **snapshot** - governance votes
//! 3. **alchemy** - transaction count, NFTs, deployments, account age
//! 4. **tally** - governance proposals created

pub mod alchemy;
pub mod snapshot;
pub mod tally;
pub mod web3bio;

use crate::errors::ProviderError;
use crate::identifier::Identifier;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use alchemy::AlchemyAdapter;
pub use snapshot::SnapshotAdapter;
pub use tally::TallyAdapter;
pub use web3bio::{SocialPayload, Web3BioAdapter};

/// Uniform contract for one external data source.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider-shaped payload. `Default` is the degraded value.
    type Output: Default + Send + 'static;

    fn name(&self) -> &'static str;

    /// Fixed time budget for one call, independent of other adapters.
    fn timeout(&self) -> Duration;

    async fn fetch(&self, id: &Identifier) -> Result<Self::Output, ProviderError>;
}

/// Outcome of one adapter call.
#[derive(Debug)]
pub enum ProviderResult<T> {
    Fetched(T),
    Failed(ProviderError),
}

impl<T: Default> ProviderResult<T> {
    pub fn is_fetched(&self) -> bool {
        matches!(self, ProviderResult::Fetched(_))
    }

    /// The payload, or the provider's neutral default on failure.
    pub fn into_value(self) -> T {
        match self {
            ProviderResult::Fetched(value) => value,
            ProviderResult::Failed(_) => T::default(),
        }
    }
}

/// Runs one adapter within its timeout, racing the request's cancellation.
pub async fn run_adapter<A>(
    adapter: Arc<A>,
    id: Identifier,
    cancel: CancellationToken,
) -> ProviderResult<A::Output>
where
    A: ProviderAdapter + ?Sized,
{
    let provider = adapter.name();
    let budget = adapter.timeout();

    let outcome = tokio::select! {
        _ = cancel.cancelled() => Err(ProviderError::Cancelled),
        res = tokio::time::timeout(budget, adapter.fetch(&id)) => {
            res.unwrap_or(Err(ProviderError::Timeout(budget)))
        }
    };

    match outcome {
        Ok(value) => {
            debug!(provider, address = %id, "Provider answered");
            ProviderResult::Fetched(value)
        }
        Err(e @ (ProviderError::NotApplicable | ProviderError::Cancelled)) => {
            debug!(provider, address = %id, reason = %e, "Provider skipped");
            ProviderResult::Failed(e)
        }
        Err(e) => {
            warn!(provider, address = %id, error = %e, "Provider failed, using default");
            ProviderResult::Failed(e)
        }
    }
}

/// GraphQL response wrapper shared by the Snapshot and Tally adapters.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    pub fn into_data(self, provider: &str) -> Result<T, ProviderError> {
        match self.data {
            Some(data) => Ok(data),
            None => {
                let reason = self
                    .errors
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "missing data".to_string());
                Err(ProviderError::Parse(format!("{}: {}", provider, reason)))
            }
        }
    }
}

/// Checks the status and decodes the body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Accepts counts sent as numbers, numeric strings or null.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value))
}

fn count_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct SlowAdapter;

    #[async_trait]
    impl ProviderAdapter for SlowAdapter {
        type Output = u64;

        fn name(&self) -> &'static str {
            "slow"
        }

        fn timeout(&self) -> Duration {
            Duration::from_millis(50)
        }

        async fn fetch(&self, _id: &Identifier) -> Result<u64, ProviderError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(42)
        }
    }

    struct FixedAdapter(Result<u64, fn() -> ProviderError>);

    #[async_trait]
    impl ProviderAdapter for FixedAdapter {
        type Output = u64;

        fn name(&self) -> &'static str {
            "fixed"
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(1)
        }

        async fn fetch(&self, _id: &Identifier) -> Result<u64, ProviderError> {
            self.0.map_err(|make| make())
        }
    }

    fn address() -> Identifier {
        Identifier::parse("0xabc").unwrap()
    }

    #[tokio::test]
    async fn test_timeout_degrades_to_default() {
        let result = run_adapter(Arc::new(SlowAdapter), address(), CancellationToken::new()).await;
        assert!(matches!(result, ProviderResult::Failed(ProviderError::Timeout(_))));
        assert_eq!(result.into_value(), 0);
    }

    #[tokio::test]
    async fn test_cancellation_stops_adapter() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = run_adapter(Arc::new(SlowAdapter), address(), cancel).await;
        assert!(matches!(result, ProviderResult::Failed(ProviderError::Cancelled)));
    }

    #[tokio::test]
    async fn test_success_is_fetched() {
        let result = run_adapter(
            Arc::new(FixedAdapter(Ok(7))),
            address(),
            CancellationToken::new(),
        )
        .await;
        assert!(result.is_fetched());
        assert_eq!(result.into_value(), 7);
    }

    #[tokio::test]
    async fn test_error_is_absorbed() {
        let result = run_adapter(
            Arc::new(FixedAdapter(Err(|| ProviderError::Status(500)))),
            address(),
            CancellationToken::new(),
        )
        .await;
        assert!(!result.is_fetched());
        assert_eq!(result.into_value(), 0);
    }

    #[test]
    fn test_count_from_value_variants() {
        assert_eq!(count_from_value(&json!(12)), Some(12));
        assert_eq!(count_from_value(&json!("640")), Some(640));
        assert_eq!(count_from_value(&json!(3.9)), Some(3));
        assert_eq!(count_from_value(&json!("n/a")), None);
        assert_eq!(count_from_value(&json!(-1)), None);
        assert_eq!(count_from_value(&Value::Null), None);
    }
}
