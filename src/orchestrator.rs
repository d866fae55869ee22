//! Concurrent fan-out to all providers for one request.
//!
//! Each adapter runs as its own task under a request-scoped cancellation
//! token. The orchestrator waits for all four to settle; since every task is
//! bounded by its own timeout, the whole call is bounded by the slowest one.

use crate::config::Config;
use crate::errors::{AggregationError, AppError};
use crate::identifier::Identifier;
use crate::models::{ChainActivity, RawProfile};
use crate::profile;
use crate::providers::{
    run_adapter, AlchemyAdapter, ProviderAdapter, ProviderResult, SnapshotAdapter,
    SocialPayload, TallyAdapter, Web3BioAdapter,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

pub type SocialProvider = Arc<dyn ProviderAdapter<Output = SocialPayload>>;
pub type VoteProvider = Arc<dyn ProviderAdapter<Output = u64>>;
pub type ChainProvider = Arc<dyn ProviderAdapter<Output = ChainActivity>>;
pub type ProposalProvider = Arc<dyn ProviderAdapter<Output = u64>>;

/// Unmerged results of one fan-out.
#[derive(Debug)]
pub struct ProviderResults {
    pub social: ProviderResult<SocialPayload>,
    pub votes: ProviderResult<u64>,
    pub chain: ProviderResult<ChainActivity>,
    pub proposals: ProviderResult<u64>,
}

impl ProviderResults {
    /// Number of providers that answered.
    pub fn fetched_count(&self) -> usize {
        [
            self.social.is_fetched(),
            self.votes.is_fetched(),
            self.chain.is_fetched(),
            self.proposals.is_fetched(),
        ]
        .into_iter()
        .filter(|fetched| *fetched)
        .count()
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    social: SocialProvider,
    votes: VoteProvider,
    chain: ChainProvider,
    proposals: ProposalProvider,
}

impl Orchestrator {
    pub fn new(
        social: SocialProvider,
        votes: VoteProvider,
        chain: ChainProvider,
        proposals: ProposalProvider,
    ) -> Self {
        Self {
            social,
            votes,
            chain,
            proposals,
        }
    }

    /// Wires the four production adapters from configuration.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("soul-identity-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        let timeouts = config.timeouts;

        Ok(Self::new(
            Arc::new(Web3BioAdapter::new(
                client.clone(),
                config.web3_bio_base_url.clone(),
                config.web3_bio_api_key.clone(),
                timeouts.social,
            )),
            Arc::new(SnapshotAdapter::new(
                client.clone(),
                config.snapshot_graphql_url.clone(),
                timeouts.votes,
            )),
            Arc::new(AlchemyAdapter::new(
                client.clone(),
                config.alchemy_base_url.clone(),
                config.alchemy_api_key.clone(),
                timeouts.chain,
            )),
            Arc::new(TallyAdapter::new(
                client,
                config.tally_api_url.clone(),
                config.tally_api_key.clone(),
                timeouts.proposals,
            )),
        ))
    }

    /// Fans out to all providers and waits for every one to settle.
    ///
    /// Cancelling `cancel`, or dropping the returned future, stops all
    /// in-flight adapter tasks.
    pub async fn gather(
        &self,
        id: &Identifier,
        cancel: &CancellationToken,
    ) -> Result<ProviderResults, AggregationError> {
        let scope = cancel.child_token();
        let _scope_guard = scope.clone().drop_guard();

        let social = tokio::spawn(run_adapter(
            Arc::clone(&self.social),
            id.clone(),
            scope.clone(),
        ));
        let votes = tokio::spawn(run_adapter(
            Arc::clone(&self.votes),
            id.clone(),
            scope.clone(),
        ));
        let chain = tokio::spawn(run_adapter(
            Arc::clone(&self.chain),
            id.clone(),
            scope.clone(),
        ));
        let proposals = tokio::spawn(run_adapter(
            Arc::clone(&self.proposals),
            id.clone(),
            scope.clone(),
        ));

        let (social, votes, chain, proposals) = tokio::join!(social, votes, chain, proposals);

        let results = ProviderResults {
            social: settled("web3bio", social)?,
            votes: settled("snapshot", votes)?,
            chain: settled("alchemy", chain)?,
            proposals: settled("tally", proposals)?,
        };

        let fetched = results.fetched_count();
        tracing::info!(address = %id, fetched, "Provider fan-out settled");

        if fetched == 0 {
            return Err(AggregationError::AllProvidersFailed);
        }
        Ok(results)
    }

    /// Gathers and merges into the canonical profile.
    pub async fn profile(
        &self,
        id: &Identifier,
        cancel: &CancellationToken,
    ) -> Result<RawProfile, AggregationError> {
        let results = self.gather(id, cancel).await?;
        Ok(profile::merge(id.clone(), results))
    }
}

fn settled<T>(
    provider: &str,
    joined: Result<ProviderResult<T>, JoinError>,
) -> Result<ProviderResult<T>, AggregationError> {
    joined.map_err(|e| AggregationError::TaskAborted(format!("{}: {}", provider, e)))
}
