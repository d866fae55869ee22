use std::time::Duration;

pub const DEFAULT_WEB3_BIO_BASE_URL: &str = "https://api.web3.bio/profile";
pub const DEFAULT_SNAPSHOT_GRAPHQL_URL: &str = "https://hub.snapshot.org/graphql";
pub const DEFAULT_ALCHEMY_BASE_URL: &str = "https://eth-mainnet.g.alchemy.com/v2";
pub const DEFAULT_TALLY_API_URL: &str = "https://api.tally.xyz/query";

/// Per-adapter time budgets. Each adapter is bounded independently.
#[derive(Debug, Clone, Copy)]
pub struct ProviderTimeouts {
    pub social: Duration,
    pub votes: Duration,
    pub chain: Duration,
    pub proposals: Duration,
}

impl Default for ProviderTimeouts {
    fn default() -> Self {
        Self {
            social: Duration::from_secs(10),
            votes: Duration::from_secs(8),
            chain: Duration::from_secs(15),
            proposals: Duration::from_secs(8),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub client_url: Option<String>, // CORS origin; permissive when unset
    pub web3_bio_base_url: String,
    pub web3_bio_api_key: Option<String>,
    pub snapshot_graphql_url: String,
    pub alchemy_base_url: String,
    pub alchemy_api_key: Option<String>,
    pub tally_api_url: String,
    pub tally_api_key: Option<String>,
    pub timeouts: ProviderTimeouts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5001,
            client_url: None,
            web3_bio_base_url: DEFAULT_WEB3_BIO_BASE_URL.to_string(),
            web3_bio_api_key: None,
            snapshot_graphql_url: DEFAULT_SNAPSHOT_GRAPHQL_URL.to_string(),
            alchemy_base_url: DEFAULT_ALCHEMY_BASE_URL.to_string(),
            alchemy_api_key: None,
            tally_api_url: DEFAULT_TALLY_API_URL.to_string(),
            tally_api_key: None,
            timeouts: ProviderTimeouts::default(),
        }
    }
}

/// Reads an optional secret; blank values count as absent.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn http_url_var(name: &str, default: &str) -> anyhow::Result<String> {
    let url = optional_var(name).unwrap_or_else(|| default.to_string());
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", name);
    }
    url::Url::parse(&url).map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", name, e))?;
    Ok(url.trim_end_matches('/').to_string())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            client_url: optional_var("CLIENT_URL"),
            web3_bio_base_url: http_url_var("WEB3_BIO_BASE_URL", DEFAULT_WEB3_BIO_BASE_URL)?,
            web3_bio_api_key: optional_var("WEB3_BIO_API_KEY"),
            snapshot_graphql_url: http_url_var("SNAPSHOT_GRAPHQL_URL", DEFAULT_SNAPSHOT_GRAPHQL_URL)?,
            alchemy_base_url: http_url_var("ALCHEMY_BASE_URL", DEFAULT_ALCHEMY_BASE_URL)?,
            alchemy_api_key: optional_var("ALCHEMY_API_KEY"),
            tally_api_url: http_url_var("TALLY_API_URL", DEFAULT_TALLY_API_URL)?,
            tally_api_key: optional_var("TALLY_API_KEY"),
            timeouts: ProviderTimeouts::default(),
        };

        // Log without sensitive values
        tracing::debug!("Web3.bio URL: {}", config.web3_bio_base_url);
        tracing::debug!("Snapshot URL: {}", config.snapshot_graphql_url);
        tracing::debug!("Alchemy URL: {}", config.alchemy_base_url);
        tracing::debug!("Tally URL: {}", config.tally_api_url);
        tracing::debug!("Server Port: {}", config.port);
        if config.alchemy_api_key.is_none() {
            tracing::warn!("ALCHEMY_API_KEY not set; chain activity will use defaults");
        }
        if config.tally_api_key.is_none() {
            tracing::warn!("TALLY_API_KEY not set; proposal counts will use defaults");
        }
        if config.web3_bio_api_key.is_none() {
            tracing::info!("WEB3_BIO_API_KEY not set; using anonymous Web3.bio access");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts_are_independent() {
        let t = ProviderTimeouts::default();
        assert_eq!(t.social, Duration::from_secs(10));
        assert_eq!(t.votes, Duration::from_secs(8));
        assert_eq!(t.chain, Duration::from_secs(15));
        assert_eq!(t.proposals, Duration::from_secs(8));
    }

    #[test]
    fn test_default_config_has_no_keys() {
        let config = Config::default();
        assert!(config.alchemy_api_key.is_none());
        assert!(config.tally_api_key.is_none());
        assert_eq!(config.port, 5001);
    }

    #[test]
    fn test_timeouts_can_be_shortened_per_adapter() {
        let mut config = Config::default();
        config.timeouts.votes = Duration::from_millis(200);
        let copy = config.clone();
        assert_eq!(copy.timeouts.votes, Duration::from_millis(200));
        assert_eq!(copy.timeouts.chain, Duration::from_secs(15));
    }
}
