//! Site configuration.

use serde::Deserialize;

/// Configuration for the drop site.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,

    /// Content store project id (first path component of the CDN URL).
    #[serde(default = "defaults::content_project")]
    pub content_project: String,

    #[serde(default = "defaults::content_dataset")]
    pub content_dataset: String,

    #[serde(default = "defaults::content_api_version")]
    pub content_api_version: String,

    /// Optional bearer token for private datasets.
    #[serde(default)]
    pub content_token: Option<String>,

    /// EVM JSON-RPC endpoint the drop contracts live on.
    #[serde(default = "defaults::rpc_url")]
    pub rpc_url: String,

    #[serde(default = "defaults::chain_id")]
    pub chain_id: u64,

    /// Gateway used to fetch `ipfs://` token metadata.
    #[serde(default = "defaults::ipfs_gateway")]
    pub ipfs_gateway: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: defaults::bind_address(),
            content_project: defaults::content_project(),
            content_dataset: defaults::content_dataset(),
            content_api_version: defaults::content_api_version(),
            content_token: None,
            rpc_url: defaults::rpc_url(),
            chain_id: defaults::chain_id(),
            ipfs_gateway: defaults::ipfs_gateway(),
        }
    }
}

mod defaults {
    fn network() -> String {
        std::env::var("SITE_NETWORK").unwrap_or_else(|_| "sepolia".into())
    }

    pub fn bind_address() -> String {
        "0.0.0.0:3050".into()
    }

    pub fn content_project() -> String {
        std::env::var("SANITY_PROJECT_ID").unwrap_or_else(|_| "demo".into())
    }

    pub fn content_dataset() -> String {
        std::env::var("SANITY_DATASET").unwrap_or_else(|_| "production".into())
    }

    pub fn content_api_version() -> String {
        "2021-10-21".into()
    }

    pub fn rpc_url() -> String {
        // Priority: SITE_RPC_URL > network-appropriate public endpoint
        if let Ok(url) = std::env::var("SITE_RPC_URL") {
            if !url.is_empty() {
                return url;
            }
        }
        if network().contains("mainnet") {
            "https://eth.llamarpc.com".into()
        } else {
            "https://rpc.sepolia.org".into()
        }
    }

    pub fn chain_id() -> u64 {
        if network().contains("mainnet") {
            1
        } else {
            11155111
        }
    }

    pub fn ipfs_gateway() -> String {
        "https://ipfs.io/ipfs/".into()
    }
}
