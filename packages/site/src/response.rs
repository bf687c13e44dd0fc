//! Response types for the site API.

use crate::mint::{MintedToken, TokenMetadata};
use serde::Serialize;

/// Response from the mint endpoint.
#[derive(Serialize)]
pub struct MintResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MintResponse {
    pub fn ok(token: MintedToken, claimed: Option<u64>, total: Option<u64>) -> Self {
        Self {
            success: true,
            tx_hash: Some(token.tx_hash),
            token_id: Some(token.token_id),
            token: Some(token.metadata),
            claimed,
            total,
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            tx_hash: None,
            token_id: None,
            token: None,
            claimed: None,
            total: None,
            error: Some(error.into()),
        }
    }
}

/// Response from the supply endpoint.
#[derive(Serialize)]
pub struct SupplyResponse {
    pub claimed: u64,
    pub total: u64,
    pub price_eth: String,
}

/// Response from the wallet connect/disconnect endpoints.
#[derive(Serialize)]
pub struct WalletResponse {
    pub session: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
}

/// Response from the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub content_status: &'static str,
    pub content_endpoint: String,
    pub rpc_url: String,
    pub uptime_secs: u64,
    pub requests: u64,
    pub sessions: usize,
}
