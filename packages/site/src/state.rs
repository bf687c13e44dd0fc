//! Application state shared across handlers.

use crate::config::Config;
use crate::content::ContentClient;
use crate::mint::{DropClient, EvmDrop, SessionStore};
use std::sync::atomic::AtomicU64;
use std::time::Instant;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub content: ContentClient,
    pub drop: DropClient,
    pub sessions: SessionStore,
    pub start_time: Instant,
    pub request_count: AtomicU64,
}

impl AppState {
    /// Create application state from configuration. The minter key comes
    /// from `SITE_MINTER_KEY` only — it never lives in a config file.
    pub fn new(config: Config) -> Result<Self, crate::Error> {
        let minter_key = std::env::var("SITE_MINTER_KEY").map_err(|_| {
            crate::Error::Config("SITE_MINTER_KEY not set — the site cannot submit claims".into())
        })?;
        let drop = DropClient::Evm(EvmDrop::new(
            &config.rpc_url,
            config.chain_id,
            &minter_key,
            config.ipfs_gateway.clone(),
        )?);
        let content = ContentClient::sanity(&config)?;
        Ok(Self::with_backends(config, content, drop))
    }

    /// Assemble state around explicit backends. Tests run this with the
    /// fixed catalog and the fake drop.
    pub fn with_backends(config: Config, content: ContentClient, drop: DropClient) -> Self {
        Self {
            config,
            content,
            drop,
            sessions: SessionStore::new(),
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }
}
