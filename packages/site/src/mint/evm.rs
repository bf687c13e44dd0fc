//! EVM drop contract adapter.
//!
//! The site holds the minter key and submits `claim(recipient, quantity)` on
//! behalf of the connected address; the recipient never signs anything here.

use crate::error::Error;
use crate::mint::drop_client::{MintedToken, TokenMetadata};
use ethers::abi::RawLog;
use ethers::contract::{abigen, EthEvent};
use ethers::core::types::{Address, U256};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::utils::format_units;
use std::sync::Arc;
use tracing::{info, warn};

abigen!(
    DropContract,
    r#"[
        function claim(address receiver, uint256 quantity) external payable
        function claimPrice() external view returns (uint256)
        function totalClaimed() external view returns (uint256)
        function maxTotalSupply() external view returns (uint256)
        function tokenURI(uint256 tokenId) external view returns (string)
        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId)
    ]"#
);

type DropMiddleware = SignerMiddleware<Provider<Http>, LocalWallet>;

/// EVM backend: JSON-RPC provider plus the site's minter wallet.
pub struct EvmDrop {
    client: Arc<DropMiddleware>,
    http: reqwest::Client,
    ipfs_gateway: String,
}

impl EvmDrop {
    pub fn new(
        rpc_url: &str,
        chain_id: u64,
        minter_key: &str,
        ipfs_gateway: String,
    ) -> Result<Self, Error> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| Error::Config(format!("invalid rpc url {rpc_url}: {e}")))?;
        let wallet: LocalWallet = minter_key
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("invalid minter key: {e}")))?;
        let wallet = wallet.with_chain_id(chain_id);
        info!(minter = %wallet.address(), chain_id, "Minter wallet loaded");
        Ok(Self {
            client: Arc::new(SignerMiddleware::new(provider, wallet)),
            http: reqwest::Client::new(),
            ipfs_gateway,
        })
    }

    fn contract(&self, address: &str) -> Result<DropContract<DropMiddleware>, Error> {
        let parsed: Address = address
            .trim()
            .parse()
            .map_err(|e| Error::Chain(format!("invalid contract address {address}: {e}")))?;
        Ok(DropContract::new(parsed, Arc::clone(&self.client)))
    }

    /// Unit price in ETH, trimmed for display ("0.01", not "0.0100…0").
    pub async fn price_eth(&self, contract: &str) -> Result<String, Error> {
        let wei = self
            .contract(contract)?
            .claim_price()
            .call()
            .await
            .map_err(|e| Error::Chain(format!("claimPrice query failed: {e}")))?;
        let eth = format_units(wei, "ether")
            .map_err(|e| Error::Chain(format!("price conversion failed: {e}")))?;
        Ok(trim_price(&eth))
    }

    pub async fn supply(&self, contract: &str) -> Result<(u64, u64), Error> {
        let contract = self.contract(contract)?;
        let claimed = contract
            .total_claimed()
            .call()
            .await
            .map_err(|e| Error::Chain(format!("totalClaimed query failed: {e}")))?;
        let total = contract
            .max_total_supply()
            .call()
            .await
            .map_err(|e| Error::Chain(format!("maxTotalSupply query failed: {e}")))?;
        Ok((to_u64(claimed), to_u64(total)))
    }

    pub async fn claim_to(
        &self,
        contract_addr: &str,
        recipient: &str,
        quantity: u64,
    ) -> Result<MintedToken, Error> {
        let recipient: Address = recipient
            .trim()
            .parse()
            .map_err(|e| Error::Session(format!("invalid recipient address: {e}")))?;
        let contract = self.contract(contract_addr)?;

        let price = contract
            .claim_price()
            .call()
            .await
            .map_err(|e| Error::Chain(format!("claimPrice query failed: {e}")))?;
        let value = price
            .checked_mul(U256::from(quantity))
            .ok_or_else(|| Error::Chain("claim value overflow".to_string()))?;

        let call = contract.claim(recipient, U256::from(quantity)).value(value);
        let pending = call
            .send()
            .await
            .map_err(|e| Error::Chain(format!("claim submission failed: {e}")))?;
        let receipt = pending
            .await
            .map_err(|e| Error::Chain(format!("claim confirmation failed: {e}")))?
            .ok_or_else(|| Error::Chain("claim transaction dropped from the mempool".to_string()))?;

        if receipt.status == Some(0.into()) {
            return Err(Error::Chain("claim transaction reverted".to_string()));
        }
        let tx_hash = format!("{:?}", receipt.transaction_hash);

        let token_id = receipt
            .logs
            .iter()
            .filter_map(|log| TransferFilter::decode_log(&RawLog::from(log.clone())).ok())
            .find(|t| t.to == recipient)
            .map(|t| t.token_id)
            .ok_or_else(|| {
                Error::Chain("claim confirmed but no transfer event found".to_string())
            })?;

        let metadata = match contract.token_uri(token_id).call().await {
            Ok(uri) => self.fetch_metadata(&uri).await.unwrap_or_else(|e| {
                warn!(error = %e, token_id = %token_id, "Token metadata fetch failed");
                fallback_metadata(token_id)
            }),
            Err(e) => {
                warn!(error = %e, token_id = %token_id, "tokenURI query failed");
                fallback_metadata(token_id)
            }
        };

        info!(tx_hash = %tx_hash, token_id = %token_id, "Claim confirmed");
        Ok(MintedToken {
            token_id: token_id.to_string(),
            tx_hash,
            metadata,
        })
    }

    async fn fetch_metadata(&self, uri: &str) -> Result<TokenMetadata, Error> {
        let url = resolve_uri(&self.ipfs_gateway, uri);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Chain(format!("metadata fetch failed: {e}")))?;
        let mut meta: TokenMetadata = resp
            .json()
            .await
            .map_err(|e| Error::Chain(format!("metadata parse failed: {e}")))?;
        meta.image = resolve_uri(&self.ipfs_gateway, &meta.image);
        Ok(meta)
    }
}

fn fallback_metadata(token_id: U256) -> TokenMetadata {
    TokenMetadata {
        name: format!("Token #{token_id}"),
        description: String::new(),
        image: String::new(),
    }
}

fn to_u64(v: U256) -> u64 {
    v.min(U256::from(u64::MAX)).low_u64()
}

/// Rewrite `ipfs://` URIs through the configured gateway.
fn resolve_uri(gateway: &str, uri: &str) -> String {
    match uri.strip_prefix("ipfs://") {
        Some(cid) => format!("{gateway}{cid}"),
        None => uri.to_string(),
    }
}

/// Drop trailing zeros from a fixed-point ETH amount.
fn trim_price(eth: &str) -> String {
    if !eth.contains('.') {
        return eth.to_string();
    }
    let trimmed = eth.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
