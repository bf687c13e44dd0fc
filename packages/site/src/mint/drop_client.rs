//! Chain capability surface for drop contracts.
//!
//! Narrow by design: the mint workflow needs exactly three reads/writes, so
//! backends stay swappable. `Evm` talks to the real contract; `Fake` is a
//! deterministic in-memory drop used by tests and demos.

use crate::error::Error;
use crate::mint::evm::EvmDrop;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Metadata of a minted token, as served by the token URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

/// Result of a successful claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintedToken {
    pub token_id: String,
    pub tx_hash: String,
    pub metadata: TokenMetadata,
}

/// Drop contract backend.
pub enum DropClient {
    /// Real EVM drop contract via JSON-RPC.
    Evm(EvmDrop),
    /// Deterministic in-memory drop for tests.
    Fake(FakeDrop),
}

impl DropClient {
    /// Current unit price in ETH, as a display string.
    pub async fn price_eth(&self, contract: &str) -> Result<String, Error> {
        match self {
            Self::Evm(evm) => evm.price_eth(contract).await,
            Self::Fake(fake) => Ok(fake.price_eth.clone()),
        }
    }

    /// `(claimed, total)` supply figures.
    pub async fn supply(&self, contract: &str) -> Result<(u64, u64), Error> {
        match self {
            Self::Evm(evm) => evm.supply(contract).await,
            Self::Fake(fake) => Ok((fake.claimed.load(Ordering::Relaxed), fake.total)),
        }
    }

    /// Claim `quantity` tokens to `recipient`.
    pub async fn claim_to(
        &self,
        contract: &str,
        recipient: &str,
        quantity: u64,
    ) -> Result<MintedToken, Error> {
        match self {
            Self::Evm(evm) => evm.claim_to(contract, recipient, quantity).await,
            Self::Fake(fake) => fake.claim_to(recipient, quantity),
        }
    }
}

/// In-memory drop with a fixed supply and price.
pub struct FakeDrop {
    pub price_eth: String,
    claimed: AtomicU64,
    total: u64,
    fail_claims: AtomicBool,
}

impl FakeDrop {
    pub fn new(claimed: u64, total: u64, price_eth: &str) -> Self {
        Self {
            price_eth: price_eth.to_string(),
            claimed: AtomicU64::new(claimed),
            total,
            fail_claims: AtomicBool::new(false),
        }
    }

    /// Make subsequent claims fail with a chain error.
    pub fn fail_claims(&self, fail: bool) {
        self.fail_claims.store(fail, Ordering::Relaxed);
    }

    fn claim_to(&self, recipient: &str, quantity: u64) -> Result<MintedToken, Error> {
        if self.fail_claims.load(Ordering::Relaxed) {
            return Err(Error::Chain("claim reverted".to_string()));
        }
        // Reserve atomically so concurrent claims cannot push past total.
        let reserved = self
            .claimed
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |claimed| {
                claimed
                    .checked_add(quantity)
                    .filter(|next| *next <= self.total)
            })
            .map_err(|_| Error::Chain("drop exhausted".to_string()))?;
        let token_id = reserved + quantity;
        Ok(MintedToken {
            token_id: token_id.to_string(),
            tx_hash: format!("0x{token_id:064x}"),
            metadata: TokenMetadata {
                name: format!("Token #{token_id}"),
                description: format!("minted to {recipient}"),
                image: format!("https://cdn.example/tokens/{token_id}.png"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_drop_counts_claims() {
        let drop = DropClient::Fake(FakeDrop::new(15, 40, "0.01"));
        assert_eq!(drop.supply("0xc").await.unwrap(), (15, 40));

        let token = drop.claim_to("0xc", "0xme", 1).await.unwrap();
        assert_eq!(token.token_id, "16");
        assert_eq!(drop.supply("0xc").await.unwrap(), (16, 40));
    }

    #[tokio::test]
    async fn test_fake_drop_rejects_over_claim() {
        let drop = FakeDrop::new(40, 40, "0.01");
        assert!(drop.claim_to("0xme", 1).is_err());
    }

    #[test]
    fn test_fake_drop_never_exceeds_total_under_contention() {
        use std::sync::Arc;

        let drop = Arc::new(FakeDrop::new(8, 10, "0.01"));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let drop = Arc::clone(&drop);
                std::thread::spawn(move || drop.claim_to("0xme", 1).is_ok())
            })
            .collect();

        let granted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|granted| *granted)
            .count();
        assert_eq!(granted, 2);
        assert_eq!(drop.claimed.load(Ordering::Relaxed), 10);
    }

    #[tokio::test]
    async fn test_fake_drop_forced_failure() {
        let fake = FakeDrop::new(0, 10, "0.01");
        fake.fail_claims(true);
        assert!(fake.claim_to("0xme", 1).is_err());
        fake.fail_claims(false);
        assert!(fake.claim_to("0xme", 1).is_ok());
    }
}
