//! Mint session state machine.
//!
//! Resting phases are `Uninitialized → Ready → Minting`; settlement returns
//! the machine to `Ready` and records the outcome, so `Settled` never rests.
//! Notifications and the result modal are emitted as [`Effect`]s, which keeps
//! the transition table testable without any rendering.

use crate::mint::drop_client::MintedToken;

/// Resting phase of a mint session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No contract handle observed yet.
    Uninitialized,
    /// Contract handle available; supply/price may still be loading.
    Ready,
    /// A claim is in flight. Leaving this phase requires a settlement.
    Minting,
}

/// How the last claim settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Success,
    Failure,
}

/// User-facing notification emitted by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Pending,
    Success,
    Error(String),
}

/// Side effect of a transition, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Notify(Notice),
    OpenModal,
    DismissPending,
}

/// Reason a mint was rejected before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintGuard {
    /// Supply figures not loaded yet.
    NotReady,
    /// A claim is already in flight for this session.
    InFlight,
    /// `claimed == total`.
    SoldOut,
    /// No wallet address connected.
    NoWallet,
}

impl std::fmt::Display for MintGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady => write!(f, "supply not loaded yet"),
            Self::InFlight => write!(f, "a mint is already in flight"),
            Self::SoldOut => write!(f, "drop is sold out"),
            Self::NoWallet => write!(f, "no wallet connected"),
        }
    }
}

/// Per-session mint state. Created on first contact, mutated by handler
/// calls, discarded with the process.
#[derive(Debug, Clone)]
pub struct MintSession {
    pub address: Option<String>,
    phase: Phase,
    price_eth: Option<String>,
    claimed: Option<u64>,
    total: Option<u64>,
    pub last_tx: Option<String>,
    pub minted: Option<MintedToken>,
    pub modal_open: bool,
    pub last_outcome: Option<Settlement>,
}

impl MintSession {
    pub fn new() -> Self {
        Self {
            address: None,
            phase: Phase::Uninitialized,
            price_eth: None,
            claimed: None,
            total: None,
            last_tx: None,
            minted: None,
            modal_open: false,
            last_outcome: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn claimed(&self) -> Option<u64> {
        self.claimed
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn price_eth(&self) -> Option<&str> {
        self.price_eth.as_deref()
    }

    /// Entry to `Ready`: called whenever the contract handle is available.
    /// No-op outside `Uninitialized`.
    pub fn make_ready(&mut self) {
        if self.phase == Phase::Uninitialized {
            self.phase = Phase::Ready;
        }
    }

    // --- Wallet ---

    pub fn connect(&mut self, address: String) {
        self.address = Some(address);
    }

    pub fn disconnect(&mut self) {
        self.address = None;
    }

    // --- Supply/price reads (independent; either may land first) ---

    pub fn observe_price(&mut self, price_eth: String) {
        self.make_ready();
        self.price_eth = Some(price_eth);
    }

    pub fn observe_supply(&mut self, claimed: u64, total: u64) {
        self.make_ready();
        self.claimed = Some(claimed.min(total));
        self.total = Some(total);
    }

    /// True until both reads have resolved.
    pub fn is_loading(&self) -> bool {
        self.price_eth.is_none() || self.claimed.is_none() || self.total.is_none()
    }

    // --- Mint transitions ---

    /// Guarded `Ready → Minting`. Emits the pending notification.
    pub fn begin_mint(&mut self) -> Result<Vec<Effect>, MintGuard> {
        if self.phase == Phase::Minting {
            return Err(MintGuard::InFlight);
        }
        let (claimed, total) = match (self.claimed, self.total) {
            (Some(c), Some(t)) => (c, t),
            _ => return Err(MintGuard::NotReady),
        };
        if claimed == total {
            return Err(MintGuard::SoldOut);
        }
        if self.address.is_none() {
            return Err(MintGuard::NoWallet);
        }

        self.phase = Phase::Minting;
        self.modal_open = false;
        self.last_outcome = None;
        Ok(vec![Effect::Notify(Notice::Pending)])
    }

    /// `Minting → Ready` with a successful claim. The claimed count and the
    /// modal update before the in-flight flag clears; the pending
    /// notification is dismissed last.
    pub fn settle_success(&mut self, token: MintedToken) -> Vec<Effect> {
        let total = self.total.unwrap_or(u64::MAX);
        self.claimed = Some(self.claimed.unwrap_or(0).saturating_add(1).min(total));
        self.last_tx = Some(token.tx_hash.clone());
        self.minted = Some(token);
        self.modal_open = true;
        self.last_outcome = Some(Settlement::Success);
        self.phase = Phase::Ready;
        vec![
            Effect::Notify(Notice::Success),
            Effect::OpenModal,
            Effect::DismissPending,
        ]
    }

    /// `Minting → Ready` with a failed claim. The modal stays closed.
    pub fn settle_failure(&mut self, error: String) -> Vec<Effect> {
        self.last_outcome = Some(Settlement::Failure);
        self.phase = Phase::Ready;
        vec![Effect::Notify(Notice::Error(error)), Effect::DismissPending]
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
    }

    // --- Presentation ---

    /// Mint button label, mirroring the page's disabled-state reasons.
    pub fn button_label(&self) -> String {
        if self.phase == Phase::Minting || self.is_loading() {
            return "Loading...".to_string();
        }
        if self.claimed == self.total {
            return "Sold Out".to_string();
        }
        match &self.address {
            None => "Sign In to Mint".to_string(),
            Some(_) => format!(
                "Mint NFT ({} ETH)",
                self.price_eth.as_deref().unwrap_or("?")
            ),
        }
    }

    /// Greeting for a connected wallet: `0xABCDE...VWXYZ` truncation.
    pub fn greeting(&self) -> Option<String> {
        self.address.as_ref().map(|addr| {
            if addr.len() > 10 {
                format!(
                    "You're logged in with wallet {}...{}",
                    &addr[..5],
                    &addr[addr.len() - 5..]
                )
            } else {
                format!("You're logged in with wallet {addr}")
            }
        })
    }
}

impl Default for MintSession {
    fn default() -> Self {
        Self::new()
    }
}
