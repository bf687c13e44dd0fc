//! Mint workflow: session state machine, chain capability surface, and the
//! in-memory session store.

pub mod drop_client;
mod evm;
mod session;

pub use drop_client::{DropClient, FakeDrop, MintedToken, TokenMetadata};
pub use evm::EvmDrop;
pub use session::{Effect, MintGuard, MintSession, Notice, Phase, Settlement};

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sessions untouched this long are swept.
const SESSION_IDLE: Duration = Duration::from_secs(30 * 60);
/// Hard cap on live sessions; the most idle one is evicted past this.
const MAX_SESSIONS: usize = 10_000;

struct SessionEntry {
    session: MintSession,
    last_touched: Instant,
}

/// In-memory mint sessions, keyed by the `x-session-id` header. Transient by
/// design: idle sessions are evicted, the map is capped, and nothing is
/// persisted.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    idle_after: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_limits(SESSION_IDLE, MAX_SESSIONS)
    }

    pub fn with_limits(idle_after: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_after,
            max_sessions,
        }
    }

    /// Run `f` against the session for `id`, creating it on first contact.
    /// Idle entries are swept on the way in, so anonymous one-shot ids
    /// cannot grow the map without bound.
    pub fn with<R>(&self, id: &str, f: impl FnOnce(&mut MintSession) -> R) -> R {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());

        sessions.retain(|key, entry| key == id || entry.last_touched.elapsed() < self.idle_after);

        if !sessions.contains_key(id) && sessions.len() >= self.max_sessions {
            let most_idle = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_touched)
                .map(|(key, _)| key.clone());
            if let Some(key) = most_idle {
                sessions.remove(&key);
            }
        }

        let entry = sessions.entry(id.to_string()).or_insert_with(|| SessionEntry {
            session: MintSession::new(),
            last_touched: Instant::now(),
        });
        entry.last_touched = Instant::now();
        f(&mut entry.session)
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard for an in-flight claim. A session enters `Minting` only
/// alongside one of these; if the guard is dropped before a settlement is
/// recorded (the handler future was cancelled mid-claim), the session is
/// settled as failed so the in-flight guard cannot stick.
pub struct ClaimGuard<'a> {
    store: &'a SessionStore,
    id: String,
    settled: bool,
}

impl<'a> ClaimGuard<'a> {
    pub fn new(store: &'a SessionStore, id: &str) -> Self {
        Self {
            store,
            id: id.to_string(),
            settled: false,
        }
    }

    /// Settle the claim as successful; returns the updated supply figures.
    pub fn settle_success(mut self, token: MintedToken) -> (Option<u64>, Option<u64>) {
        self.settled = true;
        self.store.with(&self.id, |s| {
            s.settle_success(token);
            (s.claimed(), s.total())
        })
    }

    pub fn settle_failure(mut self, error: String) {
        self.settled = true;
        self.store.with(&self.id, |s| {
            s.settle_failure(error);
        });
    }
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.store.with(&self.id, |s| {
                s.settle_failure("claim abandoned before settlement".to_string());
            });
        }
    }
}
