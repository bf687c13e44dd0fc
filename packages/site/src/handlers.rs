//! HTTP request handlers.

use crate::error::Error;
use crate::middleware::SessionId;
use crate::mint::ClaimGuard;
use crate::render::{CollectionCard, DropPage, IndexPage};
use crate::response::{HealthResponse, MintResponse, SupplyResponse, WalletResponse};
use crate::state::AppState;
use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::{Extension, Json};
use serde::Deserialize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

/// Listing page: one card per collection, linking to its detail page.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let collections = state.content.collections().await?;
    info!(count = collections.len(), "Rendering listing");

    let cards = collections
        .iter()
        .map(|c| CollectionCard::from_collection(&state.config, c))
        .collect::<Result<Vec<_>, _>>()?;
    let page = IndexPage { cards };
    Ok(Html(page.render().map_err(|e| Error::Render(e.to_string()))?))
}

/// Drop detail page. `GET /nft/{slug}`; 404 when the slug matches nothing.
pub async fn drop_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Html<String>, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let collection = state
        .content
        .collection_by_slug(&slug)
        .await?
        .ok_or(Error::NotFound)?;
    info!(slug = %slug, "Rendering drop page");

    let page = DropPage::from_collection(&state.config, &collection)?;
    Ok(Html(page.render().map_err(|e| Error::Render(e.to_string()))?))
}

/// Health check: content-store reachability plus basic counters.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let content_status = match state.content.health_check().await {
        Ok(()) => "ok",
        Err(e) => {
            warn!(error = %e, "Content store unreachable");
            "unavailable"
        }
    };
    let status = if content_status == "ok" { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        content_status,
        content_endpoint: state.content.endpoint(),
        rpc_url: state.config.rpc_url.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        requests: state.request_count.load(Ordering::Relaxed),
        sessions: state.sessions.len(),
    })
}

#[derive(Deserialize)]
pub struct ConnectRequest {
    pub address: String,
}

/// Attach a wallet address to the mint session.
pub async fn connect(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Json(request): Json<ConnectRequest>,
) -> Result<Json<WalletResponse>, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let address = request.address.trim().to_string();
    if !is_evm_address(&address) {
        warn!(session = %session, "Rejected malformed wallet address");
        return Err(Error::Session(format!("not an EVM address: {address}")));
    }

    let greeting = state.sessions.with(&session.0, |s| {
        s.connect(address.clone());
        s.greeting()
    });
    info!(session = %session, "Wallet connected");

    Ok(Json(WalletResponse {
        session: session.0,
        address: Some(address),
        greeting,
    }))
}

/// Clear the session's wallet.
pub async fn disconnect(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
) -> Json<WalletResponse> {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    state.sessions.with(&session.0, |s| s.disconnect());
    info!(session = %session, "Wallet disconnected");

    Json(WalletResponse {
        session: session.0,
        address: None,
        greeting: None,
    })
}

/// Supply and price for a drop. The two chain reads are independent and may
/// resolve in either order; whatever resolved is recorded on the session
/// even when the other read failed.
pub async fn supply(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(slug): Path<String>,
) -> Result<Json<SupplyResponse>, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let collection = state
        .content
        .collection_by_slug(&slug)
        .await?
        .ok_or(Error::NotFound)?;

    let (price, figures) = tokio::join!(
        state.drop.price_eth(&collection.address),
        state.drop.supply(&collection.address),
    );

    state.sessions.with(&session.0, |s| {
        s.make_ready();
        if let Ok(price) = &price {
            s.observe_price(price.clone());
        }
        if let Ok((claimed, total)) = &figures {
            s.observe_supply(*claimed, *total);
        }
    });

    let price_eth = price?;
    let (claimed, total) = figures?;
    Ok(Json(SupplyResponse {
        claimed,
        total,
        price_eth,
    }))
}

/// Claim one token to the connected address. `POST /api/nft/{slug}/mint`.
pub async fn mint(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(slug): Path<String>,
) -> Result<(StatusCode, Json<MintResponse>), Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let collection = state
        .content
        .collection_by_slug(&slug)
        .await?
        .ok_or(Error::NotFound)?;

    // Guarded entry to Minting; a guard failure is the 409.
    let recipient = state.sessions.with(&session.0, |s| {
        s.begin_mint()?;
        Ok::<_, crate::mint::MintGuard>(s.address.clone().unwrap_or_default())
    })?;
    info!(session = %session, slug = %slug, recipient = %recipient, "Mint pending");

    // Settles the session as failed if this future is cancelled mid-claim.
    let claim = ClaimGuard::new(&state.sessions, &session.0);
    match state.drop.claim_to(&collection.address, &recipient, 1).await {
        Ok(token) => {
            let (claimed, total) = claim.settle_success(token.clone());
            info!(session = %session, tx_hash = %token.tx_hash, "Mint settled");
            Ok((StatusCode::OK, Json(MintResponse::ok(token, claimed, total))))
        }
        Err(e) => {
            claim.settle_failure(e.to_string());
            warn!(session = %session, error = %e, "Mint failed");
            Ok((StatusCode::BAD_GATEWAY, Json(MintResponse::err(e.to_string()))))
        }
    }
}

/// `0x` plus 40 hex digits.
fn is_evm_address(address: &str) -> bool {
    address.len() == 42
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_evm_address() {
        assert!(is_evm_address("0x322d4646152ce06e45A2acab0E37CEF1ec25b7a3"));
        assert!(!is_evm_address("322d4646152ce06e45A2acab0E37CEF1ec25b7a3"));
        assert!(!is_evm_address("0x322d"));
        assert!(!is_evm_address("0xzz2d4646152ce06e45A2acab0E37CEF1ec25b7a3"));
    }
}
