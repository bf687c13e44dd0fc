//! # Drop Site
//!
//! A server-rendered front-end for browsing a catalog of NFT drops and
//! minting tokens from their drop contracts. Collection content comes from a
//! headless content store at request time; claims are submitted through a
//! thin chain-client adapter.
//!
//! ## Quick Start
//! ```bash
//! SITE_MINTER_KEY=<hex key> cargo run --bin drop-site
//! ```
//!
//! ## Endpoints
//! - `GET /` - Listing page (HTML)
//! - `GET /nft/{slug}` - Drop detail page (HTML, 404 on unknown slug)
//! - `GET /health` - Health check with counters
//! - `POST /api/wallet/connect` - Attach a wallet address to the session
//! - `POST /api/wallet/disconnect` - Clear the session wallet
//! - `GET /api/nft/{slug}/supply` - Claimed/total supply and unit price
//! - `POST /api/nft/{slug}/mint` - Claim one token to the connected address

pub mod config;
pub mod content;
mod error;
mod handlers;
mod middleware;
pub mod mint;
mod render;
mod response;
mod router;
mod state;

pub use config::Config;
pub use error::Error;
pub use router::create as create_router;
pub use state::AppState;
