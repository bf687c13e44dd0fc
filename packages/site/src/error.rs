//! Error types for the drop site.

use crate::mint::MintGuard;
use crate::render::ErrorPage;
use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use std::fmt;

/// Site error type.
#[derive(Debug)]
pub enum Error {
    /// Configuration error.
    Config(String),
    /// Content store query failure.
    Content(String),
    /// No collection matches the requested slug.
    NotFound,
    /// Chain RPC / claim submission failure.
    Chain(String),
    /// Mint rejected by a state-machine guard.
    Guard(MintGuard),
    /// Invalid session input (bad address, missing body field).
    Session(String),
    /// Template rendering failure.
    Render(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Content(msg) => write!(f, "content store error: {msg}"),
            Error::NotFound => write!(f, "not found"),
            Error::Chain(msg) => write!(f, "chain error: {msg}"),
            Error::Guard(guard) => write!(f, "mint rejected: {guard}"),
            Error::Session(msg) => write!(f, "session error: {msg}"),
            Error::Render(msg) => write!(f, "render error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<MintGuard> for Error {
    fn from(guard: MintGuard) -> Self {
        Error::Guard(guard)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Content(_) | Error::Chain(_) => StatusCode::BAD_GATEWAY,
            Error::Guard(_) => StatusCode::CONFLICT,
            Error::Session(_) => StatusCode::BAD_REQUEST,
            Error::Config(_) | Error::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Page-facing failures get a rendered error page; everything else is
        // the JSON envelope the API routes speak.
        match &self {
            Error::NotFound | Error::Content(_) => {
                let page = ErrorPage {
                    status: status.as_u16(),
                    message: self.to_string(),
                };
                let body = page
                    .render()
                    .unwrap_or_else(|_| format!("{} {}", status.as_u16(), self));
                (status, Html(body)).into_response()
            }
            _ => {
                let body = serde_json::json!({
                    "success": false,
                    "error": self.to_string()
                });
                (status, Json(body)).into_response()
            }
        }
    }
}
