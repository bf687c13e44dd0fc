//! Mint-session correlation middleware.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

/// Propagate or mint an `x-session-id` so the transient mint session
/// survives across the page's API calls. New ids are random; nothing about
/// a session is persisted.
pub async fn inject_session_id(mut request: Request, next: Next) -> Response {
    let session_id = request
        .headers()
        .get("x-session-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| {
            use rand::Rng;
            let mut rng = rand::thread_rng();
            format!("drop-{:016x}", rng.gen::<u64>())
        });

    // Store for handler access.
    request
        .extensions_mut()
        .insert(SessionId(session_id.clone()));

    let mut response = next.run(request).await;

    // Echo back so the page can pin its session.
    if let Ok(val) = HeaderValue::from_str(&session_id) {
        response.headers_mut().insert("x-session-id", val);
    }

    response
}

/// Session correlation ID, extractable from `Request::extensions()`.
#[derive(Clone, Debug)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
