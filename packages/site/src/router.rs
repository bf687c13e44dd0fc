//! HTTP router setup.

use crate::handlers;
use crate::middleware;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/nft/{slug}", get(handlers::drop_page))
        .route("/health", get(handlers::health))
        .route("/api/wallet/connect", post(handlers::connect))
        .route("/api/wallet/disconnect", post(handlers::disconnect))
        .route("/api/nft/{slug}/supply", get(handlers::supply))
        .route("/api/nft/{slug}/mint", post(handlers::mint))
        .layer(axum::middleware::from_fn(middleware::inject_session_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::content::ContentClient;
    use crate::mint::{DropClient, FakeDrop};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use drop_types::{AssetPointer, Collection, Creator, ImageRef, Slug};
    use tower::ServiceExt;

    const WALLET: &str = "0x90F79bf6EB2c4f870365E785982E1f101E93b906";

    fn collection(slug: &str, title: &str) -> Collection {
        Collection {
            id: format!("c-{slug}"),
            title: title.into(),
            description: format!("{title} drop"),
            address: "0x322d4646152ce06e45A2acab0E37CEF1ec25b7a3".into(),
            collection_name: title.to_uppercase(),
            main_image: ImageRef {
                asset: AssetPointer {
                    reference: "image-aaa-200x200-png".into(),
                },
            },
            preview_image: ImageRef {
                asset: AssetPointer {
                    reference: "image-bbb-400x400-jpg".into(),
                },
            },
            slug: Slug {
                current: slug.into(),
            },
            creator: Creator {
                id: "u-1".into(),
                name: "Alice".into(),
                address: WALLET.into(),
                slug: Slug {
                    current: "alice".into(),
                },
            },
        }
    }

    fn test_router(drop: FakeDrop) -> Router {
        let state = AppState::with_backends(
            Config::default(),
            ContentClient::fixed(vec![
                collection("apes", "Apes"),
                collection("punks", "Punks"),
            ]),
            DropClient::Fake(drop),
        );
        create(Arc::new(state))
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get(path: &str) -> Request<Body> {
        Request::builder()
            .uri(path)
            .header("x-session-id", "drop-test")
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(path: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header("x-session-id", "drop-test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post(path: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header("x-session-id", "drop-test")
            .body(Body::empty())
            .unwrap()
    }

    // --- Pages ---

    #[tokio::test]
    async fn test_listing_renders_one_link_per_collection() {
        let router = test_router(FakeDrop::new(15, 40, "0.01"));
        let response = router.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        for slug in ["apes", "punks"] {
            let link = format!("href=\"/nft/{slug}\"");
            assert_eq!(html.matches(&link).count(), 1, "{slug} links");
        }
    }

    #[tokio::test]
    async fn test_detail_page_renders_collection() {
        let router = test_router(FakeDrop::new(15, 40, "0.01"));
        let response = router.oneshot(get("/nft/apes")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("Apes | NFT Drop"));
        assert!(html.contains("Drop of APES"));
    }

    #[tokio::test]
    async fn test_detail_miss_is_distinct_not_found() {
        let router = test_router(FakeDrop::new(15, 40, "0.01"));
        let response = router.oneshot(get("/nft/ghosts")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        // Never a half-rendered drop page.
        let html = body_string(response).await;
        assert!(!html.contains("NFT Drop</title>"));
    }

    #[tokio::test]
    async fn test_health_reports_counters() {
        let router = test_router(FakeDrop::new(0, 10, "0.01"));
        let response = router.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["content_status"], "ok");
        // Health checks count like every other request.
        assert_eq!(body["requests"], 1);
    }

    // --- Session middleware ---

    #[tokio::test]
    async fn test_session_id_minted_and_echoed() {
        let router = test_router(FakeDrop::new(15, 40, "0.01"));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        let id = response.headers().get("x-session-id").unwrap();
        assert!(id.to_str().unwrap().starts_with("drop-"));
    }

    // --- Mint workflow ---

    #[tokio::test]
    async fn test_full_mint_flow() {
        let router = test_router(FakeDrop::new(15, 40, "0.01"));

        let response = router
            .clone()
            .oneshot(post_json(
                "/api/wallet/connect",
                serde_json::json!({ "address": WALLET }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .clone()
            .oneshot(get("/api/nft/apes/supply"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["claimed"], 15);
        assert_eq!(body["total"], 40);
        assert_eq!(body["price_eth"], "0.01");

        let response = router
            .clone()
            .oneshot(post("/api/nft/apes/mint"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["claimed"], 16);
        assert_eq!(body["total"], 40);
        assert_eq!(body["token"]["name"], "Token #16");
        assert!(body["tx_hash"].as_str().unwrap().starts_with("0x"));
    }

    #[tokio::test]
    async fn test_mint_rejected_without_wallet() {
        let router = test_router(FakeDrop::new(15, 40, "0.01"));

        let response = router
            .clone()
            .oneshot(get("/api/nft/apes/supply"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .clone()
            .oneshot(post("/api/nft/apes/mint"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_mint_rejected_when_sold_out() {
        let router = test_router(FakeDrop::new(40, 40, "0.01"));

        router
            .clone()
            .oneshot(post_json(
                "/api/wallet/connect",
                serde_json::json!({ "address": WALLET }),
            ))
            .await
            .unwrap();
        router
            .clone()
            .oneshot(get("/api/nft/apes/supply"))
            .await
            .unwrap();

        let response = router
            .clone()
            .oneshot(post("/api/nft/apes/mint"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_mint_failure_settles_back_to_ready() {
        let drop = FakeDrop::new(15, 40, "0.01");
        drop.fail_claims(true);
        let router = test_router(drop);

        router
            .clone()
            .oneshot(post_json(
                "/api/wallet/connect",
                serde_json::json!({ "address": WALLET }),
            ))
            .await
            .unwrap();
        router
            .clone()
            .oneshot(get("/api/nft/apes/supply"))
            .await
            .unwrap();

        let response = router
            .clone()
            .oneshot(post("/api/nft/apes/mint"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["success"], false);

        // Not stuck in flight: the next attempt reaches the backend again.
        let response = router
            .clone()
            .oneshot(post("/api/nft/apes/mint"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_address() {
        let router = test_router(FakeDrop::new(15, 40, "0.01"));
        let response = router
            .oneshot(post_json(
                "/api/wallet/connect",
                serde_json::json!({ "address": "not-an-address" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_supply_for_unknown_slug_is_not_found() {
        let router = test_router(FakeDrop::new(15, 40, "0.01"));
        let response = router
            .oneshot(get("/api/nft/ghosts/supply"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
