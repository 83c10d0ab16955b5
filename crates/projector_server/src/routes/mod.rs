//! Route modules for the projection server
//!
//! This module contains endpoint group-specific routers:
//! - simulate: Projection endpoint and its usage document
//! - health: Health check and readiness endpoints

pub mod health;
pub mod simulate;

use axum::http::{HeaderValue, Method};
use axum::Router;
use projector_engine::ProjectionEngine;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Projection engine built from the configuration
    pub engine: ProjectionEngine,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create a new AppState
    pub fn new(config: Arc<ServerConfig>) -> Self {
        let engine = ProjectionEngine::new(config.engine_config());
        Self {
            config,
            engine,
            start_time: std::time::Instant::now(),
        }
    }
}

/// CORS policy for the configured origins
///
/// Methods are limited to GET and POST; any request header is accepted.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        // Origins are checked by ServerConfig::validate
        AllowOrigin::list(
            config
                .explicit_cors_origins()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Build the main application router by merging all route modules
pub fn build_router(config: Arc<ServerConfig>) -> Router {
    let cors = cors_layer(&config);
    let state = AppState::new(config);

    Router::new()
        .merge(health::routes())
        .merge(simulate::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_build_router_creates_valid_router() {
        let config = Arc::new(ServerConfig::default());
        let router = build_router(config);

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_merges_all_route_groups() {
        let router = build_router(Arc::new(ServerConfig::default()));

        for uri in ["/health", "/ready", "/api/v1/simulate"] {
            let response = router
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        }
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404() {
        let router = build_router(Arc::new(ServerConfig::default()));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/unknown/path")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_by_default() {
        let router = build_router(Arc::new(ServerConfig::default()));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "https://anywhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_cors_restricts_to_configured_origins() {
        let config = ServerConfig {
            cors_allowed_origins: vec!["https://app.example".to_string()],
            ..Default::default()
        };
        let router = build_router(Arc::new(config));

        let preflight = |origin: &'static str| {
            Request::builder()
                .method("OPTIONS")
                .uri("/api/v1/simulate")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap()
        };

        let allowed = router
            .clone()
            .oneshot(preflight("https://app.example"))
            .await
            .unwrap();
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.example"
        );
        let methods = allowed.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap();
        assert!(methods.contains("GET") && methods.contains("POST"));

        let denied = router.oneshot(preflight("https://evil.example")).await.unwrap();
        assert!(denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_app_state_uses_engine_config() {
        let config = ServerConfig {
            parallel: false,
            ..Default::default()
        };
        let state = AppState::new(Arc::new(config));

        assert!(!state.engine.config().parallel);
        assert_eq!(state.config.port, 8080);
    }
}
