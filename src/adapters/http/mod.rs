//! HTTP adapter - REST API for the solving flows.
//!
//! [`app_router`] assembles the routes with the cross-cutting layers:
//! request ids, tracing, CORS, request timeout and body limit.

pub mod solve;

pub use solve::{solve_routes, FlowSettingsSet, SolveAppState};

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use http::{header, HeaderName, HeaderValue, Method, Request};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Builds the application router.
pub fn app_router(state: SolveAppState, config: &ServerConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(solve::REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(cors_layer(&config.cors_origins_list()))
        .layer(TimeoutLayer::new(config.request_timeout()));

    solve_routes()
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(middleware)
        .with_state(state)
}

/// CORS for the configured origins; any origin when none are configured.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(solve::REQUEST_ID_HEADER),
        ]);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(allowed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::ocr::MockOcr;

    #[test]
    fn router_builds_with_default_config() {
        let state = SolveAppState::new(
            Arc::new(MockAIProvider::new()),
            Arc::new(MockOcr::new()),
            FlowSettingsSet::default(),
        );
        let _router = app_router(state, &ServerConfig::default());
    }

    #[test]
    fn cors_layer_skips_invalid_origins() {
        let origins = vec!["https://app.example.com".to_string(), "bad\norigin".to_string()];
        let _layer = cors_layer(&origins);
    }
}
