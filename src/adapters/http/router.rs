//! Top-level router assembly.

use std::time::Duration;

use axum::{middleware, Router};
use http::{header, HeaderName, HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::health::{health_routes, HealthState};
use super::middleware::{auth_middleware, AuthState, REQUEST_ID_HEADER};
use super::session::{session_routes, SessionHandlers};

/// Cross-cutting HTTP settings.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub request_timeout: Duration,

    /// Allowed browser origins; `*` alone allows any, empty disables CORS.
    pub cors_origins: Vec<String>,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }
}

/// Assembles the full application router.
///
/// Session routes sit behind the auth middleware; health routes do not.
pub fn build_router(
    sessions: SessionHandlers,
    health: HealthState,
    auth: AuthState,
    settings: &RouterSettings,
) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let api = session_routes(sessions)
        .layer(middleware::from_fn_with_state(auth, auth_middleware));

    Router::new()
        .nest("/sessions", api)
        .merge(health_routes(health))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(settings.request_timeout))
                .layer(build_cors_layer(&settings.cors_origins)),
        )
}

fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        return cors;
    }
    if origins.len() == 1 && origins[0] == "*" {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) if origin != "*" => Some(value),
            _ => {
                tracing::error!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        tracing::warn!("all configured CORS origins were invalid; disabling CORS");
        cors
    } else {
        tracing::info!(origins = ?origins, "CORS configured");
        // Credentials let the browser send the session cookie
        cors.allow_origin(AllowOrigin::list(allowed))
            .allow_credentials(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::auth::MockIdentity;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemorySessionStore;

    fn app(settings: RouterSettings) -> Router {
        let store = Arc::new(InMemorySessionStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        build_router(
            SessionHandlers::from_ports(store.clone(), store.clone(), bus),
            HealthState::new(store),
            AuthState::new(Arc::new(MockIdentity::new()), "token"),
            &settings,
        )
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let response = app(RouterSettings::default())
            .oneshot(Request::builder().uri("/container-health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn caller_supplied_request_id_is_kept() {
        let response = app(RouterSettings::default())
            .oneshot(
                Request::builder()
                    .uri("/container-health")
                    .header(REQUEST_ID_HEADER, "req-abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-abc");
    }

    #[tokio::test]
    async fn configured_origin_gets_cors_headers() {
        let settings = RouterSettings {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };

        let response = app(settings)
            .oneshot(
                Request::builder()
                    .uri("/sessions")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
    }
}
