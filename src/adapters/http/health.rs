//! Liveness and readiness endpoints.
//!
//! `GET /health` pings the store with a bounded timeout and keeps running
//! counters of check outcomes. `GET /container-health` never touches the
//! store and is meant for the container runtime's liveness probe.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::ports::SessionStore;

/// Upper bound on a single store ping.
pub const PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Outcome counters shared across health checks.
#[derive(Debug, Default)]
pub struct HealthCounters {
    total: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
    last_failure: Mutex<Option<String>>,
}

impl HealthCounters {
    fn record_success(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.successful.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self, reason: &str) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.failed.fetch_add(1, Ordering::Relaxed);
        let mut last = self
            .last_failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *last = Some(reason.to_string());
    }

    pub fn snapshot(&self) -> HealthHistory {
        HealthHistory {
            total_checks: self.total.load(Ordering::Relaxed),
            successful_checks: self.successful.load(Ordering::Relaxed),
            failed_checks: self.failed.load(Ordering::Relaxed),
            last_failure_reason: self
                .last_failure
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone(),
        }
    }
}

#[derive(Clone)]
pub struct HealthState {
    store: Arc<dyn SessionStore>,
    counters: Arc<HealthCounters>,
    started_at: Instant,
    ping_timeout: Duration,
}

impl HealthState {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            counters: Arc::new(HealthCounters::default()),
            started_at: Instant::now(),
            ping_timeout: PING_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_ping_timeout(mut self, timeout: Duration) -> Self {
        self.ping_timeout = timeout;
        self
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HealthParams {
    #[serde(default)]
    pub simple: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthHistory {
    pub total_checks: u64,
    pub successful_checks: u64,
    pub failed_checks: u64,
    pub last_failure_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseHealth {
    pub status: String,
    pub query_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    pub timestamp: String,
    pub uptime_secs: u64,
    pub database: DatabaseHealth,
    pub health_history: HealthHistory,
}

/// GET /health
pub async fn health(
    State(state): State<HealthState>,
    Query(params): Query<HealthParams>,
) -> Response {
    let started = Instant::now();
    let outcome = match tokio::time::timeout(state.ping_timeout, state.store.ping()).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!(
            "database ping timed out after {}ms",
            state.ping_timeout.as_millis()
        )),
    };
    let query_time_ms = started.elapsed().as_millis() as u64;

    match &outcome {
        Ok(()) => state.counters.record_success(),
        Err(reason) => {
            tracing::warn!(reason = %reason, "health check failed");
            state.counters.record_failure(reason);
        }
    }

    let healthy = outcome.is_ok();
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    if params.simple {
        let body = if healthy { "OK" } else { "Service Unavailable" };
        return (status, body).into_response();
    }

    let report = HealthReport {
        status: if healthy { "ok" } else { "error" }.to_string(),
        timestamp: Timestamp::now().to_rfc3339(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        database: DatabaseHealth {
            status: if healthy { "connected" } else { "disconnected" }.to_string(),
            query_time_ms,
            error: outcome.err(),
        },
        health_history: state.counters.snapshot(),
    };

    (status, Json(report)).into_response()
}

/// GET /container-health
pub async fn container_health() -> &'static str {
    "OK"
}

pub fn health_routes(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/container-health", get(container_health))
        .with_state(state)
}
