//! Integration tests for the game night HTTP API.
//!
//! Drives the full router (auth middleware, request ids, session and health
//! routes) over the in-memory store with fixed test tokens.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tower::ServiceExt;

use game_night::adapters::http::middleware::AuthState;
use game_night::adapters::http::session::{
    ErrorResponse, JoinResponse, MessageResponse, SessionDirectoryResponse,
    SessionListingResponse, SessionResponse,
};
use game_night::adapters::http::{build_router, HealthState, RouterSettings, SessionHandlers};
use game_night::adapters::{InMemoryEventBus, InMemorySessionStore, MockIdentity};
use game_night::domain::foundation::{SessionId, Timestamp, UserId};
use game_night::domain::session::{AttendanceStatus, Session};
use game_night::ports::SessionStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    store: Arc<InMemorySessionStore>,
    bus: Arc<InMemoryEventBus>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(InMemorySessionStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let identity = MockIdentity::new()
            .with_test_user("host-token", "host")
            .with_test_user("u1-token", "u1")
            .with_test_user("u2-token", "u2")
            .with_test_user("u3-token", "u3")
            .with_test_user("u4-token", "u4");

        let router = build_router(
            SessionHandlers::from_ports(store.clone(), store.clone(), bus.clone()),
            HealthState::new(store.clone()),
            AuthState::new(Arc::new(identity), "token"),
            &RouterSettings::default(),
        );

        Self { router, store, bus }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn create_session(&self, minutes_from_now: i64, capacity: u32) -> String {
        let start = Timestamp::now().plus_minutes(minutes_from_now);
        let (status, body) = self
            .send(
                Method::POST,
                "/sessions",
                Some("host-token"),
                Some(json!({
                    "start_time": start.to_rfc3339(),
                    "address": "12 Meeple Lane",
                    "capacity": capacity,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", String::from_utf8_lossy(&body));
        parse::<SessionResponse>(&body).id
    }

    async fn join(&self, session_id: &str, token: &str) -> (StatusCode, Vec<u8>) {
        self.send(
            Method::POST,
            &format!("/sessions/{}/join", session_id),
            Some(token),
            None,
        )
        .await
    }

    async fn leave(&self, session_id: &str, token: &str) -> (StatusCode, Vec<u8>) {
        self.send(
            Method::POST,
            &format!("/sessions/{}/leave", session_id),
            Some(token),
            None,
        )
        .await
    }

    async fn detail(&self, session_id: &str, token: Option<&str>) -> SessionListingResponse {
        let (status, body) = self
            .send(Method::GET, &format!("/sessions/{}", session_id), token, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        parse(&body)
    }
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> T {
    serde_json::from_slice(body)
        .unwrap_or_else(|e| panic!("bad body {}: {}", String::from_utf8_lossy(body), e))
}

fn seated_users(listing: &SessionListingResponse) -> Vec<String> {
    listing
        .attendees
        .as_ref()
        .unwrap()
        .iter()
        .filter(|a| !a.is_waitlisted)
        .map(|a| a.user_id.clone())
        .collect()
}

fn waitlisted_users(listing: &SessionListingResponse) -> Vec<String> {
    listing
        .attendees
        .as_ref()
        .unwrap()
        .iter()
        .filter(|a| a.is_waitlisted)
        .map(|a| a.user_id.clone())
        .collect()
}

// =============================================================================
// Joining and the waitlist
// =============================================================================

#[tokio::test]
async fn third_join_on_capacity_two_lands_on_waitlist() {
    let app = TestApp::new();
    let id = app.create_session(120, 2).await;

    let (status, body) = app.join(&id, "u1-token").await;
    assert_eq!(status, StatusCode::OK);
    let first: JoinResponse = parse(&body);
    assert_eq!(first.message, "Successfully joined game");
    assert_eq!(first.attendance.status, AttendanceStatus::Active);

    let (status, _) = app.join(&id, "u2-token").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.join(&id, "u3-token").await;
    assert_eq!(status, StatusCode::OK);
    let third: JoinResponse = parse(&body);
    assert_eq!(third.message, "Added to waitlist");
    assert!(third.attendance.is_waitlisted);

    let listing = app.detail(&id, None).await;
    assert_eq!(listing.seated_count, 2);
    assert_eq!(listing.waitlist_count, 1);
    assert_eq!(app.bus.events_of_type("attendee.registered.v1").len(), 3);
}

#[tokio::test]
async fn seated_leave_promotes_waitlist_head() {
    let app = TestApp::new();
    let id = app.create_session(120, 2).await;
    for token in ["u1-token", "u2-token", "u3-token"] {
        app.join(&id, token).await;
    }

    let (status, body) = app.leave(&id, "u1-token").await;

    assert_eq!(status, StatusCode::OK);
    let message: MessageResponse = parse(&body);
    assert_eq!(message.message, "Successfully left game");

    let listing = app.detail(&id, None).await;
    assert_eq!(seated_users(&listing), vec!["u2", "u3"]);
    assert!(waitlisted_users(&listing).is_empty());
    assert!(app.bus.has_event("attendee.promoted.v1"));
}

#[tokio::test]
async fn waitlisted_leave_promotes_nobody() {
    let app = TestApp::new();
    let id = app.create_session(120, 1).await;
    for token in ["u1-token", "u2-token", "u3-token"] {
        app.join(&id, token).await;
    }

    let (status, _) = app.leave(&id, "u2-token").await;

    assert_eq!(status, StatusCode::OK);
    let listing = app.detail(&id, None).await;
    assert_eq!(seated_users(&listing), vec!["u1"]);
    assert_eq!(waitlisted_users(&listing), vec!["u3"]);
    assert!(!app.bus.has_event("attendee.promoted.v1"));
}

#[tokio::test]
async fn promotions_follow_join_order() {
    let app = TestApp::new();
    let id = app.create_session(120, 1).await;
    for token in ["u1-token", "u2-token", "u3-token", "u4-token"] {
        app.join(&id, token).await;
    }

    app.leave(&id, "u1-token").await;
    let listing = app.detail(&id, None).await;
    assert_eq!(seated_users(&listing), vec!["u2"]);

    app.leave(&id, "u2-token").await;
    let listing = app.detail(&id, None).await;
    assert_eq!(seated_users(&listing), vec!["u3"]);
    assert_eq!(waitlisted_users(&listing), vec!["u4"]);
}

#[tokio::test]
async fn join_three_minutes_before_start_is_rejected() {
    let app = TestApp::new();
    let id = app.create_session(3, 4).await;

    let (status, body) = app.join(&id, "u1-token").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.code, "JOIN_WINDOW_CLOSED");
    assert_eq!(app.detail(&id, None).await.seated_count, 0);
}

#[tokio::test]
async fn joining_twice_is_rejected_without_a_second_row() {
    let app = TestApp::new();
    let id = app.create_session(120, 4).await;
    app.join(&id, "u1-token").await;

    let (status, body) = app.join(&id, "u1-token").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).code, "ALREADY_REGISTERED");
    assert_eq!(app.detail(&id, None).await.seated_count, 1);
}

#[tokio::test]
async fn leaving_without_registration_is_rejected() {
    let app = TestApp::new();
    let id = app.create_session(120, 4).await;

    let (status, body) = app.leave(&id, "u1-token").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).code, "NOT_REGISTERED");
}

// =============================================================================
// Host removal
// =============================================================================

#[tokio::test]
async fn host_removal_promotes_waitlist_head() {
    let app = TestApp::new();
    let id = app.create_session(120, 2).await;
    for token in ["u1-token", "u2-token", "u3-token"] {
        app.join(&id, token).await;
    }
    let listing = app.detail(&id, Some("host-token")).await;
    assert!(listing.is_host);
    let u2 = listing
        .attendees
        .unwrap()
        .into_iter()
        .find(|a| a.user_id == "u2")
        .unwrap();

    let (status, body) = app
        .send(
            Method::DELETE,
            &format!("/sessions/{}/attendees/{}", id, u2.attendance_id),
            Some("host-token"),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        parse::<MessageResponse>(&body).message,
        "Attendee removed successfully"
    );
    let listing = app.detail(&id, None).await;
    assert_eq!(seated_users(&listing), vec!["u1", "u3"]);
}

#[tokio::test]
async fn non_host_cannot_remove_attendees() {
    let app = TestApp::new();
    let id = app.create_session(120, 2).await;
    app.join(&id, "u1-token").await;
    let attendee = app.detail(&id, None).await.attendees.unwrap().remove(0);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/sessions/{}/attendees/{}", id, attendee.attendance_id),
            Some("u2-token"),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.detail(&id, None).await.seated_count, 1);
}

#[tokio::test]
async fn removing_unknown_attendee_returns_404() {
    let app = TestApp::new();
    let id = app.create_session(120, 2).await;

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!(
                "/sessions/{}/attendees/{}",
                id,
                game_night::domain::foundation::AttendanceId::new()
            ),
            Some("host-token"),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Authentication and addressing
// =============================================================================

#[tokio::test]
async fn mutations_require_authentication() {
    let app = TestApp::new();
    let id = app.create_session(120, 2).await;

    let (status, body) = app
        .send(Method::POST, &format!("/sessions/{}/join", id), None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parse::<Value>(&body)["code"], "UNAUTHENTICATED");

    let (status, _) = app
        .send(Method::POST, &format!("/sessions/{}/join", id), Some("bogus"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_cookie_authenticates() {
    let app = TestApp::new();
    let id = app.create_session(120, 2).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/sessions/{}/join", id))
        .header(header::COOKIE, "theme=dark; token=u1-token")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_session_returns_404() {
    let app = TestApp::new();

    let (status, body) = app
        .join(&SessionId::new().to_string(), "u1-token")
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse::<ErrorResponse>(&body).code, "NOT_FOUND");
}

#[tokio::test]
async fn malformed_session_id_returns_400() {
    let app = TestApp::new();

    let (status, body) = app.join("not-a-uuid", "u1-token").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).message, "Invalid session ID");
}

// =============================================================================
// Creating and listing
// =============================================================================

#[tokio::test]
async fn create_rejects_invalid_capacity() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/sessions",
            Some("host-token"),
            Some(json!({
                "start_time": Timestamp::now().plus_minutes(60).to_rfc3339(),
                "address": "12 Meeple Lane",
                "capacity": 0,
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.code, "VALIDATION_FAILED");
    assert_eq!(error.details.unwrap()["field"], "capacity");
}

#[tokio::test]
async fn create_rejects_malformed_bodies_with_json_errors() {
    let app = TestApp::new();
    let start = Timestamp::now().plus_minutes(60).to_rfc3339();

    for body in [
        json!({ "start_time": start, "capacity": 3 }),
        json!({ "start_time": "tomorrow", "address": "12 Meeple Lane", "capacity": 3 }),
        json!({ "start_time": start, "address": "12 Meeple Lane", "capacity": -1 }),
    ] {
        let (status, response) = app
            .send(Method::POST, "/sessions", Some("host-token"), Some(body.clone()))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        let error: ErrorResponse = parse(&response);
        assert_eq!(error.code, "VALIDATION_FAILED");
        assert!(!error.message.contains("deserialize"));
    }

    assert!(app.bus.events_of_type("session.scheduled.v1").is_empty());
}

#[tokio::test]
async fn listing_splits_upcoming_and_past_for_the_viewer() {
    let app = TestApp::new();
    let later = app.create_session(240, 3).await;
    let sooner = app.create_session(60, 3).await;
    app.join(&sooner, "u1-token").await;

    let past_start = Timestamp::now().minus_minutes(120);
    let past = Session::reconstitute(
        SessionId::new(),
        UserId::new("host").unwrap(),
        past_start,
        "Old Hall".to_string(),
        4,
        past_start.minus_minutes(600),
    );
    app.store.create_session(&past).await.unwrap();

    let (status, body) = app.send(Method::GET, "/sessions", Some("u1-token"), None).await;

    assert_eq!(status, StatusCode::OK);
    let directory: SessionDirectoryResponse = parse(&body);
    let upcoming: Vec<_> = directory.upcoming.iter().map(|s| s.id.clone()).collect();
    assert_eq!(upcoming, vec![sooner, later]);
    assert!(directory.upcoming[0].is_attending);
    assert!(!directory.upcoming[1].is_attending);
    assert!(directory.upcoming[0].attendees.is_some());

    assert_eq!(directory.past.len(), 1);
    assert!(directory.past[0].attendees.is_none());
}

#[tokio::test]
async fn anonymous_listing_has_no_viewer_flags() {
    let app = TestApp::new();
    app.create_session(60, 3).await;

    let (status, body) = app.send(Method::GET, "/sessions", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let directory: SessionDirectoryResponse = parse(&body);
    assert!(!directory.upcoming[0].is_host);
    assert!(!directory.upcoming[0].is_attending);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reflects_store_availability() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/health?simple=true", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");

    app.store.set_unavailable(true);
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(parse::<Value>(&body)["status"], "error");

    let (status, _) = app.send(Method::GET, "/container-health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
