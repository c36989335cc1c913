use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use parlor::event::EventBus;
use parlor::room::{RoomRegistry, RoomService};
use parlor::shared::AppState;
use parlor::user::{InMemoryIdentityProvider, UserIdentity};
use parlor::{routes, LoggingOutcomeReporter};

/// Full application wired with in-memory collaborators, plus direct access
/// to the service layer for assertions the HTTP surface does not expose.
pub struct TestSetup {
    pub app: Router,
    pub room_service: Arc<RoomService>,
    pub event_bus: EventBus,
}

impl TestSetup {
    pub fn new() -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let event_bus = EventBus::new();
        let state = AppState::new(
            registry,
            Arc::new(InMemoryIdentityProvider::new()),
            Arc::new(LoggingOutcomeReporter),
            event_bus.clone(),
        );
        let room_service = Arc::clone(&state.room_service);
        Self {
            app: routes(state),
            room_service,
            event_bus,
        }
    }

    /// Registers a player over HTTP and returns their bearer token
    pub async fn register(&self, username: &str) -> String {
        let (status, body) = self
            .request("POST", "/register", None, &format!(r#"{{"username": "{username}"}}"#))
            .await;
        assert_eq!(status, StatusCode::OK, "registration failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Sends a JSON request, optionally authenticated, and parses the body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

pub fn identity(name: &str) -> UserIdentity {
    UserIdentity {
        username: name.to_string(),
        display_name: name.to_string(),
    }
}
