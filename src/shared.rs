use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::event::{EventBus, OutcomeReporter};
use crate::game::GameError;
use crate::room::registry::RoomRegistry;
use crate::room::service::RoomService;
use crate::user::IdentityProvider;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub room_service: Arc<RoomService>,
    pub identity: Arc<dyn IdentityProvider>,
    pub event_bus: EventBus,
}

impl AppState {
    pub fn new(
        registry: Arc<RoomRegistry>,
        identity: Arc<dyn IdentityProvider>,
        reporter: Arc<dyn OutcomeReporter>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            room_service: Arc::new(RoomService::new(registry, event_bus.clone(), reporter)),
            identity,
            event_bus,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Room is not joinable: {0}")]
    RoomNotJoinable(String),

    #[error("Room is full")]
    RoomFull,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::RoomNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::RoomNotJoinable(_) | AppError::RoomFull => {
                (StatusCode::CONFLICT, self.to_string())
            }
            AppError::Unauthorized(_) => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Game(e) => (StatusCode::CONFLICT, e.to_string()),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
