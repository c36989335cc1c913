// Library crate for the parlor game server
// This file exposes the public API for integration tests

pub mod event;
pub mod game;
pub mod room;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use event::{EventBus, GameOutcome, LoggingOutcomeReporter, OutcomeReporter, RoomEvent};
pub use game::{GameError, GameState, GameType};
pub use room::{models::Room, RoomRegistry, RoomService};
pub use shared::{AppError, AppState};
pub use user::{IdentityProvider, InMemoryIdentityProvider, UserIdentity};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Builds the full application router over the given state
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/register", post(user::register))
        .route("/rooms", post(room::create_room).get(room::list_rooms))
        .route("/rooms/mine", get(room::list_my_rooms))
        .route("/rooms/join", post(room::join_room))
        .route("/rooms/code/:code", get(room::get_room_by_code))
        .route("/rooms/:id", get(room::get_room))
        .route("/rooms/:id/leave", post(room::leave_room))
        .route("/rooms/:id/start", post(room::start_game))
        .route("/rooms/:id/play", post(room::play_card))
        .route("/rooms/:id/draw", post(room::draw_card))
        .route("/rooms/:id/move", post(room::update_board))
        .route("/rooms/:id/replay", post(room::request_replay))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
