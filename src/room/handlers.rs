use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use tracing::{info, instrument};

use super::models::Room;
use super::types::{
    BoardMoveRequest, CreateRoomRequest, JoinRoomRequest, PlayCardRequest, RoomSummary,
};
use crate::shared::{AppError, AppState};
use crate::user::authenticate;

/// HTTP handler for creating a new room
///
/// POST /rooms
/// Returns the full room, including the invite code to share
#[instrument(name = "create_room", skip(state, headers, request))]
pub async fn create_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateRoomRequest>,
) -> Result<Json<Room>, AppError> {
    let user = authenticate(&state, &headers).await?;
    let room = state.room_service.create_room(&user, request).await?;

    info!(
        room_id = room.id,
        invite_code = %room.invite_code,
        host = %room.host_username,
        "Room created successfully"
    );
    Ok(Json(room))
}

/// HTTP handler for listing all rooms
///
/// GET /rooms
#[instrument(name = "list_rooms", skip(state))]
pub async fn list_rooms(State(state): State<AppState>) -> Json<Vec<RoomSummary>> {
    Json(state.room_service.list_rooms().await)
}

/// HTTP handler for listing the caller's rooms
///
/// GET /rooms/mine
#[instrument(name = "list_my_rooms", skip(state, headers))]
pub async fn list_my_rooms(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoomSummary>>, AppError> {
    let user = authenticate(&state, &headers).await?;
    Ok(Json(
        state.room_service.list_rooms_for_player(&user.username).await,
    ))
}

/// HTTP handler for fetching one room by id
///
/// GET /rooms/:id
#[instrument(name = "get_room", skip(state))]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<u64>,
) -> Result<Json<Room>, AppError> {
    Ok(Json(state.room_service.get_room(room_id).await?))
}

/// HTTP handler for looking a room up by invite code
///
/// GET /rooms/code/:code
#[instrument(name = "get_room_by_code", skip(state))]
pub async fn get_room_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Room>, AppError> {
    Ok(Json(state.room_service.get_room_by_code(&code).await?))
}

/// HTTP handler for joining a room by invite code
///
/// POST /rooms/join
/// Filling the room auto-starts the game in the same request
#[instrument(name = "join_room", skip(state, headers, request))]
pub async fn join_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<JoinRoomRequest>,
) -> Result<Json<Room>, AppError> {
    let user = authenticate(&state, &headers).await?;
    let room = state
        .room_service
        .join_room(&user, &request.invite_code)
        .await?;

    info!(room_id = room.id, player = %user.username, status = %room.status, "Player joined room");
    Ok(Json(room))
}

/// HTTP handler for leaving a room
///
/// POST /rooms/:id/leave
/// Returns the surviving room, or null when the room was destroyed
#[instrument(name = "leave_room", skip(state, headers))]
pub async fn leave_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(room_id): Path<u64>,
) -> Result<Json<Option<Room>>, AppError> {
    let user = authenticate(&state, &headers).await?;
    Ok(Json(state.room_service.leave_room(&user, room_id).await?))
}

/// HTTP handler for the host's explicit start command
///
/// POST /rooms/:id/start
#[instrument(name = "start_game", skip(state, headers))]
pub async fn start_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(room_id): Path<u64>,
) -> Result<Json<Room>, AppError> {
    let user = authenticate(&state, &headers).await?;
    Ok(Json(state.room_service.start_game(&user, room_id).await?))
}

/// HTTP handler for an UNO card play
///
/// POST /rooms/:id/play
#[instrument(name = "play_card", skip(state, headers, request))]
pub async fn play_card(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(room_id): Path<u64>,
    Json(request): Json<PlayCardRequest>,
) -> Result<Json<Room>, AppError> {
    let user = authenticate(&state, &headers).await?;
    Ok(Json(
        state.room_service.play_card(&user, room_id, request).await?,
    ))
}

/// HTTP handler for an UNO voluntary draw
///
/// POST /rooms/:id/draw
#[instrument(name = "draw_card", skip(state, headers))]
pub async fn draw_card(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(room_id): Path<u64>,
) -> Result<Json<Room>, AppError> {
    let user = authenticate(&state, &headers).await?;
    Ok(Json(state.room_service.draw_card(&user, room_id).await?))
}

/// HTTP handler for a board-state move submission
///
/// POST /rooms/:id/move
#[instrument(name = "update_board", skip(state, headers, request))]
pub async fn update_board(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(room_id): Path<u64>,
    Json(request): Json<BoardMoveRequest>,
) -> Result<Json<Room>, AppError> {
    let user = authenticate(&state, &headers).await?;
    Ok(Json(
        state
            .room_service
            .update_board(&user, room_id, request)
            .await?,
    ))
}

/// HTTP handler for a replay request
///
/// POST /rooms/:id/replay
#[instrument(name = "request_replay", skip(state, headers))]
pub async fn request_replay(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(room_id): Path<u64>,
) -> Result<Json<Room>, AppError> {
    let user = authenticate(&state, &headers).await?;
    Ok(Json(
        state.room_service.request_replay(&user, room_id).await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes;
    use crate::shared::test_utils::test_app_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt; // for `oneshot`

    async fn register(app: &axum::Router, username: &str) -> String {
        let request = Request::builder()
            .method("POST")
            .uri("/register")
            .header("content-type", "application/json")
            .body(Body::from(format!(r#"{{"username": "{username}"}}"#)))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        parsed["token"].as_str().unwrap().to_string()
    }

    async fn send(
        app: &axum::Router,
        method: &str,
        uri: &str,
        token: &str,
        body: &str,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_create_room_handler() {
        let app = routes(test_app_state());
        let token = register(&app, "alice").await;

        let (status, room) = send(
            &app,
            "POST",
            "/rooms",
            &token,
            r#"{"gameType": "TIC_TAC_TOE"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(room["status"], "WAITING");
        assert_eq!(room["hostUsername"], "alice");
        assert_eq!(room["inviteCode"].as_str().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_create_room_requires_token() {
        let app = routes(test_app_state());
        let request = Request::builder()
            .method("POST")
            .uri("/rooms")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"gameType": "UNO"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_join_by_code_auto_starts_when_full() {
        let app = routes(test_app_state());
        let host = register(&app, "alice").await;
        let guest = register(&app, "bob").await;

        let (_, room) = send(&app, "POST", "/rooms", &host, r#"{"gameType": "CHESS"}"#).await;
        let code = room["inviteCode"].as_str().unwrap();

        let (status, joined) = send(
            &app,
            "POST",
            "/rooms/join",
            &guest,
            &format!(r#"{{"inviteCode": "{code}"}}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(joined["status"], "PLAYING");
        assert_eq!(joined["currentPlayerUsername"], "alice");
        assert_eq!(joined["gameState"]["game"], "CHESS");
    }

    #[tokio::test]
    async fn test_join_unknown_code_is_404() {
        let app = routes(test_app_state());
        let token = register(&app, "bob").await;

        let (status, body) = send(
            &app,
            "POST",
            "/rooms/join",
            &token,
            r#"{"inviteCode": "XXXXXX"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Room not found");
    }

    #[tokio::test]
    async fn test_out_of_turn_move_is_conflict() {
        let app = routes(test_app_state());
        let host = register(&app, "alice").await;
        let guest = register(&app, "bob").await;

        let (_, room) = send(
            &app,
            "POST",
            "/rooms",
            &host,
            r#"{"gameType": "TIC_TAC_TOE"}"#,
        )
        .await;
        let code = room["inviteCode"].as_str().unwrap();
        let room_id = room["id"].as_u64().unwrap();
        send(
            &app,
            "POST",
            "/rooms/join",
            &guest,
            &format!(r#"{{"inviteCode": "{code}"}}"#),
        )
        .await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/rooms/{room_id}/move"),
            &guest,
            r#"{
                "game": "TIC_TAC_TOE",
                "board": [null, null, null, null, "O", null, null, null, null],
                "nextTurn": "X"
            }"#,
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Not your turn");
    }
}
