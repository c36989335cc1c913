use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tracing::{debug, info, instrument};

use super::models::{Room, RoomStatus};
use super::registry::RoomRegistry;
use super::types::{BoardMoveRequest, CreateRoomRequest, PlayCardRequest, RoomSummary};
use crate::event::{EventBus, GameOutcome, OutcomeReporter, RoomEvent};
use crate::game::board::{checkers, chess, connectfour, tictactoe};
use crate::game::{uno, GameError, GameState, GameType, HostLeavePolicy, ReplayPolicy};
use crate::shared::AppError;
use crate::user::UserIdentity;

/// Service for handling room business logic
///
/// Every mutating method locks exactly one room for the duration of its
/// read-modify-write; events and outcome reporting happen after the lock
/// is released so collaborators can never stall a room.
pub struct RoomService {
    registry: Arc<RoomRegistry>,
    event_bus: EventBus,
    reporter: Arc<dyn OutcomeReporter>,
}

impl RoomService {
    pub fn new(
        registry: Arc<RoomRegistry>,
        event_bus: EventBus,
        reporter: Arc<dyn OutcomeReporter>,
    ) -> Self {
        Self {
            registry,
            event_bus,
            reporter,
        }
    }

    /// Creates a new room with the caller as host
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn create_room(
        &self,
        user: &UserIdentity,
        request: CreateRoomRequest,
    ) -> Result<Room, AppError> {
        let bounds = request.game_type.player_bounds();
        let max_players = request.max_players.unwrap_or(*bounds.end());
        if !bounds.contains(&max_players) {
            return Err(AppError::BadRequest(format!(
                "{} supports {} to {} players",
                request.game_type,
                bounds.start(),
                bounds.end()
            )));
        }

        let settings = request.settings.unwrap_or_default();
        let game_type = request.game_type;
        let handle = self
            .registry
            .insert_with(|id, code| {
                Room::new(
                    id,
                    code,
                    game_type,
                    &user.username,
                    &user.display_name,
                    max_players,
                    settings,
                )
            })
            .await?;

        let snapshot = handle.lock().await.clone();
        info!(
            room_id = snapshot.id,
            invite_code = %snapshot.invite_code,
            game_type = %snapshot.game_type,
            "Room created"
        );
        self.event_bus
            .emit(RoomEvent::RoomCreated {
                room_id: snapshot.id,
                invite_code: snapshot.invite_code.clone(),
                game_type: snapshot.game_type,
                host: snapshot.host_username.clone(),
            })
            .await;
        Ok(snapshot)
    }

    /// Joins a room by invite code; filling the room auto-starts the game
    /// before this call returns
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn join_room(&self, user: &UserIdentity, code: &str) -> Result<Room, AppError> {
        let handle = self
            .registry
            .get_by_code(code)
            .await
            .ok_or(AppError::RoomNotFound)?;

        let mut events = Vec::new();
        let snapshot = {
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            if room.has_player(&user.username) {
                // Idempotent rejoin
                return Ok(room.clone());
            }
            if room.status != RoomStatus::Waiting {
                return Err(AppError::RoomNotJoinable(format!(
                    "room is {}",
                    room.status
                )));
            }
            // Filling auto-starts, so a full room normally leaves WAITING in
            // the same critical section that filled it; the guard covers any
            // other path that seats a player
            if room.is_full() {
                return Err(AppError::RoomFull);
            }

            room.add_player(&user.username, &user.display_name);
            room.touch();
            events.push(RoomEvent::PlayerJoined {
                room_id: room.id,
                player: user.username.clone(),
                current_players: room.usernames(),
            });

            if room.is_full() {
                start_engine(&mut room)?;
                info!(room_id = room.id, "Room filled, game auto-started");
                events.push(RoomEvent::GameStarted {
                    room_id: room.id,
                    game_type: room.game_type,
                    players: room.usernames(),
                });
            }
            room.clone()
        };

        for event in events {
            self.event_bus.emit(event).await;
        }
        Ok(snapshot)
    }

    /// Removes a player; returns None when the room was destroyed
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn leave_room(
        &self,
        user: &UserIdentity,
        room_id: u64,
    ) -> Result<Option<Room>, AppError> {
        let handle = self.registry.get(room_id).await.ok_or(AppError::RoomNotFound)?;

        let mut events = Vec::new();
        let (snapshot, destroy) = {
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            if !room.has_player(&user.username) {
                return Err(AppError::BadRequest(
                    "player is not a member of this room".to_string(),
                ));
            }
            let was_host = room.is_host(&user.username);
            room.remove_player(&user.username);
            room.touch();
            events.push(RoomEvent::PlayerLeft {
                room_id: room.id,
                player: user.username.clone(),
                remaining_players: room.usernames(),
            });

            let destroy = if room.player_count() == 0 {
                true
            } else if was_host {
                match room.game_type.host_leave_policy() {
                    HostLeavePolicy::TransferHost => {
                        room.transfer_host();
                        events.push(RoomEvent::HostTransferred {
                            room_id: room.id,
                            new_host: room.host_username.clone(),
                        });
                        false
                    }
                    HostLeavePolicy::CloseRoom => true,
                }
            } else {
                false
            };

            if destroy {
                room.closed = true;
            }
            (if destroy { None } else { Some(room.clone()) }, destroy)
        };

        for event in events {
            self.event_bus.emit(event).await;
        }
        if destroy {
            self.registry.remove(room_id).await;
            self.event_bus.emit(RoomEvent::RoomClosed { room_id }).await;
            self.event_bus.close_room(room_id).await;
            info!(room_id, "Room destroyed");
        }
        Ok(snapshot)
    }

    /// Host-only explicit start, before the room fills
    ///
    /// A single-player start is allowed for development against board
    /// engines (the opposite seat reads "AI"); production rooms normally
    /// start by filling up.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn start_game(&self, user: &UserIdentity, room_id: u64) -> Result<Room, AppError> {
        let handle = self.registry.get(room_id).await.ok_or(AppError::RoomNotFound)?;

        let snapshot = {
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            if !room.is_host(&user.username) {
                return Err(AppError::Unauthorized(
                    "only the host can start the game".to_string(),
                ));
            }
            if room.status != RoomStatus::Waiting {
                return Err(AppError::BadRequest(format!(
                    "cannot start a {} room",
                    room.status
                )));
            }
            start_engine(&mut room)?;
            room.touch();
            info!(room_id = room.id, game_type = %room.game_type, "Game started by host");
            room.clone()
        };

        self.event_bus
            .emit(RoomEvent::GameStarted {
                room_id: snapshot.id,
                game_type: snapshot.game_type,
                players: snapshot.usernames(),
            })
            .await;
        Ok(snapshot)
    }

    /// UNO card play with full server-side rule enforcement
    #[instrument(skip(self, user, request), fields(username = %user.username))]
    pub async fn play_card(
        &self,
        user: &UserIdentity,
        room_id: u64,
        request: PlayCardRequest,
    ) -> Result<Room, AppError> {
        let handle = self.registry.get(room_id).await.ok_or(AppError::RoomNotFound)?;

        let snapshot = {
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            if room.game_type != GameType::Uno {
                return Err(AppError::BadRequest(
                    "card play only applies to UNO rooms".to_string(),
                ));
            }
            room.ensure_playing()?;
            room.ensure_turn(&user.username)?;
            uno::play_card(
                &mut room,
                &user.username,
                &request.card_id,
                request.chosen_color,
                &mut rand::rng(),
            )?;
            room.touch();
            room.clone()
        };

        self.after_move(&snapshot, &user.username).await;
        Ok(snapshot)
    }

    /// UNO voluntary draw; draws one card and passes the turn
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn draw_card(&self, user: &UserIdentity, room_id: u64) -> Result<Room, AppError> {
        let handle = self.registry.get(room_id).await.ok_or(AppError::RoomNotFound)?;

        let snapshot = {
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            if room.game_type != GameType::Uno {
                return Err(AppError::BadRequest(
                    "card draw only applies to UNO rooms".to_string(),
                ));
            }
            room.ensure_playing()?;
            room.ensure_turn(&user.username)?;
            uno::draw_card(&mut room, &user.username, &mut rand::rng())?;
            room.touch();
            room.clone()
        };

        self.after_move(&snapshot, &user.username).await;
        Ok(snapshot)
    }

    /// Board-state submission for the client-driven engines
    #[instrument(skip(self, user, request), fields(username = %user.username))]
    pub async fn update_board(
        &self,
        user: &UserIdentity,
        room_id: u64,
        request: BoardMoveRequest,
    ) -> Result<Room, AppError> {
        let handle = self.registry.get(room_id).await.ok_or(AppError::RoomNotFound)?;

        let snapshot = {
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            if request.game_type() != room.game_type {
                return Err(GameError::InvalidMove.into());
            }
            room.ensure_playing()?;
            room.ensure_turn(&user.username)?;
            match request {
                BoardMoveRequest::Checkers(mv) => checkers::apply_move(&mut room, mv)?,
                BoardMoveRequest::Chess(mv) => chess::apply_move(&mut room, mv)?,
                BoardMoveRequest::TicTacToe(mv) => tictactoe::apply_move(&mut room, mv)?,
                BoardMoveRequest::ConnectFour(mv) => connectfour::apply_move(&mut room, mv)?,
            }
            room.touch();
            room.clone()
        };

        self.after_move(&snapshot, &user.username).await;
        Ok(snapshot)
    }

    /// Replay request; the consent discipline depends on the game type
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn request_replay(&self, user: &UserIdentity, room_id: u64) -> Result<Room, AppError> {
        let handle = self.registry.get(room_id).await.ok_or(AppError::RoomNotFound)?;

        let mut restarted = false;
        let snapshot = {
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            if !room.has_player(&user.username) {
                return Err(AppError::Unauthorized(
                    "player is not a member of this room".to_string(),
                ));
            }
            if room.status != RoomStatus::Finished {
                return Err(AppError::BadRequest(
                    "no finished game to replay".to_string(),
                ));
            }

            match room.game_type.replay_policy() {
                ReplayPolicy::HostRestart => {
                    if !room.is_host(&user.username) {
                        return Err(AppError::Unauthorized(
                            "only the host can restart the game".to_string(),
                        ));
                    }
                    start_engine(&mut room)?;
                    restarted = true;
                }
                ReplayPolicy::MutualConsent => {
                    room.replay_votes.insert(user.username.clone());
                    debug!(
                        room_id = room.id,
                        votes = room.replay_votes.len(),
                        "Replay vote recorded"
                    );
                    if room.replay_votes.len() == room.player_count() {
                        room.replay_votes.clear();
                        start_engine(&mut room)?;
                        restarted = true;
                    }
                }
            }
            room.touch();
            room.clone()
        };

        if restarted {
            info!(room_id = snapshot.id, game_number = snapshot.games_played + 1, "Replay started");
            self.event_bus
                .emit(RoomEvent::GameStarted {
                    room_id: snapshot.id,
                    game_type: snapshot.game_type,
                    players: snapshot.usernames(),
                })
                .await;
        }
        Ok(snapshot)
    }

    pub async fn get_room(&self, room_id: u64) -> Result<Room, AppError> {
        let handle = self.registry.get(room_id).await.ok_or(AppError::RoomNotFound)?;
        let room = handle.lock().await;
        Ok(room.clone())
    }

    pub async fn get_room_by_code(&self, code: &str) -> Result<Room, AppError> {
        let handle = self
            .registry
            .get_by_code(code)
            .await
            .ok_or(AppError::RoomNotFound)?;
        let room = handle.lock().await;
        Ok(room.clone())
    }

    /// Lists all live rooms
    #[instrument(skip(self))]
    pub async fn list_rooms(&self) -> Vec<RoomSummary> {
        let mut summaries = Vec::new();
        for handle in self.registry.all().await {
            let room = handle.lock().await;
            summaries.push(RoomSummary::from(&*room));
        }
        summaries.sort_by_key(|summary| summary.id);
        summaries
    }

    /// Lists rooms the given player is currently seated in
    #[instrument(skip(self))]
    pub async fn list_rooms_for_player(&self, username: &str) -> Vec<RoomSummary> {
        let mut summaries = Vec::new();
        for handle in self.registry.all().await {
            let room = handle.lock().await;
            if room.has_player(username) {
                summaries.push(RoomSummary::from(&*room));
            }
        }
        summaries.sort_by_key(|summary| summary.id);
        summaries
    }

    /// Deletes rooms idle for longer than the threshold; returns how many
    pub async fn remove_idle_rooms(&self, threshold: Duration) -> usize {
        let mut idle_ids = Vec::new();
        for handle in self.registry.all().await {
            let mut room = handle.lock().await;
            let idle = (Utc::now() - room.last_activity_at)
                .to_std()
                .unwrap_or_default();
            if idle >= threshold {
                room.closed = true;
                idle_ids.push(room.id);
            }
        }

        let mut deleted = 0;
        for room_id in idle_ids {
            if self.registry.remove(room_id).await.is_some() {
                self.event_bus.emit(RoomEvent::RoomClosed { room_id }).await;
                self.event_bus.close_room(room_id).await;
                info!(room_id, "Deleted idle room");
                deleted += 1;
            }
        }
        deleted
    }

    /// Emits the post-move events and, on a finish, reports the outcome
    async fn after_move(&self, snapshot: &Room, actor: &str) {
        self.event_bus
            .emit(RoomEvent::MoveApplied {
                room_id: snapshot.id,
                player: actor.to_string(),
                next_player: snapshot.current_player_username.clone(),
            })
            .await;

        if snapshot.status == RoomStatus::Finished {
            let winner = winner_of(snapshot);
            self.event_bus
                .emit(RoomEvent::GameFinished {
                    room_id: snapshot.id,
                    winner: winner.clone(),
                    games_played: snapshot.games_played,
                })
                .await;
            self.reporter
                .report(GameOutcome {
                    room_id: snapshot.id,
                    game_type: snapshot.game_type,
                    players: snapshot.usernames(),
                    winner,
                    game_number: snapshot.games_played,
                    finished_at: Utc::now(),
                })
                .await;
        }
    }
}

/// A destroyed room may briefly remain reachable through a handle that was
/// resolved before its registry entry went away; mutations through such a
/// handle must observe the room as gone
fn ensure_open(room: &Room) -> Result<(), AppError> {
    if room.closed {
        return Err(AppError::RoomNotFound);
    }
    Ok(())
}

/// Dispatches to the game type's engine start
fn start_engine(room: &mut Room) -> Result<(), GameError> {
    match room.game_type {
        GameType::Uno => uno::start_game(room, &mut rand::rng()),
        GameType::Checkers => {
            checkers::start(room);
            Ok(())
        }
        GameType::Chess => {
            chess::start(room);
            Ok(())
        }
        GameType::TicTacToe => {
            tictactoe::start(room);
            Ok(())
        }
        GameType::ConnectFour => {
            connectfour::start(room);
            Ok(())
        }
    }
}

/// Username credited with the finished game, None for a draw
fn winner_of(room: &Room) -> Option<String> {
    match room.game_state.as_ref()? {
        GameState::Uno(state) => state.winners.first().cloned(),
        GameState::Checkers(state) => state.winner.map(|side| match side {
            checkers::CheckersSide::Red => state.red.clone(),
            checkers::CheckersSide::White => state.white.clone(),
        }),
        GameState::Chess(state) => match state.winner? {
            chess::ChessWinner::White => Some(state.white.clone()),
            chess::ChessWinner::Black => Some(state.black.clone()),
            chess::ChessWinner::Draw => None,
        },
        GameState::TicTacToe(state) => match state.winner? {
            tictactoe::TicTacToeWinner::X => Some(state.x.clone()),
            tictactoe::TicTacToeWinner::O => Some(state.o.clone()),
            tictactoe::TicTacToeWinner::Draw => None,
        },
        GameState::ConnectFour(state) => match state.winner? {
            connectfour::ConnectFourWinner::Red => Some(state.red.clone()),
            connectfour::ConnectFourWinner::Yellow => Some(state.yellow.clone()),
            connectfour::ConnectFourWinner::Draw => None,
        },
    }
}
