use serde::{Deserialize, Serialize};

use super::models::{Room, RoomSettings, RoomStatus};
use crate::game::board::{CheckersMove, ChessMove, ConnectFourMove, TicTacToeMove};
use crate::game::uno::Color;
use crate::game::GameType;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub game_type: GameType,
    /// Defaults to the game's upper player bound when omitted
    #[serde(default)]
    pub max_players: Option<usize>,
    #[serde(default)]
    pub settings: Option<RoomSettings>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    pub invite_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayCardRequest {
    pub card_id: String,
    /// Required when the played card is wild
    #[serde(default)]
    pub chosen_color: Option<Color>,
}

/// Full-board move submission for the client-driven engines, tagged the
/// same way the state blob is so a payload names the game it belongs to
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "game", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardMoveRequest {
    Checkers(CheckersMove),
    Chess(ChessMove),
    TicTacToe(TicTacToeMove),
    ConnectFour(ConnectFourMove),
}

impl BoardMoveRequest {
    pub fn game_type(&self) -> GameType {
        match self {
            BoardMoveRequest::Checkers(_) => GameType::Checkers,
            BoardMoveRequest::Chess(_) => GameType::Chess,
            BoardMoveRequest::TicTacToe(_) => GameType::TicTacToe,
            BoardMoveRequest::ConnectFour(_) => GameType::ConnectFour,
        }
    }
}

/// Slim room listing entry, without the game-state blob
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: u64,
    pub invite_code: String,
    pub game_type: GameType,
    pub host_username: String,
    pub status: RoomStatus,
    pub player_count: usize,
    pub max_players: usize,
    pub games_played: u32,
}

impl From<&Room> for RoomSummary {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id,
            invite_code: room.invite_code.clone(),
            game_type: room.game_type,
            host_username: room.host_username.clone(),
            status: room.status,
            player_count: room.player_count(),
            max_players: room.max_players,
            games_played: room.games_played,
        }
    }
}
