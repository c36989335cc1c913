use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::seat_pair;
use crate::game::{GameError, GameState};
use crate::room::models::{Room, RoomStatus};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
pub enum Mark {
    X,
    O,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicTacToeWinner {
    X,
    O,
    #[serde(rename = "draw")]
    Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicTacToeState {
    /// Flat 9-cell board, row-major
    pub board: Vec<Option<Mark>>,
    /// Mark -> username; host always plays X
    pub x: String,
    pub o: String,
    pub turn: Mark,
    pub winner: Option<TicTacToeWinner>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicTacToeMove {
    pub board: Vec<Option<Mark>>,
    pub next_turn: Mark,
    #[serde(default)]
    pub winner: Option<TicTacToeWinner>,
}

/// Empty 9-cell board, host is X and moves first
pub fn start(room: &mut Room) {
    let (host, guest) = seat_pair(room);
    room.game_state = Some(GameState::TicTacToe(TicTacToeState {
        board: vec![None; 9],
        x: host.clone(),
        o: guest,
        turn: Mark::X,
        winner: None,
    }));
    room.status = RoomStatus::Playing;
    room.set_current_player_by_name(&host);
}

pub fn apply_move(room: &mut Room, mv: TicTacToeMove) -> Result<(), GameError> {
    if mv.board.len() != 9 {
        return Err(GameError::InvalidMove);
    }

    let Some(GameState::TicTacToe(state)) = room.game_state.as_mut() else {
        return Err(GameError::InvalidMove);
    };

    state.board = mv.board;
    state.turn = mv.next_turn;
    let next_player = match mv.next_turn {
        Mark::X => state.x.clone(),
        Mark::O => state.o.clone(),
    };

    let mut finished = false;
    let mut credited: Option<String> = None;
    if let Some(winner) = mv.winner {
        state.winner = Some(winner);
        finished = true;
        credited = match winner {
            TicTacToeWinner::X => Some(state.x.clone()),
            TicTacToeWinner::O => Some(state.o.clone()),
            TicTacToeWinner::Draw => None,
        };
    }

    room.set_current_player_by_name(&next_player);
    if finished {
        room.record_finish(credited.as_deref());
    }
    Ok(())
}
