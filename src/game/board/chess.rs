use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::seat_pair;
use crate::game::{GameError, GameState};
use crate::room::models::{Room, RoomStatus};

// Piece encoding shared with the client: 0 empty, 1-6 white
// (pawn/rook/knight/bishop/queen/king), 11-16 black in the same order
pub const EMPTY: u8 = 0;
pub const W_PAWN: u8 = 1;
pub const W_ROOK: u8 = 2;
pub const W_KNIGHT: u8 = 3;
pub const W_BISHOP: u8 = 4;
pub const W_QUEEN: u8 = 5;
pub const W_KING: u8 = 6;
pub const B_PAWN: u8 = 11;
pub const B_ROOK: u8 = 12;
pub const B_KNIGHT: u8 = 13;
pub const B_BISHOP: u8 = 14;
pub const B_QUEEN: u8 = 15;
pub const B_KING: u8 = 16;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChessSide {
    White,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChessWinner {
    White,
    Black,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChessState {
    pub board: Vec<Vec<u8>>,
    /// Side -> username; host is always white
    pub white: String,
    pub black: String,
    pub turn: ChessSide,
    pub winner: Option<ChessWinner>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChessMove {
    pub board: Vec<Vec<u8>>,
    pub next_turn: ChessSide,
    #[serde(default)]
    pub winner: Option<ChessWinner>,
}

fn initial_board() -> Vec<Vec<u8>> {
    let back = |base: u8| {
        vec![
            base + 1, // rook
            base + 2, // knight
            base + 3, // bishop
            base + 4, // queen
            base + 5, // king
            base + 3,
            base + 2,
            base + 1,
        ]
    };
    let mut board = Vec::with_capacity(8);
    board.push(back(B_PAWN)); // black home row
    board.push(vec![B_PAWN; 8]);
    for _ in 0..4 {
        board.push(vec![EMPTY; 8]);
    }
    board.push(vec![W_PAWN; 8]);
    board.push(back(W_PAWN)); // white home row
    board
}

fn valid_cell(cell: u8) -> bool {
    matches!(cell, EMPTY | W_PAWN..=W_KING | B_PAWN..=B_KING)
}

fn validate_board(board: &[Vec<u8>]) -> Result<(), GameError> {
    if board.len() != 8 {
        return Err(GameError::InvalidMove);
    }
    for row in board {
        if row.len() != 8 || !row.iter().copied().all(valid_cell) {
            return Err(GameError::InvalidMove);
        }
    }
    Ok(())
}

/// Standard layout, host plays white and moves first
pub fn start(room: &mut Room) {
    let (host, guest) = seat_pair(room);
    room.game_state = Some(GameState::Chess(ChessState {
        board: initial_board(),
        white: host.clone(),
        black: guest,
        turn: ChessSide::White,
        winner: None,
    }));
    room.status = RoomStatus::Playing;
    room.set_current_player_by_name(&host);
}

pub fn apply_move(room: &mut Room, mv: ChessMove) -> Result<(), GameError> {
    validate_board(&mv.board)?;

    let Some(GameState::Chess(state)) = room.game_state.as_mut() else {
        return Err(GameError::InvalidMove);
    };

    state.board = mv.board;
    state.turn = mv.next_turn;
    let next_player = match mv.next_turn {
        ChessSide::White => state.white.clone(),
        ChessSide::Black => state.black.clone(),
    };

    let mut finished = false;
    let mut credited: Option<String> = None;
    if let Some(winner) = mv.winner {
        state.winner = Some(winner);
        finished = true;
        credited = match winner {
            ChessWinner::White => Some(state.white.clone()),
            ChessWinner::Black => Some(state.black.clone()),
            ChessWinner::Draw => None,
        };
    }

    room.set_current_player_by_name(&next_player);
    if finished {
        room.record_finish(credited.as_deref());
    }
    Ok(())
}
