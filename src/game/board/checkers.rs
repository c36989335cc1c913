use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::seat_pair;
use crate::game::{GameError, GameState};
use crate::room::models::{Room, RoomStatus};

/// Cell encoding: 0 empty, 1 red man, 2 white man, 3 red king, 4 white king
pub const EMPTY: u8 = 0;
pub const RED_MAN: u8 = 1;
pub const WHITE_MAN: u8 = 2;
pub const RED_KING: u8 = 3;
pub const WHITE_KING: u8 = 4;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CheckersSide {
    Red,
    White,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckersState {
    pub board: Vec<Vec<u8>>,
    pub red_captured: u32,
    pub white_captured: u32,
    /// Side -> username; host is always red
    pub red: String,
    pub white: String,
    pub turn: CheckersSide,
    pub winner: Option<CheckersSide>,
}

/// Full-board replacement move. Legality is computed by the client; the
/// server enforces turn order and structural validity only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckersMove {
    pub board: Vec<Vec<u8>>,
    pub next_turn: CheckersSide,
    #[serde(default)]
    pub winner: Option<CheckersSide>,
}

fn board_size(room: &Room) -> usize {
    // "international" draughts plays on 10x10; anything else is 8x8
    match room.settings.variant.as_deref() {
        Some("international") => 10,
        _ => 8,
    }
}

fn initial_board(size: usize) -> Vec<Vec<u8>> {
    let mut board = vec![vec![EMPTY; size]; size];
    for (row, cells) in board.iter_mut().enumerate() {
        for (col, cell) in cells.iter_mut().enumerate() {
            // Pieces sit on dark squares only
            if (row + col) % 2 == 1 {
                if row < size / 2 - 1 {
                    *cell = WHITE_MAN;
                } else if row >= size / 2 + 1 {
                    *cell = RED_MAN;
                }
            }
        }
    }
    board
}

fn validate_board(board: &[Vec<u8>], size: usize) -> Result<(), GameError> {
    if board.len() != size {
        return Err(GameError::InvalidMove);
    }
    for row in board {
        if row.len() != size {
            return Err(GameError::InvalidMove);
        }
        if row.iter().any(|&cell| cell > WHITE_KING) {
            return Err(GameError::InvalidMove);
        }
    }
    Ok(())
}

/// Lays out the initial board, seats host as red, and gives red the move
pub fn start(room: &mut Room) {
    let size = board_size(room);
    let (host, guest) = seat_pair(room);
    room.game_state = Some(GameState::Checkers(CheckersState {
        board: initial_board(size),
        red_captured: 0,
        white_captured: 0,
        red: host.clone(),
        white: guest,
        turn: CheckersSide::Red,
        winner: None,
    }));
    room.status = RoomStatus::Playing;
    room.set_current_player_by_name(&host);
}

pub fn apply_move(room: &mut Room, mv: CheckersMove) -> Result<(), GameError> {
    let size = board_size(room);
    validate_board(&mv.board, size)?;

    let Some(GameState::Checkers(state)) = room.game_state.as_mut() else {
        return Err(GameError::InvalidMove);
    };

    state.board = mv.board;
    state.turn = mv.next_turn;

    // Captures fall out of the board itself: whatever is missing from a
    // side's starting complement has been taken by the opponent
    let starting_pieces = (size / 2 - 1) * size / 2;
    let (mut red_alive, mut white_alive) = (0, 0);
    for cell in state.board.iter().flatten() {
        match *cell {
            RED_MAN | RED_KING => red_alive += 1,
            WHITE_MAN | WHITE_KING => white_alive += 1,
            _ => {}
        }
    }
    state.red_captured = starting_pieces.saturating_sub(white_alive) as u32;
    state.white_captured = starting_pieces.saturating_sub(red_alive) as u32;

    let next_player = match mv.next_turn {
        CheckersSide::Red => state.red.clone(),
        CheckersSide::White => state.white.clone(),
    };

    let finished_winner = mv.winner.map(|side| {
        state.winner = Some(side);
        match side {
            CheckersSide::Red => state.red.clone(),
            CheckersSide::White => state.white.clone(),
        }
    });

    room.set_current_player_by_name(&next_player);
    if let Some(winner) = finished_winner {
        room.record_finish(Some(&winner));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameType;
    use crate::room::models::RoomSettings;

    fn checkers_room(variant: Option<&str>) -> Room {
        let settings = RoomSettings {
            variant: variant.map(str::to_string),
        };
        let mut room = Room::new(
            1,
            "CHKRS1".to_string(),
            GameType::Checkers,
            "alice",
            "Alice",
            2,
            settings,
        );
        room.add_player("bob", "Bob");
        start(&mut room);
        room
    }

    fn state(room: &Room) -> &CheckersState {
        match room.game_state.as_ref().unwrap() {
            GameState::Checkers(state) => state,
            other => panic!("expected checkers state, got {other:?}"),
        }
    }

    #[test]
    fn test_start_piece_counts_and_seats() {
        let room = checkers_room(None);
        let state = state(&room);
        assert_eq!(state.board.len(), 8);
        let red = state
            .board
            .iter()
            .flatten()
            .filter(|&&c| c == RED_MAN)
            .count();
        let white = state
            .board
            .iter()
            .flatten()
            .filter(|&&c| c == WHITE_MAN)
            .count();
        assert_eq!(red, 12);
        assert_eq!(white, 12);
        assert_eq!(state.red, "alice");
        assert_eq!(state.white, "bob");
        assert_eq!(state.turn, CheckersSide::Red);
        assert_eq!(room.current_player_username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_international_variant_uses_ten_by_ten() {
        let room = checkers_room(Some("international"));
        let state = state(&room);
        assert_eq!(state.board.len(), 10);
        let red = state
            .board
            .iter()
            .flatten()
            .filter(|&&c| c == RED_MAN)
            .count();
        assert_eq!(red, 20);
    }

    #[test]
    fn test_apply_move_swaps_turn_to_white() {
        let mut room = checkers_room(None);
        let mut board = state(&room).board.clone();
        board[5][0] = EMPTY;
        board[4][1] = RED_MAN;

        apply_move(
            &mut room,
            CheckersMove {
                board: board.clone(),
                next_turn: CheckersSide::White,
                winner: None,
            },
        )
        .unwrap();

        assert_eq!(state(&room).board, board);
        assert_eq!(state(&room).turn, CheckersSide::White);
        assert_eq!(room.current_player_username.as_deref(), Some("bob"));
        assert_eq!(room.status, RoomStatus::Playing);
    }

    #[test]
    fn test_capture_counters_derive_from_the_board() {
        let mut room = checkers_room(None);
        let mut board = state(&room).board.clone();
        // Two white men gone, one red man gone
        board[0][1] = EMPTY;
        board[0][3] = EMPTY;
        board[7][0] = EMPTY;

        apply_move(
            &mut room,
            CheckersMove {
                board,
                next_turn: CheckersSide::White,
                winner: None,
            },
        )
        .unwrap();

        assert_eq!(state(&room).red_captured, 2);
        assert_eq!(state(&room).white_captured, 1);
    }

    #[test]
    fn test_apply_move_rejects_wrong_dimensions() {
        let mut room = checkers_room(None);
        let result = apply_move(
            &mut room,
            CheckersMove {
                board: vec![vec![EMPTY; 10]; 10],
                next_turn: CheckersSide::White,
                winner: None,
            },
        );
        assert_eq!(result, Err(GameError::InvalidMove));
    }

    #[test]
    fn test_apply_move_rejects_out_of_domain_cells() {
        let mut room = checkers_room(None);
        let mut board = state(&room).board.clone();
        board[0][0] = 9;
        let result = apply_move(
            &mut room,
            CheckersMove {
                board,
                next_turn: CheckersSide::White,
                winner: None,
            },
        );
        assert_eq!(result, Err(GameError::InvalidMove));
    }

    #[test]
    fn test_reported_winner_finishes_and_credits_the_seat() {
        let mut room = checkers_room(None);
        let board = state(&room).board.clone();
        apply_move(
            &mut room,
            CheckersMove {
                board,
                next_turn: CheckersSide::White,
                winner: Some(CheckersSide::Red),
            },
        )
        .unwrap();

        assert_eq!(room.status, RoomStatus::Finished);
        assert_eq!(state(&room).winner, Some(CheckersSide::Red));
        assert_eq!(room.session_wins.get("alice"), Some(&1));
        assert_eq!(room.games_played, 1);
    }

    #[test]
    fn test_replay_resets_board_but_keeps_tallies() {
        let mut room = checkers_room(None);
        let board = state(&room).board.clone();
        apply_move(
            &mut room,
            CheckersMove {
                board,
                next_turn: CheckersSide::White,
                winner: Some(CheckersSide::White),
            },
        )
        .unwrap();

        start(&mut room);
        assert_eq!(room.status, RoomStatus::Playing);
        assert_eq!(state(&room).winner, None);
        assert_eq!(state(&room).red_captured, 0);
        assert_eq!(room.session_wins.get("bob"), Some(&1));
        assert_eq!(room.games_played, 1);
        assert_eq!(room.current_player_username.as_deref(), Some("alice"));
    }
}
