use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::seat_pair;
use crate::game::{GameError, GameState};
use crate::room::models::{Room, RoomStatus};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Disc {
    Red,
    Yellow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectFourWinner {
    Red,
    Yellow,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectFourState {
    /// 6 rows x 7 columns, row 0 at the top
    pub board: Vec<Vec<Option<Disc>>>,
    /// Disc -> username; host always plays red
    pub red: String,
    pub yellow: String,
    pub turn: Disc,
    pub winner: Option<ConnectFourWinner>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectFourMove {
    pub board: Vec<Vec<Option<Disc>>>,
    pub next_turn: Disc,
    #[serde(default)]
    pub winner: Option<ConnectFourWinner>,
}

fn validate_board(board: &[Vec<Option<Disc>>]) -> Result<(), GameError> {
    if board.len() != ROWS || board.iter().any(|row| row.len() != COLS) {
        return Err(GameError::InvalidMove);
    }
    Ok(())
}

/// Empty 6x7 grid, host is red and moves first
pub fn start(room: &mut Room) {
    let (host, guest) = seat_pair(room);
    room.game_state = Some(GameState::ConnectFour(ConnectFourState {
        board: vec![vec![None; COLS]; ROWS],
        red: host.clone(),
        yellow: guest,
        turn: Disc::Red,
        winner: None,
    }));
    room.status = RoomStatus::Playing;
    room.set_current_player_by_name(&host);
}

pub fn apply_move(room: &mut Room, mv: ConnectFourMove) -> Result<(), GameError> {
    validate_board(&mv.board)?;

    let Some(GameState::ConnectFour(state)) = room.game_state.as_mut() else {
        return Err(GameError::InvalidMove);
    };

    state.board = mv.board;
    state.turn = mv.next_turn;
    let next_player = match mv.next_turn {
        Disc::Red => state.red.clone(),
        Disc::Yellow => state.yellow.clone(),
    };

    let mut finished = false;
    let mut credited: Option<String> = None;
    if let Some(winner) = mv.winner {
        state.winner = Some(winner);
        finished = true;
        credited = match winner {
            ConnectFourWinner::Red => Some(state.red.clone()),
            ConnectFourWinner::Yellow => Some(state.yellow.clone()),
            ConnectFourWinner::Draw => None,
        };
    }

    room.set_current_player_by_name(&next_player);
    if finished {
        room.record_finish(credited.as_deref());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameType;
    use crate::room::models::RoomSettings;

    fn c4_room() -> Room {
        let mut room = Room::new(
            1,
            "CONN44".to_string(),
            GameType::ConnectFour,
            "alice",
            "Alice",
            2,
            RoomSettings::default(),
        );
        room.add_player("bob", "Bob");
        start(&mut room);
        room
    }

    fn state(room: &Room) -> &ConnectFourState {
        match room.game_state.as_ref().unwrap() {
            GameState::ConnectFour(state) => state,
            other => panic!("expected connect-four state, got {other:?}"),
        }
    }

    #[test]
    fn test_start_empty_grid_host_is_red() {
        let room = c4_room();
        let state = state(&room);
        assert_eq!(state.board.len(), ROWS);
        assert!(state.board.iter().all(|row| row.len() == COLS));
        assert!(state
            .board
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_none())));
        assert_eq!(state.red, "alice");
        assert_eq!(state.yellow, "bob");
        assert_eq!(state.turn, Disc::Red);
        assert_eq!(room.current_player_username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_apply_move_drops_disc_and_passes_turn() {
        let mut room = c4_room();
        let mut board = vec![vec![None; COLS]; ROWS];
        board[ROWS - 1][3] = Some(Disc::Red);

        apply_move(
            &mut room,
            ConnectFourMove {
                board: board.clone(),
                next_turn: Disc::Yellow,
                winner: None,
            },
        )
        .unwrap();

        assert_eq!(state(&room).board, board);
        assert_eq!(room.current_player_username.as_deref(), Some("bob"));
    }

    #[test]
    fn test_apply_move_rejects_wrong_dimensions() {
        let mut room = c4_room();
        let result = apply_move(
            &mut room,
            ConnectFourMove {
                board: vec![vec![None; COLS]; ROWS - 1],
                next_turn: Disc::Yellow,
                winner: None,
            },
        );
        assert_eq!(result, Err(GameError::InvalidMove));
    }

    #[test]
    fn test_yellow_win_credits_the_joiner() {
        let mut room = c4_room();
        let mut board = vec![vec![None; COLS]; ROWS];
        for col in 0..4 {
            board[ROWS - 1][col] = Some(Disc::Yellow);
        }
        apply_move(
            &mut room,
            ConnectFourMove {
                board,
                next_turn: Disc::Red,
                winner: Some(ConnectFourWinner::Yellow),
            },
        )
        .unwrap();

        assert_eq!(room.status, RoomStatus::Finished);
        assert_eq!(room.session_wins.get("bob"), Some(&1));
        assert!(room.session_wins.get("alice").is_none());
    }

    #[test]
    fn test_draw_counts_the_game_but_credits_nobody() {
        let mut room = c4_room();
        apply_move(
            &mut room,
            ConnectFourMove {
                board: vec![vec![Some(Disc::Red); COLS]; ROWS],
                next_turn: Disc::Red,
                winner: Some(ConnectFourWinner::Draw),
            },
        )
        .unwrap();

        assert_eq!(room.status, RoomStatus::Finished);
        assert_eq!(room.games_played, 1);
        assert!(room.session_wins.is_empty());
    }
}
