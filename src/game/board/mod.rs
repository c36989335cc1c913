// Public API
pub use checkers::{CheckersMove, CheckersSide, CheckersState};
pub use chess::{ChessMove, ChessSide, ChessState, ChessWinner};
pub use connectfour::{ConnectFourMove, ConnectFourState, ConnectFourWinner, Disc};
pub use tictactoe::{Mark, TicTacToeMove, TicTacToeState, TicTacToeWinner};

pub mod checkers;
pub mod chess;
pub mod connectfour;
pub mod tictactoe;

use crate::room::models::Room;

/// Host always takes the first side. A solo room seats "AI" opposite for
/// developer testing; production rooms auto-start only when full.
pub(crate) fn seat_pair(room: &Room) -> (String, String) {
    let host = room.players[0].username.clone();
    let guest = room
        .players
        .get(1)
        .map(|p| p.username.clone())
        .unwrap_or_else(|| "AI".to_string());
    (host, guest)
}
