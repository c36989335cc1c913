use serde::{Deserialize, Serialize};

use super::board::{CheckersState, ChessState, ConnectFourState, TicTacToeState};
use super::uno::UnoState;

/// Tagged union of per-game-type session state. The variant is resolved
/// once at the room-lifecycle boundary and handed to the matching engine;
/// nothing downstream re-parses an untyped blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    Uno(UnoState),
    Checkers(CheckersState),
    Chess(ChessState),
    TicTacToe(TicTacToeState),
    ConnectFour(ConnectFourState),
}
