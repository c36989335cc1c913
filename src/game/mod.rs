// Public API
pub use policy::{HostLeavePolicy, ReplayPolicy};
pub use state::GameState;
pub use uno::{Card, Color, UnoState, Value};

pub mod board;
mod policy;
mod state;
pub mod uno;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Closed set of games a room can host
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameType {
    Uno,
    Checkers,
    Chess,
    TicTacToe,
    ConnectFour,
}

/// Recoverable, caller-facing game errors. The room's state is left
/// untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Game is not active")]
    SessionNotActive,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Card not in hand")]
    CardNotInHand,
    #[error("Invalid move")]
    InvalidMove,
    #[error("Invalid color choice")]
    InvalidColorChoice,
}
