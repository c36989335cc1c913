use serde::{Deserialize, Serialize};

use crate::game::GameType;

/// Events that can occur in a room's lifetime
///
/// Events represent facts about things that have already happened.
/// They are used to communicate state changes between different parts
/// of the system without tight coupling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RoomEvent {
    /// A room has been created and is waiting for players
    RoomCreated {
        room_id: u64,
        invite_code: String,
        game_type: GameType,
        host: String,
    },

    /// A player has joined the room
    PlayerJoined {
        room_id: u64,
        player: String,
        current_players: Vec<String>,
    },

    /// A player has left the room or game
    PlayerLeft {
        room_id: u64,
        player: String,
        remaining_players: Vec<String>,
    },

    /// Host seat moved to another player
    HostTransferred { room_id: u64, new_host: String },

    /// The game has started (waiting -> playing)
    GameStarted {
        room_id: u64,
        game_type: GameType,
        players: Vec<String>,
    },

    /// A move was applied and the turn may have changed
    MoveApplied {
        room_id: u64,
        player: String,
        next_player: Option<String>,
    },

    /// The game has been completed
    GameFinished {
        room_id: u64,
        winner: Option<String>,
        games_played: u32,
    },

    /// The room has been deleted
    RoomClosed { room_id: u64 },
}

impl RoomEvent {
    /// The room this event belongs to
    pub fn room_id(&self) -> u64 {
        match self {
            RoomEvent::RoomCreated { room_id, .. }
            | RoomEvent::PlayerJoined { room_id, .. }
            | RoomEvent::PlayerLeft { room_id, .. }
            | RoomEvent::HostTransferred { room_id, .. }
            | RoomEvent::GameStarted { room_id, .. }
            | RoomEvent::MoveApplied { room_id, .. }
            | RoomEvent::GameFinished { room_id, .. }
            | RoomEvent::RoomClosed { room_id } => *room_id,
        }
    }
}
