use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::game::{GameError, GameState, GameType};

/// One seat in a room's roster. Roster order is significant: it defines
/// turn order and board-side assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSlot {
    pub username: String,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
    pub is_host: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
}

/// Optional per-room settings supplied at creation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomSettings {
    /// Checkers: "international" selects the 10x10 board
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

/// The aggregate root of a game session: roster, lifecycle status, turn
/// pointers, the game-specific state payload, and session tallies that
/// survive replays within the room's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: u64,
    pub invite_code: String,
    pub game_type: GameType,
    pub host_username: String,
    pub players: Vec<PlayerSlot>,
    pub status: RoomStatus,
    pub max_players: usize,
    pub current_player_index: usize,
    pub current_player_username: Option<String>,
    pub game_state: Option<GameState>,
    pub session_wins: HashMap<String, u32>,
    pub games_played: u32,
    #[serde(default)]
    pub replay_votes: HashSet<String>,
    #[serde(default)]
    pub settings: RoomSettings,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    /// Set under the room lock the moment destruction is decided; a caller
    /// holding a stale handle must observe the room as already gone
    #[serde(skip)]
    pub closed: bool,
}

impl Room {
    pub fn new(
        id: u64,
        invite_code: String,
        game_type: GameType,
        host_username: &str,
        host_display_name: &str,
        max_players: usize,
        settings: RoomSettings,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            invite_code,
            game_type,
            host_username: host_username.to_string(),
            players: vec![PlayerSlot {
                username: host_username.to_string(),
                display_name: host_display_name.to_string(),
                joined_at: now,
                is_host: true,
            }],
            status: RoomStatus::Waiting,
            max_players,
            current_player_index: 0,
            current_player_username: None,
            game_state: None,
            session_wins: HashMap::new(),
            games_played: 0,
            replay_votes: HashSet::new(),
            settings,
            created_at: now,
            last_activity_at: now,
            closed: false,
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players
    }

    pub fn has_player(&self, username: &str) -> bool {
        self.players.iter().any(|p| p.username == username)
    }

    pub fn is_host(&self, username: &str) -> bool {
        self.host_username == username
    }

    pub fn add_player(&mut self, username: &str, display_name: &str) {
        if !self.has_player(username) {
            self.players.push(PlayerSlot {
                username: username.to_string(),
                display_name: display_name.to_string(),
                joined_at: Utc::now(),
                is_host: false,
            });
        }
    }

    /// Removes a player and, mid-game, repairs the turn pointer so it
    /// always names a seated player: a departure shifts roster indices,
    /// and a departing turn-holder hands the turn to the seat that slid
    /// into their slot (the next player in roster order).
    pub fn remove_player(&mut self, username: &str) {
        let Some(departed_index) = self.players.iter().position(|p| p.username == username)
        else {
            return;
        };
        let held_turn = self.current_player_username.as_deref() == Some(username);
        self.players.remove(departed_index);
        self.replay_votes.remove(username);

        if self.players.is_empty() || self.status != RoomStatus::Playing {
            return;
        }
        if held_turn {
            self.set_current_player(departed_index % self.players.len());
        } else if self.current_player_index > departed_index {
            self.set_current_player(self.current_player_index - 1);
        } else if self.current_player_index >= self.players.len() {
            self.set_current_player(0);
        }
    }

    /// Hands host privileges to the next player in roster order
    pub fn transfer_host(&mut self) {
        for slot in &mut self.players {
            slot.is_host = false;
        }
        if let Some(next) = self.players.first_mut() {
            next.is_host = true;
            self.host_username = next.username.clone();
        }
    }

    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }

    /// Guard: any move mutation requires an active session
    pub fn ensure_playing(&self) -> Result<(), GameError> {
        if self.status != RoomStatus::Playing {
            return Err(GameError::SessionNotActive);
        }
        Ok(())
    }

    /// Guard: only the player the turn pointer names may act
    pub fn ensure_turn(&self, username: &str) -> Result<(), GameError> {
        if self.current_player_username.as_deref() != Some(username) {
            return Err(GameError::NotYourTurn);
        }
        Ok(())
    }

    /// Moves the turn pointer, keeping index and username consistent
    pub fn set_current_player(&mut self, index: usize) {
        self.current_player_index = index;
        self.current_player_username = self.players.get(index).map(|p| p.username.clone());
    }

    pub fn set_current_player_by_name(&mut self, username: &str) {
        if let Some(index) = self.players.iter().position(|p| p.username == username) {
            self.current_player_index = index;
        }
        self.current_player_username = Some(username.to_string());
    }

    /// Transitions to FINISHED and applies session bookkeeping: one
    /// games_played tick per completed game, a session win for a non-draw
    /// winner. Tallies reset only when the room is destroyed.
    pub fn record_finish(&mut self, winner: Option<&str>) {
        self.status = RoomStatus::Finished;
        self.games_played += 1;
        if let Some(winner) = winner {
            *self.session_wins.entry(winner.to_string()).or_insert(0) += 1;
        }
        self.replay_votes.clear();
    }

    pub fn usernames(&self) -> Vec<String> {
        self.players.iter().map(|p| p.username.clone()).collect()
    }
}
