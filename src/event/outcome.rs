use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::game::GameType;

/// Final result of one completed game, handed to the outcome sink
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOutcome {
    pub room_id: u64,
    pub game_type: GameType,
    pub players: Vec<String>,
    /// None for a draw
    pub winner: Option<String>,
    /// 1-based game number within the room session
    pub game_number: u32,
    pub finished_at: DateTime<Utc>,
}

/// Sink for completed-game results
///
/// Reporting happens after the room lock is released; a slow or failing
/// reporter must never block gameplay.
#[async_trait]
pub trait OutcomeReporter: Send + Sync {
    async fn report(&self, outcome: GameOutcome);
}

/// Default reporter that records outcomes in the log stream
pub struct LoggingOutcomeReporter;

#[async_trait]
impl OutcomeReporter for LoggingOutcomeReporter {
    async fn report(&self, outcome: GameOutcome) {
        info!(
            room_id = outcome.room_id,
            game_type = %outcome.game_type,
            winner = outcome.winner.as_deref().unwrap_or("draw"),
            game_number = outcome.game_number,
            "Game outcome recorded"
        );
    }
}
