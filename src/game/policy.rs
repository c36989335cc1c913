use std::ops::RangeInclusive;

use super::GameType;

/// What happens to a room when its host leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostLeavePolicy {
    /// The room is destroyed and everyone is kicked
    CloseRoom,
    /// Host privileges pass to the next player in roster order
    TransferHost,
}

/// Who may restart a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayPolicy {
    /// Only the host can re-deal; the roster is kept as-is
    HostRestart,
    /// Every seated player must request a replay before the board resets
    MutualConsent,
}

impl GameType {
    /// Allowed roster sizes for a room of this game type
    pub fn player_bounds(&self) -> RangeInclusive<usize> {
        match self {
            GameType::Uno => 2..=6,
            _ => 2..=2,
        }
    }

    pub fn host_leave_policy(&self) -> HostLeavePolicy {
        match self {
            GameType::Uno => HostLeavePolicy::TransferHost,
            _ => HostLeavePolicy::CloseRoom,
        }
    }

    pub fn replay_policy(&self) -> ReplayPolicy {
        match self {
            GameType::Uno => ReplayPolicy::HostRestart,
            _ => ReplayPolicy::MutualConsent,
        }
    }
}
