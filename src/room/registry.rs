use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use super::invite::generate_code;
use super::models::Room;
use crate::shared::AppError;

const CODE_RETRY_LIMIT: usize = 16;

/// In-memory store of live rooms
///
/// Each room sits behind its own async mutex; callers lock exactly the room
/// they are mutating while the registry maps stay readable. The invite-code
/// index is kept in lock-step with the room map.
pub struct RoomRegistry {
    rooms: RwLock<HashMap<u64, Arc<Mutex<Room>>>>,
    codes: RwLock<HashMap<String, u64>>,
    next_id: AtomicU64,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            codes: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Allocates a room id and a unique invite code, then stores the room
    /// built by `make_room`. Retries code generation on collision.
    pub async fn insert_with<F>(&self, make_room: F) -> Result<Arc<Mutex<Room>>, AppError>
    where
        F: FnOnce(u64, String) -> Room,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let mut codes = self.codes.write().await;
        let mut code = None;
        for attempt in 0..CODE_RETRY_LIMIT {
            let candidate = generate_code(&mut rand::rng());
            if !codes.contains_key(&candidate) {
                if attempt > 0 {
                    debug!(attempt, "Invite code collision resolved on retry");
                }
                code = Some(candidate);
                break;
            }
        }
        let Some(code) = code else {
            warn!("Exhausted invite code retries");
            return Err(AppError::Internal);
        };
        codes.insert(code.clone(), id);
        drop(codes);

        let room = Arc::new(Mutex::new(make_room(id, code)));
        let mut rooms = self.rooms.write().await;
        rooms.insert(id, Arc::clone(&room));
        Ok(room)
    }

    pub async fn get(&self, room_id: u64) -> Option<Arc<Mutex<Room>>> {
        let rooms = self.rooms.read().await;
        rooms.get(&room_id).cloned()
    }

    /// Looks up a room by invite code, case-insensitively
    pub async fn get_by_code(&self, code: &str) -> Option<Arc<Mutex<Room>>> {
        let normalized = code.trim().to_ascii_uppercase();
        let room_id = {
            let codes = self.codes.read().await;
            codes.get(&normalized).copied()
        }?;
        self.get(room_id).await
    }

    /// Removes a room and its invite-code entry
    pub async fn remove(&self, room_id: u64) -> Option<Arc<Mutex<Room>>> {
        let removed = {
            let mut rooms = self.rooms.write().await;
            rooms.remove(&room_id)
        };
        if let Some(room) = &removed {
            let code = room.lock().await.invite_code.clone();
            let mut codes = self.codes.write().await;
            codes.remove(&code);
        }
        removed
    }

    /// Snapshot of all live room handles, for scans
    pub async fn all(&self) -> Vec<Arc<Mutex<Room>>> {
        let rooms = self.rooms.read().await;
        rooms.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameType;
    use crate::room::models::RoomSettings;

    fn make_room(id: u64, code: String) -> Room {
        Room::new(
            id,
            code,
            GameType::TicTacToe,
            "alice",
            "Alice",
            2,
            RoomSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids_and_codes() {
        let registry = RoomRegistry::new();
        let a = registry.insert_with(make_room).await.unwrap();
        let b = registry.insert_with(make_room).await.unwrap();

        let (a, b) = (a.lock().await, b.lock().await);
        assert_ne!(a.id, b.id);
        assert_ne!(a.invite_code, b.invite_code);
    }

    #[tokio::test]
    async fn test_get_by_code_is_case_insensitive() {
        let registry = RoomRegistry::new();
        let room = registry.insert_with(make_room).await.unwrap();
        let code = room.lock().await.invite_code.clone();

        let found = registry.get_by_code(&code.to_lowercase()).await;
        assert!(found.is_some());
        let found_id = found.unwrap().lock().await.id;
        assert_eq!(found_id, room.lock().await.id);
    }

    #[tokio::test]
    async fn test_remove_frees_the_invite_code() {
        let registry = RoomRegistry::new();
        let room = registry.insert_with(make_room).await.unwrap();
        let (id, code) = {
            let room = room.lock().await;
            (room.id, room.invite_code.clone())
        };

        assert!(registry.remove(id).await.is_some());
        assert!(registry.get(id).await.is_none());
        assert!(registry.get_by_code(&code).await.is_none());
        assert!(registry.is_empty().await);
    }
}
