use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::events::RoomEvent;

const ROOM_CHANNEL_CAPACITY: usize = 100;

/// Event bus for distributing room events throughout the application
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Room-specific event channels: room_id -> sender
    room_channels: Arc<RwLock<HashMap<u64, broadcast::Sender<RoomEvent>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            room_channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Emits an event to all subscribers of the event's room
    pub async fn emit(&self, event: RoomEvent) {
        let room_id = event.room_id();
        let room_channels = self.room_channels.read().await;

        if let Some(sender) = room_channels.get(&room_id) {
            match sender.send(event) {
                Ok(receiver_count) => {
                    debug!(room_id, receivers = receiver_count, "Room event emitted");
                }
                Err(_) => {
                    debug!(room_id, "Room event emitted with no receivers");
                }
            }
        } else {
            debug!(room_id, "No room channel found - creating one");
            drop(room_channels);

            let mut room_channels = self.room_channels.write().await;
            let sender = room_channels
                .entry(room_id)
                .or_insert_with(|| broadcast::channel(ROOM_CHANNEL_CAPACITY).0)
                .clone();
            if sender.send(event).is_err() {
                debug!(room_id, "Room event sent to new channel with no receivers");
            }
        }
    }

    /// Subscribe to events for a specific room
    pub async fn subscribe(&self, room_id: u64) -> broadcast::Receiver<RoomEvent> {
        let room_channels = self.room_channels.read().await;

        if let Some(sender) = room_channels.get(&room_id) {
            sender.subscribe()
        } else {
            debug!(room_id, "Creating new room channel for subscription");
            drop(room_channels);

            let mut room_channels = self.room_channels.write().await;
            room_channels
                .entry(room_id)
                .or_insert_with(|| broadcast::channel(ROOM_CHANNEL_CAPACITY).0)
                .subscribe()
        }
    }

    /// Drops the channel for a deleted room
    pub async fn close_room(&self, room_id: u64) {
        let mut room_channels = self.room_channels.write().await;
        if room_channels.remove(&room_id).is_some() {
            debug!(room_id, "Room event channel removed");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
