// Public API - what other modules can use
pub use cleanup_task::{start_cleanup_task, CleanupConfig};
pub use handlers::{
    create_room, draw_card, get_room, get_room_by_code, join_room, leave_room, list_my_rooms,
    list_rooms, play_card, request_replay, start_game, update_board,
};
pub use registry::RoomRegistry;
pub use service::RoomService;
pub use types::{BoardMoveRequest, CreateRoomRequest, JoinRoomRequest, PlayCardRequest, RoomSummary};

// Internal modules
mod cleanup_task;
mod handlers;
pub mod invite;
pub mod models;
pub mod registry;
pub mod service;
pub mod types;
