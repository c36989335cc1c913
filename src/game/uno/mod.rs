// Public API
pub use cards::{build_deck, Card, Color, Value};
pub use engine::{draw_card, is_playable, play_card, start_game, UnoState};

mod cards;
mod engine;
