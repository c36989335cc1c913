// Event-driven architecture components
//
// This module provides the room event bus plus the outcome-reporting seam
// used when a game finishes.

// Public API - what other modules can use
pub use bus::EventBus;
pub use events::RoomEvent;
pub use outcome::{GameOutcome, LoggingOutcomeReporter, OutcomeReporter};

#[cfg(test)]
pub use outcome::test_support::RecordingOutcomeReporter;

// Internal modules
mod bus;
mod events;
mod outcome;
