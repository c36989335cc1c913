// Public API - what other modules can use
pub use handlers::{authenticate, register};
pub use identity::{IdentityProvider, InMemoryIdentityProvider, UserIdentity};

// Internal modules
mod handlers;
mod identity;
