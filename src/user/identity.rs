use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Resolved caller identity attached to every room operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Stable unique handle used internally and in seat assignments
    pub username: String,
    /// Human-facing name shown to other players
    pub display_name: String,
}

/// Service for resolving bearer tokens into player identities
///
/// The engine never authenticates players itself; a deployment plugs in
/// whatever identity backend it has. The in-memory implementation below
/// covers local development and tests.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new player, returning the token they authenticate with
    async fn register(&self, username: String, display_name: String) -> String;

    /// Resolve a token to an identity, None if the token is unknown
    async fn resolve(&self, token: &str) -> Option<UserIdentity>;

    /// Drop a token (logout / session expiry)
    async fn revoke(&self, token: &str) -> bool;
}

/// In-memory implementation of IdentityProvider
/// Uses RwLock for concurrent access with read optimization
pub struct InMemoryIdentityProvider {
    tokens: Arc<RwLock<HashMap<String, UserIdentity>>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn register(&self, username: String, display_name: String) -> String {
        let token = Uuid::new_v4().to_string();
        let mut tokens = self.tokens.write().await;
        tokens.insert(
            token.clone(),
            UserIdentity {
                username: username.clone(),
                display_name,
            },
        );
        info!(username = %username, "Player registered");
        token
    }

    async fn resolve(&self, token: &str) -> Option<UserIdentity> {
        let tokens = self.tokens.read().await;
        tokens.get(token).cloned()
    }

    async fn revoke(&self, token: &str) -> bool {
        let mut tokens = self.tokens.write().await;
        let removed = tokens.remove(token).is_some();
        if removed {
            debug!("Player token revoked");
        }
        removed
    }
}
