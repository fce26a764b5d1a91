//! Shared bearer-token storage.

use std::sync::Arc;
use tokio::sync::RwLock;

/// A cloneable handle to the current bearer token.
///
/// The token is optional: requests without one are sent unauthenticated
/// and the backend answers 401 if it requires auth.
#[derive(Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn clear(&self) {
        *self.token.write().await = None;
    }

    pub async fn get(&self) -> Option<String> {
        self.token.read().await.clone()
    }
}
