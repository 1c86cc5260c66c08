//! # Authentication Session
//!
//! Holds the bearer token for API requests and persists the signed-in user
//! across restarts.
//!
//! ## Sign-in Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  AuthService::sign_in(email, password)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  HttpProductClient::sign_in ──► POST /api/auth/login {Email, Senha}    │
//! │       │                                                                 │
//! │       ├── failure ──► log, return false                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  @AuthToken = token    @AuthUser = {id, name, email}                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AuthSession::set_token ──► attached to every later request            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::error::SyncResult;
use crate::remote::HttpProductClient;
use estoque_store::KeyValueStore;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "@AuthToken";

/// Storage key holding the signed-in user.
pub const USER_KEY: &str = "@AuthUser";

// =============================================================================
// Session
// =============================================================================

/// In-memory token holder shared by the remote client and the auth service.
///
/// Clones share the same token.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    token: Arc<RwLock<Option<String>>>,
}

impl AuthSession {
    /// Creates a session with no token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        AuthSession {
            token: Arc::new(RwLock::new(Some(token.into()))),
        }
    }

    pub async fn get_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn set_token(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }
}

// =============================================================================
// User
// =============================================================================

/// The signed-in user as persisted under `@AuthUser`.
///
/// The login endpoint returns only a token, so id and name are placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl AuthUser {
    fn for_email(email: &str) -> Self {
        AuthUser {
            id: "user_id".to_string(),
            name: "Usuário".to_string(),
            email: email.to_string(),
        }
    }
}

// =============================================================================
// Service
// =============================================================================

/// Sign-in, sign-out and session restore on top of a key-value store.
pub struct AuthService<S> {
    kv: S,
    client: HttpProductClient,
}

impl<S: KeyValueStore> AuthService<S> {
    pub fn new(kv: S, client: HttpProductClient) -> Self {
        AuthService { kv, client }
    }

    /// The session the remote client reads its token from.
    pub fn session(&self) -> &AuthSession {
        self.client.session()
    }

    /// Loads a persisted token into the session. Returns whether one was found.
    pub async fn restore(&self) -> SyncResult<bool> {
        match self.kv.get_item(TOKEN_KEY).await? {
            Some(token) if !token.is_empty() => {
                self.session().set_token(token).await;
                debug!("Restored persisted auth token");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Signs in and persists the session.
    ///
    /// Never fails: any problem is logged and reported as `false`.
    pub async fn sign_in(&self, email: &str, password: &str) -> bool {
        info!(email = %email, "Signing in");

        let token = match self.client.sign_in(email, password).await {
            Ok(token) => token,
            Err(e) => {
                if e.is_auth_failure() {
                    warn!(email = %email, status = ?e.status(), "Sign-in rejected");
                } else {
                    error!(email = %email, error = %e, "Sign-in failed");
                }
                return false;
            }
        };

        let user = AuthUser::for_email(email);
        let persisted = async {
            self.kv.set_item(TOKEN_KEY, &token).await?;
            let user_json = serde_json::to_string(&user)
                .map_err(|e| estoque_store::StoreError::Serialization(e.to_string()))?;
            self.kv.set_item(USER_KEY, &user_json).await
        }
        .await;

        if let Err(e) = persisted {
            error!(error = %e, "Failed to persist auth session");
            return false;
        }

        self.session().set_token(token).await;
        info!(email = %email, "Signed in");
        true
    }

    /// Clears the session and both persisted keys.
    pub async fn sign_out(&self) -> SyncResult<()> {
        self.session().clear_token().await;
        self.kv.remove_item(TOKEN_KEY).await?;
        self.kv.remove_item(USER_KEY).await?;
        info!("Signed out");
        Ok(())
    }

    /// Whether the session holds a token.
    pub async fn is_authenticated(&self) -> bool {
        self.session().get_token().await.is_some()
    }

    /// The persisted user, if any. An unreadable record counts as none.
    pub async fn current_user(&self) -> SyncResult<Option<AuthUser>> {
        let Some(raw) = self.kv.get_item(USER_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "Stored user is unreadable");
                Ok(None)
            }
        }
    }
}
