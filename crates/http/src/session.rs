//! Session controller: login, signup, logout and the session state
//! machine.
//!
//! A session is derived state — the presence of an access token in the
//! store implies an authenticated session. Transitions:
//! `Unknown -> {Anonymous, Authenticated}` on resume,
//! `Anonymous -> Authenticated` on login,
//! `Authenticated -> Anonymous` on logout or unrecoverable refresh
//! failure.

use crate::client::error::ClientError;
use crate::client::ApiClient;
use crate::types::RegisterRequest;
use muster_core::types::Credentials;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Startup, before the store has been consulted
    Unknown,
    Anonymous,
    Authenticated,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Unknown => "unknown",
            Self::Anonymous => "anonymous",
            Self::Authenticated => "authenticated",
        };
        f.write_str(label)
    }
}

/// Orchestrates the session lifecycle over an [`ApiClient`]
pub struct Session {
    client: ApiClient,
    state: SessionState,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: SessionState::Unknown,
        }
    }

    /// Derive the session state from the token store at startup
    pub async fn resume(client: ApiClient) -> Result<Self, ClientError> {
        let state = match client.store().access().await? {
            Some(_) => SessionState::Authenticated,
            None => SessionState::Anonymous,
        };
        Ok(Self { client, state })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// The underlying client, for resource calls. A resource call that
    /// exhausts its refresh attempt clears the store; [`Session::sync`]
    /// picks the transition up.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Re-derive the state from the store, picking up a teardown done
    /// by the interceptor
    pub async fn sync(&mut self) -> Result<SessionState, ClientError> {
        if self.state == SessionState::Authenticated
            && self.client.store().access().await?.is_none()
        {
            self.state = SessionState::Anonymous;
        }
        Ok(self.state)
    }

    /// Exchange credentials for a token pair. On failure the session
    /// stays unauthenticated.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), ClientError> {
        self.client.login(credentials).await?;
        self.state = SessionState::Authenticated;
        info!("session authenticated");
        Ok(())
    }

    /// Create an account; the session remains anonymous
    pub async fn signup(&self, request: &RegisterRequest) -> Result<(), ClientError> {
        self.client.signup(request).await
    }

    /// Blacklist the refresh token (best-effort) and clear local state.
    /// The session is anonymous afterwards even when the store could
    /// not be fully cleared.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let result = self.client.logout().await;
        self.state = SessionState::Anonymous;
        info!("session closed");
        result
    }
}
