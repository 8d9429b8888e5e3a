//! Session endpoint client methods

use super::{paths, ApiClient, RequestSpec};
use crate::client::error::ClientError;
use crate::types::{RefreshRequest, RegisterRequest};
use muster_core::types::{Credentials, TokenPair};
use tracing::debug;

impl ApiClient {
    /// Exchange credentials for a token pair and persist it, replacing
    /// any prior pair.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ClientError> {
        let spec = RequestSpec::post(paths::LOGIN)
            .unauthenticated()
            .json(credentials)?;
        let pair: TokenPair = self.execute(spec).await?;
        self.store().save(&pair).await?;
        debug!("login succeeded, token pair stored");
        Ok(pair)
    }

    /// Create an account. Does not authenticate.
    pub async fn signup(&self, request: &RegisterRequest) -> Result<(), ClientError> {
        let spec = RequestSpec::post(paths::REGISTER)
            .unauthenticated()
            .json(request)?;
        self.execute_unit(spec).await
    }

    /// Mint a new access token from the stored refresh token and persist
    /// it. The refresh token is unchanged. Fails when no session exists
    /// or the server rejects the refresh token.
    pub async fn refresh(&self) -> Result<String, ClientError> {
        let current = self.store().access().await?;
        self.refresh_access_token(current.as_deref()).await
    }

    /// Blacklist the stored refresh token and clear the local store.
    ///
    /// The blacklist call is best-effort: local state is cleared even
    /// when the server cannot be reached.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if let Some(refresh) = self.store().refresh().await? {
            let spec = RequestSpec::post(paths::TOKEN_BLACKLIST)
                .unauthenticated()
                .json(&RefreshRequest { refresh })?;
            match self.execute_unit(spec).await {
                Ok(()) => debug!("refresh token blacklisted"),
                Err(err) => debug!(error = %err, "refresh token blacklist failed"),
            }
        }

        self.store().clear().await?;
        Ok(())
    }
}
