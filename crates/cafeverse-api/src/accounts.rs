//! Login and signup endpoints.

use crate::client::CafeApiClient;
use crate::error::ApiError;
use crate::types::{AuthSession, LoginRequest, SignupRequest};

impl CafeApiClient {
    /// Exchanges credentials for a token (`POST /api/accounts/login/`).
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] or [`ApiError::Rejected`] for bad credentials.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the response shape is unexpected.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession, ApiError> {
        let url = self.endpoint("api/accounts/login/")?;
        let response = self
            .http()
            .post(url.clone())
            .timeout(self.read_timeout())
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        let session: AuthSession = Self::decode(response, url.as_str()).await?;
        tracing::info!(user_id = session.user.id, "signed in");
        Ok(session)
    }

    /// Creates an account and signs it in (`POST /api/accounts/signup/`).
    ///
    /// # Errors
    ///
    /// Same as [`CafeApiClient::login`].
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthSession, ApiError> {
        let url = self.endpoint("api/accounts/signup/")?;
        let response = self
            .http()
            .post(url.clone())
            .timeout(self.read_timeout())
            .json(request)
            .send()
            .await?;
        let session: AuthSession = Self::decode(response, url.as_str()).await?;
        tracing::info!(user_id = session.user.id, "account created");
        Ok(session)
    }
}
