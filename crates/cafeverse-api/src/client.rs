//! HTTP client for the café ordering backend.
//!
//! Wraps `reqwest` with backend-specific error handling, token headers, and
//! typed response deserialization. Endpoints live in sibling modules as
//! further `impl CafeApiClient` blocks.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::retry::retry_with_backoff;
use crate::types::StatusEnvelope;

/// Client for the ordering backend's REST API.
///
/// Reads (`GET`) get the configured timeout and are retried on transient
/// failures. Writes are sent once; order creation is additionally sent with
/// no overall timeout.
#[derive(Debug, Clone)]
pub struct CafeApiClient {
    client: Client,
    base_url: Url,
    read_timeout: Duration,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl CafeApiClient {
    /// Creates a client for the backend rooted at `base_url`, with read
    /// retries disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` is not a
    /// valid URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise so that joining "api/..." appends to the root instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        Ok(Self {
            client,
            base_url,
            read_timeout: Duration::from_secs(timeout_secs),
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Builds a client from application configuration, read retries included.
    ///
    /// # Errors
    ///
    /// Same as [`CafeApiClient::new`].
    pub fn from_config(config: &cafeverse_core::AppConfig) -> Result<Self, ApiError> {
        Ok(Self::new(
            &config.api_base_url,
            config.http_timeout_secs,
            &config.user_agent,
        )?
        .with_read_retries(config.read_max_retries, config.read_backoff_base_ms))
    }

    /// Enables retries with exponential back-off for idempotent reads.
    #[must_use]
    pub fn with_read_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}{path}: {e}", self.base_url)))
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Attaches the backend's `Token <token>` authorization header.
    pub(crate) fn authorized(builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header(reqwest::header::AUTHORIZATION, format!("Token {token}"))
    }

    /// Sends a GET (with the read timeout and retry policy) and decodes the
    /// JSON body.
    ///
    /// # Errors
    ///
    /// See [`CafeApiClient::decode`]; transient failures are retried first.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, move || async move {
            let mut builder = self.client.get(url.clone()).timeout(self.read_timeout);
            if let Some(token) = token {
                builder = Self::authorized(builder, token);
            }
            tracing::debug!(url = %url, "GET");
            let response = builder.send().await?;
            Self::decode(response, url.as_str()).await
        })
        .await
    }

    /// Maps an HTTP response onto the error taxonomy and decodes the body.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] for 401/403.
    /// - [`ApiError::Rejected`] for any other non-2xx status.
    /// - [`ApiError::Deserialize`] if a 2xx body does not match `T`.
    /// - [`ApiError::Http`] if the body cannot be read.
    pub(crate) async fn decode<T: DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized {
                status: status.as_u16(),
                message: message_field(&body),
            });
        }
        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: message_field(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }

    /// Decodes a `{ status, message }` envelope and rejects anything whose
    /// `status` is not `"success"`.
    pub(crate) async fn decode_envelope(
        response: Response,
        context: &str,
    ) -> Result<StatusEnvelope, ApiError> {
        let http_status = response.status().as_u16();
        let envelope: StatusEnvelope = Self::decode(response, context).await?;
        if envelope.is_success() {
            Ok(envelope)
        } else {
            Err(ApiError::Rejected {
                status: http_status,
                message: envelope.message,
            })
        }
    }
}

/// Extracts a non-empty top-level `message` string from a JSON error body.
fn message_field(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
