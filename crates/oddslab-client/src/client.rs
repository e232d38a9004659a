//! Oddslab HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use oddslab_core::{AccessDecision, Feature, Tier, UsageStatus, UserId};

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, HistoryResponse, RecommendationsResponse, RegisterUserRequest,
    RegisteredUser, TrackUsageResponse,
};

/// Oddslab API client.
///
/// Provides methods for checking feature access, recording usage, and
/// fetching usage snapshots and history.
#[derive(Debug, Clone)]
pub struct OddslabClient {
    client: Client,
    base_url: String,
}

impl OddslabClient {
    /// Create a new oddslab client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the oddslab service (e.g., `"http://oddslab:8080"`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new oddslab client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with default settings).
    #[must_use]
    pub fn with_options(base_url: impl Into<String>, options: ClientOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Register a user account.
    ///
    /// Omitting `user_id` lets the server generate one; omitting `tier`
    /// defaults the account to the free tier.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn register_user(
        &self,
        user_id: Option<UserId>,
        tier: Option<Tier>,
    ) -> Result<RegisteredUser, ClientError> {
        let url = format!("{}/v1/users", self.base_url);
        let request = RegisterUserRequest { user_id, tier };

        let response = self.client.post(&url).json(&request).send().await?;

        Self::handle_response(response).await
    }

    /// Fetch a user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_user(&self, user_id: UserId) -> Result<RegisteredUser, ClientError> {
        let url = format!("{}/v1/users/{user_id}", self.base_url);

        let response = self.client.get(&url).send().await?;

        Self::handle_response(response).await
    }

    /// Change a user's subscription tier.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn set_tier(&self, user_id: UserId, tier: Tier) -> Result<RegisteredUser, ClientError> {
        let url = format!("{}/v1/users/{user_id}/tier", self.base_url);

        let response = self
            .client
            .put(&url)
            .json(&serde_json::json!({ "tier": tier }))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Check whether a user may invoke a feature right now.
    ///
    /// This is a read-only check; it records nothing. Call
    /// [`track_usage`](Self::track_usage) after the gated action succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn check_access(
        &self,
        user_id: UserId,
        feature: Feature,
    ) -> Result<AccessDecision, ClientError> {
        let url = format!(
            "{}/v1/users/{user_id}/access/{}",
            self.base_url,
            feature.as_str()
        );

        let response = self.client.get(&url).send().await?;

        Self::handle_response(response).await
    }

    /// Record one invocation of a feature.
    ///
    /// The server re-checks the limit before counting; an exhausted limit
    /// is surfaced as [`ClientError::LimitReached`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the limit is exhausted, or
    /// the server returns an error.
    pub async fn track_usage(
        &self,
        user_id: UserId,
        feature: Feature,
    ) -> Result<TrackUsageResponse, ClientError> {
        let url = format!(
            "{}/v1/users/{user_id}/usage/{}",
            self.base_url,
            feature.as_str()
        );

        let response = self.client.post(&url).send().await?;

        Self::handle_response(response).await
    }

    /// Fetch today's per-feature usage snapshot for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn usage_status(&self, user_id: UserId) -> Result<UsageStatus, ClientError> {
        let url = format!("{}/v1/users/{user_id}/usage", self.base_url);

        let response = self.client.get(&url).send().await?;

        Self::handle_response(response).await
    }

    /// Fetch a user's recent usage history.
    ///
    /// `days` is the window size; the server clamps it to its supported
    /// range and defaults it when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn usage_history(
        &self,
        user_id: UserId,
        days: Option<i64>,
    ) -> Result<HistoryResponse, ClientError> {
        let url = format!("{}/v1/users/{user_id}/usage/history", self.base_url);

        let mut request = self.client.get(&url);
        if let Some(days) = days {
            request = request.query(&[("days", days)]);
        }
        let response = request.send().await?;

        Self::handle_response(response).await
    }

    /// Fetch tier-upgrade recommendations for a usage-constrained user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn recommendations(
        &self,
        user_id: UserId,
    ) -> Result<RecommendationsResponse, ClientError> {
        let url = format!("{}/v1/users/{user_id}/recommendations", self.base_url);

        let response = self.client.get(&url).send().await?;

        Self::handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code.as_str();
                let message = api_error.error.message;
                tracing::debug!(code = %code, status = %status, "API request failed");

                match code {
                    "limit_reached" => {
                        let feature = api_error
                            .error
                            .details
                            .as_ref()
                            .and_then(|d| d.get("feature"))
                            .and_then(serde_json::Value::as_str)
                            .unwrap_or("unknown")
                            .to_string();
                        let used = api_error
                            .error
                            .details
                            .as_ref()
                            .and_then(|d| d.get("used"))
                            .and_then(serde_json::Value::as_i64)
                            .unwrap_or(0);

                        Err(ClientError::LimitReached { feature, used })
                    }
                    "not_found" => Err(ClientError::UserNotFound { message }),
                    _ => Err(ClientError::Api {
                        code: code.to_string(),
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}
