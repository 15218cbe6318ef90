//! Stalwart admin API client
//!
//! Bearer-authenticated JSON client for the mail server's account control
//! plane. Construction takes an explicit [`StalwartConfig`] so deployments
//! and tests choose their own endpoint; there is no process-global client.
//! Every request carries the configured timeout so an unreachable mail
//! server cannot block a request handler indefinitely.

use crate::config::StalwartConfig;
use crate::error::{AppError, Result};
use crate::stalwart::types::{
    quota_bytes, CreateAccountRequest, HealthStatus, StalwartAccount, UpdateAccountRequest,
};
use reqwest::{Client, Response, StatusCode};
use tracing::warn;

#[derive(Clone)]
pub struct StalwartClient {
    config: StalwartConfig,
    http_client: Client,
}

impl StalwartClient {
    pub fn new(config: StalwartConfig) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    fn account_url(&self, address: &str) -> String {
        format!("{}/api/v1/accounts/{}", self.config.api_url, address)
    }

    /// Map a reqwest transport failure (timeout, refused connection).
    /// Status 0 marks "no HTTP response at all".
    fn transport_error(e: reqwest::Error) -> AppError {
        AppError::upstream(0, format!("Mail server unreachable: {}", e))
    }

    /// Turn a non-success response into an `Upstream` error with the body.
    async fn upstream_error(response: Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        AppError::upstream(status.as_u16(), body)
    }

    /// Create a new account. The display name falls back to the address
    /// local part when empty; quota is converted to bytes.
    pub async fn create_account(
        &self,
        address: &str,
        password: &str,
        display_name: &str,
        quota_mb: u32,
    ) -> Result<()> {
        let name = if display_name.is_empty() {
            address.split('@').next().unwrap_or(address).to_string()
        } else {
            display_name.to_string()
        };

        let body = CreateAccountRequest {
            email: address.to_string(),
            password: password.to_string(),
            name,
            quota: quota_bytes(quota_mb),
            enabled: true,
        };

        let url = format!("{}/api/v1/accounts", self.config.api_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.admin_token)
            .json(&body)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }
        Ok(())
    }

    /// Fetch an account; `Ok(None)` when the mail server has no such address.
    pub async fn get_account(&self, address: &str) -> Result<Option<StalwartAccount>> {
        let response = self
            .http_client
            .get(self.account_url(address))
            .bearer_auth(&self.config.admin_token)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let account = response
            .json::<StalwartAccount>()
            .await
            .map_err(|e| AppError::upstream(0, format!("Invalid account payload: {}", e)))?;
        Ok(Some(account))
    }

    pub async fn update_password(&self, address: &str, new_password: &str) -> Result<()> {
        self.update_account(
            address,
            UpdateAccountRequest {
                password: Some(new_password.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn update_quota(&self, address: &str, quota_mb: u32) -> Result<()> {
        self.update_account(
            address,
            UpdateAccountRequest {
                quota: Some(quota_bytes(quota_mb)),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn set_enabled(&self, address: &str, enabled: bool) -> Result<()> {
        self.update_account(
            address,
            UpdateAccountRequest {
                enabled: Some(enabled),
                ..Default::default()
            },
        )
        .await
    }

    async fn update_account(&self, address: &str, update: UpdateAccountRequest) -> Result<()> {
        let response = self
            .http_client
            .put(self.account_url(address))
            .bearer_auth(&self.config.admin_token)
            .json(&update)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }
        Ok(())
    }

    /// Delete an account. Deleting an already-absent account succeeds:
    /// a 404 here means the desired state is already reached.
    pub async fn delete_account(&self, address: &str) -> Result<()> {
        let response = self
            .http_client
            .delete(self.account_url(address))
            .bearer_auth(&self.config.admin_token)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }
        Ok(())
    }

    /// Probe mail server availability. Never errors: failures are reported
    /// in the returned status.
    pub async fn health_check(&self) -> HealthStatus {
        let url = format!("{}/api/v1/health", self.config.api_url);
        let result = self
            .http_client
            .get(&url)
            .bearer_auth(&self.config.admin_token)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => HealthStatus {
                available: true,
                details: response.json().await.ok(),
                error: None,
            },
            Ok(response) => {
                let status = response.status();
                warn!(%status, "Mail server health check returned non-success");
                HealthStatus {
                    available: false,
                    details: None,
                    error: Some(format!("Health endpoint returned {}", status)),
                }
            }
            Err(e) => {
                warn!(error = %e, "Mail server health check failed");
                HealthStatus {
                    available: false,
                    details: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
