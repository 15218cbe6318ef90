//! Mailbox account synchronization with the mail server
//!
//! Local mailbox rows are the platform's source of truth for what should
//! exist; the mail server mirrors them eventually. This service owns that
//! reconciliation: an idempotent upsert for states that may have diverged,
//! and best-effort push/remove wrappers for the flows where an unreachable
//! mail server must not fail the local operation.

use crate::error::Result;
use crate::stalwart::{HealthStatus, StalwartAccount, StalwartClient};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Mail server operations the synchronizer needs.
///
/// A trait here keeps unit tests fast and independent from HTTP mocking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailAccountGateway: Send + Sync {
    async fn create_account(
        &self,
        address: &str,
        password: &str,
        display_name: &str,
        quota_mb: u32,
    ) -> Result<()>;
    async fn get_account(&self, address: &str) -> Result<Option<StalwartAccount>>;
    async fn update_password(&self, address: &str, new_password: &str) -> Result<()>;
    async fn update_quota(&self, address: &str, quota_mb: u32) -> Result<()>;
    async fn set_enabled(&self, address: &str, enabled: bool) -> Result<()>;
    async fn delete_account(&self, address: &str) -> Result<()>;
    async fn health_check(&self) -> HealthStatus;
}

#[async_trait]
impl MailAccountGateway for StalwartClient {
    async fn create_account(
        &self,
        address: &str,
        password: &str,
        display_name: &str,
        quota_mb: u32,
    ) -> Result<()> {
        StalwartClient::create_account(self, address, password, display_name, quota_mb).await
    }

    async fn get_account(&self, address: &str) -> Result<Option<StalwartAccount>> {
        StalwartClient::get_account(self, address).await
    }

    async fn update_password(&self, address: &str, new_password: &str) -> Result<()> {
        StalwartClient::update_password(self, address, new_password).await
    }

    async fn update_quota(&self, address: &str, quota_mb: u32) -> Result<()> {
        StalwartClient::update_quota(self, address, quota_mb).await
    }

    async fn set_enabled(&self, address: &str, enabled: bool) -> Result<()> {
        StalwartClient::set_enabled(self, address, enabled).await
    }

    async fn delete_account(&self, address: &str) -> Result<()> {
        StalwartClient::delete_account(self, address).await
    }

    async fn health_check(&self) -> HealthStatus {
        StalwartClient::health_check(self).await
    }
}

/// What `sync_account` did upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    Updated,
}

pub struct MailSyncService {
    gateway: Arc<dyn MailAccountGateway>,
}

impl MailSyncService {
    pub fn new(gateway: Arc<dyn MailAccountGateway>) -> Self {
        Self { gateway }
    }

    /// Idempotent upsert: probe for the account first, then create or
    /// update. Safe to call whenever local and remote state may have
    /// diverged; a second call with the same inputs updates in place.
    pub async fn sync_account(
        &self,
        address: &str,
        password: &str,
        display_name: &str,
        quota_mb: u32,
    ) -> Result<SyncOutcome> {
        match self.gateway.get_account(address).await? {
            Some(_) => {
                self.gateway.update_password(address, password).await?;
                self.gateway.update_quota(address, quota_mb).await?;
                Ok(SyncOutcome::Updated)
            }
            None => {
                self.gateway
                    .create_account(address, password, display_name, quota_mb)
                    .await?;
                Ok(SyncOutcome::Created)
            }
        }
    }

    /// Best-effort upsert used by mailbox creation. Returns whether the
    /// mail server now mirrors the account; a `false` is a degraded-state
    /// signal, not a failure of the local operation.
    pub async fn push_account(
        &self,
        address: &str,
        password: &str,
        display_name: &str,
        quota_mb: u32,
    ) -> bool {
        match self
            .sync_account(address, password, display_name, quota_mb)
            .await
        {
            Ok(outcome) => {
                info!(address, ?outcome, "Mailbox synced to mail server");
                true
            }
            Err(e) => {
                warn!(address, error = %e, "Mail server sync failed; local mailbox stands");
                false
            }
        }
    }

    /// Best-effort password push. The local hash update proceeds either way.
    pub async fn push_password(&self, address: &str, new_password: &str) -> bool {
        match self.gateway.update_password(address, new_password).await {
            Ok(()) => true,
            Err(e) => {
                warn!(address, error = %e, "Mail server password update failed");
                false
            }
        }
    }

    /// Best-effort quota push.
    pub async fn push_quota(&self, address: &str, quota_mb: u32) -> bool {
        match self.gateway.update_quota(address, quota_mb).await {
            Ok(()) => true,
            Err(e) => {
                warn!(address, quota_mb, error = %e, "Mail server quota update failed");
                false
            }
        }
    }

    /// Best-effort enable/disable push.
    pub async fn push_enabled(&self, address: &str, enabled: bool) -> bool {
        match self.gateway.set_enabled(address, enabled).await {
            Ok(()) => true,
            Err(e) => {
                warn!(address, enabled, error = %e, "Mail server status update failed");
                false
            }
        }
    }

    /// Best-effort removal used by mailbox deletion. Local deletion
    /// proceeds regardless; an orphaned upstream account is reconciled by
    /// a later `sync_account` or manual cleanup.
    pub async fn remove_account(&self, address: &str) -> bool {
        match self.gateway.delete_account(address).await {
            Ok(()) => true,
            Err(e) => {
                warn!(address, error = %e, "Mail server account deletion failed");
                false
            }
        }
    }

    /// Mail server availability probe; never errors.
    pub async fn health_check(&self) -> HealthStatus {
        self.gateway.health_check().await
    }
}
