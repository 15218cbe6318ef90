//! Mailbox provisioning
//!
//! Mailboxes exist only under a verified domain. Local persistence is the
//! system of record; the mail server mirror is pushed best-effort through
//! [`MailSyncService`], so an unreachable mail server degrades the flow
//! instead of failing it. The plaintext credential is hashed for local
//! storage and forwarded exactly once upstream; it is never persisted or
//! logged.

use crate::domain::{
    CreateMailboxInput, DomainStatus, Mailbox, MailboxStatus, UpdateMailboxPasswordInput,
    UpdateMailboxQuotaInput,
};
use crate::error::{AppError, Result};
use crate::repository::{DomainRepository, MailboxRepository};
use crate::service::mail_sync::MailSyncService;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Creation result carrying the degraded-state signal: the mailbox row is
/// authoritative even when the mail server could not be reached.
#[derive(Debug, Clone)]
pub struct CreatedMailbox {
    pub mailbox: Mailbox,
    /// Whether the mail server mirrors the account already
    pub upstream_synced: bool,
}

pub struct MailboxService<R, DR>
where
    R: MailboxRepository,
    DR: DomainRepository,
{
    repo: Arc<R>,
    domain_repo: Arc<DR>,
    sync: Arc<MailSyncService>,
    default_quota_mb: u32,
}

impl<R, DR> MailboxService<R, DR>
where
    R: MailboxRepository,
    DR: DomainRepository,
{
    pub fn new(
        repo: Arc<R>,
        domain_repo: Arc<DR>,
        sync: Arc<MailSyncService>,
        default_quota_mb: u32,
    ) -> Self {
        Self {
            repo,
            domain_repo,
            sync,
            default_quota_mb,
        }
    }

    /// Create a mailbox under a verified domain, then push it to the mail
    /// server best-effort. The verified-domain gate runs before any
    /// upstream call.
    pub async fn create(&self, tenant_id: Uuid, input: CreateMailboxInput) -> Result<CreatedMailbox> {
        input.validate()?;

        let domain = self
            .domain_repo
            .find_by_id(tenant_id, input.domain_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Domain {} not found", input.domain_id)))?;

        if domain.status != DomainStatus::Verified {
            return Err(AppError::DomainNotVerified(format!(
                "Domain '{}' must be verified before creating mailboxes",
                domain.name
            )));
        }

        let address = format!("{}@{}", input.local_part.to_lowercase(), domain.name);

        if self.repo.find_by_address(&address).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Mailbox '{}' already exists",
                address
            )));
        }

        let quota_mb = input.quota_mb.unwrap_or(self.default_quota_mb);
        let password_hash = hash_password(&input.password)?;

        let now = Utc::now();
        let mailbox = Mailbox {
            id: Uuid::new_v4(),
            tenant_id,
            domain_id: domain.id,
            address: address.clone(),
            display_name: input.display_name.clone(),
            password_hash,
            quota_mb,
            status: MailboxStatus::Active,
            created_at: now,
            updated_at: now,
        };

        let mailbox = self.repo.create(&mailbox).await?;
        info!(address = %mailbox.address, tenant_id = %tenant_id, "Mailbox created");

        // Best-effort: the local record stands even if the mail server is
        // unreachable; a later sync reconciles.
        let upstream_synced = self
            .sync
            .push_account(&address, &input.password, &input.display_name, quota_mb)
            .await;

        Ok(CreatedMailbox {
            mailbox,
            upstream_synced,
        })
    }

    pub async fn get(&self, tenant_id: Uuid, mailbox_id: Uuid) -> Result<Mailbox> {
        self.find_owned(tenant_id, mailbox_id).await
    }

    /// Tenant's mailboxes, newest first.
    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<Mailbox>> {
        self.repo.list_by_tenant(tenant_id).await
    }

    /// Delete a mailbox: resolve the local record first, remove the
    /// upstream account by its resolved address best-effort, then delete
    /// locally. Upstream unavailability never blocks local deletion.
    pub async fn delete(&self, tenant_id: Uuid, mailbox_id: Uuid) -> Result<()> {
        let mailbox = self.find_owned(tenant_id, mailbox_id).await?;

        self.sync.remove_account(&mailbox.address).await;

        self.repo.delete(mailbox.id).await?;
        info!(address = %mailbox.address, "Mailbox deleted");
        Ok(())
    }

    /// Rotate the credential: push upstream best-effort, then store the new
    /// hash locally.
    pub async fn update_password(
        &self,
        tenant_id: Uuid,
        mailbox_id: Uuid,
        input: UpdateMailboxPasswordInput,
    ) -> Result<()> {
        input.validate()?;
        let mailbox = self.find_owned(tenant_id, mailbox_id).await?;

        self.sync
            .push_password(&mailbox.address, &input.password)
            .await;

        let password_hash = hash_password(&input.password)?;
        self.repo
            .update_password_hash(mailbox.id, &password_hash)
            .await?;
        info!(address = %mailbox.address, "Mailbox password updated");
        Ok(())
    }

    /// Resize the quota locally, then push it upstream best-effort.
    pub async fn update_quota(
        &self,
        tenant_id: Uuid,
        mailbox_id: Uuid,
        input: UpdateMailboxQuotaInput,
    ) -> Result<()> {
        input.validate()?;
        let mailbox = self.find_owned(tenant_id, mailbox_id).await?;

        self.repo.update_quota(mailbox.id, input.quota_mb).await?;
        self.sync
            .push_quota(&mailbox.address, input.quota_mb)
            .await;
        info!(address = %mailbox.address, quota_mb = input.quota_mb, "Mailbox quota updated");
        Ok(())
    }

    /// Suspend or reactivate a mailbox locally and mirror the enabled flag
    /// upstream best-effort.
    pub async fn set_status(
        &self,
        tenant_id: Uuid,
        mailbox_id: Uuid,
        status: MailboxStatus,
    ) -> Result<()> {
        let mailbox = self.find_owned(tenant_id, mailbox_id).await?;

        self.repo.update_status(mailbox.id, status).await?;
        self.sync
            .push_enabled(&mailbox.address, status.is_enabled())
            .await;
        info!(address = %mailbox.address, %status, "Mailbox status updated");
        Ok(())
    }

    async fn find_owned(&self, tenant_id: Uuid, mailbox_id: Uuid) -> Result<Mailbox> {
        self.repo
            .find_by_id(tenant_id, mailbox_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Mailbox {} not found", mailbox_id)))
    }
}

/// Hash a mailbox credential with Argon2 for local storage.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}
