//! Domain trust lifecycle
//!
//! Owns the per-domain state machine: domains are created `pending` with
//! fresh DKIM key material, move to `verified` when all four DNS checks
//! pass, and fall back to `pending` when a later check fails. `failed` is
//! reserved for administrative marking (abuse handling) and is never set by
//! the verify operation itself.

use crate::config::MailConfig;
use crate::crypto;
use crate::dns::{record_set, DnsVerifier};
use crate::domain::{
    CreateDomainInput, DnsRecord, DomainStatus, DomainWithRecords, EmailDomain,
    VerificationReport,
};
use crate::error::{AppError, Result};
use crate::repository::{DomainRepository, MailboxRepository, TenantRepository};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct DomainService<R, MR, TR>
where
    R: DomainRepository,
    MR: MailboxRepository,
    TR: TenantRepository,
{
    repo: Arc<R>,
    mailbox_repo: Arc<MR>,
    tenant_repo: Arc<TR>,
    verifier: Arc<DnsVerifier>,
    mail: MailConfig,
}

impl<R, MR, TR> DomainService<R, MR, TR>
where
    R: DomainRepository,
    MR: MailboxRepository,
    TR: TenantRepository,
{
    pub fn new(
        repo: Arc<R>,
        mailbox_repo: Arc<MR>,
        tenant_repo: Arc<TR>,
        verifier: Arc<DnsVerifier>,
        mail: MailConfig,
    ) -> Self {
        Self {
            repo,
            mailbox_repo,
            tenant_repo,
            verifier,
            mail,
        }
    }

    /// Provision a new domain: generate DKIM keys, persist it as `pending`,
    /// and return the DNS records the tenant must publish.
    pub async fn create(
        &self,
        tenant_id: Uuid,
        input: CreateDomainInput,
    ) -> Result<DomainWithRecords> {
        input.validate()?;
        let name = input.name.trim().to_lowercase();

        // Domain names are a global namespace, not per-tenant.
        if self.repo.find_by_name(&name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Domain '{}' already exists",
                name
            )));
        }

        let tenant = self
            .tenant_repo
            .find_by_id(tenant_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tenant {} not found", tenant_id)))?;

        let domain_count = self.repo.count_by_tenant(tenant_id).await?;
        if domain_count >= i64::from(tenant.max_domains) {
            return Err(AppError::LimitExceeded(format!(
                "Domain limit reached ({})",
                tenant.max_domains
            )));
        }

        let keypair = crypto::generate_keypair()?;
        let selector = input
            .dkim_selector
            .unwrap_or_else(|| self.mail.default_dkim_selector.clone());

        let now = Utc::now();
        let domain = EmailDomain {
            id: Uuid::new_v4(),
            tenant_id,
            name,
            dkim_selector: selector,
            dkim_public_key: Some(keypair.public_key),
            dkim_private_key: Some(keypair.private_key_pem),
            mx_verified: false,
            spf_verified: false,
            dkim_verified: false,
            dmarc_verified: false,
            status: DomainStatus::Pending,
            last_verified_at: None,
            created_at: now,
            updated_at: now,
        };

        let domain = self.repo.create(&domain).await?;
        info!(domain = %domain.name, tenant_id = %tenant_id, "Domain created, awaiting DNS verification");

        let dns_records = self.records_for(&domain)?;
        Ok(DomainWithRecords {
            domain,
            dns_records,
        })
    }

    /// Tenant-scoped read with the recomputed record set.
    pub async fn get(&self, tenant_id: Uuid, domain_id: Uuid) -> Result<DomainWithRecords> {
        let domain = self.find_owned(tenant_id, domain_id).await?;
        let dns_records = self.records_for(&domain)?;
        Ok(DomainWithRecords {
            domain,
            dns_records,
        })
    }

    /// Tenant's domains, newest first.
    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<EmailDomain>> {
        self.repo.list_by_tenant(tenant_id).await
    }

    /// Run the four live DNS checks and persist the snapshot. Idempotent:
    /// repeated calls converge to the current live DNS truth. Status becomes
    /// `verified` iff every check passed, otherwise `pending`.
    pub async fn verify(&self, tenant_id: Uuid, domain_id: Uuid) -> Result<VerificationReport> {
        let domain = self.find_owned(tenant_id, domain_id).await?;
        let expected = self.records_for(&domain)?;

        let report = self.verifier.verify(&domain.name, &expected).await;
        let status = if report.all_passed() {
            DomainStatus::Verified
        } else {
            DomainStatus::Pending
        };

        self.repo
            .update_verification(domain.id, &report, status, Utc::now())
            .await?;
        info!(domain = %domain.name, %status, "Domain verification recorded");

        Ok(VerificationReport::from(report))
    }

    /// Delete a domain. Refused while mailboxes still reference it: the
    /// tenant must remove them first, so nothing is orphaned silently.
    pub async fn delete(&self, tenant_id: Uuid, domain_id: Uuid) -> Result<()> {
        let domain = self.find_owned(tenant_id, domain_id).await?;

        let mailbox_count = self.mailbox_repo.count_by_domain(domain.id).await?;
        if mailbox_count > 0 {
            return Err(AppError::Conflict(format!(
                "Domain '{}' still has {} mailbox(es); delete them first",
                domain.name, mailbox_count
            )));
        }

        self.repo.delete(domain.id).await?;
        info!(domain = %domain.name, tenant_id = %tenant_id, "Domain deleted");
        Ok(())
    }

    async fn find_owned(&self, tenant_id: Uuid, domain_id: Uuid) -> Result<EmailDomain> {
        self.repo
            .find_by_id(tenant_id, domain_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Domain {} not found", domain_id)))
    }

    fn records_for(&self, domain: &EmailDomain) -> Result<Vec<DnsRecord>> {
        let public_key = domain.dkim_public_key.as_deref().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "Domain '{}' has no DKIM public key",
                domain.name
            ))
        })?;
        Ok(record_set(
            public_key,
            &domain.dkim_selector,
            &self.mail.server_host,
        ))
    }
}
