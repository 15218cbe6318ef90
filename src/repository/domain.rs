//! Email domain repository contract

use crate::domain::{DnsCheckReport, DomainStatus, EmailDomain};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainRepository: Send + Sync {
    /// Insert a new domain; `Conflict` when the name is already taken.
    async fn create(&self, domain: &EmailDomain) -> Result<EmailDomain>;

    /// Tenant-scoped read; a domain owned by another tenant is absent.
    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<EmailDomain>>;

    /// Global lookup: domain names are a platform-wide namespace.
    async fn find_by_name(&self, name: &str) -> Result<Option<EmailDomain>>;

    /// Tenant's domains, newest first.
    async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<EmailDomain>>;

    async fn count_by_tenant(&self, tenant_id: Uuid) -> Result<i64>;

    /// Persist a verification snapshot: the four flags, the derived status,
    /// and the observation timestamp, in one write.
    async fn update_verification(
        &self,
        id: Uuid,
        report: &DnsCheckReport,
        status: DomainStatus,
        verified_at: DateTime<Utc>,
    ) -> Result<EmailDomain>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}
