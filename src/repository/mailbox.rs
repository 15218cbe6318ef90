//! Mailbox repository contract

use crate::domain::{Mailbox, MailboxStatus};
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailboxRepository: Send + Sync {
    /// Insert a new mailbox; `Conflict` when the address is already taken.
    async fn create(&self, mailbox: &Mailbox) -> Result<Mailbox>;

    /// Tenant-scoped read.
    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Mailbox>>;

    /// Global lookup; addresses are unique across the platform.
    async fn find_by_address(&self, address: &str) -> Result<Option<Mailbox>>;

    /// Tenant's mailboxes, newest first.
    async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Mailbox>>;

    /// Mailboxes still referencing a domain (domain deletion precondition).
    async fn count_by_domain(&self, domain_id: Uuid) -> Result<i64>;

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<()>;

    async fn update_quota(&self, id: Uuid, quota_mb: u32) -> Result<()>;

    async fn update_status(&self, id: Uuid, status: MailboxStatus) -> Result<()>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}
