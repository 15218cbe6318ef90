//! Tenant repository contract
//!
//! Read-only: the engine only needs the tenant row for plan-limit checks.

use crate::domain::Tenant;
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>>;
}
