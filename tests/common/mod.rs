//! In-memory fakes shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deftmail_core::dns::{DnsLookupError, DnsResolver, MxExchange};
use deftmail_core::domain::{
    DnsCheckReport, DnsRecord, DomainStatus, EmailDomain, Mailbox, MailboxStatus, RecordType,
    Tenant,
};
use deftmail_core::error::{AppError, Result};
use deftmail_core::repository::{DomainRepository, MailboxRepository, TenantRepository};
use deftmail_core::service::MailAccountGateway;
use deftmail_core::stalwart::{HealthStatus, StalwartAccount};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryDomainRepo {
    domains: RwLock<HashMap<Uuid, EmailDomain>>,
}

impl InMemoryDomainRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a domain directly, bypassing the service pipeline.
    pub fn insert(&self, domain: EmailDomain) {
        self.domains.write().unwrap().insert(domain.id, domain);
    }
}

#[async_trait]
impl DomainRepository for InMemoryDomainRepo {
    async fn create(&self, domain: &EmailDomain) -> Result<EmailDomain> {
        let mut domains = self.domains.write().unwrap();
        if domains.values().any(|d| d.name == domain.name) {
            return Err(AppError::Conflict(format!(
                "Domain '{}' already exists",
                domain.name
            )));
        }
        domains.insert(domain.id, domain.clone());
        Ok(domain.clone())
    }

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<EmailDomain>> {
        Ok(self
            .domains
            .read()
            .unwrap()
            .get(&id)
            .filter(|d| d.tenant_id == tenant_id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<EmailDomain>> {
        Ok(self
            .domains
            .read()
            .unwrap()
            .values()
            .find(|d| d.name == name)
            .cloned())
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<EmailDomain>> {
        let mut domains: Vec<EmailDomain> = self
            .domains
            .read()
            .unwrap()
            .values()
            .filter(|d| d.tenant_id == tenant_id)
            .cloned()
            .collect();
        domains.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(domains)
    }

    async fn count_by_tenant(&self, tenant_id: Uuid) -> Result<i64> {
        Ok(self
            .domains
            .read()
            .unwrap()
            .values()
            .filter(|d| d.tenant_id == tenant_id)
            .count() as i64)
    }

    async fn update_verification(
        &self,
        id: Uuid,
        report: &DnsCheckReport,
        status: DomainStatus,
        verified_at: DateTime<Utc>,
    ) -> Result<EmailDomain> {
        let mut domains = self.domains.write().unwrap();
        let domain = domains
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Domain {} not found", id)))?;
        domain.mx_verified = report.mx;
        domain.spf_verified = report.spf;
        domain.dkim_verified = report.dkim;
        domain.dmarc_verified = report.dmarc;
        domain.status = status;
        domain.last_verified_at = Some(verified_at);
        domain.updated_at = verified_at;
        Ok(domain.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.domains.write().unwrap().remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryMailboxRepo {
    mailboxes: RwLock<HashMap<Uuid, Mailbox>>,
}

impl InMemoryMailboxRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, mailbox: Mailbox) {
        self.mailboxes.write().unwrap().insert(mailbox.id, mailbox);
    }

    pub fn get(&self, id: Uuid) -> Option<Mailbox> {
        self.mailboxes.read().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl MailboxRepository for InMemoryMailboxRepo {
    async fn create(&self, mailbox: &Mailbox) -> Result<Mailbox> {
        let mut mailboxes = self.mailboxes.write().unwrap();
        if mailboxes.values().any(|m| m.address == mailbox.address) {
            return Err(AppError::Conflict(format!(
                "Mailbox '{}' already exists",
                mailbox.address
            )));
        }
        mailboxes.insert(mailbox.id, mailbox.clone());
        Ok(mailbox.clone())
    }

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Mailbox>> {
        Ok(self
            .mailboxes
            .read()
            .unwrap()
            .get(&id)
            .filter(|m| m.tenant_id == tenant_id)
            .cloned())
    }

    async fn find_by_address(&self, address: &str) -> Result<Option<Mailbox>> {
        Ok(self
            .mailboxes
            .read()
            .unwrap()
            .values()
            .find(|m| m.address == address)
            .cloned())
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Mailbox>> {
        let mut mailboxes: Vec<Mailbox> = self
            .mailboxes
            .read()
            .unwrap()
            .values()
            .filter(|m| m.tenant_id == tenant_id)
            .cloned()
            .collect();
        mailboxes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mailboxes)
    }

    async fn count_by_domain(&self, domain_id: Uuid) -> Result<i64> {
        Ok(self
            .mailboxes
            .read()
            .unwrap()
            .values()
            .filter(|m| m.domain_id == domain_id)
            .count() as i64)
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<()> {
        let mut mailboxes = self.mailboxes.write().unwrap();
        let mailbox = mailboxes
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Mailbox {} not found", id)))?;
        mailbox.password_hash = password_hash.to_string();
        mailbox.updated_at = Utc::now();
        Ok(())
    }

    async fn update_quota(&self, id: Uuid, quota_mb: u32) -> Result<()> {
        let mut mailboxes = self.mailboxes.write().unwrap();
        let mailbox = mailboxes
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Mailbox {} not found", id)))?;
        mailbox.quota_mb = quota_mb;
        mailbox.updated_at = Utc::now();
        Ok(())
    }

    async fn update_status(&self, id: Uuid, status: MailboxStatus) -> Result<()> {
        let mut mailboxes = self.mailboxes.write().unwrap();
        let mailbox = mailboxes
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Mailbox {} not found", id)))?;
        mailbox.status = status;
        mailbox.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.mailboxes.write().unwrap().remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryTenantRepo {
    tenants: RwLock<HashMap<Uuid, Tenant>>,
}

impl InMemoryTenantRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, tenant: Tenant) {
        self.tenants.write().unwrap().insert(tenant.id, tenant);
    }
}

#[async_trait]
impl TenantRepository for InMemoryTenantRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>> {
        Ok(self.tenants.read().unwrap().get(&id).cloned())
    }
}

// ---------------------------------------------------------------------------
// DNS resolver with scripted zone contents
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StaticDnsResolver {
    mx: RwLock<HashMap<String, Vec<MxExchange>>>,
    txt: RwLock<HashMap<String, Vec<String>>>,
}

impl StaticDnsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a derived record set into the fake zone, the way a tenant
    /// would at their DNS provider.
    pub fn publish(&self, domain: &str, records: &[DnsRecord]) {
        for record in records {
            let fqdn = record.fqdn(domain);
            match record.record_type {
                RecordType::Mx => {
                    self.mx.write().unwrap().entry(fqdn).or_default().push(MxExchange {
                        host: record.value.clone(),
                        preference: record.priority.unwrap_or(10),
                    });
                }
                RecordType::Txt => {
                    self.txt
                        .write()
                        .unwrap()
                        .entry(fqdn)
                        .or_default()
                        .push(record.value.clone());
                }
            }
        }
    }

    pub fn remove_txt(&self, fqdn: &str) {
        self.txt.write().unwrap().remove(fqdn);
    }
}

#[async_trait]
impl DnsResolver for StaticDnsResolver {
    async fn lookup_mx(&self, name: &str) -> std::result::Result<Vec<MxExchange>, DnsLookupError> {
        self.mx
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .filter(|records| !records.is_empty())
            .ok_or_else(|| DnsLookupError::NoRecords(name.to_string()))
    }

    async fn lookup_txt(&self, name: &str) -> std::result::Result<Vec<String>, DnsLookupError> {
        self.txt
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .filter(|records| !records.is_empty())
            .ok_or_else(|| DnsLookupError::NoRecords(name.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Fake mail server gateway
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FakeAccount {
    pub password: String,
    pub name: String,
    pub quota_mb: u32,
    pub enabled: bool,
}

/// Stateful stand-in for the mail server. Flip `unreachable` to simulate an
/// outage; every call is recorded for ordering assertions.
#[derive(Default)]
pub struct FakeMailGateway {
    pub accounts: Mutex<HashMap<String, FakeAccount>>,
    pub unreachable: AtomicBool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeMailGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn account(&self, address: &str) -> Option<FakeAccount> {
        self.accounts.lock().unwrap().get(address).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record_call(&self, call: impl Into<String>) -> Result<()> {
        self.calls.lock().unwrap().push(call.into());
        if self.unreachable.load(Ordering::SeqCst) {
            Err(AppError::upstream(0, "connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MailAccountGateway for FakeMailGateway {
    async fn create_account(
        &self,
        address: &str,
        password: &str,
        display_name: &str,
        quota_mb: u32,
    ) -> Result<()> {
        self.record_call(format!("create {}", address))?;
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(address) {
            return Err(AppError::upstream(409, "account already exists"));
        }
        accounts.insert(
            address.to_string(),
            FakeAccount {
                password: password.to_string(),
                name: display_name.to_string(),
                quota_mb,
                enabled: true,
            },
        );
        Ok(())
    }

    async fn get_account(&self, address: &str) -> Result<Option<StalwartAccount>> {
        self.record_call(format!("get {}", address))?;
        Ok(self.accounts.lock().unwrap().get(address).map(|account| {
            StalwartAccount {
                email: address.to_string(),
                name: Some(account.name.clone()),
                quota: Some(u64::from(account.quota_mb) * 1024 * 1024),
                enabled: account.enabled,
            }
        }))
    }

    async fn update_password(&self, address: &str, new_password: &str) -> Result<()> {
        self.record_call(format!("update_password {}", address))?;
        match self.accounts.lock().unwrap().get_mut(address) {
            Some(account) => {
                account.password = new_password.to_string();
                Ok(())
            }
            None => Err(AppError::upstream(404, "no such account")),
        }
    }

    async fn update_quota(&self, address: &str, quota_mb: u32) -> Result<()> {
        self.record_call(format!("update_quota {}", address))?;
        match self.accounts.lock().unwrap().get_mut(address) {
            Some(account) => {
                account.quota_mb = quota_mb;
                Ok(())
            }
            None => Err(AppError::upstream(404, "no such account")),
        }
    }

    async fn set_enabled(&self, address: &str, enabled: bool) -> Result<()> {
        self.record_call(format!("set_enabled {}", address))?;
        match self.accounts.lock().unwrap().get_mut(address) {
            Some(account) => {
                account.enabled = enabled;
                Ok(())
            }
            None => Err(AppError::upstream(404, "no such account")),
        }
    }

    async fn delete_account(&self, address: &str) -> Result<()> {
        self.record_call(format!("delete {}", address))?;
        // Deleting an absent account is success, mirroring the 404 rule.
        self.accounts.lock().unwrap().remove(address);
        Ok(())
    }

    async fn health_check(&self) -> HealthStatus {
        let unreachable = self.unreachable.load(Ordering::SeqCst);
        HealthStatus {
            available: !unreachable,
            details: None,
            error: unreachable.then(|| "connection refused".to_string()),
        }
    }
}
