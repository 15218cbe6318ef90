//! DNS resolver collaborator
//!
//! The verifier talks to DNS through the [`DnsResolver`] trait so tests can
//! script zone contents. The production implementation wraps
//! hickory-resolver with a bounded per-lookup timeout; an unreachable
//! resolver must never hang a verification request.

use crate::config::DnsConfig;
use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::{ResolveError, TokioResolver};
use std::time::Duration;
use thiserror::Error;

/// Why a lookup produced no usable answer
#[derive(Debug, Error)]
pub enum DnsLookupError {
    /// NXDOMAIN or an empty answer: the record is not published.
    #[error("no records found for {0}")]
    NoRecords(String),

    /// The lookup did not complete within the configured timeout.
    #[error("lookup for {0} timed out after {1}s")]
    Timeout(String, u64),

    /// SERVFAIL, network failure, or any other resolver error.
    #[error("resolution failed for {0}: {1}")]
    Resolution(String, String),
}

impl DnsLookupError {
    /// Whether the failure means "not published" rather than "could not ask"
    pub fn is_no_records(&self) -> bool {
        matches!(self, DnsLookupError::NoRecords(_))
    }
}

/// One MX answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxExchange {
    /// Exchange host with the trailing dot stripped
    pub host: String,
    pub preference: u16,
}

/// MX and TXT lookups, the only record types verification needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn lookup_mx(&self, name: &str) -> Result<Vec<MxExchange>, DnsLookupError>;
    /// TXT answers with the character-string chunks of each record joined
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsLookupError>;
}

/// Production resolver backed by the system DNS configuration
pub struct HickoryDnsResolver {
    resolver: TokioResolver,
    lookup_timeout: Duration,
}

impl HickoryDnsResolver {
    pub fn new(config: &DnsConfig) -> Self {
        let resolver = TokioResolver::builder_with_config(
            ResolverConfig::default(),
            TokioConnectionProvider::default(),
        )
        .with_options(ResolverOpts::default())
        .build();

        Self {
            resolver,
            lookup_timeout: Duration::from_secs(config.lookup_timeout_secs),
        }
    }

    fn classify(name: &str, err: &ResolveError) -> DnsLookupError {
        if err.is_no_records_found() || err.is_nx_domain() {
            DnsLookupError::NoRecords(name.to_string())
        } else {
            DnsLookupError::Resolution(name.to_string(), err.to_string())
        }
    }
}

#[async_trait]
impl DnsResolver for HickoryDnsResolver {
    async fn lookup_mx(&self, name: &str) -> Result<Vec<MxExchange>, DnsLookupError> {
        let lookup = tokio::time::timeout(self.lookup_timeout, self.resolver.mx_lookup(name))
            .await
            .map_err(|_| DnsLookupError::Timeout(name.to_string(), self.lookup_timeout.as_secs()))?
            .map_err(|e| Self::classify(name, &e))?;

        let exchanges: Vec<MxExchange> = lookup
            .iter()
            .map(|mx| MxExchange {
                host: mx.exchange().to_string().trim_end_matches('.').to_string(),
                preference: mx.preference(),
            })
            .collect();

        if exchanges.is_empty() {
            return Err(DnsLookupError::NoRecords(name.to_string()));
        }
        Ok(exchanges)
    }

    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsLookupError> {
        let lookup = tokio::time::timeout(self.lookup_timeout, self.resolver.txt_lookup(name))
            .await
            .map_err(|_| DnsLookupError::Timeout(name.to_string(), self.lookup_timeout.as_secs()))?
            .map_err(|e| Self::classify(name, &e))?;

        let records: Vec<String> = lookup
            .iter()
            .map(|txt| {
                txt.iter()
                    .map(|chunk| String::from_utf8_lossy(chunk).to_string())
                    .collect::<String>()
            })
            .collect();

        if records.is_empty() {
            return Err(DnsLookupError::NoRecords(name.to_string()));
        }
        Ok(records)
    }
}
