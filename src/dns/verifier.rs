//! Live DNS verification
//!
//! Runs the four provisioning checks (MX, SPF, DKIM, DMARC) against live
//! DNS. Each check is fault-isolated: a resolution failure flips that one
//! flag to `false` and is logged, never propagated, so `verify` always
//! returns a complete report. The checks share no state and run
//! concurrently; that is a latency optimization, not a correctness
//! requirement.

use crate::config::{DnsConfig, MxMatchMode};
use crate::dns::resolver::{DnsLookupError, DnsResolver};
use crate::domain::{DnsCheckReport, DnsRecord, RecordPurpose};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct DnsVerifier {
    resolver: Arc<dyn DnsResolver>,
    mx_match_mode: MxMatchMode,
}

impl DnsVerifier {
    pub fn new(resolver: Arc<dyn DnsResolver>, config: &DnsConfig) -> Self {
        Self {
            resolver,
            mx_match_mode: config.mx_match_mode,
        }
    }

    /// Check the domain's published DNS against the expected record set.
    /// Never fails; unresolved checks report `false`.
    pub async fn verify(&self, domain: &str, expected: &[DnsRecord]) -> DnsCheckReport {
        let (mx, spf, dkim, dmarc) = tokio::join!(
            self.check_mx(domain, expected),
            self.check_spf(domain),
            self.check_dkim(domain, expected),
            self.check_dmarc(domain),
        );

        let report = DnsCheckReport { mx, spf, dkim, dmarc };
        debug!(
            domain,
            mx = report.mx,
            spf = report.spf,
            dkim = report.dkim,
            dmarc = report.dmarc,
            "DNS verification completed"
        );
        report
    }

    async fn check_mx(&self, domain: &str, expected: &[DnsRecord]) -> bool {
        let Some(expected_mx) = expected.iter().find(|r| r.purpose == RecordPurpose::Mx) else {
            return false;
        };

        match self.resolver.lookup_mx(domain).await {
            Ok(exchanges) => exchanges
                .iter()
                .any(|ex| self.mx_matches(&ex.host, &expected_mx.value)),
            Err(e) => {
                log_unresolved("mx", domain, &e);
                false
            }
        }
    }

    /// Compare a published exchange against the expected mail server host.
    /// `FirstLabel` tolerates provider-side aliasing (`mail-ingress.…` still
    /// contains `mail`); `Exact` requires full host equality.
    fn mx_matches(&self, exchange: &str, expected: &str) -> bool {
        let exchange = exchange.trim_end_matches('.');
        match self.mx_match_mode {
            MxMatchMode::FirstLabel => expected
                .split('.')
                .next()
                .is_some_and(|label| !label.is_empty() && exchange.contains(label)),
            MxMatchMode::Exact => exchange.eq_ignore_ascii_case(expected),
        }
    }

    async fn check_spf(&self, domain: &str) -> bool {
        match self.resolver.lookup_txt(domain).await {
            Ok(records) => records.iter().any(|r| r.starts_with("v=spf1")),
            Err(e) => {
                log_unresolved("spf", domain, &e);
                false
            }
        }
    }

    async fn check_dkim(&self, domain: &str, expected: &[DnsRecord]) -> bool {
        let Some(dkim_record) = expected.iter().find(|r| r.purpose == RecordPurpose::Dkim) else {
            return false;
        };
        let name = dkim_record.fqdn(domain);

        match self.resolver.lookup_txt(&name).await {
            Ok(records) => records.iter().any(|r| r.contains("v=DKIM1")),
            Err(e) => {
                log_unresolved("dkim", &name, &e);
                false
            }
        }
    }

    async fn check_dmarc(&self, domain: &str) -> bool {
        let name = format!("_dmarc.{}", domain);

        match self.resolver.lookup_txt(&name).await {
            Ok(records) => records.iter().any(|r| r.starts_with("v=DMARC1")),
            Err(e) => {
                log_unresolved("dmarc", &name, &e);
                false
            }
        }
    }
}

/// Absent records are routine while the tenant is still publishing; only
/// transient resolver faults are worth a warning.
fn log_unresolved(check: &str, name: &str, err: &DnsLookupError) {
    if err.is_no_records() {
        debug!(check, name, "record not published");
    } else {
        warn!(check, name, error = %err, "DNS lookup failed");
    }
}
