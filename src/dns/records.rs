//! Canonical DNS record set derivation
//!
//! The four records a tenant must publish before their domain can send mail
//! through the platform. Derivation is pure: the same key material and mail
//! server host always produce byte-identical records, so they are recomputed
//! on demand rather than stored.

use crate::domain::{DnsRecord, RecordPurpose, RecordType};

/// TTL applied to every provisioning record
pub const RECORD_TTL: u32 = 3600;

/// Priority of the platform MX record
pub const MX_PRIORITY: u16 = 10;

/// Derive the four-record set for a domain, in the fixed order
/// MX, SPF, DKIM, DMARC.
///
/// The DMARC policy (quarantine, strict alignment) is a platform default
/// and not configurable per domain.
pub fn record_set(
    dkim_public_key: &str,
    dkim_selector: &str,
    mail_server_host: &str,
) -> Vec<DnsRecord> {
    vec![
        DnsRecord {
            record_type: RecordType::Mx,
            purpose: RecordPurpose::Mx,
            name: "@".to_string(),
            value: mail_server_host.to_string(),
            priority: Some(MX_PRIORITY),
            ttl: RECORD_TTL,
        },
        DnsRecord {
            record_type: RecordType::Txt,
            purpose: RecordPurpose::Spf,
            name: "@".to_string(),
            value: format!("v=spf1 mx include:{} ~all", mail_server_host),
            priority: None,
            ttl: RECORD_TTL,
        },
        DnsRecord {
            record_type: RecordType::Txt,
            purpose: RecordPurpose::Dkim,
            name: format!("{}._domainkey", dkim_selector),
            value: dkim_txt_value(dkim_public_key),
            priority: None,
            ttl: RECORD_TTL,
        },
        DnsRecord {
            record_type: RecordType::Txt,
            purpose: RecordPurpose::Dmarc,
            name: "_dmarc".to_string(),
            value: format!(
                "v=DMARC1; p=quarantine; rua=mailto:dmarc@{}; pct=100; adkim=s; aspf=s",
                mail_server_host
            ),
            priority: None,
            ttl: RECORD_TTL,
        },
    ]
}

/// The TXT value publishing a DKIM public key
pub fn dkim_txt_value(public_key: &str) -> String {
    format!("v=DKIM1; k=rsa; p={}", public_key)
}
