//! DNS record value objects
//!
//! Records are derived on demand from the domain's stored key material and
//! never persisted; see `dns::records` for the builder.

use serde::{Deserialize, Serialize};

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    Mx,
    Txt,
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::Mx => write!(f, "MX"),
            RecordType::Txt => write!(f, "TXT"),
        }
    }
}

/// What a record establishes, independent of its wire type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordPurpose {
    Mx,
    Spf,
    Dkim,
    Dmarc,
}

impl std::fmt::Display for RecordPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordPurpose::Mx => write!(f, "mx"),
            RecordPurpose::Spf => write!(f, "spf"),
            RecordPurpose::Dkim => write!(f, "dkim"),
            RecordPurpose::Dmarc => write!(f, "dmarc"),
        }
    }
}

/// A DNS record the tenant must publish in their zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub record_type: RecordType,
    pub purpose: RecordPurpose,
    /// Name relative to the domain apex; `@` for the apex itself
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    pub ttl: u32,
}

impl DnsRecord {
    /// Fully qualified lookup name for this record under `domain`
    pub fn fqdn(&self, domain: &str) -> String {
        if self.name == "@" {
            domain.to_string()
        } else {
            format!("{}.{}", self.name, domain)
        }
    }
}

/// Outcome of the four live DNS checks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsCheckReport {
    pub mx: bool,
    pub spf: bool,
    pub dkim: bool,
    pub dmarc: bool,
}

impl DnsCheckReport {
    /// Whether every check passed
    pub fn all_passed(&self) -> bool {
        self.mx && self.spf && self.dkim && self.dmarc
    }
}
