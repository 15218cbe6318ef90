//! Mailbox account model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Mailbox status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailboxStatus {
    #[default]
    Active,
    Suspended,
}

impl MailboxStatus {
    /// The `enabled` flag the mail server expects for this status
    pub fn is_enabled(&self) -> bool {
        matches!(self, MailboxStatus::Active)
    }
}

impl std::str::FromStr for MailboxStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(MailboxStatus::Active),
            "suspended" => Ok(MailboxStatus::Suspended),
            _ => Err(format!("Unknown mailbox status: {}", s)),
        }
    }
}

impl std::fmt::Display for MailboxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MailboxStatus::Active => write!(f, "active"),
            MailboxStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// Mailbox account under a verified domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mailbox {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub domain_id: Uuid,
    /// Full address (`local-part@domain`), stored lowercase
    pub address: String,
    pub display_name: String,
    /// Argon2 hash of the mailbox credential. Never serialized; the
    /// plaintext itself is forwarded once to the mail server and dropped.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub quota_mb: u32,
    pub status: MailboxStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Mailbox {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            domain_id: Uuid::new_v4(),
            address: String::new(),
            display_name: String::new(),
            password_hash: String::new(),
            quota_mb: 1024,
            status: MailboxStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a mailbox
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMailboxInput {
    pub domain_id: Uuid,
    #[validate(length(min = 1, max = 64), custom(function = "validate_local_part"))]
    pub local_part: String,
    #[validate(length(min = 1, max = 255))]
    pub display_name: String,
    /// Plaintext credential; hashed locally, forwarded once upstream
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Defaults from configuration when absent
    #[validate(range(min = 1))]
    pub quota_mb: Option<u32>,
}

/// Input for rotating a mailbox credential
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMailboxPasswordInput {
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Input for resizing a mailbox quota
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMailboxQuotaInput {
    #[validate(range(min = 1))]
    pub quota_mb: u32,
}

/// Validate the local part of an address (dot-atom, no edge separators)
fn validate_local_part(local_part: &str) -> Result<(), validator::ValidationError> {
    if LOCAL_PART_REGEX.is_match(local_part) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_local_part"))
    }
}

// Regex for local part validation
lazy_static::lazy_static! {
    pub static ref LOCAL_PART_REGEX: regex::Regex =
        regex::Regex::new(r"(?i)^[a-z0-9]+(?:[._+-][a-z0-9]+)*$").unwrap();
}
