//! Request/response types for the Stalwart admin API

use serde::{Deserialize, Serialize};

/// Payload for creating an account
#[derive(Debug, Clone, Serialize)]
pub struct CreateAccountRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    /// Quota in bytes
    pub quota: u64,
    pub enabled: bool,
}

/// Partial update; only the set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAccountRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Quota in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Account state as reported by the mail server
#[derive(Debug, Clone, Deserialize)]
pub struct StalwartAccount {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Quota in bytes
    #[serde(default)]
    pub quota: Option<u64>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Mail server availability probe result
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub available: bool,
    /// Health endpoint payload when reachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Failure description when unreachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Convert the platform's megabyte quotas to the bytes Stalwart expects.
pub fn quota_bytes(quota_mb: u32) -> u64 {
    u64::from(quota_mb) * 1024 * 1024
}
