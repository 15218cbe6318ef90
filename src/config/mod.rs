//! Configuration management for DeftMail Core

use anyhow::{Context, Result};
use std::env;

/// How the MX verification compares a published exchange host against the
/// expected mail server host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MxMatchMode {
    /// The first label of the expected host (e.g. `mail` for
    /// `mail.deftmail.com`) must appear somewhere in the exchange host.
    /// Tolerates provider aliasing such as `mail-ingress.deftmail.com`.
    #[default]
    FirstLabel,
    /// The exchange host must equal the expected host exactly, after
    /// stripping the trailing dot.
    Exact,
}

impl std::str::FromStr for MxMatchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first_label" => Ok(MxMatchMode::FirstLabel),
            "exact" => Ok(MxMatchMode::Exact),
            _ => Err(format!("Unknown MX match mode: {}", s)),
        }
    }
}

impl std::fmt::Display for MxMatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MxMatchMode::FirstLabel => write!(f, "first_label"),
            MxMatchMode::Exact => write!(f, "exact"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Mail platform configuration
    pub mail: MailConfig,
    /// Stalwart control plane configuration
    pub stalwart: StalwartConfig,
    /// DNS verification configuration
    pub dns: DnsConfig,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Host tenants point their MX records at (e.g. mail.deftmail.com)
    pub server_host: String,
    /// DKIM selector assigned to newly created domains
    pub default_dkim_selector: String,
    /// Mailbox quota in megabytes when the caller does not choose one
    pub default_quota_mb: u32,
}

#[derive(Debug, Clone)]
pub struct StalwartConfig {
    /// Base URL of the Stalwart admin API (e.g. http://localhost:8080)
    pub api_url: String,
    /// Bearer token for the admin API
    pub admin_token: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct DnsConfig {
    /// MX exchange comparison mode
    pub mx_match_mode: MxMatchMode,
    /// Per-lookup timeout in seconds
    pub lookup_timeout_secs: u64,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            mx_match_mode: MxMatchMode::default(),
            lookup_timeout_secs: 5,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            mail: MailConfig {
                server_host: env::var("MAIL_SERVER_HOST")
                    .unwrap_or_else(|_| "mail.deftmail.com".to_string()),
                default_dkim_selector: env::var("DKIM_SELECTOR")
                    .unwrap_or_else(|_| "default".to_string()),
                default_quota_mb: env::var("MAILBOX_DEFAULT_QUOTA_MB")
                    .unwrap_or_else(|_| "1024".to_string())
                    .parse()
                    .unwrap_or(1024),
            },
            stalwart: StalwartConfig {
                api_url: env::var("STALWART_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8080".to_string()),
                admin_token: env::var("STALWART_ADMIN_TOKEN")
                    .context("STALWART_ADMIN_TOKEN is required")?,
                timeout_secs: env::var("STALWART_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap_or(30),
            },
            dns: DnsConfig {
                mx_match_mode: env::var("DNS_MX_MATCH_MODE")
                    .unwrap_or_else(|_| "first_label".to_string())
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))
                    .context("Invalid DNS_MX_MATCH_MODE")?,
                lookup_timeout_secs: env::var("DNS_LOOKUP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
            },
        })
    }
}
