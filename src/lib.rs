//! DeftMail Core - Domain Trust & Provisioning Engine
//!
//! This crate provides the core of the DeftMail hosted-mail platform:
//! DKIM key generation, DNS record derivation and live verification, the
//! domain trust lifecycle, and mailbox synchronization with the Stalwart
//! mail server control plane.

pub mod config;
pub mod crypto;
pub mod dns;
pub mod domain;
pub mod error;
pub mod repository;
pub mod service;
pub mod stalwart;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
