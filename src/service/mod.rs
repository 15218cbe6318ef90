//! Business logic services

pub mod domain;
pub mod mail_sync;
pub mod mailbox;

pub use domain::DomainService;
pub use mail_sync::{MailAccountGateway, MailSyncService, SyncOutcome};
pub use mailbox::{CreatedMailbox, MailboxService};
