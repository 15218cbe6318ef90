//! Domain models for DeftMail Core

pub mod dns;
pub mod email_domain;
pub mod mailbox;
pub mod tenant;

pub use dns::*;
pub use email_domain::*;
pub use mailbox::*;
pub use tenant::*;
