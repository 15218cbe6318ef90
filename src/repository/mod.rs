//! Persistence contracts
//!
//! The engine never touches storage directly; it works against these traits.
//! Uniqueness (domain name, mailbox address) is enforced by the backing
//! store's constraints, so `create` must provide atomic check-and-insert
//! semantics and surface a violation as `AppError::Conflict`.

pub mod domain;
pub mod mailbox;
pub mod tenant;

pub use domain::DomainRepository;
pub use mailbox::MailboxRepository;
pub use tenant::TenantRepository;

#[cfg(test)]
pub use domain::MockDomainRepository;
#[cfg(test)]
pub use mailbox::MockMailboxRepository;
#[cfg(test)]
pub use tenant::MockTenantRepository;
