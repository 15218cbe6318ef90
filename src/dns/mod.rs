//! DNS record derivation and live verification

pub mod records;
pub mod resolver;
pub mod verifier;

pub use records::record_set;
pub use resolver::{DnsLookupError, DnsResolver, HickoryDnsResolver, MxExchange};
pub use verifier::DnsVerifier;
