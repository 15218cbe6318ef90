//! Cryptographic key material

pub mod dkim;

pub use dkim::{generate_keypair, DkimKeypair};
