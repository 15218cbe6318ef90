//! Stalwart mail-server control plane integration

pub mod client;
pub mod types;

pub use client::StalwartClient;
pub use types::*;
