//! Wallet
//!
//! Key generation and signing. Consensus code never calls into this module;
//! it exists so demos and tests can produce transactions the validators accept.

#[allow(clippy::module_inception)]
pub mod wallet;

pub use wallet::Wallet;
