//! Shared helpers for unit tests: deterministic chains, tampering and wallets.

pub mod test_utils;

pub use test_utils::*;
