//! Command-line interface
//!
//! Argument parsing for the `cryptochain` demo binary.

pub mod commands;

pub use commands::{Command, Opt};
