//! Utility functions and helpers
//!
//! Cryptographic primitives, hex encoding and the binary codec shared by the
//! rest of the crate.

pub mod crypto;
pub mod serialization;

pub use crypto::{
    current_timestamp, ecdsa_p256_sha256_sign_digest, ecdsa_p256_sha256_sign_verify, hex_decode,
    hex_encode, new_key_pair, sha256_digest, verify_hex_signature,
};

pub use serialization::{deserialize, serialize};
