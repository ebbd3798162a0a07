//! Block digest
//!
//! The preimage is the compact JSON array
//! `[index, timestamp, lastHash, data, nonce, difficulty]`. Output maps are
//! `BTreeMap`s, so their keys always serialize in sorted order and two nodes
//! hashing the same block agree regardless of the key order they received.

use crate::core::Transaction;
use crate::utils::{hex_decode, hex_encode, sha256_digest};
use serde::Serialize;

#[derive(Serialize)]
struct Preimage<'a>(u64, i64, &'a str, &'a [Transaction], u64, u32);

/// SHA-256 over the ordered block fields, as lowercase hex.
pub fn crypto_hash(
    index: u64,
    timestamp: i64,
    last_hash: &str,
    data: &[Transaction],
    nonce: u64,
    difficulty: u32,
) -> String {
    let preimage = Preimage(index, timestamp, last_hash, data, nonce, difficulty);
    // Serializing plain structs, strings, integers and string-keyed maps cannot fail.
    let bytes = serde_json::to_vec(&preimage).unwrap_or_default();
    hex_encode(&sha256_digest(&bytes))
}

/// Count leading zero bits of a hex digest. Malformed hex has no leading zeros.
pub fn leading_zero_bits(hash: &str) -> u32 {
    let Ok(bytes) = hex_decode(hash) else {
        return 0;
    };

    let mut bits = 0;
    for byte in bytes {
        if byte == 0 {
            bits += 8;
            continue;
        }
        bits += byte.leading_zeros();
        break;
    }
    bits
}

pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    leading_zero_bits(hash) >= difficulty
}
