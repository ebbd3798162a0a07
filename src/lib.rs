//! # Cryptochain - a proof-of-work ledger
//!
//! An append-only, hash-linked chain of blocks. Blocks are mined against a
//! self-adjusting difficulty target, and a node only ever swaps its chain for
//! a strictly longer one that passes full validation.
//!
//! ## Layout
//! - `core/`: blocks, hashing, proof-of-work, difficulty, transactions,
//!   the balance oracle and chain validation
//! - `wallet/`: ECDSA P-256 keys, signing, transaction construction
//! - `storage/`: the pending transaction pool
//! - `node/`: background mining, remote chain import and chain events
//! - `config/`: node-local settings from TOML and the environment
//! - `utils/`: crypto helpers and binary serialization
//! - `cli/`: argument parsing for the `cryptochain` binary
//!
//! ## Where to start
//! 1. `core/blockchain.rs` for append and replacement
//! 2. `core/validation.rs` for what makes a chain acceptable
//! 3. `core/balance.rs` for how balances fall out of chain history
//! 4. `node/node.rs` for how mining and replacement interleave

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod node;
pub mod storage;
pub mod utils;
pub mod wallet;

#[cfg(test)]
pub mod testnet;

pub use cli::{Command, Opt};
pub use config::{Config, Settings, GLOBAL_CONFIG};
pub use crate::core::{
    calculate_balance, crypto_hash, is_valid_chain, leading_zero_bits, meets_difficulty,
    validate_chain, validate_transaction_data, Block, Blockchain, CancelToken, Clock,
    DifficultyAdjustment, ManualClock, OutputMap, ProofOfWork, SystemClock, Transaction,
    TransactionInput, INITIAL_DIFFICULTY, MINE_RATE, MINING_REWARD, MIN_DIFFICULTY,
    REWARD_INPUT_ADDRESS, STARTING_BALANCE,
};
pub use error::{BlockchainError, Result, StructuralError, TransactionError};
pub use node::{ChainEvent, MiningHandle, Node};
pub use storage::TransactionPool;
pub use utils::{
    current_timestamp, ecdsa_p256_sha256_sign_digest, ecdsa_p256_sha256_sign_verify,
    new_key_pair, sha256_digest,
};
pub use wallet::Wallet;
