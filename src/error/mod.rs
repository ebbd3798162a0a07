//! Error handling for the ledger
//!
//! Every rejection a candidate chain can receive maps onto one of four
//! categories: structural, transaction, balance or policy. The remaining
//! variants cover the ambient plumbing (crypto, serialization, config, I/O).

use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, BlockchainError>;

/// Crate-wide error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockchainError {
    /// The candidate chain is malformed (genesis, linkage, hash or difficulty)
    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),
    /// A transaction inside a candidate block is invalid
    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),
    /// A spender claimed an input amount that chain history does not support
    #[error("Balance error: {address} claimed {claimed}, chain history gives {actual}")]
    Balance {
        address: String,
        claimed: u64,
        actual: u64,
    },
    /// The candidate chain is not strictly longer than the current one
    #[error("Policy error: candidate length {candidate} is not longer than current length {current}")]
    Policy { candidate: usize, current: usize },
    /// Insufficient funds when a wallet builds a transaction
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },
    /// Cryptographic operation errors
    #[error("Cryptographic error: {0}")]
    Crypto(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Reasons a chain fails structural validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("chain is empty")]
    Empty,
    #[error("first block is not the genesis block")]
    BadGenesis,
    #[error("block {index} does not link to its predecessor hash")]
    BrokenLink { index: usize },
    #[error("block {index} has index {found}, expected {expected}")]
    IndexGap {
        index: usize,
        expected: u64,
        found: u64,
    },
    #[error("block {index} stored hash does not match its contents")]
    HashMismatch { index: usize },
    #[error("block {index} hash does not satisfy difficulty {difficulty}")]
    InsufficientWork { index: usize, difficulty: u32 },
    #[error("block {index} difficulty {difficulty} is below the minimum")]
    DifficultyFloor { index: usize, difficulty: u32 },
    #[error("block {index} difficulty jumped from {previous} to {current}")]
    DifficultyJump {
        index: usize,
        previous: u32,
        current: u32,
    },
}

/// Reasons a transaction (or a block's transaction set) is refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("transaction {id} has an invalid signature")]
    InvalidSignature { id: String },
    #[error("transaction {id} outputs total {outputs}, input declares {input}")]
    AmountMismatch { id: String, input: u64, outputs: u64 },
    #[error("block {index} contains more than one reward transaction")]
    DuplicateReward { index: usize },
    #[error("reward transaction {id} pays {amount}, expected {expected}")]
    WrongRewardAmount {
        id: String,
        amount: u64,
        expected: u64,
    },
    #[error("reward transaction {id} must have exactly one output, found {outputs}")]
    MalformedReward { id: String, outputs: usize },
    #[error("transaction {id} appears more than once in block {index}")]
    DuplicateTransaction { id: String, index: usize },
    #[error("reward transaction {id} cannot be updated")]
    RewardNotUpdatable { id: String },
    #[error("transfer {id} belongs to {owner}, not {sender}")]
    WrongSender {
        id: String,
        owner: String,
        sender: String,
    },
}

impl From<std::io::Error> for BlockchainError {
    fn from(err: std::io::Error) -> Self {
        BlockchainError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BlockchainError {
    fn from(err: serde_json::Error) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for BlockchainError {
    fn from(err: bincode::error::EncodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for BlockchainError {
    fn from(err: bincode::error::DecodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for BlockchainError {
    fn from(err: toml::de::Error) -> Self {
        BlockchainError::Config(err.to_string())
    }
}
