//! Core ledger functionality
//!
//! This module contains the consensus components: hashing, blocks, the
//! difficulty retarget, transactions, the balance oracle, chain validation
//! and the chain itself.

pub mod balance;
pub mod block;
pub mod blockchain;
pub mod clock;
pub mod constants;
pub mod difficulty;
pub mod hasher;
pub mod proof_of_work;
pub mod transaction;
pub mod validation;

pub use balance::calculate_balance;
pub use block::Block;
pub use blockchain::Blockchain;
pub use clock::{Clock, ManualClock, SystemClock};
pub use constants::{
    INITIAL_DIFFICULTY, MINE_RATE, MINING_REWARD, MIN_DIFFICULTY, REWARD_INPUT_ADDRESS,
    STARTING_BALANCE,
};
pub use difficulty::DifficultyAdjustment;
pub use hasher::{crypto_hash, leading_zero_bits, meets_difficulty};
pub use proof_of_work::{CancelToken, ProofOfWork};
pub use transaction::{OutputMap, Transaction, TransactionInput};
pub use validation::{is_valid_chain, validate_chain, validate_transaction_data};
