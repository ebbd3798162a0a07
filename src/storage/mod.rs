//! In-memory staging for pending transactions.

pub mod transaction_pool;

pub use transaction_pool::TransactionPool;
