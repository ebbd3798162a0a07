use crate::core::{Block, Transaction};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Pending transactions waiting to be mined
/// ( K -> transaction id, V -> Transaction )
pub struct TransactionPool {
    inner: RwLock<HashMap<String, Transaction>>,
}

impl Default for TransactionPool {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionPool {
    pub fn new() -> TransactionPool {
        TransactionPool {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace (an updated transfer keeps its id)
    pub fn set_transaction(&self, tx: Transaction) {
        match self.inner.write() {
            Ok(mut pool) => {
                pool.insert(tx.id().to_string(), tx);
            }
            Err(_) => {
                log::error!("Failed to acquire write lock on transaction pool");
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<Transaction> {
        match self.inner.read() {
            Ok(pool) => pool.get(id).cloned(),
            Err(_) => {
                log::error!("Failed to acquire read lock on transaction pool");
                None
            }
        }
    }

    /// Pending transfer spent by `input_address`, if any
    pub fn existing_transaction(&self, input_address: &str) -> Option<Transaction> {
        match self.inner.read() {
            Ok(pool) => pool
                .values()
                .find(|tx| !tx.is_reward() && tx.input_address() == input_address)
                .cloned(),
            Err(_) => {
                log::error!("Failed to acquire read lock on transaction pool");
                None
            }
        }
    }

    /// Pending transactions that pass signature and amount checks
    pub fn valid_transactions(&self) -> Vec<Transaction> {
        match self.inner.read() {
            Ok(pool) => pool.values().filter(|tx| tx.is_valid()).cloned().collect(),
            Err(_) => {
                log::error!("Failed to acquire read lock on transaction pool");
                Vec::new()
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        match self.inner.read() {
            Ok(pool) => pool.contains_key(id),
            Err(_) => {
                log::error!("Failed to acquire read lock on transaction pool");
                false
            }
        }
    }

    /// Drop every pending transaction that already made it into `chain`
    pub fn clear_blockchain_transactions(&self, chain: &[Block]) {
        let included: HashSet<&str> = chain
            .iter()
            .skip(1)
            .flat_map(|block| block.data())
            .map(Transaction::id)
            .collect();

        match self.inner.write() {
            Ok(mut pool) => {
                let before = pool.len();
                pool.retain(|id, _| !included.contains(id.as_str()));
                log::debug!(
                    "Pruned {} included transactions from the pool",
                    before - pool.len()
                );
            }
            Err(_) => {
                log::error!("Failed to acquire write lock on transaction pool");
            }
        }
    }

    pub fn len(&self) -> usize {
        match self.inner.read() {
            Ok(pool) => pool.len(),
            Err(_) => {
                log::error!("Failed to acquire read lock on transaction pool");
                0
            }
        }
    }

    pub fn clear(&self) {
        match self.inner.write() {
            Ok(mut pool) => {
                pool.clear();
            }
            Err(_) => {
                log::error!("Failed to acquire write lock on transaction pool");
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self.inner.read() {
            Ok(pool) => pool.is_empty(),
            Err(_) => {
                log::error!("Failed to acquire read lock on transaction pool");
                true // Conservative default
            }
        }
    }
}
