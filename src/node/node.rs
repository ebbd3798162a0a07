// The node is the handle collaborators hold. It owns the chain behind a
// single-writer lock and runs proof-of-work on worker threads. Every state
// change is reported as a ChainEvent.

use crate::core::{
    calculate_balance, Block, Blockchain, CancelToken, Clock, SystemClock, Transaction,
};
use crate::error::Result;
use crate::node::ChainEvent;
use crate::storage::TransactionPool;
use log::{debug, info, warn};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};

#[derive(Clone)]
pub struct Node {
    blockchain: Arc<RwLock<Blockchain>>,
    pool: Arc<TransactionPool>,
    clock: Arc<dyn Clock>,
    events: Sender<ChainEvent>,
    mining: Arc<Mutex<Option<CancelToken>>>,
}

/// A running mining attempt
pub struct MiningHandle {
    handle: JoinHandle<Option<Block>>,
}

impl MiningHandle {
    /// Wait for the worker; `None` if it was cancelled or its block went stale
    pub fn join(self) -> Option<Block> {
        match self.handle.join() {
            Ok(block) => block,
            Err(_) => {
                log::error!("Mining worker panicked");
                None
            }
        }
    }
}

impl Node {
    pub fn new() -> (Node, Receiver<ChainEvent>) {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> (Node, Receiver<ChainEvent>) {
        let (events, receiver) = mpsc::channel();
        let node = Node {
            blockchain: Arc::new(RwLock::new(Blockchain::new())),
            pool: Arc::new(TransactionPool::new()),
            clock,
            events,
            mining: Arc::new(Mutex::new(None)),
        };
        (node, receiver)
    }

    fn read_chain(&self) -> RwLockReadGuard<'_, Blockchain> {
        self.blockchain
            .read()
            .expect("Failed to acquire read lock on blockchain - this should never happen")
    }

    fn write_chain(&self) -> RwLockWriteGuard<'_, Blockchain> {
        self.blockchain
            .write()
            .expect("Failed to acquire write lock on blockchain - this should never happen")
    }

    fn mining_slot(&self) -> MutexGuard<'_, Option<CancelToken>> {
        self.mining
            .lock()
            .expect("Failed to acquire mining lock - this should never happen")
    }

    fn emit(&self, event: ChainEvent) {
        if self.events.send(event).is_err() {
            debug!("No listener for chain events");
        }
    }

    pub fn pool(&self) -> &TransactionPool {
        &self.pool
    }

    pub fn chain_snapshot(&self) -> Vec<Block> {
        self.read_chain().chain().to_vec()
    }

    pub fn len(&self) -> usize {
        self.read_chain().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_chain().is_empty()
    }

    pub fn balance_of(&self, address: &str) -> u64 {
        calculate_balance(self.read_chain().chain(), address)
    }

    /// JSON of the current chain, ready for fan-out to peers
    pub fn broadcast_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(self.read_chain().chain())?)
    }

    /// Validate a transaction and stage it for the next block
    pub fn add_transaction(&self, tx: Transaction) -> Result<()> {
        tx.validate()?;
        debug!("Staged transaction {}", tx.id());
        self.pool.set_transaction(tx);
        Ok(())
    }

    /// Abandon the in-flight mining attempt, if any
    pub fn cancel_mining(&self) {
        let mut current = self.mining_slot();
        if let Some(token) = current.take() {
            token.cancel();
        }
    }

    /// Mine `transactions` on a worker thread. Any attempt already running is
    /// cancelled first.
    pub fn submit(&self, transactions: Vec<Transaction>) -> MiningHandle {
        let cancel = CancelToken::new();
        {
            let mut current = self.mining_slot();
            if let Some(previous) = current.replace(cancel.clone()) {
                previous.cancel();
            }
        }

        let last_block = self.read_chain().last_block().clone();
        let node = self.clone();
        info!(
            "Mining {} transactions on top of block {}",
            transactions.len(),
            last_block.index()
        );

        let handle = thread::spawn(move || {
            let block = Block::mine_with(&last_block, transactions, node.clock.as_ref(), &cancel)?;
            node.finish_mining(block, &cancel)
        });

        MiningHandle { handle }
    }

    /// Mine every valid pending transaction plus a reward for `miner_address`
    pub fn mine_transactions(&self, miner_address: &str) -> MiningHandle {
        let mut data = self.pool.valid_transactions();
        data.push(Transaction::reward(miner_address));
        self.submit(data)
    }

    fn finish_mining(&self, block: Block, cancel: &CancelToken) -> Option<Block> {
        {
            let mut blockchain = self.write_chain();
            if cancel.is_cancelled() {
                debug!("Dropping block {} from a cancelled attempt", block.index());
                return None;
            }
            if let Err(e) = blockchain.append_mined_block(block.clone()) {
                warn!("Discarding stale block {}: {e}", block.index());
                return None;
            }
            self.pool.clear_blockchain_transactions(blockchain.chain());
            self.emit(ChainEvent::Extended(block.clone()));
        }

        let mut current = self.mining_slot();
        if current.as_ref().is_some_and(|token| token.same_as(cancel)) {
            *current = None;
        }
        Some(block)
    }

    /// Consider a serialized chain received from a peer.
    ///
    /// Transactions are always validated, without holding any lock on the
    /// local chain. Only the final swap takes the write lock. On acceptance
    /// the pool is pruned, local mining is abandoned and
    /// `ChainEvent::Replaced` is emitted once.
    pub fn receive_remote_chain(&self, payload: &str) -> Result<()> {
        let candidate: Vec<Block> = serde_json::from_str(payload)?;

        Blockchain::check_against(&candidate, self.len(), true)?;

        let mut blockchain = self.write_chain();
        blockchain.commit_chain(candidate, |accepted| {
            self.cancel_mining();
            self.pool.clear_blockchain_transactions(accepted);
            let accepted_transactions = accepted
                .iter()
                .skip(1)
                .flat_map(|block| block.data().iter().cloned())
                .collect();
            self.emit(ChainEvent::Replaced {
                chain: accepted.to_vec(),
                accepted_transactions,
            });
        })
    }
}
