use crate::core::{crypto_hash, meets_difficulty, Block, Clock, DifficultyAdjustment, Transaction};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag that stops an in-flight nonce search
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Both handles control the same search
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Nonce search for the block following `last_block`.
///
/// Every attempt re-reads the clock and re-derives the difficulty from it, so
/// the difficulty of the winning block always matches its own timestamp.
pub struct ProofOfWork<'a> {
    last_block: &'a Block,
    data: &'a [Transaction],
}

impl<'a> ProofOfWork<'a> {
    pub fn new_proof_of_work(last_block: &'a Block, data: &'a [Transaction]) -> ProofOfWork<'a> {
        ProofOfWork { last_block, data }
    }

    /// Check a block's stored hash against its contents and its own difficulty
    pub fn validate(block: &Block) -> bool {
        block.hash() == block.compute_hash() && meets_difficulty(block.hash(), block.difficulty())
    }

    /// Search until a nonce satisfies the difficulty
    pub fn run(&self, clock: &dyn Clock) -> Block {
        let mut nonce = 0u64;
        loop {
            nonce = nonce.wrapping_add(1);
            if let Some(block) = self.attempt(nonce, clock) {
                return block;
            }
        }
    }

    /// Same search, abandoned as soon as `cancel` fires
    pub fn run_cancellable(&self, clock: &dyn Clock, cancel: &CancelToken) -> Option<Block> {
        let mut nonce = 0u64;
        while !cancel.is_cancelled() {
            nonce = nonce.wrapping_add(1);
            if let Some(block) = self.attempt(nonce, clock) {
                return Some(block);
            }
        }
        log::debug!(
            "Abandoned mining on top of block {} after {nonce} attempts",
            self.last_block.index()
        );
        None
    }

    fn attempt(&self, nonce: u64, clock: &dyn Clock) -> Option<Block> {
        let index = self.last_block.index() + 1;
        let timestamp = clock.now_millis();
        let difficulty = DifficultyAdjustment::next_difficulty(self.last_block, timestamp);
        let hash = crypto_hash(
            index,
            timestamp,
            self.last_block.hash(),
            self.data,
            nonce,
            difficulty,
        );

        if !meets_difficulty(&hash, difficulty) {
            return None;
        }

        Some(Block::from_parts(
            index,
            timestamp,
            self.last_block.hash().to_string(),
            hash,
            self.data.to_vec(),
            nonce,
            difficulty,
        ))
    }
}
