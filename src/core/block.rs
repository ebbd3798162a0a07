use crate::core::constants::genesis;
use crate::core::{crypto_hash, CancelToken, Clock, ProofOfWork, SystemClock, Transaction};
use crate::error::Result;
use crate::utils::{deserialize, serialize};
use log::info;
use serde::{Deserialize, Serialize};

/// A mined block. Fields are only ever set at construction.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    index: u64,
    timestamp: i64,
    last_hash: String,
    hash: String,
    data: Vec<Transaction>,
    nonce: u64,
    difficulty: u32,
}

impl Block {
    pub(crate) fn from_parts(
        index: u64,
        timestamp: i64,
        last_hash: String,
        hash: String,
        data: Vec<Transaction>,
        nonce: u64,
        difficulty: u32,
    ) -> Block {
        Block {
            index,
            timestamp,
            last_hash,
            hash,
            data,
            nonce,
            difficulty,
        }
    }

    /// The hard-coded first block shared by every node
    pub fn genesis() -> Block {
        Block::from_parts(
            genesis::INDEX,
            genesis::TIMESTAMP,
            genesis::LAST_HASH.to_string(),
            genesis::HASH.to_string(),
            vec![],
            genesis::NONCE,
            genesis::DIFFICULTY,
        )
    }

    /// Mine the successor of `last_block` against the wall clock
    pub fn mine(last_block: &Block, data: Vec<Transaction>) -> Block {
        Self::mine_with_clock(last_block, data, &SystemClock)
    }

    pub fn mine_with_clock(last_block: &Block, data: Vec<Transaction>, clock: &dyn Clock) -> Block {
        info!(
            "Starting proof-of-work for block {} on top of {}",
            last_block.index + 1,
            last_block.hash
        );
        let block = ProofOfWork::new_proof_of_work(last_block, &data).run(clock);
        info!(
            "Proof-of-work completed for block {}: {} (difficulty: {}, nonce: {})",
            block.index, block.hash, block.difficulty, block.nonce
        );
        block
    }

    /// Cancellable mining; `None` when `cancel` fired before a nonce was found
    pub fn mine_with(
        last_block: &Block,
        data: Vec<Transaction>,
        clock: &dyn Clock,
        cancel: &CancelToken,
    ) -> Option<Block> {
        ProofOfWork::new_proof_of_work(last_block, &data).run_cancellable(clock, cancel)
    }

    /// Recompute the digest of this block's own fields
    pub fn compute_hash(&self) -> String {
        crypto_hash(
            self.index,
            self.timestamp,
            &self.last_hash,
            &self.data,
            self.nonce,
            self.difficulty,
        )
    }

    /// Stored hash matches the contents and meets the stored difficulty
    pub fn has_valid_proof(&self) -> bool {
        ProofOfWork::validate(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Block> {
        deserialize::<Block>(bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn last_hash(&self) -> &str {
        self.last_hash.as_str()
    }

    pub fn hash(&self) -> &str {
        self.hash.as_str()
    }

    pub fn data(&self) -> &[Transaction] {
        self.data.as_slice()
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Create a test block with a correct digest but no proof-of-work (for testing only)
    #[cfg(test)]
    pub fn new_test_block(
        index: u64,
        timestamp: i64,
        last_hash: &str,
        data: Vec<Transaction>,
        nonce: u64,
        difficulty: u32,
    ) -> Block {
        let hash = crypto_hash(index, timestamp, last_hash, &data, nonce, difficulty);
        Block::from_parts(
            index,
            timestamp,
            last_hash.to_string(),
            hash,
            data,
            nonce,
            difficulty,
        )
    }
}
