// The chain itself: an owned, ordered run of blocks starting at genesis.
// It changes in exactly two ways: a locally mined block is appended, or a
// longer valid chain from a peer replaces the whole sequence at once.

use crate::core::{
    meets_difficulty, validate_chain, validate_transaction_data, Block, Clock, SystemClock,
    Transaction,
};
use crate::error::{BlockchainError, Result, StructuralError};
use log::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blockchain {
    chain: Vec<Block>,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Blockchain {
    pub fn new() -> Blockchain {
        Blockchain {
            chain: vec![Block::genesis()],
        }
    }

    pub fn chain(&self) -> &[Block] {
        self.chain.as_slice()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Never true: genesis is always present
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    /// Mine `data` on top of the current tip and append it
    pub fn add_block(&mut self, data: Vec<Transaction>) -> &Block {
        self.add_block_with_clock(data, &SystemClock)
    }

    pub fn add_block_with_clock(&mut self, data: Vec<Transaction>, clock: &dyn Clock) -> &Block {
        let block = Block::mine_with_clock(self.last_block(), data, clock);
        self.chain.push(block);
        let block = self.last_block();
        info!(
            "Appended block {} (difficulty: {}, chain length: {})",
            block.index(),
            block.difficulty(),
            self.chain.len()
        );
        block
    }

    /// Append a block mined elsewhere (e.g. on a worker thread).
    /// Refused when the tip moved on while it was being mined.
    pub fn append_mined_block(&mut self, block: Block) -> Result<()> {
        let index = self.chain.len();
        let tip = self.last_block();

        if block.last_hash() != tip.hash() {
            return Err(StructuralError::BrokenLink { index }.into());
        }
        if block.index() != tip.index() + 1 {
            return Err(StructuralError::IndexGap {
                index,
                expected: tip.index() + 1,
                found: block.index(),
            }
            .into());
        }
        if block.difficulty().abs_diff(tip.difficulty()) > 1 {
            return Err(StructuralError::DifficultyJump {
                index,
                previous: tip.difficulty(),
                current: block.difficulty(),
            }
            .into());
        }
        if block.hash() != block.compute_hash() {
            return Err(StructuralError::HashMismatch { index }.into());
        }
        if !meets_difficulty(block.hash(), block.difficulty()) {
            return Err(StructuralError::InsufficientWork {
                index,
                difficulty: block.difficulty(),
            }
            .into());
        }

        info!(
            "Appended mined block {} (difficulty: {})",
            block.index(),
            block.difficulty()
        );
        self.chain.push(block);
        Ok(())
    }

    /// Replace the chain with `candidate` if it is strictly longer and valid.
    ///
    /// `on_success` runs exactly once, with the accepted chain, before the
    /// swap. On rejection the current chain is left untouched.
    pub fn replace_chain<F>(
        &mut self,
        candidate: Vec<Block>,
        validate_transactions: bool,
        on_success: F,
    ) -> Result<()>
    where
        F: FnOnce(&[Block]),
    {
        self.check_candidate(&candidate, validate_transactions)?;
        self.commit_chain(candidate, on_success)
    }

    /// Read-only half of `replace_chain`
    pub fn check_candidate(&self, candidate: &[Block], validate_transactions: bool) -> Result<()> {
        Self::check_against(candidate, self.chain.len(), validate_transactions)
    }

    /// Validate `candidate` against a chain of `current_len` blocks without
    /// holding the chain itself. Validity depends only on the candidate, so a
    /// caller can run this outside any lock and commit afterwards.
    pub fn check_against(
        candidate: &[Block],
        current_len: usize,
        validate_transactions: bool,
    ) -> Result<()> {
        let result = Self::longer_than(candidate, current_len)
            .and_then(|_| validate_chain(candidate).map_err(BlockchainError::from))
            .and_then(|_| {
                if validate_transactions {
                    validate_transaction_data(candidate)
                } else {
                    Ok(())
                }
            });

        if let Err(e) = &result {
            warn!("Rejected incoming chain of length {}: {e}", candidate.len());
        }
        result
    }

    /// Swap in an already validated `candidate`. The length rule is checked
    /// again since the chain may have grown after validation.
    pub fn commit_chain<F>(&mut self, candidate: Vec<Block>, on_success: F) -> Result<()>
    where
        F: FnOnce(&[Block]),
    {
        if let Err(e) = Self::longer_than(&candidate, self.chain.len()) {
            warn!("Dropping validated chain of length {}: {e}", candidate.len());
            return Err(e);
        }

        on_success(&candidate);

        info!(
            "Replacing chain of length {} with incoming chain of length {}",
            self.chain.len(),
            candidate.len()
        );
        self.chain = candidate;
        Ok(())
    }

    fn longer_than(candidate: &[Block], current_len: usize) -> Result<()> {
        if candidate.len() <= current_len {
            return Err(BlockchainError::Policy {
                candidate: candidate.len(),
                current: current_len,
            });
        }
        Ok(())
    }
}
