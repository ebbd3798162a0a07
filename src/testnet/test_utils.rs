//! Test utilities for ledger testing

use crate::core::{Block, Clock, ManualClock, Transaction};
use crate::wallet::Wallet;

/// Mine `blocks` reward-only blocks on top of genesis, reading `clock` as is.
/// With a clock that never moves every block is "fast" and difficulty climbs.
pub fn mine_chain(blocks: usize, clock: &dyn Clock) -> Vec<Block> {
    let mut chain = vec![Block::genesis()];
    for i in 0..blocks {
        let last = chain.last().expect("chain always holds genesis");
        let data = vec![Transaction::reward(&format!("miner-{i}"))];
        let block = Block::mine_with_clock(last, data, clock);
        chain.push(block);
    }
    chain
}

/// Mine `blocks` blocks, spacing consecutive timestamps by `interval` ms
pub fn mine_chain_with_interval(blocks: usize, interval: i64) -> Vec<Block> {
    let genesis = Block::genesis();
    let clock = ManualClock::new(genesis.timestamp());
    let mut chain = vec![genesis];
    for i in 0..blocks {
        clock.advance(interval);
        let last = chain.last().expect("chain always holds genesis");
        let data = vec![Transaction::reward(&format!("miner-{i}"))];
        chain.push(Block::mine_with_clock(last, data, &clock));
    }
    chain
}

/// Rewrite a block through its JSON form without re-mining it
pub fn tamper(block: &Block, edit: impl FnOnce(&mut serde_json::Value)) -> Block {
    let mut json = serde_json::to_value(block).expect("block serializes");
    edit(&mut json);
    serde_json::from_value(json).expect("tampered block still deserializes")
}

/// Create test wallets
pub fn create_test_wallets(count: usize) -> Vec<Wallet> {
    (0..count)
        .map(|_| Wallet::new().expect("key generation"))
        .collect()
}
