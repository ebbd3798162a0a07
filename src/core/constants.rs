/// Consensus constants
///
/// Every node must agree on these values bit for bit. They are compile-time
/// constants on purpose and never read from configuration.
///
/// ## Units
/// - **Timestamps**: Unix milliseconds (`i64`)
/// - **Amounts**: whole coins (`u64`)
/// - **Difficulty**: required leading zero bits of the block digest (`u32`)
///
/// Target interval between blocks in milliseconds.
/// A block slower than this eases difficulty, a faster one tightens it.
pub const MINE_RATE: i64 = 1_000;

/// Difficulty carried by the genesis block
pub const INITIAL_DIFFICULTY: u32 = 3;

/// Lowest difficulty the retarget will ever produce
pub const MIN_DIFFICULTY: u32 = 1;

/// Fixed amount paid by the single reward transaction of each block
pub const MINING_REWARD: u64 = 50;

/// Balance of any address that has never spent
pub const STARTING_BALANCE: u64 = 1_000;

/// Sentinel input address that marks a reward transaction on the wire
pub const REWARD_INPUT_ADDRESS: &str = "*authorized-reward*";

/// Hard-coded genesis block fields
pub mod genesis {
    use super::INITIAL_DIFFICULTY;

    pub const INDEX: u64 = 0;
    pub const TIMESTAMP: i64 = 1;
    pub const LAST_HASH: &str = "-----";
    pub const HASH: &str = "hash-one";
    pub const NONCE: u64 = 0;
    pub const DIFFICULTY: u32 = INITIAL_DIFFICULTY;
}
