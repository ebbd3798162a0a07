use crate::core::{Block, Transaction};

/// Notifications a node emits for its collaborators (broadcast, pool upkeep)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainEvent {
    /// A locally mined block was appended
    Extended(Block),
    /// A remote chain replaced the local one
    Replaced {
        chain: Vec<Block>,
        /// Every transaction carried by the accepted chain, for pool pruning
        accepted_transactions: Vec<Transaction>,
    },
}
