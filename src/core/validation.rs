// Whole-chain checks used when a peer offers a replacement chain.
// Structural validation covers genesis, linkage, hashes and difficulty.
// Transaction validation replays each block's transactions against the
// candidate's own history before that block.

use crate::core::{calculate_balance, meets_difficulty, Block, Transaction, MIN_DIFFICULTY};
use crate::error::{BlockchainError, Result, StructuralError, TransactionError};
use std::collections::HashSet;

/// Check genesis, hash linkage, stored digests and difficulty continuity.
/// The first violation wins; a chain is never accepted in part.
pub fn validate_chain(chain: &[Block]) -> std::result::Result<(), StructuralError> {
    let first = chain.first().ok_or(StructuralError::Empty)?;
    if *first != Block::genesis() {
        return Err(StructuralError::BadGenesis);
    }

    for (i, pair) in chain.windows(2).enumerate() {
        let (previous, block) = (&pair[0], &pair[1]);
        let index = i + 1;

        if block.last_hash() != previous.hash() {
            return Err(StructuralError::BrokenLink { index });
        }

        let expected = previous.index() + 1;
        if block.index() != expected {
            return Err(StructuralError::IndexGap {
                index,
                expected,
                found: block.index(),
            });
        }

        if block.hash() != block.compute_hash() {
            return Err(StructuralError::HashMismatch { index });
        }

        if block.difficulty() < MIN_DIFFICULTY {
            return Err(StructuralError::DifficultyFloor {
                index,
                difficulty: block.difficulty(),
            });
        }

        if previous.difficulty().abs_diff(block.difficulty()) > 1 {
            return Err(StructuralError::DifficultyJump {
                index,
                previous: previous.difficulty(),
                current: block.difficulty(),
            });
        }

        if !meets_difficulty(block.hash(), block.difficulty()) {
            return Err(StructuralError::InsufficientWork {
                index,
                difficulty: block.difficulty(),
            });
        }
    }

    Ok(())
}

pub fn is_valid_chain(chain: &[Block]) -> bool {
    validate_chain(chain).is_ok()
}

/// Check every transaction of every non-genesis block.
///
/// Per block: at most one reward paying exactly MINING_REWARD, every transfer
/// correctly signed and balanced, every spender's declared input equal to its
/// balance over the blocks before this one, and no transfer repeated.
pub fn validate_transaction_data(chain: &[Block]) -> Result<()> {
    for (index, block) in chain.iter().enumerate().skip(1) {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut reward_count = 0;

        for transaction in block.data() {
            match transaction {
                Transaction::Reward { .. } => {
                    reward_count += 1;
                    if reward_count > 1 {
                        return Err(TransactionError::DuplicateReward { index }.into());
                    }
                    transaction.validate()?;
                }
                Transaction::Transfer { id, input, .. } => {
                    transaction.validate()?;

                    let actual = calculate_balance(&chain[..index], &input.address);
                    if input.amount != actual {
                        return Err(BlockchainError::Balance {
                            address: input.address.clone(),
                            claimed: input.amount,
                            actual,
                        });
                    }

                    if !seen.insert(id.as_str()) {
                        return Err(TransactionError::DuplicateTransaction {
                            id: id.clone(),
                            index,
                        }
                        .into());
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ManualClock, MINE_RATE, MINING_REWARD, STARTING_BALANCE};
    use crate::testnet::{mine_chain, mine_chain_with_interval, tamper};
    use crate::wallet::Wallet;

    #[test]
    fn test_mined_chain_is_valid() {
        let chain = mine_chain(3, &ManualClock::new(10));
        assert_eq!(validate_chain(&chain), Ok(()));
        assert!(is_valid_chain(&chain));
    }

    #[test]
    fn test_genesis_only_chain_is_valid() {
        assert!(is_valid_chain(&[Block::genesis()]));
    }

    #[test]
    fn test_empty_chain_is_rejected() {
        assert_eq!(validate_chain(&[]), Err(StructuralError::Empty));
    }

    #[test]
    fn test_fake_genesis_is_rejected() {
        let mut chain = mine_chain(1, &ManualClock::new(10));
        chain[0] = tamper(&chain[0], |json| json["timestamp"] = serde_json::json!(2));
        assert_eq!(validate_chain(&chain), Err(StructuralError::BadGenesis));
    }

    #[test]
    fn test_broken_link_is_rejected() {
        let mut chain = mine_chain(2, &ManualClock::new(10));
        chain[2] = tamper(&chain[2], |json| json["lastHash"] = "forged".into());
        assert_eq!(
            validate_chain(&chain),
            Err(StructuralError::BrokenLink { index: 2 })
        );
    }

    #[test]
    fn test_changed_data_is_rejected() {
        let mut chain = mine_chain(2, &ManualClock::new(10));
        chain[1] = tamper(&chain[1], |json| {
            json["data"] = serde_json::to_value(vec![Transaction::reward("thief")]).unwrap()
        });
        assert_eq!(
            validate_chain(&chain),
            Err(StructuralError::HashMismatch { index: 1 })
        );
    }

    #[test]
    fn test_difficulty_jump_is_rejected() {
        let chain = mine_chain(1, &ManualClock::new(10));
        let last = &chain[1];
        let jumped = Block::new_test_block(
            2,
            last.timestamp() + 5,
            last.hash(),
            vec![],
            0,
            last.difficulty() + 2,
        );
        let mut chain = chain;
        chain.push(jumped);

        assert!(matches!(
            validate_chain(&chain),
            Err(StructuralError::DifficultyJump { index: 2, .. })
        ));
    }

    #[test]
    fn test_zero_difficulty_is_rejected() {
        // Two slow blocks walk difficulty down to the floor
        let mut chain = mine_chain_with_interval(2, MINE_RATE + 1);
        assert_eq!(chain[2].difficulty(), MIN_DIFFICULTY);

        let last = chain[2].clone();
        let floorless = Block::new_test_block(
            3,
            last.timestamp() + MINE_RATE + 1,
            last.hash(),
            vec![],
            0,
            0,
        );
        chain.push(floorless);

        assert_eq!(
            validate_chain(&chain),
            Err(StructuralError::DifficultyFloor {
                index: 3,
                difficulty: 0
            })
        );
    }

    #[test]
    fn test_missing_work_is_rejected() {
        let genesis = Block::genesis();
        let mut nonce = 0;
        let lazy = loop {
            let block = Block::new_test_block(1, 10, genesis.hash(), vec![], nonce, 4);
            if !meets_difficulty(block.hash(), 4) {
                break block;
            }
            nonce += 1;
        };

        assert_eq!(
            validate_chain(&[genesis, lazy]),
            Err(StructuralError::InsufficientWork {
                index: 1,
                difficulty: 4
            })
        );
    }

    #[test]
    fn test_valid_transactions_pass() {
        let wallet = Wallet::new().unwrap();
        let clock = ManualClock::new(10);
        let genesis = Block::genesis();
        let spend = wallet.create_transaction("recipient", 30, &[genesis.clone()]).unwrap();
        let block = Block::mine_with_clock(
            &genesis,
            vec![spend, Transaction::reward(wallet.address())],
            &clock,
        );

        assert_eq!(validate_transaction_data(&[genesis, block]), Ok(()));
    }

    #[test]
    fn test_double_reward_is_rejected() {
        let genesis = Block::genesis();
        let block = Block::new_test_block(
            1,
            10,
            genesis.hash(),
            vec![Transaction::reward("miner"), Transaction::reward("miner")],
            0,
            4,
        );

        assert_eq!(
            validate_transaction_data(&[genesis, block]),
            Err(TransactionError::DuplicateReward { index: 1 }.into())
        );
    }

    #[test]
    fn test_inflated_reward_is_rejected() {
        let genesis = Block::genesis();
        let mut reward = Transaction::reward("miner");
        if let Transaction::Reward { output_map, .. } = &mut reward {
            output_map.insert("miner".to_string(), MINING_REWARD * 2);
        }
        let block = Block::new_test_block(1, 10, genesis.hash(), vec![reward], 0, 4);

        assert!(matches!(
            validate_transaction_data(&[genesis, block]),
            Err(BlockchainError::Transaction(
                TransactionError::WrongRewardAmount { .. }
            ))
        ));
    }

    #[test]
    fn test_overclaimed_balance_is_rejected() {
        let wallet = Wallet::new().unwrap();
        let genesis = Block::genesis();
        // Balance computed against a history that includes an extra reward
        let fake_history = vec![
            genesis.clone(),
            Block::new_test_block(
                1,
                10,
                genesis.hash(),
                vec![Transaction::reward(wallet.address())],
                0,
                4,
            ),
        ];
        let spend = wallet.create_transaction("recipient", 30, &fake_history).unwrap();
        let block = Block::new_test_block(1, 10, genesis.hash(), vec![spend], 0, 4);

        assert_eq!(
            validate_transaction_data(&[genesis, block]),
            Err(BlockchainError::Balance {
                address: wallet.address().to_string(),
                claimed: STARTING_BALANCE + MINING_REWARD,
                actual: STARTING_BALANCE,
            })
        );
    }

    #[test]
    fn test_repeated_transfer_is_rejected() {
        let wallet = Wallet::new().unwrap();
        let genesis = Block::genesis();
        let spend = wallet.create_transaction("recipient", 30, &[genesis.clone()]).unwrap();
        let block = Block::new_test_block(
            1,
            10,
            genesis.hash(),
            vec![spend.clone(), spend.clone()],
            0,
            4,
        );

        assert_eq!(
            validate_transaction_data(&[genesis, block]),
            Err(TransactionError::DuplicateTransaction {
                id: spend.id().to_string(),
                index: 1
            }
            .into())
        );
    }
}
