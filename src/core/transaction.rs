// Transactions move value between addresses. A block carries one reward
// transaction minting MINING_REWARD for its miner, plus any number of signed
// transfers. Each transfer declares the full balance its spender held
// (`input.amount`) and redistributes exactly that amount across its outputs,
// paying change back to the spender.

use crate::core::{MINING_REWARD, REWARD_INPUT_ADDRESS};
use crate::error::{BlockchainError, Result, TransactionError};
use crate::utils::{current_timestamp, verify_hex_signature};
use crate::wallet::Wallet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Recipient address -> amount. Sorted keys keep hashing and signing canonical.
pub type OutputMap = BTreeMap<String, u64>;

/// Authorization block of a transfer
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub timestamp: i64,
    /// Balance the spender held when the transaction was created
    pub amount: u64,
    /// Hex encoded public key of the spender
    pub address: String,
    /// Hex encoded signature over the canonical output map
    pub signature: String,
}

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Transaction {
    #[serde(rename_all = "camelCase")]
    Reward { id: String, output_map: OutputMap },
    #[serde(rename_all = "camelCase")]
    Transfer {
        id: String,
        input: TransactionInput,
        output_map: OutputMap,
    },
}

impl Transaction {
    /// Mint the fixed block reward for `miner_address`
    pub fn reward(miner_address: &str) -> Transaction {
        let mut output_map = OutputMap::new();
        output_map.insert(miner_address.to_string(), MINING_REWARD);
        Transaction::Reward {
            id: Uuid::new_v4().to_string(),
            output_map,
        }
    }

    /// Build and sign a transfer from `sender`, who currently holds `balance`
    pub fn new_transfer(
        sender: &Wallet,
        recipient: &str,
        amount: u64,
        balance: u64,
    ) -> Result<Transaction> {
        if amount > balance {
            return Err(BlockchainError::InsufficientFunds {
                required: amount,
                available: balance,
            });
        }

        let mut output_map = OutputMap::new();
        output_map.insert(recipient.to_string(), amount);
        // A self-payment collapses into a single entry holding the whole balance
        *output_map.entry(sender.address().to_string()).or_insert(0) += balance - amount;

        let input = Self::sign_input(sender, balance, &output_map)?;
        Ok(Transaction::Transfer {
            id: Uuid::new_v4().to_string(),
            input,
            output_map,
        })
    }

    /// Add another recipient to a pending transfer, paid out of the sender's change
    pub fn update(&mut self, sender: &Wallet, recipient: &str, amount: u64) -> Result<()> {
        let (id, input, output_map) = match self {
            Transaction::Transfer {
                id,
                input,
                output_map,
            } => (id, input, output_map),
            Transaction::Reward { id, .. } => {
                return Err(TransactionError::RewardNotUpdatable { id: id.clone() }.into());
            }
        };

        if input.address != sender.address() {
            return Err(TransactionError::WrongSender {
                id: id.clone(),
                owner: input.address.clone(),
                sender: sender.address().to_string(),
            }
            .into());
        }

        let change = output_map.get(sender.address()).copied().unwrap_or(0);
        if amount > change {
            return Err(BlockchainError::InsufficientFunds {
                required: amount,
                available: change,
            });
        }

        *output_map.entry(recipient.to_string()).or_insert(0) += amount;
        if let Some(change_entry) = output_map.get_mut(sender.address()) {
            *change_entry -= amount;
        }

        *input = Self::sign_input(sender, input.amount, output_map)?;
        Ok(())
    }

    fn sign_input(sender: &Wallet, amount: u64, output_map: &OutputMap) -> Result<TransactionInput> {
        Ok(TransactionInput {
            timestamp: current_timestamp()?,
            amount,
            address: sender.address().to_string(),
            signature: sender.sign(&Self::signing_payload(output_map))?,
        })
    }

    /// Canonical bytes a spender signs: the JSON of the sorted output map
    pub fn signing_payload(output_map: &OutputMap) -> Vec<u8> {
        serde_json::to_vec(output_map).unwrap_or_default()
    }

    pub fn id(&self) -> &str {
        match self {
            Transaction::Reward { id, .. } | Transaction::Transfer { id, .. } => id,
        }
    }

    pub fn output_map(&self) -> &OutputMap {
        match self {
            Transaction::Reward { output_map, .. } | Transaction::Transfer { output_map, .. } => {
                output_map
            }
        }
    }

    pub fn input(&self) -> Option<&TransactionInput> {
        match self {
            Transaction::Reward { .. } => None,
            Transaction::Transfer { input, .. } => Some(input),
        }
    }

    /// Spending address; rewards report the sentinel reward address
    pub fn input_address(&self) -> &str {
        match self {
            Transaction::Reward { .. } => REWARD_INPUT_ADDRESS,
            Transaction::Transfer { input, .. } => &input.address,
        }
    }

    pub fn is_reward(&self) -> bool {
        matches!(self, Transaction::Reward { .. })
    }

    /// Sum of all outputs, `None` on overflow
    pub fn output_total(&self) -> Option<u64> {
        self.output_map()
            .values()
            .try_fold(0u64, |total, amount| total.checked_add(*amount))
    }

    /// Check authorization and arithmetic. Does not consult chain state.
    pub fn validate(&self) -> std::result::Result<(), TransactionError> {
        match self {
            Transaction::Reward { id, output_map } => {
                if output_map.len() != 1 {
                    return Err(TransactionError::MalformedReward {
                        id: id.clone(),
                        outputs: output_map.len(),
                    });
                }
                let amount = output_map.values().next().copied().unwrap_or(0);
                if amount != MINING_REWARD {
                    return Err(TransactionError::WrongRewardAmount {
                        id: id.clone(),
                        amount,
                        expected: MINING_REWARD,
                    });
                }
                Ok(())
            }
            Transaction::Transfer {
                id,
                input,
                output_map,
            } => {
                let outputs = self.output_total();
                if outputs != Some(input.amount) {
                    return Err(TransactionError::AmountMismatch {
                        id: id.clone(),
                        input: input.amount,
                        outputs: outputs.unwrap_or(u64::MAX),
                    });
                }

                if !verify_hex_signature(
                    &input.address,
                    &input.signature,
                    &Self::signing_payload(output_map),
                ) {
                    return Err(TransactionError::InvalidSignature { id: id.clone() });
                }
                Ok(())
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Invalid transaction: {e}");
                false
            }
        }
    }
}
