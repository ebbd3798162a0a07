//! Balance oracle
//!
//! There is no balance index: an address's balance is recovered by replaying
//! the chain backwards. A spend declares the spender's whole balance and pays
//! the remainder back as change, so the newest block in which the address
//! spent resets its history. Everything credited to the address from that
//! block onwards (its change output included) is the balance. An address that
//! has never spent also holds the implicit STARTING_BALANCE.

use crate::core::{Block, STARTING_BALANCE};

/// Spendable balance of `address` after the last block of `chain`
pub fn calculate_balance(chain: &[Block], address: &str) -> u64 {
    let mut has_spent = false;
    let mut outputs_total: u64 = 0;

    for block in chain.iter().skip(1).rev() {
        for transaction in block.data() {
            if transaction
                .input()
                .is_some_and(|input| input.address == address)
            {
                has_spent = true;
            }

            if let Some(amount) = transaction.output_map().get(address) {
                outputs_total = outputs_total.saturating_add(*amount);
            }
        }

        if has_spent {
            break;
        }
    }

    if has_spent {
        outputs_total
    } else {
        STARTING_BALANCE.saturating_add(outputs_total)
    }
}
