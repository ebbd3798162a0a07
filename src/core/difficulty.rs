use crate::core::{Block, MINE_RATE, MIN_DIFFICULTY};

/// Single-sample retarget: every block compares its own interval against
/// MINE_RATE and moves difficulty by exactly one step. There is no averaging
/// window, so one unusually slow or fast block swings the next difficulty.
pub struct DifficultyAdjustment;

impl DifficultyAdjustment {
    /// Difficulty a block mined on top of `last_block` at `timestamp` must carry
    pub fn next_difficulty(last_block: &Block, timestamp: i64) -> u32 {
        let difficulty = last_block.difficulty();

        if difficulty < MIN_DIFFICULTY {
            return MIN_DIFFICULTY;
        }

        if timestamp.saturating_sub(last_block.timestamp()) > MINE_RATE {
            // Block took too long - ease, but never below the floor
            return difficulty.saturating_sub(1).max(MIN_DIFFICULTY);
        }

        // Block came too fast (or exactly on target) - tighten
        difficulty.saturating_add(1)
    }

    /// Target block time in milliseconds
    pub fn get_target_block_time() -> i64 {
        MINE_RATE
    }
}
