//! Block-height arithmetic.
//!
//! The oracle counts time in blocks. Default windows assume a 5 second block.

/// Expected seconds between blocks.
pub const BLOCK_TIME_SECS: u64 = 5;

pub const BLOCKS_PER_MINUTE: u64 = 60 / BLOCK_TIME_SECS;
pub const BLOCKS_PER_HOUR: u64 = BLOCKS_PER_MINUTE * 60;
pub const BLOCKS_PER_DAY: u64 = BLOCKS_PER_HOUR * 24;
pub const BLOCKS_PER_WEEK: u64 = BLOCKS_PER_DAY * 7;
/// 365.25 days.
pub const BLOCKS_PER_YEAR: u64 = BLOCKS_PER_DAY * 36525 / 100;

/// Number of blocks between a slash being decided and the validator-set
/// update taking effect.
pub const VALIDATOR_UPDATE_DELAY: u64 = 1;

/// Whether `height` is the final block of a period of `period` blocks.
///
/// A zero period never ends.
pub fn is_period_last_block(height: u64, period: u64) -> bool {
    period != 0 && (height + 1) % period == 0
}

/// Index of the period containing `height`.
pub fn period_of(height: u64, period: u64) -> u64 {
    if period == 0 {
        0
    } else {
        height / period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_constants() {
        assert_eq!(BLOCKS_PER_MINUTE, 12);
        assert_eq!(BLOCKS_PER_WEEK, 120_960);
        assert_eq!(BLOCKS_PER_YEAR, 6_311_520);
    }

    #[test]
    fn last_block_of_period() {
        assert!(is_period_last_block(4, 5));
        assert!(!is_period_last_block(5, 5));
        assert!(is_period_last_block(9, 5));
        assert!(!is_period_last_block(9, 0));
    }

    #[test]
    fn period_index() {
        assert_eq!(period_of(0, 5), 0);
        assert_eq!(period_of(4, 5), 0);
        assert_eq!(period_of(5, 5), 1);
    }
}
