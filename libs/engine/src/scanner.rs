use std::fmt;

use alloy::primitives::BlockNumber;

/// Inclusive block interval `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub from: BlockNumber,
    pub to: BlockNumber,
}

impl BlockRange {
    pub fn block_count(&self) -> u64 {
        (self.to - self.from).saturating_add(1)
    }

    pub fn next_cursor(&self) -> BlockNumber {
        self.to + 1
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.from, self.to)
    }
}

/// Next interval to scan, or `None` once the cursor has passed the chain head.
pub fn next_range(
    cursor: BlockNumber,
    head: BlockNumber,
    batch_size: u64,
) -> Option<BlockRange> {
    if cursor > head {
        return None;
    }
    // A safe addition avoids silent wraparound
    let to = cursor.saturating_add(batch_size.max(1) - 1).min(head);
    Some(BlockRange { from: cursor, to })
}
