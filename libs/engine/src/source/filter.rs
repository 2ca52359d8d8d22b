use alloy::primitives::{Address, B256};

use crate::scanner::BlockRange;

/// Logs of one event type from one contract over an inclusive block range.
#[derive(Debug, Clone)]
pub struct ChunkFilter {
    pub address: Address,
    pub topic0: B256,
    pub range: BlockRange,
}
