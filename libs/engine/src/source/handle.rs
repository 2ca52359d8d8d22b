use alloy::{primitives::BlockNumber, rpc::types::Log};
use eyre::Result;

use crate::source::filter::ChunkFilter;

/// The slice of the chain the indexer reads.
#[async_trait::async_trait]
pub trait Source: Send + Sync {
    async fn head(&self) -> Result<BlockNumber>;

    async fn chunk(&self, filter: &ChunkFilter) -> Result<Vec<Log>>;

    async fn block_timestamp(&self, block_number: BlockNumber) -> Result<u64>;
}
