use alloy::primitives::BlockNumber;
use eyre::Result;
use store::store::BatchOutcome;

use crate::decoder::DecodedLog;

/// Durable destination for decoded batches.
#[async_trait::async_trait]
pub trait Sink: Send + Sync {
    /// Persists the whole batch atomically; on error nothing from it is stored.
    async fn process_batch(&self, batch: &[DecodedLog]) -> Result<BatchOutcome>;

    /// The resumption cursor derived from what is already stored.
    async fn last_indexed_block(&self) -> Result<BlockNumber>;

    /// Closes and reopens the underlying connection.
    async fn reconnect(&self) -> Result<()>;
}
