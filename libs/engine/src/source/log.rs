use crate::source::filter::ChunkFilter;
use crate::source::handle::Source;
use alloy::{primitives::BlockNumber, rpc::types::Log};
use chain::rpc::NodeClient;
use eyre::Result;

pub struct LogSource {
    pub node_client: NodeClient,
}

#[async_trait::async_trait]
impl Source for LogSource {
    async fn head(&self) -> Result<BlockNumber> {
        Ok(self.node_client.get_latest_block_number().await?)
    }

    async fn chunk(&self, filter: &ChunkFilter) -> Result<Vec<Log>> {
        let logs_chunk = self
            .node_client
            .get_logs(&filter.address, filter.topic0, filter.range.from, filter.range.to)
            .await?
            .into_iter()
            // NOTE: Logs may come from pending txs that have not yet been mined.
            // They are re-emitted with the same tx hash and log index once mined,
            // so only logs with a `block_number` are kept.
            .filter(|log| log.block_number.is_some())
            .collect();

        Ok(logs_chunk)
    }

    async fn block_timestamp(&self, block_number: BlockNumber) -> Result<u64> {
        self.node_client.get_block_timestamp(block_number).await
    }
}
