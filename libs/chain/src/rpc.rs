use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, B256, BlockNumber, Bytes};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::{Filter, Log};
use alloy::transports::RpcError;
use alloy::transports::TransportErrorKind;
use alloy::transports::http::reqwest::Url;
use eyre::{Result, eyre};

/// Read-only JSON-RPC client for the node the indexer follows.
#[derive(Clone)]
pub struct NodeClient {
    provider: RootProvider,
}

impl NodeClient {
    pub fn new(rpc_url: Url) -> Self {
        let rpc_client = RpcClient::new_http(rpc_url);
        let provider = RootProvider::new(rpc_client);
        Self { provider }
    }

    pub async fn get_latest_block_number(&self) -> Result<u64, RpcError<TransportErrorKind>> {
        self.provider.get_block_number().await
    }

    pub async fn get_code(&self, address: &Address) -> Result<Bytes, RpcError<TransportErrorKind>> {
        self.provider.get_code_at(*address).await
    }

    /// Logs emitted by `address` with `topic0` in the inclusive range `[from_block, to_block]`.
    pub async fn get_logs(
        &self,
        address: &Address,
        topic0: B256,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<Log>, RpcError<TransportErrorKind>> {
        let filter = Filter::new()
            .address(*address)
            .event_signature(topic0)
            .from_block(from_block)
            .to_block(to_block);

        self.provider.get_logs(&filter).await
    }

    pub async fn get_block_timestamp(&self, block_number: BlockNumber) -> Result<u64> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(block_number))
            .await?
            .ok_or_else(|| eyre!("Block not found: {block_number}"))?;

        Ok(block.header.timestamp)
    }
}
