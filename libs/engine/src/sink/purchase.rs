use alloy::primitives::BlockNumber;
use eyre::{Result, eyre};
use store::store::{BatchOutcome, Store};
use tokio::sync::RwLock;

use crate::decoder::DecodedLog;
use crate::sink::{adapter, handle::Sink};

pub struct PurchaseSink {
    store: RwLock<Store>,
}

impl PurchaseSink {
    pub fn new(store: Store) -> Self {
        Self { store: RwLock::new(store) }
    }
}

#[async_trait::async_trait]
impl Sink for PurchaseSink {
    async fn process_batch(&self, batch: &[DecodedLog]) -> Result<BatchOutcome> {
        if batch.is_empty() {
            return Ok(BatchOutcome::default());
        }
        let rows = adapter::to_rows(batch)?;

        match self.store.read().await.insert_batch(&rows).await {
            Ok(outcome) => {
                tracing::debug!(
                    "Processed batch: {} rows, {} new raw logs, {} new purchases",
                    rows.len(),
                    outcome.raw_logs,
                    outcome.purchases
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!("Sink failed on [insert_batch]: {e:?}");
                Err(eyre!(e))
            }
        }
    }

    async fn last_indexed_block(&self) -> Result<BlockNumber> {
        Ok(self.store.read().await.last_indexed_block().await?)
    }

    async fn reconnect(&self) -> Result<()> {
        self.store.write().await.reconnect().await
    }
}
