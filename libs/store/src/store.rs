use crate::client::Client;
use crate::purchase::model::Purchase;
use crate::raw_log::model::RawLog;
use alloy::primitives::{Address, BlockNumber};
use eyre::Result;
use sqlx::Error;

/// Rows actually inserted by a batch; rows already present are not counted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub raw_logs: u64,
    pub purchases: u64,
}

pub struct Store {
    client: Client,
}

impl Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Drops the current pool and opens a fresh one against the same database.
    /// An in-memory database lives only as long as its pool, so it is pinged instead.
    pub async fn reconnect(&mut self) -> Result<()> {
        if self.client.is_in_memory() {
            sqlx::query("SELECT 1").execute(self.client.pool()).await?;
            tracing::info!("In-memory store kept open");
            return Ok(());
        }

        let database_url = self.client.database_url().to_string();
        self.client.close().await;
        self.client = Client::init(&database_url).await?;
        tracing::info!("Store reconnected");
        Ok(())
    }

    // ---------------------------
    // BATCH WRITES
    // ---------------------------

    /// Writes every raw log and its decoded purchase in one transaction.
    /// Rows keyed by an existing `(transaction_hash, log_index)` are left untouched.
    pub async fn insert_batch(&self, rows: &[(RawLog, Purchase)]) -> Result<BatchOutcome, Error> {
        let mut tx = self.client.pool().begin().await?;
        let mut outcome = BatchOutcome::default();

        for (raw_log, purchase) in rows {
            let raw_log_query = r#"
                INSERT OR IGNORE INTO raw_logs (
                    block_number, transaction_hash, log_index,
                    contract_address, topics, data, block_timestamp
                )
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#;
            outcome.raw_logs += sqlx::query(raw_log_query)
                .bind(raw_log.block_number)
                .bind(&raw_log.transaction_hash)
                .bind(raw_log.log_index)
                .bind(&raw_log.contract_address)
                .bind(&raw_log.topics)
                .bind(&raw_log.data)
                .bind(raw_log.block_timestamp)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            let purchase_query = r#"
                INSERT OR IGNORE INTO purchases (
                    buyer_address, product_id, price_wei, quantity,
                    event_timestamp, block_number, transaction_hash, log_index
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#;
            outcome.purchases += sqlx::query(purchase_query)
                .bind(&purchase.buyer_address)
                .bind(&purchase.product_id)
                .bind(&purchase.price_wei)
                .bind(&purchase.quantity)
                .bind(purchase.event_timestamp)
                .bind(purchase.block_number)
                .bind(&purchase.transaction_hash)
                .bind(purchase.log_index)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;
        Ok(outcome)
    }

    // ---------------------------
    // CURSOR
    // ---------------------------

    /// Next block to index: `0` on an empty store, else highest stored block + 1.
    pub async fn last_indexed_block(&self) -> Result<BlockNumber, Error> {
        let query = "SELECT MAX(block_number) FROM raw_logs";
        let max_block: Option<i64> =
            sqlx::query_scalar(query).fetch_one(self.client.pool()).await?;

        Ok(max_block.map_or(0, |block_number| block_number as u64 + 1))
    }

    // ---------------------------
    // RAW LOGS
    // ---------------------------

    pub async fn get_raw_logs_between_block_numbers(
        &self,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<RawLog>, Error> {
        let query = r#"
            SELECT
                block_number, transaction_hash, log_index,
                contract_address, topics, data, block_timestamp
            FROM raw_logs
            WHERE block_number BETWEEN ? AND ?
            ORDER BY block_number ASC, log_index ASC
            "#;
        let logs = sqlx::query_as(query)
            .bind(from_block as i64)
            .bind(to_block as i64)
            .fetch_all(self.client.pool())
            .await?;

        Ok(logs)
    }

    pub async fn count_raw_logs(&self) -> Result<u64, Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM raw_logs").fetch_one(self.client.pool()).await?;
        Ok(count as u64)
    }

    // ---------------------------
    // PURCHASES
    // ---------------------------

    pub async fn get_purchases_from_block_number(
        &self,
        from_block_number: BlockNumber,
    ) -> Result<Vec<Purchase>, Error> {
        let query = r#"
            SELECT
                buyer_address, product_id, price_wei, quantity,
                event_timestamp, block_number, transaction_hash, log_index
            FROM purchases
            WHERE block_number >= ?
            ORDER BY block_number ASC, log_index ASC
            "#;
        let purchases = sqlx::query_as(query)
            .bind(from_block_number as i64)
            .fetch_all(self.client.pool())
            .await?;

        Ok(purchases)
    }

    pub async fn get_purchases_between_block_numbers(
        &self,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<Purchase>, Error> {
        let query = r#"
            SELECT
                buyer_address, product_id, price_wei, quantity,
                event_timestamp, block_number, transaction_hash, log_index
            FROM purchases
            WHERE block_number BETWEEN ? AND ?
            ORDER BY block_number ASC, log_index ASC
            "#;
        let purchases = sqlx::query_as(query)
            .bind(from_block as i64)
            .bind(to_block as i64)
            .fetch_all(self.client.pool())
            .await?;

        Ok(purchases)
    }

    pub async fn get_purchases_by_buyer(&self, buyer: &Address) -> Result<Vec<Purchase>, Error> {
        let query = r#"
            SELECT
                buyer_address, product_id, price_wei, quantity,
                event_timestamp, block_number, transaction_hash, log_index
            FROM purchases
            WHERE buyer_address = ?
            ORDER BY block_number ASC, log_index ASC
            "#;
        let purchases = sqlx::query_as(query)
            .bind(buyer.as_slice())
            .fetch_all(self.client.pool())
            .await?;

        Ok(purchases)
    }

    pub async fn count_purchases(&self) -> Result<u64, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases")
            .fetch_one(self.client.pool())
            .await?;
        Ok(count as u64)
    }
}
