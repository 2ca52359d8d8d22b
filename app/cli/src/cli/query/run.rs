use crate::cli::query::args::Query;
use crate::cli::query::read::{Entity, FromBlock};
use crate::cli::query::response::{CursorResponse, PurchaseResponse, RawLogResponse};
use eyre::{Result, eyre};
use store::client::Client;
use store::store::Store;

// block numbers are stored as INTEGER
const MAX_BLOCK: u64 = i64::MAX as u64;

pub async fn select(query: &Query) -> Result<()> {
    let client = Client::init(&query.db_url).await?;
    let store = Store::new(client);

    println!("{}", render(&store, query).await?);

    Ok(())
}

/// Renders the selected entity as JSON. An empty selection renders as `[]`.
pub async fn render(store: &Store, query: &Query) -> Result<String> {
    let next_block = store.last_indexed_block().await?;

    let from_block_number = match query.from_block {
        FromBlock::Number(block_number) => Ok(block_number),
        FromBlock::Last => match next_block.checked_sub(1) {
            None => Err(eyre!("No Indexed Blocks Found")),
            Some(block_number) => Ok(block_number),
        },
    };

    let json = match query.entity {
        Entity::Purchase => {
            let block_number = from_block_number?;

            let purchases = match &query.buyer {
                Some(buyer) => store
                    .get_purchases_by_buyer(buyer)
                    .await?
                    .into_iter()
                    .filter(|p| p.block_number as u64 >= block_number)
                    .collect(),
                None => store.get_purchases_from_block_number(block_number).await?,
            };

            tracing::info!("Found {} purchases from block {block_number}", purchases.len());
            let response: Vec<PurchaseResponse> =
                purchases.into_iter().map(PurchaseResponse).collect();
            serde_json::to_string_pretty(&response)?
        }
        Entity::RawLog => {
            let block_number = from_block_number?;

            let logs = store.get_raw_logs_between_block_numbers(block_number, MAX_BLOCK).await?;

            tracing::info!("Found {} raw logs from block {block_number}", logs.len());
            let response: Vec<RawLogResponse> = logs.into_iter().map(RawLogResponse).collect();
            serde_json::to_string_pretty(&response)?
        }
        Entity::Cursor => serde_json::to_string_pretty(&CursorResponse::new(next_block))?,
    };

    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(entity: Entity, from_block: FromBlock) -> Query {
        Query { db_url: "sqlite::memory:".to_string(), entity, from_block, buyer: None }
    }

    #[tokio::test]
    async fn test_empty_store_renders_json() -> Result<()> {
        let store = Store::new(Client::init("sqlite::memory:").await?);

        for entity in [Entity::Purchase, Entity::RawLog] {
            let json = render(&store, &query(entity, FromBlock::Number(0))).await?;
            assert_eq!(serde_json::from_str::<serde_json::Value>(&json)?, serde_json::json!([]));
        }

        let json = render(&store, &query(Entity::Cursor, FromBlock::Number(0))).await?;
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&json)?,
            serde_json::json!({ "last_indexed_block": null, "next_block": 0 })
        );

        assert!(render(&store, &query(Entity::Purchase, FromBlock::Last)).await.is_err());
        Ok(())
    }
}
