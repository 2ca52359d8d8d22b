use serde::{Serialize, ser::SerializeStruct};
use store::{purchase::model::Purchase, raw_log::model::RawLog, utils};

// Tuple wrapper for Purchase
pub struct PurchaseResponse(pub Purchase);

impl Serialize for PurchaseResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let p = &self.0;
        let mut state = serializer.serialize_struct("Purchase", 8)?;
        state.serialize_field("block_number", &p.block_number)?;
        state.serialize_field("transaction_hash", &utils::bytes_to_hex(&p.transaction_hash))?;
        state.serialize_field("log_index", &p.log_index)?;
        state.serialize_field("buyer_address", &utils::bytes_to_address(&p.buyer_address))?;
        state.serialize_field("product_id", &utils::bytes_to_u256(&p.product_id))?;
        state.serialize_field("price_wei", &utils::bytes_to_u256(&p.price_wei))?;
        state.serialize_field("quantity", &utils::bytes_to_u256(&p.quantity))?;
        state.serialize_field("event_timestamp", &p.event_timestamp)?;
        state.end()
    }
}

// Tuple wrapper for RawLog
pub struct RawLogResponse(pub RawLog);

impl Serialize for RawLogResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let l = &self.0;
        let mut state = serializer.serialize_struct("RawLog", 7)?;
        state.serialize_field("block_number", &l.block_number)?;
        state.serialize_field("transaction_hash", &utils::bytes_to_hex(&l.transaction_hash))?;
        state.serialize_field("log_index", &l.log_index)?;
        state.serialize_field("contract_address", &utils::bytes_to_address(&l.contract_address))?;
        state.serialize_field("topics", &utils::bytes_to_words(&l.topics))?;
        state.serialize_field("data", &utils::bytes_to_hex(&l.data))?;
        state.serialize_field("block_timestamp", &l.block_timestamp)?;
        state.end()
    }
}

#[derive(Serialize)]
pub struct CursorResponse {
    pub last_indexed_block: Option<u64>,
    pub next_block: u64,
}

impl CursorResponse {
    pub fn new(next_block: u64) -> Self {
        Self { last_indexed_block: next_block.checked_sub(1), next_block }
    }
}
