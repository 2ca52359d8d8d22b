use sqlx::FromRow;

/// Decoded `PurchaseMade` row. The uint256 fields are stored as 32-byte big-endian blobs.
#[derive(Clone, FromRow, PartialEq, PartialOrd)]
pub struct Purchase {
    pub buyer_address: Vec<u8>,
    pub product_id: Vec<u8>,
    pub price_wei: Vec<u8>,
    pub quantity: Vec<u8>,
    pub event_timestamp: i64,
    pub block_number: i64,
    pub transaction_hash: Vec<u8>,
    pub log_index: i64,
}
