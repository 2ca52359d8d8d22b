use sqlx::FromRow;

/// A log exactly as the node returned it, plus the timestamp of its block.
#[derive(Clone, FromRow, PartialEq, PartialOrd)]
pub struct RawLog {
    pub block_number: i64,
    pub transaction_hash: Vec<u8>,
    pub log_index: i64,
    pub contract_address: Vec<u8>,
    // topics as concatenated 32-byte words
    pub topics: Vec<u8>,
    pub data: Vec<u8>,
    pub block_timestamp: i64,
}
