//! Decoding of `PurchaseMade` logs.
//!
//! Layout of the event:
//! * `topics[0]`: keccak256 of [`PURCHASE_MADE_SIGNATURE`]
//! * `topics[1]`: indexed buyer, left-padded to 32 bytes
//! * `topics[2]`: indexed product id, big-endian uint256
//! * `data`: price (wei), quantity and timestamp, three big-endian uint256 words

use std::sync::LazyLock;

use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, B256, BlockNumber, TxHash, U256, keccak256};
use alloy::rpc::types::Log;
use eyre::{Result, eyre};
use thiserror::Error;

pub const PURCHASE_MADE_SIGNATURE: &str = "PurchaseMade(address,uint256,uint256,uint256,uint256)";

const PURCHASE_MADE_NAME: &str = "PurchaseMade";
const WORD_SIZE: usize = 32;
const MIN_TOPICS: usize = 3;
const MIN_DATA_LEN: usize = 3 * WORD_SIZE;

static PURCHASE_MADE_TOPIC: LazyLock<B256> = LazyLock::new(|| keccak256(PURCHASE_MADE_SIGNATURE));

pub fn purchase_made_topic() -> B256 {
    *PURCHASE_MADE_TOPIC
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEventError {
    #[error("expected at least 3 topics, found {0}")]
    MissingTopics(usize),
    #[error("unexpected event signature {0}")]
    UnexpectedSignature(B256),
    #[error("expected at least 96 bytes of data, found {0}")]
    ShortData(usize),
    #[error("log is missing its {0}")]
    MissingField(&'static str),
    #[error("event timestamp {0} does not fit in a signed 64-bit integer")]
    TimestampOverflow(U256),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRecord {
    pub buyer: Address,
    pub product_id: U256,
    pub price_wei: U256,
    pub quantity: U256,
    pub event_timestamp: u64,
    pub block_number: BlockNumber,
    pub transaction_hash: TxHash,
    pub log_index: u64,
}

/// A confirmed log paired with its block timestamp and decoded purchase.
#[derive(Debug, Clone)]
pub struct DecodedLog {
    pub log: Log,
    pub block_timestamp: u64,
    pub purchase: PurchaseRecord,
}

fn word(data: &[u8], index: usize) -> U256 {
    U256::from_be_slice(&data[index * WORD_SIZE..(index + 1) * WORD_SIZE])
}

pub fn decode_purchase(log: &Log) -> Result<PurchaseRecord, MalformedEventError> {
    let topics = log.topics();
    if topics.len() < MIN_TOPICS {
        return Err(MalformedEventError::MissingTopics(topics.len()));
    }
    if topics[0] != purchase_made_topic() {
        return Err(MalformedEventError::UnexpectedSignature(topics[0]));
    }

    let data = &log.data().data;
    if data.len() < MIN_DATA_LEN {
        return Err(MalformedEventError::ShortData(data.len()));
    }

    let raw_timestamp = word(data, 2);
    // stored as a signed INTEGER
    let event_timestamp = u64::try_from(raw_timestamp)
        .ok()
        .filter(|timestamp| i64::try_from(*timestamp).is_ok())
        .ok_or(MalformedEventError::TimestampOverflow(raw_timestamp))?;

    Ok(PurchaseRecord {
        buyer: Address::from_word(topics[1]),
        product_id: U256::from_be_bytes(topics[2].0),
        price_wei: word(data, 0),
        quantity: word(data, 1),
        event_timestamp,
        block_number: log.block_number.ok_or(MalformedEventError::MissingField("block number"))?,
        transaction_hash: log
            .transaction_hash
            .ok_or(MalformedEventError::MissingField("transaction hash"))?,
        log_index: log.log_index.ok_or(MalformedEventError::MissingField("log index"))?,
    })
}

/// Checks the published ABI against the hard-coded signature.
///
/// An ABI without a `PurchaseMade` event is tolerated with a warning. One that
/// declares it with a different parameter list would silently index nothing,
/// so it is rejected.
pub fn verify_abi(abi: &JsonAbi) -> Result<()> {
    let expected = purchase_made_topic();
    match abi.events.get(PURCHASE_MADE_NAME) {
        None => {
            tracing::warn!("ABI declares no {PURCHASE_MADE_NAME} event, indexing by signature only");
            Ok(())
        }
        Some(events) if events.iter().any(|event| event.selector() == expected) => Ok(()),
        Some(events) => {
            let declared: Vec<String> = events.iter().map(|event| event.signature()).collect();
            Err(eyre!(
                "ABI declares {declared:?}, which does not match {PURCHASE_MADE_SIGNATURE}"
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Bytes, LogData};

    fn u256_word(value: u64) -> Vec<u8> {
        U256::from(value).to_be_bytes::<32>().to_vec()
    }

    fn log_with(topics: Vec<B256>, data: Vec<u8>) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: Address::repeat_byte(0x42),
                data: LogData::new_unchecked(topics, Bytes::from(data)),
            },
            block_hash: None,
            block_number: Some(512),
            block_timestamp: None,
            transaction_hash: Some(TxHash::repeat_byte(0x11)),
            transaction_index: Some(0),
            log_index: Some(4),
            removed: false,
        }
    }

    fn u256_topic(value: u64) -> B256 {
        B256::from(U256::from(value).to_be_bytes::<32>())
    }

    fn buyer_topic() -> B256 {
        let mut topic = [0u8; 32];
        topic[30] = 0xAB;
        topic[31] = 0xCD;
        B256::from(topic)
    }

    fn purchase_data() -> Vec<u8> {
        [u256_word(1_000_000), u256_word(3), u256_word(0x5f5e100)].concat()
    }

    #[test]
    fn signature_hash_matches_keccak_of_literal() {
        assert_eq!(purchase_made_topic(), keccak256(PURCHASE_MADE_SIGNATURE.as_bytes()));
    }

    #[test]
    fn decodes_literal_purchase() {
        let topics = vec![purchase_made_topic(), buyer_topic(), u256_topic(7)];
        let record = decode_purchase(&log_with(topics, purchase_data())).unwrap();

        let mut buyer = [0u8; 20];
        buyer[18] = 0xAB;
        buyer[19] = 0xCD;
        assert_eq!(
            record,
            PurchaseRecord {
                buyer: Address::from(buyer),
                product_id: U256::from(7),
                price_wei: U256::from(1_000_000),
                quantity: U256::from(3),
                event_timestamp: 0x5f5e100,
                block_number: 512,
                transaction_hash: TxHash::repeat_byte(0x11),
                log_index: 4,
            }
        );
    }

    #[test]
    fn product_id_uses_full_word() {
        let product_id = U256::MAX - U256::from(1);
        let topics =
            vec![purchase_made_topic(), buyer_topic(), B256::from(product_id.to_be_bytes::<32>())];
        let record = decode_purchase(&log_with(topics, purchase_data())).unwrap();
        assert_eq!(record.product_id, product_id);
    }

    #[test]
    fn trailing_data_is_ignored() {
        let topics = vec![purchase_made_topic(), buyer_topic(), u256_topic(7)];
        let mut data = purchase_data();
        data.extend_from_slice(&u256_word(9));
        let record = decode_purchase(&log_with(topics, data)).unwrap();
        assert_eq!(record.quantity, U256::from(3));
    }

    #[test]
    fn rejects_missing_topics() {
        let topics = vec![purchase_made_topic(), buyer_topic()];
        assert_eq!(
            decode_purchase(&log_with(topics, purchase_data())),
            Err(MalformedEventError::MissingTopics(2))
        );
    }

    #[test]
    fn rejects_short_data() {
        let topics = vec![purchase_made_topic(), buyer_topic(), u256_topic(7)];
        let data = purchase_data()[..95].to_vec();
        assert_eq!(
            decode_purchase(&log_with(topics, data)),
            Err(MalformedEventError::ShortData(95))
        );
    }

    #[test]
    fn rejects_foreign_signature() {
        let foreign = keccak256("Transfer(address,address,uint256)");
        let topics = vec![foreign, buyer_topic(), u256_topic(7)];
        assert_eq!(
            decode_purchase(&log_with(topics, purchase_data())),
            Err(MalformedEventError::UnexpectedSignature(foreign))
        );
    }

    #[test]
    fn rejects_pending_log() {
        let topics = vec![purchase_made_topic(), buyer_topic(), u256_topic(7)];
        let mut log = log_with(topics, purchase_data());
        log.block_number = None;
        assert_eq!(
            decode_purchase(&log),
            Err(MalformedEventError::MissingField("block number"))
        );
    }

    #[test]
    fn rejects_timestamp_beyond_u64() {
        let topics = vec![purchase_made_topic(), buyer_topic(), u256_topic(7)];
        let mut data = purchase_data();
        data[64] = 0x01;
        assert!(matches!(
            decode_purchase(&log_with(topics, data)),
            Err(MalformedEventError::TimestampOverflow(_))
        ));
    }

    #[test]
    fn rejects_timestamp_beyond_i64() {
        let topics = vec![purchase_made_topic(), buyer_topic(), u256_topic(7)];
        let data = [u256_word(1_000_000), u256_word(3), u256_word(1 << 63)].concat();
        assert_eq!(
            decode_purchase(&log_with(topics.clone(), data)),
            Err(MalformedEventError::TimestampOverflow(U256::from(1u64 << 63)))
        );

        let data = [u256_word(1_000_000), u256_word(3), u256_word(i64::MAX as u64)].concat();
        let record = decode_purchase(&log_with(topics, data)).unwrap();
        assert_eq!(record.event_timestamp, i64::MAX as u64);
    }

    fn abi_with(inputs: &[(&str, bool)]) -> JsonAbi {
        let inputs: Vec<serde_json::Value> = inputs
            .iter()
            .map(|(name, indexed)| {
                let kind = if *name == "buyer" { "address" } else { "uint256" };
                serde_json::json!({ "name": name, "type": kind, "indexed": indexed })
            })
            .collect();
        let abi = serde_json::json!([
            { "type": "event", "name": "PurchaseMade", "inputs": inputs, "anonymous": false }
        ]);
        serde_json::from_value(abi).unwrap()
    }

    #[test]
    fn accepts_matching_abi() {
        let abi = abi_with(&[
            ("buyer", true),
            ("productId", true),
            ("price", false),
            ("quantity", false),
            ("timestamp", false),
        ]);
        assert!(verify_abi(&abi).is_ok());
    }

    #[test]
    fn tolerates_abi_without_event() {
        assert!(verify_abi(&JsonAbi::new()).is_ok());
    }

    #[test]
    fn rejects_drifted_abi() {
        let abi = abi_with(&[("buyer", true), ("productId", true), ("price", false)]);
        assert!(verify_abi(&abi).is_err());
    }
}
