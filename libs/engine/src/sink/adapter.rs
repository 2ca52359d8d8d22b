use crate::decoder::{DecodedLog, PurchaseRecord};
use eyre::{Result, WrapErr};
use store::{purchase::model::Purchase, raw_log::model::RawLog};

impl TryFrom<&PurchaseRecord> for Purchase {
    type Error = eyre::Report;

    fn try_from(record: &PurchaseRecord) -> Result<Self> {
        Ok(Purchase {
            buyer_address: record.buyer.to_vec(),
            product_id: record.product_id.to_be_bytes::<32>().to_vec(),
            price_wei: record.price_wei.to_be_bytes::<32>().to_vec(),
            quantity: record.quantity.to_be_bytes::<32>().to_vec(),
            event_timestamp: i64::try_from(record.event_timestamp)
                .wrap_err("event_timestamp out of range")?,
            block_number: i64::try_from(record.block_number).wrap_err("block_number out of range")?,
            transaction_hash: record.transaction_hash.to_vec(),
            log_index: i64::try_from(record.log_index).wrap_err("log_index out of range")?,
        })
    }
}

pub fn to_rows(batch: &[DecodedLog]) -> Result<Vec<(RawLog, Purchase)>> {
    batch
        .iter()
        .map(|decoded| {
            let raw_log = RawLog::try_from((&decoded.log, decoded.block_timestamp))?;
            Ok((raw_log, Purchase::try_from(&decoded.purchase)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, TxHash, U256};

    fn record(event_timestamp: u64) -> PurchaseRecord {
        PurchaseRecord {
            buyer: Address::repeat_byte(0xAB),
            product_id: U256::from(7),
            price_wei: U256::from(1_000_000),
            quantity: U256::from(3),
            event_timestamp,
            block_number: 512,
            transaction_hash: TxHash::repeat_byte(0x11),
            log_index: 4,
        }
    }

    #[test]
    fn converts_record_to_row() {
        let purchase = Purchase::try_from(&record(1_600_000_000)).unwrap();
        assert_eq!(purchase.event_timestamp, 1_600_000_000);
        assert_eq!(purchase.block_number, 512);
        assert_eq!(purchase.log_index, 4);
        assert_eq!(purchase.quantity, U256::from(3).to_be_bytes::<32>().to_vec());
    }

    #[test]
    fn rejects_values_that_would_wrap() {
        assert!(Purchase::try_from(&record(1 << 63)).is_err());

        let mut far_block = record(0);
        far_block.block_number = u64::MAX;
        assert!(Purchase::try_from(&far_block).is_err());
    }
}
