use crate::raw_log::model::RawLog;
use alloy::{primitives::B256, rpc::types::Log};
use eyre::{Result, WrapErr, eyre};
use std::convert::TryFrom;

impl TryFrom<(&Log, u64)> for RawLog {
    type Error = eyre::Report;

    fn try_from((log, block_timestamp): (&Log, u64)) -> Result<Self> {
        let block_number = log.block_number.ok_or_else(|| eyre!("missing block_number"))?;
        let log_index = log.log_index.ok_or_else(|| eyre!("missing log_index"))?;

        Ok(Self {
            block_number: i64::try_from(block_number).wrap_err("block_number out of range")?,
            transaction_hash: log
                .transaction_hash
                .ok_or_else(|| eyre!("missing transaction_hash"))?
                .to_vec(),
            log_index: i64::try_from(log_index).wrap_err("log_index out of range")?,
            contract_address: log.address().to_vec(),
            topics: log.topics().iter().flat_map(|topic| topic.0).collect(),
            data: log.data().data.to_vec(),
            block_timestamp: i64::try_from(block_timestamp)
                .wrap_err("block_timestamp out of range")?,
        })
    }
}

impl RawLog {
    pub fn topic_words(&self) -> Vec<B256> {
        self.topics.chunks_exact(32).map(B256::from_slice).collect()
    }
}
