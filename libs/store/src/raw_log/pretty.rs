use std::fmt::{Debug, Formatter, Result};

use crate::{raw_log::model::RawLog, utils};

impl Debug for RawLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("RawLog")
            .field("block_number", &self.block_number)
            .field("transaction_hash", &utils::bytes_to_hex(&self.transaction_hash))
            .field("log_index", &self.log_index)
            .field("contract_address", &utils::bytes_to_address(&self.contract_address[..]))
            .field("topics", &utils::bytes_to_words(&self.topics))
            .field("data", &utils::bytes_to_hex(&self.data))
            .field("block_timestamp", &self.block_timestamp)
            .finish()
    }
}
