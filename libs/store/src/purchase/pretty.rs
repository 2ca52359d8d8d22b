use std::fmt::{Debug, Formatter, Result};

use crate::{purchase::model::Purchase, utils};

impl Debug for Purchase {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("Purchase")
            .field("buyer_address", &utils::bytes_to_address(&self.buyer_address[..]))
            .field("product_id", &utils::bytes_to_u256(&self.product_id))
            .field("price_wei", &utils::bytes_to_u256(&self.price_wei))
            .field("quantity", &utils::bytes_to_u256(&self.quantity))
            .field("event_timestamp", &self.event_timestamp)
            .field("block_number", &self.block_number)
            .field("transaction_hash", &utils::bytes_to_hex(&self.transaction_hash))
            .field("log_index", &self.log_index)
            .finish()
    }
}
