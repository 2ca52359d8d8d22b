use std::time::Duration;

use alloy::primitives::{Address, B256};

use crate::retry::RetryPolicy;

pub const DEFAULT_BATCH_SIZE: u64 = 100;

#[derive(Debug, Clone)]
pub struct Args {
    pub address: Address,
    pub topic0: B256,
    pub batch_size: u64,
    pub poll_interval: Duration,
    pub recovery_delay: Duration,
    pub reconnect_policy: RetryPolicy,
}

impl Args {
    pub fn new(address: Address, topic0: B256) -> Self {
        Self {
            address,
            topic0,
            batch_size: DEFAULT_BATCH_SIZE,
            poll_interval: Duration::from_secs(2),
            recovery_delay: Duration::from_secs(5),
            reconnect_policy: RetryPolicy::default(),
        }
    }
}
