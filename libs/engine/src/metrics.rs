//! Prometheus metrics for indexing progress and lag.
//!
//! All metrics live in an explicit [`IndexerMetrics`] object shared by the
//! indexing loop and the exposition endpoint. Values are atomics, so reading
//! them for exposition never blocks the loop.

use std::sync::atomic::AtomicI64;

use alloy::primitives::BlockNumber;
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::{Histogram, exponential_buckets};
use prometheus_client::registry::Registry;

use crate::scanner::BlockRange;

pub struct IndexerMetrics {
    registry: Registry,
    /// Total events indexed.
    pub events_indexed: Counter,
    /// Total blocks scanned, whether or not they held events.
    pub blocks_processed: Counter,
    /// Last block of the most recently persisted interval.
    pub current_block: Gauge<i64, AtomicI64>,
    /// Latest block number reported by the node.
    pub chain_head: Gauge<i64, AtomicI64>,
    /// Blocks between the chain head and the cursor.
    pub lag_blocks: Gauge<i64, AtomicI64>,
    /// Fetch and decode time per batch, in seconds.
    pub index_duration_seconds: Histogram,
    /// Persistence time per batch, in seconds.
    pub db_write_duration_seconds: Histogram,
}

impl Default for IndexerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn as_gauge_value(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl IndexerMetrics {
    pub fn new() -> Self {
        // 1ms to ~16s
        let duration_buckets = || exponential_buckets(0.001, 2.0, 15);

        let metrics = Self {
            registry: Registry::default(),
            events_indexed: Counter::default(),
            blocks_processed: Counter::default(),
            current_block: Gauge::default(),
            chain_head: Gauge::default(),
            lag_blocks: Gauge::default(),
            index_duration_seconds: Histogram::new(duration_buckets()),
            db_write_duration_seconds: Histogram::new(duration_buckets()),
        };
        metrics.registered()
    }

    fn registered(mut self) -> Self {
        // prometheus-client appends `_total` to counters on exposition
        self.registry.register(
            "indexer_events_indexed",
            "Total number of events indexed",
            self.events_indexed.clone(),
        );
        self.registry.register(
            "indexer_blocks_processed",
            "Total number of blocks processed",
            self.blocks_processed.clone(),
        );
        self.registry.register(
            "indexer_current_block",
            "Current block number being processed",
            self.current_block.clone(),
        );
        self.registry.register(
            "indexer_chain_head",
            "Latest block number on the chain",
            self.chain_head.clone(),
        );
        self.registry.register(
            "indexer_lag_blocks",
            "Number of blocks behind chain head",
            self.lag_blocks.clone(),
        );
        self.registry.register(
            "indexer_index_duration_seconds",
            "Time spent fetching and decoding events",
            self.index_duration_seconds.clone(),
        );
        self.registry.register(
            "indexer_db_write_duration_seconds",
            "Time spent writing to database",
            self.db_write_duration_seconds.clone(),
        );
        self
    }

    /// Records a fresh chain head read while the cursor is at `cursor`.
    pub fn observe_head(&self, head: BlockNumber, cursor: BlockNumber) {
        self.chain_head.set(as_gauge_value(head));
        self.lag_blocks.set(as_gauge_value(head.saturating_sub(cursor)));
    }

    /// Records a persisted interval. Lag is measured against the advanced cursor `range.to + 1`.
    pub fn record_batch(
        &self,
        range: &BlockRange,
        head: BlockNumber,
        events: u64,
        fetch_secs: f64,
        write_secs: f64,
    ) {
        self.events_indexed.inc_by(events);
        self.blocks_processed.inc_by(range.block_count());
        self.current_block.set(as_gauge_value(range.to));
        self.lag_blocks.set(as_gauge_value(head.saturating_sub(range.next_cursor())));
        self.index_duration_seconds.observe(fetch_secs);
        self.db_write_duration_seconds.observe(write_secs);
    }

    /// Encodes all metrics in the Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        if encode(&mut buffer, &self.registry).is_err() {
            return String::from("# Error encoding metrics\n");
        }
        buffer
    }
}
