use crate::args::Args;
use crate::decoder::{DecodedLog, decode_purchase};
use crate::metrics::IndexerMetrics;
use crate::retry::retry;
use crate::scanner::{self, BlockRange};
use crate::sink::handle::Sink;
use crate::source::filter::ChunkFilter;
use crate::source::handle::Source;
use crate::state::{State, Step};
use alloy::primitives::BlockNumber;
use eyre::{Result, WrapErr};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Polls the chain for `PurchaseMade` logs and persists them one interval at a time.
///
/// The cursor only moves after an interval is committed, so a failed interval is
/// scanned again from the same block on the next tick.
pub struct Indexer {
    args: Args,
    source: Arc<dyn Source>,
    sink: Arc<dyn Sink>,
    metrics: Arc<IndexerMetrics>,
    cursor: BlockNumber,
    state: State,
}

impl Indexer {
    pub fn new(
        args: Args,
        source: Arc<dyn Source>,
        sink: Arc<dyn Sink>,
        metrics: Arc<IndexerMetrics>,
    ) -> Self {
        Self { args, source, sink, metrics, cursor: 0, state: State::Connecting }
    }

    pub fn cursor(&self) -> BlockNumber {
        self.cursor
    }

    pub fn state(&self) -> State {
        self.state
    }

    fn transition(&mut self, next: State) {
        if self.state != next {
            tracing::info!("Indexer state: {} -> {}", self.state, next);
            self.state = next;
        }
    }

    /// Loads the resumption cursor from what the sink already holds.
    pub async fn connect(&mut self) -> Result<()> {
        self.transition(State::Connecting);
        self.cursor = self.sink.last_indexed_block().await?;
        tracing::info!("Starting from block: {}", self.cursor);
        Ok(())
    }

    /// One poll tick: read the head, scan the next interval if there is one,
    /// persist it and advance the cursor.
    pub async fn step(&mut self) -> Result<Step> {
        let head = self.source.head().await.wrap_err("Failed to read chain head")?;
        self.metrics.observe_head(head, self.cursor);

        let Some(range) = scanner::next_range(self.cursor, head, self.args.batch_size) else {
            return Ok(Step::Idle { head });
        };

        let fetch_started = Instant::now();
        let batch = self
            .fetch_and_decode(range)
            .await
            .wrap_err_with(|| format!("Failed to fetch blocks {range}"))?;
        let fetch_secs = fetch_started.elapsed().as_secs_f64();

        let write_started = Instant::now();
        self.sink
            .process_batch(&batch)
            .await
            .wrap_err_with(|| format!("Failed to persist blocks {range}"))?;
        let write_secs = write_started.elapsed().as_secs_f64();

        let events = batch.len() as u64;
        self.metrics.record_batch(&range, head, events, fetch_secs, write_secs);
        self.cursor = range.next_cursor();

        if events > 0 {
            tracing::info!(
                "Indexed {events} events | Blocks: {}-{} | Lag: {}",
                range.from,
                range.to,
                head.saturating_sub(self.cursor)
            );
        } else {
            tracing::debug!("No events in blocks {}-{}", range.from, range.to);
        }

        Ok(Step::Indexed { range, head, events })
    }

    async fn fetch_and_decode(&self, range: BlockRange) -> Result<Vec<DecodedLog>> {
        let filter = ChunkFilter { address: self.args.address, topic0: self.args.topic0, range };
        let logs = self.source.chunk(&filter).await?;

        // Several purchases usually share a block
        let mut block_timestamps: HashMap<BlockNumber, u64> = HashMap::new();
        let mut batch = Vec::with_capacity(logs.len());

        for log in logs {
            let purchase = decode_purchase(&log).wrap_err_with(|| {
                format!(
                    "Malformed log at block {:?}, tx {:?}, index {:?}",
                    log.block_number, log.transaction_hash, log.log_index
                )
            })?;

            let block_timestamp = match block_timestamps.get(&purchase.block_number) {
                Some(timestamp) => *timestamp,
                None => {
                    let timestamp = self.source.block_timestamp(purchase.block_number).await?;
                    block_timestamps.insert(purchase.block_number, timestamp);
                    timestamp
                }
            };

            batch.push(DecodedLog { log, block_timestamp, purchase });
        }

        Ok(batch)
    }

    /// Reconnects the sink after a failed tick. A reconnect that exhausts its
    /// retries is logged and left to the next tick.
    async fn recover(&mut self) {
        self.transition(State::ErrorRecovery);
        let sink = &self.sink;
        if let Err(e) =
            retry(&self.args.reconnect_policy, "persistence reconnect", || sink.reconnect()).await
        {
            tracing::error!("Recovery could not reconnect persistence: {e:?}");
        }
    }

    /// Runs until the process is stopped.
    pub async fn run(&mut self) -> Result<()> {
        let (_keep_alive, shutdown) = watch::channel(false);
        self.run_until(shutdown).await
    }

    /// Runs until `shutdown` turns `true` or its sender is dropped. Stopping between
    /// ticks is always safe since every interval commits atomically.
    pub async fn run_until(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        loop {
            if *shutdown.borrow() {
                break;
            }
            if self.state == State::ErrorRecovery {
                self.transition(State::Connecting);
            }

            let pause: Option<Duration> = match self.step().await {
                Ok(step) => {
                    self.transition(step.state());
                    match step {
                        // Keep going while behind the head
                        Step::Indexed { .. } => None,
                        Step::Idle { .. } => Some(self.args.poll_interval),
                    }
                }
                Err(e) => {
                    tracing::error!("Indexing failed at cursor {}: {e:?}", self.cursor);
                    self.recover().await;
                    Some(self.args.recovery_delay)
                }
            };

            if let Some(pause) = pause {
                tokio::select! {
                    _ = tokio::time::sleep(pause) => {}
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!("Indexer stopped at block {}", self.cursor);
        Ok(())
    }
}
