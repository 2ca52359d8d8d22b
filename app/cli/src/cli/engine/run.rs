use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use alloy::transports::http::reqwest::Url;
use chain::rpc::NodeClient;
use engine::{
    args::Args as EngineArgs,
    decoder::{self, purchase_made_topic},
    engine::Indexer,
    handoff::wait_for_contract_info,
    metrics::IndexerMetrics,
    retry::{RetryPolicy, retry},
    sink::{handle::Sink, purchase::PurchaseSink},
    source::{handle::Source, log::LogSource},
};
use eyre::{Result, eyre};
use store::{client::Client, store::Store};
use tokio::sync::watch;

use crate::cli::engine::args::Args;
use crate::cli::metrics;

pub async fn start(args: &Args) -> Result<()> {
    let metrics = Arc::new(IndexerMetrics::new());
    let metrics_port = args.metrics_port;
    let metrics_for_server = Arc::clone(&metrics);
    let metrics_server = tokio::spawn(async move {
        if let Err(e) = metrics::serve(metrics_port, metrics_for_server).await {
            tracing::error!("Metrics server error: {e:?}");
        }
    });

    let startup_policy =
        RetryPolicy::new(args.startup_retries, Duration::from_secs(args.retry_delay));

    // Node
    tracing::info!("Connecting to RPC: {}", args.rpc_url);
    let node_client = NodeClient::new(Url::parse(&args.rpc_url)?);
    let rpc = &node_client;
    let head =
        retry(&startup_policy, "RPC", || async move { Ok(rpc.get_latest_block_number().await?) })
            .await?;
    tracing::info!("RPC connected, chain head at block {head}");

    // Database
    tracing::info!("Connecting to database...");
    let client = retry(&startup_policy, "database", || Client::init(&args.db_url)).await?;
    tracing::info!("Database connected");

    // Deployer hand-off
    let contract_info =
        wait_for_contract_info(Path::new(&args.contract_info_path), &startup_policy).await?;
    let address = contract_info.contract_address;
    decoder::verify_abi(&contract_info.abi)?;
    if node_client.get_code(&address).await?.is_empty() {
        return Err(eyre!("No contract code at {address}"));
    }
    let topic0 = purchase_made_topic();
    tracing::info!("Contract address: {address}");
    tracing::info!("Event signature: {topic0}");

    let engine_args = EngineArgs {
        address,
        topic0,
        batch_size: args.batch_size,
        poll_interval: Duration::from_secs(args.poll_interval),
        recovery_delay: Duration::from_secs(args.recovery_delay),
        reconnect_policy: startup_policy,
    };
    let source: Arc<dyn Source> = Arc::new(LogSource { node_client });
    let sink: Arc<dyn Sink> = Arc::new(PurchaseSink::new(Store::new(client)));

    let mut indexer = Indexer::new(engine_args, source, sink, metrics);
    indexer.connect().await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutting down indexer...");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                tracing::error!("Cannot listen for shutdown signal: {e:?}");
                // hold the sender so the indexer keeps running
                std::future::pending::<()>().await;
            }
        }
    });

    tracing::info!("Indexer running...");
    indexer.run_until(shutdown_rx).await?;

    metrics_server.abort();
    Ok(())
}
