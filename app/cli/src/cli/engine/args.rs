use clap::Parser;
use clap::{arg, command};

pub const DEFAULT_DB_URL: &str = "sqlite://blockchain_data.db?mode=rwc";

#[derive(Parser, Debug)]
#[command(about = "Start the purchase indexer", long_about = None)]
pub struct Args {
    /// Node JSON-RPC endpoint
    #[arg(short, long, env = "RPC_URL", default_value = "http://localhost:8545")]
    pub rpc_url: String,

    /// SQLite connection string
    #[arg(short, long, env = "DATABASE_URL", default_value = DEFAULT_DB_URL)]
    pub db_url: String,

    /// Hand-off file written by the deployer
    #[arg(
        short,
        long,
        env = "CONTRACT_INFO_PATH",
        default_value = "/app/contract_info/contract_info.json"
    )]
    pub contract_info_path: String,

    /// Poll interval in seconds once caught up
    #[arg(short, long, env = "POLL_INTERVAL", default_value_t = 2)]
    pub poll_interval: u64,

    /// Port of the Prometheus metrics endpoint
    #[arg(short, long, env = "METRICS_PORT", default_value_t = 8000)]
    pub metrics_port: u16,

    /// Blocks scanned per batch
    #[arg(long, env = "BATCH_SIZE", default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    pub batch_size: u64,

    /// Delay in seconds after a failed batch before retrying
    #[arg(long, env = "RECOVERY_DELAY", default_value_t = 5)]
    pub recovery_delay: u64,

    /// Attempts when waiting for the node, the database or the hand-off file
    #[arg(long, env = "STARTUP_RETRIES", default_value_t = 30)]
    pub startup_retries: u32,

    /// Delay in seconds between those attempts
    #[arg(long, env = "RETRY_DELAY", default_value_t = 2)]
    pub retry_delay: u64,
}
