use clap::command;
use clap::{Parser, Subcommand};

use crate::cli::query::args::Query;

use super::engine::args::Args;

#[derive(Parser, Debug)]
#[command(name = "purchase-indexer")]
#[command(about = "Indexes PurchaseMade events into a queryable store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the indexer engine
    Engine(Args),
    /// Select indexed results
    Select(Query),
}
