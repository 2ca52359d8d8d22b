use alloy::primitives::Address;
use clap::Parser;

use crate::cli::engine::args::DEFAULT_DB_URL;
use crate::cli::query::read::{Entity, FromBlock};

#[derive(Parser, Debug)]
#[command(about = "Select indexed results", long_about = None)]
pub struct Query {
    /// SQLite connection string
    #[arg(short, long, env = "DATABASE_URL", default_value = DEFAULT_DB_URL)]
    pub db_url: String,

    /// Entity to query
    #[arg(short, long, value_enum)]
    pub entity: Entity,

    /// First block to include, or `last` for the last indexed block
    #[arg(long, default_value = "0")]
    pub from_block: FromBlock,

    /// Only purchases made by this buyer
    #[arg(long)]
    pub buyer: Option<Address>,
}
