mod cli {
    pub mod engine {
        pub mod args;
        pub mod run;
    }
    pub mod query {
        pub mod args;
        pub mod read;
        pub mod response;
        pub mod run;
    }
    pub mod cmd;
    pub mod metrics;
}

use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

use crate::cli::cmd::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli);

    match &cli.command {
        Command::Engine(args) => {
            tracing::info!("Engine Command: {:?}", args);
            cli::engine::run::start(args).await
        }
        Command::Select(query) => {
            tracing::info!("Engine Query: {:?}", query);
            cli::query::run::select(query).await
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_tracing(cli: &Cli) {
    match &cli.command {
        Command::Engine(_) => {
            tracing_subscriber::fmt().with_env_filter(env_filter()).init();
        }
        Command::Select(_) => {
            // keep stdout clean for the JSON output
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
