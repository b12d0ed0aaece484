//! ferrymq – runs the broker daemon.
//
//  $ ferrymq start --config ferrymq.toml
//  $ ferrymq start --bind 0.0.0.0:5000
//  $ ferrymq check-config --config ferrymq.toml
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use ferrymq::logging::init_logging;
use ferrymq::{start_broker, Broker, Config};

#[derive(Debug, Parser)]
#[command(name = "ferrymq", version, about = "FerryMQ in-memory message broker")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the broker daemon.
    Start {
        /// Path to config TOML (env FERRYMQ_CONFIG overrides)
        #[arg(short, long)]
        config: Option<String>,
        /// Listen address, overriding `server.bind_addr`
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Load and validate the configuration, then print it.
    CheckConfig {
        /// Path to config TOML (env FERRYMQ_CONFIG overrides)
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    match cli.cmd {
        Command::Start { config, bind } => {
            let cfg: Config = Config::load(config.as_deref())?;
            let bind_addr = bind.unwrap_or(cfg.server.bind_addr);
            let default_ttl = cfg.broker.default_ttl()?;

            info!(
                bind_addr = %bind_addr,
                default_ttl_seconds = default_ttl.as_secs_f64(),
                "starting FerryMQ"
            );
            let broker = Arc::new(Broker::new().with_default_ttl(default_ttl));
            start_broker(&bind_addr, broker).await?;
        }
        Command::CheckConfig { config } => {
            let cfg: Config = Config::load(config.as_deref())?;
            println!("{cfg:#?}");
        }
    }
    Ok(())
}
