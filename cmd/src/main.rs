use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use abi::config::{Config, LogConfig};
use abi::errors::Error;

/// chitchat server: directory, friends and live conversations over http
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the yaml configuration file
    #[arg(short, long, default_value = "./abi/fixtures/chat.yml")]
    config: PathBuf,

    /// Port for the http server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // dropping the guard flushes the file writer
    let _guard = init_tracing(&config.log);
    info!("config loaded from {}", cli.config.display());

    api::start(config).await
}

fn init_tracing(log: &LogConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let stdout = fmt::layer().with_line_number(true);

    match &log.output {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "chitchat.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout)
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_line_number(true)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout)
                .init();
            None
        }
    }
}
