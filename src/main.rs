use std::fs::File;
use std::io::Read as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::info;

mod config;
mod dispatcher;
mod error;
mod executor;
mod payload;
mod server;

#[derive(Parser, Debug)]
#[command(about = "Runs a debounced shell command when wireless clients connect or disconnect")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let config: config::AppConfig = match &args.config {
        Some(path) => {
            let mut file = File::open(path)?;
            let mut config_contents = String::new();
            file.read_to_string(&mut config_contents)?;
            toml::de::from_str(&config_contents)?
        }
        None => config::AppConfig::default(),
    };

    let shell = config
        .dispatch
        .shell
        .clone()
        .unwrap_or_else(|| "/bin/sh".to_string());
    let default_interval = config
        .dispatch
        .default_interval_seconds
        .unwrap_or(dispatcher::DEFAULT_INTERVAL_SECONDS);
    let dispatcher = Arc::new(dispatcher::Dispatcher::new(
        executor::ShellRunner::new(shell),
        default_interval,
    ));

    let host = config
        .listen
        .host
        .clone()
        .unwrap_or_else(|| "0.0.0.0".to_string());
    let port = args.port.or(config.listen.port).unwrap_or(9200);

    let app = server::router(dispatcher);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
