#![forbid(unsafe_code)]

//! `data-adapters`: MCP stdio server binary.
//!
//! Starts one adapter (finance, gmail, news, weather, or stocks) on
//! stdin/stdout. Logs go to stderr so they never mix with protocol frames.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use data_adapters::finance::store::PgFinanceStore;
use data_adapters::finance::FinanceTools;
use data_adapters::gmail::mailbox::GmailClient;
use data_adapters::gmail::GmailTools;
use data_adapters::mcp::{transport, Dispatcher, ToolSet};
use data_adapters::news::provider::NewsApiClient;
use data_adapters::news::NewsTools;
use data_adapters::stocks::provider::AlphaVantageClient;
use data_adapters::stocks::StockTools;
use data_adapters::weather::provider::OpenWeatherClient;
use data_adapters::weather::WeatherTools;
use data_adapters::{AppError, GlobalConfig, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Server {
    Finance,
    Gmail,
    News,
    Weather,
    Stocks,
}

#[derive(Debug, Parser)]
#[command(name = "data-adapters", about = "MCP data adapter servers", version, long_about = None)]
struct Cli {
    /// Adapter to serve.
    #[arg(long, value_enum)]
    server: Server,

    /// Optional TOML configuration file; built-in defaults otherwise.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!(server = ?args.server, "data-adapters bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => GlobalConfig::load_from_path(path)?,
        None => GlobalConfig::default(),
    };
    info!("configuration loaded");

    match args.server {
        Server::Finance => {
            config.load_finance_credentials().await;
            let database = config.finance.database.clone();
            let store = PgFinanceStore::new(config.finance);
            serve(FinanceTools::new(Arc::new(store), database)).await
        }
        Server::Gmail => serve(GmailTools::new(Arc::new(GmailClient::new(config.gmail)))).await,
        Server::News => {
            config.load_news_credentials().await;
            serve(NewsTools::new(Arc::new(NewsApiClient::new(config.news)))).await
        }
        Server::Weather => {
            config.load_weather_credentials().await;
            serve(WeatherTools::new(Arc::new(OpenWeatherClient::new(config.weather)))).await
        }
        Server::Stocks => {
            config.load_stocks_credentials().await;
            serve(StockTools::new(Arc::new(AlphaVantageClient::new(config.stocks)))).await
        }
    }
}

/// Serve one adapter until stdin closes or a shutdown signal arrives, then
/// release its upstream session exactly once.
async fn serve<T: ToolSet>(tools: T) -> Result<()> {
    let dispatcher = Arc::new(Dispatcher::new(tools));
    let ct = CancellationToken::new();

    let outcome = tokio::select! {
        result = transport::serve_stdio(Arc::clone(&dispatcher), ct.clone()) => result,
        () = shutdown_signal() => {
            info!("shutdown signal received");
            ct.cancel();
            Ok(())
        }
    };

    dispatcher.close().await;
    info!("data-adapters shut down");
    outcome
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
