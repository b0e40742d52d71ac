mod config;
mod error;
mod page;
mod routes;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tickerplot_core::{ChartHandler, ReqwestHttpClient, YahooSource};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::WebError;
use crate::page::Page;
use crate::routes::AppState;

const DEFAULT_LOG_FILTER: &str = "tickerplot=info,tickerplot_core=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    init_logging();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "tickerplot stopped");
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

async fn run(config: Config) -> Result<(), WebError> {
    let http_client = Arc::new(ReqwestHttpClient::new()?);
    let source = YahooSource::new(http_client)
        .with_base_url(config.yahoo_url.as_str())
        .with_timeout_ms(config.timeout_ms);
    let handler = ChartHandler::new(Arc::new(source));

    let page = Page::from_config(&config);
    let app = routes::router(Arc::new(AppState::new(&page, handler)));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| WebError::Bind { addr, source })?;

    info!(%addr, timeout_ms = config.timeout_ms, "tickerplot listening");
    info!("open http://{addr}/ in your browser");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(WebError::Serve)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        Err(err) => {
            // Without a signal handler the server runs until the process is killed.
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    }
}
