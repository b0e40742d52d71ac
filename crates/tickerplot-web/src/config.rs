//! Command-line and environment configuration.
//!
//! | Option | Env | Default | Description |
//! |--------|-----|---------|-------------|
//! | `--host` | `TICKERPLOT_HOST` | `127.0.0.1` | Interface to listen on |
//! | `--port` | `TICKERPLOT_PORT` | `8050` | Port to listen on |
//! | `--timeout-ms` | `TICKERPLOT_TIMEOUT_MS` | `10000` | Upstream request timeout |
//! | `--yahoo-url` | `TICKERPLOT_YAHOO_URL` | Yahoo chart host | Data source base URL |
//! | `--default-ticker` | `TICKERPLOT_DEFAULT_TICKER` | `AAPL` | Ticker pre-filled in the form |
//! | `--default-start` | `TICKERPLOT_DEFAULT_START` | `2020-01-01` | Start date pre-filled in the form |
//! | `--default-end` | `TICKERPLOT_DEFAULT_END` | `2020-02-01` | End date pre-filled in the form |

use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use tickerplot_core::adapters::YAHOO_BASE_URL;
use tickerplot_core::http_client::DEFAULT_TIMEOUT_MS;
use tickerplot_core::TradingDate;

/// Plot a ticker's closing price and volume in the browser.
#[derive(Debug, Clone, Parser)]
#[command(name = "tickerplot", version, about)]
pub struct Config {
    /// Interface to listen on.
    #[arg(long, env = "TICKERPLOT_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "TICKERPLOT_PORT", default_value_t = 8050)]
    pub port: u16,

    /// Upstream request timeout in milliseconds.
    #[arg(long, env = "TICKERPLOT_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Base URL of the Yahoo chart API.
    #[arg(long, env = "TICKERPLOT_YAHOO_URL", default_value = YAHOO_BASE_URL)]
    pub yahoo_url: String,

    /// Ticker pre-filled in the form.
    #[arg(long, env = "TICKERPLOT_DEFAULT_TICKER", default_value = "AAPL")]
    pub default_ticker: String,

    /// Start date pre-filled in the form (YYYY-MM-DD).
    #[arg(long, env = "TICKERPLOT_DEFAULT_START", default_value = "2020-01-01", value_parser = parse_date)]
    pub default_start: TradingDate,

    /// End date pre-filled in the form (YYYY-MM-DD).
    #[arg(long, env = "TICKERPLOT_DEFAULT_END", default_value = "2020-02-01", value_parser = parse_date)]
    pub default_end: TradingDate,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_date(value: &str) -> Result<TradingDate, String> {
    TradingDate::parse(value).map_err(|_| format!("'{value}' is not a YYYY-MM-DD date"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_prefill_the_form() {
        let config = Config::try_parse_from(["tickerplot"]).expect("defaults parse");

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8050");
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.default_ticker, "AAPL");
        assert_eq!(config.default_start.to_string(), "2020-01-01");
        assert_eq!(config.default_end.to_string(), "2020-02-01");
    }

    #[test]
    fn rejects_malformed_default_date() {
        let result = Config::try_parse_from(["tickerplot", "--default-start", "2020/01/01"]);
        assert!(result.is_err());
    }

    #[test]
    fn overrides_listen_address() {
        let config = Config::try_parse_from(["tickerplot", "--host", "0.0.0.0", "--port", "9000"])
            .expect("flags parse");
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:9000");
    }
}
