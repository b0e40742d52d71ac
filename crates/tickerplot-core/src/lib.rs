//! # Tickerplot Core
//!
//! Turns a ticker and a date range into a price/volume chart description.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Data source adapters (Yahoo chart API, in-memory fixture) |
//! | [`data_source`] | Data source trait and download request |
//! | [`domain`] | Ticker and date types |
//! | [`error`] | Validation, table and chart errors |
//! | [`figure`] | Chart description in plotly's JSON shape |
//! | [`handler`] | The chart request handler |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`table`] | Date-indexed observation tables and column flattening |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickerplot_core::{ChartHandler, ChartRequest, ReqwestHttpClient, YahooSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = YahooSource::new(Arc::new(ReqwestHttpClient::new()?));
//!     let handler = ChartHandler::new(Arc::new(source));
//!
//!     let response = handler
//!         .handle(&ChartRequest::new("AAPL", "2020-01-01", "2020-02-01"))
//!         .await;
//!     println!("{}", serde_json::to_string(&response)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Web form       │
//! └────────┬────────┘
//!          │ ChartRequest
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  ChartHandler   │────▶│ MarketDataSource │──▶ HttpClient
//! └────────┬────────┘     └──────────────────┘
//!          │ ObservationTable → FlatTable
//!          ▼
//! ┌─────────────────┐
//! │ Figure + error  │
//! └─────────────────┘
//! ```

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod figure;
pub mod handler;
pub mod http_client;
pub mod table;

pub use adapters::{FixtureSource, YahooSource};

pub use data_source::{DownloadRequest, MarketDataSource, SourceError, SourceErrorKind};

pub use domain::{DateInput, Ticker, TradingDate};

pub use error::{ChartError, DateBound, TableError, ValidationError};

pub use figure::{Axis, AxisSide, Figure, HoverMode, Layout, Legend, Series, SeriesKind, Title, YAxis};

pub use handler::{ChartHandler, ChartRequest, ChartResponse};

pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

pub use table::{ColumnKey, Field, FlatTable, GroupBy, ObservationTable};
