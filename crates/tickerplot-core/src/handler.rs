//! The chart request handler.
//!
//! [`ChartHandler::handle`] turns one form submission into a [`ChartResponse`]: a figure
//! plus a user-facing error string, empty when nothing went wrong. Outcomes, first match
//! wins:
//!
//! | Condition | Figure | Error |
//! |-----------|--------|-------|
//! | blank ticker | empty | `Please enter a ticker symbol.` |
//! | missing or unparseable date | empty | date message |
//! | source failure | empty | `Failed to fetch data for {ticker}: ...` |
//! | no rows | empty | `No data returned for {ticker}.` |
//! | no `{ticker}_Close` column | empty | `Column '{ticker}_Close' not found.` |
//! | no `{ticker}_Volume` column | close line only | `Column '{ticker}_Volume' not found. Volume might be missing.` |
//! | otherwise | close line + volume bars | empty |

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::data_source::{DownloadRequest, MarketDataSource};
use crate::error::DateBound;
use crate::figure::{Axis, AxisSide, Figure, HoverMode, Layout, Legend, Series, Title, YAxis};
use crate::{ChartError, DateInput, Field, Ticker, TradingDate, ValidationError};

pub const CLOSE_LABEL: &str = "Close Price";
pub const VOLUME_LABEL: &str = "Volume";
pub const VOLUME_OPACITY: f64 = 0.4;

/// Raw values of one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartRequest {
    pub ticker: Option<String>,
    pub start_date: Option<DateInput>,
    pub end_date: Option<DateInput>,
}

impl ChartRequest {
    pub fn new(
        ticker: impl Into<String>,
        start_date: impl Into<DateInput>,
        end_date: impl Into<DateInput>,
    ) -> Self {
        Self {
            ticker: Some(ticker.into()),
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
        }
    }
}

/// Figure and error message rendered side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartResponse {
    pub figure: Figure,
    pub error: String,
}

impl ChartResponse {
    fn failed(error: &ChartError) -> Self {
        Self {
            figure: Figure::empty(),
            error: error.to_string(),
        }
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// Validated request, ready to be sent to a data source.
struct ResolvedRequest {
    ticker: Ticker,
    start: TradingDate,
    end: TradingDate,
}

fn resolve(request: &ChartRequest) -> Result<ResolvedRequest, ValidationError> {
    let ticker = Ticker::from_form(request.ticker.as_deref())?;
    let start = resolve_date(request.start_date.as_ref(), DateBound::Start)?;
    let end = resolve_date(request.end_date.as_ref(), DateBound::End)?;
    Ok(ResolvedRequest { ticker, start, end })
}

fn resolve_date(input: Option<&DateInput>, which: DateBound) -> Result<TradingDate, ValidationError> {
    input
        .ok_or(ValidationError::MissingDate { which })?
        .resolve(which)
}

/// Stateless handler shared by every submission.
#[derive(Clone)]
pub struct ChartHandler {
    source: Arc<dyn MarketDataSource>,
}

impl ChartHandler {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    pub async fn handle(&self, request: &ChartRequest) -> ChartResponse {
        debug!(
            ticker = request.ticker.as_deref().unwrap_or_default(),
            source = self.source.name(),
            "handling chart request"
        );

        match self.build(request).await {
            Ok(response) => {
                if response.has_error() {
                    warn!(error = %response.error, "chart built with warning");
                }
                response
            }
            Err(error) => {
                warn!(%error, "chart request failed");
                ChartResponse::failed(&error)
            }
        }
    }

    async fn build(&self, request: &ChartRequest) -> Result<ChartResponse, ChartError> {
        let ResolvedRequest { ticker, start, end } = resolve(request)?;

        let download = DownloadRequest::single(ticker.clone(), start, end);
        let table = self
            .source
            .download(&download)
            .await
            .map_err(|e| ChartError::Fetch {
                ticker: ticker.to_string(),
                message: e.message().to_owned(),
            })?;
        info!(%ticker, %start, %end, rows = table.len(), "downloaded observations");

        if table.is_empty() {
            return Err(ChartError::NoData {
                ticker: ticker.to_string(),
            });
        }

        let flat = table.flatten();
        let close_key = format!("{ticker}_{}", Field::Close);
        let volume_key = format!("{ticker}_{}", Field::Volume);

        let close = flat.column(&close_key)?;
        let mut figure = Figure::empty().with_series(Series::line(
            CLOSE_LABEL,
            flat.index().to_vec(),
            close.to_vec(),
        ));

        let mut error = String::new();
        match flat.column(&volume_key) {
            Ok(volume) => {
                figure = figure.with_series(
                    Series::bar(VOLUME_LABEL, flat.index().to_vec(), volume.to_vec())
                        .with_opacity(VOLUME_OPACITY)
                        .on_axis(YAxis::Secondary),
                );
            }
            Err(missing) => error = format!("{missing} Volume might be missing."),
        }

        let figure = figure.with_layout(price_volume_layout(&ticker, start, end));
        Ok(ChartResponse { figure, error })
    }
}

fn price_volume_layout(ticker: &Ticker, start: TradingDate, end: TradingDate) -> Layout {
    Layout {
        title: Some(Title::new(format!("{ticker} from {start} to {end}"))),
        xaxis: Some(Axis::titled("Date")),
        yaxis: Some(Axis::titled("Price")),
        yaxis2: Some(Axis::overlay("Volume", AxisSide::Right)),
        legend: Some(Legend { x: 0.0, y: 1.0 }),
        hovermode: Some(HoverMode::XUnified),
    }
}
