//! Data source contract and request types.
//!
//! A [`MarketDataSource`] downloads daily observations for a date span and returns them as
//! an [`ObservationTable`]. An empty table (zero rows) means the source has no data for the
//! request; it is not an error.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{GroupBy, ObservationTable, Ticker, TradingDate};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    InvalidResponse,
    InvalidRequest,
}

/// Structured error returned by a data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidResponse,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidResponse => "source.invalid_response",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Download request: symbols over the half-open span `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub symbols: Vec<Ticker>,
    pub start: TradingDate,
    pub end: TradingDate,
    pub group_by: GroupBy,
}

impl DownloadRequest {
    pub fn new(
        symbols: Vec<Ticker>,
        start: TradingDate,
        end: TradingDate,
        group_by: GroupBy,
    ) -> Result<Self, SourceError> {
        if symbols.is_empty() {
            return Err(SourceError::invalid_request(
                "download request must include at least one symbol",
            ));
        }
        Ok(Self {
            symbols,
            start,
            end,
            group_by,
        })
    }

    /// Daily history for one symbol, columns grouped by ticker.
    pub fn single(symbol: Ticker, start: TradingDate, end: TradingDate) -> Self {
        Self {
            symbols: vec![symbol],
            start,
            end,
            group_by: GroupBy::Ticker,
        }
    }
}

/// Market data download contract.
///
/// Implementations must be `Send + Sync`; the web server shares one instance across
/// requests.
pub trait MarketDataSource: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    /// Download daily observations.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the provider cannot be reached or its payload cannot be
    /// interpreted. A symbol or span without data yields an empty table instead.
    fn download<'a>(
        &'a self,
        req: &'a DownloadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ObservationTable, SourceError>> + Send + 'a>>;
}
