use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Which end of the requested date range a date error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Start,
    End,
}

impl DateBound {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }

    const fn article(self) -> &'static str {
        match self {
            Self::Start => "a",
            Self::End => "an",
        }
    }
}

impl Display for DateBound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input validation errors. The display text is shown to the user as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a ticker symbol.")]
    EmptyTicker,

    #[error("Please select {} {which} date.", .which.article())]
    MissingDate { which: DateBound },

    #[error("Invalid {which} date '{value}': expected YYYY-MM-DD.")]
    InvalidDate { which: DateBound, value: String },
}

/// Errors raised while building or reading an observation table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Column '{column}' not found.")]
    ColumnNotFound { column: String },

    #[error("column '{column}' has {actual} values but the index has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("column '{column}' is already present")]
    DuplicateColumn { column: String },
}

/// Outcome of a chart request that produced no chart.
///
/// The display text of every variant is the message shown next to the empty chart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to fetch data for {ticker}: {message}")]
    Fetch { ticker: String, message: String },

    #[error("No data returned for {ticker}.")]
    NoData { ticker: String },

    #[error(transparent)]
    Table(#[from] TableError),
}
