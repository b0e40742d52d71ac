//! # Domain Types
//!
//! Request-side types shared by the chart handler and the data sources.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Trimmed, non-empty ticker text |
//! | [`DateInput`] | A date as typed by the user or as an already-parsed value |
//! | [`TradingDate`] | Canonical calendar date (`YYYY-MM-DD`) |

mod date;
mod ticker;

pub use date::{DateInput, TradingDate};
pub use ticker::Ticker;
