//! Data source adapters.
//!
//! | Adapter | Description |
//! |---------|-------------|
//! | [`YahooSource`] | Daily history from the Yahoo Finance chart API |
//! | [`FixtureSource`] | Canned in-memory outcome for offline tests |

mod fixture;
mod yahoo;

pub use fixture::FixtureSource;
pub use yahoo::{YahooSource, YAHOO_BASE_URL};
