use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use crate::data_source::{DownloadRequest, MarketDataSource, SourceError};
use crate::ObservationTable;

/// In-memory source returning a canned outcome; records every request it receives.
///
/// Used for deterministic offline tests of code that talks to a [`MarketDataSource`].
#[derive(Debug)]
pub struct FixtureSource {
    outcome: Result<ObservationTable, SourceError>,
    requests: Mutex<Vec<DownloadRequest>>,
}

impl FixtureSource {
    pub fn returning(table: ObservationTable) -> Self {
        Self {
            outcome: Ok(table),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: SourceError) -> Self {
        Self {
            outcome: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<DownloadRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests().len()
    }
}

impl MarketDataSource for FixtureSource {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn download<'a>(
        &'a self,
        req: &'a DownloadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ObservationTable, SourceError>> + Send + 'a>> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(req.clone());
        let outcome = self.outcome.clone();
        Box::pin(async move { outcome })
    }
}
