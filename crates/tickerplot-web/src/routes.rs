use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tickerplot_core::{ChartHandler, ChartRequest, ChartResponse, DateInput};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::page::Page;

/// Shared, read-only server state.
pub struct AppState {
    index_html: String,
    handler: ChartHandler,
}

impl AppState {
    pub fn new(page: &Page, handler: ChartHandler) -> Self {
        Self {
            index_html: page.render(),
            handler,
        }
    }
}

/// Form values sent by the page on load and on every submit.
#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    ticker: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    /// Submit counter; only used to trigger a request, so any text is accepted.
    n_clicks: Option<String>,
}

impl ChartQuery {
    fn into_request(self) -> ChartRequest {
        ChartRequest {
            ticker: self.ticker,
            start_date: DateInput::from_form(self.start_date.as_deref()),
            end_date: DateInput::from_form(self.end_date.as_deref()),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/api/chart", get(chart))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.index_html.clone())
}

async fn chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChartQuery>,
) -> Json<ChartResponse> {
    debug!(
        n_clicks = query.n_clicks.as_deref().unwrap_or_default(),
        "chart submission"
    );
    let response = state.handler.handle(&query.into_request()).await;
    Json(response)
}

async fn health() -> &'static str {
    "ok"
}
