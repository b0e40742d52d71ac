//! The form page, built once at startup and served unchanged.

use tickerplot_core::TradingDate;

use crate::config::Config;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Immutable description of the form page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub heading: String,
    pub default_ticker: String,
    pub default_start: TradingDate,
    pub default_end: TradingDate,
}

impl Page {
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: String::from("Flattened Columns"),
            heading: String::from("Stock Data (Flattened Columns)"),
            default_ticker: config.default_ticker.clone(),
            default_start: config.default_start,
            default_end: config.default_end,
        }
    }

    pub fn render(&self) -> String {
        format!(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{plotly}"></script>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 24px; }}
        .field {{ margin-bottom: 20px; }}
        #error-message {{ color: red; margin-top: 20px; }}
    </style>
</head>
<body>
    <h1>{heading}</h1>
    <form id="chart-form">
        <div class="field">
            <label for="ticker-input">Enter Ticker: </label>
            <input id="ticker-input" name="ticker" type="text" value="{ticker}">
        </div>
        <div class="field">
            <label>Select Date Range: </label>
            <input id="start-date" name="start_date" type="date" value="{start}">
            <input id="end-date" name="end_date" type="date" value="{end}">
        </div>
        <button id="submit-button" type="submit">Submit</button>
    </form>
    <hr>
    <div id="stock-graph"></div>
    <div id="error-message"></div>
    <script>
        let clicks = 0;

        async function loadChart() {{
            const params = new URLSearchParams({{
                ticker: document.getElementById('ticker-input').value,
                start_date: document.getElementById('start-date').value,
                end_date: document.getElementById('end-date').value,
                n_clicks: clicks,
            }});
            const errorBox = document.getElementById('error-message');
            try {{
                const response = await fetch('/api/chart?' + params.toString());
                if (!response.ok) {{
                    throw new Error('server answered ' + response.status);
                }}
                const body = await response.json();
                Plotly.react('stock-graph', body.figure.data, body.figure.layout);
                errorBox.textContent = body.error;
            }} catch (err) {{
                errorBox.textContent = 'Request failed: ' + err.message;
            }}
        }}

        document.getElementById('chart-form').addEventListener('submit', (event) => {{
            event.preventDefault();
            clicks += 1;
            loadChart();
        }});

        window.addEventListener('load', loadChart);
    </script>
</body>
</html>"##,
            title = escape_html(&self.title),
            plotly = PLOTLY_JS,
            heading = escape_html(&self.heading),
            ticker = escape_html(&self.default_ticker),
            start = self.default_start,
            end = self.default_end,
        )
    }
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
