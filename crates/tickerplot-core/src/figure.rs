//! Declarative chart description serialized in plotly's figure JSON shape.
//!
//! The browser hands the serialized [`Figure`] straight to `Plotly.react`; nothing here
//! renders anything.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::TradingDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Line,
    Bar,
}

/// Vertical axis a series is plotted against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum YAxis {
    #[default]
    Primary,
    Secondary,
}

/// One trace of the figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub kind: SeriesKind,
    pub name: String,
    pub x: Vec<TradingDate>,
    pub y: Vec<f64>,
    pub axis: YAxis,
    pub opacity: Option<f64>,
}

impl Series {
    pub fn line(name: impl Into<String>, x: Vec<TradingDate>, y: Vec<f64>) -> Self {
        Self {
            kind: SeriesKind::Line,
            name: name.into(),
            x,
            y,
            axis: YAxis::Primary,
            opacity: None,
        }
    }

    pub fn bar(name: impl Into<String>, x: Vec<TradingDate>, y: Vec<f64>) -> Self {
        Self {
            kind: SeriesKind::Bar,
            ..Self::line(name, x, y)
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn on_axis(mut self, axis: YAxis) -> Self {
        self.axis = axis;
        self
    }
}

impl Serialize for Series {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        match self.kind {
            SeriesKind::Line => {
                map.serialize_entry("type", "scatter")?;
                map.serialize_entry("mode", "lines")?;
            }
            SeriesKind::Bar => map.serialize_entry("type", "bar")?,
        }
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("x", &self.x)?;
        map.serialize_entry("y", &self.y)?;
        if let Some(opacity) = self.opacity {
            map.serialize_entry("opacity", &opacity)?;
        }
        if self.axis == YAxis::Secondary {
            map.serialize_entry("yaxis", "y2")?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<AxisSide>,
}

impl Axis {
    pub fn titled(text: impl Into<String>) -> Self {
        Self {
            title: Title::new(text),
            overlaying: None,
            side: None,
        }
    }

    /// Axis drawn over the primary y axis on the given side.
    pub fn overlay(text: impl Into<String>, side: AxisSide) -> Self {
        Self {
            overlaying: Some(String::from("y")),
            side: Some(side),
            ..Self::titled(text)
        }
    }
}

/// Legend anchor in paper coordinates (0,1 is the top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Legend {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HoverMode {
    #[serde(rename = "x unified")]
    XUnified,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis2: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<HoverMode>,
}

/// Complete chart description: ordered traces plus layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    data: Vec<Series>,
    layout: Layout,
}

impl Figure {
    /// Figure with no traces and default layout.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.data.push(series);
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn series(&self) -> &[Series] {
        &self.data
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
