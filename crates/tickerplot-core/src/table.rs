//! Observation tables returned by data sources.
//!
//! A source returns an [`ObservationTable`]: rows indexed by trading date and columns
//! addressed by a two-level label made of a symbol and a [`Field`]. The chart handler
//! flattens the labels into single string keys with [`ObservationTable::flatten`] and reads
//! columns from the resulting [`FlatTable`].

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{TableError, TradingDate};

/// Per-day observation fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    #[serde(rename = "Adj Close")]
    AdjClose,
    Volume,
}

impl Field {
    pub const ALL: [Self; 6] = [
        Self::Open,
        Self::High,
        Self::Low,
        Self::Close,
        Self::AdjClose,
        Self::Volume,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::AdjClose => "Adj Close",
            Self::Volume => "Volume",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order of the two column label levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// Labels are `(symbol, field)`.
    #[default]
    Ticker,
    /// Labels are `(field, symbol)`.
    Column,
}

/// Two-level column address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnKey {
    pub symbol: String,
    pub field: Field,
}

impl ColumnKey {
    pub fn new(symbol: impl Into<String>, field: Field) -> Self {
        Self {
            symbol: symbol.into(),
            field,
        }
    }

    /// Label levels in the order dictated by `group_by`.
    pub fn levels(&self, group_by: GroupBy) -> (&str, &str) {
        match group_by {
            GroupBy::Ticker => (self.symbol.as_str(), self.field.as_str()),
            GroupBy::Column => (self.field.as_str(), self.symbol.as_str()),
        }
    }

    /// Single string key: the two levels joined with `_`.
    pub fn flattened(&self, group_by: GroupBy) -> String {
        let (outer, inner) = self.levels(group_by);
        format!("{outer}_{inner}")
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Column {
    key: ColumnKey,
    values: Vec<f64>,
}

/// Date-indexed table with two-level column labels.
///
/// Missing observations inside a column are stored as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationTable {
    group_by: GroupBy,
    index: Vec<TradingDate>,
    columns: Vec<Column>,
}

impl ObservationTable {
    pub fn new(group_by: GroupBy, index: Vec<TradingDate>) -> Self {
        Self {
            group_by,
            index,
            columns: Vec::new(),
        }
    }

    pub fn empty(group_by: GroupBy) -> Self {
        Self::new(group_by, Vec::new())
    }

    pub fn insert_column(&mut self, key: ColumnKey, values: Vec<f64>) -> Result<(), TableError> {
        if values.len() != self.index.len() {
            return Err(TableError::LengthMismatch {
                column: key.flattened(self.group_by),
                expected: self.index.len(),
                actual: values.len(),
            });
        }
        if self.columns.iter().any(|column| column.key == key) {
            return Err(TableError::DuplicateColumn {
                column: key.flattened(self.group_by),
            });
        }

        self.columns.push(Column { key, values });
        Ok(())
    }

    pub fn with_column(mut self, key: ColumnKey, values: Vec<f64>) -> Result<Self, TableError> {
        self.insert_column(key, values)?;
        Ok(self)
    }

    pub const fn group_by(&self) -> GroupBy {
        self.group_by
    }

    pub fn index(&self) -> &[TradingDate] {
        &self.index
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column_keys(&self) -> impl Iterator<Item = &ColumnKey> {
        self.columns.iter().map(|column| &column.key)
    }

    /// Replace every two-level label with its `_`-joined string key.
    ///
    /// Row order and column order are preserved.
    pub fn flatten(self) -> FlatTable {
        let group_by = self.group_by;
        let columns = self
            .columns
            .into_iter()
            .map(|column| FlatColumn {
                name: column.key.flattened(group_by),
                values: column.values,
            })
            .collect();

        FlatTable {
            index: self.index,
            columns,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct FlatColumn {
    name: String,
    values: Vec<f64>,
}

/// Table whose columns are addressed by a single string key such as `AAPL_Close`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTable {
    index: Vec<TradingDate>,
    columns: Vec<FlatColumn>,
}

impl FlatTable {
    pub fn index(&self) -> &[TradingDate] {
        &self.index
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column.name == name)
    }

    pub fn column(&self, name: &str) -> Result<&[f64], TableError> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .map(|column| column.values.as_slice())
            .ok_or_else(|| TableError::ColumnNotFound {
                column: name.to_owned(),
            })
    }
}
