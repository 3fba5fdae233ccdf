//! Facet filter composer.
//!
//! A serializable scoping configuration restricting which rows an
//! operation touches. Each facet names a column; compilation resolves
//! names once against the column model and composes every facet
//! predicate with logical AND.

use ordered_float::OrderedFloat;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellValue};
use crate::column::ColumnModel;
use crate::error::EngineError;
use crate::row::Row;
use crate::rowfn::{Conjunction, RowPredicate};

// ---------------------------------------------------------------------------
// Normalized keys
// ---------------------------------------------------------------------------

/// Typed key for value comparison, derived from a cell's raw value.
/// Text is trimmed + lowercased; numbers compare exactly via ordered
/// floats; absent and empty cells both read as blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FacetKey {
    Blank,
    Number(OrderedFloat<f64>),
    Text(String),
}

impl FacetKey {
    pub fn from_cell(cell: Option<&Cell>) -> Self {
        match cell.map(|c| &c.value) {
            None | Some(CellValue::Empty) => FacetKey::Blank,
            Some(CellValue::Number(n)) => FacetKey::Number(OrderedFloat(*n)),
            Some(CellValue::Text(s)) => FacetKey::Text(s.trim().to_lowercase()),
        }
    }

    /// Key for a configured selection value: numeric strings select
    /// number cells, anything else selects text.
    pub fn from_config_value(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return FacetKey::Blank;
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            return FacetKey::Number(OrderedFloat(n));
        }
        FacetKey::Text(trimmed.to_lowercase())
    }
}

// ---------------------------------------------------------------------------
// Facet configuration
// ---------------------------------------------------------------------------

/// Text facet mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Equals,
    NotEquals,
}

impl TextMode {
    fn matches(self, haystack: &str, needle: &str) -> bool {
        match self {
            TextMode::Contains => haystack.contains(needle),
            TextMode::NotContains => !haystack.contains(needle),
            TextMode::StartsWith => haystack.starts_with(needle),
            TextMode::EndsWith => haystack.ends_with(needle),
            TextMode::Equals => haystack == needle,
            TextMode::NotEquals => haystack != needle,
        }
    }
}

/// One scoping constraint over a named column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FacetConfig {
    /// Include rows whose cell matches one of the selected values.
    /// An empty selection leaves the facet inactive (all rows pass).
    ValueSelection {
        column: String,
        #[serde(default)]
        values: Vec<String>,
        #[serde(default)]
        include_blank: bool,
    },
    /// Text predicate; non-text cells never pass.
    Text {
        column: String,
        mode: TextMode,
        query: String,
        #[serde(default)]
        case_sensitive: bool,
    },
    /// Inclusive numeric range; non-number cells never pass.
    NumericRange {
        column: String,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
}

impl FacetConfig {
    pub fn column(&self) -> &str {
        match self {
            Self::ValueSelection { column, .. }
            | Self::Text { column, .. }
            | Self::NumericRange { column, .. } => column,
        }
    }

    fn compile(&self, columns: &ColumnModel) -> Result<Box<dyn RowPredicate>, EngineError> {
        let index = columns.require(self.column())?;
        match self {
            Self::ValueSelection {
                values,
                include_blank,
                ..
            } => {
                if values.is_empty() && !include_blank {
                    return Ok(Box::new(crate::rowfn::AllRows));
                }
                let mut selected: FxHashSet<FacetKey> =
                    values.iter().map(|v| FacetKey::from_config_value(v)).collect();
                if *include_blank {
                    selected.insert(FacetKey::Blank);
                }
                Ok(Box::new(ValueSelectionPredicate { index, selected }))
            }
            Self::Text {
                mode,
                query,
                case_sensitive,
                ..
            } => Ok(Box::new(TextPredicate {
                index,
                mode: *mode,
                query: query.clone(),
                case_sensitive: *case_sensitive,
            })),
            Self::NumericRange { min, max, .. } => Ok(Box::new(RangePredicate {
                index,
                min: *min,
                max: *max,
            })),
        }
    }
}

/// The serializable scoping configuration an operation carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub facets: Vec<FacetConfig>,
}

impl EngineConfig {
    /// Select every row.
    pub fn all_rows() -> Self {
        Self::default()
    }

    /// Resolve facet columns and compose the combined row predicate.
    /// Fails on any unknown column before a single row is read.
    pub fn compile(&self, columns: &ColumnModel) -> Result<Conjunction, EngineError> {
        let parts = self
            .facets
            .iter()
            .map(|facet| facet.compile(columns))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Conjunction::new(parts))
    }
}

// ---------------------------------------------------------------------------
// Compiled predicates
// ---------------------------------------------------------------------------

struct ValueSelectionPredicate {
    index: usize,
    selected: FxHashSet<FacetKey>,
}

impl RowPredicate for ValueSelectionPredicate {
    fn test(&self, _row_id: u64, row: &Row) -> bool {
        self.selected.contains(&FacetKey::from_cell(row.cell(self.index)))
    }
}

struct TextPredicate {
    index: usize,
    mode: TextMode,
    query: String,
    case_sensitive: bool,
}

impl RowPredicate for TextPredicate {
    fn test(&self, _row_id: u64, row: &Row) -> bool {
        let Some(Cell {
            value: CellValue::Text(text),
            ..
        }) = row.cell(self.index)
        else {
            return false;
        };
        if self.case_sensitive {
            self.mode.matches(text, &self.query)
        } else {
            self.mode
                .matches(&text.to_lowercase(), &self.query.to_lowercase())
        }
    }
}

struct RangePredicate {
    index: usize,
    min: Option<f64>,
    max: Option<f64>,
}

impl RowPredicate for RangePredicate {
    fn test(&self, _row_id: u64, row: &Row) -> bool {
        let Some(Cell {
            value: CellValue::Number(n),
            ..
        }) = row.cell(self.index)
        else {
            return false;
        };
        self.min.map_or(true, |min| *n >= min) && self.max.map_or(true, |max| *n <= max)
    }
}
