//! Filter types for gateway queries.

use serde::{Deserialize, Serialize};

/// Filter comparison operator supported by every gateway backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// List membership (`field ∈ set`).
    In,
    /// Null check.
    IsNull,
}

/// A dynamic filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value. Compared against the textual form of the column.
    String(String),
    /// A list of string values (for the `In` operator).
    StringList(Vec<String>),
    /// No value (for `IsNull`).
    Null,
}

/// A single filter condition on a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The column or field name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for an equality filter on a textual value.
    pub fn eq(field: impl Into<String>, value: impl ToString) -> Self {
        Self::new(field, FilterOp::Eq, FilterValue::String(value.to_string()))
    }

    /// Shorthand for an `IN` filter.
    pub fn is_in<I, T>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let values = values.into_iter().map(|v| v.to_string()).collect();
        Self::new(field, FilterOp::In, FilterValue::StringList(values))
    }

    /// Shorthand for an `IS NULL` filter.
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOp::IsNull, FilterValue::Null)
    }
}
