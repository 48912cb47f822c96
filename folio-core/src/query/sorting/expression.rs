//! Textual sort expressions
//!
//! Grammar: comma-separated terms, each a field name optionally followed by a
//! direction (`asc`, `ascending`, `desc`, `descending`; case-insensitive).
//! Whether a field exists is left to the source that evaluates it.

use crate::error::{FilterError, FilterResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn is_descending(self) -> bool {
        matches!(self, SortOrder::Descending)
    }

    /// SQL keyword for this direction
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }

    fn parse_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortOrder::Ascending),
            "desc" | "descending" => Some(SortOrder::Descending),
            _ => None,
        }
    }
}

/// One `field [direction]` entry of a sort expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortTerm {
    pub field: String,
    pub order: SortOrder,
}

impl SortTerm {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Descending)
    }
}

impl fmt::Display for SortTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.order.as_sql())
    }
}

/// Ordered list of sort terms; earlier terms take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SortExpression {
    terms: Vec<SortTerm>,
}

impl SortExpression {
    pub fn new(terms: Vec<SortTerm>) -> Self {
        Self { terms }
    }

    /// Single-field ascending expression
    pub fn by(field: impl Into<String>) -> Self {
        Self::new(vec![SortTerm::ascending(field)])
    }

    /// Append a lower-precedence term
    pub fn then(mut self, term: SortTerm) -> Self {
        self.terms.push(term);
        self
    }

    /// Parse caller input. Blank input means "no ordering" and yields `None`.
    pub fn parse(raw: &str) -> FilterResult<Option<Self>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let mut terms = Vec::new();
        for chunk in trimmed.split(',') {
            let mut tokens = chunk.split_whitespace();
            let field = tokens.next().ok_or_else(|| {
                FilterError::InvalidSortExpression(format!(
                    "empty term in `{}`",
                    trimmed
                ))
            })?;

            let order = match tokens.next() {
                None => SortOrder::Ascending,
                Some(token) => SortOrder::parse_token(token).ok_or_else(|| {
                    FilterError::InvalidSortExpression(format!(
                        "unknown direction `{}` for field `{}`",
                        token, field
                    ))
                })?,
            };

            if let Some(extra) = tokens.next() {
                return Err(FilterError::InvalidSortExpression(format!(
                    "unexpected token `{}` after `{}`",
                    extra,
                    chunk.trim()
                )));
            }

            terms.push(SortTerm::new(field, order));
        }

        Ok(Some(Self { terms }))
    }

    pub fn terms(&self) -> &[SortTerm] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl FromStr for SortExpression {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)?.ok_or_else(|| {
            FilterError::InvalidSortExpression("expression is empty".into())
        })
    }
}

impl TryFrom<String> for SortExpression {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self::parse(&value)?.unwrap_or_default())
    }
}

impl From<SortExpression> for String {
    fn from(value: SortExpression) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SortExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, term) in self.terms.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}
