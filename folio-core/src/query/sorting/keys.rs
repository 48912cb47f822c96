//! Sort key values extracted from in-memory rows
//!
//! Missing values always sort after present ones, whichever direction is
//! requested.

use super::expression::SortOrder;
use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use std::cmp::Ordering;

/// Comparable value of one sortable field
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SortValue {
    Missing,
    Bool(bool),
    Integer(i64),
    Float(OrderedFloat<f64>),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl SortValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, SortValue::Missing)
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Bool(_) => 0,
            SortValue::Integer(_) => 1,
            SortValue::Float(_) => 2,
            SortValue::Text(_) => 3,
            SortValue::Timestamp(_) => 4,
            SortValue::Missing => 5,
        }
    }

    /// Compare two keys in the requested direction, keeping missing values last
    pub fn compare_with_order(&self, other: &Self, order: SortOrder) -> Ordering {
        match (self.is_missing(), other.is_missing()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                if order.is_descending() {
                    other.cmp(self)
                } else {
                    self.cmp(other)
                }
            }
        }
    }
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Bool(a), SortValue::Bool(b)) => a.cmp(b),
            (SortValue::Integer(a), SortValue::Integer(b)) => a.cmp(b),
            (SortValue::Float(a), SortValue::Float(b)) => a.cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Timestamp(a), SortValue::Timestamp(b)) => a.cmp(b),
            // Heterogeneous keys for one field still need a total order
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<bool> for SortValue {
    fn from(value: bool) -> Self {
        SortValue::Bool(value)
    }
}

impl From<i64> for SortValue {
    fn from(value: i64) -> Self {
        SortValue::Integer(value)
    }
}

impl From<i32> for SortValue {
    fn from(value: i32) -> Self {
        SortValue::Integer(value.into())
    }
}

impl From<u32> for SortValue {
    fn from(value: u32) -> Self {
        SortValue::Integer(value.into())
    }
}

impl From<f64> for SortValue {
    fn from(value: f64) -> Self {
        SortValue::Float(OrderedFloat(value))
    }
}

impl From<f32> for SortValue {
    fn from(value: f32) -> Self {
        SortValue::Float(OrderedFloat(value.into()))
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        SortValue::Text(value.to_owned())
    }
}

impl From<String> for SortValue {
    fn from(value: String) -> Self {
        SortValue::Text(value)
    }
}

impl From<DateTime<Utc>> for SortValue {
    fn from(value: DateTime<Utc>) -> Self {
        SortValue::Timestamp(value)
    }
}

impl<T: Into<SortValue>> From<Option<T>> for SortValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SortValue::Missing, Into::into)
    }
}
