//! In-memory query source
//!
//! Rows live behind an `Arc<[T]>` so a source can be cloned cheaply and
//! reused across requests. Ordering is a stable sort over precomputed keys;
//! rows that tie on every term keep their insertion order.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::query::sorting::{SortExpression, SortOrder, SortValue, Sortable};
use crate::query::source::{QuerySource, Window};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemorySourceError {
    #[error("Unknown sort field `{field}` (sortable fields: {available})")]
    UnknownSortField { field: String, available: String },
}

#[derive(Debug)]
pub struct MemorySource<T> {
    rows: Arc<[T]>,
    sorting: Option<SortExpression>,
    window: Window,
}

impl<T> MemorySource<T> {
    pub fn new(rows: impl Into<Arc<[T]>>) -> Self {
        Self {
            rows: rows.into(),
            sorting: None,
            window: Window::default(),
        }
    }

    /// Rows in insertion order, ignoring any composed ordering or window
    pub fn rows(&self) -> &[T] {
        &self.rows
    }
}

impl<T> Clone for MemorySource<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            sorting: self.sorting.clone(),
            window: self.window,
        }
    }
}

impl<T: Sortable> MemorySource<T> {
    fn resolve_terms(
        sorting: &SortExpression,
    ) -> Result<Vec<(&'static str, SortOrder)>, MemorySourceError> {
        sorting
            .terms()
            .iter()
            .map(|term| {
                T::resolve_field(&term.field)
                    .map(|field| (field, term.order))
                    .ok_or_else(|| MemorySourceError::UnknownSortField {
                        field: term.field.clone(),
                        available: T::SORT_FIELDS.join(", "),
                    })
            })
            .collect()
    }

    /// Row indices in evaluation order
    fn ordered_indices(&self) -> Result<Vec<usize>, MemorySourceError> {
        let Some(sorting) = self.sorting.as_ref().filter(|s| !s.is_empty())
        else {
            return Ok((0..self.rows.len()).collect());
        };

        let terms = Self::resolve_terms(sorting)?;

        let mut keyed: Vec<(Vec<SortValue>, usize)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let keys = terms
                    .iter()
                    .map(|(field, _)| row.sort_key(field))
                    .collect();
                (keys, idx)
            })
            .collect();

        keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, &terms));

        Ok(keyed.into_iter().map(|(_, idx)| idx).collect())
    }
}

fn compare_keys(
    a: &[SortValue],
    b: &[SortValue],
    terms: &[(&'static str, SortOrder)],
) -> Ordering {
    a.iter()
        .zip(b)
        .zip(terms)
        .map(|((left, right), (_, order))| left.compare_with_order(right, *order))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[async_trait]
impl<T> QuerySource for MemorySource<T>
where
    T: Sortable + Clone + Send + Sync,
{
    type Item = T;
    type Error = MemorySourceError;

    async fn count(&self) -> Result<u64, Self::Error> {
        Ok(self.window.apply_len(self.rows.len()) as u64)
    }

    fn order_by(mut self, sorting: &SortExpression) -> Self {
        self.sorting = Some(sorting.clone());
        self
    }

    fn skip(mut self, count: usize) -> Self {
        self.window = self.window.skip(count);
        self
    }

    fn take(mut self, count: usize) -> Self {
        self.window = self.window.take(count);
        self
    }

    async fn fetch(self) -> Result<Vec<T>, Self::Error> {
        let indices = self.ordered_indices()?;

        Ok(indices
            .into_iter()
            .skip(self.window.offset)
            .take(self.window.limit.unwrap_or(usize::MAX))
            .map(|idx| self.rows[idx].clone())
            .collect())
    }
}
