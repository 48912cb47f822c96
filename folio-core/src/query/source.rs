use async_trait::async_trait;

use crate::query::sorting::SortExpression;

/// Unevaluated, composable query over a backing collection.
///
/// `order_by`, `skip` and `take` only describe the query; they never touch
/// the backing store. `count` and `fetch` are the only evaluating calls.
///
/// Ordering is always evaluated before the offset/limit window, whatever order
/// the composition methods were called in, and a later `order_by` replaces an
/// earlier one.
#[async_trait]
pub trait QuerySource: Send + Sync + Sized {
    type Item: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Number of rows the query currently describes
    async fn count(&self) -> Result<u64, Self::Error>;

    fn order_by(self, sorting: &SortExpression) -> Self;

    fn skip(self, count: usize) -> Self;

    fn take(self, count: usize) -> Self;

    /// Evaluate the query and materialize its rows
    async fn fetch(self) -> Result<Vec<Self::Item>, Self::Error>;
}

/// Offset/limit window accumulated by `skip` and `take` calls.
///
/// Follows sequence semantics: `skip(a).skip(b)` skips `a + b`, `take(a)`
/// after `take(b)` keeps `min(a, b)`, and a `skip` after a `take` eats into
/// the taken rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Window {
    pub fn skip(self, count: usize) -> Self {
        Self {
            offset: self.offset.saturating_add(count),
            limit: self.limit.map(|limit| limit.saturating_sub(count)),
        }
    }

    pub fn take(self, count: usize) -> Self {
        Self {
            offset: self.offset,
            limit: Some(self.limit.map_or(count, |limit| limit.min(count))),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.offset == 0 && self.limit.is_none()
    }

    /// Number of rows left from `len` once the window is applied
    pub fn apply_len(&self, len: usize) -> usize {
        let remaining = len.saturating_sub(self.offset);
        self.limit.map_or(remaining, |limit| remaining.min(limit))
    }
}
