use crate::error::{FilterError, FilterResult};
use crate::query::sorting::SortExpression;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validated paging request: optional ordering, then skip, then take.
///
/// Counts are unsigned, so a `PagedFilter` can never describe a negative
/// window. Signed input from the outside world goes through
/// [`PagedFilter::try_from_request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PagedFilter {
    pub sorting: Option<SortExpression>,
    pub skip_count: usize,
    pub max_result_count: usize,
}

impl PagedFilter {
    pub fn new(skip_count: usize, max_result_count: usize) -> Self {
        Self {
            sorting: None,
            skip_count,
            max_result_count,
        }
    }

    /// Ordering that will actually be applied, ignoring empty expressions.
    pub fn effective_sorting(&self) -> Option<&SortExpression> {
        self.sorting.as_ref().filter(|sorting| !sorting.is_empty())
    }

    /// Validate a raw caller request against `limits`.
    ///
    /// Negative counts and oversized pages are rejected, never clamped. A
    /// missing `max_result_count` falls back to the configured default.
    pub fn try_from_request(
        request: &PagedFilterRequest,
        limits: &FilterLimits,
    ) -> FilterResult<Self> {
        let skip_count = match request.skip_count {
            None => 0,
            Some(value) => usize::try_from(value)
                .map_err(|_| FilterError::NegativeSkipCount(value))?,
        };

        let max_result_count = match request.max_result_count {
            None => limits.default_max_result_count,
            Some(value) => usize::try_from(value)
                .map_err(|_| FilterError::NegativeMaxResultCount(value))?,
        };

        if max_result_count > limits.max_max_result_count {
            debug!(
                "Rejecting page request: max_result_count={} > limit={}",
                max_result_count, limits.max_max_result_count
            );
            return Err(FilterError::MaxResultCountExceeded {
                requested: max_result_count,
                max: limits.max_max_result_count,
            });
        }

        let sorting = match request.sorting.as_deref() {
            Some(raw) => SortExpression::parse(raw)?,
            None => None,
        };

        Ok(Self {
            sorting,
            skip_count,
            max_result_count,
        })
    }
}

/// Unvalidated paging request as it arrives from a caller (query string,
/// JSON body, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PagedFilterRequest {
    pub sorting: Option<String>,
    pub skip_count: Option<i64>,
    pub max_result_count: Option<i64>,
}

/// Page size policy applied to incoming requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterLimits {
    /// Page size used when a request does not ask for one
    pub default_max_result_count: usize,

    /// Largest page size a request may ask for
    pub max_max_result_count: usize,
}

impl Default for FilterLimits {
    fn default() -> Self {
        Self {
            default_max_result_count: 10,
            max_max_result_count: 1000,
        }
    }
}

/// One materialized page plus the size of the unpaged result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub total_count: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(total_count: u64, items: Vec<T>) -> Self {
        Self { total_count, items }
    }

    pub fn empty(total_count: u64) -> Self {
        Self::new(total_count, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether rows exist past this page, given the filter that produced it.
    pub fn has_more(&self, filter: &PagedFilter) -> bool {
        let consumed = filter.skip_count as u64 + self.items.len() as u64;
        consumed < self.total_count
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total_count: self.total_count,
            items: self.items.into_iter().map(f).collect(),
        }
    }

    pub fn into_parts(self) -> (u64, Vec<T>) {
        (self.total_count, self.items)
    }
}

impl<T> From<(u64, Vec<T>)> for Page<T> {
    fn from(value: (u64, Vec<T>)) -> Self {
        let (total_count, items) = value;

        Self::new(total_count, items)
    }
}
