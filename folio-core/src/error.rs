use thiserror::Error;

/// Rejections raised while turning a caller request into a [`PagedFilter`].
///
/// [`PagedFilter`]: crate::query::PagedFilter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Skip count must not be negative (got {0})")]
    NegativeSkipCount(i64),

    #[error("Max result count must not be negative (got {0})")]
    NegativeMaxResultCount(i64),

    #[error("Max result count {requested} exceeds the limit of {max}")]
    MaxResultCountExceeded { requested: usize, max: usize },

    #[error("Invalid sort expression: {0}")]
    InvalidSortExpression(String),
}

/// Failure of a request-level paged read.
///
/// Source failures are carried as-is in [`PagerError::Source`]; nothing is
/// re-described or retried on the way out.
#[derive(Error, Debug)]
pub enum PagerError<E> {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Source(E),
}

impl<E> PagerError<E> {
    /// The underlying source error, if the read got that far.
    pub fn into_source(self) -> Option<E> {
        match self {
            PagerError::Source(err) => Some(err),
            PagerError::Filter(_) => None,
        }
    }
}

pub type FilterResult<T> = std::result::Result<T, FilterError>;
