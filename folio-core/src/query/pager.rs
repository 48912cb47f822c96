use tracing::{debug, warn};

use crate::error::PagerError;
use crate::query::source::QuerySource;
use crate::query::types::{FilterLimits, Page, PagedFilter, PagedFilterRequest};

/// Run one paged read against `source`.
///
/// Evaluates exactly one count over the unpaged query and exactly one fetch of
/// the ordered, windowed query. Ordering is applied only when the filter
/// carries a non-empty sort expression. Source failures are returned as-is.
#[tracing::instrument(
    name = "paginate",
    level = "debug",
    skip_all,
    fields(
        skip = filter.skip_count,
        take = filter.max_result_count,
        sorting = ?filter.effective_sorting(),
    )
)]
pub async fn paginate<S>(
    source: S,
    filter: &PagedFilter,
) -> Result<Page<S::Item>, S::Error>
where
    S: QuerySource,
{
    let total_count = source.count().await?;

    let source = match filter.effective_sorting() {
        Some(sorting) => source.order_by(sorting),
        None => source,
    };

    let mut items = source
        .skip(filter.skip_count)
        .take(filter.max_result_count)
        .fetch()
        .await?;

    if items.len() > filter.max_result_count {
        warn!(
            "Source returned {} rows for a page of {}; truncating",
            items.len(),
            filter.max_result_count
        );
        items.truncate(filter.max_result_count);
    }

    debug!(total_count, returned = items.len(), "Page materialized");

    Ok(Page::new(total_count, items))
}

/// Pager bound to a page size policy, for callers holding raw requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pager {
    limits: FilterLimits,
}

impl Pager {
    pub fn new() -> Self {
        Self::with_limits(FilterLimits::default())
    }

    pub fn with_limits(limits: FilterLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &FilterLimits {
        &self.limits
    }

    /// Validate `request` and page through `source`.
    ///
    /// A rejected request never reaches the source.
    pub async fn paginate_request<S>(
        &self,
        source: S,
        request: &PagedFilterRequest,
    ) -> Result<Page<S::Item>, PagerError<S::Error>>
    where
        S: QuerySource,
    {
        let filter = PagedFilter::try_from_request(request, &self.limits)
            .inspect_err(|err| debug!("Rejected page request: {}", err))?;

        paginate(source, &filter).await.map_err(PagerError::Source)
    }

    pub async fn paginate<S>(
        &self,
        source: S,
        filter: &PagedFilter,
    ) -> Result<Page<S::Item>, S::Error>
    where
        S: QuerySource,
    {
        paginate(source, filter).await
    }
}
