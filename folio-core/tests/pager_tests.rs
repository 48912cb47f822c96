use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use folio_core::{
    FilterError, FilterLimits, PagedFilter, PagedFilterRequest, Pager,
    PagerError, QuerySource, SortExpression, paginate,
    query::{MemorySource, MemorySourceError, SortValue, Sortable},
};

#[cfg(test)]
mod helpers {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Item {
        pub id: u32,
        pub name: String,
    }

    impl Sortable for Item {
        const SORT_FIELDS: &'static [&'static str] = &["Id", "Name"];

        fn sort_key(&self, field: &str) -> SortValue {
            match field {
                "Id" => self.id.into(),
                "Name" => self.name.as_str().into(),
                _ => SortValue::Missing,
            }
        }
    }

    /// I1..In in insertion order, names deliberately not in id order
    pub fn items(n: u32) -> Vec<Item> {
        const NAMES: [&str; 10] = [
            "juliet", "alpha", "hotel", "charlie", "india", "bravo", "golf",
            "echo", "foxtrot", "delta",
        ];
        (1..=n)
            .map(|id| Item {
                id,
                name: NAMES[(id as usize - 1) % NAMES.len()].to_string(),
            })
            .collect()
    }

    pub fn ids(items: &[Item]) -> Vec<u32> {
        items.iter().map(|item| item.id).collect()
    }

    #[derive(Debug, Default)]
    pub struct Calls {
        pub count: AtomicUsize,
        pub fetch: AtomicUsize,
    }

    /// Wraps a source and records how often it is evaluated
    #[derive(Debug)]
    pub struct CountingSource<S> {
        pub inner: S,
        pub calls: Arc<Calls>,
    }

    impl<S> CountingSource<S> {
        pub fn new(inner: S) -> (Self, Arc<Calls>) {
            let calls = Arc::new(Calls::default());
            (
                Self {
                    inner,
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl<S: QuerySource> QuerySource for CountingSource<S> {
        type Item = S::Item;
        type Error = S::Error;

        async fn count(&self) -> Result<u64, Self::Error> {
            self.calls.count.fetch_add(1, Ordering::SeqCst);
            self.inner.count().await
        }

        fn order_by(self, sorting: &SortExpression) -> Self {
            Self {
                inner: self.inner.order_by(sorting),
                calls: self.calls,
            }
        }

        fn skip(self, count: usize) -> Self {
            Self {
                inner: self.inner.skip(count),
                calls: self.calls,
            }
        }

        fn take(self, count: usize) -> Self {
            Self {
                inner: self.inner.take(count),
                calls: self.calls,
            }
        }

        async fn fetch(self) -> Result<Vec<Self::Item>, Self::Error> {
            self.calls.fetch.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch().await
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("connection reset by peer")]
    pub struct ConnectionLost;

    /// Source whose backing store is unreachable
    #[derive(Debug)]
    pub struct FailingSource {
        pub fail_on_count: bool,
    }

    #[async_trait]
    impl QuerySource for FailingSource {
        type Item = Item;
        type Error = ConnectionLost;

        async fn count(&self) -> Result<u64, Self::Error> {
            if self.fail_on_count { Err(ConnectionLost) } else { Ok(4) }
        }

        fn order_by(self, _sorting: &SortExpression) -> Self {
            self
        }

        fn skip(self, _count: usize) -> Self {
            self
        }

        fn take(self, _count: usize) -> Self {
            self
        }

        async fn fetch(self) -> Result<Vec<Self::Item>, Self::Error> {
            Err(ConnectionLost)
        }
    }

    /// Source that ignores `take`, to exercise the pager's page bound
    #[derive(Debug)]
    pub struct OverDeliveringSource(pub Vec<Item>);

    #[async_trait]
    impl QuerySource for OverDeliveringSource {
        type Item = Item;
        type Error = MemorySourceError;

        async fn count(&self) -> Result<u64, Self::Error> {
            Ok(self.0.len() as u64)
        }

        fn order_by(self, _sorting: &SortExpression) -> Self {
            self
        }

        fn skip(self, _count: usize) -> Self {
            self
        }

        fn take(self, _count: usize) -> Self {
            self
        }

        async fn fetch(self) -> Result<Vec<Self::Item>, Self::Error> {
            Ok(self.0)
        }
    }
}

use helpers::*;

fn filter(sort: Option<&str>, skip: usize, take: usize) -> PagedFilter {
    let mut builder = PagedFilter::builder().skip(skip).take(take);
    if let Some(sort) = sort {
        builder = builder.sort(sort);
    }
    builder.build().expect("valid filter")
}

#[tokio::test]
async fn first_page_without_sorting_keeps_insertion_order() {
    let page = paginate(MemorySource::new(items(10)), &filter(None, 0, 5))
        .await
        .unwrap();

    assert_eq!(page.total_count, 10);
    assert_eq!(ids(&page.items), [1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn sorted_second_page_returns_items_six_to_ten() {
    let source = MemorySource::new(items(10));

    let mut sorted = items(10);
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let page = paginate(source, &filter(Some("Name"), 5, 5)).await.unwrap();

    assert_eq!(page.total_count, 10);
    assert_eq!(page.items, sorted[5..10].to_vec());
    assert_eq!(
        page.items.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
        ["foxtrot", "golf", "hotel", "india", "juliet"]
    );
}

#[tokio::test]
async fn skip_past_the_end_yields_empty_items_with_full_total() {
    let page = paginate(MemorySource::new(items(3)), &filter(None, 10, 5))
        .await
        .unwrap();

    assert_eq!(page.total_count, 3);
    assert!(page.items.is_empty());

    let page = paginate(MemorySource::new(items(3)), &filter(None, 3, 5))
        .await
        .unwrap();

    assert_eq!(page.total_count, 3);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn zero_take_yields_empty_items() {
    let page = paginate(MemorySource::new(items(7)), &filter(Some("Id"), 0, 0))
        .await
        .unwrap();

    assert_eq!(page.total_count, 7);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn descending_sort_pages_from_the_top() {
    let page = paginate(MemorySource::new(items(10)), &filter(Some("Id desc"), 2, 3))
        .await
        .unwrap();

    assert_eq!(ids(&page.items), [8, 7, 6]);
}

#[tokio::test]
async fn page_bounds_hold_across_windows() {
    let rows = items(10);

    for skip in [0, 1, 4, 9, 10, 25] {
        for take in [0, 1, 3, 10, 50] {
            let page = paginate(
                MemorySource::new(rows.clone()),
                &filter(Some("Name"), skip, take),
            )
            .await
            .unwrap();

            assert_eq!(page.total_count, 10, "skip={skip} take={take}");
            assert!(page.items.len() <= take, "skip={skip} take={take}");
            assert_eq!(page.items.len(), 10usize.saturating_sub(skip).min(take));
        }
    }
}

#[tokio::test]
async fn repeated_calls_return_identical_pages() {
    let source = MemorySource::new(items(10));
    let request = filter(Some("Name desc"), 3, 4);

    let first = paginate(source.clone(), &request).await.unwrap();
    let second = paginate(source, &request).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn source_is_counted_once_and_fetched_once() {
    let (source, calls) = CountingSource::new(MemorySource::new(items(10)));

    paginate(source, &filter(Some("Name"), 2, 2)).await.unwrap();

    assert_eq!(calls.count.load(Ordering::SeqCst), 1);
    assert_eq!(calls.fetch.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn blank_sorting_is_an_unordered_pass_through() {
    let unsorted = PagedFilter {
        sorting: Some(SortExpression::default()),
        skip_count: 0,
        max_result_count: 3,
    };

    let page = paginate(MemorySource::new(items(5)), &unsorted).await.unwrap();

    assert_eq!(ids(&page.items), [1, 2, 3]);
}

#[tokio::test]
async fn unknown_sort_field_propagates_from_the_source() {
    let err = paginate(MemorySource::new(items(5)), &filter(Some("Price"), 0, 5))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MemorySourceError::UnknownSortField { ref field, .. } if field == "Price"
    ));
}

#[tokio::test]
async fn source_failures_propagate_unchanged() {
    let err = paginate(FailingSource { fail_on_count: true }, &filter(None, 0, 5))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "connection reset by peer");

    let err = paginate(FailingSource { fail_on_count: false }, &filter(None, 0, 5))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "connection reset by peer");
}

#[tokio::test]
async fn pager_truncates_sources_that_ignore_take() {
    let page = paginate(OverDeliveringSource(items(8)), &filter(None, 0, 3))
        .await
        .unwrap();

    assert_eq!(page.total_count, 8);
    assert_eq!(ids(&page.items), [1, 2, 3]);
}

#[tokio::test]
async fn request_validation_happens_before_the_source_is_touched() {
    let (source, calls) = CountingSource::new(MemorySource::new(items(4)));
    let request = PagedFilterRequest {
        sorting: None,
        skip_count: Some(-5),
        max_result_count: Some(2),
    };

    let err = Pager::new()
        .paginate_request(source, &request)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PagerError::Filter(FilterError::NegativeSkipCount(-5))
    ));
    assert_eq!(calls.count.load(Ordering::SeqCst), 0);
    assert_eq!(calls.fetch.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn request_uses_configured_default_page_size() {
    let pager = Pager::with_limits(FilterLimits {
        default_max_result_count: 4,
        max_max_result_count: 100,
    });
    let request = PagedFilterRequest {
        sorting: Some("Id desc".into()),
        ..Default::default()
    };

    let page = pager
        .paginate_request(MemorySource::new(items(10)), &request)
        .await
        .unwrap();

    assert_eq!(page.total_count, 10);
    assert_eq!(ids(&page.items), [10, 9, 8, 7]);
}

#[tokio::test]
async fn request_source_errors_are_carried_unchanged() {
    let err = Pager::new()
        .paginate_request(
            FailingSource { fail_on_count: true },
            &PagedFilterRequest::default(),
        )
        .await
        .unwrap_err();

    let source_err = err.into_source().expect("source error");
    assert_eq!(source_err.to_string(), "connection reset by peer");
}

#[tokio::test]
async fn concurrent_calls_on_independent_sources_do_not_interfere() {
    let shared = MemorySource::new(items(10));

    let handles: Vec<_> = (0..4)
        .map(|page| {
            let source = shared.clone();
            tokio::spawn(async move {
                paginate(source, &PagedFilter::page(page, 3)).await
            })
        })
        .collect();

    let mut seen = Vec::new();
    for handle in handles {
        let page = handle.await.unwrap().unwrap();
        assert_eq!(page.total_count, 10);
        seen.extend(ids(&page.items));
    }

    assert_eq!(seen, (1..=10).collect::<Vec<_>>());
}
