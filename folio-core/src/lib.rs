//! # Folio Core
//!
//! Paged reads over deferred, composable query sources.
//!
//! ## Overview
//!
//! A read is split into two collaborators:
//!
//! - **Sources** ([`query::QuerySource`]) describe a query without running it.
//!   Ordering, offset and limit compose lazily; only `count` and `fetch`
//!   touch the backing store.
//! - **The pager** ([`query::paginate`]) turns a [`query::PagedFilter`] into
//!   exactly one count and one materialization, and hands back a
//!   [`query::Page`].
//!
//! ## Feature Flags
//!
//! - `database`: Enables the PostgreSQL source backed by SQLx
//!
//! ## Examples
//!
//! ```no_run
//! use folio_core::query::{
//!     MemorySource, PagedFilter, Sortable, SortValue, paginate,
//! };
//!
//! #[derive(Clone)]
//! struct Track {
//!     title: String,
//! }
//!
//! impl Sortable for Track {
//!     const SORT_FIELDS: &'static [&'static str] = &["Title"];
//!
//!     fn sort_key(&self, _field: &str) -> SortValue {
//!         SortValue::from(self.title.as_str())
//!     }
//! }
//!
//! async fn first_page(
//!     tracks: Vec<Track>,
//! ) -> Result<(), Box<dyn std::error::Error>> {
//!     let filter = PagedFilter::builder().sort("Title").take(20).build()?;
//!     let page = paginate(MemorySource::new(tracks), &filter).await?;
//!     println!("{} of {}", page.items.len(), page.total_count);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Database-backed query sources
#[cfg(feature = "database")]
#[cfg_attr(docsrs, doc(cfg(feature = "database")))]
pub mod database;

/// Error types for filter validation and paging
pub mod error;

/// Filters, pages, sources and the pager
pub mod query;

pub use error::{FilterError, PagerError};
pub use query::{
    FilterLimits, Page, PagedFilter, PagedFilterRequest, Pager, QuerySource,
    SortExpression, paginate,
};
