use super::sorting::{SortExpression, SortOrder, SortTerm};
use super::types::PagedFilter;
use crate::error::FilterResult;

/// Fluent API for building paged filters
#[derive(Debug, Clone, Default)]
pub struct PagedFilterBuilder {
    sorting: Option<String>,
    terms: Vec<SortTerm>,
    skip_count: usize,
    max_result_count: usize,
}

impl PagedFilterBuilder {
    /// Create a new builder for an empty first page
    pub fn new() -> Self {
        Self::default()
    }

    // === Sort methods ===

    /// Set a textual sort expression (`"Name desc, Id"`), parsed on build
    pub fn sort(mut self, expression: impl Into<String>) -> Self {
        self.sorting = Some(expression.into());
        self
    }

    /// Append a typed sort term after any textual expression
    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.terms.push(SortTerm::new(field, order));
        self
    }

    // === Pagination methods ===

    /// Set result offset
    pub fn skip(mut self, skip_count: usize) -> Self {
        self.skip_count = skip_count;
        self
    }

    /// Set result limit
    pub fn take(mut self, max_result_count: usize) -> Self {
        self.max_result_count = max_result_count;
        self
    }

    /// Set page (zero-based, convenience method)
    pub fn page(mut self, page: usize, per_page: usize) -> Self {
        self.skip_count = page.saturating_mul(per_page);
        self.max_result_count = per_page;
        self
    }

    // === Build method ===

    /// Build the final filter, parsing any textual sort expression
    pub fn build(self) -> FilterResult<PagedFilter> {
        let parsed = match self.sorting.as_deref() {
            Some(raw) => SortExpression::parse(raw)?,
            None => None,
        };

        let sorting = match (parsed, self.terms.is_empty()) {
            (parsed, true) => parsed,
            (parsed, false) => {
                let mut expression = parsed.unwrap_or_default();
                for term in self.terms {
                    expression = expression.then(term);
                }
                Some(expression)
            }
        };

        Ok(PagedFilter {
            sorting,
            skip_count: self.skip_count,
            max_result_count: self.max_result_count,
        })
    }
}

// === Convenience constructors ===

impl PagedFilter {
    pub fn builder() -> PagedFilterBuilder {
        PagedFilterBuilder::new()
    }

    /// Zero-based page of `per_page` rows without ordering
    pub fn page(page: usize, per_page: usize) -> Self {
        PagedFilter::new(page.saturating_mul(per_page), per_page)
    }
}
