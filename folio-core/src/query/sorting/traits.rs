//! Core trait for rows sorted in memory

use super::keys::SortValue;

/// Row type that can be ordered by named fields.
///
/// Field names in sort expressions are matched case-insensitively against
/// [`Sortable::SORT_FIELDS`]; `sort_key` is always called with the canonical
/// spelling from that list.
pub trait Sortable {
    /// Canonical names of every field this row can be sorted by
    const SORT_FIELDS: &'static [&'static str];

    /// Extract the key for a field listed in `SORT_FIELDS`
    fn sort_key(&self, field: &str) -> SortValue;

    /// Resolve caller spelling to the canonical field name
    fn resolve_field(field: &str) -> Option<&'static str> {
        Self::SORT_FIELDS
            .iter()
            .copied()
            .find(|candidate| candidate.eq_ignore_ascii_case(field))
    }
}
