//! Sorting for paged reads
//!
//! This module provides:
//! - Parsed sort expressions (`"Name desc, Id"`)
//! - Sort key values with missing-last comparison
//! - The trait in-memory rows implement to expose sortable fields

pub mod expression;
pub mod keys;
pub mod traits;

pub use expression::*;
pub use keys::*;
pub use traits::*;
