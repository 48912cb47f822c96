pub mod builder;
pub mod memory;
pub mod pager;
pub mod sorting;
pub mod source;
pub mod types;

pub use builder::PagedFilterBuilder;
pub use memory::{MemorySource, MemorySourceError};
pub use pager::{Pager, paginate};
pub use sorting::*;
pub use source::{QuerySource, Window};
pub use types::*;
