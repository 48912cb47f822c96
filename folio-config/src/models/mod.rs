pub mod pager;
pub mod validation;
