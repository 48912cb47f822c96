//! Shared configuration library for Folio.
//!
//! Centralizes loading of the paging limits applied to incoming page
//! requests, and the tracing subscriber setup used by binaries embedding
//! `folio-core`.

pub mod models;
pub mod telemetry;

pub use models::pager::{PagerConfig, PagerConfigSource};
pub use models::validation::ConfigGuardRailError;
pub use telemetry::init_tracing;
