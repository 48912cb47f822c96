use thiserror::Error;

/// Configured values that would make every page request fail or misbehave.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigGuardRailError {
    #[error("max_max_result_count must be greater than zero")]
    ZeroMaxPageSize,

    #[error(
        "default_max_result_count ({default}) exceeds max_max_result_count ({max})"
    )]
    DefaultExceedsMax { default: usize, max: usize },
}
