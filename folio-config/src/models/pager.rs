use anyhow::{Context, anyhow};
use folio_core::FilterLimits;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::info;

use super::validation::ConfigGuardRailError;

const CONFIG_PATH_VAR: &str = "FOLIO_CONFIG_PATH";
const CONFIG_JSON_VAR: &str = "FOLIO_CONFIG_JSON";

/// Source that produced the pager configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PagerConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// Page size policy for incoming page requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PagerConfig {
    /// Page size used when a request leaves `max_result_count` out. Keep it
    /// small; list endpoints called without paging parameters get this many
    /// rows.
    pub default_max_result_count: usize,
    /// Hard ceiling on `max_result_count`. Requests above it are rejected
    /// rather than clamped, so raising it is visible to callers.
    pub max_max_result_count: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        let limits = FilterLimits::default();
        Self {
            default_max_result_count: limits.default_max_result_count,
            max_max_result_count: limits.max_max_result_count,
        }
    }
}

impl PagerConfig {
    /// Load pager configuration overrides using environment variables.
    /// Evaluation order:
    /// 1) `$FOLIO_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$FOLIO_CONFIG_JSON` (inline JSON),
    /// 3) the first default file found (`folio.toml`, `folio.json`,
    ///    `config/folio.toml`, `config/folio.json`),
    /// 4) defaults if none of the above is present.
    pub fn load_from_env() -> anyhow::Result<(Self, PagerConfigSource)> {
        Self::load_with(|key| env::var(key).ok(), Path::new("."))
    }

    /// Same evaluation order as [`PagerConfig::load_from_env`], reading
    /// variables through `lookup` and default files relative to `base_dir`.
    pub fn load_with(
        lookup: impl Fn(&str) -> Option<String>,
        base_dir: &Path,
    ) -> anyhow::Result<(Self, PagerConfigSource)> {
        let (config, source) = Self::resolve(lookup, base_dir)?;
        config.validate()?;

        info!(
            "Pager limits: default={} max={} (source: {:?})",
            config.default_max_result_count, config.max_max_result_count, source
        );

        Ok((config, source))
    }

    fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        base_dir: &Path,
    ) -> anyhow::Result<(Self, PagerConfigSource)> {
        if let Some(path_str) = lookup(CONFIG_PATH_VAR)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, PagerConfigSource::EnvPath(path)));
        }

        if let Some(raw) = lookup(CONFIG_JSON_VAR)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_VAR}"))?;
            return Ok((parsed, PagerConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file(base_dir) {
            let config = Self::load_from_file(&path)?;
            return Ok((config, PagerConfigSource::File(path)));
        }

        Ok((Self::default(), PagerConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read pager config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid pager config {}", path.display())
            }),
            Some("toml") | Some("tml") => {
                toml::from_str(&contents).map_err(|err| {
                    anyhow!("invalid pager config {}: {}", path.display(), err)
                })
            }
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        // Try TOML first, then JSON for convenience.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse pager config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid pager config json: {err}"))
    }

    pub fn validate(&self) -> Result<(), ConfigGuardRailError> {
        if self.max_max_result_count == 0 {
            return Err(ConfigGuardRailError::ZeroMaxPageSize);
        }
        if self.default_max_result_count > self.max_max_result_count {
            return Err(ConfigGuardRailError::DefaultExceedsMax {
                default: self.default_max_result_count,
                max: self.max_max_result_count,
            });
        }
        Ok(())
    }

    pub fn limits(&self) -> FilterLimits {
        FilterLimits {
            default_max_result_count: self.default_max_result_count,
            max_max_result_count: self.max_max_result_count,
        }
    }

    fn find_default_file(base_dir: &Path) -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &[
            "folio.toml",
            "folio.json",
            "config/folio.toml",
            "config/folio.json",
        ];

        CANDIDATES
            .iter()
            .map(|candidate| base_dir.join(candidate))
            .find(|path| path.exists())
    }
}

impl From<&PagerConfig> for FilterLimits {
    fn from(value: &PagerConfig) -> Self {
        value.limits()
    }
}
