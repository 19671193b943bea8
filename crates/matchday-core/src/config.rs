// Configuration loading and validation (config/analytics.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::record::MatchFilter;
use crate::season::TiebreakOrder;

/// Name of the configuration file inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "analytics.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// analytics.toml structs
// ---------------------------------------------------------------------------

/// Everything the runner needs to analyse one season.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub ranking: RankingConfig,
    /// Applied before aggregation; an empty table keeps every match.
    pub filter: MatchFilter,
    pub input: InputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Criterion keys in priority order. Unknown keys are ignored.
    pub tiebreakers: TiebreakOrder,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Match file, one record per line. Read from stdin when absent.
    pub path: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/analytics.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()`, which does.
pub fn load_config_from(base_dir: &Path) -> Result<AnalyticsConfig, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path)
        .map_err(|_| ConfigError::FileNotFound { path: path.clone() })?;
    let config: AnalyticsConfig =
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?;

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/analytics.toml` to `config/` unless a config is already
/// there. Returns the path written, or `None` when nothing was copied.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {CONFIG_FILE} in config/ or defaults/ under {}",
                base_dir.display()
            ),
        });
    }

    let copy_err = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("{} -> {}: {e}", source.display(), target.display()),
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(copy_err)?;
    }
    std::fs::copy(&source, &target).map_err(copy_err)?;

    Ok(Some(target))
}

/// `ensure_config_file` then `load_config_from`, both against the working
/// directory.
pub fn load_config() -> Result<AnalyticsConfig, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if let Some(copied) = ensure_config_file(&cwd)? {
        info!("created {} from defaults", copied.display());
    }
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &AnalyticsConfig) -> Result<(), ConfigError> {
    let filter = &config.filter;

    if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
        if from > to {
            return Err(ConfigError::ValidationError {
                field: "filter.date_from".into(),
                message: format!("must not be after filter.date_to ({from} > {to})"),
            });
        }
    }

    if let (Some(min), Some(max)) = (filter.min_attendance, filter.max_attendance) {
        if min > max {
            return Err(ConfigError::ValidationError {
                field: "filter.min_attendance".into(),
                message: format!("must not exceed filter.max_attendance ({min} > {max})"),
            });
        }
    }

    if config.input.path.as_deref().is_some_and(|p| p.trim().is_empty()) {
        return Err(ConfigError::ValidationError {
            field: "input.path".into(),
            message: "must not be empty; omit it to read from stdin".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
