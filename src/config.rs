//! Mapper configuration.
//!
//! Configuration is layered: stock defaults, then an optional
//! `edit-mapper.toml`, then environment overrides. Every layer is sparse, so
//! a file only needs the keys it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! request_style = "semantic"   # custom | semantic | thumbor
//!
//! [rewrite]
//! # Only used by the custom style. Both keys are required to map
//! # custom-style requests; leaving them out makes every request fail.
//! # match_pattern = "/(\\d+)x(\\d+)\\/(.*)/"
//! # substitution = "w=$1&h=$2/$3"
//! ```
//!
//! ## Environment Overrides
//!
//! | Variable | Key |
//! |---|---|
//! | `REQUEST_STYLE` | `request_style` |
//! | `REWRITE_MATCH_PATTERN` | `rewrite.match_pattern` |
//! | `REWRITE_SUBSTITUTION` | `rewrite.substitution` |
//!
//! Overrides are read through a lookup function rather than from the process
//! environment directly, so callers (and tests) decide where values come from.
//!
//! Unknown keys are rejected to catch typos early.

use crate::mapping::{RequestStyle, RewriteRule};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "edit-mapper.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Mapper configuration loaded from `edit-mapper.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    /// Request dialect served by this deployment.
    pub request_style: RequestStyle,
    /// Legacy path rewrite for the custom style.
    pub rewrite: RewriteConfig,
}

/// Regex rewrite applied to custom-style paths before mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteConfig {
    /// Pattern, optionally written as `/body/flags`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_pattern: Option<String>,
    /// Substitution template (`$1`, `$&`, `$<name>`, `$$`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitution: Option<String>,
}

impl MapperConfig {
    /// Validate settings that would otherwise only fail at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(pattern) = &self.rewrite.match_pattern {
            RewriteRule::parse(pattern).map_err(|e| {
                ConfigError::Validation(format!("rewrite.match_pattern does not compile: {e}"))
            })?;
        }
        if self.request_style == RequestStyle::Custom
            && self.rewrite.match_pattern.is_some() != self.rewrite.substitution.is_some()
        {
            return Err(ConfigError::Validation(
                "rewrite.match_pattern and rewrite.substitution must be set together".into(),
            ));
        }
        Ok(())
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// Values that are present but empty still override; an unparseable
    /// `REQUEST_STYLE` is a validation error.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(style) = lookup("REQUEST_STYLE") {
            self.request_style = style
                .parse()
                .map_err(|e| ConfigError::Validation(format!("REQUEST_STYLE: {e}")))?;
        }
        if let Some(pattern) = lookup("REWRITE_MATCH_PATTERN") {
            self.rewrite.match_pattern = Some(pattern);
        }
        if let Some(substitution) = lookup("REWRITE_SUBSTITUTION") {
            self.rewrite.substitution = Some(substitution);
        }
        Ok(self)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(MapperConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<MapperConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: MapperConfig = merged.try_into()?;
    Ok(config)
}

/// Load config from `path` (if it exists), apply environment overrides
/// through `lookup`, and validate the result.
pub fn load_config<F>(path: &Path, lookup: F) -> Result<MapperConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let overlay = load_raw_config(path)?;
    debug!(path = %path.display(), found = overlay.is_some(), "loading config");
    let config = resolve_config(stock_defaults_value(), overlay)?.apply_env(lookup)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `edit-mapper.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Edit Mapper Configuration
# ========================
#
# All options are optional. Environment variables override this file:
#   REQUEST_STYLE, REWRITE_MATCH_PATTERN, REWRITE_SUBSTITUTION

# Request dialect served by this deployment.
#   semantic  ?w=300&h=200&fit=cover&fm=webp&q=80
#   custom    legacy paths, rewritten with [rewrite] before mapping
#   thumbor   /fit-in/300x200/photo.jpg
request_style = "semantic"

[rewrite]
# Regex applied to custom-style paths, optionally as /pattern/flags.
# Flags: g (replace all), i (ignore case), m (multi-line), s (dot matches newline).
# match_pattern = "/(\\d+)x(\\d+)\\/(.*)/"

# Replacement template. $1..$99 are capture groups, $& is the whole match,
# $<name> is a named group and $$ is a literal dollar sign.
# substitution = "w=$1&h=$2/$3"
"##
}
