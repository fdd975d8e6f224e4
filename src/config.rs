//! Build configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. User values are
//! layered on top of stock defaults, so a config file only needs the keys it
//! changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_dir = "Resources/img"   # Directory scanned for source images
//! target_dir = "img-optimized"   # Directory variants are written to (site-relative)
//! target_format = "webp"         # bmp | gif | jpg | png | tiff | webp
//! sizes = ["extraSmall", "small", "normal", "large"]
//!
//! [processing]
//! max_processes = 4              # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::format::ImageFormat;
use crate::size_class::SizeClass;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory holding source images. Also the directory stylesheets
    /// reference them from.
    pub source_dir: String,
    /// Site-relative directory for generated variants.
    pub target_dir: String,
    /// Format every variant is encoded in.
    pub target_format: ImageFormat,
    /// Size classes to produce for each source image, in output order.
    pub sizes: Vec<SizeClass>,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: "Resources/img".to_string(),
            target_dir: "img-optimized".to_string(),
            target_format: ImageFormat::Webp,
            sizes: SizeClass::ALL.to_vec(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sizes.is_empty() {
            return Err(ConfigError::Validation("sizes must not be empty".into()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.sizes.iter().find(|s| !seen.insert(**s)) {
            return Err(ConfigError::Validation(format!(
                "sizes contains {dup} more than once"
            )));
        }
        if self.target_dir.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation(
                "target_dir must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(BuildConfig::default())?)
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

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<BuildConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BuildConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given `config.toml` path, falling back to defaults
/// when the file is absent.
pub fn load_config(path: &Path) -> Result<BuildConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Responsive Images Configuration
# ===============================
# All options are optional. Remove or comment out any you don't need.

# Directory scanned (recursively) for source images. Stylesheets and pages
# are expected to reference sources relative to this path.
source_dir = "Resources/img"

# Site-relative directory variants are written to. Sub-directories of
# source_dir are mirrored below it.
target_dir = "img-optimized"

# Output format for every variant: bmp, gif, jpg, png, tiff or webp.
target_format = "webp"

# Size classes to generate, by longer edge:
#   extraSmall  600px   (served below 600px viewport width)
#   small       900px   (from 600px)
#   normal     1200px   (from 900px)
#   large      1800px   (from 1200px)
sizes = ["extraSmall", "small", "normal", "large"]

[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
