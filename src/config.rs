//! Thumbnailer configuration.
//!
//! Handles loading and validating `thumbnailer.toml`. The file is optional and
//! sparse: stock defaults are overridden only by the keys it sets.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [storage]
//! root = "storage"                 # Local bucket root used by the CLI
//! source_prefix = "original/"      # Where uploads land
//! destination_prefix = "thumbs/"   # Where variants are written
//!
//! [plan]
//! quality = 60                     # Encoding quality (0-100)
//! sizes = ["original", 1200, 640, 420]
//! extensions = ["jpg", "jpeg", "png"]   # Case-sensitive
//!
//! [processing]
//! max_processes = 4                # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::Quality;
use crate::plan::{PlanError, VariantPlan, VariantSize, default_extensions, default_sizes};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "thumbnailer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Invalid variant plan: {0}")]
    Plan(#[from] PlanError),
}

/// Configuration loaded from `thumbnailer.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailerConfig {
    /// Bucket root and key prefixes.
    pub storage: StorageConfig,
    /// Variant sizes, quality and accepted extensions.
    pub plan: PlanConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl ThumbnailerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plan.quality > 100 {
            return Err(ConfigError::Validation("plan.quality must be 0-100".into()));
        }
        self.plan.to_plan()?;
        Ok(())
    }
}

/// Storage layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding one sub-directory per bucket (CLI only).
    pub root: String,
    /// Prefix under which originals are read.
    pub source_prefix: String,
    /// Prefix prepended to every variant key.
    pub destination_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: "storage".to_string(),
            source_prefix: "original/".to_string(),
            destination_prefix: "thumbs/".to_string(),
        }
    }
}

/// Variant plan settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanConfig {
    /// Encoding quality applied to every variant (0 = worst, 100 = best).
    pub quality: u32,
    /// `"original"` and/or pixel widths, in production order.
    pub sizes: Vec<VariantSize>,
    /// Accepted source extensions, compared case-sensitively.
    pub extensions: Vec<String>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default().value(),
            sizes: default_sizes(),
            extensions: default_extensions(),
        }
    }
}

impl PlanConfig {
    pub fn to_plan(&self) -> Result<VariantPlan, PlanError> {
        VariantPlan::new(
            &self.sizes,
            Quality::new(self.quality),
            self.extensions.iter().cloned(),
        )
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Used as the base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ThumbnailerConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so a
///   `sizes` array is replaced, never appended to.
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
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ThumbnailerConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ThumbnailerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<ThumbnailerConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `thumbnailer.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Image Thumbnailer Configuration
# ===============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Storage layout
# ---------------------------------------------------------------------------
[storage]
# Directory holding one sub-directory per bucket. Only used by the CLI.
root = "storage"

# Prefix under which uploaded originals are read.
source_prefix = "original/"

# Prefix prepended to every generated variant key:
#   thumbs/<name>_original.<ext>, thumbs/<name>_thumb_<width>.<ext>
destination_prefix = "thumbs/"

# ---------------------------------------------------------------------------
# Variants
# ---------------------------------------------------------------------------
[plan]
# Encoding quality (0 = worst, 100 = best). PNG output ignores it.
quality = 60

# Variants to produce, in order. "original" re-encodes without resizing;
# numbers are target widths in pixels. Each entry must be unique.
sizes = ["original", 1200, 640, 420]

# Accepted source extensions. Matching is case-sensitive: "JPG" is skipped
# unless listed here.
extensions = ["jpg", "jpeg", "png"]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
