//! Presentation configuration.
//!
//! Handles loading, validating, and layering the card's timing and layout
//! options. On the command line the options come from a sparse `card.toml`
//! merged over the stock defaults; in the browser they come from the
//! `window.Gallo` page global.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! show_duration = 5000     # ms each image stays focused
//! fade_duration = 2000     # ms of the cover/images opacity transition
//! cover_timeout = 10000    # ms the cover stays up at minimum
//! load_wait_count = 3      # loaded images needed before the reveal
//! width_limit = 22500      # px budget for the images strip
//! # auto_reload = 60000    # ms until a full page reload (off when absent)
//! ```
//!
//! ## Page Global
//!
//! ```js
//! window.Gallo = {
//!   IMAGES: [{ previews: [{ url, width, height }, ...] }, ...],
//!   REFRESH: 60000,         // optional, auto reload
//!   SHOW_DURATION: 8000,    // optional, overrides show_duration
//!   PRESENTATION: { ... },  // optional, any option listed above
//! };
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::ImageDescriptor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Timing and layout options of the presentation.
///
/// All fields have defaults; config files need only the values they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresentationConfig {
    /// How long each image is focused before the strip moves on (ms).
    pub show_duration: u64,
    /// Opacity transition length of the cover and the images container (ms).
    pub fade_duration: u64,
    /// Minimum time the cover stays up after start (ms).
    pub cover_timeout: u64,
    /// Number of loaded images required before the cover may fade out.
    /// Capped at the number of provisioned images.
    pub load_wait_count: usize,
    /// Upper bound on the summed rendered width of the images strip (px).
    /// Some WebKit builds stop painting layers wider than this.
    pub width_limit: f64,
    /// Reload the whole page after this long (ms). Off when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_reload: Option<u64>,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            show_duration: 5000,
            fade_duration: 2000,
            cover_timeout: 10_000,
            load_wait_count: 3,
            width_limit: 22_500.0,
            auto_reload: None,
        }
    }
}

impl PresentationConfig {
    /// Validate values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.show_duration == 0 {
            return Err(ConfigError::Validation(
                "show_duration must be non-zero".into(),
            ));
        }
        if self.cover_timeout == 0 {
            return Err(ConfigError::Validation(
                "cover_timeout must be non-zero".into(),
            ));
        }
        if self.load_wait_count == 0 {
            return Err(ConfigError::Validation(
                "load_wait_count must be at least 1".into(),
            ));
        }
        if !(self.width_limit > 0.0) {
            return Err(ConfigError::Validation(
                "width_limit must be positive".into(),
            ));
        }
        if self.auto_reload == Some(0) {
            return Err(ConfigError::Validation(
                "auto_reload must be non-zero when set".into(),
            ));
        }
        Ok(())
    }

    /// Reload interval that lets every image be shown once. Saturates
    /// instead of overflowing.
    pub fn full_cycle_reload(&self, image_count: usize) -> u64 {
        self.show_duration.saturating_mul(image_count as u64)
    }
}

/// Everything the presentation controller is constructed from.
#[derive(Debug, Clone, PartialEq)]
pub struct CardConfig {
    pub presentation: PresentationConfig,
    pub images: Vec<ImageDescriptor>,
}

impl CardConfig {
    pub fn new(presentation: PresentationConfig, images: Vec<ImageDescriptor>) -> Self {
        Self {
            presentation,
            images,
        }
    }

    /// Presence checks on the images plus [`PresentationConfig::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.presentation.validate()?;
        validate_images(&self.images)
    }
}

/// Images must be present, and each one needs at least one sized preview.
pub fn validate_images(images: &[ImageDescriptor]) -> Result<(), ConfigError> {
    if images.is_empty() {
        return Err(ConfigError::Validation("no images configured".into()));
    }
    for (i, image) in images.iter().enumerate() {
        if image.previews.is_empty() {
            return Err(ConfigError::Validation(format!(
                "image {i} has no previews"
            )));
        }
        if let Some(p) = image.previews.iter().find(|p| p.width == 0 || p.height == 0) {
            return Err(ConfigError::Validation(format!(
                "image {i} preview {} has a zero dimension",
                p.url
            )));
        }
    }
    Ok(())
}

/// The `window.Gallo` page global as delivered by the host page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageGlobal {
    #[serde(rename = "IMAGES", skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageDescriptor>>,
    #[serde(rename = "REFRESH", default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<u64>,
    #[serde(rename = "SHOW_DURATION", default, skip_serializing_if = "Option::is_none")]
    pub show_duration: Option<u64>,
    #[serde(rename = "PRESENTATION", default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<PresentationConfig>,
}

impl PageGlobal {
    /// The global a host page embeds for `config`.
    pub fn for_card(config: &CardConfig) -> Self {
        Self {
            images: Some(config.images.clone()),
            refresh: None,
            show_duration: None,
            presentation: Some(config.presentation.clone()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve into a validated [`CardConfig`].
    ///
    /// `REFRESH` and `SHOW_DURATION` take precedence over the same options
    /// given inside `PRESENTATION`.
    pub fn into_card_config(self) -> Result<CardConfig, ConfigError> {
        let images = self
            .images
            .ok_or_else(|| ConfigError::Validation("Gallo.IMAGES is not set".into()))?;
        let mut presentation = self.presentation.unwrap_or_default();
        if let Some(ms) = self.show_duration {
            presentation.show_duration = ms;
        }
        if let Some(ms) = self.refresh {
            presentation.auto_reload = Some(ms);
        }
        let config = CardConfig::new(presentation, images);
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PresentationConfig::default()).expect("default config must serialize")
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

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PresentationConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PresentationConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load presentation options, falling back to stock defaults when `path` is
/// `None` or missing.
pub fn load_config(path: Option<&Path>) -> Result<PresentationConfig, ConfigError> {
    let overlay = match path {
        Some(p) => load_raw_config(p)?,
        None => None,
    };
    resolve_config(stock_defaults_value(), overlay)
}

/// Read image descriptors from a JSON array file.
pub fn load_images(path: &Path) -> Result<Vec<ImageDescriptor>, ConfigError> {
    let content = fs::read_to_string(path)?;
    let images: Vec<ImageDescriptor> = serde_json::from_str(&content)?;
    validate_images(&images)?;
    Ok(images)
}

/// Returns a fully-commented stock `card.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Gallo Card Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
#
# In the browser the same options are read from window.Gallo.PRESENTATION;
# window.Gallo.SHOW_DURATION and window.Gallo.REFRESH override
# show_duration and auto_reload.

# ---------------------------------------------------------------------------
# Timing (milliseconds)
# ---------------------------------------------------------------------------

# How long each image stays focused before the strip moves to the next one.
show_duration = 5000

# Length of the opacity transition on the cover and the images container.
fade_duration = 2000

# The cover stays up at least this long, even when images load quickly.
cover_timeout = 10000

# Reload the whole page after this long. Off when absent.
# auto_reload = 60000

# ---------------------------------------------------------------------------
# Loading and layout
# ---------------------------------------------------------------------------

# Loaded images required before the cover may fade out. Capped at the number
# of images actually inserted; the rest keep loading off-screen.
load_wait_count = 3

# Upper bound (px) on the summed width of the images strip. Images that would
# push the strip past it are not inserted.
width_limit = 22500.0
"##
}
