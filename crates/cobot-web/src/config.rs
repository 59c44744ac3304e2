#![forbid(unsafe_code)]

//! Editor configuration loading.
//!
//! The configuration groups everything a host tunes without touching code:
//! the bounds and handle of the configuration popover window, and the gap
//! kept between a clicked block and that popover. Documents may be TOML or
//! JSON; every field is optional and falls back to its default.
//!
//! ```toml
//! popover_pad = 24.0
//!
//! [popover]
//! handle = { named = "container-header" }
//! observe_resize = true
//!
//! [popover.bounds]
//! top = 0.0
//! left = -40.0
//! bottom = inf
//! min_visible = 48.0
//! ```

use std::fmt;
use std::path::Path;

use cobot_window::{BoundMargin, DEFAULT_POPOVER_PAD, HandleRegion, WindowConfig};
use serde::{Deserialize, Serialize};

use crate::sequence_drag::SequenceDragConfig;

/// Host-tunable editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Draggable configuration popover.
    pub popover: WindowConfig,
    /// Gap between a clicked block and the popover, in pixels.
    pub popover_pad: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            popover: WindowConfig::default(),
            popover_pad: DEFAULT_POPOVER_PAD,
        }
    }
}

impl EditorConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check values the type system cannot.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.popover_pad.is_finite() || self.popover_pad < 0.0 {
            errors.push(format!(
                "popover_pad must be finite and >= 0, got {}",
                self.popover_pad
            ));
        }

        let bounds = &self.popover.bounds;
        for (side, margin) in [
            ("top", bounds.top),
            ("right", bounds.right),
            ("bottom", bounds.bottom),
            ("left", bounds.left),
        ] {
            if let BoundMargin::Px(value) = margin
                && value.is_nan()
            {
                errors.push(format!("popover.bounds.{side} must be a number or unbounded"));
            }
        }

        if let Some(min_visible) = bounds.min_visible
            && !(min_visible.is_finite() && min_visible >= 0.0)
        {
            errors.push(format!(
                "popover.bounds.min_visible must be finite and >= 0, got {min_visible}"
            ));
        }

        if let HandleRegion::Named(name) = &self.popover.handle
            && name.trim().is_empty()
        {
            errors.push("popover.handle name must not be empty".into());
        }

        errors
    }

    /// Validate, turning any problem into an error.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Settings for the sequence drag adapter.
    #[must_use]
    pub fn sequence_drag(&self) -> SequenceDragConfig {
        SequenceDragConfig {
            popover_pad: self.popover_pad,
        }
    }
}

/// Errors from loading an [`EditorConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Invalid(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config I/O error: {e}"),
            Self::Toml(e) => write!(f, "config TOML error: {e}"),
            Self::Json(e) => write!(f, "config JSON error: {e}"),
            Self::Invalid(errors) => write!(f, "invalid config: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}
