#![forbid(unsafe_code)]

//! Tour configuration.
//!
//! Mirrors the values a tour component accepts from markup: the auto-start
//! delay and the four popup labels. Every field has a default, so
//! `TourConfig::default()` is a complete, valid configuration.
//!
//! # Loading
//!
//! With the `tour-config` feature, configs load from TOML or JSON. Missing
//! fields keep their defaults.
//!
//! ```toml
//! timeout_ms = 250
//! next_btn_text = "Continue"
//! step_line_text = "{{current}}/{{total}}"
//! ```

#[cfg(feature = "tour-config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "tour-config")]
use serde::{Deserialize, Serialize};

use crate::template::TemplateLabels;

/// Default auto-start delay in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
/// Default delay between overlay repositioning and popup creation.
pub const DEFAULT_POPUP_DELAY_MS: u64 = 300;
/// Default outward padding around each target, in pixels.
pub const DEFAULT_TARGET_PADDING: f64 = 5.0;
pub const DEFAULT_STEP_LINE_TEXT: &str = "Step {{current}} of {{total}}";
pub const DEFAULT_NEXT_BTN_TEXT: &str = "Next";
pub const DEFAULT_DONE_BTN_TEXT: &str = "Done!";
pub const DEFAULT_PREV_BTN_TEXT: &str = "Prev";

/// Tour configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "tour-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "tour-config", serde(default))]
pub struct TourConfig {
    /// Delay before the first step when no start control exists. Default: 1000.
    #[cfg_attr(feature = "tour-config", serde(alias = "timeout"))]
    pub timeout_ms: u64,
    /// Delay before each popup is created. Default: 300.
    pub popup_delay_ms: u64,
    /// Outward padding on every side of a target. Default: 5.0.
    pub target_padding: f64,
    /// Step counter line; `{{current}}` and `{{total}}` are substituted.
    pub step_line_text: String,
    pub next_btn_text: String,
    pub done_btn_text: String,
    pub prev_btn_text: String,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            popup_delay_ms: DEFAULT_POPUP_DELAY_MS,
            target_padding: DEFAULT_TARGET_PADDING,
            step_line_text: DEFAULT_STEP_LINE_TEXT.to_string(),
            next_btn_text: DEFAULT_NEXT_BTN_TEXT.to_string(),
            done_btn_text: DEFAULT_DONE_BTN_TEXT.to_string(),
            prev_btn_text: DEFAULT_PREV_BTN_TEXT.to_string(),
        }
    }
}

impl TourConfig {
    /// Set the auto-start delay.
    #[must_use]
    pub fn timeout(mut self, delay: Duration) -> Self {
        self.timeout_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the popup creation delay.
    #[must_use]
    pub fn popup_delay(mut self, delay: Duration) -> Self {
        self.popup_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn target_padding(mut self, padding: f64) -> Self {
        self.target_padding = padding;
        self
    }

    #[must_use]
    pub fn step_line_text(mut self, text: impl Into<String>) -> Self {
        self.step_line_text = text.into();
        self
    }

    #[must_use]
    pub fn next_btn_text(mut self, text: impl Into<String>) -> Self {
        self.next_btn_text = text.into();
        self
    }

    #[must_use]
    pub fn done_btn_text(mut self, text: impl Into<String>) -> Self {
        self.done_btn_text = text.into();
        self
    }

    #[must_use]
    pub fn prev_btn_text(mut self, text: impl Into<String>) -> Self {
        self.prev_btn_text = text.into();
        self
    }

    /// Auto-start delay as a [`Duration`].
    #[must_use]
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Popup creation delay as a [`Duration`].
    #[must_use]
    pub fn popup_delay_duration(&self) -> Duration {
        Duration::from_millis(self.popup_delay_ms)
    }

    /// Labels handed to the template renderer.
    #[must_use]
    pub fn labels(&self) -> TemplateLabels {
        TemplateLabels {
            step_line: self.step_line_text.clone(),
            next: self.next_btn_text.clone(),
            done: self.done_btn_text.clone(),
            prev: self.prev_btn_text.clone(),
        }
    }

    /// Check values are usable. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.target_padding.is_finite() || self.target_padding < 0.0 {
            errors.push(format!(
                "target_padding must be a finite value >= 0, got {}",
                self.target_padding
            ));
        }
        for (field, value) in [
            ("next_btn_text", &self.next_btn_text),
            ("done_btn_text", &self.done_btn_text),
            ("prev_btn_text", &self.prev_btn_text),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{field} must not be empty"));
            }
        }
        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "tour-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, TourConfigError> {
        let config: Self = toml::from_str(s).map_err(TourConfigError::Toml)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "tour-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, TourConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(TourConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "tour-config")]
    pub fn from_json_str(s: &str) -> Result<Self, TourConfigError> {
        let config: Self = serde_json::from_str(s).map_err(TourConfigError::Json)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "tour-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TourConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(TourConfigError::Io)?;
        Self::from_json_str(&content)
    }

    #[cfg(feature = "tour-config")]
    fn checked(self) -> Result<Self, TourConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(TourConfigError::Validation(errors))
        }
    }
}

/// Errors that can occur when loading a tour configuration.
#[derive(Debug)]
pub enum TourConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "tour-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "tour-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for TourConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "tour-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "tour-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for TourConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "tour-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "tour-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
