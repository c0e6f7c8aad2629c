//! Render configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Default delay before a pending render is force-aborted.
pub const DEFAULT_ABORT_DELAY_MS: u64 = 5000;

/// Default key used to scope style class names.
pub const DEFAULT_STYLE_KEY: &str = "css";

/// Default content type forced onto rendered responses.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Configuration for the streaming render entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Milliseconds before an unfinished render is aborted.
    #[serde(default = "default_abort_delay_ms")]
    pub abort_delay_ms: u64,
    /// Key prefix for style class names (e.g., "css" gives "css-header").
    #[serde(default = "default_style_key")]
    pub style_key: String,
    /// Content type set on every finalized response.
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Extra user-agent patterns treated as automated agents.
    #[serde(default)]
    pub bot_patterns: Vec<String>,
}

fn default_abort_delay_ms() -> u64 {
    DEFAULT_ABORT_DELAY_MS
}

fn default_style_key() -> String {
    DEFAULT_STYLE_KEY.to_string()
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            abort_delay_ms: DEFAULT_ABORT_DELAY_MS,
            style_key: default_style_key(),
            content_type: default_content_type(),
            bot_patterns: Vec::new(),
        }
    }
}

impl RenderConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the abort delay, rounded up to whole milliseconds.
    pub fn with_abort_delay(mut self, delay: Duration) -> Self {
        let mut millis = delay.as_millis();
        if delay.subsec_nanos() % 1_000_000 != 0 {
            millis += 1;
        }
        self.abort_delay_ms = u64::try_from(millis).unwrap_or(u64::MAX);
        self
    }

    /// Set the style key.
    pub fn with_style_key(mut self, key: impl Into<String>) -> Self {
        self.style_key = key.into();
        self
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Add an extra automated-agent pattern.
    pub fn with_bot_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.bot_patterns.push(pattern.into());
        self
    }

    /// Abort delay as a `Duration`.
    pub fn abort_delay(&self) -> Duration {
        Duration::from_millis(self.abort_delay_ms)
    }

    /// Load config from a file (`.json` or TOML).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RenderError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, RenderError> {
        let config: Self =
            toml::from_str(content).map_err(|e| RenderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, RenderError> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| RenderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the renderer cannot use.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.abort_delay_ms == 0 {
            return Err(RenderError::Config(
                "abort_delay_ms must be greater than zero".to_string(),
            ));
        }

        if self.style_key.is_empty()
            || !self
                .style_key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(RenderError::Config(format!(
                "invalid style key '{}': use lowercase letters, digits and '-'",
                self.style_key
            )));
        }

        if self.content_type.trim().is_empty() {
            return Err(RenderError::Config("content_type is empty".to_string()));
        }

        Ok(())
    }
}
