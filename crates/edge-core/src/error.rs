//! Error type for render operations.

use std::time::Duration;

/// Failures that reject a render instead of degrading its status code.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Shell render failed: {0}")]
    Shell(anyhow::Error),

    #[error("Render aborted after {0:?} before the response was ready")]
    Timeout(Duration),

    #[error("Render ended before the response was ready")]
    Incomplete,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Streaming error: {0}")]
    Stream(String),
}

impl RenderError {
    /// Whether nothing was sent to the client when this error occurred.
    ///
    /// Callers may still produce an alternate error response for these.
    pub fn is_before_output(&self) -> bool {
        matches!(
            self,
            Self::Shell(_) | Self::Timeout(_) | Self::Incomplete | Self::Config(_)
        )
    }
}
