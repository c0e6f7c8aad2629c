//! Structured logging with request context.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use edge_core::{LifecyclePhase, RequestId};
use serde::Serialize;

/// Logging capability injected into the renderer.
///
/// Calls are fire-and-forget and must not block the render.
pub trait RenderLog: Send + Sync {
    /// A defect surfaced after output may already have been committed.
    fn render_error(&self, request_id: &RequestId, error: &dyn fmt::Display);

    /// A lifecycle phase was reached.
    fn render_event(&self, request_id: &RequestId, phase: &LifecyclePhase, elapsed: Duration);

    /// The response was handed to the caller.
    fn render_finalized(&self, request_id: &RequestId, summary: &RenderSummary<'_>) {
        self.render_event(request_id, &LifecyclePhase::Finalized, summary.elapsed);
    }
}

/// What a render looked like when its response was finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary<'a> {
    /// Signal the render waited for (`shell_ready` or `all_ready`).
    pub signal: &'a str,
    /// Status code sent.
    pub status: u16,
    /// Whether an error before finalization forced the status to 500.
    pub degraded: bool,
    /// Time until the shell was ready, if it was observed.
    pub time_to_shell: Option<Duration>,
    /// Time since the render started.
    pub elapsed: Duration,
}

/// A `RenderLog` that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl RenderLog for NoopLog {
    fn render_error(&self, _request_id: &RequestId, _error: &dyn fmt::Display) {}

    fn render_event(&self, _request_id: &RequestId, _phase: &LifecyclePhase, _elapsed: Duration) {}
}

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Log level.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Request ID for correlation.
    pub request_id: String,
    /// Service name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
    /// Microseconds since the render started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_us: Option<u64>,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}] {} req={}", self.level, self.message, self.request_id);

        if let Some(elapsed) = self.elapsed_us {
            s.push_str(&format!(" ({}us)", elapsed));
        }

        if !self.fields.is_empty() {
            s.push_str(" | ");
            let mut fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            fields.sort();
            s.push_str(&fields.join(" "));
        }

        s
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format (for production/log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

/// Structured logger shared by every render.
///
/// Entries carry the request ID of the render they belong to and are
/// emitted through `tracing`, so the installed subscriber decides where
/// they end up.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    service: Option<String>,
    min_level: LogLevel,
    format: LogFormat,
}

impl Default for StructuredLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuredLogger {
    /// Create a new logger.
    pub fn new() -> Self {
        Self {
            service: None,
            min_level: LogLevel::Info,
            format: LogFormat::Json,
        }
    }

    /// Set the service name.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Build the entry that would be logged, or `None` if filtered out.
    pub fn entry(
        &self,
        level: LogLevel,
        request_id: &RequestId,
        message: &str,
        fields: HashMap<String, serde_json::Value>,
        elapsed: Option<Duration>,
    ) -> Option<LogEntry> {
        if level < self.min_level {
            return None;
        }

        Some(LogEntry {
            level,
            message: message.to_string(),
            request_id: request_id.to_string(),
            service: self.service.clone(),
            fields,
            elapsed_us: elapsed.map(|d| d.as_micros() as u64),
        })
    }

    fn log(
        &self,
        level: LogLevel,
        request_id: &RequestId,
        message: &str,
        fields: HashMap<String, serde_json::Value>,
        elapsed: Option<Duration>,
    ) {
        let Some(entry) = self.entry(level, request_id, message, fields, elapsed) else {
            return;
        };

        let output = match self.format {
            LogFormat::Json => entry.to_json(),
            LogFormat::Human => entry.to_human(),
        };

        match level {
            LogLevel::Trace => tracing::trace!(target: "edge_render", "{}", output),
            LogLevel::Debug => tracing::debug!(target: "edge_render", "{}", output),
            LogLevel::Info => tracing::info!(target: "edge_render", "{}", output),
            LogLevel::Warn => tracing::warn!(target: "edge_render", "{}", output),
            LogLevel::Error => tracing::error!(target: "edge_render", "{}", output),
        }
    }
}

impl RenderLog for StructuredLogger {
    fn render_error(&self, request_id: &RequestId, error: &dyn fmt::Display) {
        LogBuilder::new(self, request_id, LogLevel::Error, "render error")
            .field("error", error.to_string())
            .emit();
    }

    fn render_event(&self, request_id: &RequestId, phase: &LifecyclePhase, elapsed: Duration) {
        let level = match phase {
            LifecyclePhase::Aborted => LogLevel::Warn,
            LifecyclePhase::Error(_) => LogLevel::Error,
            _ => LogLevel::Debug,
        };

        LogBuilder::new(self, request_id, level, phase.mark_name())
            .elapsed(elapsed)
            .emit();
    }

    fn render_finalized(&self, request_id: &RequestId, summary: &RenderSummary<'_>) {
        let mut entry = self
            .info_builder(request_id, LifecyclePhase::Finalized.mark_name())
            .field("signal", summary.signal)
            .field_i64("status", i64::from(summary.status))
            .field_bool("degraded", summary.degraded)
            .elapsed(summary.elapsed);
        if let Some(shell) = summary.time_to_shell {
            entry = entry.field_i64("time_to_shell_us", shell.as_micros() as i64);
        }
        entry.emit();
    }
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    request_id: &'a RequestId,
    level: LogLevel,
    message: String,
    fields: HashMap<String, serde_json::Value>,
    elapsed: Option<Duration>,
}

impl<'a> LogBuilder<'a> {
    /// Create a new log builder.
    pub fn new(
        logger: &'a StructuredLogger,
        request_id: &'a RequestId,
        level: LogLevel,
        message: impl Into<String>,
    ) -> Self {
        Self {
            logger,
            request_id,
            level,
            message: message.into(),
            fields: HashMap::new(),
            elapsed: None,
        }
    }

    /// Add a string field.
    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(value.into()));
        self
    }

    /// Add an integer field.
    pub fn field_i64(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a boolean field.
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Attach the time elapsed since the render started.
    pub fn elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    /// Emit the log entry.
    pub fn emit(self) {
        self.logger.log(
            self.level,
            self.request_id,
            &self.message,
            self.fields,
            self.elapsed,
        );
    }
}

impl StructuredLogger {
    /// Start building an info log entry.
    pub fn info_builder<'a>(
        &'a self,
        request_id: &'a RequestId,
        message: impl Into<String>,
    ) -> LogBuilder<'a> {
        LogBuilder::new(self, request_id, LogLevel::Info, message)
    }

}
