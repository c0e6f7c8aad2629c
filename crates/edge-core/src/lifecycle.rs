//! Render lifecycle tracking.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Lifecycle phases for a single render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Render started, no signal received yet.
    Start,
    /// The shell is ready to stream.
    ShellReady,
    /// Every pending part of the page has resolved.
    AllReady,
    /// The response was handed to the caller.
    Finalized,
    /// The render was force-aborted.
    Aborted,
    /// An error occurred.
    Error(String),
}

impl LifecyclePhase {
    /// Timing mark name recorded for this phase.
    pub fn mark_name(&self) -> &'static str {
        match self {
            Self::Start => "render_start",
            Self::ShellReady => "shell_ready",
            Self::AllReady => "all_ready",
            Self::Finalized => "finalized",
            Self::Aborted => "aborted",
            Self::Error(_) => "error",
        }
    }
}

/// Timing context for observability.
#[derive(Debug, Clone)]
pub struct TimingContext {
    start: Instant,
    marks: HashMap<String, Instant>,
}

impl TimingContext {
    /// Create a new timing context.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            marks: HashMap::new(),
        }
    }

    /// Record a timing mark.
    pub fn mark(&mut self, name: &str) {
        self.marks.insert(name.to_string(), Instant::now());
    }

    /// Record the mark for a lifecycle phase.
    pub fn mark_phase(&mut self, phase: &LifecyclePhase) {
        self.mark(phase.mark_name());
    }

    /// Time from start to a recorded mark.
    pub fn since_start(&self, name: &str) -> Option<Duration> {
        self.marks.get(name).map(|t| t.duration_since(self.start))
    }

    /// Get elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get time until the shell was ready.
    pub fn time_to_shell(&self) -> Option<Duration> {
        self.since_start("shell_ready")
    }
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::new()
    }
}
