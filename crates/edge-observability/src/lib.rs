//! Observability for the streaming SSR entry.
//!
//! This crate provides:
//! - `RenderLog` - Logging capability injected into the renderer
//! - `StructuredLogger` - Structured logging with request context
//! - `RenderSummary` - What a finalized render reports
//! - `NoopLog` - Discards everything

mod logging;

pub use logging::*;

// Re-export RequestId and TimingContext from edge-core for convenience
pub use edge_core::{RequestId, TimingContext};
