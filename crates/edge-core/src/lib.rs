//! Core abstractions for the streaming SSR entry.
//!
//! This crate provides the fundamental types shared by the other crates:
//! - `RenderRequest` - Immutable inbound request descriptor
//! - `RenderConfig` - Abort delay, style key and content type
//! - `LifecyclePhase` / `TimingContext` - Render lifecycle tracking
//! - `RenderError` - Failures that reject a render

mod config;
mod context;
mod error;
mod lifecycle;

pub use config::*;
pub use context::*;
pub use error::*;
pub use lifecycle::*;
