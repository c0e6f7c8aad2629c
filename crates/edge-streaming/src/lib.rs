//! Streaming render orchestration for server-side rendering.
//!
//! This crate turns a render into an HTTP response:
//! - `StreamingRenderer` - Classifies the client, waits for the right signal, finalizes
//! - `RenderStrategy` - Wait for the shell (browsers) or the full page (agents)
//! - `RenderEngine` - Seam for the engine producing HTML and lifecycle events
//! - `StyleCache` / `StyleExtractor` - Per-request styles merged into the output
//! - `ShellEngine` - Shell-first engine rendering a `Page` of sections

mod engine;
mod page;
mod renderer;
mod response;
mod section;
mod shell;
mod sink;
mod strategy;
mod styles;

pub use engine::*;
pub use page::*;
pub use renderer::*;
pub use response::*;
pub use section::*;
pub use shell::*;
pub use sink::*;
pub use strategy::*;
pub use styles::*;
