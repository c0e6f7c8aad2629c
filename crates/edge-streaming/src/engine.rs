//! Seam between the renderer and the engine that produces HTML.

use std::pin::Pin;

use edge_core::RenderRequest;
use futures::channel::mpsc;
use futures::future::AbortHandle;
use futures::Stream;

use crate::styles::StyleScope;

/// Streamed response body.
pub type BodyStream = Pin<Box<dyn Stream<Item = Vec<u8>> + Send>>;

/// Lifecycle signals reported by a rendering engine.
#[derive(Debug)]
pub enum RenderEvent {
    /// The shell can be streamed.
    ShellReady,
    /// Every pending part of the page has resolved.
    AllReady,
    /// The render failed before producing usable output.
    ShellError(anyhow::Error),
    /// A defect occurred after output may already have been committed.
    Error(anyhow::Error),
}

/// A render started by an engine.
///
/// The event channel closes once the engine has nothing more to render.
/// The body is lazy: output reaches the client only after the renderer
/// hands it over in the finalized response.
pub struct RenderTask {
    /// Lifecycle signals, in order.
    pub events: mpsc::UnboundedReceiver<RenderEvent>,
    /// Raw HTML output.
    pub body: BodyStream,
    /// Stops the render and any further output.
    pub abort: AbortHandle,
}

impl std::fmt::Debug for RenderTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTask")
            .field("aborted", &self.abort.is_aborted())
            .finish_non_exhaustive()
    }
}

/// Engine that renders a context into HTML.
///
/// Implementations must return promptly; the actual rendering runs in the
/// background and is observed through the returned task.
pub trait RenderEngine<C>: Send + Sync {
    /// Begin rendering `context` for `request`, registering styles in `styles`.
    fn start(&self, context: C, request: &RenderRequest, styles: StyleScope) -> RenderTask;
}
