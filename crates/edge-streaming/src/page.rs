//! Shell-first engine rendering a page of sections.

use std::future::Future;

use edge_core::RenderRequest;
use futures::channel::mpsc;
use futures::future::{AbortHandle, Abortable, BoxFuture};
use futures::stream::FuturesOrdered;
use futures::{FutureExt, StreamExt};

use crate::engine::{RenderEngine, RenderEvent, RenderTask};
use crate::section::Section;
use crate::shell::Shell;
use crate::sink::StreamingSink;
use crate::styles::StyleScope;

type ShellFn = Box<dyn FnOnce(StyleScope) -> BoxFuture<'static, anyhow::Result<Shell>> + Send>;
type SectionFn = Box<dyn FnOnce(StyleScope) -> BoxFuture<'static, anyhow::Result<String>> + Send>;

/// A page: a shell followed by sections rendered in document order.
///
/// Both the shell and the sections receive the request's `StyleScope` so
/// they can register the styles their markup references.
pub struct Page {
    shell: ShellFn,
    sections: Vec<(Section, SectionFn)>,
}

impl Page {
    /// Create a page around a ready shell.
    pub fn new(shell: Shell) -> Self {
        Self::with_shell(move |_| async move { Ok(shell) })
    }

    /// Create a page whose shell is produced asynchronously and may fail.
    pub fn with_shell<F, Fut>(shell: F) -> Self
    where
        F: FnOnce(StyleScope) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<Shell>> + Send + 'static,
    {
        Self {
            shell: Box::new(move |styles| shell(styles).boxed()),
            sections: Vec::new(),
        }
    }

    /// Append a section.
    pub fn section<F, Fut>(mut self, section: Section, render: F) -> Self
    where
        F: FnOnce(StyleScope) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        self.sections
            .push((section, Box::new(move |styles| render(styles).boxed())));
        self
    }

    /// Append a section with static HTML.
    pub fn static_section(self, name: &str, html: impl Into<String>) -> Self {
        let html = html.into();
        self.section(Section::new(name), move |_| async move { Ok(html) })
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the page has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Engine that streams a `Page`: shell opening, sections, shell closing.
///
/// Signals `ShellReady` once the shell opening is written and `AllReady`
/// after the closing. A failed shell raises `ShellError` and writes
/// nothing. A failed or timed-out section raises `Error` and writes its
/// fallback, if any. Must be started from within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellEngine;

impl RenderEngine<Page> for ShellEngine {
    fn start(&self, page: Page, _request: &RenderRequest, styles: StyleScope) -> RenderTask {
        let (events, event_rx) = mpsc::unbounded();
        let (body_tx, body_rx) = mpsc::unbounded::<Vec<u8>>();
        let (abort, registration) = AbortHandle::new_pair();

        let render = render_page(page, styles, StreamingSink::new(body_tx), events);
        tokio::spawn(Abortable::new(render, registration));

        RenderTask {
            events: event_rx,
            body: Box::pin(body_rx),
            abort,
        }
    }
}

async fn render_page(
    page: Page,
    styles: StyleScope,
    mut sink: StreamingSink<mpsc::UnboundedSender<Vec<u8>>, mpsc::SendError>,
    events: mpsc::UnboundedSender<RenderEvent>,
) {
    // Send failures mean the renderer stopped listening; keep rendering so
    // the body still completes.
    let signal = |event: RenderEvent| {
        let _ = events.unbounded_send(event);
    };

    let shell = match (page.shell)(styles.clone()).await {
        Ok(shell) => shell,
        Err(err) => {
            signal(RenderEvent::ShellError(err));
            return;
        }
    };

    if let Err(err) = sink.send_shell(&shell.render_opening()).await {
        signal(RenderEvent::ShellError(err.into()));
        return;
    }
    signal(RenderEvent::ShellReady);

    let mut pending: FuturesOrdered<_> = page
        .sections
        .into_iter()
        .map(|(section, render)| {
            let fut = render(styles.clone());
            async move {
                let result = match section.timeout {
                    Some(timeout) => match tokio::time::timeout(timeout, fut).await {
                        Ok(result) => result,
                        Err(_) => Err(anyhow::anyhow!("timed out after {:?}", timeout)),
                    },
                    None => fut.await,
                };
                (section, result)
            }
        })
        .collect();

    while let Some((section, result)) = pending.next().await {
        let html = match result {
            Ok(html) => Some(html),
            Err(err) => {
                signal(RenderEvent::Error(
                    err.context(format!("section '{}' failed", section.name)),
                ));
                section.fallback.clone()
            }
        };

        if let Some(html) = html {
            if let Err(err) = sink.send_section(&html).await {
                signal(RenderEvent::Error(err.into()));
                return;
            }
        }
    }

    let closed = match sink.send_raw(shell.render_closing().into_bytes()).await {
        Ok(()) => sink.complete().await,
        Err(err) => Err(err),
    };
    if let Err(err) = closed {
        signal(RenderEvent::Error(err.into()));
        return;
    }
    signal(RenderEvent::AllReady);
}
