//! Streaming render orchestration.

use std::sync::Arc;

use edge_core::{LifecyclePhase, RenderConfig, RenderError, RenderRequest, RequestId, TimingContext};
use edge_observability::{RenderLog, RenderSummary, StructuredLogger};
use edge_security::{AgentClassifier, UserAgentPatterns};
use futures::channel::mpsc;
use futures::future::{AbortHandle, Abortable};
use futures::StreamExt;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};
use tokio::time::Instant;

use crate::engine::{RenderEngine, RenderEvent};
use crate::response::RenderedResponse;
use crate::strategy::RenderStrategy;
use crate::styles::{InlineStyles, StyleCache, StyleExtractor};

/// Turns a render into a response.
///
/// Each call to [`handle`](Self::handle) owns its own style cache, error
/// flag and abort timer; nothing is shared between requests except the
/// injected collaborators.
pub struct StreamingRenderer<E> {
    engine: E,
    classifier: Arc<dyn AgentClassifier>,
    extractor: Arc<dyn StyleExtractor>,
    log: Arc<dyn RenderLog>,
    config: RenderConfig,
}

impl<E> StreamingRenderer<E> {
    /// Create a renderer with default collaborators and configuration.
    pub fn new(engine: E) -> Self {
        Self::from_config(engine, RenderConfig::default())
    }

    /// Create a renderer whose classifier honours the configured patterns.
    pub fn from_config(engine: E, config: RenderConfig) -> Self {
        Self {
            engine,
            classifier: Arc::new(UserAgentPatterns::from_config(&config)),
            extractor: Arc::new(InlineStyles),
            log: Arc::new(StructuredLogger::new()),
            config,
        }
    }

    /// Replace the automated-agent classifier.
    pub fn with_classifier(mut self, classifier: impl AgentClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Replace the style extraction stage.
    pub fn with_extractor(mut self, extractor: impl StyleExtractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    /// Replace the logging sink.
    pub fn with_log(mut self, log: Arc<dyn RenderLog>) -> Self {
        self.log = log;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `context` for `request`.
    ///
    /// Resolves once the strategy's primary signal arrives, with `headers`
    /// returned carrying the configured content type and `status` replaced
    /// by 500 if a mid-stream error was reported first. Rejects if the
    /// shell fails, if the abort delay elapses first, or if the engine
    /// finishes without the primary signal. An invalid configuration is
    /// rejected before the engine starts.
    pub async fn handle<C>(
        &self,
        request: &RenderRequest,
        status: StatusCode,
        mut headers: HeaderMap,
        context: C,
    ) -> Result<RenderedResponse, RenderError>
    where
        E: RenderEngine<C>,
    {
        self.config.validate()?;
        let content_type = HeaderValue::from_str(&self.config.content_type)
            .map_err(|e| RenderError::Config(format!("invalid content type: {}", e)))?;

        let strategy = RenderStrategy::for_agent(self.classifier.classify(request));
        let cache = StyleCache::new(&self.config.style_key);
        let request_id = request.request_id.clone();
        let mut timing = TimingContext::new();
        self.phase(&request_id, &mut timing, LifecyclePhase::Start);

        let task = self.engine.start(context, request, cache.scope());
        let delay = self.config.abort_delay();
        let deadline = Instant::now() + delay;

        let (body_abort, body_registration) = AbortHandle::new_pair();
        let abort = RenderAbort {
            engine: task.abort,
            body: body_abort,
        };
        let mut events = task.events;
        let mut did_error = false;

        loop {
            let event = match tokio::time::timeout_at(deadline, events.next()).await {
                Ok(event) => event,
                Err(_) => {
                    abort.abort();
                    self.phase(&request_id, &mut timing, LifecyclePhase::Aborted);
                    return Err(RenderError::Timeout(delay));
                }
            };

            match event {
                Some(RenderEvent::ShellError(err)) => {
                    abort.abort();
                    self.phase(&request_id, &mut timing, LifecyclePhase::Error(err.to_string()));
                    return Err(RenderError::Shell(err));
                }
                Some(RenderEvent::Error(err)) => {
                    did_error = true;
                    self.log.render_error(&request_id, &err);
                }
                Some(event) if strategy.is_primary(&event) => {
                    self.phase(&request_id, &mut timing, phase_for(&event));
                    break;
                }
                Some(event) => {
                    self.phase(&request_id, &mut timing, phase_for(&event));
                }
                None => {
                    abort.abort();
                    return Err(RenderError::Incomplete);
                }
            }
        }

        let raw = Box::pin(Abortable::new(task.body, body_registration));
        let body = self.extractor.extract(&cache, raw);
        headers.insert(CONTENT_TYPE, content_type);
        let status = if did_error {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            status
        };

        timing.mark_phase(&LifecyclePhase::Finalized);
        self.log.render_finalized(
            &request_id,
            &RenderSummary {
                signal: strategy.primary_signal(),
                status: status.as_u16(),
                degraded: did_error,
                time_to_shell: timing.time_to_shell(),
                elapsed: timing.elapsed(),
            },
        );
        tokio::spawn(watch_render(
            events,
            abort,
            deadline,
            request_id,
            timing,
            Arc::clone(&self.log),
        ));

        Ok(RenderedResponse {
            status,
            headers,
            body,
            strategy,
        })
    }

    fn phase(&self, request_id: &RequestId, timing: &mut TimingContext, phase: LifecyclePhase) {
        timing.mark_phase(&phase);
        self.log.render_event(request_id, &phase, timing.elapsed());
    }
}

/// Aborts both the engine and the body handed to the caller.
struct RenderAbort {
    engine: AbortHandle,
    body: AbortHandle,
}

impl RenderAbort {
    fn abort(&self) {
        self.engine.abort();
        self.body.abort();
    }
}

fn phase_for(event: &RenderEvent) -> LifecyclePhase {
    match event {
        RenderEvent::ShellReady => LifecyclePhase::ShellReady,
        RenderEvent::AllReady => LifecyclePhase::AllReady,
        RenderEvent::ShellError(err) | RenderEvent::Error(err) => {
            LifecyclePhase::Error(err.to_string())
        }
    }
}

/// Keeps logging errors after finalization and aborts the render if it is
/// still running at the deadline.
async fn watch_render(
    mut events: mpsc::UnboundedReceiver<RenderEvent>,
    abort: RenderAbort,
    deadline: Instant,
    request_id: RequestId,
    mut timing: TimingContext,
    log: Arc<dyn RenderLog>,
) {
    let timer = tokio::time::sleep_until(deadline);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            _ = &mut timer => {
                abort.abort();
                timing.mark_phase(&LifecyclePhase::Aborted);
                log.render_event(&request_id, &LifecyclePhase::Aborted, timing.elapsed());
                return;
            }
            event = events.next() => {
                match event {
                    Some(RenderEvent::Error(err)) | Some(RenderEvent::ShellError(err)) => {
                        log.render_error(&request_id, &err);
                    }
                    Some(event) => {
                        let phase = phase_for(&event);
                        timing.mark_phase(&phase);
                        log.render_event(&request_id, &phase, timing.elapsed());
                    }
                    None => return,
                }
            }
        }
    }
}
