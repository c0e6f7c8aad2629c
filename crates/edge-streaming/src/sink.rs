//! Shell-first output sink.

use std::fmt::Display;

use edge_core::RenderError;
use futures::{Sink, SinkExt};

/// State of the streaming sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    /// Initial state, shell not yet sent.
    Initial,
    /// Shell has been sent, sections can be streamed.
    ShellSent,
    /// Response has been completed.
    Completed,
}

/// Sink that enforces the shell-first pattern.
///
/// This is generic over the underlying sink type to work with any
/// `Sink<Vec<u8>>` implementation, including a `futures` channel sender
/// feeding a response body.
pub struct StreamingSink<S, E>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    inner: S,
    state: SinkState,
}

impl<S, E> StreamingSink<S, E>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    /// Create a new streaming sink.
    pub fn new(sink: S) -> Self {
        Self {
            inner: sink,
            state: SinkState::Initial,
        }
    }

    /// Send the shell HTML. Must be called before any sections.
    pub async fn send_shell(&mut self, html: &str) -> Result<(), RenderError> {
        if self.state != SinkState::Initial {
            return Err(RenderError::Stream(
                "Shell already sent or sink completed".to_string(),
            ));
        }

        self.inner
            .send(html.as_bytes().to_vec())
            .await
            .map_err(|e| RenderError::Stream(e.to_string()))?;
        self.state = SinkState::ShellSent;

        Ok(())
    }

    /// Send a section's HTML. Shell must be sent first.
    pub async fn send_section(&mut self, html: &str) -> Result<(), RenderError> {
        self.send_raw(html.as_bytes().to_vec()).await
    }

    /// Send raw bytes. Shell must be sent first.
    pub async fn send_raw(&mut self, bytes: Vec<u8>) -> Result<(), RenderError> {
        self.ensure_open()?;

        self.inner
            .send(bytes)
            .await
            .map_err(|e| RenderError::Stream(e.to_string()))
    }

    /// Complete the response and close the underlying sink.
    pub async fn complete(&mut self) -> Result<(), RenderError> {
        self.state = SinkState::Completed;
        self.inner
            .close()
            .await
            .map_err(|e| RenderError::Stream(e.to_string()))
    }

    fn ensure_open(&self) -> Result<(), RenderError> {
        match self.state {
            SinkState::Initial => Err(RenderError::Stream("Shell not sent".to_string())),
            SinkState::Completed => Err(RenderError::Stream("Sink already completed".to_string())),
            SinkState::ShellSent => Ok(()),
        }
    }
}
