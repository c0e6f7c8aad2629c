//! Which lifecycle signal finalizes the response.

use crate::engine::RenderEvent;

/// Finalization strategy for a render.
///
/// Browsers get the response as soon as the shell is ready so they can
/// start painting; automated agents get it once everything has resolved
/// so they see the complete document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStrategy {
    /// Finalize when the shell is ready.
    #[default]
    WaitForShell,
    /// Finalize when the whole page is ready.
    WaitForFull,
}

impl RenderStrategy {
    /// Pick the strategy for a classified client.
    pub fn for_agent(is_automated: bool) -> Self {
        if is_automated {
            Self::WaitForFull
        } else {
            Self::WaitForShell
        }
    }

    /// Check if an event finalizes the response under this strategy.
    ///
    /// A fully-ready page implies a ready shell, so `AllReady` finalizes
    /// either strategy.
    pub fn is_primary(&self, event: &RenderEvent) -> bool {
        match self {
            Self::WaitForShell => matches!(event, RenderEvent::ShellReady | RenderEvent::AllReady),
            Self::WaitForFull => matches!(event, RenderEvent::AllReady),
        }
    }

    /// Name of the signal this strategy waits for.
    pub fn primary_signal(&self) -> &'static str {
        match self {
            Self::WaitForShell => "shell_ready",
            Self::WaitForFull => "all_ready",
        }
    }
}
