//! Double-tap suppression for press handlers.

use std::time::{Duration, Instant};

/// Window during which repeated presses are dropped.
pub const DOUBLE_TAP_DELAY: Duration = Duration::from_millis(750);

/// Lets one press through, then drops presses until the window has passed.
#[derive(Clone, Debug)]
pub struct TapGuard {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl Default for TapGuard {
    fn default() -> Self {
        Self::new(DOUBLE_TAP_DELAY)
    }
}

impl TapGuard {
    pub fn new(window: Duration) -> Self {
        Self { window, last_accepted: None }
    }

    /// Record a press at `now`; returns whether it should be handled.
    pub fn allow(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }

    /// Run `f` if the press at `now` is allowed.
    pub fn guard<R>(&mut self, now: Instant, f: impl FnOnce() -> R) -> Option<R> {
        if self.allow(now) { Some(f()) } else { None }
    }
}
