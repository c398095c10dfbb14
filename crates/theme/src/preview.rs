//! Temporary theme previews that revert on their own.
//!
//! The controller holds at most one session and never spawns a timer.
//! Expiry is checked against a [`Clock`] whenever the owner polls, so a
//! replaced or cancelled preview cannot fire late.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

pub const DEFAULT_PREVIEW_DURATION: Duration = Duration::from_secs(10);

/// Upper bound on a single preview, keeps deadline arithmetic finite.
pub const MAX_PREVIEW_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|p| p.into_inner());
        *offset += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(|p| p.into_inner());
        self.origin + offset
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSession {
    pub theme_id: String,
    pub expires_at: Instant,
}

impl PreviewSession {
    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    Idle,
    Previewing { theme_id: String, remaining: Duration },
}

#[derive(Debug, Default)]
pub struct PreviewController {
    session: Option<PreviewSession>,
}

impl PreviewController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin previewing `theme_id`, replacing any running preview.
    /// Returns the session that was replaced.
    pub fn start(
        &mut self,
        theme_id: impl Into<String>,
        duration: Duration,
        now: Instant,
    ) -> Option<PreviewSession> {
        let duration = duration.min(MAX_PREVIEW_DURATION);
        let session = PreviewSession {
            theme_id: theme_id.into(),
            expires_at: now + duration,
        };
        debug!(id = %session.theme_id, ?duration, "Preview started");
        self.session.replace(session)
    }

    pub fn cancel(&mut self) -> Option<PreviewSession> {
        let cancelled = self.session.take();
        if let Some(session) = &cancelled {
            debug!(id = %session.theme_id, "Preview cancelled");
        }
        cancelled
    }

    /// Drop the session if its deadline has passed. Returns the expired one.
    pub fn poll(&mut self, now: Instant) -> Option<PreviewSession> {
        if self.session.as_ref().is_some_and(|s| s.is_expired(now)) {
            let expired = self.session.take();
            if let Some(session) = &expired {
                debug!(id = %session.theme_id, "Preview expired");
            }
            return expired;
        }
        None
    }

    /// The live session, after expiring it if due.
    pub fn active(&mut self, now: Instant) -> Option<&PreviewSession> {
        self.poll(now);
        self.session.as_ref()
    }

    pub fn state(&mut self, now: Instant) -> PreviewState {
        match self.active(now) {
            Some(session) => PreviewState::Previewing {
                theme_id: session.theme_id.clone(),
                remaining: session.remaining(now),
            },
            None => PreviewState::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_preview_expires_at_deadline() {
        let clock = ManualClock::new();
        let mut controller = PreviewController::new();
        controller.start("default-dark", 10 * SECOND, clock.now());

        clock.advance(9 * SECOND);
        assert_eq!(
            controller.state(clock.now()),
            PreviewState::Previewing {
                theme_id: "default-dark".to_string(),
                remaining: SECOND,
            }
        );

        clock.advance(SECOND);
        let expired = controller.poll(clock.now()).unwrap();
        assert_eq!(expired.theme_id, "default-dark");
        assert_eq!(controller.state(clock.now()), PreviewState::Idle);
    }

    #[test]
    fn test_new_preview_replaces_old_deadline() {
        let clock = ManualClock::new();
        let mut controller = PreviewController::new();
        controller.start("a", 10 * SECOND, clock.now());

        clock.advance(8 * SECOND);
        let replaced = controller.start("b", 10 * SECOND, clock.now()).unwrap();
        assert_eq!(replaced.theme_id, "a");

        // the first deadline passes without effect
        clock.advance(5 * SECOND);
        assert_eq!(controller.active(clock.now()).unwrap().theme_id, "b");

        clock.advance(5 * SECOND);
        assert!(controller.active(clock.now()).is_none());
    }

    #[test]
    fn test_cancel_clears_session() {
        let clock = ManualClock::new();
        let mut controller = PreviewController::new();
        assert!(controller.cancel().is_none());

        controller.start("a", 10 * SECOND, clock.now());
        assert_eq!(controller.cancel().unwrap().theme_id, "a");

        clock.advance(20 * SECOND);
        assert!(controller.poll(clock.now()).is_none());
    }

    #[test]
    fn test_zero_duration_expires_immediately() {
        let clock = ManualClock::new();
        let mut controller = PreviewController::new();
        controller.start("a", Duration::ZERO, clock.now());
        assert!(controller.active(clock.now()).is_none());
    }

    #[test]
    fn test_huge_duration_is_capped() {
        let clock = ManualClock::new();
        let mut controller = PreviewController::new();
        controller.start("a", Duration::MAX, clock.now());
        let session = controller.active(clock.now()).unwrap();
        assert_eq!(session.remaining(clock.now()), MAX_PREVIEW_DURATION);
    }
}
