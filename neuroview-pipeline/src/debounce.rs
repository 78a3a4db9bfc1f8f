//! Debounced parameter recomputation
//!
//! Slider drags produce a burst of parameter changes, and rebuilding
//! the pipeline for each one would stall the UI thread. A
//! [`Debouncer`] holds the most recent request and releases it only
//! after a quiet interval with no newer submission; submitting again
//! cancels the pending request outright. The clock is injected by the
//! caller, so scheduling is deterministic and needs no threads or
//! sleeps.

use std::time::{Duration, Instant};

/// Cancel-and-replace scheduler for pending recompute requests.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet_interval: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet_interval: Duration) -> Self {
        Self {
            quiet_interval,
            pending: None,
        }
    }

    /// Schedule a request, superseding any pending one. The quiet
    /// interval restarts from `now`.
    pub fn submit(&mut self, request: T, now: Instant) {
        self.pending = Some((request, now + self.quiet_interval));
    }

    /// Take the pending request if its quiet interval has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = match &self.pending {
            Some((_, due)) => *due,
            None => return None,
        };
        if now >= due {
            self.pending.take().map(|(request, _)| request)
        } else {
            None
        }
    }

    /// Drop the pending request, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(request, _)| request)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(400);

    #[test]
    fn test_poll_before_quiet_interval_returns_nothing() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.submit(42, t0);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.poll(t0), None);
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(399)), None);
        assert!(debouncer.is_pending());
    }

    #[test]
    fn test_poll_after_quiet_interval_releases_request() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.submit(42, t0);
        assert_eq!(debouncer.poll(t0 + QUIET), Some(42));
        assert!(!debouncer.is_pending());
        // Released requests do not repeat
        assert_eq!(debouncer.poll(t0 + QUIET * 2), None);
    }

    #[test]
    fn test_newer_submission_supersedes_older() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.submit(1, t0);
        let t1 = t0 + Duration::from_millis(300);
        debouncer.submit(2, t1);

        // The first request's deadline has passed, but it was replaced
        // and the interval restarted
        assert_eq!(debouncer.poll(t0 + QUIET), None);
        assert_eq!(debouncer.poll(t1 + QUIET), Some(2));
    }

    #[test]
    fn test_cancel_drops_pending_request() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.submit(7, t0);
        assert_eq!(debouncer.cancel(), Some(7));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(t0 + QUIET), None);
    }
}
