//! Quiet-period debounce expressed as an explicit state machine.
//!
//! Time is passed in by the caller, so the same machine can be driven by a
//! UI tick loop, by an async timer task or by a test that fakes the clock.
//! Every schedule bumps a generation counter; a timer that fires for an older
//! generation commits nothing.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending,
}

/// Identifies one arming of the timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
    generation: Generation,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    quiet_period: Duration,
    next_generation: u64,
    pending: Option<Pending<T>>,
    disposed: bool,
}

impl<T> Debouncer<T> {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            next_generation: 0,
            pending: None,
            disposed: false,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn state(&self) -> DebounceState {
        if self.pending.is_some() {
            DebounceState::Pending
        } else {
            DebounceState::Idle
        }
    }

    pub fn pending_value(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Arms the timer for `value`, replacing whatever was pending.
    ///
    /// Returns `None` once the debouncer has been disposed.
    pub fn schedule(&mut self, value: T, now: Instant) -> Option<Generation> {
        if self.disposed {
            return None;
        }
        self.next_generation += 1;
        let generation = Generation(self.next_generation);
        self.pending = Some(Pending {
            value,
            deadline: now + self.quiet_period,
            generation,
        });
        Some(generation)
    }

    /// Commits the pending value if its quiet period has fully elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if due {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Commits the pending value if `generation` is still the latest arming.
    pub fn fire(&mut self, generation: Generation) -> Option<T> {
        let current = self
            .pending
            .as_ref()
            .is_some_and(|p| p.generation == generation);
        if current {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Cancels the pending value and refuses any further scheduling.
    pub fn dispose(&mut self) {
        self.cancel();
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(500);

    #[test]
    fn single_value_commits_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);
        debouncer.schedule("x", start);

        assert_eq!(debouncer.poll(start + Duration::from_millis(499)), None);
        assert_eq!(debouncer.state(), DebounceState::Pending);
        assert_eq!(debouncer.poll(start + QUIET), Some("x"));
        assert_eq!(debouncer.state(), DebounceState::Idle);
        assert_eq!(debouncer.poll(start + QUIET * 2), None);
    }

    #[test]
    fn rescheduling_restarts_the_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);
        debouncer.schedule("a", start);
        debouncer.schedule("ab", start + Duration::from_millis(300));

        assert_eq!(debouncer.poll(start + QUIET), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(800)),
            Some("ab")
        );
    }

    #[test]
    fn stale_generation_never_fires() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);
        let first = debouncer.schedule("a", start).unwrap();
        let second = debouncer.schedule("ab", start).unwrap();

        assert!(second > first);
        assert_eq!(debouncer.fire(first), None);
        assert_eq!(debouncer.fire(second), Some("ab"));
        assert_eq!(debouncer.fire(second), None);
    }

    #[test]
    fn dispose_drops_pending_value_and_refuses_new_ones() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);
        let generation = debouncer.schedule("a", start).unwrap();
        debouncer.dispose();

        assert_eq!(debouncer.fire(generation), None);
        assert_eq!(debouncer.poll(start + QUIET), None);
        assert_eq!(debouncer.schedule("b", start), None);
        assert_eq!(debouncer.state(), DebounceState::Idle);
    }
}
