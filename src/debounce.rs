use std::time::{Duration, Instant};

/// Quiet period before a typed search term reaches the board.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Holds the latest value until no new value has arrived for `quiet`.
///
/// Every `push` resets the deadline; `poll` hands the value out once the
/// deadline has passed. Time is passed in so callers (and tests) drive it.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
