use std::time::{Duration, Instant};

/// Fixed-delay tick scheduling with an explicit cancel handle.
///
/// Nothing fires on its own: the owner polls [`due`](Self::due) from its
/// event loop. Cancelling clears the pending deadline, so no tick is
/// reported after `cancel` returns. Rescheduling is fixed-delay from the
/// moment a tick is taken; a late poll yields a single tick, never a
/// catch-up burst.
pub struct Ticker {
    period: Duration,
    deadline: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
        }
    }

    /// Arm the next tick, `period` from now.
    pub fn schedule(&mut self) {
        self.deadline = Some(Instant::now() + self.period);
    }

    /// Clear any pending tick.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.deadline.is_some()
    }

    /// Take a due tick, rearming for the next one.
    pub fn due(&mut self) -> bool {
        let now = Instant::now();
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_unscheduled_ticker_is_never_due() {
        let mut ticker = Ticker::new(Duration::from_millis(1));
        thread::sleep(Duration::from_millis(5));
        assert!(!ticker.is_scheduled());
        assert!(!ticker.due());
    }

    #[test]
    fn test_due_after_period_and_rearms() {
        let mut ticker = Ticker::new(Duration::from_millis(5));
        ticker.schedule();
        assert!(!ticker.due(), "not due immediately after scheduling");

        thread::sleep(Duration::from_millis(10));
        assert!(ticker.due());
        assert!(ticker.is_scheduled(), "taking a tick rearms the next one");
        assert!(!ticker.due(), "no catch-up burst after a late poll");
    }

    #[test]
    fn test_cancel_clears_pending_tick() {
        let mut ticker = Ticker::new(Duration::from_millis(1));
        ticker.schedule();
        thread::sleep(Duration::from_millis(5));
        ticker.cancel();
        assert!(!ticker.is_scheduled());
        assert!(!ticker.due(), "no tick may be reported after cancel");
    }
}
