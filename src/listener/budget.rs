use std::time::Duration;

use tokio::time::Instant;

/// Decides whether enough of the batch's visibility window remains to
/// start one more message.
///
/// The whole batch runs against a single lease granted at fetch time. As
/// the loop works through the batch, this tracker records the longest gap
/// observed between consecutive checks and refuses the next message once
/// the remaining window no longer covers a repeat of that worst case.
/// Handing out a message that cannot finish in time would let its lease
/// lapse mid-processing and trigger a concurrent redelivery.
///
/// The estimator only ever tightens: one slow message raises the bar for
/// every later message in the batch, even if those would have been fast.
/// Deferred messages keep their original, never-extended lease and simply
/// reappear in a later fetch.
#[derive(Debug)]
pub(crate) struct LeaseBudget {
    visibility_timeout: Duration,
    batch_started_at: Option<Instant>,
    last_finished_at: Option<Instant>,
    longest_gap: Duration,
}

impl LeaseBudget {
    pub(crate) fn new(visibility_timeout: Duration) -> Self {
        LeaseBudget {
            visibility_timeout,
            batch_started_at: None,
            last_finished_at: None,
            longest_gap: Duration::ZERO,
        }
    }

    /// Returns whether the next message may be started at `now`.
    ///
    /// Also folds the gap since the previous call into the worst-case
    /// estimate, so this must be called exactly once per message, in
    /// order. The first call after a [`reset`](Self::reset) starts the
    /// batch clock and always passes for a non-zero visibility timeout.
    pub(crate) fn has_time_remaining(&mut self, now: Instant) -> bool {
        let batch_started_at = *self.batch_started_at.get_or_insert(now);
        let last_finished_at = self.last_finished_at.unwrap_or(now);

        let gap = now.saturating_duration_since(last_finished_at);
        if gap > self.longest_gap {
            self.longest_gap = gap;
        }
        // Baseline for the next call.
        self.last_finished_at = Some(now);

        let elapsed = now.saturating_duration_since(batch_started_at);
        match self.visibility_timeout.checked_sub(elapsed) {
            Some(remaining) => remaining > self.longest_gap,
            None => false,
        }
    }

    /// Clears all timing state for the next batch.
    pub(crate) fn reset(&mut self) {
        self.batch_started_at = None;
        self.last_finished_at = None;
        self.longest_gap = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn first_check_of_a_batch_always_passes() {
        let mut budget = LeaseBudget::new(secs(10));

        assert!(budget.has_time_remaining(Instant::now()));
    }

    #[test]
    fn first_check_fails_for_a_zero_visibility_timeout() {
        let mut budget = LeaseBudget::new(Duration::ZERO);

        assert!(!budget.has_time_remaining(Instant::now()));
    }

    #[test]
    fn stops_once_the_worst_case_exceeds_the_remaining_window() {
        let mut budget = LeaseBudget::new(secs(10));
        let t0 = Instant::now();

        assert!(budget.has_time_remaining(t0));
        // 1 s gap, 9 s of the window left.
        assert!(budget.has_time_remaining(t0 + secs(1)));
        // 8 s gap, 1 s left: 1 > 8 fails.
        assert!(!budget.has_time_remaining(t0 + secs(9)));
    }

    #[test]
    fn one_slow_gap_raises_the_bar_for_later_fast_messages() {
        let mut budget = LeaseBudget::new(secs(30));
        let t0 = Instant::now();

        assert!(budget.has_time_remaining(t0));
        // Slow message: 10 s gap, 20 s left.
        assert!(budget.has_time_remaining(t0 + secs(10)));
        // Fast message: 2 s gap, but the worst case stays at 10 s.
        assert!(budget.has_time_remaining(t0 + secs(12)));
        // 9 s left can no longer cover the 10 s worst case.
        assert!(!budget.has_time_remaining(t0 + secs(21)));
    }

    #[test]
    fn fails_once_the_window_itself_is_exhausted() {
        let mut budget = LeaseBudget::new(secs(10));
        let t0 = Instant::now();

        assert!(budget.has_time_remaining(t0));
        assert!(!budget.has_time_remaining(t0 + secs(11)));
    }

    #[test]
    fn reset_restores_the_first_call_guarantee() {
        let mut budget = LeaseBudget::new(secs(10));
        let t0 = Instant::now();

        assert!(budget.has_time_remaining(t0));
        assert!(!budget.has_time_remaining(t0 + secs(9)));

        budget.reset();

        // A fresh batch measures from its own origin, however late.
        assert!(budget.has_time_remaining(t0 + secs(60)));
    }
}
