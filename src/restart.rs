/// Fixed-interval restarts with a finite budget.
///
/// Once the budget is spent, no more restarts happen and the caller is expected
/// to switch branching to strict max-activity order.
#[derive(Debug)]
pub struct RestartStrategy {
    pub interval: usize,
    pub remaining: usize,
}

impl RestartStrategy {
    pub fn new(interval: usize, budget: usize) -> Self {
        Self {
            interval,
            remaining: budget,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Whether `backtracks` (counted since the last restart) calls for a restart now.
    ///
    /// A single conflict loop may push the counter past the interval, so the
    /// comparison is not an exact match.
    pub fn should_restart(&self, backtracks: usize) -> bool {
        !self.is_exhausted() && self.interval > 0 && backtracks >= self.interval
    }

    /// Spend one restart from the budget.
    pub fn consume(&mut self) {
        debug_assert!(self.remaining > 0);
        self.remaining -= 1;
    }
}
