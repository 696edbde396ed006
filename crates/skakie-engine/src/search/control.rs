//! Wall-clock budget for iterative deepening.

use std::time::{Duration, Instant};

/// Decides whether another depth may start.
///
/// The budget is only consulted between depths, so a depth that is already
/// running always completes.
#[derive(Debug, Clone)]
pub struct SearchClock {
    start: Instant,
    budget: Option<Duration>,
}

impl SearchClock {
    /// Start the clock now. `None` means no limit.
    pub fn start(budget: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    /// `true` once the budget has been used up.
    pub fn should_stop_iterating(&self) -> bool {
        self.budget.is_some_and(|budget| self.elapsed() >= budget)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_never_stops() {
        let clock = SearchClock::start(None);
        assert!(!clock.should_stop_iterating());
    }

    #[test]
    fn tiny_budget_stops() {
        let clock = SearchClock::start(Some(Duration::from_nanos(1)));
        std::thread::sleep(Duration::from_millis(1));
        assert!(clock.should_stop_iterating());
    }

    #[test]
    fn generous_budget_continues() {
        let clock = SearchClock::start(Some(Duration::from_secs(3600)));
        assert!(!clock.should_stop_iterating());
    }
}
