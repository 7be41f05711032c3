/// Counts consecutive polls in which the message count did not grow.
#[derive(Clone, Debug)]
pub struct StabilityTracker {
    last_count: usize,
    stable_polls: u32,
    threshold: u32,
}

impl StabilityTracker {
    pub fn new(threshold: u32) -> Self {
        Self {
            last_count: 0,
            stable_polls: 0,
            threshold: threshold.max(1),
        }
    }

    /// Record one poll. Returns true once `threshold` consecutive polls saw
    /// no growth.
    pub fn observe(&mut self, count: usize) -> bool {
        if count > self.last_count {
            self.last_count = count;
            self.stable_polls = 0;
        } else {
            self.stable_polls += 1;
        }
        self.is_stable()
    }

    pub fn is_stable(&self) -> bool {
        self.stable_polls >= self.threshold
    }

    pub fn stable_polls(&self) -> u32 {
        self.stable_polls
    }

    pub fn last_count(&self) -> usize {
        self.last_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_after_exactly_threshold_quiet_polls() {
        let mut tracker = StabilityTracker::new(5);
        assert!(!tracker.observe(2));
        for _ in 0..4 {
            assert!(!tracker.observe(2));
        }
        assert!(tracker.observe(2));
    }

    #[test]
    fn growth_resets_the_counter() {
        let mut tracker = StabilityTracker::new(3);
        tracker.observe(1);
        tracker.observe(1);
        tracker.observe(1);
        assert_eq!(tracker.stable_polls(), 2);
        assert!(!tracker.observe(4));
        assert_eq!(tracker.stable_polls(), 0);
        assert_eq!(tracker.last_count(), 4);
    }

    #[test]
    fn shrinking_count_does_not_reset() {
        let mut tracker = StabilityTracker::new(2);
        tracker.observe(3);
        assert!(!tracker.observe(1));
        assert!(tracker.observe(2));
    }
}
