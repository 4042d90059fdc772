use serde::{Deserialize, Serialize};

/// Milliseconds on the monotonic clock
pub type Millis = u64;

/// Phase of the single reaction-test session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestState {
    /// Nothing running, waiting for a start request
    Idle,
    /// Armed, indicator still off until the random delay elapses
    ArmedWaiting,
    /// Indicator on, waiting for the trigger
    Lit,
    /// Attempt completed or aborted
    Finished,
}

impl TestState {
    /// Whether a new attempt may be armed from this state
    pub fn accepts_start(self) -> bool {
        matches!(self, TestState::Idle | TestState::Finished)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub time: Millis,
}

/// Inclusive bounds for the randomized arming delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Millis,
    pub max: Millis,
}

impl DelayRange {
    pub fn contains(&self, delay: Millis) -> bool {
        (self.min..=self.max).contains(&delay)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: 5_000,
            max: 15_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_start_only_when_free() {
        assert!(TestState::Idle.accepts_start());
        assert!(TestState::Finished.accepts_start());
        assert!(!TestState::ArmedWaiting.accepts_start());
        assert!(!TestState::Lit.accepts_start());
    }

    #[test]
    fn test_default_delay_range_is_inclusive() {
        let range = DelayRange::default();
        assert!(range.contains(5_000));
        assert!(range.contains(15_000));
        assert!(!range.contains(4_999));
        assert!(!range.contains(15_001));
    }
}
