//! Timeout configuration for data loads.

use std::time::Duration;

/// Timeout configuration for a data load.
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Timeout applied to each individual attempt.
    pub per_attempt: Duration,
    /// Total budget across all attempts, including backoff sleeps.
    pub total: Duration,
}

impl TimeoutConfig {
    /// Create a new timeout configuration.
    pub fn new(per_attempt: Duration, total: Duration) -> Self {
        Self { per_attempt, total }
    }

    /// Create from a single total budget, splitting per-attempt at half.
    pub fn from_total(total: Duration) -> Self {
        Self {
            per_attempt: total / 2,
            total,
        }
    }

    /// Create with aggressive timeouts (latency-critical boundaries).
    pub fn aggressive() -> Self {
        Self {
            per_attempt: Duration::from_millis(100),
            total: Duration::from_millis(250),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            per_attempt: Duration::from_millis(500),
            total: Duration::from_millis(2000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_total_splits_per_attempt() {
        let t = TimeoutConfig::from_total(Duration::from_millis(800));
        assert_eq!(t.per_attempt, Duration::from_millis(400));
        assert_eq!(t.total, Duration::from_millis(800));
    }

    #[test]
    fn test_aggressive_is_tighter_than_default() {
        assert!(TimeoutConfig::aggressive().total < TimeoutConfig::default().total);
    }
}
