//! Retry policy for node execution failures.

use std::time::Duration;

/// How a failed node execution should be retried by `CompiledStateGraph::invoke`.
#[derive(Debug, Clone)]
pub enum RetryPolicy {
    /// Never retry; the first error is returned.
    None,
    /// Retry up to `max_retries` times with exponentially increasing delay,
    /// starting at `initial_delay` and doubling (times `multiplier`) up to
    /// `max_delay`.
    Exponential {
        max_retries: u32,
        initial_delay: Duration,
        max_delay: Duration,
        multiplier: f64,
    },
}

impl RetryPolicy {
    pub fn exponential(
        max_retries: u32,
        initial_delay: Duration,
        max_delay: Duration,
        multiplier: f64,
    ) -> Self {
        Self::Exponential {
            max_retries,
            initial_delay,
            max_delay,
            multiplier,
        }
    }

    /// Delay before the `attempt`-th retry (0-indexed), or `None` if retries
    /// are exhausted.
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        match self {
            RetryPolicy::None => None,
            RetryPolicy::Exponential {
                max_retries,
                initial_delay,
                max_delay,
                multiplier,
            } => {
                if attempt >= *max_retries {
                    return None;
                }
                let scaled = initial_delay.as_secs_f64() * multiplier.powi(attempt as i32);
                let capped = scaled.min(max_delay.as_secs_f64());
                Some(Duration::from_secs_f64(capped))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_never_retries() {
        assert!(RetryPolicy::None.delay_for_attempt(0).is_none());
    }

    #[test]
    fn exponential_grows_and_caps() {
        let policy = RetryPolicy::exponential(
            3,
            Duration::from_millis(100),
            Duration::from_millis(300),
            2.0,
        );
        assert_eq!(policy.delay_for_attempt(0), Some(Duration::from_millis(100)));
        assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_millis(200)));
        assert_eq!(policy.delay_for_attempt(2), Some(Duration::from_millis(300)));
        assert!(policy.delay_for_attempt(3).is_none());
    }
}
