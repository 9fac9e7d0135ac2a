use std::time::Duration;

/// Exponential backoff schedule for a generation call.
///
/// Attempt `n` (zero-based) is followed by a wait of `2^n` units when another
/// attempt remains. There is no jitter. Delays too large to represent
/// saturate at `Duration::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    unit: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_UNIT: Duration = Duration::from_secs(1);

    pub fn new(max_attempts: u32, unit: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            unit,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn unit(&self) -> Duration {
        self.unit
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.unit.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }

    /// True when `attempt` is not the last one allowed.
    pub fn has_attempt_after(&self, attempt: u32) -> bool {
        attempt.saturating_add(1) < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_UNIT)
    }
}
