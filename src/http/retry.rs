//! Backoff schedule for decrypt calls.

use std::time::Duration;

/// How often and how patiently a failed decrypt call is repeated.
///
/// The defaults allow three attempts, waiting 500ms and then 1s between them.
/// Waits grow by `multiplier` and never exceed `max_delay`.
///
/// ```
/// use dynconf::http::RetryPolicy;
/// use std::time::Duration;
///
/// let waits: Vec<_> = RetryPolicy::new()
///     .with_max_attempts(4)
///     .with_initial_delay(Duration::from_millis(100))
///     .with_max_delay(Duration::from_millis(150))
///     .backoff()
///     .collect();
///
/// assert_eq!(
///     waits,
///     [100, 150, 150].map(Duration::from_millis).to_vec()
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, the first call included.
    pub max_attempts: u32,
    /// Wait before the second attempt.
    pub initial_delay: Duration,
    /// Ceiling for any single wait.
    pub max_delay: Duration,
    /// Growth factor between consecutive waits.
    pub multiplier: f64,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(5);
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;

    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            multiplier: Self::DEFAULT_MULTIPLIER,
        }
    }

    /// # Panics
    ///
    /// Panics if `max_attempts` is zero.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        assert!(max_attempts > 0, "max_attempts must be at least 1");
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// # Panics
    ///
    /// Panics unless `multiplier` is positive and finite.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        assert!(
            multiplier > 0.0 && multiplier.is_finite(),
            "multiplier must be positive and finite"
        );
        self.multiplier = multiplier;
        self
    }

    /// Waits to observe between attempts, one per permitted retry.
    ///
    /// An exhausted iterator means the caller should give up.
    #[must_use]
    pub fn backoff(&self) -> Backoff {
        Backoff {
            next: self.initial_delay.min(self.max_delay),
            remaining: self.max_attempts.saturating_sub(1),
            max_delay: self.max_delay,
            multiplier: self.multiplier,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the waits of one retried call. See [`RetryPolicy::backoff`].
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    remaining: u32,
    max_delay: Duration,
    multiplier: f64,
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next;
        // overflow saturates at the ceiling
        self.next = Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
            .map_or(self.max_delay, |grown| grown.min(self.max_delay));
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Backoff {}
