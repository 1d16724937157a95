//! Bounded retry with exponential backoff.
//!
//! [`RetryCaller::call`] runs an operation up to [`RetryPolicy::max_attempts`]
//! times, sleeping `base_delay * 2^(i-1)` before attempt `i`. How the sequence
//! ends depends on how the operation's error classifies itself:
//!
//! - [`FailureKind::Unavailable`] on the final attempt yields
//!   [`Completion::Degraded`], letting the caller substitute a friendly
//!   fallback instead of an error.
//! - [`FailureKind::Fault`] on the final attempt yields
//!   [`RetryError::Exhausted`] carrying the last error.
//! - [`FailureKind::Fatal`] ends the sequence at once with [`RetryError::Fatal`].

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use thiserror::Error;
use tokio_retry::RetryIf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);
pub const BACKOFF_FACTOR: u32 = 2;
/// Longest single wait. Later waits saturate here instead of overflowing.
pub const MAX_DELAY: Duration = Duration::from_secs(u32::MAX as u64);

/// How a failed attempt should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The remote answered with a non-success status.
    Unavailable,
    /// The call itself failed (transport, decoding).
    Fault,
    /// Retrying cannot help.
    Fatal,
}

/// Classifier consulted after every failed attempt.
pub trait Classify {
    fn failure_kind(&self) -> FailureKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay to wait before attempt `attempt` (0-based). The first attempt
    /// and any attempt past the limit have none. Saturates at [`MAX_DELAY`].
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }
        let delay = BACKOFF_FACTOR
            .checked_pow(attempt - 1)
            .and_then(|multiplier| self.base_delay.checked_mul(multiplier));
        Some(delay.map_or(MAX_DELAY, |d| d.min(MAX_DELAY)))
    }

    /// The full sequence of waits: `D, 2D, 4D, ...`, one fewer than attempts.
    #[must_use]
    pub fn schedule(&self) -> BackoffSchedule {
        BackoffSchedule {
            policy: *self,
            next_attempt: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackoffSchedule {
    policy: RetryPolicy,
    next_attempt: u32,
}

impl Iterator for BackoffSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let delay = self.policy.delay_before(self.next_attempt)?;
        self.next_attempt += 1;
        Some(delay)
    }
}

/// Successful end of a retry sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    Delivered(T),
    /// Every attempt failed and the last one was [`FailureKind::Unavailable`].
    Degraded { attempts: u32 },
}

#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("retries exhausted after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: E },

    #[error("{error}")]
    Fatal { attempts: u32, error: E },

    #[error("cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
}

impl<E> RetryError<E> {
    /// Number of attempts actually performed.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. }
            | RetryError::Fatal { attempts, .. }
            | RetryError::Cancelled { attempts } => *attempts,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RetryCaller {
    policy: RetryPolicy,
    cancel: CancellationToken,
}

impl RetryCaller {
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop retrying once `token` is cancelled. Checked before the first
    /// attempt and raced against the whole retry sequence.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// # Errors
    ///
    /// Returns [`RetryError::Fatal`] for a non-retryable failure,
    /// [`RetryError::Exhausted`] when the final attempt faulted and
    /// [`RetryError::Cancelled`] when the token fired first.
    pub async fn call<T, E, F, Fut>(&self, mut operation: F) -> Result<Completion<T>, RetryError<E>>
    where
        E: Classify + std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if self.cancel.is_cancelled() {
            return Err(RetryError::Cancelled { attempts: 0 });
        }

        let attempts = AtomicU32::new(0);
        let policy = self.policy;
        let action = || {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
            let pending = operation();
            async move {
                let result = pending.await;
                match &result {
                    Ok(_) => debug!(attempt, "Remote call succeeded"),
                    Err(error) => {
                        let kind = error.failure_kind();
                        match policy.delay_before(attempt) {
                            Some(delay) if kind != FailureKind::Fatal => warn!(
                                attempt,
                                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                                error = %error,
                                "Attempt failed, retrying"
                            ),
                            _ => warn!(attempt, error = %error, ?kind, "Attempt failed"),
                        }
                    }
                }
                result
            }
        };

        let retry = RetryIf::spawn(self.policy.schedule(), action, |error: &E| {
            error.failure_kind() != FailureKind::Fatal
        });

        let outcome = tokio::select! {
            () = self.cancel.cancelled() => {
                return Err(RetryError::Cancelled {
                    attempts: attempts.load(Ordering::Relaxed),
                });
            }
            outcome = retry => outcome,
        };

        let performed = attempts.load(Ordering::Relaxed);
        match outcome {
            Ok(value) => Ok(Completion::Delivered(value)),
            Err(error) => match error.failure_kind() {
                FailureKind::Fatal => Err(RetryError::Fatal {
                    attempts: performed,
                    error,
                }),
                FailureKind::Unavailable => Ok(Completion::Degraded {
                    attempts: performed,
                }),
                FailureKind::Fault => Err(RetryError::Exhausted {
                    attempts: performed,
                    last_error: error,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_three_attempts_one_second() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(1000));
    }

    #[test]
    fn delay_doubles_from_base() {
        let policy = RetryPolicy::new(5, Duration::from_millis(250));
        assert_eq!(policy.delay_before(0), None);
        assert_eq!(policy.delay_before(1), Some(Duration::from_millis(250)));
        assert_eq!(policy.delay_before(2), Some(Duration::from_millis(500)));
        assert_eq!(policy.delay_before(4), Some(Duration::from_millis(2000)));
        assert_eq!(policy.delay_before(5), None);
    }

    #[test]
    fn schedule_has_one_wait_fewer_than_attempts() {
        let waits: Vec<_> = RetryPolicy::default().schedule().collect();
        assert_eq!(
            waits,
            vec![Duration::from_millis(1000), Duration::from_millis(2000)]
        );
        assert_eq!(RetryPolicy::new(1, DEFAULT_BASE_DELAY).schedule().count(), 0);
    }

    #[test]
    fn delay_saturates_instead_of_shrinking() {
        let policy = RetryPolicy::new(80, Duration::from_secs(1));
        let waits: Vec<_> = policy.schedule().collect();
        assert_eq!(waits.len(), 79);
        assert!(waits.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(policy.delay_before(40), Some(MAX_DELAY));
        assert_eq!(policy.delay_before(79), Some(MAX_DELAY));
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        assert_eq!(RetryPolicy::new(0, DEFAULT_BASE_DELAY).max_attempts, 1);
    }
}
