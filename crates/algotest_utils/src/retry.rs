//! Bounded retry for read queries against a lagging query tier.
//!
//! A write confirmed by the node takes a moment to appear in the indexer.
//! Every read query therefore runs through [`with_retry`]: transient
//! failures are retried with a fixed backoff until the deadline, anything
//! else surfaces immediately.

use crate::clients::ClientError;
use crate::error::TxnError;
use std::thread;
use std::time::{Duration, Instant};

/// An explicit (predicate, backoff, timeout) retry configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total deadline across all attempts.
    pub timeout: Duration,
    /// Pause between attempts.
    pub backoff: Duration,
    /// Decides which failures are worth another attempt.
    pub retry_if: fn(&ClientError) -> bool,
}

impl RetryPolicy {
    /// The indexer-lag policy: transient errors, 1s backoff, given deadline.
    pub fn indexer(timeout: Duration) -> Self {
        RetryPolicy {
            timeout,
            backoff: Duration::from_secs(1),
            retry_if: ClientError::is_transient,
        }
    }

    /// A policy that never retries; failures surface on the first attempt.
    pub fn none() -> Self {
        RetryPolicy {
            timeout: Duration::ZERO,
            backoff: Duration::ZERO,
            retry_if: |_| false,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::indexer(Duration::from_secs(61))
    }
}

/// Runs `op` until it succeeds, a non-retryable error occurs, or the
/// policy's deadline passes.
pub fn with_retry<T>(
    policy: &RetryPolicy,
    mut op: impl FnMut() -> Result<T, ClientError>,
) -> Result<T, TxnError> {
    let deadline = Instant::now() + policy.timeout;

    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if !(policy.retry_if)(&err) => return Err(TxnError::Client { source: err }),
            Err(err) => {
                if Instant::now() + policy.backoff > deadline {
                    return Err(TxnError::QueryTimeout {
                        timeout: policy.timeout,
                        message: err.to_string(),
                    });
                }
                thread::sleep(policy.backoff);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn transient() -> ClientError {
        ClientError::Api {
            status: 404,
            message: "not found".into(),
        }
    }

    fn instant_policy() -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_millis(50),
            backoff: Duration::ZERO,
            retry_if: ClientError::is_transient,
        }
    }

    #[test]
    fn test_retries_transient_failures_until_success() {
        let remaining = Cell::new(3usize);
        let result = with_retry(&instant_policy(), || {
            if remaining.get() > 0 {
                remaining.set(remaining.get() - 1);
                Err(transient())
            } else {
                Ok(42)
            }
        });

        assert_eq!(result.unwrap(), 42);
        assert_eq!(remaining.get(), 0);
    }

    #[test]
    fn test_non_transient_failures_surface_immediately() {
        let attempts = Cell::new(0usize);
        let result: Result<(), _> = with_retry(&instant_policy(), || {
            attempts.set(attempts.get() + 1);
            Err(ClientError::Api {
                status: 400,
                message: "bad request".into(),
            })
        });

        assert!(matches!(result, Err(TxnError::Client { .. })));
        assert_eq!(attempts.get(), 1);
    }

    #[test]
    fn test_deadline_surfaces_as_query_timeout() {
        let policy = RetryPolicy {
            timeout: Duration::from_millis(5),
            backoff: Duration::from_millis(2),
            retry_if: ClientError::is_transient,
        };

        let result: Result<(), _> = with_retry(&policy, || Err(transient()));
        assert!(matches!(result, Err(TxnError::QueryTimeout { .. })));
    }
}
