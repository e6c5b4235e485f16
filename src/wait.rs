//! Bounded polling waits
//!
//! Every "wait until" and "scroll until visible" keyword funnels through
//! [`Waiter`]: evaluate a probe against the driver until it reports the
//! desired truth value or an absolute deadline passes. The probe itself is
//! a driver round trip, so it is allowed to block; a minimum poll interval
//! keeps tight loops from hammering the driver, and a shared [`CancelFlag`]
//! lets an outer caller abort a wait between probes.

use crate::error::{KeywordError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Default pause between probe evaluations
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Shared flag for cooperatively cancelling a wait in progress
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a new, uncancelled flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of any wait holding a clone of this flag
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A bounded retry loop around a fallible boolean probe
#[derive(Debug, Clone)]
pub struct Waiter {
    timeout: Duration,
    poll_interval: Duration,
    cancel: Option<CancelFlag>,
}

impl Waiter {
    /// Create a waiter with the given deadline and the default poll interval
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
            cancel: None,
        }
    }

    /// Convenience constructor taking the timeout in whole seconds
    pub fn from_secs(timeout_secs: u64) -> Self {
        Self::new(Duration::from_secs(timeout_secs))
    }

    /// Override the pause between probes. Zero is valid for probes whose
    /// side effect (e.g. a scroll gesture) is itself rate-limiting.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Attach a cancellation flag checked between probes
    pub fn cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Poll until the probe returns `true`.
    ///
    /// The probe is evaluated at least once. Probe errors propagate
    /// immediately and are never retried, so a transport failure is not
    /// mistaken for "not found yet". On deadline, fails with
    /// [`KeywordError::Timeout`] carrying `on_timeout`'s message.
    pub fn wait_until<F>(&self, probe: F, on_timeout: impl FnOnce() -> String) -> Result<()>
    where
        F: FnMut() -> Result<bool>,
    {
        self.run(probe, true, on_timeout)
    }

    /// Poll until the probe returns `false`
    pub fn wait_until_not<F>(&self, probe: F, on_timeout: impl FnOnce() -> String) -> Result<()>
    where
        F: FnMut() -> Result<bool>,
    {
        self.run(probe, false, on_timeout)
    }

    fn run<F>(&self, mut probe: F, target: bool, on_timeout: impl FnOnce() -> String) -> Result<()>
    where
        F: FnMut() -> Result<bool>,
    {
        let deadline = Instant::now() + self.timeout;
        loop {
            if probe()? == target {
                return Ok(());
            }
            if let Some(flag) = &self.cancel {
                if flag.is_cancelled() {
                    return Err(KeywordError::Cancelled);
                }
            }
            let now = Instant::now();
            if now >= deadline {
                let message = on_timeout();
                log::debug!("wait timed out after {:?}: {}", self.timeout, message);
                return Err(KeywordError::Timeout(message));
            }
            let pause = self.poll_interval.min(deadline - now);
            if !pause.is_zero() {
                std::thread::sleep(pause);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_waiter(timeout_ms: u64) -> Waiter {
        Waiter::new(Duration::from_millis(timeout_ms)).poll_interval(Duration::from_millis(5))
    }

    #[test]
    fn test_wait_until_succeeds_after_n_probes() {
        let mut calls = 0;
        let result = fast_waiter(500).wait_until(
            || {
                calls += 1;
                Ok(calls >= 3)
            },
            || "should not time out".to_string(),
        );
        assert!(result.is_ok());
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_wait_until_times_out_with_message() {
        let started = Instant::now();
        let result = fast_waiter(50).wait_until(|| Ok(false), || "never appeared".to_string());
        match result {
            Err(KeywordError::Timeout(message)) => assert_eq!(message, "never appeared"),
            other => panic!("expected timeout, got {:?}", other),
        }
        // The deadline must actually have elapsed before the failure
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_wait_until_not_inverts_probe() {
        let mut calls = 0;
        let result = fast_waiter(500).wait_until_not(
            || {
                calls += 1;
                Ok(calls < 2)
            },
            || "still present".to_string(),
        );
        assert!(result.is_ok());
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_probe_error_propagates_unretried() {
        let mut calls = 0;
        let result = fast_waiter(500).wait_until(
            || {
                calls += 1;
                Err(KeywordError::Driver("connection reset".to_string()))
            },
            || "unreachable".to_string(),
        );
        assert!(matches!(result, Err(KeywordError::Driver(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_probe_runs_at_least_once_with_zero_timeout() {
        let mut calls = 0;
        let result = fast_waiter(0).wait_until(
            || {
                calls += 1;
                Ok(true)
            },
            || "unreachable".to_string(),
        );
        assert!(result.is_ok());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_cancellation_aborts_wait() {
        let flag = CancelFlag::new();
        flag.cancel();
        let result = fast_waiter(10_000)
            .cancel_flag(flag)
            .wait_until(|| Ok(false), || "unreachable".to_string());
        assert!(matches!(result, Err(KeywordError::Cancelled)));
    }
}
