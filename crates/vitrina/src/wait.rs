//! Explicit-wait synchronization primitive.
//!
//! The target UI renders asynchronously (client-side counters, modal
//! transitions, server-side search results). Fixed sleeps are both slower
//! and flakier than condition polling, so every page action that depends
//! on UI state reached after an interaction waits on an explicit, named
//! condition instead.
//!
//! Probes are expected to be pure observations of the remote document so
//! that repeated evaluation is safe.

use crate::result::{VitrinaError, VitrinaResult};
use std::time::{Duration, Instant};

/// Default timeout for wait operations (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Longer timeout for search-result pages, which render server-side (15 seconds)
pub const SEARCH_WAIT_TIMEOUT_MS: u64 = 15_000;

/// Default polling interval (200ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Bounded polling wait over a probe closure.
///
/// A `Wait` is cheap to construct and carries no state besides its budget;
/// page objects typically hold one default instance and one long instance.
#[derive(Debug, Clone, Default)]
pub struct Wait {
    options: WaitOptions,
}

impl Wait {
    /// Create a waiter with the default 10s budget
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a waiter with a custom budget
    #[must_use]
    pub fn with_options(options: WaitOptions) -> Self {
        Self { options }
    }

    /// Create a waiter with the given timeout and the default poll interval
    #[must_use]
    pub fn with_timeout_ms(timeout_ms: u64) -> Self {
        Self {
            options: WaitOptions::new().with_timeout(timeout_ms),
        }
    }

    /// Get the configured options
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Poll `probe` until it yields a value or the budget elapses.
    ///
    /// `waited_for` names the condition; it ends up verbatim in the
    /// [`VitrinaError::Timeout`] message, which is what a failing test
    /// reports, so keep it descriptive ("cart counter text non-empty").
    pub fn until<T, F>(&self, waited_for: &str, probe: F) -> VitrinaResult<T>
    where
        F: Fn() -> Option<T>,
    {
        let start = Instant::now();
        let timeout = self.options.timeout();
        let poll_interval = self.options.poll_interval();

        loop {
            if let Some(value) = probe() {
                tracing::trace!(
                    waited_for,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "condition satisfied"
                );
                return Ok(value);
            }
            if start.elapsed() >= timeout {
                tracing::debug!(waited_for, timeout_ms = self.options.timeout_ms, "wait timed out");
                return Err(VitrinaError::Timeout {
                    ms: self.options.timeout_ms,
                    waited_for: waited_for.to_string(),
                });
            }
            std::thread::sleep(poll_interval);
        }
    }

    /// Poll a boolean predicate until it holds
    pub fn until_true<F>(&self, waited_for: &str, predicate: F) -> VitrinaResult<()>
    where
        F: Fn() -> bool,
    {
        self.until(waited_for, || predicate().then_some(()))
    }
}
