//! Wait/retry engine: poll a probe until it turns truthy or a deadline
//! elapses.
//!
//! Probe errors are expected during polling (an element not yet attached, a
//! stale handle) and are captured instead of propagated; only the final
//! timeout is a hard failure, and it carries the last evaluated value and
//! the last captured error so a flaky wait can be diagnosed from the
//! message alone.
//!
//! Waiting is cooperative-by-blocking: the calling thread sleeps between
//! attempts, there is no background scheduler and no backoff.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::result::{PaginaError, PaginaResult};
use crate::truthy::{Evaluated, Truthy};

/// Timeout of the compiled-in default preset (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Retry interval of the compiled-in default preset (500ms)
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// Name under which the compiled-in preset is registered
pub const DEFAULT_PRESET_NAME: &str = "DEFAULT";

/// A named pair of timeout and retry interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitPreset {
    /// Total time budget for the wait
    pub timeout: Duration,
    /// Constant sleep between poll attempts
    pub retry_interval: Duration,
}

impl WaitPreset {
    /// Create a new preset
    #[must_use]
    pub const fn new(timeout: Duration, retry_interval: Duration) -> Self {
        Self {
            timeout,
            retry_interval,
        }
    }

    /// Create a preset from fractional seconds
    #[must_use]
    pub fn from_secs(timeout: f64, retry_interval: f64) -> Self {
        Self {
            timeout: Duration::from_secs_f64(timeout),
            retry_interval: Duration::from_secs_f64(retry_interval),
        }
    }
}

impl Default for WaitPreset {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

/// Outcome of one poll attempt. Conversion into a raised failure happens
/// exactly once, at the deadline, never per attempt.
enum ProbeOutcome<T> {
    Satisfied(T),
    Unsatisfied(Evaluated),
    Failed(PaginaError),
}

fn run_probe<T, F>(probe: &mut F) -> ProbeOutcome<T>
where
    T: Truthy,
    F: FnMut() -> PaginaResult<T>,
{
    match probe() {
        Ok(value) => {
            let evaluated = value.evaluate();
            if evaluated.is_truthy() {
                ProbeOutcome::Satisfied(value)
            } else {
                ProbeOutcome::Unsatisfied(evaluated)
            }
        }
        Err(err) => ProbeOutcome::Failed(err),
    }
}

/// Poll `probe` every `retry_interval` until it yields a truthy value or
/// `timeout` elapses.
///
/// The probe runs once immediately, so a wait that is already satisfied
/// returns without sleeping. A raise-free attempt clears any previously
/// captured probe error.
///
/// # Errors
///
/// [`PaginaError::WaitTimeout`] when the deadline passes without a truthy
/// value.
pub fn wait_for<T, F>(
    timeout: Duration,
    retry_interval: Duration,
    desc: Option<&str>,
    mut probe: F,
) -> PaginaResult<T>
where
    T: Truthy,
    F: FnMut() -> PaginaResult<T>,
{
    let deadline = Instant::now() + timeout;
    let mut last_value: Option<Evaluated> = None;
    let mut last_error: Option<PaginaError> = None;

    loop {
        match run_probe(&mut probe) {
            ProbeOutcome::Satisfied(value) => {
                trace!(desc, "wait satisfied");
                return Ok(value);
            }
            ProbeOutcome::Unsatisfied(evaluated) => {
                trace!(desc, value = %evaluated.describe(), "wait not yet satisfied");
                last_value = Some(evaluated);
                last_error = None;
            }
            ProbeOutcome::Failed(err) => {
                trace!(desc, error = %err, "probe failed, retrying");
                last_error = Some(err);
            }
        }

        if Instant::now() > deadline {
            break;
        }
        std::thread::sleep(retry_interval);
    }

    let message = WaitTimeoutMessage::new(timeout)
        .with_detail(desc)
        .with_last_value(last_value.as_ref())
        .with_last_error(last_error.as_ref())
        .build();
    debug!(desc, %message, "wait timed out");
    Err(PaginaError::WaitTimeout { timeout, message })
}

/// Builder for the wait-timeout diagnostic message
#[derive(Debug)]
pub struct WaitTimeoutMessage {
    timeout: Duration,
    detail: String,
    last_value: String,
    last_error: String,
}

impl WaitTimeoutMessage {
    /// Start a message for a wait that used `timeout`
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            detail: String::new(),
            last_value: " Last evaluated value: 'none'.".to_string(),
            last_error: String::new(),
        }
    }

    /// Attach the caller-supplied description, if any
    #[must_use]
    pub fn with_detail(mut self, detail: Option<&str>) -> Self {
        if let Some(detail) = detail {
            self.detail = format!(" for '{detail}'");
        }
        self
    }

    /// Attach the last evaluated value, if one was ever produced
    #[must_use]
    pub fn with_last_value(mut self, last_value: Option<&Evaluated>) -> Self {
        if let Some(value) = last_value {
            self.last_value = format!(" Last evaluated value: '{}'.", value.describe());
        }
        self
    }

    /// Attach the last captured probe error, if any
    #[must_use]
    pub fn with_last_error(mut self, last_error: Option<&PaginaError>) -> Self {
        if let Some(err) = last_error {
            self.last_error = format!(" Last error: '{err}'.");
        }
        self
    }

    /// Render the message
    #[must_use]
    pub fn build(self) -> String {
        format!(
            "Waiting{} has timed out after {} seconds.{}{}",
            self.detail,
            self.timeout.as_secs_f64(),
            self.last_value,
            self.last_error
        )
    }
}
