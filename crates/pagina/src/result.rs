//! Result and error types for Pagina.

use std::time::Duration;
use thiserror::Error;

/// Result type for Pagina operations
pub type PaginaResult<T> = Result<T, PaginaError>;

/// Errors that can occur in Pagina
#[derive(Debug, Error)]
pub enum PaginaError {
    /// A polling wait gave up at its deadline.
    ///
    /// The message carries the timeout, the optional description, the last
    /// evaluated value and the last probe error, so a flaky wait can be
    /// diagnosed without re-running the test.
    #[error("{message}")]
    WaitTimeout {
        /// Configured timeout that elapsed
        timeout: Duration,
        /// Full diagnostic message
        message: String,
    },

    /// A named wait preset is absent from configuration
    #[error("Wait preset '{name}' not found")]
    PresetNotFound {
        /// Requested preset name
        name: String,
    },

    /// Content declared `required` resolved to nothing
    #[error("Required page content is not present. Selector='{selector}'")]
    RequiredContentAbsent {
        /// Locator of the missing content
        selector: String,
    },

    /// Interaction attempted on content that matched no elements
    #[error("No element matched selector '{selector}'")]
    NoSuchElement {
        /// Locator that matched nothing
        selector: String,
    },

    /// Failure reported by the underlying browser driver
    #[error("Driver error: {message}")]
    Driver {
        /// Error message from the driver
        message: String,
    },

    /// A page URL could not be resolved against the base URL
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl {
        /// URL that failed to parse
        url: String,
        /// Parse error detail
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PaginaError {
    /// Shorthand for a driver-level failure
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_timeout_displays_message_verbatim() {
        let err = PaginaError::WaitTimeout {
            timeout: Duration::from_secs(2),
            message: "Waiting has timed out after 2 seconds.".to_string(),
        };
        assert_eq!(err.to_string(), "Waiting has timed out after 2 seconds.");
    }

    #[test]
    fn test_preset_not_found_names_preset() {
        let err = PaginaError::PresetNotFound {
            name: "QUICK".to_string(),
        };
        assert!(err.to_string().contains("QUICK"));
    }

    #[test]
    fn test_required_content_absent_names_selector() {
        let err = PaginaError::RequiredContentAbsent {
            selector: "css '#missing'".to_string(),
        };
        assert!(err.to_string().contains("#missing"));
    }

    #[test]
    fn test_driver_shorthand() {
        let err = PaginaError::driver("session has been quit");
        assert!(matches!(err, PaginaError::Driver { .. }));
        assert!(err.to_string().contains("session has been quit"));
    }
}
