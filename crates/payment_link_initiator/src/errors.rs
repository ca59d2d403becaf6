//! Errors raised while bootstrapping a payment link page

/// Custom Result
/// A custom datatype that wraps the error variant <E> into a report, allowing
/// error_stack::Report<E> specific extendability
///
/// Effectively, equivalent to `Result<T, error_stack::Report<E>>`
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Failure to read a server supplied payload.
#[derive(Debug, thiserror::Error)]
pub enum ParsingError {
    #[error("Failed to percent-decode {0}")]
    DecodingFailed(&'static str),
    #[error("Failed to parse {0}")]
    StructParseFailure(&'static str),
}

/// Settings could not be loaded or are unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to deserialize settings")]
    DeserializationFailed,
    #[error("Invalid value provided for setting: {field_name}")]
    InvalidConfigurationValue { field_name: &'static str },
}

/// Errors raised while the widget is brought up.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Checkout SDK call `{operation}` failed")]
    SdkFailure { operation: &'static str },
    #[error("Failed to assemble widget configuration")]
    ConfigurationAssemblyFailed,
}

/// Errors raised by navigation attempts.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    /// The browser refused to navigate the top-level browsing context,
    /// usually because of cross-origin framing restrictions.
    #[error("Navigation of the top-level browsing context was denied: {reason}")]
    PrivilegedNavigationDenied { reason: String },
    #[error("Navigation of the current browsing context failed: {reason}")]
    NavigationFailed { reason: String },
    #[error("Current page URL is unavailable")]
    CurrentUrlUnavailable,
    #[error("Status page URL could not be built")]
    InvalidStatusUrl,
}

impl NavigationError {
    /// Human readable description of the failure, forwarded as `reason` to the log endpoint.
    pub fn reason(&self) -> String {
        match self {
            Self::PrivilegedNavigationDenied { reason } | Self::NavigationFailed { reason } => {
                reason.clone()
            }
            Self::CurrentUrlUnavailable | Self::InvalidStatusUrl => self.to_string(),
        }
    }
}

/// Raised when the identity of the embedding context cannot be inspected.
#[derive(Debug, thiserror::Error)]
#[error("Access to the parent browsing context was denied")]
pub struct FrameAccessError;

/// Delivery of a diagnostic log record failed. Never surfaced to the shopper.
#[derive(Debug, thiserror::Error)]
#[error("Failed to deliver log record to {endpoint}")]
pub struct LogDeliveryError {
    pub endpoint: String,
}
