//! Sends the shopper to the status page once checkout concludes.
//!
//! The page lives in the merchant's iframe, so the status page is opened in the top-level
//! browsing context. Browsers refuse that for some sandboxed frames; the refusal is reported to
//! the log endpoint and the page falls back to navigating its own frame.

use error_stack::ResultExt;
use url::Url;

use crate::{
    configs::LogEndpoints,
    env,
    errors::{CustomResult, NavigationError},
    host::{LogSink, Navigator},
    logger,
    types::{LogMessage, LogRecord, PaymentDetails, RouteInfo},
};

pub const TOP_REDIRECT_FAILURE_MESSAGE: &str =
    "CRITICAL ERROR - Failed to redirect top document. Falling back to redirecting using window.location";

/// Segment that marks deployments serving payment links under `/api`.
const API_SEGMENT: &str = "api";

const API_STATUS_PREFIX: &[&str] = &[API_SEGMENT, "payment_link", "status"];
const STATUS_PREFIX: &[&str] = &["payment_link", "status"];

/// How the shopper was sent to the status page.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum RedirectOutcome {
    TopLevel(Url),
    Fallback(Url),
}

impl RedirectOutcome {
    pub fn target(&self) -> &Url {
        match self {
            Self::TopLevel(target) | Self::Fallback(target) => target,
        }
    }
}

/// Rewrites a payment link path into the matching status page path, without a leading slash.
///
/// `/api/payment_link/{merchant_id}/{payment_id}` becomes
/// `api/payment_link/status/{payment_id}` and `/payment_link/{merchant_id}/{payment_id}` becomes
/// `payment_link/status/{payment_id}`. The rewrite is positional: the first four (with `api`) or
/// three (without) segments of the split path, the leading empty one included, are replaced.
pub fn status_path(path: &str) -> String {
    let segments = path.split('/').collect::<Vec<_>>();

    let (prefix, replaced) = if segments.contains(&API_SEGMENT) {
        (API_STATUS_PREFIX, 4)
    } else {
        (STATUS_PREFIX, 3)
    };

    prefix
        .iter()
        .chain(segments.iter().skip(replaced))
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}

/// Absolute status page URL for the page at `current`.
pub fn status_url(current: &Url, locale: &str) -> CustomResult<Url, NavigationError> {
    let target = format!(
        "{}/{}?locale={}",
        current.origin().ascii_serialization(),
        status_path(current.path()),
        locale
    );

    Url::parse(&target)
        .change_context(NavigationError::InvalidStatusUrl)
        .attach_printable_lazy(|| format!("Rewritten status page URL is invalid: {target}"))
}

/// Navigates to the status page, exactly once.
///
/// The top-level browsing context is tried first. When that is refused, a [`LogRecord`] is
/// handed to `sink` without waiting for delivery and the current frame is navigated instead.
pub fn redirect_to_status(
    navigator: &dyn Navigator,
    sink: &dyn LogSink,
    endpoints: &LogEndpoints,
    details: &PaymentDetails,
) -> CustomResult<RedirectOutcome, NavigationError> {
    let current = navigator.current_url()?;
    let target = status_url(&current, details.locale_or_empty())?;

    match navigator.navigate_top(&target) {
        Ok(()) => {
            logger::info!(status_url = %target, "redirecting top document to status page");
            Ok(RedirectOutcome::TopLevel(target))
        }
        Err(error) => {
            logger::error!(?error, "top document redirect refused");

            let record = LogRecord {
                message: LogMessage {
                    message: TOP_REDIRECT_FAILURE_MESSAGE.to_owned(),
                    reason: error.current_context().reason(),
                },
                url: current.to_string(),
                route: RouteInfo::from_url(&current),
            };
            sink.submit(&env::log_endpoint_for(&current, endpoints), record);

            navigator
                .navigate_current(&target)
                .attach_printable("Fallback redirect to the status page failed")?;
            Ok(RedirectOutcome::Fallback(target))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_status_path_with_api_prefix() {
        assert_eq!(
            status_path("/api/payment_link/merchant_1234/pay_1234"),
            "api/payment_link/status/pay_1234"
        );
    }

    #[test]
    fn test_status_path_without_api_prefix() {
        assert_eq!(
            status_path("/payment_link/merchant_1234/pay_1234"),
            "payment_link/status/pay_1234"
        );
    }

    #[test]
    fn test_status_path_keeps_extra_segments() {
        assert_eq!(
            status_path("/payment_link/s/merchant_1234/pay_1234"),
            "payment_link/status/merchant_1234/pay_1234"
        );
        assert_eq!(
            status_path("/api/payment_link/s/merchant_1234/pay_1234"),
            "api/payment_link/status/merchant_1234/pay_1234"
        );
    }

    #[test]
    fn test_status_path_is_positional_for_short_paths() {
        assert_eq!(status_path("/payment_link"), "payment_link/status");
        assert_eq!(status_path("/api"), "api/payment_link/status");
        assert_eq!(status_path("/"), "payment_link/status");
    }

    #[test]
    fn test_status_url_appends_locale() {
        let current =
            Url::parse("https://sandbox.hyperswitch.io/api/payment_link/merchant_1/pay_1").unwrap();
        let target = status_url(&current, "fr").unwrap();

        assert_eq!(
            target.as_str(),
            "https://sandbox.hyperswitch.io/api/payment_link/status/pay_1?locale=fr"
        );
    }

    #[test]
    fn test_status_url_with_port_and_empty_locale() {
        let current = Url::parse("http://localhost:8080/payment_link/merchant_1/pay_1?x=1").unwrap();
        let target = status_url(&current, "").unwrap();

        assert_eq!(
            target.as_str(),
            "http://localhost:8080/payment_link/status/pay_1?locale="
        );
    }
}
