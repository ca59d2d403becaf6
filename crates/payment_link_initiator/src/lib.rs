#![warn(missing_debug_implementations)]

//!
//! Client side initiator of secure payment links: framing guard, checkout widget bootstrap and
//! the completion redirect to the status page.
//!

pub mod bootstrap;
pub mod configs;
pub mod env;
pub mod errors;
pub mod guard;
pub mod host;
pub mod locale;
pub mod logger;
pub mod merge;
pub mod redirect;
pub mod session;
pub mod types;
pub mod validate;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use configs::Settings;
pub use guard::FramingState;
pub use redirect::RedirectOutcome;
pub use session::{ActivationOutcome, PaymentLinkSession};
pub use types::{AppearanceConfig, LogRecord, PaymentDetails, RouteInfo, WidgetOptions};
// WASM bindings - thin wrappers around implementation functions in wasm.rs
#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

/// Activate the payment link page
///
/// This function is exported to JavaScript when compiled as WASM.
/// It wraps the implementation function in wasm.rs.
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = initializePaymentLink)]
pub fn initialize_payment_link() -> Result<(), JsValue> {
    wasm::initialize_payment_link_impl().map_err(|e| JsValue::from_str(&e))
}

/// Redirect the shopper to the status page once checkout concludes
///
/// This function is exported to JavaScript when compiled as WASM.
/// It wraps the implementation function in wasm.rs.
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = redirectToStatus)]
pub fn redirect_to_status(payment_details: JsValue) -> Result<(), JsValue> {
    wasm::redirect_to_status_impl(payment_details).map_err(|e| JsValue::from_str(&e))
}

/// Validate payment details and return validation results as JSON
///
/// This function is exported to JavaScript when compiled as WASM.
/// It wraps the implementation function in wasm.rs.
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = validatePaymentDetails)]
pub fn validate_payment_details(details_json: &str) -> Result<String, JsValue> {
    wasm::validate_payment_details_impl(details_json).map_err(|e| JsValue::from_str(&e))
}
