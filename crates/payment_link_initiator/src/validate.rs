//! Sanity report over payment details, for preview tooling. Never gates activation.

use serde::Serialize;

use crate::types::{PaymentDetails, SdkLayout};

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value.chars().skip(1).all(|c| c.is_ascii_hexdigit())
}

pub fn validate_payment_details(details: &PaymentDetails) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if details
        .client_secret
        .as_deref()
        .map_or(true, |secret| secret.trim().is_empty())
    {
        errors.push("Client secret is required".to_string());
    }

    if details.locale.is_none() {
        warnings.push("Locale is missing, the checkout widget will pick its default".to_string());
    }

    if let Some(theme) = details.theme.as_deref() {
        if !is_hex_color(theme) {
            warnings.push("Theme color should be a hex color (e.g., #4E6ADD)".to_string());
        }
    }

    if let Some(layout) = details.sdk_layout.as_deref() {
        if layout.parse::<SdkLayout>().is_err() {
            warnings.push(format!(
                "SDK layout `{layout}` is not one of: accordion, tabs, spaced_accordion"
            ));
        }
    }

    if let Some(return_url) = details.return_url.as_deref() {
        if url::Url::parse(return_url).is_err() {
            errors.push("Return URL must be an absolute URL".to_string());
        }
    }

    if details
        .sdk_ui_rules
        .as_ref()
        .is_some_and(|rules| !rules.is_object())
    {
        warnings.push("SDK UI rules are not an object and will be ignored".to_string());
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}
