//! Derivation of the checkout widget configuration from the payment details, and the reveal of
//! the mounted widget.

use std::time::Duration;

use serde_json::{json, Map, Value};

use crate::{
    configs::PageSettings,
    host::{PageDocument, Scheduler},
    logger,
    merge::{self, MapExt},
    types::{AppearanceConfig, PaymentDetails, WalletOptions, WidgetLayout, WidgetOptions},
};

/// Widget branding is always suppressed on payment links.
const BRANDING: &str = "never";

/// Builds the `appearance` block: the fixed design tokens, the merchant theme and the optional
/// UI rules, label placement and CVC error colour.
///
/// An empty theme is not a colour and falls back to `default_theme`. Every other present value
/// is forwarded as is, empty strings included.
pub fn build_appearance(details: &PaymentDetails, default_theme: &str) -> AppearanceConfig {
    let color_primary = details
        .theme
        .as_deref()
        .filter(|theme| !theme.is_empty())
        .unwrap_or(default_theme);

    let mut variables = Map::new();
    variables.insert("colorPrimary".to_owned(), json!(color_primary));
    variables.insert("fontFamily".to_owned(), json!("Work Sans, sans-serif"));
    variables.insert("fontSizeBase".to_owned(), json!("16px"));
    variables.insert("colorText".to_owned(), json!("rgb(51, 65, 85)"));
    variables.insert("colorTextSecondary".to_owned(), json!("#334155B3"));
    variables.insert("colorBackground".to_owned(), json!("rgb(255, 255, 255)"));
    variables.insert_if(
        "colorIconCardCvcError",
        details.color_icon_card_cvc_error.clone(),
        merge::is_string,
    );

    let mut appearance = Map::new();
    appearance.insert("variables".to_owned(), Value::Object(variables));
    appearance.insert_if("rules", details.sdk_ui_rules.clone(), merge::is_object);
    appearance.insert_if(
        "labels",
        details.payment_form_label_type.clone(),
        merge::is_string,
    );

    AppearanceConfig::from(appearance)
}

/// Builds the options of the `payment` widget.
pub fn build_widget_options(details: &PaymentDetails) -> WidgetOptions {
    let layout = WidgetLayout::from_sdk_layout(details.sdk_layout.as_deref());
    let wallets = WalletOptions {
        wallet_return_url: details.return_url.clone(),
        ..WalletOptions::default()
    };

    let mut options = Map::new();
    options.insert_some(
        "displaySavedPaymentMethodsCheckbox",
        details.enabled_saved_payment_method,
    );
    options.insert_some(
        "displaySavedPaymentMethods",
        details.enabled_saved_payment_method,
    );
    options.insert("layout".to_owned(), json!(layout));
    options.insert("branding".to_owned(), json!(BRANDING));
    options.insert("wallets".to_owned(), json!(wallets));
    options.insert_some("hideCardNicknameField", details.hide_card_nickname_field);
    options.insert_some("showCardFormByDefault", details.show_card_form_by_default);
    options.insert_some(
        "customMessageForCardTerms",
        details.custom_message_for_card_terms.clone(),
    );

    if let Some(show_card_terms) = details
        .show_card_terms
        .clone()
        .filter(merge::is_string)
    {
        options.insert("terms".to_owned(), json!({ "card": show_card_terms }));
    }
    options.insert_if(
        "paymentMethodsHeaderText",
        details.payment_form_header_text.clone(),
        merge::is_string,
    );

    WidgetOptions::from(options)
}

/// Fades the loading shimmer out and removes it once the fade had time to run.
///
/// The fade class is applied immediately, the removal is deferred so that the transition is not
/// cut short. Returns whether a shimmer was found.
pub fn reveal_payment_form(
    document: &dyn PageDocument,
    scheduler: &dyn Scheduler,
    page: &PageSettings,
) -> bool {
    let Some(shimmer) = document.element_by_id(&page.shimmer_id) else {
        logger::warn!(shimmer_id = %page.shimmer_id, "loading shimmer not found");
        return false;
    };

    shimmer.add_class(&page.shimmer_fade_class);
    scheduler.defer(
        Duration::from_millis(page.shimmer_removal_delay_ms),
        Box::new(move || shimmer.remove()),
    );
    true
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    fn details(value: Value) -> PaymentDetails {
        PaymentDetails::from_value(value).unwrap()
    }

    #[test]
    fn test_theme_falls_back_to_default() {
        let appearance = build_appearance(&PaymentDetails::default(), "rgb(0, 109, 249)");
        assert_eq!(
            appearance.get("variables").unwrap()["colorPrimary"],
            "rgb(0, 109, 249)"
        );

        let appearance = build_appearance(&details(json!({"theme": "#4E6ADD"})), "rgb(0, 109, 249)");
        assert_eq!(appearance.get("variables").unwrap()["colorPrimary"], "#4E6ADD");
    }

    #[test]
    fn test_empty_theme_falls_back_but_other_empty_strings_are_forwarded() {
        let details = details(json!({
            "theme": "",
            "payment_form_label_type": "",
            "custom_message_for_card_terms": "",
            "payment_form_header_text": "",
        }));

        let appearance = build_appearance(&details, "rgb(0, 109, 249)");
        assert_eq!(
            appearance.get("variables").unwrap()["colorPrimary"],
            "rgb(0, 109, 249)"
        );
        assert_eq!(appearance.get("labels"), Some(&json!("")));

        let options = build_widget_options(&details).into_value();
        assert_eq!(options["customMessageForCardTerms"], "");
        assert_eq!(options["paymentMethodsHeaderText"], "");
    }

    #[test]
    fn test_appearance_optional_keys_absent_when_null() {
        let appearance = build_appearance(
            &details(json!({
                "sdk_ui_rules": null,
                "payment_form_label_type": null,
                "color_icon_card_cvc_error": null,
            })),
            "rgb(0, 109, 249)",
        );

        assert!(!appearance.contains_key("rules"));
        assert!(!appearance.contains_key("labels"));
        assert!(appearance
            .get("variables")
            .unwrap()
            .get("colorIconCardCvcError")
            .is_none());
    }

    #[test]
    fn test_appearance_optional_keys_present_when_well_shaped() {
        let appearance = build_appearance(
            &details(json!({
                "sdk_ui_rules": {".Input": {"borderRadius": "4px"}},
                "payment_form_label_type": "floating",
                "color_icon_card_cvc_error": "#CB4B40",
            })),
            "rgb(0, 109, 249)",
        );

        assert_eq!(
            appearance.get("rules"),
            Some(&json!({".Input": {"borderRadius": "4px"}}))
        );
        assert_eq!(appearance.get("labels"), Some(&json!("floating")));
        assert_eq!(
            appearance.get("variables").unwrap()["colorIconCardCvcError"],
            "#CB4B40"
        );
    }

    #[test]
    fn test_appearance_rules_must_be_an_object() {
        let appearance = build_appearance(
            &details(json!({"sdk_ui_rules": ["not", "an", "object"]})),
            "rgb(0, 109, 249)",
        );
        assert!(!appearance.contains_key("rules"));
    }

    #[test]
    fn test_widget_options_without_optionals() {
        let options = build_widget_options(&details(json!({
            "client_secret": "cs_1",
            "locale": "en",
            "sdk_layout": "accordion",
            "show_card_terms": null,
        })));

        assert!(!options.contains_key("terms"));
        assert!(!options.contains_key("paymentMethodsHeaderText"));
        assert!(!options.contains_key("displaySavedPaymentMethods"));
        assert!(!options.contains_key("hideCardNicknameField"));
        assert_eq!(options.get("layout").unwrap()["type"], "accordion");
        assert_eq!(options.get("branding"), Some(&json!("never")));
        assert_eq!(
            options.get("wallets"),
            Some(&json!({"style": {"theme": "dark", "type": "default", "height": 55}}))
        );
    }

    #[test]
    fn test_widget_options_with_every_field() {
        let options = build_widget_options(&details(json!({
            "sdk_layout": "spaced_accordion",
            "enabled_saved_payment_method": true,
            "hide_card_nickname_field": true,
            "show_card_form_by_default": false,
            "custom_message_for_card_terms": "Card will be saved",
            "return_url": "https://merchant.example.com/done",
            "show_card_terms": "always",
            "payment_form_header_text": "Pay with",
        })));

        assert_eq!(
            options.into_value(),
            json!({
                "displaySavedPaymentMethodsCheckbox": true,
                "displaySavedPaymentMethods": true,
                "layout": {"type": "accordion", "spacedAccordionItems": true},
                "branding": "never",
                "wallets": {
                    "walletReturnUrl": "https://merchant.example.com/done",
                    "style": {"theme": "dark", "type": "default", "height": 55},
                },
                "hideCardNicknameField": true,
                "showCardFormByDefault": false,
                "customMessageForCardTerms": "Card will be saved",
                "terms": {"card": "always"},
                "paymentMethodsHeaderText": "Pay with",
            })
        );
    }

    #[test]
    fn test_widget_options_drop_wrong_shaped_terms() {
        let options = build_widget_options(&details(json!({
            "show_card_terms": true,
            "payment_form_header_text": 42,
        })));

        assert!(!options.contains_key("terms"));
        assert!(!options.contains_key("paymentMethodsHeaderText"));
    }
}
