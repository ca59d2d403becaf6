//! Payment link specific types

use std::str::FromStr;

use error_stack::{report, ResultExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::errors::{CustomResult, ParsingError};

/// Payment details rendered into the page by the server.
///
/// Fields whose shape is checked before being forwarded to the widget are kept as raw JSON, so
/// that a wrong-shaped value is dropped instead of failing the decode of the whole object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentDetails {
    pub client_secret: Option<String>,
    pub locale: Option<String>,
    pub theme: Option<String>,
    pub sdk_layout: Option<String>,
    pub enabled_saved_payment_method: Option<bool>,
    pub hide_card_nickname_field: Option<bool>,
    pub show_card_form_by_default: Option<bool>,
    pub custom_message_for_card_terms: Option<String>,
    pub display_sdk_only: Option<bool>,
    pub enable_button_only_on_form_ready: Option<bool>,
    pub return_url: Option<String>,
    pub sdk_ui_rules: Option<Value>,
    pub payment_form_label_type: Option<Value>,
    pub show_card_terms: Option<Value>,
    pub payment_form_header_text: Option<Value>,
    pub color_icon_card_cvc_error: Option<Value>,
    pub payment_id: Option<String>,
    pub merchant_name: Option<String>,
}

impl PaymentDetails {
    /// Decodes the URI component encoded JSON the server inlines into the page.
    pub fn from_encoded(encoded: &str) -> CustomResult<Self, ParsingError> {
        let decoded = urlencoding::decode(encoded)
            .change_context(ParsingError::DecodingFailed("payment details"))?;
        Self::from_json(&decoded)
    }

    pub fn from_json(json: &str) -> CustomResult<Self, ParsingError> {
        serde_json::from_str(json)
            .change_context(ParsingError::StructParseFailure("PaymentDetails"))
            .attach_printable("Payment details embedded in the page are malformed")
    }

    pub fn from_value(value: Value) -> CustomResult<Self, ParsingError> {
        if !value.is_object() {
            return Err(report!(ParsingError::StructParseFailure("PaymentDetails")))
                .attach_printable("Payment details must be a JSON object");
        }
        serde_json::from_value(value)
            .change_context(ParsingError::StructParseFailure("PaymentDetails"))
    }

    /// Locale forwarded in the status page query string. Absent locale yields an empty value.
    pub fn locale_or_empty(&self) -> &str {
        self.locale.as_deref().unwrap_or_default()
    }
}

/// Layouts the checkout widget knows about. Anything else is forwarded verbatim.
#[derive(Debug, Clone, Copy, Eq, PartialEq, strum::Display, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SdkLayout {
    Accordion,
    SpacedAccordion,
    Tabs,
}

/// The `layout` block of the payment widget options.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetLayout {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub layout_type: Option<String>,
    pub spaced_accordion_items: bool,
}

impl WidgetLayout {
    /// Both accordion flavours are rendered as `accordion`; the spaced flavour is expressed
    /// through `spacedAccordionItems`.
    pub fn from_sdk_layout(sdk_layout: Option<&str>) -> Self {
        let known = sdk_layout.and_then(|layout| SdkLayout::from_str(layout).ok());
        let layout_type = match known {
            Some(SdkLayout::Accordion | SdkLayout::SpacedAccordion) => {
                Some(SdkLayout::Accordion.to_string())
            }
            _ => sdk_layout.map(str::to_owned),
        };

        Self {
            layout_type,
            spaced_accordion_items: known == Some(SdkLayout::SpacedAccordion),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct WalletStyle {
    pub theme: &'static str,
    #[serde(rename = "type")]
    pub style_type: &'static str,
    pub height: u16,
}

impl Default for WalletStyle {
    fn default() -> Self {
        Self {
            theme: "dark",
            style_type: "default",
            height: 55,
        }
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_return_url: Option<String>,
    pub style: WalletStyle,
}

/// Redirection behaviour requested from the checkout SDK client.
///
/// These flags are fixed: the page must never preload, must redirect the top-level browsing
/// context and must not intercept `beforeunload`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkClientOptions {
    is_preload_enabled: bool,
    should_use_top_redirection: bool,
    redirection_flags: RedirectionFlags,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct RedirectionFlags {
    should_remove_before_unload_events: bool,
    should_use_top_redirection: bool,
}

impl SdkClientOptions {
    pub const TOP_REDIRECTION: Self = Self {
        is_preload_enabled: false,
        should_use_top_redirection: true,
        redirection_flags: RedirectionFlags {
            should_remove_before_unload_events: true,
            should_use_top_redirection: true,
        },
    };
}

macro_rules! json_object_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize)]
        #[serde(transparent)]
        pub struct $name(Map<String, Value>);

        impl $name {
            pub fn get(&self, key: &str) -> Option<&Value> {
                self.0.get(key)
            }

            pub fn contains_key(&self, key: &str) -> bool {
                self.0.contains_key(key)
            }

            pub fn as_map(&self) -> &Map<String, Value> {
                &self.0
            }

            pub fn into_value(self) -> Value {
                Value::Object(self.0)
            }
        }

        impl From<Map<String, Value>> for $name {
            fn from(map: Map<String, Value>) -> Self {
                Self(map)
            }
        }
    };
}

json_object_newtype!(
    /// `appearance` handed to the checkout SDK: `variables` and optionally `rules` and `labels`.
    AppearanceConfig
);

json_object_newtype!(
    /// Options of the `payment` widget instance.
    WidgetOptions
);

/// Arguments of `widgets(..)` on the SDK client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetsOptions {
    pub appearance: AppearanceConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Identifiers extracted from the current page URL for diagnostics.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    pub payment_id: String,
    pub merchant_id: String,
    pub attempt_id: String,
    pub connector: String,
}

impl RouteInfo {
    /// Recognises the two redirect routes:
    ///
    /// - `/payments/redirect/{payment_id}/{merchant_id}/{attempt_id}`
    /// - `/payments/{payment_id}/{merchant_id}/redirect/response/{connector}[/{creds_identifier}]`
    ///
    /// Any other path yields empty identifiers.
    pub fn from_url(url: &Url) -> Self {
        let path = url.path();
        let attempt_id_exists = !(path.contains("response") || path.contains("complete"));
        let segments = path
            .strip_prefix('/')
            .unwrap_or(path)
            .split('/')
            .collect::<Vec<_>>();

        match segments.as_slice() {
            ["payments", "redirect", payment_id, merchant_id, attempt_id]
                if attempt_id_exists && Self::all_non_empty(&[payment_id, merchant_id, attempt_id]) =>
            {
                Self {
                    payment_id: (*payment_id).to_owned(),
                    merchant_id: (*merchant_id).to_owned(),
                    attempt_id: (*attempt_id).to_owned(),
                    connector: String::new(),
                }
            }
            ["payments", payment_id, merchant_id, "redirect", "response", connector, rest @ ..]
                if Self::is_optional_trailing_segment(rest)
                    && Self::all_non_empty(&[payment_id, merchant_id, connector]) =>
            {
                Self {
                    payment_id: (*payment_id).to_owned(),
                    merchant_id: (*merchant_id).to_owned(),
                    attempt_id: String::new(),
                    connector: (*connector).to_owned(),
                }
            }
            _ => Self::default(),
        }
    }

    fn all_non_empty(segments: &[&&str]) -> bool {
        segments.iter().all(|segment| !segment.is_empty())
    }

    /// Nothing, `/{segment}` or `/{segment}/`.
    fn is_optional_trailing_segment(rest: &[&str]) -> bool {
        match rest {
            [] => true,
            [segment] => !segment.is_empty(),
            [segment, trailing] => !segment.is_empty() && trailing.is_empty(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LogMessage {
    pub message: String,
    pub reason: String,
}

/// Diagnostic record posted to the log endpoint when the top-level redirect is refused.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub message: LogMessage,
    pub url: String,
    #[serde(flatten)]
    pub route: RouteInfo,
}
