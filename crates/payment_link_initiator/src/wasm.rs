//! Browser implementations of the page host and the checkout SDK.
//!
//! The functions here are called by the `wasm_bindgen` wrappers in lib.rs.

use std::{cell::RefCell, time::Duration};

use error_stack::report;
use js_sys::Reflect;
use serde::Serialize;
use url::Url;
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{Element, HtmlDivElement, Window};

use crate::{
    configs::Settings,
    errors::{
        BootstrapError, CustomResult, FrameAccessError, LogDeliveryError, NavigationError,
    },
    host::{
        CheckoutSdk, FrameInspector, LogSink, Navigator, PageDocument, PageElement, Scheduler,
        SdkClient, WidgetInstance, WidgetsHandle,
    },
    logger,
    redirect::{self, RedirectOutcome},
    session::{ActivationOutcome, PaymentLinkSession},
    types::{LogRecord, PaymentDetails, SdkClientOptions, WidgetOptions, WidgetsOptions},
    validate,
};

/// Global the server renders the URI component encoded payment details into.
const PAYMENT_DETAILS_GLOBAL: &str = "__PAYMENT_DETAILS";
/// Optional global holding a TOML document layered over the default settings.
const SETTINGS_GLOBAL: &str = "__PAYMENT_LINK_SETTINGS";

#[wasm_bindgen]
extern "C" {
    type HyperClient;
    type HyperWidgets;
    type HyperWidget;

    #[wasm_bindgen(js_name = Hyper, catch)]
    fn hyper(publishable_key: &str, options: &JsValue) -> Result<HyperClient, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn widgets(this: &HyperClient, options: &JsValue) -> Result<HyperWidgets, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn create(this: &HyperWidgets, kind: &str, options: &JsValue) -> Result<HyperWidget, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn mount(this: &HyperWidget, selector: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(js_name = showSDK, catch)]
    fn show_sdk(
        display_sdk_only: Option<bool>,
        enable_button_only_on_form_ready: Option<bool>,
    ) -> Result<(), JsValue>;
}

thread_local! {
    static SESSION: RefCell<Option<PaymentLinkSession<BrowserPage, BrowserSdk>>> =
        const { RefCell::new(None) };
}

fn js_error_message(error: &JsValue) -> String {
    error
        .dyn_ref::<js_sys::Error>()
        .map(|error| String::from(error.message()))
        .or_else(|| error.as_string())
        .unwrap_or_else(|| format!("{error:?}"))
}

fn to_js<T: Serialize>(value: &T) -> CustomResult<JsValue, BootstrapError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|error| {
            report!(BootstrapError::ConfigurationAssemblyFailed).attach_printable(error.to_string())
        })
}

fn sdk_failure(operation: &'static str, error: &JsValue) -> error_stack::Report<BootstrapError> {
    report!(BootstrapError::SdkFailure { operation }).attach_printable(js_error_message(error))
}

/// The browser window the payment link is rendered in.
#[derive(Debug, Clone)]
pub struct BrowserPage {
    window: Window,
}

impl BrowserPage {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    pub fn current() -> Option<Self> {
        web_sys::window().map(Self::new)
    }

    fn global_string(&self, name: &str) -> Option<String> {
        Reflect::get(&self.window, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.as_string())
    }
}

impl FrameInspector for BrowserPage {
    fn parent_location_matches(&self) -> CustomResult<bool, FrameAccessError> {
        let parent = self
            .window
            .parent()
            .ok()
            .flatten()
            .ok_or_else(|| report!(FrameAccessError))?;
        let location = JsValue::from_str("location");

        let parent_location = Reflect::get(&parent, &location)
            .map_err(|error| report!(FrameAccessError).attach_printable(js_error_message(&error)))?;
        let own_location = Reflect::get(&self.window, &location)
            .map_err(|error| report!(FrameAccessError).attach_printable(js_error_message(&error)))?;

        Ok(parent_location == own_location)
    }
}

struct BrowserElement(Element);

impl PageElement for BrowserElement {
    fn is_container(&self) -> bool {
        self.0.dyn_ref::<HtmlDivElement>().is_some()
    }

    fn set_inner_html(&self, html: &str) {
        self.0.set_inner_html(html);
    }

    fn add_class(&self, class: &str) {
        if let Err(error) = self.0.class_list().add_1(class) {
            logger::warn!(class, error = %js_error_message(&error), "unable to add class");
        }
    }

    fn remove(&self) {
        self.0.remove();
    }
}

impl PageDocument for BrowserPage {
    fn element_by_id(&self, id: &str) -> Option<Box<dyn PageElement>> {
        self.window
            .document()?
            .get_element_by_id(id)
            .map(|element| Box::new(BrowserElement(element)) as Box<dyn PageElement>)
    }

    fn body(&self) -> Option<Box<dyn PageElement>> {
        self.window
            .document()?
            .body()
            .map(|body| Box::new(BrowserElement(body.into())) as Box<dyn PageElement>)
    }
}

impl Navigator for BrowserPage {
    fn current_url(&self) -> CustomResult<Url, NavigationError> {
        let href = self
            .window
            .location()
            .href()
            .map_err(|error| {
                report!(NavigationError::CurrentUrlUnavailable)
                    .attach_printable(js_error_message(&error))
            })?;

        Url::parse(&href).map_err(|error| {
            report!(NavigationError::CurrentUrlUnavailable).attach_printable(error.to_string())
        })
    }

    fn navigate_top(&self, target: &Url) -> CustomResult<(), NavigationError> {
        let denied = |reason: String| report!(NavigationError::PrivilegedNavigationDenied { reason });

        let top = self
            .window
            .top()
            .map_err(|error| denied(js_error_message(&error)))?
            .ok_or_else(|| denied("top-level browsing context is unavailable".to_string()))?;

        top.location()
            .set_href(target.as_str())
            .map_err(|error| denied(js_error_message(&error)))
    }

    fn navigate_current(&self, target: &Url) -> CustomResult<(), NavigationError> {
        self.window
            .location()
            .set_href(target.as_str())
            .map_err(|error| {
                report!(NavigationError::NavigationFailed {
                    reason: js_error_message(&error),
                })
            })
    }
}

impl Scheduler for BrowserPage {
    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::callback::Timeout::new(millis, task).forget();
    }
}

impl LogSink for BrowserPage {
    fn submit(&self, endpoint: &Url, record: LogRecord) {
        let endpoint = endpoint.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            let sent = match gloo_net::http::Request::post(&endpoint).json(&record) {
                Ok(request) => request.send().await.map(|_| ()),
                Err(error) => Err(error),
            };

            if let Err(error) = sent {
                let error = report!(LogDeliveryError { endpoint }).attach_printable(error.to_string());
                logger::warn!(?error, "log record was not delivered");
            }
        });
    }
}

/// The checkout SDK loaded on the page as the global `Hyper`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSdk;

struct BrowserClient(HyperClient);
struct BrowserWidgets(HyperWidgets);
struct BrowserWidget(HyperWidget);

impl CheckoutSdk for BrowserSdk {
    fn instantiate(
        &self,
        publishable_key: &str,
        options: &SdkClientOptions,
    ) -> CustomResult<Box<dyn SdkClient>, BootstrapError> {
        let client = hyper(publishable_key, &to_js(options)?)
            .map_err(|error| sdk_failure("Hyper", &error))?;
        Ok(Box::new(BrowserClient(client)))
    }

    fn show_sdk(
        &self,
        display_sdk_only: Option<bool>,
        enable_button_only_on_form_ready: Option<bool>,
    ) -> CustomResult<(), BootstrapError> {
        show_sdk(display_sdk_only, enable_button_only_on_form_ready)
            .map_err(|error| sdk_failure("showSDK", &error))
    }
}

impl SdkClient for BrowserClient {
    fn widgets(
        &self,
        options: &WidgetsOptions,
    ) -> CustomResult<Box<dyn WidgetsHandle>, BootstrapError> {
        let widgets = self
            .0
            .widgets(&to_js(options)?)
            .map_err(|error| sdk_failure("widgets", &error))?;
        Ok(Box::new(BrowserWidgets(widgets)))
    }
}

impl WidgetsHandle for BrowserWidgets {
    fn create(
        &self,
        kind: &str,
        options: &WidgetOptions,
    ) -> CustomResult<Box<dyn WidgetInstance>, BootstrapError> {
        let widget = self
            .0
            .create(kind, &to_js(options)?)
            .map_err(|error| sdk_failure("create", &error))?;
        Ok(Box::new(BrowserWidget(widget)))
    }
}

impl WidgetInstance for BrowserWidget {
    fn mount(&self, selector: &str) -> CustomResult<(), BootstrapError> {
        self.0
            .mount(selector)
            .map_err(|error| sdk_failure("mount", &error))
    }
}

fn load_settings(page: &BrowserPage) -> Result<Settings, String> {
    match page.global_string(SETTINGS_GLOBAL) {
        Some(overrides) => Settings::with_overrides(&overrides),
        None => Settings::default_settings(),
    }
    .map_err(|error| format!("Failed to load payment link settings: {error:?}"))
}

/// Implementation function for activating the payment link page
/// Called by the wasm_bindgen wrapper in lib.rs
pub fn initialize_payment_link_impl() -> Result<(), String> {
    console_error_panic_hook::set_once();

    let page = BrowserPage::current().ok_or("Browser window is unavailable")?;
    let encoded = page
        .global_string(PAYMENT_DETAILS_GLOBAL)
        .ok_or_else(|| format!("Payment details are missing from `window.{PAYMENT_DETAILS_GLOBAL}`"))?;
    let details = PaymentDetails::from_encoded(&encoded)
        .map_err(|error| format!("Failed to decode payment details: {error:?}"))?;
    let settings = load_settings(&page)?;

    let mut session = PaymentLinkSession::new(page, BrowserSdk, settings, details);
    match session
        .activate()
        .map_err(|error| format!("Failed to initialize payment link: {error:?}"))?
    {
        ActivationOutcome::WidgetMounted => logger::info!("payment link activated"),
        ActivationOutcome::NotAllowed(target) => {
            logger::warn!(?target, "payment link refused to activate");
        }
    }

    SESSION.with(|cell| cell.replace(Some(session)));
    Ok(())
}

/// Implementation function for the checkout completion redirect
/// Called by the wasm_bindgen wrapper in lib.rs
pub fn redirect_to_status_impl(payment_details: JsValue) -> Result<(), String> {
    let details: PaymentDetails = serde_wasm_bindgen::from_value(payment_details)
        .map_err(|error| format!("Failed to deserialize payment details: {error}"))?;

    let outcome = SESSION.with(|cell| match cell.borrow().as_ref() {
        Some(session) => session
            .redirect_to_status(&details)
            .map_err(|error| format!("{error:?}")),
        None => {
            let page = BrowserPage::current().ok_or("Browser window is unavailable")?;
            let settings = load_settings(&page)?;
            redirect::redirect_to_status(&page, &page, &settings.log_endpoints, &details)
                .map_err(|error| format!("{error:?}"))
        }
    })?;

    if let RedirectOutcome::Fallback(target) = outcome {
        logger::warn!(status_url = %target, "redirected current frame to status page");
    }
    Ok(())
}

/// Implementation function for validating payment details
/// Called by the wasm_bindgen wrapper in lib.rs
pub fn validate_payment_details_impl(details_json: &str) -> Result<String, String> {
    let details = PaymentDetails::from_json(details_json)
        .map_err(|error| format!("Failed to parse payment details: {error:?}"))?;

    serde_json::to_string(&validate::validate_payment_details(&details))
        .map_err(|error| format!("Failed to serialize validation report: {error}"))
}
