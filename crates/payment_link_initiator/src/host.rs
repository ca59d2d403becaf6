//! Collaborators the initiator drives but does not own: the page, its frames, navigation, timers,
//! the log endpoint and the checkout SDK.
//!
//! The browser implementations live in the `wasm` module; tests provide recording doubles.

use std::time::Duration;

use url::Url;

use crate::{
    errors::{BootstrapError, CustomResult, FrameAccessError, NavigationError},
    types::{LogRecord, SdkClientOptions, WidgetOptions, WidgetsOptions},
};

/// Inspects the frame hierarchy the page is loaded in.
pub trait FrameInspector {
    /// Whether the embedding context's location object is the current context's own.
    ///
    /// Fails when the browser denies access to the parent context, which only happens when the
    /// parent belongs to another origin.
    fn parent_location_matches(&self) -> CustomResult<bool, FrameAccessError>;
}

/// A DOM element owned by the page.
pub trait PageElement {
    /// Whether the element is a `div`.
    fn is_container(&self) -> bool;

    fn set_inner_html(&self, html: &str);

    fn add_class(&self, class: &str);

    /// Detaches the element from the document.
    fn remove(&self);
}

pub trait PageDocument {
    fn element_by_id(&self, id: &str) -> Option<Box<dyn PageElement>>;

    fn body(&self) -> Option<Box<dyn PageElement>>;
}

/// Navigation of the current page and of the top-level browsing context.
pub trait Navigator {
    fn current_url(&self) -> CustomResult<Url, NavigationError>;

    /// Navigates the top-level browsing context, escaping the frame the page lives in.
    fn navigate_top(&self, target: &Url) -> CustomResult<(), NavigationError>;

    /// Navigates the browsing context the page itself is loaded in.
    fn navigate_current(&self, target: &Url) -> CustomResult<(), NavigationError>;
}

/// Runs deferred work on the page's event loop. Deferred tasks are not cancellable.
pub trait Scheduler {
    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

/// Fire-and-forget delivery of diagnostic records. Delivery failures must be swallowed.
pub trait LogSink {
    fn submit(&self, endpoint: &Url, record: LogRecord);
}

/// Everything the page host offers the initiator.
pub trait PageHost: FrameInspector + PageDocument + Navigator + Scheduler + LogSink {}

impl<T> PageHost for T where T: FrameInspector + PageDocument + Navigator + Scheduler + LogSink {}

/// Entry point of the checkout SDK loaded on the page.
pub trait CheckoutSdk {
    fn instantiate(
        &self,
        publishable_key: &str,
        options: &SdkClientOptions,
    ) -> CustomResult<Box<dyn SdkClient>, BootstrapError>;

    /// Reveals the SDK area of the page.
    fn show_sdk(
        &self,
        display_sdk_only: Option<bool>,
        enable_button_only_on_form_ready: Option<bool>,
    ) -> CustomResult<(), BootstrapError>;
}

pub trait SdkClient {
    fn widgets(
        &self,
        options: &WidgetsOptions,
    ) -> CustomResult<Box<dyn WidgetsHandle>, BootstrapError>;
}

pub trait WidgetsHandle {
    fn create(
        &self,
        kind: &str,
        options: &WidgetOptions,
    ) -> CustomResult<Box<dyn WidgetInstance>, BootstrapError>;
}

pub trait WidgetInstance {
    fn mount(&self, selector: &str) -> CustomResult<(), BootstrapError>;
}

