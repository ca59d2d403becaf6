//! The bootstrap session shared by the framing guard, the widget bootstrapper and the completion
//! redirector.

use error_stack::ResultExt;

use crate::{
    bootstrap,
    configs::Settings,
    errors::{BootstrapError, CustomResult, NavigationError},
    guard::{self, FramingState, NotAllowedTarget},
    host::{CheckoutSdk, PageHost, SdkClient, WidgetInstance, WidgetsHandle},
    locale::Translations,
    logger,
    redirect::{self, RedirectOutcome},
    types::{PaymentDetails, SdkClientOptions, WidgetsOptions},
};

/// Observable result of [`PaymentLinkSession::activate`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ActivationOutcome {
    WidgetMounted,
    /// The page is not framed; the not-allowed message was rendered instead of the widget.
    NotAllowed(NotAllowedTarget),
}

/// State of one payment link page: its collaborators, its payment details and the SDK handles
/// obtained while bringing the widget up.
pub struct PaymentLinkSession<H, S> {
    host: H,
    sdk: S,
    settings: Settings,
    translations: Translations,
    details: PaymentDetails,
    framing: Option<FramingState>,
    client: Option<Box<dyn SdkClient>>,
    widgets: Option<Box<dyn WidgetsHandle>>,
    payment_widget: Option<Box<dyn WidgetInstance>>,
    mounted: bool,
}

impl<H, S> std::fmt::Debug for PaymentLinkSession<H, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentLinkSession")
            .field("details", &self.details)
            .field("framing", &self.framing)
            .field("client", &self.client.is_some())
            .field("widgets", &self.widgets.is_some())
            .field("payment_widget", &self.payment_widget.is_some())
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl<H, S> PaymentLinkSession<H, S>
where
    H: PageHost,
    S: CheckoutSdk,
{
    pub fn new(host: H, sdk: S, settings: Settings, details: PaymentDetails) -> Self {
        let translations = Translations::for_locale(details.locale.as_deref());
        Self {
            host,
            sdk,
            settings,
            translations,
            details,
            framing: None,
            client: None,
            widgets: None,
            payment_widget: None,
            mounted: false,
        }
    }

    /// Replaces the built-in translations, e.g. with a table rendered by the server.
    #[must_use]
    pub fn with_translations(mut self, translations: Translations) -> Self {
        self.translations = translations;
        self
    }

    /// Activation entry point: brings the widget up when the page is framed, renders the
    /// not-allowed message otherwise. Never both.
    #[logger::instrument(skip_all)]
    pub fn activate(&mut self) -> CustomResult<ActivationOutcome, BootstrapError> {
        let framing = FramingState::detect(&self.host);
        self.framing = Some(framing);

        if !framing.is_framed() {
            logger::warn!(%framing, "payment link opened outside of an iframe");
            let target = guard::render_not_allowed(
                &self.host,
                &self.settings.page.container_id,
                &self.translations,
            );
            return Ok(ActivationOutcome::NotAllowed(target));
        }

        self.initialize_widget()?;
        Ok(ActivationOutcome::WidgetMounted)
    }

    /// Creates the SDK client and the payment widget, mounts it and reveals it.
    pub fn initialize_widget(&mut self) -> CustomResult<(), BootstrapError> {
        let appearance = bootstrap::build_appearance(&self.details, &self.settings.sdk.default_theme);

        let client = self.client.insert(
            self.sdk
                .instantiate(
                    &self.settings.sdk.publishable_key,
                    &SdkClientOptions::TOP_REDIRECTION,
                )
                .attach_printable("Unable to instantiate the checkout SDK client")?,
        );

        let widgets = self.widgets.insert(
            client
                .widgets(&WidgetsOptions {
                    appearance,
                    client_secret: self.details.client_secret.clone(),
                    locale: self.details.locale.clone(),
                })
                .attach_printable("Unable to obtain the widgets handle")?,
        );

        let options = bootstrap::build_widget_options(&self.details);
        let payment_widget = self.payment_widget.insert(
            widgets
                .create(&self.settings.sdk.widget_kind, &options)
                .attach_printable("Unable to create the payment widget")?,
        );

        let selector = &self.settings.sdk.mount_selector;
        payment_widget.mount(selector).attach_printable_lazy(|| {
            format!("Unable to mount the payment widget into {selector}")
        })?;
        self.mounted = true;
        logger::info!(selector = %self.settings.sdk.mount_selector, "payment widget mounted");

        self.sdk.show_sdk(
            self.details.display_sdk_only,
            self.details.enable_button_only_on_form_ready,
        )?;

        bootstrap::reveal_payment_form(&self.host, &self.host, &self.settings.page);
        Ok(())
    }

    /// Completion entry point, invoked by the widget once checkout concludes.
    #[logger::instrument(skip_all)]
    pub fn redirect_to_status(
        &self,
        details: &PaymentDetails,
    ) -> CustomResult<RedirectOutcome, NavigationError> {
        redirect::redirect_to_status(
            &self.host,
            &self.host,
            &self.settings.log_endpoints,
            details,
        )
    }

    pub fn details(&self) -> &PaymentDetails {
        &self.details
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Framing detected by the last activation, if any.
    pub fn framing(&self) -> Option<FramingState> {
        self.framing
    }

    pub fn is_widget_mounted(&self) -> bool {
        self.mounted
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    pub fn has_widgets(&self) -> bool {
        self.widgets.is_some()
    }

    /// Whether the payment widget was created, mounted or not.
    pub fn has_payment_widget(&self) -> bool {
        self.payment_widget.is_some()
    }
}
