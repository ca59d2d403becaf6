//! Settings of the payment link initiator.
//!
//! Defaults ship inside the crate (`config/payment_link.toml`); deployments layer their own TOML
//! document on top of them with [`Settings::with_overrides`].

use config::{builder::DefaultState, Config, ConfigBuilder, File, FileFormat};
use error_stack::{report, ResultExt};
use serde::Deserialize;
use url::Url;

use crate::{
    env::Env,
    errors::{ConfigError, CustomResult},
};

const DEFAULT_SETTINGS: &str = include_str!("../config/payment_link.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub sdk: SdkSettings,
    pub page: PageSettings,
    pub log_endpoints: LogEndpoints,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SdkSettings {
    pub publishable_key: String,
    pub mount_selector: String,
    pub widget_kind: String,
    pub default_theme: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageSettings {
    pub container_id: String,
    pub shimmer_id: String,
    pub shimmer_fade_class: String,
    pub shimmer_removal_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogEndpoints {
    /// Hostnames served by the production deployment.
    pub production_hosts: Vec<String>,
    pub production: LogEndpoint,
    pub sandbox: LogEndpoint,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogEndpoint {
    pub url: Url,
}

impl LogEndpoints {
    pub fn endpoint_for(&self, env: Env) -> &Url {
        match env {
            Env::Production => &self.production.url,
            Env::Sandbox => &self.sandbox.url,
        }
    }
}

impl Settings {
    /// Settings shipped with the crate.
    pub fn default_settings() -> CustomResult<Self, ConfigError> {
        Self::build(
            Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml)),
        )
    }

    /// Parses a complete settings document.
    pub fn from_toml_str(document: &str) -> CustomResult<Self, ConfigError> {
        Self::build(
            Config::builder().add_source(File::from_str(document, FileFormat::Toml)),
        )
    }

    /// Layers a partial settings document over the defaults. Tables are merged key by key, any
    /// other value in `overrides` replaces the default.
    pub fn with_overrides(overrides: &str) -> CustomResult<Self, ConfigError> {
        Self::build(
            Config::builder()
                .add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml))
                .add_source(File::from_str(overrides, FileFormat::Toml)),
        )
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> CustomResult<Self, ConfigError> {
        let settings: Self = builder
            .build()
            .change_context(ConfigError::DeserializationFailed)
            .attach_printable("Unable to read payment link settings")?
            .try_deserialize()
            .change_context(ConfigError::DeserializationFailed)
            .attach_printable("Unable to deserialize payment link settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> CustomResult<(), ConfigError> {
        let required = [
            ("sdk.publishable_key", &self.sdk.publishable_key),
            ("sdk.mount_selector", &self.sdk.mount_selector),
            ("sdk.widget_kind", &self.sdk.widget_kind),
            ("sdk.default_theme", &self.sdk.default_theme),
            ("page.container_id", &self.page.container_id),
            ("page.shimmer_id", &self.page.shimmer_id),
            ("page.shimmer_fade_class", &self.page.shimmer_fade_class),
        ];

        if let Some((field_name, _)) = required
            .iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            return Err(report!(ConfigError::InvalidConfigurationValue {
                field_name: *field_name,
            }))
            .attach_printable("Setting must not be empty");
        }

        if self.log_endpoints.production_hosts.is_empty() {
            return Err(report!(ConfigError::InvalidConfigurationValue {
                field_name: "log_endpoints.production_hosts",
            }))
            .attach_printable("At least one production host is required");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default_settings().unwrap();

        assert_eq!(settings.sdk.mount_selector, "#unified-checkout");
        assert_eq!(settings.sdk.widget_kind, "payment");
        assert_eq!(settings.page.shimmer_removal_delay_ms, 500);
        assert_eq!(settings.page.container_id, "payment-link");
        assert_eq!(
            settings.log_endpoints.endpoint_for(Env::Production).as_str(),
            "https://api.hyperswitch.io/logs/browser"
        );
    }

    #[test]
    fn test_overrides_are_layered_over_defaults() {
        let settings = Settings::with_overrides(
            r#"
            [sdk]
            publishable_key = "pk_prd_merchant"

            [log_endpoints.sandbox]
            url = "https://logs.internal.test/browser"
            "#,
        )
        .unwrap();

        assert_eq!(settings.sdk.publishable_key, "pk_prd_merchant");
        assert_eq!(settings.sdk.mount_selector, "#unified-checkout");
        assert_eq!(
            settings.log_endpoints.endpoint_for(Env::Sandbox).as_str(),
            "https://logs.internal.test/browser"
        );
    }

    #[test]
    fn test_empty_publishable_key_is_rejected() {
        let result = Settings::with_overrides(
            r#"
            [sdk]
            publishable_key = " "
            "#,
        );

        assert!(matches!(
            result.unwrap_err().current_context(),
            ConfigError::InvalidConfigurationValue {
                field_name: "sdk.publishable_key"
            }
        ));
    }

    #[test]
    fn test_invalid_endpoint_url_is_rejected() {
        let result = Settings::with_overrides(
            r#"
            [log_endpoints.production]
            url = "not a url"
            "#,
        );

        assert!(matches!(
            result.unwrap_err().current_context(),
            ConfigError::DeserializationFailed
        ));
    }

    #[test]
    fn test_incomplete_document_is_rejected() {
        let result = Settings::from_toml_str(
            r#"
            [sdk]
            publishable_key = "pk_snd_payment_link"
            "#,
        );

        assert!(matches!(
            result.unwrap_err().current_context(),
            ConfigError::DeserializationFailed
        ));
    }
}
