//!
//! Deployment environment the page is served from.
//!

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use crate::configs::LogEndpoints;

///
/// Deployment serving the current page.
///
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Env {
    /// Sandbox and every non production deployment.
    #[default]
    Sandbox,
    /// Production environment.
    Production,
}

impl Env {
    /// Production iff the page host is one of the configured production hosts.
    pub fn from_url(url: &Url, endpoints: &LogEndpoints) -> Self {
        let is_production = url.host_str().is_some_and(|host| {
            endpoints
                .production_hosts
                .iter()
                .any(|production_host| production_host.eq_ignore_ascii_case(host))
        });

        if is_production {
            Self::Production
        } else {
            Self::Sandbox
        }
    }
}

/// Log ingestion endpoint matching the deployment that served `url`.
pub fn log_endpoint_for(url: &Url, endpoints: &LogEndpoints) -> Url {
    endpoints
        .endpoint_for(Env::from_url(url, endpoints))
        .clone()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::configs::Settings;

    #[test]
    fn test_production_host_resolves_production_endpoint() {
        let settings = Settings::default_settings().unwrap();
        let url = Url::parse("https://api.hyperswitch.io/payment_link/merchant_1/pay_1").unwrap();

        assert_eq!(
            Env::from_url(&url, &settings.log_endpoints),
            Env::Production
        );
        assert_eq!(
            log_endpoint_for(&url, &settings.log_endpoints).as_str(),
            "https://api.hyperswitch.io/logs/browser"
        );
    }

    #[test]
    fn test_other_hosts_resolve_sandbox_endpoint() {
        let settings = Settings::default_settings().unwrap();

        for page in [
            "https://sandbox.hyperswitch.io/api/payment_link/merchant_1/pay_1",
            "https://integ.hyperswitch.io/api/payment_link/merchant_1/pay_1",
            "http://localhost:8080/payment_link/merchant_1/pay_1",
        ] {
            let url = Url::parse(page).unwrap();
            assert_eq!(Env::from_url(&url, &settings.log_endpoints), Env::Sandbox);
            assert_eq!(
                log_endpoint_for(&url, &settings.log_endpoints).as_str(),
                "https://sandbox.hyperswitch.io/logs/browser"
            );
        }
    }

    #[test]
    fn test_env_display() {
        assert_eq!(Env::Production.to_string(), "production");
        assert_eq!("sandbox".parse::<Env>().unwrap(), Env::Sandbox);
    }
}
