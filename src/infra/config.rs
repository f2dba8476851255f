use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use camino::Utf8PathBuf;
use config::Config;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Clone, Deserialize, Debug)]
pub struct Settings {
    pub environment: String,
    pub application: ServerSettings,
    pub payments: PaymentSettings,
    pub upi: UpiSettings,
    pub catalog: CatalogSettings,
    pub checkout: CheckoutSettings,
}

#[derive(Clone, Deserialize, Debug)]
pub struct ServerSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub logs_directory: String,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", &self.host, &self.port)
    }
}

/// Settings for the card payment processor the backend delegates to.
#[derive(Clone, Deserialize, Debug)]
pub struct PaymentSettings {
    pub processor_base_url: String,
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default)]
    pub webhook_secret: Option<String>,
    pub default_currency: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub request_timeout_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub webhook_tolerance_secs: i64,
}

impl PaymentSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct UpiSettings {
    pub merchant_upi_id: String,
    pub merchant_name: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub qr_size: u32,
    pub dark_color: String,
    pub light_color: String,
}

#[derive(Clone, Deserialize, Debug)]
pub struct CatalogSettings {
    pub enam_url: String,
    pub fruityvice_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub fetch_timeout_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub enam_limit: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub fruityvice_limit: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_size: usize,
}

impl CatalogSettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

/// Settings used by the checkout client, i.e. whoever drives a `Checkout`.
#[derive(Clone, Deserialize, Debug)]
pub struct CheckoutSettings {
    pub backend_base_url: String,
    pub currency: String,
    pub default_upi_id: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub qr_debounce_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub card_success_delay_ms: u64,
}

impl CheckoutSettings {
    pub fn qr_debounce(&self) -> Duration {
        Duration::from_millis(self.qr_debounce_ms)
    }

    pub fn card_success_delay(&self) -> Duration {
        Duration::from_millis(self.card_success_delay_ms)
    }
}

fn find_config_dir() -> anyhow::Result<PathBuf> {
    let current_dir =
        std::env::current_dir().context("Failed to determine the current directory.")?;
    let current_dir =
        Utf8PathBuf::try_from(current_dir).context("Could not convert PathBuf to Utf8PathBuf")?;

    let config_dir = current_dir
        .ancestors()
        .map(|p| p.join("config"))
        .find(|p| {
            let base_path = p.join("base.yaml");
            p.exists() && p.is_dir() && base_path.exists() && base_path.is_file()
        })
        .ok_or_else(|| anyhow::anyhow!("Cannot find config directory!"))?;

    config_dir
        .canonicalize()
        .with_context(|| format!("Could not canonicalize config directory {config_dir}"))
}

pub fn get_config_settings() -> anyhow::Result<Settings> {
    let config_directory = find_config_dir()?;

    // Detect the running environment - default to `development` if unspecified.
    let environment: String =
        std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".to_owned());

    let base_source = config::File::from(config_directory.join("base")).required(true);

    let env_source = config::File::from(config_directory.join(environment.as_str())).required(true);

    // Override settings from environment variables with a prefix of APP and '__' as separator,
    // e.g. `APP_PAYMENTS__SECRET_KEY=sk_test_...` sets `Settings.payments.secret_key`.
    let overrides_source = config::Environment::with_prefix("app").separator("__");

    let config = Config::builder()
        .add_source(base_source)
        .add_source(env_source)
        .add_source(overrides_source)
        .build()?;

    config
        .try_deserialize()
        .context("Could not deserialise config settings.")
}
