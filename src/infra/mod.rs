mod cli;
mod client_error;
mod config;

pub use cli::Cli;
pub use client_error::{ClientError, ErrorResponse};
pub use config::{
    CatalogSettings, CheckoutSettings, PaymentSettings, ServerSettings, Settings, UpiSettings,
    get_config_settings,
};
