use agri_market::{
    configure_tracing, construct_app_state,
    infra::{Cli, get_config_settings},
    start_server,
};
use anyhow::Context;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = get_config_settings().context("Could not read application configuration.")?;

    // _worker_guard is pulled back into the scope of main() to ensure all tracing events get
    // written to the log file when the program terminates, which is done when _worker_guard is
    // dropped.
    let _worker_guard = configure_tracing(&settings);

    let app_state = construct_app_state(settings)?;
    if !app_state.processor.is_configured() {
        info!("No payment processor key configured; card payments will be refused.");
    }

    start_server(app_state, !cli.skip_catalog_prefetch).await
}
