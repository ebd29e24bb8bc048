use anyhow::Context;
use emeraude::{
    api::GeminiClient,
    app::App,
    config::initialize_config,
    logging::init_logging,
    ui::run_ui,
};
use log::info;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = initialize_config().context("failed to load configuration")?;
    let _logger = init_logging(&config).context("failed to start logging")?;
    info!("Starting Emeraude with model {}", config.model);

    let service = Arc::new(GeminiClient::new(&config));
    let (app, events) = App::new(service, config.context_char_limit);

    run_ui(app, events).await?;

    info!("Emeraude exited cleanly");
    Ok(())
}
