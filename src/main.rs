mod app;
mod assistant;
mod classifier;
mod config;
mod console;
mod domain;
mod history;
mod infrastructure;
mod report;
mod scan;

use anyhow::Result;
use infrastructure::{directories, logging, shutdown};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories, &config.report)?;
    logging::init_tracing(&config, &paths)?;

    let shutdown = shutdown::Shutdown::new();
    shutdown::install_signal_handlers(shutdown.clone());

    let app = app::ShieldConsoleApp::initialize(config, paths, shutdown)?;
    app.run().await
}
