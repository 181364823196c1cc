//! Grocery client entry-point: loads settings, wires the backend and runs
//! the console front-end on stdin/stdout.

use std::io;

use color_eyre::eyre::{Result, eyre};
use ortho_config::OrthoConfig;
use tokio::io::BufReader;
use tracing::info;

use grocery_app::inbound::console::ConsoleApp;
use grocery_app::telemetry::init_tracing;
use grocery_app::{AppSettings, build_backend};

/// Application bootstrap.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let backend = build_backend(&settings)?;
    let mut app = ConsoleApp::new(&backend, settings.redirect_delay());

    info!("console ready");
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout().lock();
    app.run(stdin, &mut stdout).await?;
    info!("console closed");
    Ok(())
}
