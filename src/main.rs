use std::{env, fs, sync::Arc};

use anyhow::{Context, Result};
use log::info;
use tokio::{net::TcpListener, signal};

use production_calendar::{
    cli,
    server::{self, AppState},
    CalendarOptions, ViewBinder, DEFAULT_TEMPLATE,
};

fn setup_logging() {
    if env::var("LOG").is_err() {
        env::set_var("LOG", "production_calendar=info");
    }

    pretty_env_logger::init_custom_env("LOG");
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {err}");
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse(env::args().skip(1).collect());

    setup_logging();

    let template = match &args.template {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read template `{}`", path.display()))?,
        None => DEFAULT_TEMPLATE.to_string(),
    };

    // Refuse to start on a template the calendar cannot mount into.
    ViewBinder::initialize(template.as_str(), &args.container, CalendarOptions::default())?
        .destroy();

    let state = Arc::new(AppState {
        records: args.records,
        template,
        container: args.container,
        options: CalendarOptions::default(),
        policy: args.missing,
    });

    let listener = TcpListener::bind(args.address)
        .await
        .with_context(|| format!("Failed to bind {}", args.address))?;
    info!("Listening at http://{}", args.address);

    axum::serve(listener, server::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
