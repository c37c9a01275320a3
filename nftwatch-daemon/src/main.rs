use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use nftwatch_daemon::cli::Cli;
use nftwatch_daemon::{app, exposition, logging, server};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config().await?;

    if cli.validate {
        app::build_filters(&config)?;
        println!("configuration is valid");
        return Ok(());
    }

    logging::init_tracing(&config.general)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "nftwatch starting");

    let collector = app::build_collector(&config, cli.ruleset_file.as_deref())?;

    if cli.once {
        let body = tokio::task::spawn_blocking(move || exposition::render(&*collector)).await?;
        print!("{body}");
        return Ok(());
    }

    let listener = server::bind(&config.http.listen_addr).await?;
    let signals = server::spawn_signal_listener()?;
    tracing::info!(
        listen_addr = %config.http.listen_addr,
        endpoint = %config.http.endpoint,
        "serving metrics"
    );

    server::serve(
        listener,
        server::router(collector),
        signals,
        Duration::from_secs(config.http.shutdown_timeout_secs),
    )
    .await?;

    tracing::info!("nftwatch shut down");
    Ok(())
}
