use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
mod data;
mod rainbow;
mod session;
use crate::data::config::{normalize_args, Cli, Config};
use crate::rainbow::ColorCycle;
use crate::session::Session;

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(why) = signal::ctrl_c().await {
            error!("Could not register ctrl+c handler: {}", why);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(why) => {
                error!("Could not register SIGTERM handler: {}", why);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {}
        _ = terminate => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,serenity=warn")),
        )
        .init();

    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    let config = Config::load(cli)?;

    let session = Session::open(&config.token).await?;
    info!(
        "Bot is now running, changing role {} every {:?}. Press CTRL+C to exit.",
        config.role_id, config.interval
    );

    ColorCycle::new(
        session.roles(),
        config.guild_id,
        config.role_id,
        config.interval,
    )
    .run(shutdown_signal())
    .await;

    info!("Shutting down bot.");
    session.close().await;
    Ok(())
}
