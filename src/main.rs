use clap::Parser;
use tracing_subscriber::EnvFilter;

use creator_dashboard::app;
use creator_dashboard::config::{Cli, Config};
use creator_dashboard::render;
use creator_dashboard::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so rendered views stay clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli)?;
    tracing::debug!("Backend: {}", config.api.base_url);

    let state = AppState::from_config(config)?;
    let mut notices = state.notices.subscribe();

    let output = app::run(&state, cli.command).await?;

    while let Ok(notice) = notices.try_recv() {
        println!("{}", render::notification(&notice));
    }
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
