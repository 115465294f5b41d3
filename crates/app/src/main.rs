//! envscope binary.

use envscope::{cli, logging, run};
use envscope_infrastructure::SettingsRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::parse();

    let settings = cli
        .settings
        .clone()
        .map_or_else(SettingsRepository::new, SettingsRepository::at)
        .load()
        .await?;

    logging::init(settings.log_level);
    tracing::debug!(state = %cli.state.display(), "Starting envscope v{}", env!("CARGO_PKG_VERSION"));

    let mut stdout = std::io::stdout().lock();
    run(&cli, settings, &mut stdout).await?;

    Ok(())
}
