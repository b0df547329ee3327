use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use shelf_app::{modules::books, shell};
use shelf_kernel::settings::Settings;

/// Manage a remote book inventory from the terminal
#[derive(Debug, Parser)]
#[command(name = "shelf-app", version, about)]
struct Args {
    /// Directory holding base.toml and <env>.toml
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Environment overlay to load (local, staging, production)
    #[arg(long = "env")]
    environment: Option<String>,

    /// Books collection URL; overrides every configured value
    #[arg(long)]
    endpoint: Option<String>,
}

impl Args {
    fn load_settings(&self) -> anyhow::Result<Settings> {
        let mut settings =
            Settings::load_with(self.config_dir.as_deref(), self.environment.as_deref())?;

        if let Some(endpoint) = &self.endpoint {
            settings.api.endpoint.clone_from(endpoint);
        }
        Ok(settings)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = args
        .load_settings()
        .with_context(|| "failed to load shelf settings")?;

    shelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        endpoint = %settings.api.endpoint,
        "shelf-app starting"
    );

    let mut controller = books::create_controller(&settings)?;
    controller.load().await;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    shell::run(&mut controller, stdin, &mut stdout).await?;

    tracing::info!("shelf-app stopped");
    Ok(())
}
