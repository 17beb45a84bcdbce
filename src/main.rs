use anyhow::Result;
use clap::Parser;
use resume_studio::cli::{handle_command, Cli};
use resume_studio::{AppConfig, LogFormat};
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

const DEFAULT_LOG_FILTER: &str = "resume_studio=info,rocket::server=off";

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => Registry::default()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    // The subscriber needs the configured format, so loading is logged afterwards
    init_tracing(config.log_format);

    let config_file = AppConfig::config_file()?;
    if config_file.exists() {
        info!("Configuration loaded from {}", config_file.display());
    } else {
        info!(
            "No configuration file at {}, using defaults",
            config_file.display()
        );
    }
    info!(
        "Environment: {}, output: {}",
        resume_studio::config::environment(),
        config.output_path.display()
    );

    handle_command(cli, config).await
}
