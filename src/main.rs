//! Cardiolens: Heart-disease risk dashboard
//!
//! Main entry point for the terminal application.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardiolens::adapters::sanitize::RedactingMakeWriter;
use cardiolens::adapters::ModelBundle;
use cardiolens::application::AssessmentService;
use cardiolens::config::Settings;
use cardiolens::tui::App;

fn main() -> Result<()> {
    let settings = Settings::from_env()?;

    // Writing logs to the terminal would corrupt the TUI (alternate screen),
    // so interactive sessions log to a file unless told otherwise.
    let interactive = std::io::stdout().is_terminal();

    let (writer, _guard) = if settings.log_mode.use_file(interactive) {
        if let Some(parent) = settings.log_file.parent() {
            // Best-effort: the open below reports the real error.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&settings.log_file)
            .with_context(|| format!("Failed to open log file {:?}", settings.log_file))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(RedactingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting Cardiolens...");

    // Refuse to start without a usable model.
    let bundle = ModelBundle::load(&settings.model_path, settings.require_manifest)
        .with_context(|| format!("Failed to load model from {:?}", settings.model_path))?;

    let service = AssessmentService::new(bundle.scaler, bundle.classifier);

    let mut app = App::new(service);
    app.run()?;

    tracing::info!("Cardiolens shutdown complete.");
    Ok(())
}
