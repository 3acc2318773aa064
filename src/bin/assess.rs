//! Headless assessment of a single patient record.
//!
//! Reads a JSON record keyed by dataset column names and prints the same
//! report the dashboard shows, or the full assessment as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin assess -- <record.json> [--json] [--models <dir>]
//! ```
//!
//! Logs go to stderr so stdout only carries the report.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardiolens::adapters::sanitize::RedactingMakeWriter;
use cardiolens::adapters::ModelBundle;
use cardiolens::application::AssessmentService;
use cardiolens::config::Settings;
use cardiolens::report::TextReport;
use cardiolens::PatientRecord;

struct Args {
    record: PathBuf,
    json: bool,
    models: Option<PathBuf>,
}

fn usage() -> anyhow::Error {
    anyhow!("Usage: assess <record.json> [--json] [--models <dir>]")
}

fn parse_args() -> Result<Args> {
    let mut args = env::args().skip(1);
    let mut record: Option<PathBuf> = None;
    let mut json = false;
    let mut models: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--models" => {
                let v = args.next().ok_or_else(usage)?;
                models = Some(PathBuf::from(v));
            }
            "-h" | "--help" => return Err(usage()),
            _ => {
                if record.is_none() {
                    record = Some(PathBuf::from(arg));
                } else {
                    return Err(usage());
                }
            }
        }
    }

    Ok(Args {
        record: record.ok_or_else(usage)?,
        json,
        models,
    })
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let settings = Settings::from_env()?;

    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(RedactingMakeWriter::new(writer)))
        .init();

    let model_dir = args.models.unwrap_or(settings.model_path);
    let bundle = ModelBundle::load(&model_dir, settings.require_manifest)
        .with_context(|| format!("Failed to load model from {model_dir:?}"))?;
    let service = AssessmentService::new(bundle.scaler, bundle.classifier);

    let raw = fs::read_to_string(&args.record)
        .with_context(|| format!("Failed to read {:?}", args.record))?;
    let record: PatientRecord = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid patient record in {:?}", args.record))?;

    let assessment = service.assess(record)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        println!("{}", TextReport(&assessment));
    }

    Ok(())
}
