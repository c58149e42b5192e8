use std::env;
use std::path::Path;

use eyre::{Result, WrapErr};
use ferpa_core::models::document::TeacherDocument;
use ferpa_core::models::roster::ClassRoster;
use ferpa_pipeline::config::FerpaConfig;
use ferpa_pipeline::pipeline::FeedbackPipeline;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: ferpa-pipeline <document.json> [roster.json]";

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).wrap_err_with(|| format!("failed to parse {}", path.display()))
}

fn main() -> Result<()> {
    color_eyre::install()?;

    // Logs go to stderr as JSON; stdout carries the processed document.
    tracing_subscriber::fmt()
        .json()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = env::args_os().skip(1);
    let document_path = args.next().ok_or_else(|| eyre::eyre!(USAGE))?;
    let roster_path = args.next();

    let config = match env::var_os("FERPA_CONFIG") {
        Some(path) => FerpaConfig::load(&path)
            .wrap_err_with(|| format!("invalid config {}", Path::new(&path).display()))?,
        None => FerpaConfig::default(),
    };

    let document: TeacherDocument = read_json(Path::new(&document_path))?;
    let roster: Option<ClassRoster> = roster_path
        .as_deref()
        .map(|p| read_json(Path::new(p)))
        .transpose()?;

    let pipeline = FeedbackPipeline::new(config, roster.as_ref())?;
    let (processed, summary) = pipeline.process_document(&document);

    tracing::info!(summary = %serde_json::to_string(&summary)?, "processing summary");
    println!("{}", serde_json::to_string_pretty(&processed)?);
    Ok(())
}
