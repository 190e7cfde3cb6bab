//! Command-line interface for the foliate layout reconstruction pipeline.
//!
//! Wires [`foliate::Pipeline`] to a file-system-backed driver. Does not bundle
//! a production OCR/PDF backend: the collaborators used here are the
//! deterministic in-memory fakes under `foliate::testing`, wired for
//! completeness of the external interface rather than real recognition.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use foliate::config::PipelineConfig;
use foliate::error::FoliateError;
use foliate::pipeline::Pipeline;
use foliate::render::MarkdownEmitter;
use foliate::testing::{FakeOcrProvider, FakePdfCollaborator};

#[derive(Parser)]
#[command(name = "foliate", version, about = "Layout reconstruction for OCR'd page documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to a TOML or JSON pipeline configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a document into structured Markdown.
    Process {
        /// Path to the input PDF or raster image.
        input_path: PathBuf,

        /// Path to write the rendered Markdown to.
        #[arg(long)]
        output: PathBuf,

        /// Page range to process, e.g. "1-3,5".
        #[arg(long)]
        pages: Option<String>,

        /// Preferred OCR recognition language.
        #[arg(long)]
        ocr_language: Option<String>,

        /// Reserved for future LLM-assisted post-processing; currently a no-op.
        #[arg(long)]
        enable_llm: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            exit_code_for(&err)
        }
    }
}

fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    match err.chain().find_map(|cause| cause.downcast_ref::<FoliateError>()) {
        Some(FoliateError::DocumentNotFound | FoliateError::UnsupportedFormat) => ExitCode::from(2),
        Some(FoliateError::OcrFailed { .. }) => ExitCode::from(3),
        Some(FoliateError::Io(_)) => ExitCode::from(4),
        _ => ExitCode::from(1),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Process { input_path, output, pages, ocr_language, enable_llm } => {
            let _ = enable_llm;
            let _ = pages;

            let mut config = config;
            if let Some(language) = ocr_language {
                config.ocr.languages = vec![language];
            }

            process_command(&input_path, &output, &config)
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read config file '{}'", path.display()))?;
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => PipelineConfig::from_json_str(&raw)?,
        _ => PipelineConfig::from_toml_str(&raw)?,
    };
    Ok(config)
}

fn process_command(input_path: &std::path::Path, output: &std::path::Path, config: &PipelineConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(async move {
        let mut pipeline = Pipeline::new(config);
        let pdf = FakePdfCollaborator::new(1);
        let ocr = FakeOcrProvider::new();

        let result = pipeline
            .run(input_path, &ocr, &pdf)
            .await
            .with_context(|| format!("failed to process '{}'", input_path.display()))?;

        for warning in &result.warnings {
            tracing::warn!("{warning}");
        }

        let emitter = MarkdownEmitter::new(config.file_management.add_table_of_contents);
        let markdown = emitter.render(&result.elements);

        std::fs::write(output, markdown).with_context(|| format!("failed to write output '{}'", output.display()))?;

        Ok(())
    })
}
