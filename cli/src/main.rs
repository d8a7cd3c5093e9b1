//! docx-numbering - Resolve list numbering in a DOCX file
//!
//! Reads the document, numbering and styles parts, assigns numbers to every
//! numbered paragraph, and writes the result as HTML, a CSS counter
//! stylesheet, or a JSON dump of the resolved paragraphs.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use docx_io::{import_docx, number_document, HtmlWriter};
use numbering_engine::{RenderMode, SettingsLoader};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docx-numbering")]
#[command(about = "Resolve DOCX list numbering and emit HTML, CSS or JSON")]
struct Args {
    /// Path to the .docx file
    file: PathBuf,

    /// Settings file (JSON); defaults are used when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// How numbers appear in HTML output (overrides the settings file)
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Literal,
    Counter,
    Both,
}

impl From<ModeArg> for RenderMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Literal => RenderMode::Literal,
            ModeArg::Counter => RenderMode::Counter,
            ModeArg::Both => RenderMode::Both,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Html,
    Css,
    Json,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => {
            let mut loader = SettingsLoader::new(path);
            loader.load().context("Failed to read settings")?;
            loader.into_settings()
        }
        None => Default::default(),
    };
    if let Some(mode) = args.mode {
        settings.render_mode = mode.into();
    }

    tracing::info!("Numbering {:?}", args.file);
    let parts = import_docx(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
    let document = number_document(&parts, &settings)?;

    for diagnostic in document
        .output
        .resolved
        .diagnostics
        .iter()
        .chain(document.report.diagnostics.iter())
    {
        eprintln!("warning: {}", diagnostic);
    }

    let rendered = match args.format {
        OutputFormat::Html => {
            let title = args
                .file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document")
                .to_string();
            HtmlWriter::new(&settings)
                .with_title(title)
                .write(&document.elements, &document.output.stylesheet)
        }
        OutputFormat::Css => document.output.stylesheet.to_string(),
        OutputFormat::Json => {
            let value = serde_json::json!({
                "paragraphs": document.output.resolved.paragraphs,
                "diagnostics": document
                    .output
                    .resolved
                    .diagnostics
                    .iter()
                    .chain(document.report.diagnostics.iter())
                    .collect::<Vec<_>>(),
            });
            serde_json::to_string_pretty(&value)?
        }
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {:?}", path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
