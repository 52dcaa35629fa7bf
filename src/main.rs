//! `tabular-preview` command-line host.
//!
//! Runs one render cycle for a file on disk and prints the panels (or the render model as JSON).
//! Set `RUST_LOG=tabular_preview=debug` for pipeline logs on stderr.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tabular_preview::ingestion::TracingObserver;
use tabular_preview::render::render_text;
use tabular_preview::{process_upload, FileFormat, Outcome, PreviewOptions, RenderModel, UploadedFile};

#[derive(Parser, Debug)]
#[command(
    name = "tabular-preview",
    version,
    about = "Preview CSV, Excel, JSON, Parquet, TSV, TXT, XML and SQLite files as tables"
)]
struct Cli {
    /// File to preview. Without one, the supported formats are listed.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// SQLite table to show (defaults to the first table)
    #[arg(long, value_name = "NAME")]
    table: Option<String>,

    /// Force a format by extension instead of using the file's suffix (e.g. csv, db)
    #[arg(long, value_name = "EXT", value_parser = parse_format)]
    format: Option<FileFormat>,

    /// Rows shown in the data preview; statistics and export cover all rows
    #[arg(long, value_name = "N", env = "TABULAR_PREVIEW_MAX_ROWS")]
    max_rows: Option<usize>,

    /// Write the processed CSV into this directory
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Print the render model as JSON instead of text panels
    #[arg(long)]
    json: bool,
}

fn parse_format(s: &str) -> Result<FileFormat, String> {
    FileFormat::from_extension(s.trim_start_matches('.')).ok_or_else(|| {
        format!(
            "unknown format '{s}' (expected one of: {})",
            FileFormat::ALLOWED_EXTENSIONS.join(", ")
        )
    })
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let model = match &cli.file {
        None => RenderModel::idle(),
        Some(path) => {
            let upload = UploadedFile::from_path(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let options = PreviewOptions {
                format: cli.format,
                selected_table: cli.table.clone(),
                preview_rows: cli.max_rows,
                observer: Some(std::sync::Arc::new(TracingObserver)),
                ..PreviewOptions::default()
            };
            process_upload(&upload, &options)
        }
    };

    if let (Some(dir), Some(table)) = (&cli.export_dir, model.table()) {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        let target = dir.join(&table.export.file_name);
        fs::write(&target, &table.export.bytes)
            .with_context(|| format!("failed to write {}", target.display()))?;
        tracing::info!(path = %target.display(), "export written");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&model)?);
    } else {
        print!("{}", render_text(&model));
    }

    Ok(match model.outcome {
        Outcome::Failed(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
