// src/main.rs
use clap::Parser;
use patent_extractor::pipeline::{process_files, ExtractConfig};
use patent_extractor::utils::{self, AppError};
use patent_extractor::{Dialect, DocFamily, SchemaVersion};
use std::path::PathBuf;

/// Command Line Interface for the USPTO bulk patent extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bulk files to process
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Document family contained in the files
    #[arg(short, long, value_enum, default_value = "grant")]
    family: DocFamily,

    /// Schema version of the files
    #[arg(short, long, value_enum, default_value = "xml-v2")]
    schema: SchemaVersion,

    /// Output directory for extracted documents
    #[arg(short, long, default_value = "./output")]
    output_dir: PathBuf,

    /// Read files line by line instead of loading them whole
    #[arg(long)]
    streaming: bool,

    /// Only write documents with a utility kind code
    #[arg(long)]
    utility_only: bool,

    /// Number of files processed at once
    #[arg(short, long, default_value = "4")]
    jobs: usize,

    /// Debug mode - save a report of text no document covered
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    let dialect = Dialect::new(args.family, args.schema).map_err(|e| AppError::Config(e.to_string()))?;

    let config = ExtractConfig {
        dialect,
        output_dir: args.output_dir,
        streaming: args.streaming,
        utility_only: args.utility_only,
        jobs: args.jobs,
        debug: args.debug,
    };

    // 3. Process every file
    let outcomes = process_files(args.files, config).await?;

    let mut success_count = 0;
    let mut failure_count = 0;
    let mut document_count = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(summary) => {
                success_count += 1;
                document_count += summary.documents;
            }
            Err(_) => failure_count += 1,
        }
    }

    tracing::info!(
        "Processing finished. Success: {}, Failures: {}, Documents: {}",
        success_count,
        failure_count,
        document_count
    );

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!("Failed to process any of {} files", failure_count)));
    }

    Ok(())
}
