// src/storage/mod.rs
use crate::patent::PatentDocument;
use crate::pipeline::FileSummary;
use crate::utils::coverage::GapSpan;
use crate::utils::error::StorageError;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Opens `<stem>.jsonl` for writing, one document per line.
    pub fn create_document_sink(&self, stem: &str) -> Result<DocumentSink, StorageError> {
        let path = self.base_dir.join(format!("{}.jsonl", stem));
        let file = fs::File::create(&path).map_err(StorageError::IoError)?;
        Ok(DocumentSink {
            path,
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    /// Saves per-file run metadata in JSON format
    pub fn save_file_metadata(&self, stem: &str, summary: &FileSummary) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_meta.json", stem));

        let metadata = serde_json::json!({
            "source": summary.source.display().to_string(),
            "dialect": summary.dialect,
            "fragments": summary.fragments,
            "documents": summary.documents,
            "skipped_non_utility": summary.skipped_non_utility,
            "claim_count_mismatches": summary.claim_count_mismatches,
            "streaming": summary.streaming,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }

    /// Saves the spans of a bundle that no fragment covered
    pub fn save_gap_report(&self, stem: &str, gaps: &[GapSpan]) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_gaps.json", stem));

        let report = serde_json::to_string_pretty(gaps)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, report).map_err(StorageError::IoError)?;

        tracing::info!("Saved {} uncovered spans to {}", gaps.len(), file_path.display());

        Ok(file_path)
    }
}

/// JSON-lines writer for one input file's documents.
pub struct DocumentSink {
    path: PathBuf,
    writer: BufWriter<fs::File>,
    written: usize,
}

impl DocumentSink {
    pub fn write(&mut self, document: &PatentDocument) -> Result<(), StorageError> {
        serde_json::to_writer(&mut self.writer, document)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.writer.write_all(b"\n").map_err(StorageError::IoError)?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes buffered output and returns the file path.
    pub fn finish(mut self) -> Result<PathBuf, StorageError> {
        if let Err(e) = self.writer.flush() {
            self.discard();
            return Err(StorageError::IoError(e));
        }
        tracing::info!("Saved {} documents to {}", self.written, self.path.display());
        Ok(self.path)
    }

    /// Deletes the output of a run that failed partway, so no truncated file is left behind.
    pub fn discard(self) {
        let DocumentSink { path, writer, written } = self;
        drop(writer);
        match fs::remove_file(&path) {
            Ok(()) => tracing::warn!("Removed partial output {} after {} documents", path.display(), written),
            Err(e) => tracing::error!("Failed to remove partial output {}: {}", path.display(), e),
        }
    }
}
