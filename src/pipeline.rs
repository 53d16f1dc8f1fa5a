// src/pipeline.rs
//! Per-file driver: scan a bundle, extract every fragment, write the results.
//!
//! Fragments are independent, so the only concurrency is across input files,
//! each handled start to finish on tokio's blocking pool. Within a file,
//! documents are written in bundle order.

use crate::extractors::{DocumentExtractor, FragmentScanner};
use crate::patent::bundle::{open_bundle, read_bundle};
use crate::patent::{Dialect, PatentType};
use crate::storage::{DocumentSink, StorageManager};
use crate::utils::coverage::find_gaps;
use crate::utils::error::{AppError, StorageError};
use serde::Serialize;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub dialect: Dialect,
    pub output_dir: PathBuf,
    /// Scan line by line instead of loading each bundle whole.
    pub streaming: bool,
    /// Drop documents whose kind code is not a utility kind.
    pub utility_only: bool,
    /// Maximum number of files processed at once.
    pub jobs: usize,
    /// Write a report of text not covered by any fragment.
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub source: PathBuf,
    pub dialect: String,
    pub fragments: usize,
    pub documents: usize,
    pub skipped_non_utility: usize,
    pub claim_count_mismatches: usize,
    pub streaming: bool,
    pub output: Option<PathBuf>,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<FileSummary, AppError>,
}

struct FileRun<'a> {
    config: &'a ExtractConfig,
    extractor: DocumentExtractor,
    sink: DocumentSink,
    summary: FileSummary,
}

impl FileRun<'_> {
    fn accept(&mut self, fragment: &str) -> Result<(), StorageError> {
        self.summary.fragments += 1;
        let document = self.extractor.extract(fragment);

        if self.config.utility_only && document.patent_type != PatentType::Utility {
            tracing::debug!("Skipping non-utility document {} ({})", document.doc_number, document.kind_code);
            self.summary.skipped_non_utility += 1;
            return Ok(());
        }
        if document.declared_claim_count != 0
            && document.declared_claim_count as usize != document.observed_claim_count
        {
            self.summary.claim_count_mismatches += 1;
        }

        self.sink.write(&document)?;
        self.summary.documents += 1;
        Ok(())
    }

    fn scan(&mut self, input: Input, scanner: &FragmentScanner, storage: &StorageManager, stem: &str) -> Result<(), AppError> {
        match input {
            Input::Stream(reader) => {
                if self.config.debug {
                    tracing::warn!("Gap report needs the whole bundle in memory; skipped in streaming mode");
                }
                for fragment in scanner.stream(reader) {
                    self.accept(&fragment?)?;
                }
            }
            Input::Whole(text) => {
                if self.config.debug {
                    let gaps = find_gaps(&text, scanner);
                    storage.save_gap_report(stem, &gaps)?;
                }
                for fragment in scanner.fragments(&text) {
                    self.accept(fragment)?;
                }
            }
        }
        Ok(())
    }
}

enum Input {
    Whole(String),
    Stream(Box<dyn BufRead + Send>),
}

fn output_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "bundle".to_string())
}

/// Processes one bundle synchronously.
pub fn process_file(path: &Path, config: &ExtractConfig, storage: &StorageManager) -> Result<FileSummary, AppError> {
    // Input first: an unreadable bundle must not leave an empty .jsonl behind.
    let input = if config.streaming {
        Input::Stream(Box::new(open_bundle(path)?))
    } else {
        Input::Whole(read_bundle(path)?)
    };
    process_input(path, input, config, storage)
}

fn process_input(
    path: &Path,
    input: Input,
    config: &ExtractConfig,
    storage: &StorageManager,
) -> Result<FileSummary, AppError> {
    let scanner = FragmentScanner::for_dialect(config.dialect)?;
    let stem = output_stem(path);

    let mut run = FileRun {
        config,
        extractor: DocumentExtractor::new(config.dialect),
        sink: storage.create_document_sink(&stem)?,
        summary: FileSummary {
            source: path.to_path_buf(),
            dialect: config.dialect.to_string(),
            fragments: 0,
            documents: 0,
            skipped_non_utility: 0,
            claim_count_mismatches: 0,
            streaming: config.streaming,
            output: None,
        },
    };

    // A failure midway leaves no .jsonl and no _meta.json for this file.
    if let Err(e) = run.scan(input, &scanner, storage, &stem) {
        run.sink.discard();
        return Err(e);
    }

    let FileRun { sink, mut summary, .. } = run;
    summary.output = Some(sink.finish()?);
    if summary.fragments == 0 {
        tracing::warn!("No {} documents found in {}", summary.dialect, path.display());
    }
    storage.save_file_metadata(&stem, &summary)?;

    tracing::info!(
        "Processed {}: {} fragments, {} documents written, {} skipped",
        path.display(),
        summary.fragments,
        summary.documents,
        summary.skipped_non_utility
    );
    Ok(summary)
}

/// Processes every bundle, at most `config.jobs` at a time.
///
/// Outcomes come back in input order. A failing file does not stop the others.
pub async fn process_files(paths: Vec<PathBuf>, config: ExtractConfig) -> Result<Vec<FileOutcome>, AppError> {
    if config.jobs == 0 {
        return Err(AppError::Config("jobs must be at least 1".to_string()));
    }

    let storage = Arc::new(StorageManager::new(&config.output_dir)?);
    let permits = Arc::new(Semaphore::new(config.jobs));
    let config = Arc::new(config);

    let mut handles = Vec::with_capacity(paths.len());
    for path in paths {
        let permit = Arc::clone(&permits)
            .acquire_owned()
            .await
            .map_err(|e| AppError::Processing(e.to_string()))?;
        let storage = Arc::clone(&storage);
        let config = Arc::clone(&config);
        let task_path = path.clone();

        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            process_file(&task_path, &config, &storage)
        });
        handles.push((path, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(AppError::Processing(format!("worker for {} failed: {}", path.display(), e))),
        };
        if let Err(e) = &result {
            tracing::error!("Failed to process {}: {}", path.display(), e);
        }
        outcomes.push(FileOutcome { path, result });
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patent::{DocFamily, PatentDocument, SchemaVersion};

    const BUNDLE: &str = "<?xml version=\"1.0\"?>\n\
        <PATDOC DTD=\"2.5\"><B110><DNUM><PDAT>06000001</PDAT></DNUM></B110><B130><PDAT>B1</PDAT></B130>\n\
        <B570><B577><PDAT>2</PDAT></B577></B570><SDOCL><CLM ID=\"CLM-00001\">1. One.</CLM></SDOCL></PATDOC>\n\
        stray text\n\
        <PATDOC DTD=\"2.5\"><B110><DNUM><PDAT>D0450001</PDAT></DNUM></B110><B130><PDAT>S1</PDAT></B130></PATDOC>\n";

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("patent_extractor_pipeline_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config(output_dir: PathBuf, streaming: bool) -> ExtractConfig {
        ExtractConfig {
            dialect: Dialect::new(DocFamily::Grant, SchemaVersion::XmlV2).unwrap(),
            output_dir,
            streaming,
            utility_only: false,
            jobs: 2,
            debug: false,
        }
    }

    fn read_documents(path: &Path) -> Vec<PatentDocument> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_process_file_whole_and_streaming_agree() {
        let dir = scratch("agree");
        let input = dir.join("ipg_sample.xml");
        std::fs::write(&input, BUNDLE).unwrap();

        let whole_storage = StorageManager::new(dir.join("whole")).unwrap();
        let whole = process_file(&input, &config(dir.join("whole"), false), &whole_storage).unwrap();
        let stream_storage = StorageManager::new(dir.join("stream")).unwrap();
        let streamed = process_file(&input, &config(dir.join("stream"), true), &stream_storage).unwrap();

        assert_eq!(whole.fragments, 2);
        assert_eq!(whole.documents, 2);
        assert_eq!(whole.claim_count_mismatches, 1);
        assert_eq!(streamed.fragments, 2);
        assert_eq!(
            read_documents(whole.output.as_ref().unwrap()),
            read_documents(streamed.output.as_ref().unwrap())
        );
        assert!(dir.join("whole").join("ipg_sample_meta.json").exists());
    }

    #[test]
    fn test_utility_only_and_gap_report() {
        let dir = scratch("utility");
        let input = dir.join("bundle.sgm");
        std::fs::write(&input, BUNDLE).unwrap();

        let mut cfg = config(dir.join("out"), false);
        cfg.utility_only = true;
        cfg.debug = true;
        let storage = StorageManager::new(&cfg.output_dir).unwrap();
        let summary = process_file(&input, &cfg, &storage).unwrap();

        assert_eq!(summary.fragments, 2);
        assert_eq!(summary.documents, 1);
        assert_eq!(summary.skipped_non_utility, 1);
        let docs = read_documents(summary.output.as_ref().unwrap());
        assert_eq!(docs[0].doc_number, "06000001");

        let gaps: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join("out").join("bundle_gaps.json")).unwrap()).unwrap();
        assert_eq!(gaps.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_process_files_keeps_input_order_and_isolates_failures() {
        let dir = scratch("many");
        let first = dir.join("first.xml");
        let missing = dir.join("missing.xml");
        let empty = dir.join("empty.xml");
        std::fs::write(&first, BUNDLE).unwrap();
        std::fs::write(&empty, "no documents").unwrap();

        let outcomes = process_files(
            vec![first.clone(), missing.clone(), empty.clone()],
            config(dir.join("out"), false),
        )
        .await
        .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].path, first);
        assert_eq!(outcomes[0].result.as_ref().unwrap().documents, 2);
        assert!(matches!(outcomes[1].result, Err(AppError::Extraction(_))));
        assert!(!dir.join("out").join("missing.jsonl").exists());
        assert_eq!(outcomes[2].result.as_ref().unwrap().fragments, 0);
    }

    #[test]
    fn test_read_failure_midway_leaves_no_output() {
        struct FailingReader;
        impl std::io::Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "device error"))
            }
        }

        let dir = scratch("midway");
        let cfg = config(dir.join("out"), true);
        let storage = StorageManager::new(&cfg.output_dir).unwrap();
        let first_document = std::io::Cursor::new(
            b"<PATDOC><B110><PDAT>06000001</PDAT></B110><B130>B1</B130></PATDOC>\n".to_vec(),
        );
        let reader = std::io::BufReader::new(std::io::Read::chain(first_document, FailingReader));

        let result = process_input(&dir.join("broken.xml"), Input::Stream(Box::new(reader)), &cfg, &storage);

        assert!(matches!(result, Err(AppError::Extraction(_))));
        assert!(!dir.join("out").join("broken.jsonl").exists());
        assert!(!dir.join("out").join("broken_meta.json").exists());
    }

    #[test]
    fn test_zero_jobs_is_a_config_error() {
        let mut cfg = config(scratch("zero"), false);
        cfg.jobs = 0;
        let result = tokio_test::block_on(process_files(Vec::new(), cfg));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
