// src/lib.rs
//! Extracts structured records from USPTO bulk patent files.
//!
//! A bulk file is many grant or application documents concatenated into one
//! text. [`extractors::FragmentScanner`] splits it at the dialect's root tag,
//! and [`extractors::DocumentExtractor`] turns each fragment into a
//! [`patent::PatentDocument`].

pub mod extractors;
pub mod markup;
pub mod patent;
pub mod pipeline;
pub mod storage;
pub mod utils;

pub use extractors::{DocumentExtractor, FragmentScanner};
pub use patent::{Dialect, DocFamily, PatentDocument, PatentType, SchemaVersion};
pub use pipeline::{process_file, process_files, ExtractConfig, FileOutcome, FileSummary};
pub use utils::AppError;
