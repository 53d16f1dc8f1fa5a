// src/patent/bundle.rs
use crate::utils::error::ExtractError;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads a whole bulk file into memory.
///
/// Memory grows with the file; weekly grant bundles run to hundreds of
/// megabytes, so prefer [`open_bundle`] with the streaming scanner for those.
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_bundle(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    tracing::info!("Read bundle {} ({} bytes)", path.display(), bytes.len());
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Bundle {} is not valid UTF-8, replacing invalid bytes", path.display());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}

/// Opens a bulk file for line-by-line scanning.
pub fn open_bundle(path: &Path) -> Result<BufReader<File>, ExtractError> {
    let file = File::open(path)?;
    tracing::info!("Streaming bundle {}", path.display());
    Ok(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufRead;

    fn temp_file(name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("patent_extractor_bundle_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_read_bundle_replaces_invalid_utf8() {
        let path = temp_file("lossy.txt", b"<PATDOC>caf\xe9</PATDOC>");
        let text = read_bundle(&path).unwrap();
        assert!(text.starts_with("<PATDOC>caf"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let missing = std::env::temp_dir().join("patent_extractor_definitely_missing.txt");
        assert!(matches!(read_bundle(&missing), Err(ExtractError::Read(_))));
        assert!(matches!(open_bundle(&missing), Err(ExtractError::Read(_))));
    }

    #[test]
    fn test_open_bundle_reads_lines() {
        let path = temp_file("lines.txt", b"one\ntwo\n");
        let lines: Vec<String> = open_bundle(&path).unwrap().lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["one", "two"]);
    }
}
