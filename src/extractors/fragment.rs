// src/extractors/fragment.rs
//! Splits a bulk file into per-document fragments.
//!
//! Matching is a surface pattern over raw text, case-insensitive and
//! non-greedy, from an opening delimiter tag (attributes allowed) through the
//! first closing tag after it. Nothing is parsed here, so malformed documents
//! still split cleanly; text outside any match is silently skipped.
//!
//! [`FragmentScanner::fragments`] needs the whole file in memory. For very
//! large bundles use [`FragmentScanner::stream`], which reads line by line and
//! keeps at most one pending document buffered while producing the same
//! fragments.

use crate::patent::dialect::Dialect;
use crate::utils::error::ExtractError;
use regex::Regex;
use std::io::BufRead;
use std::ops::Range;

#[derive(Debug, Clone)]
pub struct FragmentScanner {
    pattern: Regex,
    open_needle: String,
    close_needle: String,
}

impl FragmentScanner {
    pub fn new(tag: &str) -> Result<Self, ExtractError> {
        let pattern = Regex::new(&format!(
            r"(?is)<{tag}(?:\s[^>]*)?>.*?</{tag}(?:\s[^>]*)?>",
            tag = regex::escape(tag)
        ))
        .map_err(|e| ExtractError::RegexError(e.to_string()))?;

        Ok(Self {
            pattern,
            open_needle: format!("<{}", tag),
            close_needle: format!("</{}", tag),
        })
    }

    pub fn for_dialect(dialect: Dialect) -> Result<Self, ExtractError> {
        Self::new(dialect.delimiter())
    }

    /// Lazily yields each complete document, verbatim, in file order.
    pub fn fragments<'s, 't>(&'s self, text: &'t str) -> impl Iterator<Item = &'t str> + 's
    where
        't: 's,
    {
        self.pattern.find_iter(text).map(|m| m.as_str())
    }

    /// Byte ranges of each fragment within `text`.
    pub fn spans<'s, 't>(&'s self, text: &'t str) -> impl Iterator<Item = Range<usize>> + 's
    where
        't: 's,
    {
        self.pattern.find_iter(text).map(|m| m.range())
    }

    /// Bounded-memory variant of [`fragments`](Self::fragments) over a reader.
    pub fn stream<R: BufRead>(&self, reader: R) -> StreamingFragments<'_, R> {
        StreamingFragments {
            scanner: self,
            reader,
            buffer: String::new(),
            close_seen: false,
            exhausted: false,
        }
    }
}

/// Iterator returned by [`FragmentScanner::stream`].
///
/// The buffer is either empty or starts at a candidate opening tag, so no text
/// that could begin a match is ever discarded; a match found in the buffer is
/// final because later input cannot create an earlier opening or closing tag.
pub struct StreamingFragments<'s, R> {
    scanner: &'s FragmentScanner,
    reader: R,
    buffer: String,
    close_seen: bool,
    exhausted: bool,
}

impl<R: BufRead> StreamingFragments<'_, R> {
    fn accept_line(&mut self, line: &str) {
        if self.buffer.is_empty() {
            match find_ignore_case(line, &self.scanner.open_needle) {
                Some(start) => self.buffer.push_str(&line[start..]),
                None => return,
            }
        } else {
            self.buffer.push_str(line);
        }
        if find_ignore_case(line, &self.scanner.close_needle).is_some() {
            self.close_seen = true;
        }
    }

    /// Drops text before the next candidate opening tag.
    fn realign(&mut self) {
        match find_ignore_case(&self.buffer, &self.scanner.open_needle) {
            Some(start) => {
                self.buffer.drain(..start);
            }
            None => self.buffer.clear(),
        }
        self.close_seen = find_ignore_case(&self.buffer, &self.scanner.close_needle).is_some();
    }

    /// A closing tag is present but its `>` has not arrived yet.
    fn close_pending(&self) -> bool {
        rfind_ignore_case(&self.buffer, &self.scanner.close_needle)
            .map(|pos| !self.buffer[pos..].contains('>'))
            .unwrap_or(false)
    }
}

impl<R: BufRead> Iterator for StreamingFragments<'_, R> {
    type Item = Result<String, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.close_seen {
                if let Some(m) = self.scanner.pattern.find(&self.buffer) {
                    let fragment = m.as_str().to_string();
                    let end = m.end();
                    self.buffer.drain(..end);
                    self.realign();
                    return Some(Ok(fragment));
                }
                self.close_seen = self.close_pending();
            }

            if self.exhausted {
                if !self.buffer.is_empty() {
                    tracing::debug!("Discarding {} bytes of unterminated document at end of input", self.buffer.len());
                    self.buffer.clear();
                }
                return None;
            }

            let mut raw = Vec::new();
            match self.reader.read_until(b'\n', &mut raw) {
                Ok(0) => self.exhausted = true,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&raw);
                    self.accept_line(&line);
                }
                Err(e) => {
                    self.exhausted = true;
                    self.buffer.clear();
                    return Some(Err(ExtractError::Read(e)));
                }
            }
        }
    }
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

fn rfind_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .rposition(|window| window.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn grant_scanner() -> FragmentScanner {
        FragmentScanner::new("PATDOC").unwrap()
    }

    fn streamed(scanner: &FragmentScanner, text: &str) -> Vec<String> {
        scanner
            .stream(Cursor::new(text.as_bytes()))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_back_to_back_documents() {
        let scanner = grant_scanner();
        let text = "<PATDOC>A</PATDOC><PATDOC>B</PATDOC>";
        let fragments: Vec<&str> = scanner.fragments(text).collect();
        assert_eq!(fragments, vec!["<PATDOC>A</PATDOC>", "<PATDOC>B</PATDOC>"]);
    }

    #[test]
    fn test_no_match_yields_nothing() {
        let scanner = grant_scanner();
        assert_eq!(scanner.fragments("no documents here").count(), 0);
        assert_eq!(scanner.fragments("").count(), 0);
        assert_eq!(scanner.fragments("<PATDOC>unterminated").count(), 0);
        assert!(streamed(&scanner, "<PATDOC>unterminated\nstill open\n").is_empty());
    }

    #[test]
    fn test_case_attributes_and_noise() {
        let scanner = grant_scanner();
        let text = "<?xml version=\"1.0\"?>\n<!DOCTYPE PATDOC>\n<patdoc DTD=\"2.4\" STATUS=\"BUILD\">\n<B110>1</B110>\n</PATDOC >\njunk\n<PATDOC>\n<B110>2</B110>\n</patdoc>\n";
        let fragments: Vec<&str> = scanner.fragments(text).collect();
        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].starts_with("<patdoc DTD=\"2.4\""));
        assert!(fragments[0].ends_with("</PATDOC >"));
        assert!(fragments[1].contains("<B110>2</B110>"));
        assert!(!fragments[0].contains("junk"));
    }

    #[test]
    fn test_longer_tag_names_do_not_match() {
        let scanner = grant_scanner();
        let text = "<PATDOCX>no</PATDOCX><PATDOC>yes</PATDOC>";
        let fragments: Vec<&str> = scanner.fragments(text).collect();
        assert_eq!(fragments, vec!["<PATDOC>yes</PATDOC>"]);
    }

    #[test]
    fn test_application_delimiter() {
        let scanner = FragmentScanner::new("patent-application-publication").unwrap();
        let text = "<patent-application-publication>\n<x/>\n</patent-application-publication>\n<PATDOC>g</PATDOC>";
        let fragments: Vec<&str> = scanner.fragments(text).collect();
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].starts_with("<patent-application-publication>"));
    }

    #[test]
    fn test_spans_cover_fragments() {
        let scanner = grant_scanner();
        let text = "xx<PATDOC>A</PATDOC>yy";
        let spans: Vec<Range<usize>> = scanner.spans(text).collect();
        assert_eq!(spans, vec![2..20]);
        assert_eq!(&text[spans[0].clone()], "<PATDOC>A</PATDOC>");
    }

    #[test]
    fn test_streaming_matches_whole_text_scan() {
        let scanner = grant_scanner();
        let samples = [
            "<PATDOC>A</PATDOC><PATDOC>B</PATDOC>",
            "header\n<PATDOC ID=\"1\">\n<B110>1</B110>\n</PATDOC>\nnoise </PATDOC>\n<PATDOC\n  STATUS=\"x\">\nB\n</PATDOC\n>\ntrailer <PATDOC>open",
            "<PATDOC>one</PATDOC> between <patdoc>two\n</PATDOC><PATDOC>three</PATDOC>\n",
            "stray <PATDOC without close\nmore\n<PATDOC>real</PATDOC>\n",
            "",
        ];
        for text in samples {
            let whole: Vec<String> = scanner.fragments(text).map(str::to_string).collect();
            assert_eq!(streamed(&scanner, text), whole, "input {:?}", text);
        }
    }

    #[test]
    fn test_streaming_reports_read_errors() {
        struct FailingReader;
        impl std::io::Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))
            }
        }
        let scanner = grant_scanner();
        let mut stream = scanner.stream(std::io::BufReader::new(FailingReader));
        assert!(matches!(stream.next(), Some(Err(ExtractError::Read(_)))));
        assert!(stream.next().is_none());
    }
}
