//! Search text for occurrences of resolved secret values

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entry::EnvEntry;
use crate::error::{Error, Result};

/// One occurrence of a secret value in scanned text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub path: String,
    pub line: String,
    /// 1-based
    pub line_number: usize,
    /// Byte offset of the match within `line`
    pub match_index: usize,
    pub entry: EnvEntry,
}

/// Every occurrence of every sensitive entry value in `text`
///
/// Entries with severity `none` or an empty value are not searched for.
pub fn scan<'a>(
    path: &str,
    text: &str,
    entries: impl IntoIterator<Item = &'a EnvEntry>,
) -> Vec<Match> {
    let entries: Vec<&EnvEntry> = entries.into_iter().filter(|e| e.is_sensitive()).collect();
    let mut matches = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        for entry in &entries {
            for (match_index, _) in line.match_indices(entry.value.as_str()) {
                matches.push(Match {
                    path: path.to_string(),
                    line: line.to_string(),
                    line_number: idx + 1,
                    match_index,
                    entry: (*entry).clone(),
                });
            }
        }
    }

    matches
}

/// Read `path` and [`scan`] its contents
///
/// Bytes that are not valid UTF-8 are replaced before scanning, so binary
/// files are searched for their text runs instead of failing.
pub fn scan_file<'a>(
    path: &Path,
    entries: impl IntoIterator<Item = &'a EnvEntry>,
) -> Result<Vec<Match>> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    let found = scan(&path.to_string_lossy(), &text, entries);
    tracing::debug!(path = %path.display(), matches = found.len(), "scanned file");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypath::Severity;

    fn entry(key: &str, value: &str, severity: Severity) -> EnvEntry {
        EnvEntry {
            key: key.into(),
            value: value.into(),
            provider_name: "mem".into(),
            provider: "memory".into(),
            resolved_path: "p".into(),
            severity,
            redact_with: "**REDACTED**".into(),
            source: String::new(),
            sink: String::new(),
        }
    }

    #[test]
    fn test_scan_reports_line_and_index() {
        let entries = [entry("TOKEN", "s3cr3t", Severity::High)];
        let text = "first line\nauth = s3cr3t; s3cr3t\n";

        let found = scan("config.ini", text, &entries);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].line_number, 2);
        assert_eq!(found[0].match_index, 7);
        assert_eq!(found[1].match_index, 15);
        assert_eq!(found[0].path, "config.ini");
        assert_eq!(found[0].entry.key, "TOKEN");
    }

    #[test]
    fn test_scan_skips_non_sensitive_entries() {
        let entries = [
            entry("PUBLIC", "hello", Severity::None),
            entry("EMPTY", "", Severity::High),
        ];
        assert!(scan("f", "hello world", &entries).is_empty());
    }

    #[test]
    fn test_scan_file_missing_is_io_error() {
        let entries: [EnvEntry; 0] = [];
        let err = scan_file(Path::new("/definitely/not/here.txt"), &entries).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_scan_file_reads_contents() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("leak.env");
        std::fs::write(&file, "A=1\nB=topsecret\n").unwrap();

        let entries = [entry("B", "topsecret", Severity::Medium)];
        let found = scan_file(&file, &entries).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, "B=topsecret");
        assert_eq!(found[0].match_index, 2);
    }

    #[test]
    fn test_scan_file_tolerates_binary_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("logo.png");
        let mut bytes = vec![0x89, 0x50, 0xff, 0xfe, 0x00, b'\n'];
        bytes.extend_from_slice(b"key=topsecret\xff\n");
        std::fs::write(&file, &bytes).unwrap();

        let entries = [entry("B", "topsecret", Severity::High)];
        let found = scan_file(&file, &entries).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line_number, 2);
        assert_eq!(found[0].match_index, 4);

        let none: [EnvEntry; 0] = [];
        assert!(scan_file(&file, &none).unwrap().is_empty());
    }
}
