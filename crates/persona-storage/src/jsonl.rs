//! Append-only line-delimited JSON primitives.
//!
//! Writes are append-on-success: one record per call, flushed before
//! returning, so partial progress survives a crash mid-stage. Reads skip
//! malformed lines with a warning and keep going.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use persona_core::error::{PersonaError, Result};

/// Append one record as a JSON line, creating the file if needed.
pub fn append_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let line = serde_json::to_string(record)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    file.flush()?;
    Ok(())
}

/// Read all records from a JSONL file.
///
/// Lines that fail to parse are skipped with a warning; the file itself
/// being unreadable is an error.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| PersonaError::Storage(format!("read {}: {}", path.display(), e)))?;

    let mut records = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    line = line_no + 1,
                    error = %e,
                    "Skipping malformed record"
                );
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Row {
        name: String,
        n: u32,
    }

    #[test]
    fn test_append_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");

        append_record(
            &path,
            &Row {
                name: "a".to_string(),
                n: 1,
            },
        )
        .unwrap();
        append_record(
            &path,
            &Row {
                name: "b".to_string(),
                n: 2,
            },
        )
        .unwrap();

        let rows: Vec<Row> = read_records(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "b");
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");
        std::fs::write(
            &path,
            "{\"name\": \"ok\", \"n\": 1}\nnot json at all\n{\"name\": \"also ok\", \"n\": 2}\n",
        )
        .unwrap();

        let rows: Vec<Row> = read_records(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "ok");
        assert_eq!(rows[1].name, "also ok");
    }

    #[test]
    fn test_blank_lines_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");
        std::fs::write(&path, "\n{\"name\": \"ok\", \"n\": 1}\n\n").unwrap();

        let rows: Vec<Row> = read_records(&path).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_missing_file_is_error() {
        let result: Result<Vec<Row>> = read_records(Path::new("/nonexistent/rows.jsonl"));
        assert!(result.is_err());
    }
}
