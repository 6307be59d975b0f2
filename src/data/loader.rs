// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Loads labelled sentence-pair datasets from tab-separated files.
//
// Expected row format, one example per line:
//
//   <text_a> \t <text_b> \t <label>
//
// where label is 0 (different meaning) or 1 (same meaning).
// A header line ("question1\tquestion2\tis_duplicate" or similar)
// is tolerated on the first line only. Blank lines are skipped.
// Anything else is a hard DataLoadError naming the file and line —
// a silently dropped row would skew both the vocabulary and any
// evaluation metrics computed later.
//
// File handles are scoped to each load call: opened, fully read,
// and released before returning, on success and failure alike.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O)

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;

use crate::domain::sentence_pair::{LabeledPair, SentencePair};
use crate::domain::traits::PairSource;

/// Dataset file unreadable or malformed.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot open dataset file '{path}': {source}")]
    Io {
        path:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed row in '{path}' line {line}: {reason}")]
    MalformedRow {
        path:   String,
        line:   usize,
        reason: String,
    },
}

/// Loads the tab-separated datasets named in the configuration.
/// Implements the PairSource trait from the domain layer.
pub struct TsvLoader {
    data_paths: BTreeMap<String, PathBuf>,
}

impl TsvLoader {
    pub fn new(data_paths: BTreeMap<String, PathBuf>) -> Self {
        Self { data_paths }
    }

    /// Load a single dataset file.
    pub fn load_file(path: &Path) -> Result<Vec<LabeledPair>, DataLoadError> {
        let file = File::open(path).map_err(|source| DataLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        parse_rows(BufReader::new(file), &path.display().to_string())
    }

    /// Load a file of UNLABELLED pairs (two columns, any third column
    /// ignored). Used by the predict command's --pairs-file option.
    pub fn load_pairs_file(path: &Path) -> Result<Vec<SentencePair>, DataLoadError> {
        let file = File::open(path).map_err(|source| DataLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let display = path.display().to_string();

        let mut pairs = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| DataLoadError::Io {
                path: display.clone(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 2 {
                return Err(DataLoadError::MalformedRow {
                    path:   display.clone(),
                    line:   i + 1,
                    reason: format!(
                        "expected at least 2 tab-separated fields, got {}",
                        fields.len()
                    ),
                });
            }
            pairs.push(SentencePair::new(fields[0], fields[1]));
        }
        Ok(pairs)
    }
}

impl PairSource for TsvLoader {
    fn load_all(&self) -> Result<BTreeMap<String, Vec<LabeledPair>>> {
        let mut datasets = BTreeMap::new();

        for (name, path) in &self.data_paths {
            let rows = Self::load_file(path)?;
            tracing::info!(
                "Loaded dataset '{}': {} rows from '{}'",
                name,
                rows.len(),
                path.display()
            );
            datasets.insert(name.clone(), rows);
        }

        Ok(datasets)
    }
}

/// Parse labelled rows from any buffered reader.
/// Split out from the file handling so tests can feed in-memory data.
fn parse_rows<R: BufRead>(reader: R, path: &str) -> Result<Vec<LabeledPair>, DataLoadError> {
    let mut rows = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| DataLoadError::Io {
            path: path.to_string(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 3 {
            return Err(DataLoadError::MalformedRow {
                path:   path.to_string(),
                line:   i + 1,
                reason: format!("expected 3 tab-separated fields, got {}", fields.len()),
            });
        }

        let label = match fields[2].trim().parse::<u8>() {
            Ok(l @ (0 | 1)) => l,
            _ => {
                // A non-numeric label on the FIRST line is a header row
                if i == 0 {
                    tracing::debug!("Skipping header line in '{}'", path);
                    continue;
                }
                return Err(DataLoadError::MalformedRow {
                    path:   path.to_string(),
                    line:   i + 1,
                    reason: format!("label must be 0 or 1, got '{}'", fields[2]),
                });
            }
        };

        rows.push(LabeledPair::new(
            SentencePair::new(fields[0], fields[1]),
            label,
        ));
    }

    Ok(rows)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parses_labelled_rows() {
        let data = "how are you\thow do you do\t1\nred apple\tblue sky\t0\n";
        let rows = parse_rows(Cursor::new(data), "test.tsv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, 1);
        assert_eq!(rows[1].pair.second, "blue sky");
    }

    #[test]
    fn test_header_line_is_skipped() {
        let data = "question1\tquestion2\tis_duplicate\na\tb\t1\n";
        let rows = parse_rows(Cursor::new(data), "test.tsv").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let data = "a\tb\t0\n\n\nc\td\t1\n";
        let rows = parse_rows(Cursor::new(data), "test.tsv").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_wrong_column_count_is_an_error() {
        let data = "a\tb\t1\nonly one field\n";
        let err = parse_rows(Cursor::new(data), "test.tsv").unwrap_err();
        match err {
            DataLoadError::MalformedRow { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_label_is_an_error() {
        let data = "a\tb\t1\nc\td\tmaybe\n";
        assert!(matches!(
            parse_rows(Cursor::new(data), "test.tsv"),
            Err(DataLoadError::MalformedRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = TsvLoader::load_file(Path::new("/no/such/file.tsv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
    }
}
