use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::HistoryError;

/// Newline-delimited log of successful queries.
#[derive(Debug)]
pub struct History {
    path: PathBuf,
    entries: Vec<String>,
}

/// A query as stored: one line, no commas (commas separate sub-queries).
fn sanitize(query: &str) -> String {
    query
        .replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl History {
    /// Read the history at `path`. A missing file is an empty history.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();
        let entries = if path.exists() {
            fs::read_to_string(&path)?
                .lines()
                .map(sanitize)
                .filter(|line| !line.is_empty())
                .collect()
        } else {
            Vec::new()
        };
        tracing::debug!("Loaded {} history entries", entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Distinct entries, most recent first.
    pub fn recent_first(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for entry in self.entries.iter().rev() {
            if !seen.contains(entry) {
                seen.push(entry.clone());
            }
        }
        seen
    }

    /// Record `query` in memory and, when `persist`, in the file. Returns
    /// false when the query repeats the last entry or is empty.
    pub fn append(&mut self, query: &str, persist: bool) -> Result<bool, HistoryError> {
        let query = sanitize(query);
        if query.is_empty() || self.entries.last() == Some(&query) {
            return Ok(false);
        }

        if persist {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            writeln!(file, "{query}")?;
        }
        self.entries.push(query);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("history");

        let mut history = History::load(&path).unwrap();
        assert!(history.is_empty());
        assert!(history.append("mint", true).unwrap());
        assert!(history.append("coin -w", true).unwrap());
        assert!(!history.append("coin -w", true).unwrap());
        assert!(!history.append("   ", true).unwrap());

        let reloaded = History::load(&path).unwrap();
        assert_eq!(reloaded.entries(), ["mint", "coin -w"]);
    }

    #[test]
    fn commas_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::load(dir.path().join("history")).unwrap();
        history.append("mint, coin", false).unwrap();
        assert_eq!(history.entries(), ["mint coin"]);
        assert!(!dir.path().join("history").exists());
    }

    #[test]
    fn recent_first_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::load(dir.path().join("history")).unwrap();
        for query in ["a", "b", "a", "c"] {
            history.append(query, false).unwrap();
        }
        assert_eq!(history.recent_first(), vec!["c", "a", "b"]);
        assert_eq!(history.len(), 4);
    }
}
