use crate::model::EvaluationRecord;
use anyhow::Context;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Append-only JSONL log of evaluation records, one self-contained JSON
/// object per line. Single-writer; records are never mutated or reordered.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Assigns the persistence timestamp and appends the record as one line.
    pub fn append(&self, record: &mut EvaluationRecord) -> anyhow::Result<()> {
        record.timestamp = chrono::Utc::now().to_rfc3339();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open history log {}", self.path.display()))?;
        let line = serde_json::to_string(record).context("failed to serialize record")?;
        writeln!(file, "{}", line)
            .with_context(|| format!("failed to append to history log {}", self.path.display()))?;
        file.flush()
            .with_context(|| format!("failed to flush history log {}", self.path.display()))?;
        Ok(())
    }

    /// Reads every record back in append order. The log is first-party
    /// data: a line that fails to parse is an unrecoverable read error,
    /// unlike the collector's tolerance for malformed wire lines.
    pub fn read_all(&self) -> anyhow::Result<Vec<EvaluationRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open history log {}", self.path.display()))?;
        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line
                .with_context(|| format!("failed to read history log {}", self.path.display()))?;
            let record: EvaluationRecord = serde_json::from_str(&line).with_context(|| {
                format!(
                    "corrupt history entry at {}:{}",
                    self.path.display(),
                    idx + 1
                )
            })?;
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(question: &str, relevancy: f64) -> EvaluationRecord {
        EvaluationRecord {
            question: question.into(),
            relevancy,
            bias: 0.1,
            faithfulness: Some(0.8),
            hallucination: Some(0.2),
            rag_time_sec: 1.5,
            duration_sec: 3.0,
            timestamp: String::new(),
            extras: BTreeMap::new(),
        }
    }

    #[test]
    fn append_order_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("history.jsonl"));

        let mut r1 = record("q1", 0.7);
        let mut r2 = record("q2", 0.8);
        let mut r3 = record("q1", 0.9);
        store.append(&mut r1).unwrap();
        store.append(&mut r2).unwrap();
        store.append(&mut r3).unwrap();

        let all = store.read_all().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], r1);
        assert_eq!(all[1], r2);
        assert_eq!(all[2], r3);
        assert!(!all[0].timestamp.is_empty());
        assert!(all[0].timestamp <= all[1].timestamp);
        assert!(all[1].timestamp <= all[2].timestamp);
    }

    #[test]
    fn read_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("history.jsonl"));
        store.append(&mut record("q", 0.5)).unwrap();

        let first = store.read_all().unwrap();
        let second = store.read_all().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_log_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("absent.jsonl"));
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn corrupt_entry_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        let store = HistoryStore::open(&path);
        store.append(&mut record("q", 0.5)).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .and_then(|mut f| std::io::Write::write_all(&mut f, b"{not json\n"))
            .unwrap();

        let err = store.read_all().unwrap_err();
        assert!(err.to_string().contains("corrupt history entry"));
        assert!(err.to_string().contains(":2"));

        // appends remain possible after a read failure
        store.append(&mut record("q", 0.6)).unwrap();
    }
}
