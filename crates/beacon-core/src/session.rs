use crate::history::HistoryStore;
use crate::model::EvaluationRecord;

/// Run-scoped score aggregator. Records collect here during a run and are
/// written to the history exactly once when the session is flushed; the
/// consuming flush keeps the write-once contract.
#[derive(Debug, Default)]
pub struct Session {
    records: Vec<EvaluationRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: EvaluationRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[EvaluationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends every collected record in collection order and returns the
    /// persisted records with their assigned timestamps.
    pub fn flush(self, store: &HistoryStore) -> anyhow::Result<Vec<EvaluationRecord>> {
        let mut written = Vec::with_capacity(self.records.len());
        for mut record in self.records {
            store.append(&mut record)?;
            written.push(record);
        }
        Ok(written)
    }
}
