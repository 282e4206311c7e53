use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{DecisionId, DecisionRecord};

/// Store of finalized decisions, mutated only by explicit user actions.
pub trait DecisionHistory: Send + Sync {
    fn insert(&self, record: DecisionRecord) -> Result<DecisionRecord, HistoryError>;
    fn delete(&self, id: &DecisionId) -> Result<DecisionRecord, HistoryError>;
    /// Remove every record, returning how many were dropped.
    fn clear(&self) -> Result<usize, HistoryError>;
    /// Records newest first.
    fn list(&self) -> Result<Vec<DecisionRecord>, HistoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("decision already exists")]
    Conflict,
    #[error("decision not found")]
    NotFound,
    #[error("history unavailable: {0}")]
    Unavailable(String),
}

/// Process-local history, lost on restart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDecisionHistory {
    records: Arc<Mutex<Vec<DecisionRecord>>>,
}

impl InMemoryDecisionHistory {
    fn guard(&self) -> Result<MutexGuard<'_, Vec<DecisionRecord>>, HistoryError> {
        self.records
            .lock()
            .map_err(|_| HistoryError::Unavailable("history lock poisoned".to_string()))
    }
}

impl DecisionHistory for InMemoryDecisionHistory {
    fn insert(&self, record: DecisionRecord) -> Result<DecisionRecord, HistoryError> {
        let mut records = self.guard()?;
        if records.iter().any(|existing| existing.id == record.id) {
            return Err(HistoryError::Conflict);
        }
        records.insert(0, record.clone());
        Ok(record)
    }

    fn delete(&self, id: &DecisionId) -> Result<DecisionRecord, HistoryError> {
        let mut records = self.guard()?;
        let position = records
            .iter()
            .position(|record| &record.id == id)
            .ok_or(HistoryError::NotFound)?;
        Ok(records.remove(position))
    }

    fn clear(&self) -> Result<usize, HistoryError> {
        let mut records = self.guard()?;
        let removed = records.len();
        records.clear();
        Ok(removed)
    }

    fn list(&self) -> Result<Vec<DecisionRecord>, HistoryError> {
        Ok(self.guard()?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::decisions::domain::{DecisionDetails, YesNoChoice};
    use chrono::Utc;

    fn record(id: &str) -> DecisionRecord {
        DecisionRecord {
            id: DecisionId(id.to_string()),
            context: "Should I renew the lease?".to_string(),
            date: Utc::now(),
            details: DecisionDetails::YesNo {
                decision: YesNoChoice::Yes,
            },
        }
    }

    #[test]
    fn newest_record_is_listed_first() {
        let history = InMemoryDecisionHistory::default();
        history.insert(record("dec-a")).expect("insert");
        history.insert(record("dec-b")).expect("insert");

        let ids: Vec<_> = history
            .list()
            .expect("list")
            .into_iter()
            .map(|record| record.id.0)
            .collect();
        assert_eq!(ids, ["dec-b", "dec-a"]);
    }

    #[test]
    fn duplicate_ids_conflict() {
        let history = InMemoryDecisionHistory::default();
        history.insert(record("dec-a")).expect("insert");

        assert!(matches!(
            history.insert(record("dec-a")),
            Err(HistoryError::Conflict)
        ));
        assert!(matches!(
            history.delete(&DecisionId("dec-z".to_string())),
            Err(HistoryError::NotFound)
        ));
    }
}
