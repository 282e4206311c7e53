use decision_ai::config::AdviceConfig;
use decision_ai::workflows::advice::{
    AdviceError, AdviceProvider, AdviceRequest, CriteriaSuggestionRequest, CriterionSuggestion,
    FinancialWeightSuggestion, FinancialWeightsRequest, ModelAdvisor, RuleBasedAdvisor,
};
use decision_ai::workflows::decisions::{
    DecisionHistory, DecisionId, DecisionRecord, HistoryError, InMemoryDecisionHistory,
};
use decision_ai::workflows::weighted::{Criterion, ScoredOption};
use metrics_exporter_prometheus::PrometheusHandle;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// History persisted as a JSON array, rewritten in full after each mutation.
#[derive(Debug)]
pub(crate) struct JsonFileHistory {
    path: PathBuf,
    records: Mutex<Vec<DecisionRecord>>,
}

impl JsonFileHistory {
    /// Load the file if it exists; a missing file starts an empty history.
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();
        let records = match std::fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                HistoryError::Unavailable(format!("failed to parse {}: {err}", path.display()))
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                return Err(HistoryError::Unavailable(format!(
                    "failed to read {}: {err}",
                    path.display()
                )))
            }
        };

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy, persist it, and only then swap it in.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Vec<DecisionRecord>) -> Result<T, HistoryError>,
    ) -> Result<T, HistoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| HistoryError::Unavailable("history lock poisoned".to_string()))?;
        let mut next = guard.clone();
        let outcome = change(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(outcome)
    }

    /// Write a sibling temp file and rename it over the target, so readers see
    /// either the previous history or the new one.
    fn persist(&self, records: &[DecisionRecord]) -> Result<(), HistoryError> {
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|err| HistoryError::Unavailable(format!("failed to encode history: {err}")))?;
        let write_failed = |err: std::io::Error| {
            HistoryError::Unavailable(format!("failed to write {}: {err}", self.path.display()))
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
        staged.write_all(&bytes).map_err(write_failed)?;
        staged.as_file().sync_all().map_err(write_failed)?;
        staged
            .persist(&self.path)
            .map_err(|err| write_failed(err.error))?;
        Ok(())
    }
}

impl DecisionHistory for JsonFileHistory {
    fn insert(&self, record: DecisionRecord) -> Result<DecisionRecord, HistoryError> {
        self.mutate(|records| {
            if records.iter().any(|existing| existing.id == record.id) {
                return Err(HistoryError::Conflict);
            }
            records.insert(0, record.clone());
            Ok(record)
        })
    }

    fn delete(&self, id: &DecisionId) -> Result<DecisionRecord, HistoryError> {
        self.mutate(|records| {
            let position = records
                .iter()
                .position(|record| &record.id == id)
                .ok_or(HistoryError::NotFound)?;
            Ok(records.remove(position))
        })
    }

    fn clear(&self) -> Result<usize, HistoryError> {
        self.mutate(|records| {
            let removed = records.len();
            records.clear();
            Ok(removed)
        })
    }

    fn list(&self) -> Result<Vec<DecisionRecord>, HistoryError> {
        self.records
            .lock()
            .map(|records| records.clone())
            .map_err(|_| HistoryError::Unavailable("history lock poisoned".to_string()))
    }
}

/// History store picked from configuration at start-up.
#[derive(Debug)]
pub(crate) enum HistoryBackend {
    Memory(InMemoryDecisionHistory),
    File(JsonFileHistory),
}

impl HistoryBackend {
    pub(crate) fn from_path(path: Option<&Path>) -> Result<Self, HistoryError> {
        match path {
            Some(path) => JsonFileHistory::open(path).map(Self::File),
            None => Ok(Self::Memory(InMemoryDecisionHistory::default())),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "memory".to_string(),
            Self::File(history) => history.path().display().to_string(),
        }
    }
}

impl DecisionHistory for HistoryBackend {
    fn insert(&self, record: DecisionRecord) -> Result<DecisionRecord, HistoryError> {
        match self {
            Self::Memory(history) => history.insert(record),
            Self::File(history) => history.insert(record),
        }
    }

    fn delete(&self, id: &DecisionId) -> Result<DecisionRecord, HistoryError> {
        match self {
            Self::Memory(history) => history.delete(id),
            Self::File(history) => history.delete(id),
        }
    }

    fn clear(&self) -> Result<usize, HistoryError> {
        match self {
            Self::Memory(history) => history.clear(),
            Self::File(history) => history.clear(),
        }
    }

    fn list(&self) -> Result<Vec<DecisionRecord>, HistoryError> {
        match self {
            Self::Memory(history) => history.list(),
            Self::File(history) => history.list(),
        }
    }
}

/// Advice provider picked from configuration: the model endpoint when one is
/// set, the rule-based advisor otherwise.
#[derive(Debug)]
pub(crate) enum AdvisorBackend {
    Rules(RuleBasedAdvisor),
    Model(ModelAdvisor),
}

impl AdvisorBackend {
    pub(crate) fn from_config(config: &AdviceConfig) -> Result<Self, AdviceError> {
        match &config.endpoint {
            Some(endpoint) => {
                ModelAdvisor::new(endpoint.as_str(), config.api_key.clone(), config.timeout)
                    .map(Self::Model)
            }
            None => Ok(Self::Rules(RuleBasedAdvisor)),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Rules(_) => "rules".to_string(),
            Self::Model(advisor) => advisor.endpoint().to_string(),
        }
    }
}

impl AdviceProvider for AdvisorBackend {
    fn advise(&self, request: &AdviceRequest) -> Result<String, AdviceError> {
        match self {
            Self::Rules(advisor) => advisor.advise(request),
            Self::Model(advisor) => advisor.advise(request),
        }
    }

    fn suggest_criteria(
        &self,
        request: &CriteriaSuggestionRequest,
    ) -> Result<Vec<CriterionSuggestion>, AdviceError> {
        match self {
            Self::Rules(advisor) => advisor.suggest_criteria(request),
            Self::Model(advisor) => advisor.suggest_criteria(request),
        }
    }

    fn suggest_financial_weights(
        &self,
        request: &FinancialWeightsRequest,
    ) -> Result<Vec<FinancialWeightSuggestion>, AdviceError> {
        match self {
            Self::Rules(advisor) => advisor.suggest_financial_weights(request),
            Self::Model(advisor) => advisor.suggest_financial_weights(request),
        }
    }
}

/// Parse `NAME=WEIGHT`, e.g. `Price=60`.
pub(crate) fn parse_criterion(raw: &str) -> Result<Criterion, String> {
    let (name, weight) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=WEIGHT, got '{raw}'"))?;
    let weight = weight
        .trim()
        .parse::<u8>()
        .map_err(|err| format!("invalid weight in '{raw}' ({err})"))?;
    Ok(Criterion::new(name.trim(), weight))
}

/// Parse `NAME:CRIT=SCORE,CRIT=SCORE`, e.g. `Car A:Price=8,Safety=5`.
pub(crate) fn parse_scored_option(raw: &str) -> Result<ScoredOption, String> {
    let (name, scores) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:CRIT=SCORE,..., got '{raw}'"))?;

    scores
        .split(',')
        .filter(|pair| !pair.trim().is_empty())
        .try_fold(ScoredOption::new(name.trim()), |option, pair| {
            let (criterion, score) = pair
                .rsplit_once('=')
                .ok_or_else(|| format!("expected CRIT=SCORE, got '{pair}'"))?;
            let score = score
                .trim()
                .parse::<f64>()
                .map_err(|err| format!("invalid score in '{pair}' ({err})"))?;
            Ok(option.with_score(criterion.trim(), score))
        })
}
