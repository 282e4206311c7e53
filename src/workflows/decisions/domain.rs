use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::weighted::{score_options, Criterion, ScoredOption, WeightedResult};

/// Identifier wrapper for finalized decisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionId(pub String);

impl std::fmt::Display for DecisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionKind {
    #[serde(rename = "Yes/No")]
    YesNo,
    #[serde(rename = "Multiple Choice")]
    MultipleChoice,
    #[serde(rename = "Financial Spending")]
    FinancialSpending,
    #[serde(rename = "Financial Analysis")]
    FinancialAnalysis,
    #[serde(rename = "Weighted Analysis")]
    WeightedAnalysis,
}

impl DecisionKind {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::YesNo,
            Self::MultipleChoice,
            Self::FinancialSpending,
            Self::FinancialAnalysis,
            Self::WeightedAnalysis,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::YesNo => "Yes/No",
            Self::MultipleChoice => "Multiple Choice",
            Self::FinancialSpending => "Financial Spending",
            Self::FinancialAnalysis => "Financial Analysis",
            Self::WeightedAnalysis => "Weighted Analysis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YesNoChoice {
    Yes,
    No,
}

impl YesNoChoice {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

/// Kind-specific payload of a decision, tagged by its kind label on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DecisionDetails {
    #[serde(rename = "Yes/No")]
    YesNo { decision: YesNoChoice },
    #[serde(rename = "Multiple Choice")]
    MultipleChoice {
        options: Vec<String>,
        decision: String,
    },
    #[serde(rename = "Financial Spending")]
    FinancialSpending {
        options: Vec<String>,
        decision: String,
    },
    #[serde(rename = "Financial Analysis", rename_all = "camelCase")]
    FinancialAnalysis { fixed_cost: f64, variable_cost: f64 },
    #[serde(rename = "Weighted Analysis")]
    WeightedAnalysis {
        criteria: Vec<Criterion>,
        options: Vec<ScoredOption>,
        decision: String,
    },
}

impl DecisionDetails {
    pub const fn kind(&self) -> DecisionKind {
        match self {
            Self::YesNo { .. } => DecisionKind::YesNo,
            Self::MultipleChoice { .. } => DecisionKind::MultipleChoice,
            Self::FinancialSpending { .. } => DecisionKind::FinancialSpending,
            Self::FinancialAnalysis { .. } => DecisionKind::FinancialAnalysis,
            Self::WeightedAnalysis { .. } => DecisionKind::WeightedAnalysis,
        }
    }

    /// Option the user settled on. Financial analyses record costs, not a choice.
    pub fn chosen(&self) -> Option<&str> {
        match self {
            Self::YesNo { decision } => Some(decision.label()),
            Self::MultipleChoice { decision, .. }
            | Self::FinancialSpending { decision, .. }
            | Self::WeightedAnalysis { decision, .. } => Some(decision.as_str()),
            Self::FinancialAnalysis { .. } => None,
        }
    }

    /// Labels of the options that were considered.
    pub fn considered_options(&self) -> Vec<&str> {
        match self {
            Self::MultipleChoice { options, .. } | Self::FinancialSpending { options, .. } => {
                options.iter().map(String::as_str).collect()
            }
            Self::WeightedAnalysis { options, .. } => {
                options.iter().map(|option| option.name.as_str()).collect()
            }
            Self::YesNo { .. } | Self::FinancialAnalysis { .. } => Vec::new(),
        }
    }
}

/// User-submitted decision awaiting an id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionDraft {
    pub context: String,
    #[serde(flatten)]
    pub details: DecisionDetails,
}

/// Finalized decision as kept in the history. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: DecisionId,
    pub context: String,
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub details: DecisionDetails,
}

impl DecisionRecord {
    pub const fn kind(&self) -> DecisionKind {
        self.details.kind()
    }

    pub fn history_entry(&self) -> DecisionHistoryEntry {
        let final_scores = match &self.details {
            DecisionDetails::WeightedAnalysis {
                criteria, options, ..
            } => Some(score_options(criteria, options)),
            _ => None,
        };

        DecisionHistoryEntry {
            record: self.clone(),
            kind_label: self.kind().label(),
            chosen: self.details.chosen().map(str::to_string),
            final_scores,
        }
    }
}

/// History listing row: the record plus the figures shown alongside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionHistoryEntry {
    pub record: DecisionRecord,
    pub kind_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_scores: Option<Vec<WeightedResult>>,
}
