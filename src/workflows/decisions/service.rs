use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

use super::domain::{DecisionDraft, DecisionHistoryEntry, DecisionId, DecisionRecord};
use super::history::{DecisionHistory, HistoryError};
use super::validation::{
    self, FinancialSpendingAdviceRequest, FinancialTotalsRequest, MultipleChoiceAdviceRequest,
    ValidationError, WeightedScoreRequest, YesNoAdviceRequest,
};
use crate::workflows::advice::{
    Advice, AdviceError, AdviceProvider, AdviceRequest, CriteriaSuggestionRequest,
    CriterionSuggestion, FinancialWeightSuggestion, FinancialWeightsRequest,
};
use crate::workflows::financial::{self, CalculationError, FinancialComparison, NonFinitePolicy};
use crate::workflows::weighted::{self, WeightAudit, WeightedResult};

const ADVICE_FAILED: &str = "Failed to get AI advice. Please try again.";
const SUGGESTIONS_FAILED: &str = "Failed to get AI suggestions. Please try again.";

/// Scores in input order, the same scores ranked, and the weight-sum audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedScoreReport {
    pub results: Vec<WeightedResult>,
    pub ranking: Vec<WeightedResult>,
    pub audit: WeightAudit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Service composing validation, the calculators, the advice provider and the history.
pub struct DecisionService<H, P> {
    history: Arc<H>,
    advisor: Arc<P>,
    policy: NonFinitePolicy,
}

static DECISION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_decision_id() -> DecisionId {
    let id = DECISION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DecisionId(format!("dec-{id:06}"))
}

impl<H, P> DecisionService<H, P>
where
    H: DecisionHistory + 'static,
    P: AdviceProvider + 'static,
{
    pub fn new(history: Arc<H>, advisor: Arc<P>, policy: NonFinitePolicy) -> Self {
        Self {
            history,
            advisor,
            policy,
        }
    }

    pub fn policy(&self) -> NonFinitePolicy {
        self.policy
    }

    pub fn financial_totals(
        &self,
        request: FinancialTotalsRequest,
    ) -> Result<FinancialComparison, DecisionServiceError> {
        validation::financial_totals(&request)?;
        let comparison = financial::compare(&request.financing, &request.consortium, self.policy)?;
        Ok(comparison)
    }

    pub fn score_weighted(
        &self,
        request: WeightedScoreRequest,
    ) -> Result<WeightedScoreReport, DecisionServiceError> {
        let request = validation::weighted_score(request)?;
        let results = weighted::score_options(&request.criteria, &request.options);
        let ranking = weighted::rank(&results);
        let audit = WeightAudit::of(&request.criteria);

        Ok(WeightedScoreReport {
            results,
            ranking,
            warning: audit.warning(),
            audit,
        })
    }

    pub fn advise_yes_no(&self, request: YesNoAdviceRequest) -> Result<Advice, DecisionServiceError> {
        let request = validation::yes_no_advice(request)?;
        self.advise(AdviceRequest::YesNo {
            context: request.context,
        })
    }

    pub fn advise_multiple_choice(
        &self,
        request: MultipleChoiceAdviceRequest,
    ) -> Result<Advice, DecisionServiceError> {
        let request = validation::multiple_choice_advice(request)?;
        self.advise(AdviceRequest::MultipleChoice {
            context: request.context,
            options: request.options,
        })
    }

    /// The computed totals travel with the request so the advice can cite them.
    pub fn advise_financial_spending(
        &self,
        request: FinancialSpendingAdviceRequest,
    ) -> Result<Advice, DecisionServiceError> {
        let request = validation::financial_spending_advice(request)?;
        let comparison = financial::compare(&request.financing, &request.consortium, self.policy)?;
        self.advise(AdviceRequest::FinancialSpending {
            context: request.context,
            financing: request.financing,
            consortium: request.consortium,
            comparison,
        })
    }

    pub fn suggest_criteria(
        &self,
        request: CriteriaSuggestionRequest,
    ) -> Result<Vec<CriterionSuggestion>, DecisionServiceError> {
        let request = validation::criteria_suggestions(request)?;
        self.advisor.suggest_criteria(&request).map_err(|source| {
            error!(error = %source, "criteria suggestion failed");
            DecisionServiceError::Advice {
                message: SUGGESTIONS_FAILED,
                source,
            }
        })
    }

    pub fn suggest_financial_weights(
        &self,
        request: FinancialWeightsRequest,
    ) -> Result<Vec<FinancialWeightSuggestion>, DecisionServiceError> {
        let request = validation::financial_weights(request)?;
        self.advisor
            .suggest_financial_weights(&request)
            .map_err(|source| {
                error!(error = %source, "financial weight suggestion failed");
                DecisionServiceError::Advice {
                    message: SUGGESTIONS_FAILED,
                    source,
                }
            })
    }

    /// Validate a finalized decision, stamp it with an id and the current time, and store it.
    pub fn save(&self, draft: DecisionDraft) -> Result<DecisionRecord, DecisionServiceError> {
        let draft = validation::decision_draft(draft)?;
        let record = DecisionRecord {
            id: next_decision_id(),
            context: draft.context,
            date: Utc::now(),
            details: draft.details,
        };

        let stored = self.history.insert(record)?;
        info!(id = %stored.id, kind = stored.kind().label(), "decision saved");
        Ok(stored)
    }

    pub fn history(&self) -> Result<Vec<DecisionHistoryEntry>, DecisionServiceError> {
        let records = self.history.list()?;
        Ok(records.iter().map(DecisionRecord::history_entry).collect())
    }

    pub fn delete(&self, id: &DecisionId) -> Result<DecisionRecord, DecisionServiceError> {
        let removed = self.history.delete(id)?;
        info!(id = %removed.id, "decision deleted");
        Ok(removed)
    }

    pub fn clear(&self) -> Result<usize, DecisionServiceError> {
        let removed = self.history.clear()?;
        info!(removed, "decision history cleared");
        Ok(removed)
    }

    fn advise(&self, request: AdviceRequest) -> Result<Advice, DecisionServiceError> {
        let outcome = self.advisor.advise(&request).and_then(|advice| {
            if advice.trim().is_empty() {
                Err(AdviceError::EmptyResponse)
            } else {
                Ok(advice)
            }
        });

        match outcome {
            Ok(advice) => Ok(Advice { advice }),
            Err(source) => {
                error!(flow = request.flow(), error = %source, "advice request failed");
                Err(DecisionServiceError::Advice {
                    message: ADVICE_FAILED,
                    source,
                })
            }
        }
    }
}

/// Error raised by the decision service.
#[derive(Debug, thiserror::Error)]
pub enum DecisionServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Calculation(#[from] CalculationError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("{message}")]
    Advice {
        message: &'static str,
        #[source]
        source: AdviceError,
    },
}
