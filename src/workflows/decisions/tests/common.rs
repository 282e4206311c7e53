use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::advice::{
    AdviceError, AdviceProvider, AdviceRequest, ChoiceOption, CriteriaSuggestionRequest,
    CriterionSuggestion, FinancialWeightSuggestion, FinancialWeightsRequest, RuleBasedAdvisor,
};
use crate::workflows::decisions::domain::{
    DecisionDetails, DecisionDraft, DecisionId, DecisionRecord, YesNoChoice,
};
use crate::workflows::decisions::history::{
    DecisionHistory, HistoryError, InMemoryDecisionHistory,
};
use crate::workflows::decisions::validation::{
    FinancialSpendingAdviceRequest, FinancialTotalsRequest, MultipleChoiceAdviceRequest,
    WeightedScoreRequest,
};
use crate::workflows::decisions::{decision_router, DecisionService};
use crate::workflows::financial::{ConsortiumTerms, FinancingTerms, NonFinitePolicy};
use crate::workflows::weighted::{Criterion, ScoredOption};

pub(super) fn financing() -> FinancingTerms {
    FinancingTerms {
        total_value: 50_000.0,
        down_payment: 10_000.0,
        interest_rate: 1.5,
        installments: 48,
    }
}

pub(super) fn consortium() -> ConsortiumTerms {
    ConsortiumTerms {
        total_value: 50_000.0,
        admin_fee: 15.0,
        installments: 60,
    }
}

pub(super) fn totals_request() -> FinancialTotalsRequest {
    FinancialTotalsRequest {
        financing: financing(),
        consortium: consortium(),
    }
}

pub(super) fn spending_request() -> FinancialSpendingAdviceRequest {
    FinancialSpendingAdviceRequest {
        context: "Buying a family car for daily commutes".to_string(),
        financing: financing(),
        consortium: consortium(),
    }
}

pub(super) fn multiple_choice_request(values: &[&str]) -> MultipleChoiceAdviceRequest {
    MultipleChoiceAdviceRequest {
        context: "Which framework for the new project?".to_string(),
        options: values
            .iter()
            .map(|value| ChoiceOption {
                value: (*value).to_string(),
                description: String::new(),
            })
            .collect(),
    }
}

pub(super) fn weighted_request() -> WeightedScoreRequest {
    WeightedScoreRequest {
        criteria: vec![Criterion::new("Price", 60), Criterion::new("Safety", 40)],
        options: vec![
            ScoredOption::new("Car A")
                .with_score("Price", 8.0)
                .with_score("Safety", 5.0),
            ScoredOption::new("Car B")
                .with_score("Price", 6.0)
                .with_score("Safety", 9.0),
        ],
    }
}

pub(super) fn yes_no_draft(decision: YesNoChoice) -> DecisionDraft {
    DecisionDraft {
        context: "Should I accept the job offer abroad?".to_string(),
        details: DecisionDetails::YesNo { decision },
    }
}

pub(super) fn weighted_draft(decision: &str) -> DecisionDraft {
    let request = weighted_request();
    DecisionDraft {
        context: "Choosing a new car for the family".to_string(),
        details: DecisionDetails::WeightedAnalysis {
            criteria: request.criteria,
            options: request.options,
            decision: decision.to_string(),
        },
    }
}

pub(super) type MemoryService = DecisionService<InMemoryDecisionHistory, RuleBasedAdvisor>;

pub(super) fn build_service() -> (MemoryService, Arc<InMemoryDecisionHistory>) {
    build_service_with_policy(NonFinitePolicy::Strict)
}

pub(super) fn build_service_with_policy(
    policy: NonFinitePolicy,
) -> (MemoryService, Arc<InMemoryDecisionHistory>) {
    let history = Arc::new(InMemoryDecisionHistory::default());
    let service = DecisionService::new(history.clone(), Arc::new(RuleBasedAdvisor), policy);
    (service, history)
}

pub(super) fn router_with_service<H, P>(service: DecisionService<H, P>) -> axum::Router
where
    H: DecisionHistory + 'static,
    P: AdviceProvider + 'static,
{
    decision_router(Arc::new(service))
}

pub(super) struct ConflictHistory;

impl DecisionHistory for ConflictHistory {
    fn insert(&self, _record: DecisionRecord) -> Result<DecisionRecord, HistoryError> {
        Err(HistoryError::Conflict)
    }

    fn delete(&self, _id: &DecisionId) -> Result<DecisionRecord, HistoryError> {
        Err(HistoryError::NotFound)
    }

    fn clear(&self) -> Result<usize, HistoryError> {
        Ok(0)
    }

    fn list(&self) -> Result<Vec<DecisionRecord>, HistoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableHistory;

impl DecisionHistory for UnavailableHistory {
    fn insert(&self, _record: DecisionRecord) -> Result<DecisionRecord, HistoryError> {
        Err(HistoryError::Unavailable("disk full".to_string()))
    }

    fn delete(&self, _id: &DecisionId) -> Result<DecisionRecord, HistoryError> {
        Err(HistoryError::Unavailable("disk full".to_string()))
    }

    fn clear(&self) -> Result<usize, HistoryError> {
        Err(HistoryError::Unavailable("disk full".to_string()))
    }

    fn list(&self) -> Result<Vec<DecisionRecord>, HistoryError> {
        Err(HistoryError::Unavailable("disk full".to_string()))
    }
}

/// Provider standing in for an unreachable model endpoint.
pub(super) struct OfflineAdvisor;

impl AdviceProvider for OfflineAdvisor {
    fn advise(&self, _request: &AdviceRequest) -> Result<String, AdviceError> {
        Err(AdviceError::Unavailable("connection refused".to_string()))
    }

    fn suggest_criteria(
        &self,
        _request: &CriteriaSuggestionRequest,
    ) -> Result<Vec<CriterionSuggestion>, AdviceError> {
        Err(AdviceError::Unavailable("connection refused".to_string()))
    }

    fn suggest_financial_weights(
        &self,
        _request: &FinancialWeightsRequest,
    ) -> Result<Vec<FinancialWeightSuggestion>, AdviceError> {
        Err(AdviceError::Unavailable("connection refused".to_string()))
    }
}

/// Provider that answers with whitespace only.
pub(super) struct SilentAdvisor;

impl AdviceProvider for SilentAdvisor {
    fn advise(&self, _request: &AdviceRequest) -> Result<String, AdviceError> {
        Ok("  \n".to_string())
    }

    fn suggest_criteria(
        &self,
        _request: &CriteriaSuggestionRequest,
    ) -> Result<Vec<CriterionSuggestion>, AdviceError> {
        Ok(Vec::new())
    }

    fn suggest_financial_weights(
        &self,
        _request: &FinancialWeightsRequest,
    ) -> Result<Vec<FinancialWeightSuggestion>, AdviceError> {
        Ok(Vec::new())
    }
}

/// Provider that blocks on the runtime like a network-backed advisor does.
pub(super) struct BlockingAdvisor;

impl AdviceProvider for BlockingAdvisor {
    fn advise(&self, request: &AdviceRequest) -> Result<String, AdviceError> {
        tokio::runtime::Handle::current().block_on(tokio::task::yield_now());
        Ok(format!("Answered {} off the async workers.", request.flow()))
    }

    fn suggest_criteria(
        &self,
        _request: &CriteriaSuggestionRequest,
    ) -> Result<Vec<CriterionSuggestion>, AdviceError> {
        Ok(Vec::new())
    }

    fn suggest_financial_weights(
        &self,
        _request: &FinancialWeightsRequest,
    ) -> Result<Vec<FinancialWeightSuggestion>, AdviceError> {
        Ok(Vec::new())
    }
}

pub(super) fn json_request(method: &str, uri: &str, body: &Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serialize body"),
        ))
        .expect("build request")
}

pub(super) fn empty_request(method: &str, uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .expect("build request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
