//! Contract with the language-model advice collaborator.
//!
//! Requests carry the user's context plus the structured data they typed
//! (options, criteria, computed financial totals). Providers answer with
//! Markdown advice or structured suggestions and hold no state between calls.

mod model;
mod request;
mod rules;

pub use model::ModelAdvisor;
pub use request::{
    AdviceRequest, ChoiceOption, CriteriaSuggestionRequest, CriterionSuggestion,
    FinancialWeightSuggestion, FinancialWeightsRequest,
};
pub use rules::RuleBasedAdvisor;

use serde::{Deserialize, Serialize};

/// Stateless request/response advice service.
pub trait AdviceProvider: Send + Sync {
    /// Markdown advice for a decision.
    fn advise(&self, request: &AdviceRequest) -> Result<String, AdviceError>;

    fn suggest_criteria(
        &self,
        request: &CriteriaSuggestionRequest,
    ) -> Result<Vec<CriterionSuggestion>, AdviceError>;

    fn suggest_financial_weights(
        &self,
        request: &FinancialWeightsRequest,
    ) -> Result<Vec<FinancialWeightSuggestion>, AdviceError>;
}

/// Markdown advice returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub advice: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AdviceError {
    #[error("advice provider unavailable: {0}")]
    Unavailable(String),
    #[error("advice provider returned an empty response")]
    EmptyResponse,
    #[error("advice request failed: {0}")]
    Http(#[from] reqwest::Error),
}
