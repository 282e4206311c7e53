//! Decision flows: boundary validation, advice requests and the history of
//! finalized decisions, exposed through [`DecisionService`] and its router.

pub mod domain;
pub mod history;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    DecisionDetails, DecisionDraft, DecisionHistoryEntry, DecisionId, DecisionKind,
    DecisionRecord, YesNoChoice,
};
pub use history::{DecisionHistory, HistoryError, InMemoryDecisionHistory};
pub use router::decision_router;
pub use service::{DecisionService, DecisionServiceError, WeightedScoreReport};
pub use validation::{
    FinancialSpendingAdviceRequest, FinancialTotalsRequest, MultipleChoiceAdviceRequest,
    ValidationError, WeightedScoreRequest, YesNoAdviceRequest,
};
