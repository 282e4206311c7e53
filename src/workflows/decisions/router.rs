use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{DecisionDraft, DecisionId};
use super::history::{DecisionHistory, HistoryError};
use super::service::{DecisionService, DecisionServiceError};
use super::validation::{
    FinancialSpendingAdviceRequest, FinancialTotalsRequest, MultipleChoiceAdviceRequest,
    WeightedScoreRequest, YesNoAdviceRequest,
};
use crate::workflows::advice::{AdviceProvider, CriteriaSuggestionRequest, FinancialWeightsRequest};

type Shared<H, P> = State<Arc<DecisionService<H, P>>>;

/// Router exposing the calculators, the advice flows and the decision history.
pub fn decision_router<H, P>(service: Arc<DecisionService<H, P>>) -> Router
where
    H: DecisionHistory + 'static,
    P: AdviceProvider + 'static,
{
    Router::new()
        .route(
            "/api/v1/decisions",
            get(history_handler::<H, P>)
                .post(save_handler::<H, P>)
                .delete(clear_handler::<H, P>),
        )
        .route(
            "/api/v1/decisions/:decision_id",
            delete(delete_handler::<H, P>),
        )
        .route(
            "/api/v1/decisions/financial/totals",
            post(financial_totals_handler::<H, P>),
        )
        .route(
            "/api/v1/decisions/financial/advice",
            post(financial_advice_handler::<H, P>),
        )
        .route(
            "/api/v1/decisions/financial/weights",
            post(financial_weights_handler::<H, P>),
        )
        .route(
            "/api/v1/decisions/weighted/score",
            post(weighted_score_handler::<H, P>),
        )
        .route(
            "/api/v1/decisions/weighted/suggestions",
            post(criteria_suggestions_handler::<H, P>),
        )
        .route(
            "/api/v1/decisions/yes-no/advice",
            post(yes_no_advice_handler::<H, P>),
        )
        .route(
            "/api/v1/decisions/multiple-choice/advice",
            post(multiple_choice_advice_handler::<H, P>),
        )
        .with_state(service)
}

impl IntoResponse for DecisionServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            DecisionServiceError::Validation(_) | DecisionServiceError::Calculation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            DecisionServiceError::History(HistoryError::Conflict) => StatusCode::CONFLICT,
            DecisionServiceError::History(HistoryError::NotFound) => StatusCode::NOT_FOUND,
            DecisionServiceError::History(HistoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            DecisionServiceError::Advice { .. } => StatusCode::BAD_GATEWAY,
        };

        let payload = match &self {
            DecisionServiceError::Validation(error) => json!({
                "error": error.message,
                "field": error.field,
            }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(payload)).into_response()
    }
}

fn respond<T: serde::Serialize>(
    status: StatusCode,
    outcome: Result<T, DecisionServiceError>,
) -> Response {
    match outcome {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Run a service call on the blocking pool; history stores and model
/// advisors may touch the disk or the network.
async fn run_blocking<H, P, T, F>(
    service: Arc<DecisionService<H, P>>,
    status: StatusCode,
    work: F,
) -> Response
where
    H: DecisionHistory + 'static,
    P: AdviceProvider + 'static,
    T: serde::Serialize + Send + 'static,
    F: FnOnce(&DecisionService<H, P>) -> Result<T, DecisionServiceError> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || work(service.as_ref())).await {
        Ok(outcome) => respond(status, outcome),
        Err(join_error) => {
            error!(error = %join_error, "decision task did not complete");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "decision task did not complete" })),
            )
                .into_response()
        }
    }
}

pub(crate) async fn financial_totals_handler<H, P>(
    State(service): Shared<H, P>,
    Json(request): Json<FinancialTotalsRequest>,
) -> Response
where
    H: DecisionHistory + 'static,
    P: AdviceProvider + 'static,
{
    run_blocking(service, StatusCode::OK, move |service| service.financial_totals(request)).await
}

pub(crate) async fn financial_advice_handler<H, P>(
    State(service): Shared<H, P>,
    Json(request): Json<FinancialSpendingAdviceRequest>,
) -> Response
where
    H: DecisionHistory + 'static,
    P: AdviceProvider + 'static,
{
    run_blocking(service, StatusCode::OK, move |service| {
        service.advise_financial_spending(request)
    })
    .await
}

pub(crate) async fn financial_weights_handler<H, P>(
    State(service): Shared<H, P>,
    Json(request): Json<FinancialWeightsRequest>,
) -> Response
where
    H: DecisionHistory + 'static,
    P: AdviceProvider + 'static,
{
    run_blocking(service, StatusCode::OK, move |service| {
        service.suggest_financial_weights(request)
    })
    .await
}

pub(crate) async fn weighted_score_handler<H, P>(
    State(service): Shared<H, P>,
    Json(request): Json<WeightedScoreRequest>,
) -> Response
where
    H: DecisionHistory + 'static,
    P: AdviceProvider + 'static,
{
    run_blocking(service, StatusCode::OK, move |service| service.score_weighted(request)).await
}

pub(crate) async fn criteria_suggestions_handler<H, P>(
    State(service): Shared<H, P>,
    Json(request): Json<CriteriaSuggestionRequest>,
) -> Response
where
    H: DecisionHistory + 'static,
    P: AdviceProvider + 'static,
{
    run_blocking(service, StatusCode::OK, move |service| service.suggest_criteria(request)).await
}

pub(crate) async fn yes_no_advice_handler<H, P>(
    State(service): Shared<H, P>,
    Json(request): Json<YesNoAdviceRequest>,
) -> Response
where
    H: DecisionHistory + 'static,
    P: AdviceProvider + 'static,
{
    run_blocking(service, StatusCode::OK, move |service| service.advise_yes_no(request)).await
}

pub(crate) async fn multiple_choice_advice_handler<H, P>(
    State(service): Shared<H, P>,
    Json(request): Json<MultipleChoiceAdviceRequest>,
) -> Response
where
    H: DecisionHistory + 'static,
    P: AdviceProvider + 'static,
{
    run_blocking(service, StatusCode::OK, move |service| {
        service.advise_multiple_choice(request)
    })
    .await
}

pub(crate) async fn save_handler<H, P>(
    State(service): Shared<H, P>,
    Json(draft): Json<DecisionDraft>,
) -> Response
where
    H: DecisionHistory + 'static,
    P: AdviceProvider + 'static,
{
    run_blocking(service, StatusCode::CREATED, move |service| service.save(draft)).await
}

pub(crate) async fn history_handler<H, P>(State(service): Shared<H, P>) -> Response
where
    H: DecisionHistory + 'static,
    P: AdviceProvider + 'static,
{
    run_blocking(service, StatusCode::OK, |service| service.history()).await
}

pub(crate) async fn delete_handler<H, P>(
    State(service): Shared<H, P>,
    Path(decision_id): Path<String>,
) -> Response
where
    H: DecisionHistory + 'static,
    P: AdviceProvider + 'static,
{
    run_blocking(service, StatusCode::OK, move |service| {
        service.delete(&DecisionId(decision_id))
    })
    .await
}

pub(crate) async fn clear_handler<H, P>(State(service): Shared<H, P>) -> Response
where
    H: DecisionHistory + 'static,
    P: AdviceProvider + 'static,
{
    run_blocking(service, StatusCode::OK, |service| {
        service
            .clear()
            .map(|removed| json!({ "removed": removed }))
    })
    .await
}
