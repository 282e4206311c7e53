//! Boundary checks applied to raw requests before the calculators, the advice
//! provider, or the history see them. Messages are user-facing.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::domain::{DecisionDetails, DecisionDraft};
use crate::workflows::advice::{ChoiceOption, CriteriaSuggestionRequest, FinancialWeightsRequest};
use crate::workflows::financial::{ConsortiumTerms, FinancingTerms};
use crate::workflows::weighted::{Criterion, ScoredOption};

pub const MIN_CONTEXT_CHARS: usize = 10;
pub const MIN_CHOICE_OPTIONS: usize = 2;
/// Largest accepted score magnitude; keeps weighted sums finite.
pub const MAX_SCORE_MAGNITUDE: f64 = 1e12;

const CONTEXT_MESSAGE: &str = "Please provide more context for the decision.";
const OPTIONS_MESSAGE: &str = "Please provide at least two options.";
const SAVE_MESSAGE: &str = "Invalid data to save the decision.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YesNoAdviceRequest {
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoiceAdviceRequest {
    pub context: String,
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialTotalsRequest {
    pub financing: FinancingTerms,
    pub consortium: ConsortiumTerms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSpendingAdviceRequest {
    pub context: String,
    pub financing: FinancingTerms,
    pub consortium: ConsortiumTerms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedScoreRequest {
    pub criteria: Vec<Criterion>,
    pub options: Vec<ScoredOption>,
}

fn context(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_CONTEXT_CHARS {
        return Err(ValidationError::new("context", CONTEXT_MESSAGE));
    }
    Ok(trimmed.to_string())
}

fn non_negative(field: &str, value: f64, message: &str) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new(field, message))
    }
}

fn installments(field: &str, value: u32) -> Result<(), ValidationError> {
    if value >= 1 {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            "The number of installments must be at least 1.",
        ))
    }
}

pub fn financing_terms(terms: &FinancingTerms) -> Result<(), ValidationError> {
    non_negative(
        "financing.total_value",
        terms.total_value,
        "The total value must be positive.",
    )?;
    non_negative(
        "financing.down_payment",
        terms.down_payment,
        "The down payment must be positive.",
    )?;
    non_negative(
        "financing.interest_rate",
        terms.interest_rate,
        "The interest rate must be positive.",
    )?;
    installments("financing.installments", terms.installments)
}

pub fn consortium_terms(terms: &ConsortiumTerms) -> Result<(), ValidationError> {
    non_negative(
        "consortium.total_value",
        terms.total_value,
        "The total value must be positive.",
    )?;
    non_negative(
        "consortium.admin_fee",
        terms.admin_fee,
        "The administration fee must be positive.",
    )?;
    installments("consortium.installments", terms.installments)
}

/// Criterion names must be present and unique, weights within `0..=100`.
pub fn criteria(criteria: &[Criterion]) -> Result<Vec<Criterion>, ValidationError> {
    let mut seen = HashSet::new();
    let mut cleaned = Vec::with_capacity(criteria.len());

    for (index, criterion) in criteria.iter().enumerate() {
        let name = criterion.name.trim();
        if name.is_empty() {
            return Err(ValidationError::new(
                format!("criteria[{index}].name"),
                "Criterion names cannot be empty.",
            ));
        }
        if criterion.weight > 100 {
            return Err(ValidationError::new(
                format!("criteria[{index}].weight"),
                "Criterion weights must be between 0 and 100.",
            ));
        }
        if !seen.insert(name.to_string()) {
            return Err(ValidationError::new(
                format!("criteria[{index}].name"),
                "Criterion names must be unique.",
            ));
        }
        cleaned.push(Criterion::new(name, criterion.weight));
    }

    Ok(cleaned)
}

/// Option names must be present and every score a finite number within
/// `MAX_SCORE_MAGNITUDE`.
pub fn scored_options(options: &[ScoredOption]) -> Result<Vec<ScoredOption>, ValidationError> {
    options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let name = option.name.trim();
            if name.is_empty() {
                return Err(ValidationError::new(
                    format!("options[{index}].name"),
                    "Option names cannot be empty.",
                ));
            }
            for (criterion, score) in &option.scores {
                let field = || format!("options[{index}].scores.{criterion}");
                if !score.is_finite() {
                    return Err(ValidationError::new(field(), "Scores must be finite numbers."));
                }
                if score.abs() > MAX_SCORE_MAGNITUDE {
                    return Err(ValidationError::new(
                        field(),
                        "Scores must be between -1,000,000,000,000 and 1,000,000,000,000.",
                    ));
                }
            }
            Ok(ScoredOption {
                name: name.to_string(),
                scores: option.scores.clone(),
            })
        })
        .collect()
}

pub fn yes_no_advice(request: YesNoAdviceRequest) -> Result<YesNoAdviceRequest, ValidationError> {
    Ok(YesNoAdviceRequest {
        context: context(&request.context)?,
    })
}

/// Blank options are dropped before counting, as an empty form row would be.
pub fn multiple_choice_advice(
    request: MultipleChoiceAdviceRequest,
) -> Result<MultipleChoiceAdviceRequest, ValidationError> {
    let context = context(&request.context)?;
    let options: Vec<ChoiceOption> = request
        .options
        .into_iter()
        .filter(|option| !option.value.trim().is_empty())
        .map(|option| ChoiceOption {
            value: option.value.trim().to_string(),
            description: option.description.trim().to_string(),
        })
        .collect();

    if options.len() < MIN_CHOICE_OPTIONS {
        return Err(ValidationError::new("options", OPTIONS_MESSAGE));
    }

    Ok(MultipleChoiceAdviceRequest { context, options })
}

pub fn financial_totals(request: &FinancialTotalsRequest) -> Result<(), ValidationError> {
    financing_terms(&request.financing)?;
    consortium_terms(&request.consortium)
}

pub fn financial_spending_advice(
    request: FinancialSpendingAdviceRequest,
) -> Result<FinancialSpendingAdviceRequest, ValidationError> {
    let context = context(&request.context)?;
    financing_terms(&request.financing)?;
    consortium_terms(&request.consortium)?;
    Ok(FinancialSpendingAdviceRequest { context, ..request })
}

pub fn weighted_score(request: WeightedScoreRequest) -> Result<WeightedScoreRequest, ValidationError> {
    Ok(WeightedScoreRequest {
        criteria: criteria(&request.criteria)?,
        options: scored_options(&request.options)?,
    })
}

pub fn criteria_suggestions(
    request: CriteriaSuggestionRequest,
) -> Result<CriteriaSuggestionRequest, ValidationError> {
    Ok(CriteriaSuggestionRequest {
        context: context(&request.context)?,
        existing_criteria: criteria(&request.existing_criteria)?,
        existing_options: scored_options(&request.existing_options)?,
    })
}

pub fn financial_weights(
    request: FinancialWeightsRequest,
) -> Result<FinancialWeightsRequest, ValidationError> {
    let context = context(&request.context)?;
    if let Some(fixed) = request.fixed_cost {
        non_negative("fixed_cost", fixed, "The fixed cost must be positive.")?;
    }
    if let Some(variable) = request.variable_cost {
        non_negative("variable_cost", variable, "The variable cost must be positive.")?;
    }
    Ok(FinancialWeightsRequest { context, ..request })
}

fn labelled_options(options: Vec<String>) -> Result<Vec<String>, ValidationError> {
    let options: Vec<String> = options
        .into_iter()
        .map(|option| option.trim().to_string())
        .filter(|option| !option.is_empty())
        .collect();
    if options.len() < MIN_CHOICE_OPTIONS {
        return Err(ValidationError::new("options", SAVE_MESSAGE));
    }
    Ok(options)
}

fn chosen(decision: String) -> Result<String, ValidationError> {
    let decision = decision.trim().to_string();
    if decision.is_empty() {
        return Err(ValidationError::new("decision", SAVE_MESSAGE));
    }
    Ok(decision)
}

/// Check a finalized decision before it is stored.
pub fn decision_draft(draft: DecisionDraft) -> Result<DecisionDraft, ValidationError> {
    let context = context(&draft.context)?;

    let details = match draft.details {
        DecisionDetails::YesNo { decision } => DecisionDetails::YesNo { decision },
        DecisionDetails::MultipleChoice { options, decision } => DecisionDetails::MultipleChoice {
            options: labelled_options(options)?,
            decision: chosen(decision)?,
        },
        DecisionDetails::FinancialSpending { options, decision } => {
            DecisionDetails::FinancialSpending {
                options: labelled_options(options)?,
                decision: chosen(decision)?,
            }
        }
        DecisionDetails::FinancialAnalysis {
            fixed_cost,
            variable_cost,
        } => {
            non_negative("fixedCost", fixed_cost, "The fixed cost must be positive.")?;
            non_negative(
                "variableCost",
                variable_cost,
                "The variable cost must be positive.",
            )?;
            DecisionDetails::FinancialAnalysis {
                fixed_cost,
                variable_cost,
            }
        }
        DecisionDetails::WeightedAnalysis {
            criteria: raw_criteria,
            options,
            decision,
        } => {
            let criteria = criteria(&raw_criteria)?;
            let options = scored_options(&options)?;
            if criteria.is_empty() {
                return Err(ValidationError::new(
                    "criteria",
                    "Add at least one criterion.",
                ));
            }
            if options.is_empty() {
                return Err(ValidationError::new("options", "Add at least one option."));
            }
            let decision = chosen(decision)?;
            if !options.iter().any(|option| option.name == decision) {
                return Err(ValidationError::new(
                    "decision",
                    "The chosen option must be one of the evaluated options.",
                ));
            }
            DecisionDetails::WeightedAnalysis {
                criteria,
                options,
                decision,
            }
        }
    };

    Ok(DecisionDraft { context, details })
}
