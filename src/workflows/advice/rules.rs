use std::fmt::Write as _;

use super::request::{
    AdviceRequest, ChoiceOption, CriteriaSuggestionRequest, CriterionSuggestion,
    FinancialWeightSuggestion, FinancialWeightsRequest,
};
use super::{AdviceError, AdviceProvider};
use crate::workflows::financial::{format_amount, FinancialComparison, FinancingTerms};
use crate::workflows::weighted::WeightAudit;

/// Baseline criteria proposed when a weighted analysis starts empty.
const BASELINE_CRITERIA: [(&str, u8, &str); 5] = [
    ("Cost", 30, "Total money spent, upfront and over time."),
    ("Quality", 25, "How well the option does what you need it to do."),
    ("Risk", 20, "What can go wrong and how hard it is to recover."),
    ("Time", 15, "How soon the option pays off or becomes available."),
    ("Flexibility", 10, "How easy it is to change course later."),
];

/// Deterministic advisor that derives advice from the structured request data.
///
/// Used when no language model is wired in, and as a predictable provider in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedAdvisor;

impl AdviceProvider for RuleBasedAdvisor {
    fn advise(&self, request: &AdviceRequest) -> Result<String, AdviceError> {
        let advice = match request {
            AdviceRequest::YesNo { context } => yes_no_advice(context),
            AdviceRequest::MultipleChoice { context, options } => {
                multiple_choice_advice(context, options)
            }
            AdviceRequest::FinancialSpending {
                context,
                financing,
                comparison,
                ..
            } => financial_advice(context, financing, comparison),
        };
        Ok(advice)
    }

    fn suggest_criteria(
        &self,
        request: &CriteriaSuggestionRequest,
    ) -> Result<Vec<CriterionSuggestion>, AdviceError> {
        let budget = WeightAudit::of(&request.existing_criteria).remaining();
        let candidates: Vec<_> = BASELINE_CRITERIA
            .iter()
            .filter(|(name, _, _)| {
                !request
                    .existing_criteria
                    .iter()
                    .any(|criterion| criterion.name.trim().eq_ignore_ascii_case(name))
            })
            .collect();

        if budget == 0 || candidates.is_empty() {
            return Ok(Vec::new());
        }

        let base_total: u32 = candidates.iter().map(|(_, weight, _)| u32::from(*weight)).sum();
        let mut weights: Vec<u32> = candidates
            .iter()
            .map(|(_, weight, _)| u32::from(*weight) * budget / base_total)
            .collect();
        let assigned: u32 = weights.iter().sum();
        if let Some(first) = weights.first_mut() {
            *first += budget - assigned;
        }

        Ok(candidates
            .into_iter()
            .zip(weights)
            .filter(|(_, weight)| *weight > 0)
            .map(|((name, _, rationale), weight)| CriterionSuggestion {
                name: (*name).to_string(),
                weight: u8::try_from(weight).unwrap_or(u8::MAX),
                rationale: format!("**{name}** ({weight}%): {rationale}"),
            })
            .collect())
    }

    fn suggest_financial_weights(
        &self,
        request: &FinancialWeightsRequest,
    ) -> Result<Vec<FinancialWeightSuggestion>, AdviceError> {
        let fixed = request.fixed_cost.unwrap_or(0.0).max(0.0);
        let variable = request.variable_cost.unwrap_or(0.0).max(0.0);
        let total = fixed + variable;

        let suggestion = if total > 0.0 && total.is_finite() {
            let fixed_cost_weight = ((fixed / total) * 100.0).round() / 100.0;
            FinancialWeightSuggestion {
                fixed_cost_weight,
                variable_cost_weight: ((1.0 - fixed_cost_weight) * 100.0).round() / 100.0,
                rationale: format!(
                    "Fixed costs are {:.0}% of the combined cost, so they carry a proportional share \
                     of the weight.",
                    (fixed / total) * 100.0
                ),
            }
        } else {
            FinancialWeightSuggestion {
                fixed_cost_weight: 0.5,
                variable_cost_weight: 0.5,
                rationale: "No cost figures were given, so fixed and variable costs are weighed \
                            equally."
                    .to_string(),
            }
        };

        Ok(vec![suggestion])
    }
}

fn yes_no_advice(context: &str) -> String {
    let mut advice = String::new();
    let _ = writeln!(advice, "## Decision\n\n> {context}\n");
    advice.push_str("### Before you answer\n\n");
    advice.push_str("- **Reversibility**: if you say yes and it goes wrong, can it be undone?\n");
    advice.push_str("- **Cost of waiting**: what do you lose by saying no for now?\n");
    advice.push_str("- **Gut check**: which answer would you regret more in a year?\n\n");
    advice.push_str(
        "**Recommendation:** say yes only if the downside is recoverable and the upside is clear; \
         otherwise hold off until you have more information.",
    );
    advice
}

fn multiple_choice_advice(context: &str, options: &[ChoiceOption]) -> String {
    let mut advice = String::new();
    let _ = writeln!(advice, "## Decision\n\n> {context}\n");
    let _ = writeln!(advice, "### {} options on the table\n", options.len());
    for option in options {
        let description = option.description.trim();
        if description.is_empty() {
            let _ = writeln!(advice, "- **{}**: _no notes yet_", option.value);
        } else {
            let _ = writeln!(advice, "- **{}**: {description}", option.value);
        }
    }

    let undocumented = options
        .iter()
        .filter(|option| option.description.trim().is_empty())
        .count();
    advice.push('\n');
    if undocumented > 0 {
        let _ = writeln!(
            advice,
            "{undocumented} option(s) have no notes. Write down what each one offers before choosing.\n"
        );
    }
    advice.push_str(
        "**Recommendation:** score the options against the criteria that matter to you with a \
         weighted analysis; the highest score is the strongest candidate.",
    );
    advice
}

fn financial_advice(
    context: &str,
    financing: &FinancingTerms,
    comparison: &FinancialComparison,
) -> String {
    let totals = comparison.totals;
    let mut advice = String::new();
    let _ = writeln!(advice, "## Decision\n\n> {context}\n");
    advice.push_str("| Option | Monthly | Total |\n|---|---:|---:|\n");
    let _ = writeln!(
        advice,
        "| Financing | {} | {} |",
        format_amount(comparison.financing.monthly_payment),
        format_amount(totals.financing_total)
    );
    let _ = writeln!(
        advice,
        "| Consortium | {} | {} |\n",
        format_amount(comparison.consortium.monthly_payment),
        format_amount(totals.consortium_total)
    );

    if totals.financing_total <= 0.0 || totals.consortium_total <= 0.0 {
        advice.push_str(
            "One of the totals could not be computed from the terms given. Check the values \
             before comparing the options.",
        );
        return advice;
    }

    let interest = totals.financing_total - financing.total_value;
    if interest > 0.0 {
        let _ = writeln!(
            advice,
            "- Financing adds **{}** in interest on top of the asset value.",
            format_amount(interest)
        );
    }
    advice.push_str(
        "- A consortium charges no interest, but the asset is only delivered once your quota is \
         drawn or a bid wins.\n\n",
    );

    match totals.cheaper() {
        Some(option) => {
            let difference = (totals.financing_total - totals.consortium_total).abs();
            let _ = write!(
                advice,
                "**Recommendation:** {} is cheaper by **{}**. Prefer it unless you need the asset \
                 right away.",
                option.label(),
                format_amount(difference)
            );
        }
        None => advice.push_str(
            "**Recommendation:** both options cost the same; choose on how soon you need the asset.",
        ),
    }
    advice
}
