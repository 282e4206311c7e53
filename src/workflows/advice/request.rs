use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::workflows::financial::{
    format_amount, ConsortiumTerms, FinancialComparison, FinancingTerms,
};
use crate::workflows::weighted::{Criterion, ScoredOption};

/// Option of a multiple choice decision with the user's notes about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    #[serde(default)]
    pub description: String,
}

/// Advice request for each decision flow that returns Markdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum AdviceRequest {
    YesNo {
        context: String,
    },
    MultipleChoice {
        context: String,
        options: Vec<ChoiceOption>,
    },
    FinancialSpending {
        context: String,
        financing: FinancingTerms,
        consortium: ConsortiumTerms,
        comparison: FinancialComparison,
    },
}

impl AdviceRequest {
    pub const fn flow(&self) -> &'static str {
        match self {
            Self::YesNo { .. } => "yes_no_advice",
            Self::MultipleChoice { .. } => "multiple_choice_advice",
            Self::FinancialSpending { .. } => "financial_spending_advice",
        }
    }

    pub fn context(&self) -> &str {
        match self {
            Self::YesNo { context }
            | Self::MultipleChoice { context, .. }
            | Self::FinancialSpending { context, .. } => context,
        }
    }

    /// Prompt text sent to a language model for this request.
    pub fn prompt(&self) -> String {
        let mut prompt = String::new();
        match self {
            Self::YesNo { context } => {
                prompt.push_str(
                    "Given the decision context below, give balanced advice on whether to go ahead. \
                     The answer must be Markdown.\n\n",
                );
                let _ = writeln!(prompt, "Context: {context}\n");
                prompt.push_str(
                    "List the main arguments for and against, the key risks, and finish with a clear \
                     yes or no recommendation.",
                );
            }
            Self::MultipleChoice { context, options } => {
                prompt.push_str(
                    "Given the decision context and options below, advise which option to choose. \
                     The answer must be Markdown.\n\n",
                );
                let _ = writeln!(prompt, "Context: {context}\n");
                prompt.push_str("Options:\n");
                for option in options {
                    let _ = writeln!(prompt, "- **{}**: {}", option.value, option.description);
                }
                prompt.push_str(
                    "\nAnalyse the pros and cons of each option based on its description and give a \
                     clear recommendation. Use lists and bold text to structure the answer.",
                );
            }
            Self::FinancialSpending {
                context,
                financing,
                consortium,
                comparison,
            } => {
                prompt.push_str(
                    "You are a personal finance advisor. Compare a financing against a consortium \
                     for the purchase below. The answer must be Markdown.\n\n",
                );
                let _ = writeln!(prompt, "Context: {context}\n");
                let _ = writeln!(
                    prompt,
                    "Financing: asset value {}, down payment {}, monthly interest {}%, {} installments \
                     of {}, total cost {}.",
                    format_amount(financing.total_value),
                    format_amount(financing.down_payment),
                    financing.interest_rate,
                    financing.installments,
                    format_amount(comparison.financing.monthly_payment),
                    format_amount(comparison.financing.total_cost),
                );
                let _ = writeln!(
                    prompt,
                    "Consortium: credit value {}, administration fee {}%, {} installments of {}, \
                     total cost {}.",
                    format_amount(consortium.total_value),
                    consortium.admin_fee,
                    consortium.installments,
                    format_amount(comparison.consortium.monthly_payment),
                    format_amount(comparison.consortium.total_cost),
                );
                prompt.push_str(
                    "\nWeigh total cost, monthly burden, and how soon the asset is available \
                     (a consortium only delivers once the quota is drawn), then recommend one option.",
                );
            }
        }
        prompt
    }
}

/// Request for criteria and weights to seed a weighted analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaSuggestionRequest {
    pub context: String,
    #[serde(default)]
    pub existing_criteria: Vec<Criterion>,
    #[serde(default)]
    pub existing_options: Vec<ScoredOption>,
}

impl CriteriaSuggestionRequest {
    pub const FLOW: &'static str = "criteria_suggestions";

    pub fn prompt(&self) -> String {
        let mut prompt = String::from(
            "You are a decision analysis expert. Based on the context, suggest 5 to 7 relevant \
             evaluation criteria with an integer weight from 1 to 100 each. All weights, including \
             the existing criteria, must add up to 100.\n\n",
        );
        let _ = writeln!(prompt, "Decision context: {}", self.context);

        if !self.existing_criteria.is_empty() {
            prompt.push_str("\nExisting criteria:\n");
            for criterion in &self.existing_criteria {
                let _ = writeln!(prompt, "- {} ({}%)", criterion.name, criterion.weight);
            }
        }
        if !self.existing_options.is_empty() {
            prompt.push_str("\nOptions under evaluation:\n");
            for option in &self.existing_options {
                let _ = writeln!(prompt, "- {}", option.name);
            }
        }

        prompt.push_str(
            "\nFor each criterion give a short Markdown rationale for including it and for its weight.",
        );
        prompt
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionSuggestion {
    pub name: String,
    pub weight: u8,
    pub rationale: String,
}

/// Request for how to balance fixed and variable costs in a financial analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialWeightsRequest {
    pub context: String,
    #[serde(default)]
    pub fixed_cost: Option<f64>,
    #[serde(default)]
    pub variable_cost: Option<f64>,
}

impl FinancialWeightsRequest {
    pub const FLOW: &'static str = "financial_weights";

    pub fn prompt(&self) -> String {
        format!(
            "Based on the financial decision context below, suggest how much weight (0 to 1, both \
             adding up to 1) fixed costs and variable costs should carry, with a short Markdown \
             rationale.\n\nContext: {}",
            self.context
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialWeightSuggestion {
    pub fixed_cost_weight: f64,
    pub variable_cost_weight: f64,
    pub rationale: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::financial::{compare, NonFinitePolicy};

    #[test]
    fn multiple_choice_prompt_lists_options() {
        let request = AdviceRequest::MultipleChoice {
            context: "Which framework for the new project?".to_string(),
            options: vec![
                ChoiceOption {
                    value: "React".to_string(),
                    description: "A popular UI library.".to_string(),
                },
                ChoiceOption {
                    value: "Vue".to_string(),
                    description: String::new(),
                },
            ],
        };

        let prompt = request.prompt();

        assert_eq!(request.flow(), "multiple_choice_advice");
        assert!(prompt.contains("Context: Which framework for the new project?"));
        assert!(prompt.contains("- **React**: A popular UI library."));
        assert!(prompt.contains("- **Vue**: "));
    }

    #[test]
    fn financial_prompt_carries_computed_totals() {
        let financing = FinancingTerms {
            total_value: 2_000.0,
            down_payment: 500.0,
            interest_rate: 0.0,
            installments: 12,
        };
        let consortium = ConsortiumTerms {
            total_value: 2_000.0,
            admin_fee: 5.0,
            installments: 24,
        };
        let comparison =
            compare(&financing, &consortium, NonFinitePolicy::Strict).expect("finite totals");
        let request = AdviceRequest::FinancialSpending {
            context: "Buying a new laptop".to_string(),
            financing,
            consortium,
            comparison,
        };

        let prompt = request.prompt();

        assert!(prompt.contains("total cost 2,000.00"));
        assert!(prompt.contains("12 installments of 125.00"));
        assert!(prompt.contains("total cost 2,100.00"));
        assert_eq!(request.context(), "Buying a new laptop");
    }

    #[test]
    fn criteria_prompt_mentions_existing_entries() {
        let request = CriteriaSuggestionRequest {
            context: "Choosing a new car".to_string(),
            existing_criteria: vec![Criterion::new("Price", 50)],
            existing_options: vec![ScoredOption::new("Toyota Camry")],
        };

        let prompt = request.prompt();

        assert!(prompt.contains("- Price (50%)"));
        assert!(prompt.contains("- Toyota Camry"));
    }
}
