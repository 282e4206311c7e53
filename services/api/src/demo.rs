use crate::infra::{parse_criterion, parse_scored_option};
use clap::Args;
use decision_ai::error::AppError;
use decision_ai::workflows::advice::RuleBasedAdvisor;
use decision_ai::workflows::decisions::{
    DecisionDetails, DecisionDraft, DecisionService, FinancialSpendingAdviceRequest,
    FinancialTotalsRequest, InMemoryDecisionHistory, WeightedScoreReport, WeightedScoreRequest,
};
use decision_ai::workflows::financial::{
    format_amount, ConsortiumTerms, FinancialComparison, FinancialOption, FinancingTerms,
    NonFinitePolicy,
};
use decision_ai::workflows::weighted::{Criterion, ScoredOption};
use std::sync::Arc;

type DemoService = DecisionService<InMemoryDecisionHistory, RuleBasedAdvisor>;

#[derive(Args, Debug)]
pub(crate) struct FinancialCompareArgs {
    /// Asset value being financed
    #[arg(long, default_value_t = 50_000.0)]
    pub(crate) total_value: f64,
    /// Amount paid upfront
    #[arg(long, default_value_t = 10_000.0)]
    pub(crate) down_payment: f64,
    /// Monthly interest rate in percent
    #[arg(long, default_value_t = 1.5)]
    pub(crate) interest_rate: f64,
    /// Number of financing installments
    #[arg(long, default_value_t = 48)]
    pub(crate) installments: u32,
    /// Credit value of the consortium
    #[arg(long, default_value_t = 50_000.0)]
    pub(crate) consortium_value: f64,
    /// Consortium administration fee in percent
    #[arg(long, default_value_t = 15.0)]
    pub(crate) admin_fee: f64,
    /// Number of consortium installments
    #[arg(long, default_value_t = 60)]
    pub(crate) consortium_installments: u32,
    /// Fail on totals that cannot be computed instead of reporting them as zero
    #[arg(long)]
    pub(crate) strict: bool,
}

impl FinancialCompareArgs {
    fn request(&self) -> FinancialTotalsRequest {
        FinancialTotalsRequest {
            financing: FinancingTerms {
                total_value: self.total_value,
                down_payment: self.down_payment,
                interest_rate: self.interest_rate,
                installments: self.installments,
            },
            consortium: ConsortiumTerms {
                total_value: self.consortium_value,
                admin_fee: self.admin_fee,
                installments: self.consortium_installments,
            },
        }
    }

    fn policy(&self) -> NonFinitePolicy {
        if self.strict {
            NonFinitePolicy::Strict
        } else {
            NonFinitePolicy::ZeroFallback
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct WeightedScoreArgs {
    /// Criterion as NAME=WEIGHT (repeatable)
    #[arg(long = "criterion", value_parser = parse_criterion, required = true)]
    pub(crate) criteria: Vec<Criterion>,
    /// Option as NAME:CRIT=SCORE,CRIT=SCORE (repeatable)
    #[arg(long = "option", value_parser = parse_scored_option, required = true)]
    pub(crate) options: Vec<ScoredOption>,
}

fn demo_service(policy: NonFinitePolicy) -> DemoService {
    DecisionService::new(
        Arc::new(InMemoryDecisionHistory::default()),
        Arc::new(RuleBasedAdvisor),
        policy,
    )
}

pub(crate) fn run_financial_compare(args: FinancialCompareArgs) -> Result<(), AppError> {
    let service = demo_service(args.policy());
    let comparison = service.financial_totals(args.request())?;
    render_comparison(&comparison);
    Ok(())
}

pub(crate) fn run_weighted_score(args: WeightedScoreArgs) -> Result<(), AppError> {
    let service = demo_service(NonFinitePolicy::default());
    let report = service.score_weighted(WeightedScoreRequest {
        criteria: args.criteria,
        options: args.options,
    })?;
    render_weighted_report(&report);
    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let service = demo_service(NonFinitePolicy::Strict);

    println!("Decision support demo");
    println!("\nFinancial spending: car purchase");
    let request = FinancialSpendingAdviceRequest {
        context: "Buying a car for the family".to_string(),
        financing: FinancingTerms {
            total_value: 50_000.0,
            down_payment: 10_000.0,
            interest_rate: 1.5,
            installments: 48,
        },
        consortium: ConsortiumTerms {
            total_value: 50_000.0,
            admin_fee: 15.0,
            installments: 60,
        },
    };
    let comparison = service.financial_totals(FinancialTotalsRequest {
        financing: request.financing,
        consortium: request.consortium,
    })?;
    render_comparison(&comparison);

    let advice = service.advise_financial_spending(request.clone())?;
    println!("\n{}", advice.advice);

    if let Some(choice) = comparison.totals.cheaper() {
        service.save(DecisionDraft {
            context: request.context,
            details: DecisionDetails::FinancialSpending {
                options: FinancialOption::ordered()
                    .iter()
                    .map(|option| option.label().to_string())
                    .collect(),
                decision: choice.label().to_string(),
            },
        })?;
    }

    println!("\nWeighted analysis: choosing a car");
    let criteria = vec![
        Criterion::new("Price", 40),
        Criterion::new("Safety", 35),
        Criterion::new("Comfort", 25),
    ];
    let options = vec![
        ScoredOption::new("Hatchback")
            .with_score("Price", 9.0)
            .with_score("Safety", 6.0)
            .with_score("Comfort", 5.0),
        ScoredOption::new("Sedan")
            .with_score("Price", 7.0)
            .with_score("Safety", 8.0)
            .with_score("Comfort", 7.0),
        ScoredOption::new("SUV")
            .with_score("Price", 4.0)
            .with_score("Safety", 9.0)
            .with_score("Comfort", 9.0),
    ];
    let report = service.score_weighted(WeightedScoreRequest {
        criteria: criteria.clone(),
        options: options.clone(),
    })?;
    render_weighted_report(&report);

    if let Some(winner) = report.ranking.first() {
        service.save(DecisionDraft {
            context: "Choosing a car for the family".to_string(),
            details: DecisionDetails::WeightedAnalysis {
                criteria,
                options,
                decision: winner.name.clone(),
            },
        })?;
    }

    println!("\nDecision history (newest first)");
    for entry in service.history()? {
        println!(
            "- [{}] {} | {} | {}",
            entry.record.date.format("%Y-%m-%d %H:%M"),
            entry.kind_label,
            entry.record.context,
            entry.chosen.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

fn render_comparison(comparison: &FinancialComparison) {
    println!("Policy: {}", comparison.policy.label());
    println!(
        "- Financing: {} per month | {} total",
        format_amount(comparison.financing.monthly_payment),
        format_amount(comparison.financing.total_cost)
    );
    println!(
        "- Consortium: {} per month | {} total",
        format_amount(comparison.consortium.monthly_payment),
        format_amount(comparison.consortium.total_cost)
    );

    let totals = comparison.totals;
    match totals.cheaper() {
        Some(option) => println!(
            "{} is cheaper by {}",
            option.label(),
            format_amount((totals.financing_total - totals.consortium_total).abs())
        ),
        None => println!("Both options cost the same"),
    }
}

fn render_weighted_report(report: &WeightedScoreReport) {
    println!("Final scores:");
    for result in &report.results {
        println!("- {}: {:.2}", result.name, result.final_score);
    }
    println!("Ranking:");
    for (position, result) in report.ranking.iter().enumerate() {
        println!("  {}. {} ({:.2})", position + 1, result.name, result.final_score);
    }
    if let Some(warning) = &report.warning {
        println!("Warning: {warning}");
    }
}
