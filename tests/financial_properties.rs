use decision_ai::workflows::financial::{
    compare, compute_consortium_total, compute_financing_total, try_financing_total,
    ConsortiumTerms, FinancingTerms, NonFinitePolicy,
};
use decision_ai::workflows::weighted::{rank, score_options, Criterion, ScoredOption};
use proptest::prelude::*;

fn financing(total_value: f64, down_payment: f64, interest_rate: f64, installments: u32) -> FinancingTerms {
    FinancingTerms {
        total_value,
        down_payment,
        interest_rate,
        installments,
    }
}

fn consortium(total_value: f64, admin_fee: f64) -> ConsortiumTerms {
    ConsortiumTerms {
        total_value,
        admin_fee,
        installments: 60,
    }
}

#[test]
fn car_purchase_matches_price_table() {
    let terms = financing(50_000.0, 10_000.0, 1.5, 48);
    let rate: f64 = 0.015;
    let growth = (1.0 + rate).powi(48);
    let installment = 40_000.0 * rate * growth / (growth - 1.0);

    let total = compute_financing_total(&terms);

    assert!((total - (10_000.0 + installment * 48.0)).abs() < 1e-6);
    assert!((total - 66_400.0).abs() < 1.0);
}

#[test]
fn car_purchase_consortium_adds_fee() {
    assert!((compute_consortium_total(&consortium(50_000.0, 15.0)) - 57_500.0).abs() < 1e-9);
}

#[test]
fn two_criteria_scenario() {
    let criteria = [Criterion::new("Price", 60), Criterion::new("Safety", 40)];
    let options = [ScoredOption::new("Car A")
        .with_score("Price", 8.0)
        .with_score("Safety", 5.0)];

    let results = score_options(&criteria, &options);

    assert!((results[0].final_score - 6.8).abs() < 1e-9);
}

#[test]
fn overweighted_criteria_are_not_normalized() {
    let criteria = [
        Criterion::new("Price", 60),
        Criterion::new("Safety", 40),
        Criterion::new("Comfort", 10),
    ];
    let options = [ScoredOption::new("Car A")
        .with_score("Price", 10.0)
        .with_score("Safety", 10.0)
        .with_score("Comfort", 10.0)];

    let results = score_options(&criteria, &options);

    assert!((results[0].final_score - 11.0).abs() < 1e-9);
}

#[test]
fn overflow_is_distinguishable_only_in_strict_mode() {
    let terms = financing(50_000.0, 0.0, f64::MAX, 12);

    assert!(try_financing_total(&terms).is_err());
    assert_eq!(compute_financing_total(&terms), 0.0);

    let fees = consortium(50_000.0, 15.0);
    assert!(compare(&terms, &fees, NonFinitePolicy::Strict).is_err());
    let fallback = compare(&terms, &fees, NonFinitePolicy::ZeroFallback).expect("zero fallback");
    assert_eq!(fallback.totals.financing_total, 0.0);
}

proptest! {
    /// Without interest the total is the asset value, whatever else is set.
    #[test]
    fn zero_rate_total_is_total_value(
        total in 0.0f64..1e9,
        down in 0.0f64..1e9,
        installments in 1u32..600,
    ) {
        let terms = financing(total, down, 0.0, installments);
        prop_assert_eq!(compute_financing_total(&terms), total);
    }

    /// A down payment covering the asset is all that is paid.
    #[test]
    fn covering_down_payment_is_the_total(
        total in 0.0f64..1e6,
        extra in 0.0f64..1e6,
        rate in 0.01f64..10.0,
        installments in 1u32..600,
    ) {
        let terms = financing(total, total + extra, rate, installments);
        prop_assert_eq!(compute_financing_total(&terms), total + extra);
    }

    #[test]
    fn zero_fee_consortium_costs_its_value(total in 0.0f64..1e9) {
        prop_assert_eq!(compute_consortium_total(&consortium(total, 0.0)), total);
    }

    #[test]
    fn consortium_total_grows_with_fee(
        total in 0.0f64..1e9,
        low in 0.0f64..100.0,
        delta in 0.0f64..100.0,
    ) {
        let cheaper = compute_consortium_total(&consortium(total, low));
        let pricier = compute_consortium_total(&consortium(total, low + delta));
        prop_assert!(cheaper <= pricier);
    }

    #[test]
    fn zero_weights_score_zero(scores in prop::collection::vec(-100.0f64..100.0, 1..8)) {
        let criteria: Vec<_> = (0..scores.len())
            .map(|index| Criterion::new(format!("c{index}"), 0))
            .collect();
        let option = scores
            .iter()
            .enumerate()
            .fold(ScoredOption::new("Only"), |option, (index, score)| {
                option.with_score(format!("c{index}"), *score)
            });

        let results = score_options(&criteria, &[option]);
        prop_assert_eq!(results[0].final_score, 0.0);
    }

    #[test]
    fn full_weight_criterion_returns_its_score(score in -1e6f64..1e6) {
        let criteria = [Criterion::new("Only", 100)];
        let options = [ScoredOption::new("Pick").with_score("Only", score)];

        let results = score_options(&criteria, &options);
        prop_assert_eq!(results[0].final_score, score);
    }

    /// Scoring keeps input order; ranking is a reordering of the same results.
    #[test]
    fn scoring_preserves_option_order(scores in prop::collection::vec(0.0f64..10.0, 1..12)) {
        let criteria = [Criterion::new("Value", 100)];
        let options: Vec<_> = scores
            .iter()
            .enumerate()
            .map(|(index, score)| ScoredOption::new(format!("option-{index}")).with_score("Value", *score))
            .collect();

        let results = score_options(&criteria, &options);
        let names: Vec<_> = results.iter().map(|result| result.name.clone()).collect();
        let expected: Vec<_> = options.iter().map(|option| option.name.clone()).collect();
        prop_assert_eq!(names, expected);

        let ranked = rank(&results);
        prop_assert_eq!(ranked.len(), results.len());
        prop_assert!(ranked
            .windows(2)
            .all(|pair| pair[0].final_score >= pair[1].final_score));
    }
}
