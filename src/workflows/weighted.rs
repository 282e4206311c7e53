//! Weighted criteria scoring.
//!
//! Each criterion carries an integer weight in percent. An option's final score
//! is the sum of its per-criterion scores scaled by those weights. Weights are
//! expected to add up to 100, but the scorer never normalizes or rejects other
//! totals; [`WeightAudit`] reports the mismatch so callers can warn about it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight total a balanced decision adds up to.
pub const WEIGHT_TARGET: u32 = 100;

/// Named evaluation dimension with a relative importance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    /// Importance in percent, `0..=100`.
    pub weight: u8,
}

impl Criterion {
    pub fn new(name: impl Into<String>, weight: u8) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }

    fn fraction(&self) -> f64 {
        f64::from(self.weight) / 100.0
    }
}

/// Option under evaluation with its score for each criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredOption {
    pub name: String,
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,
}

impl ScoredOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scores: BTreeMap::new(),
        }
    }

    pub fn with_score(mut self, criterion: impl Into<String>, score: f64) -> Self {
        self.scores.insert(criterion.into(), score);
        self
    }

    /// Score for a criterion; unscored criteria count as zero.
    pub fn score_for(&self, criterion: &str) -> f64 {
        self.scores.get(criterion).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedResult {
    pub name: String,
    pub final_score: f64,
}

/// Score every option against the criteria, preserving the option order.
pub fn score_options(criteria: &[Criterion], options: &[ScoredOption]) -> Vec<WeightedResult> {
    options
        .iter()
        .map(|option| WeightedResult {
            name: option.name.clone(),
            final_score: criteria
                .iter()
                .map(|criterion| option.score_for(&criterion.name) * criterion.fraction())
                .sum(),
        })
        .collect()
}

/// Results ordered from highest to lowest score. Ties keep their input order
/// and NaN scores sort last.
pub fn rank(results: &[WeightedResult]) -> Vec<WeightedResult> {
    let mut ranked = results.to_vec();
    ranked.sort_by(|left, right| {
        left.final_score
            .is_nan()
            .cmp(&right.final_score.is_nan())
            .then_with(|| right.final_score.total_cmp(&left.final_score))
    });
    ranked
}

/// Advisory check of the weight total against [`WEIGHT_TARGET`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightAudit {
    pub total_weight: u32,
    pub balanced: bool,
}

impl WeightAudit {
    pub fn of(criteria: &[Criterion]) -> Self {
        let total_weight = criteria
            .iter()
            .map(|criterion| u32::from(criterion.weight))
            .sum();
        Self {
            total_weight,
            balanced: total_weight == WEIGHT_TARGET,
        }
    }

    /// Weight still available before reaching the target, zero once exceeded.
    pub fn remaining(&self) -> u32 {
        WEIGHT_TARGET.saturating_sub(self.total_weight)
    }

    pub fn warning(&self) -> Option<String> {
        if self.balanced {
            None
        } else {
            Some(format!(
                "criteria weights add up to {}% instead of {WEIGHT_TARGET}%",
                self.total_weight
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car_criteria() -> Vec<Criterion> {
        vec![Criterion::new("Price", 60), Criterion::new("Safety", 40)]
    }

    #[test]
    fn weighted_sum_uses_percent_weights() {
        let options = vec![ScoredOption::new("Sedan")
            .with_score("Price", 8.0)
            .with_score("Safety", 5.0)];

        let results = score_options(&car_criteria(), &options);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Sedan");
        assert!((results[0].final_score - 6.8).abs() < 1e-9);
    }

    #[test]
    fn missing_scores_and_unknown_criteria_contribute_nothing() {
        let options = vec![ScoredOption::new("Hatch")
            .with_score("Price", 10.0)
            .with_score("Colour", 99.0)];

        let results = score_options(&car_criteria(), &options);

        assert!((results[0].final_score - 6.0).abs() < 1e-9);
    }

    #[test]
    fn mismatched_weights_are_not_normalized() {
        let criteria = vec![Criterion::new("Price", 70), Criterion::new("Safety", 40)];
        let options = vec![ScoredOption::new("Van")
            .with_score("Price", 10.0)
            .with_score("Safety", 10.0)];

        let results = score_options(&criteria, &options);
        let audit = WeightAudit::of(&criteria);

        assert!((results[0].final_score - 11.0).abs() < 1e-9);
        assert_eq!(audit.total_weight, 110);
        assert!(!audit.balanced);
        assert_eq!(audit.remaining(), 0);
        assert!(audit.warning().expect("warns").contains("110%"));
    }

    #[test]
    fn rank_sorts_descending_and_keeps_ties_stable() {
        let results = vec![
            WeightedResult {
                name: "A".to_string(),
                final_score: 2.0,
            },
            WeightedResult {
                name: "B".to_string(),
                final_score: 5.0,
            },
            WeightedResult {
                name: "C".to_string(),
                final_score: 2.0,
            },
        ];

        let ranked: Vec<_> = rank(&results)
            .into_iter()
            .map(|result| result.name)
            .collect();

        assert_eq!(ranked, vec!["B", "A", "C"]);
        assert_eq!(results[0].name, "A", "input order untouched");
    }

    #[test]
    fn rank_puts_nan_scores_last() {
        let result = |name: &str, final_score: f64| WeightedResult {
            name: name.to_string(),
            final_score,
        };
        let results = vec![
            result("A", 1.0),
            result("B", f64::NAN),
            result("C", 3.0),
            result("D", f64::NEG_INFINITY),
        ];

        let ranked: Vec<_> = rank(&results)
            .into_iter()
            .map(|result| result.name)
            .collect();

        assert_eq!(ranked, vec!["C", "A", "D", "B"]);
    }

    #[test]
    fn balanced_audit_has_no_warning() {
        let audit = WeightAudit::of(&car_criteria());
        assert!(audit.balanced);
        assert_eq!(audit.remaining(), 0);
        assert!(audit.warning().is_none());
        assert_eq!(WeightAudit::of(&[]).remaining(), 100);
    }
}
