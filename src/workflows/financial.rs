//! Financing versus consortium cost comparison.
//!
//! Financing follows the French (Price) amortization table: a fixed monthly
//! payment over `installments` periods after the down payment. A consortium
//! charges a flat administration fee on top of the asset value and accrues no
//! interest.

use serde::{Deserialize, Serialize};

const FINANCING_TOTAL: &str = "financing total";
const FINANCING_INSTALLMENT: &str = "financing installment";
const CONSORTIUM_TOTAL: &str = "consortium total";
const CONSORTIUM_INSTALLMENT: &str = "consortium installment";

/// Terms of a fixed-rate loan paid in equal installments after a down payment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingTerms {
    pub total_value: f64,
    pub down_payment: f64,
    /// Monthly interest rate in percent (`1.5` is 1.5% a month).
    pub interest_rate: f64,
    pub installments: u32,
}

/// Terms of a pooled-purchase consortium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsortiumTerms {
    pub total_value: f64,
    /// Administration fee in percent of the total value.
    pub admin_fee: f64,
    pub installments: u32,
}

/// The two options a financial spending decision chooses between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialOption {
    Financing,
    Consortium,
}

impl FinancialOption {
    pub const fn ordered() -> [Self; 2] {
        [Self::Financing, Self::Consortium]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Financing => "Financing",
            Self::Consortium => "Consortium",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|option| option.label().eq_ignore_ascii_case(value.trim()))
    }
}

/// Total cost of each option.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialTotals {
    pub financing_total: f64,
    pub consortium_total: f64,
}

impl FinancialTotals {
    /// Option with the lower total, `None` on a tie.
    pub fn cheaper(&self) -> Option<FinancialOption> {
        if self.financing_total < self.consortium_total {
            Some(FinancialOption::Financing)
        } else if self.consortium_total < self.financing_total {
            Some(FinancialOption::Consortium)
        } else {
            None
        }
    }
}

/// Total and monthly figures for a single option.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialQuote {
    pub total_cost: f64,
    pub monthly_payment: f64,
}

/// Result of comparing both options under a [`NonFinitePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialComparison {
    pub totals: FinancialTotals,
    pub financing: FinancialQuote,
    pub consortium: FinancialQuote,
    pub policy: NonFinitePolicy,
}

/// How a formula that overflows or yields NaN is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonFinitePolicy {
    /// Report a [`CalculationError`].
    #[default]
    Strict,
    /// Substitute `0.0`, matching the legacy calculator.
    ZeroFallback,
}

impl NonFinitePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "zero" | "zero_fallback" | "compat" => Some(Self::ZeroFallback),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::ZeroFallback => "zero",
        }
    }

    fn resolve(self, value: Result<f64, CalculationError>) -> Result<f64, CalculationError> {
        match self {
            Self::Strict => value,
            Self::ZeroFallback => Ok(value.unwrap_or(0.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CalculationError {
    #[error("{quantity} is not computable for the given terms")]
    NonFinite { quantity: &'static str },
}

fn finite(value: f64, quantity: &'static str) -> Result<f64, CalculationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalculationError::NonFinite { quantity })
    }
}

/// Fixed installment of a Price table: `P * r * (1+r)^n / ((1+r)^n - 1)`.
fn price_installment(principal: f64, monthly_rate: f64, installments: u32) -> f64 {
    let growth = (1.0 + monthly_rate).powf(f64::from(installments));
    principal * (monthly_rate * growth) / (growth - 1.0)
}

/// Total paid for a financing, or an error when the formula is not finite.
///
/// A zero interest rate returns the total value unchanged; the down payment is
/// not modelled separately in that case. When the down payment covers the whole
/// value, the total paid is the down payment itself.
pub fn try_financing_total(terms: &FinancingTerms) -> Result<f64, CalculationError> {
    if terms.interest_rate == 0.0 {
        return finite(terms.total_value, FINANCING_TOTAL);
    }

    let principal = terms.total_value - terms.down_payment;
    if principal <= 0.0 {
        return finite(terms.down_payment, FINANCING_TOTAL);
    }

    let installment = price_installment(principal, terms.interest_rate / 100.0, terms.installments);
    finite(
        terms.down_payment + installment * f64::from(terms.installments),
        FINANCING_TOTAL,
    )
}

/// Total paid for a consortium: the value plus the administration fee.
pub fn try_consortium_total(terms: &ConsortiumTerms) -> Result<f64, CalculationError> {
    finite(
        terms.total_value * (1.0 + terms.admin_fee / 100.0),
        CONSORTIUM_TOTAL,
    )
}

/// Legacy financing total: non-finite results collapse to `0.0`.
pub fn compute_financing_total(terms: &FinancingTerms) -> f64 {
    try_financing_total(terms).unwrap_or(0.0)
}

/// Legacy consortium total: non-finite results collapse to `0.0`.
pub fn compute_consortium_total(terms: &ConsortiumTerms) -> f64 {
    try_consortium_total(terms).unwrap_or(0.0)
}

/// Monthly installment of a financing after the down payment.
pub fn try_financing_installment(terms: &FinancingTerms) -> Result<f64, CalculationError> {
    let principal = terms.total_value - terms.down_payment;

    if terms.interest_rate == 0.0 {
        return finite(
            principal.max(0.0) / f64::from(terms.installments),
            FINANCING_INSTALLMENT,
        );
    }
    if principal <= 0.0 {
        return Ok(0.0);
    }

    finite(
        price_installment(principal, terms.interest_rate / 100.0, terms.installments),
        FINANCING_INSTALLMENT,
    )
}

/// Monthly installment of a consortium: the total spread evenly.
pub fn try_consortium_installment(terms: &ConsortiumTerms) -> Result<f64, CalculationError> {
    let total = try_consortium_total(terms)?;
    finite(
        total / f64::from(terms.installments),
        CONSORTIUM_INSTALLMENT,
    )
}

/// Compute totals and installments for both options.
pub fn compare(
    financing: &FinancingTerms,
    consortium: &ConsortiumTerms,
    policy: NonFinitePolicy,
) -> Result<FinancialComparison, CalculationError> {
    let financing_quote = FinancialQuote {
        total_cost: policy.resolve(try_financing_total(financing))?,
        monthly_payment: policy.resolve(try_financing_installment(financing))?,
    };
    let consortium_quote = FinancialQuote {
        total_cost: policy.resolve(try_consortium_total(consortium))?,
        monthly_payment: policy.resolve(try_consortium_installment(consortium))?,
    };

    Ok(FinancialComparison {
        totals: FinancialTotals {
            financing_total: financing_quote.total_cost,
            consortium_total: consortium_quote.total_cost,
        },
        financing: financing_quote,
        consortium: consortium_quote,
        policy,
    })
}

/// Render an amount with two decimals and comma thousand separators.
///
/// Non-finite values render as `n/a`. Currency symbols are left to the caller.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }

    let rendered = format!("{:.2}", value.abs());
    let (whole, cents) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && rendered != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}
