use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

use crate::error::PayOrInvestError;
use crate::installments::accrual::{AccrualParams, AccrualPeriod, AccrualStrategy, DAYS_PER_PERIOD};
use crate::installments::invoice_date::{resolve_invoice_date, rolled_over, whole_days_between};
use crate::installments::taxation::{
    INCOME_TAX_BRACKETS, LONG_TERM_INCOME_TAX_RATE, WITHHOLDING_FACTOR, WITHHOLDING_THRESHOLD_DAYS,
};
use crate::installments::validation::validate_purchase_input;
use crate::time_value::{daily_rate, BUSINESS_DAYS_PER_YEAR};
use crate::types::{round_cents, with_metadata, ComputationOutput, Money, Rate};
use crate::PayOrInvestResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

fn default_rate_share() -> Rate {
    dec!(1)
}

/// A purchase that can be paid upfront at a discount or split into installments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseInput {
    pub total_value: Money,
    pub installments: u32,
    /// Discount for paying upfront, as a fraction of `total_value`
    pub discount_rate: Rate,
    /// Annual reference (CDI-equivalent) rate
    pub annual_reference_rate: Rate,
    /// Portion of the reference rate the investment actually earns
    #[serde(default = "default_rate_share")]
    pub reference_rate_share: Rate,
    /// Day of month the card invoice closes
    pub invoice_day: u32,
    pub strategy: AccrualStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    PayInFull,
    PayInInstallments,
}

impl Recommendation {
    /// Sentence shown to the buyer.
    pub fn message(&self, installments: u32) -> String {
        match self {
            Recommendation::PayInFull => "Paying in full is the better option.".to_string(),
            Recommendation::PayInInstallments => {
                format!("Paying in {installments} installments is the better option.")
            }
        }
    }
}

/// Comparison figures rounded to cents for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonBreakdown {
    pub discount_value: Money,
    pub total_earnings: Money,
    pub absolute_difference: Money,
}

/// Upfront discount weighed against investment earnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub cash_value: Money,
    pub discount_value: Money,
    pub total_earnings: Money,
    /// `discount_value - total_earnings`; positive favours paying in full
    pub difference: Money,
    pub recommendation: Recommendation,
    pub breakdown: ComparisonBreakdown,
    pub formatted_breakdown: String,
}

/// Full pipeline output: the comparison plus the accrual that fed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAnalysis {
    #[serde(flatten)]
    pub comparison: ComparisonResult,
    pub recommendation_message: String,
    pub strategy: AccrualStrategy,
    pub as_of: NaiveDate,
    pub invoice_date: NaiveDate,
    pub days_to_invoice: i64,
    pub daily_rate: Rate,
    pub installment_value: Money,
    pub total_gross_earnings: Money,
    pub schedule: Vec<AccrualPeriod>,
}

// ---------------------------------------------------------------------------
// Comparator
// ---------------------------------------------------------------------------

/// Weigh the upfront discount against `total_earnings`.
///
/// A difference of exactly zero recommends installments.
pub fn compare_against_discount(
    total_value: Money,
    discount_rate: Rate,
    total_earnings: Money,
) -> ComparisonResult {
    let cash_value = total_value * (Decimal::ONE - discount_rate);
    let discount_value = total_value - cash_value;
    let difference = discount_value - total_earnings;

    let recommendation = if difference > Decimal::ZERO {
        Recommendation::PayInFull
    } else {
        Recommendation::PayInInstallments
    };

    let breakdown = ComparisonBreakdown {
        discount_value: round_cents(discount_value),
        total_earnings: round_cents(total_earnings),
        absolute_difference: round_cents(difference.abs()),
    };

    let formatted_breakdown = format!(
        "Upfront discount: {:.2}\nTotal investment earnings: {:.2}\nDifference between discount and earnings: {:.2}",
        breakdown.discount_value, breakdown.total_earnings, breakdown.absolute_difference,
    );

    ComparisonResult {
        cash_value,
        discount_value,
        total_earnings,
        difference,
        recommendation,
        breakdown,
        formatted_breakdown,
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Decide between paying `input.total_value` upfront at a discount or in
/// installments while the money stays invested.
///
/// `as_of` is the calculation date; the next invoice date, the first accrual
/// period and the schedule dates are all derived from it.
pub fn compare_payment_options(
    input: &PurchaseInput,
    as_of: NaiveDate,
) -> PayOrInvestResult<ComputationOutput<PaymentAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_purchase_input(input)?;

    let invoice_date = resolve_invoice_date(as_of, input.invoice_day)?;
    if rolled_over(invoice_date, input.invoice_day) {
        warnings.push(format!(
            "Invoice day {} does not exist in the billing month; invoice date rolled over to {}",
            input.invoice_day, invoice_date
        ));
    }

    let rate = daily_rate(input.annual_reference_rate, input.reference_rate_share)?;

    let params = AccrualParams {
        principal: input.total_value,
        installments: input.installments,
        daily_rate: rate,
        as_of,
        invoice_date,
    };
    let outcome = input.strategy.compute_total_earnings(&params)?;

    for period in &outcome.periods {
        if period.withholding > Decimal::ZERO {
            warnings.push(format!(
                "Period {} is held {} days; short-term withholding of {:.2} applies",
                period.index + 1,
                period.days,
                round_cents(period.withholding)
            ));
        }
        if period.net_earnings < Decimal::ZERO {
            warnings.push(format!(
                "Period {} nets negative earnings ({:.2}) after tax and withholding",
                period.index + 1,
                round_cents(period.net_earnings)
            ));
        }
    }

    let comparison =
        compare_against_discount(input.total_value, input.discount_rate, outcome.total_net_earnings);
    if comparison.difference.is_zero() {
        warnings.push(
            "Discount and earnings are exactly equal; installments recommended by convention"
                .to_string(),
        );
    }

    let installment_value = input
        .total_value
        .checked_div(Decimal::from(input.installments))
        .ok_or_else(|| PayOrInvestError::DivisionByZero {
            context: "installment value".into(),
        })?;

    info!(
        strategy = ?input.strategy,
        recommendation = ?comparison.recommendation,
        difference = %comparison.difference,
        "payment comparison complete"
    );

    let analysis = PaymentAnalysis {
        recommendation_message: comparison.recommendation.message(input.installments),
        comparison,
        strategy: input.strategy,
        as_of,
        invoice_date,
        days_to_invoice: whole_days_between(as_of, invoice_date),
        daily_rate: rate,
        installment_value,
        total_gross_earnings: outcome.total_gross_earnings,
        schedule: outcome.periods,
    };

    let brackets: Vec<serde_json::Value> = INCOME_TAX_BRACKETS
        .iter()
        .map(|(max_days, rate)| serde_json::json!({ "max_days": max_days, "rate": rate.to_string() }))
        .collect();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!(
            "Upfront discount vs. invested installments ({}): daily rate from annual \
             reference rate over business days, compound daily accrual, regressive income \
             tax and short-term withholding on gross earnings",
            input.strategy.label()
        ),
        &serde_json::json!({
            "total_value": input.total_value.to_string(),
            "installments": input.installments,
            "discount_rate": input.discount_rate.to_string(),
            "annual_reference_rate": input.annual_reference_rate.to_string(),
            "reference_rate_share": input.reference_rate_share.to_string(),
            "invoice_day": input.invoice_day,
            "as_of": as_of.to_string(),
            "business_days_per_year": BUSINESS_DAYS_PER_YEAR,
            "days_per_period": DAYS_PER_PERIOD,
            "income_tax_brackets": brackets,
            "long_term_income_tax_rate": LONG_TERM_INCOME_TAX_RATE.to_string(),
            "withholding_threshold_days": WITHHOLDING_THRESHOLD_DAYS,
            "withholding_factor": WITHHOLDING_FACTOR.to_string(),
        }),
        warnings,
        elapsed,
        analysis,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
