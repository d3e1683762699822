use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PayOrInvestError;
use crate::installments::invoice_date::whole_days_between;
use crate::installments::taxation::net_earnings;
use crate::time_value::earnings;
use crate::types::{Money, Rate};
use crate::PayOrInvestResult;

/// Fixed length of every installment period after the first.
pub const DAYS_PER_PERIOD: u32 = 30;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the capital kept by paying in installments is invested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccrualStrategy {
    /// Each installment is paid out of the invested balance; the remainder
    /// keeps earning.
    DecreasingBalance,
    /// The whole principal stays invested for `installments * 30` days while
    /// installments are paid from other income.
    LumpSum,
}

/// Inputs shared by both strategies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualParams {
    pub principal: Money,
    pub installments: u32,
    pub daily_rate: Rate,
    pub as_of: NaiveDate,
    pub invoice_date: NaiveDate,
}

/// One simulated investment period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualPeriod {
    pub index: u32,
    pub start_date: NaiveDate,
    pub days: u32,
    pub opening_principal: Money,
    pub gross_earnings: Money,
    pub income_tax: Money,
    pub withholding: Money,
    pub net_earnings: Money,
    pub installment_paid: Money,
    pub closing_principal: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualOutcome {
    pub strategy: AccrualStrategy,
    pub daily_rate: Rate,
    pub periods: Vec<AccrualPeriod>,
    pub total_gross_earnings: Money,
    pub total_net_earnings: Money,
}

impl AccrualStrategy {
    /// Total net earnings from investing the principal instead of paying upfront.
    pub fn compute_total_earnings(&self, params: &AccrualParams) -> PayOrInvestResult<AccrualOutcome> {
        match self {
            AccrualStrategy::DecreasingBalance => decreasing_balance(params),
            AccrualStrategy::LumpSum => lump_sum(params),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccrualStrategy::DecreasingBalance => "decreasing balance",
            AccrualStrategy::LumpSum => "lump sum",
        }
    }
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Running state carried across installment periods.
struct Balance {
    principal: Money,
    total_gross: Money,
    total_net: Money,
    periods: Vec<AccrualPeriod>,
}

fn decreasing_balance(params: &AccrualParams) -> PayOrInvestResult<AccrualOutcome> {
    let installment_value = params
        .principal
        .checked_div(Decimal::from(params.installments))
        .ok_or_else(|| PayOrInvestError::DivisionByZero {
            context: "installment value (installments = 0)".into(),
        })?;

    let days_to_invoice = whole_days_between(params.as_of, params.invoice_date);
    let first_period_days = u32::try_from(days_to_invoice).map_err(|_| {
        PayOrInvestError::DateError(format!(
            "Invoice date {} is before {}",
            params.invoice_date, params.as_of
        ))
    })?;

    let initial = Balance {
        principal: params.principal,
        total_gross: Decimal::ZERO,
        total_net: Decimal::ZERO,
        periods: Vec::new(),
    };

    let balance = (0..params.installments).try_fold(initial, |mut acc, index| {
        let days = if index == 0 {
            first_period_days
        } else {
            DAYS_PER_PERIOD
        };

        let start_date = period_start(params.as_of, index)?;
        let gross = earnings(acc.principal, params.daily_rate, days)?;
        let net = net_earnings(gross, days);
        let closing = acc.principal + net.net_earnings - installment_value;

        debug!(
            index,
            days,
            opening = %acc.principal,
            gross = %gross,
            net = %net.net_earnings,
            closing = %closing,
            "decreasing balance period"
        );

        acc.periods.push(AccrualPeriod {
            index,
            start_date,
            days,
            opening_principal: acc.principal,
            gross_earnings: gross,
            income_tax: net.income_tax,
            withholding: net.withholding,
            net_earnings: net.net_earnings,
            installment_paid: installment_value,
            closing_principal: closing,
        });

        acc.principal = closing;
        acc.total_gross += gross;
        acc.total_net += net.net_earnings;

        Ok::<Balance, PayOrInvestError>(acc)
    })?;

    Ok(AccrualOutcome {
        strategy: AccrualStrategy::DecreasingBalance,
        daily_rate: params.daily_rate,
        periods: balance.periods,
        total_gross_earnings: balance.total_gross,
        total_net_earnings: balance.total_net,
    })
}

/// Start of period `index`, counted in calendar months from `as_of` so a
/// clamped short month (31 Jan -> 29 Feb) does not drag later periods back.
fn period_start(as_of: NaiveDate, index: u32) -> PayOrInvestResult<NaiveDate> {
    as_of.checked_add_months(Months::new(index)).ok_or_else(|| {
        PayOrInvestError::DateError(format!("{index} months after {as_of} is out of range"))
    })
}

fn lump_sum(params: &AccrualParams) -> PayOrInvestResult<AccrualOutcome> {
    let days = params
        .installments
        .checked_mul(DAYS_PER_PERIOD)
        .ok_or_else(|| PayOrInvestError::InvalidInput {
            field: "installments".into(),
            reason: "Holding period in days overflows".into(),
        })?;

    let gross = earnings(params.principal, params.daily_rate, days).map_err(|_| {
        PayOrInvestError::InvalidInput {
            field: "installments".into(),
            reason: format!("Earnings over {days} days exceed the decimal range"),
        }
    })?;
    let net = net_earnings(gross, days);

    debug!(days, gross = %gross, net = %net.net_earnings, "lump sum period");

    let period = AccrualPeriod {
        index: 0,
        start_date: params.as_of,
        days,
        opening_principal: params.principal,
        gross_earnings: gross,
        income_tax: net.income_tax,
        withholding: net.withholding,
        net_earnings: net.net_earnings,
        installment_paid: Decimal::ZERO,
        closing_principal: params.principal + net.net_earnings,
    };

    Ok(AccrualOutcome {
        strategy: AccrualStrategy::LumpSum,
        daily_rate: params.daily_rate,
        periods: vec![period],
        total_gross_earnings: gross,
        total_net_earnings: net.net_earnings,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_value::daily_rate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_params(installments: u32) -> AccrualParams {
        AccrualParams {
            principal: dec!(1000),
            installments,
            daily_rate: daily_rate(dec!(0.12), dec!(1)).unwrap(),
            as_of: date(2024, 3, 5),
            invoice_date: date(2024, 3, 10),
        }
    }

    #[test]
    fn test_lump_sum_single_period_over_full_term() {
        let params = sample_params(3);
        let outcome = AccrualStrategy::LumpSum.compute_total_earnings(&params).unwrap();

        let gross = earnings(dec!(1000), params.daily_rate, 90).unwrap();
        let expected = net_earnings(gross, 90).net_earnings;

        assert_eq!(outcome.periods.len(), 1);
        assert_eq!(outcome.periods[0].days, 90);
        assert_eq!(outcome.total_net_earnings, expected);
        // ≈ 41.30 gross, 22.5% IR, no IOF
        assert!((outcome.total_gross_earnings - dec!(41.3048)).abs() < dec!(0.001));
        assert!((outcome.total_net_earnings - dec!(32.0112)).abs() < dec!(0.001));
    }

    #[test]
    fn test_lump_sum_overflowing_term_is_error() {
        // 300,000 days at ~0.045% a day is far past the decimal range
        let err = AccrualStrategy::LumpSum
            .compute_total_earnings(&sample_params(10_000))
            .unwrap_err();
        match err {
            PayOrInvestError::InvalidInput { field, .. } => assert_eq!(field, "installments"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_lump_sum_ignores_invoice_date() {
        let mut early = sample_params(6);
        let mut late = sample_params(6);
        early.invoice_date = date(2024, 3, 6);
        late.invoice_date = date(2024, 4, 4);

        let a = AccrualStrategy::LumpSum.compute_total_earnings(&early).unwrap();
        let b = AccrualStrategy::LumpSum.compute_total_earnings(&late).unwrap();
        assert_eq!(a.total_net_earnings, b.total_net_earnings);
    }

    #[test]
    fn test_decreasing_balance_single_installment_uses_days_to_invoice() {
        let params = sample_params(1);
        let outcome = AccrualStrategy::DecreasingBalance
            .compute_total_earnings(&params)
            .unwrap();

        let gross = earnings(dec!(1000), params.daily_rate, 5).unwrap();
        let expected = net_earnings(gross, 5).net_earnings;

        assert_eq!(outcome.periods.len(), 1);
        assert_eq!(outcome.periods[0].days, 5);
        assert_eq!(outcome.total_net_earnings, expected);
    }

    #[test]
    fn test_decreasing_balance_three_installments() {
        let outcome = AccrualStrategy::DecreasingBalance
            .compute_total_earnings(&sample_params(3))
            .unwrap();

        let days: Vec<u32> = outcome.periods.iter().map(|p| p.days).collect();
        assert_eq!(days, vec![5, 30, 30]);

        // First period is withholding-heavy and nets slightly negative
        assert!(outcome.periods[0].net_earnings < Decimal::ZERO);
        assert!(outcome.periods[0].withholding > Decimal::ZERO);
        assert_eq!(outcome.periods[1].withholding, Decimal::ZERO);

        assert!((outcome.total_net_earnings - dec!(10.5432)).abs() < dec!(0.001));
    }

    #[test]
    fn test_decreasing_balance_principal_threads_through_periods() {
        let outcome = AccrualStrategy::DecreasingBalance
            .compute_total_earnings(&sample_params(4))
            .unwrap();

        for pair in outcome.periods.windows(2) {
            assert_eq!(pair[0].closing_principal, pair[1].opening_principal);
        }
        let first = &outcome.periods[0];
        assert_eq!(
            first.closing_principal,
            first.opening_principal + first.net_earnings - first.installment_paid
        );
        assert_eq!(first.installment_paid, dec!(250));

        // Every installment is paid, leaving only the accumulated earnings
        let last = outcome.periods.last().unwrap();
        assert!((last.closing_principal - outcome.total_net_earnings).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_decreasing_balance_start_dates_anchor_to_as_of() {
        let mut params = sample_params(3);
        params.as_of = date(2024, 1, 31);
        params.invoice_date = date(2024, 2, 10);
        let outcome = AccrualStrategy::DecreasingBalance
            .compute_total_earnings(&params)
            .unwrap();

        let starts: Vec<NaiveDate> = outcome.periods.iter().map(|p| p.start_date).collect();
        // February clamps to the 29th; March returns to the 31st
        assert_eq!(starts, vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]);
        // Day counts stay on the 30-day convention regardless of month length
        assert_eq!(outcome.periods[1].days, 30);
        assert_eq!(outcome.periods[2].days, 30);
    }

    #[test]
    fn test_decreasing_balance_zero_installments_is_division_by_zero() {
        let err = AccrualStrategy::DecreasingBalance
            .compute_total_earnings(&sample_params(0))
            .unwrap_err();
        assert!(matches!(err, PayOrInvestError::DivisionByZero { .. }));
    }

    #[test]
    fn test_decreasing_balance_rejects_past_invoice_date() {
        let mut params = sample_params(2);
        params.invoice_date = date(2024, 3, 1);
        let err = AccrualStrategy::DecreasingBalance
            .compute_total_earnings(&params)
            .unwrap_err();
        assert!(matches!(err, PayOrInvestError::DateError(_)));
    }
}
