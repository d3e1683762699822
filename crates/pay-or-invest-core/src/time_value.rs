use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::PayOrInvestError;
use crate::types::{Money, Rate};
use crate::PayOrInvestResult;

/// Business days per year used to de-annualise the reference rate.
pub const BUSINESS_DAYS_PER_YEAR: u32 = 252;

/// Daily rate equivalent to `annual_rate * rate_share` compounded over
/// 252 business days: `(1 + annual_rate * rate_share)^(1/252) - 1`.
pub fn daily_rate(annual_rate: Rate, rate_share: Rate) -> PayOrInvestResult<Rate> {
    let effective_annual = annual_rate * rate_share;
    let growth = Decimal::ONE + effective_annual;
    if growth <= Decimal::ZERO {
        return Err(PayOrInvestError::InvalidInput {
            field: "annual_reference_rate".into(),
            reason: "Effective annual rate must be greater than -100%".into(),
        });
    }

    let exponent = Decimal::ONE / Decimal::from(BUSINESS_DAYS_PER_YEAR);
    let daily_growth = growth.checked_powd(exponent).ok_or_else(|| {
        PayOrInvestError::InvalidInput {
            field: "annual_reference_rate".into(),
            reason: format!("Cannot de-annualise growth factor {growth}"),
        }
    })?;

    Ok(daily_growth - Decimal::ONE)
}

/// `(1 + rate)^periods` by iterative multiplication (avoids powd precision drift
/// on integer exponents). Fails once the factor leaves the decimal range.
pub fn compound_factor(rate: Rate, periods: u32) -> PayOrInvestResult<Decimal> {
    let growth = Decimal::ONE + rate;
    (0..periods).try_fold(Decimal::ONE, |factor, _| {
        factor
            .checked_mul(growth)
            .ok_or_else(|| growth_overflow(rate, periods))
    })
}

/// Gross earnings of `principal` compounded daily for `days` days.
///
/// `principal * (1 + daily_rate)^days - principal`; zero days earn nothing.
pub fn earnings(principal: Money, daily_rate: Rate, days: u32) -> PayOrInvestResult<Money> {
    let factor = compound_factor(daily_rate, days)?;
    let grown = principal
        .checked_mul(factor)
        .ok_or_else(|| growth_overflow(daily_rate, days))?;
    Ok(grown - principal)
}

fn growth_overflow(rate: Rate, periods: u32) -> PayOrInvestError {
    PayOrInvestError::InvalidInput {
        field: "annual_reference_rate".into(),
        reason: format!("Compounding {rate} over {periods} days exceeds the decimal range"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_daily_rate_twelve_percent() {
        let rate = daily_rate(dec!(0.12), dec!(1)).unwrap();
        // 1.12^(1/252) - 1 ≈ 0.000449818
        assert!((rate - dec!(0.000449818)).abs() < dec!(0.000000001));
    }

    #[test]
    fn test_daily_rate_compounds_back_to_annual() {
        let rate = daily_rate(dec!(0.12), dec!(1)).unwrap();
        let annual = compound_factor(rate, BUSINESS_DAYS_PER_YEAR).unwrap() - Decimal::ONE;
        assert!((annual - dec!(0.12)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_daily_rate_applies_share() {
        let full = daily_rate(dec!(0.10), dec!(1)).unwrap();
        let half = daily_rate(dec!(0.20), dec!(0.5)).unwrap();
        assert!((full - half).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_daily_rate_zero() {
        let rate = daily_rate(dec!(0), dec!(1)).unwrap();
        assert!(rate.abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_daily_rate_rejects_total_loss() {
        let err = daily_rate(dec!(-1), dec!(1)).unwrap_err();
        assert!(matches!(err, PayOrInvestError::InvalidInput { .. }));
    }

    #[test]
    fn test_earnings_zero_days_is_zero() {
        assert_eq!(earnings(dec!(12345.67), dec!(0.0005), 0).unwrap(), Decimal::ZERO);
        assert_eq!(earnings(dec!(0), dec!(0.0005), 0).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_earnings_simple_compounding() {
        // 100 at 10% per period for 2 periods = 121 - 100
        assert_eq!(earnings(dec!(100), dec!(0.1), 2).unwrap(), dec!(21));
    }

    #[test]
    fn test_compound_factor_zero_periods() {
        assert_eq!(compound_factor(dec!(0.3), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_compound_factor_overflow_is_error() {
        // 2^100 is past the 96-bit mantissa
        let err = compound_factor(dec!(1), 100).unwrap_err();
        assert!(matches!(err, PayOrInvestError::InvalidInput { .. }));
    }

    #[test]
    fn test_earnings_principal_overflow_is_error() {
        // factor 2^60 fits, principal * factor does not
        let err = earnings(dec!(1000000000000), dec!(1), 60).unwrap_err();
        assert!(matches!(err, PayOrInvestError::InvalidInput { .. }));
    }
}
