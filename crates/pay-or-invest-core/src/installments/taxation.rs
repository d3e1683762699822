use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Redemptions held for fewer days than this pay short-term withholding (IOF).
pub const WITHHOLDING_THRESHOLD_DAYS: u32 = 30;

/// Share of the earnings withheld per remaining day, scaled by `(30 - days) / 30`.
pub const WITHHOLDING_FACTOR: Rate = dec!(0.96);

/// Regressive income tax (IR) brackets: holding period up to and including
/// `max_days` pays `rate`.
pub const INCOME_TAX_BRACKETS: [(u32, Rate); 3] = [
    (180, dec!(0.225)),
    (360, dec!(0.20)),
    (720, dec!(0.175)),
];

/// Income tax rate for holding periods beyond the last bracket.
pub const LONG_TERM_INCOME_TAX_RATE: Rate = dec!(0.15);

/// Gross earnings split into the deductions applied on redemption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetEarnings {
    pub holding_days: u32,
    pub gross_earnings: Money,
    pub income_tax_rate: Rate,
    pub income_tax: Money,
    pub withholding: Money,
    pub net_earnings: Money,
}

/// Income tax rate on earnings held for `days` days.
pub fn income_tax_rate(days: u32) -> Rate {
    INCOME_TAX_BRACKETS
        .iter()
        .find(|(max_days, _)| days <= *max_days)
        .map(|(_, rate)| *rate)
        .unwrap_or(LONG_TERM_INCOME_TAX_RATE)
}

/// Short-term withholding on `gross` redeemed after `days` days.
///
/// Phases out linearly and is zero from day 30 on.
pub fn withholding(gross: Money, days: u32) -> Money {
    if days >= WITHHOLDING_THRESHOLD_DAYS {
        return Decimal::ZERO;
    }
    let threshold = Decimal::from(WITHHOLDING_THRESHOLD_DAYS);
    let remaining = threshold - Decimal::from(days);
    gross * remaining * WITHHOLDING_FACTOR / threshold
}

/// Convert gross earnings to net earnings.
///
/// Income tax and withholding are both computed on the same gross base and
/// subtracted: `gross * (1 - ir) - iof`.
pub fn net_earnings(gross: Money, days: u32) -> NetEarnings {
    let rate = income_tax_rate(days);
    let income_tax = gross * rate;
    let withheld = withholding(gross, days);

    NetEarnings {
        holding_days: days,
        gross_earnings: gross,
        income_tax_rate: rate,
        income_tax,
        withholding: withheld,
        net_earnings: gross - income_tax - withheld,
    }
}
