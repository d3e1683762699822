use chrono::{Datelike, Days, Months, NaiveDate};

use crate::error::PayOrInvestError;
use crate::PayOrInvestResult;

/// Highest day of month an invoice can be configured for.
pub const MAX_INVOICE_DAY: u32 = 31;

/// Resolve the next invoice (billing-cycle) date strictly after `as_of`.
///
/// The candidate is built as the first day of the `as_of` month plus
/// `invoice_day - 1` days. A candidate on or before `as_of` is rebuilt from
/// the first day of the following month. Days beyond the month length
/// overflow into the next month: invoice day 31 in February lands on 3 March
/// (2 March in leap years).
pub fn resolve_invoice_date(as_of: NaiveDate, invoice_day: u32) -> PayOrInvestResult<NaiveDate> {
    if invoice_day == 0 || invoice_day > MAX_INVOICE_DAY {
        return Err(PayOrInvestError::DateError(format!(
            "Invoice day must be between 1 and {MAX_INVOICE_DAY}, got {invoice_day}"
        )));
    }

    let month_start = as_of.with_day(1).ok_or_else(|| {
        PayOrInvestError::DateError(format!("Cannot find start of month for {as_of}"))
    })?;

    let candidate = day_of_month(month_start, invoice_day)?;
    if candidate > as_of {
        return Ok(candidate);
    }

    let next_month_start = month_start
        .checked_add_months(Months::new(1))
        .ok_or_else(|| PayOrInvestError::DateError(format!("Month after {as_of} is out of range")))?;

    day_of_month(next_month_start, invoice_day)
}

/// True when `invoice_day` does not exist in the month the resolved date was
/// meant to fall in, i.e. the date rolled into the following month.
pub fn rolled_over(resolved: NaiveDate, invoice_day: u32) -> bool {
    resolved.day() != invoice_day
}

/// Whole days from `from` to `to` (negative when `to` is earlier).
///
/// Both ends are calendar dates, so there is no time-of-day fraction to
/// floor away: a run at any hour of `from` counts the full calendar gap.
pub fn whole_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

fn day_of_month(month_start: NaiveDate, day: u32) -> PayOrInvestResult<NaiveDate> {
    month_start
        .checked_add_days(Days::new(u64::from(day - 1)))
        .ok_or_else(|| {
            PayOrInvestError::DateError(format!("Day {day} after {month_start} is out of range"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_before_invoice_day_stays_in_current_month() {
        let resolved = resolve_invoice_date(date(2024, 3, 5), 10).unwrap();
        assert_eq!(resolved, date(2024, 3, 10));
    }

    #[test]
    fn test_on_invoice_day_moves_to_next_month() {
        let resolved = resolve_invoice_date(date(2024, 3, 10), 10).unwrap();
        assert_eq!(resolved, date(2024, 4, 10));
    }

    #[test]
    fn test_after_invoice_day_moves_to_next_month() {
        let resolved = resolve_invoice_date(date(2024, 3, 15), 10).unwrap();
        assert_eq!(resolved, date(2024, 4, 10));
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let resolved = resolve_invoice_date(date(2024, 12, 20), 5).unwrap();
        assert_eq!(resolved, date(2025, 1, 5));
    }

    #[test]
    fn test_day_31_in_february_overflows() {
        assert_eq!(resolve_invoice_date(date(2023, 2, 10), 31).unwrap(), date(2023, 3, 3));
        assert_eq!(resolve_invoice_date(date(2024, 2, 10), 31).unwrap(), date(2024, 3, 2));
    }

    #[test]
    fn test_end_of_january_rolls_past_february() {
        // Candidate 31 Jan is not after as_of; "31 February" overflows to 2 March.
        let resolved = resolve_invoice_date(date(2024, 1, 31), 31).unwrap();
        assert_eq!(resolved, date(2024, 3, 2));
        assert!(rolled_over(resolved, 31));
    }

    #[test]
    fn test_day_31_in_thirty_day_month() {
        let resolved = resolve_invoice_date(date(2024, 4, 5), 31).unwrap();
        assert_eq!(resolved, date(2024, 5, 1));
        assert!(!rolled_over(resolve_invoice_date(date(2024, 5, 5), 31).unwrap(), 31));
    }

    #[test]
    fn test_invalid_invoice_day() {
        assert!(matches!(
            resolve_invoice_date(date(2024, 3, 5), 0),
            Err(PayOrInvestError::DateError(_))
        ));
        assert!(matches!(
            resolve_invoice_date(date(2024, 3, 5), 32),
            Err(PayOrInvestError::DateError(_))
        ));
    }

    #[test]
    fn test_whole_days_between() {
        assert_eq!(whole_days_between(date(2024, 3, 5), date(2024, 3, 10)), 5);
        assert_eq!(whole_days_between(date(2024, 2, 28), date(2024, 3, 1)), 2);
        assert_eq!(whole_days_between(date(2024, 3, 10), date(2024, 3, 5)), -5);
    }
}
