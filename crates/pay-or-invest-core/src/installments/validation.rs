use rust_decimal::Decimal;

use crate::error::PayOrInvestError;
use crate::installments::comparison::PurchaseInput;
use crate::installments::invoice_date::MAX_INVOICE_DAY;
use crate::PayOrInvestResult;

/// Reject purchase inputs the accrual pipeline cannot price.
///
/// The pipeline stages themselves assume valid values; this is the single
/// gate front ends run before invoking the engine.
pub fn validate_purchase_input(input: &PurchaseInput) -> PayOrInvestResult<()> {
    if input.total_value <= Decimal::ZERO {
        return Err(PayOrInvestError::InvalidInput {
            field: "total_value".into(),
            reason: "Total purchase value must be positive".into(),
        });
    }
    if input.installments == 0 {
        return Err(PayOrInvestError::InvalidInput {
            field: "installments".into(),
            reason: "At least one installment is required".into(),
        });
    }
    if input.discount_rate < Decimal::ZERO || input.discount_rate >= Decimal::ONE {
        return Err(PayOrInvestError::InvalidInput {
            field: "discount_rate".into(),
            reason: "Discount rate must be in [0, 1)".into(),
        });
    }
    if input.annual_reference_rate < Decimal::ZERO {
        return Err(PayOrInvestError::InvalidInput {
            field: "annual_reference_rate".into(),
            reason: "Annual reference rate cannot be negative".into(),
        });
    }
    if input.reference_rate_share < Decimal::ZERO || input.reference_rate_share > Decimal::ONE {
        return Err(PayOrInvestError::InvalidInput {
            field: "reference_rate_share".into(),
            reason: "Reference rate share must be between 0 and 1".into(),
        });
    }
    if input.invoice_day == 0 || input.invoice_day > MAX_INVOICE_DAY {
        return Err(PayOrInvestError::InvalidInput {
            field: "invoice_day".into(),
            reason: format!("Invoice day must be between 1 and {MAX_INVOICE_DAY}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installments::accrual::AccrualStrategy;
    use rust_decimal_macros::dec;

    fn valid_input() -> PurchaseInput {
        PurchaseInput {
            total_value: dec!(1000),
            installments: 3,
            discount_rate: dec!(0.10),
            annual_reference_rate: dec!(0.12),
            reference_rate_share: dec!(1),
            invoice_day: 10,
            strategy: AccrualStrategy::LumpSum,
        }
    }

    fn rejected_field(input: &PurchaseInput) -> String {
        match validate_purchase_input(input) {
            Err(PayOrInvestError::InvalidInput { field, .. }) => field,
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(validate_purchase_input(&valid_input()).is_ok());
    }

    #[test]
    fn test_zero_installments_rejected() {
        let mut input = valid_input();
        input.installments = 0;
        assert_eq!(rejected_field(&input), "installments");
    }

    #[test]
    fn test_non_positive_total_rejected() {
        let mut input = valid_input();
        input.total_value = dec!(0);
        assert_eq!(rejected_field(&input), "total_value");
    }

    #[test]
    fn test_full_discount_rejected() {
        let mut input = valid_input();
        input.discount_rate = dec!(1);
        assert_eq!(rejected_field(&input), "discount_rate");
    }

    #[test]
    fn test_share_above_one_rejected() {
        let mut input = valid_input();
        input.reference_rate_share = dec!(1.1);
        assert_eq!(rejected_field(&input), "reference_rate_share");
    }

    #[test]
    fn test_invoice_day_out_of_range_rejected() {
        let mut input = valid_input();
        input.invoice_day = 32;
        assert_eq!(rejected_field(&input), "invoice_day");
    }
}
