//! Payment validation.

use rust_decimal::Decimal;

use fiado_shared::types::round_amount;

use super::error::PaymentError;
use super::types::{PaymentMethod, PaymentPlan};

/// Validates a payment against a sale's outstanding balance.
///
/// The value must be positive and must not exceed the balance due. Cash
/// payments additionally require the tendered amount to cover the value;
/// change is `max(tendered - value, 0)`. Tendered amounts on non-cash
/// methods are ignored.
///
/// # Errors
///
/// Returns the violated rule.
pub fn validate_payment(
    value: Decimal,
    balance_due: Decimal,
    method: PaymentMethod,
    tendered: Option<Decimal>,
) -> Result<PaymentPlan, PaymentError> {
    if balance_due <= Decimal::ZERO {
        return Err(PaymentError::SaleAlreadyPaid);
    }

    let value = round_amount(value);
    if value <= Decimal::ZERO {
        return Err(PaymentError::NonPositiveValue);
    }
    if value > balance_due {
        return Err(PaymentError::Overpayment { value, balance_due });
    }

    if method.is_cash() {
        if let Some(tendered) = tendered {
            let tendered = round_amount(tendered);
            if tendered < value {
                return Err(PaymentError::InsufficientTender { tendered, value });
            }
            let change = (tendered - value).max(Decimal::ZERO);
            return Ok(PaymentPlan {
                value,
                tendered: Some(tendered),
                change: Some(change),
            });
        }
        // Exact cash: no tendered amount recorded, no change.
        return Ok(PaymentPlan {
            value,
            tendered: None,
            change: None,
        });
    }

    Ok(PaymentPlan {
        value,
        tendered: None,
        change: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_payment() {
        let plan = validate_payment(dec!(20.00), dec!(50.00), PaymentMethod::Pix, None).unwrap();
        assert_eq!(plan.value, dec!(20.00));
        assert_eq!(plan.tendered, None);
        assert_eq!(plan.change, None);
    }

    #[test]
    fn test_cash_change() {
        let plan =
            validate_payment(dec!(35.00), dec!(35.00), PaymentMethod::Cash, Some(dec!(50.00)))
                .unwrap();
        assert_eq!(plan.tendered, Some(dec!(50.00)));
        assert_eq!(plan.change, Some(dec!(15.00)));
    }

    #[test]
    fn test_cash_exact_tender_no_change() {
        let plan =
            validate_payment(dec!(35.00), dec!(35.00), PaymentMethod::Cash, Some(dec!(35.00)))
                .unwrap();
        assert_eq!(plan.change, Some(dec!(0.00)));
    }

    #[test]
    fn test_insufficient_tender_rejected() {
        assert_eq!(
            validate_payment(dec!(35.00), dec!(35.00), PaymentMethod::Cash, Some(dec!(30.00))),
            Err(PaymentError::InsufficientTender {
                tendered: dec!(30.00),
                value: dec!(35.00)
            })
        );
    }

    #[test]
    fn test_tendered_ignored_for_card() {
        let plan =
            validate_payment(dec!(35.00), dec!(35.00), PaymentMethod::Card, Some(dec!(50.00)))
                .unwrap();
        assert_eq!(plan.tendered, None);
        assert_eq!(plan.change, None);
    }

    #[test]
    fn test_overpayment_rejected() {
        assert_eq!(
            validate_payment(dec!(50.01), dec!(50.00), PaymentMethod::Pix, None),
            Err(PaymentError::Overpayment {
                value: dec!(50.01),
                balance_due: dec!(50.00)
            })
        );
    }

    #[test]
    fn test_non_positive_rejected() {
        assert_eq!(
            validate_payment(dec!(0.00), dec!(50.00), PaymentMethod::Pix, None),
            Err(PaymentError::NonPositiveValue)
        );
        assert_eq!(
            validate_payment(dec!(-5.00), dec!(50.00), PaymentMethod::Pix, None),
            Err(PaymentError::NonPositiveValue)
        );
    }

    #[test]
    fn test_paid_sale_rejected() {
        assert_eq!(
            validate_payment(dec!(1.00), dec!(0.00), PaymentMethod::Pix, None),
            Err(PaymentError::SaleAlreadyPaid)
        );
    }
}
