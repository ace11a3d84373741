//! Credit extension checks.

use rust_decimal::Decimal;

use crate::customer::CreditStanding;

use super::error::CreditError;

/// Checks whether `additional` debt fits under the customer's limit.
///
/// Passes exactly when `open_balance + additional <= credit_limit`. Pure and
/// side-effect free, so the check can be re-run inside the write transaction
/// without surprises.
///
/// # Errors
///
/// Returns `LimitExceeded` with the available credit when the new debt
/// does not fit.
pub fn can_extend(standing: &CreditStanding, additional: Decimal) -> Result<(), CreditError> {
    if standing.open_balance + additional > standing.credit_limit {
        return Err(CreditError::LimitExceeded {
            available: standing.available_credit(),
        });
    }
    Ok(())
}

/// Credit check for editing an existing open sale.
///
/// The sale's previous total is already counted in `open_balance`, so it is
/// excluded before the new total is checked.
///
/// # Errors
///
/// Returns `LimitExceeded` when the edited sale does not fit.
pub fn can_extend_replacing(
    standing: &CreditStanding,
    old_total: Decimal,
    new_total: Decimal,
) -> Result<(), CreditError> {
    let balance_without_sale = (standing.open_balance - old_total).max(Decimal::ZERO);
    let adjusted = CreditStanding {
        open_balance: balance_without_sale,
        ..*standing
    };
    can_extend(&adjusted, new_total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn standing(limit: Decimal, open: Decimal) -> CreditStanding {
        CreditStanding {
            credit_limit: limit,
            open_balance: open,
            overdue_balance: Decimal::ZERO,
        }
    }

    #[test]
    fn test_within_limit() {
        let s = standing(dec!(500.00), dec!(300.00));
        assert!(can_extend(&s, dec!(200.00)).is_ok());
    }

    #[test]
    fn test_exactly_at_limit_passes() {
        let s = standing(dec!(500.00), dec!(499.99));
        assert!(can_extend(&s, dec!(0.01)).is_ok());
    }

    #[test]
    fn test_one_cent_over_fails() {
        let s = standing(dec!(500.00), dec!(450.00));
        assert_eq!(
            can_extend(&s, dec!(50.01)),
            Err(CreditError::LimitExceeded {
                available: dec!(50.00)
            })
        );
    }

    #[test]
    fn test_edit_excludes_old_total() {
        // Open balance 500 of which 200 is the sale being edited.
        let s = standing(dec!(500.00), dec!(500.00));
        assert!(can_extend_replacing(&s, dec!(200.00), dec!(200.00)).is_ok());
        assert!(can_extend_replacing(&s, dec!(200.00), dec!(150.00)).is_ok());
        assert!(can_extend_replacing(&s, dec!(200.00), dec!(200.01)).is_err());
    }
}
