//! Sale and line-item validation.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use fiado_shared::config::CreditConfig;
use fiado_shared::types::{CENT, LineItemId, round_amount, round_quantity};

use super::error::SaleError;
use super::types::{LineItem, LineItemInput, SaleStatus};

/// Validates one line item and materializes it with a computed subtotal.
///
/// Quantity is rounded to 3 decimal places and unit price to 2 before the
/// range checks. When the caller supplies its own subtotal it must agree
/// with `round(quantity * unit_price, 2)` within one cent.
///
/// # Errors
///
/// Returns the first rule the input violates.
pub fn validate_line_item(
    input: &LineItemInput,
    config: &CreditConfig,
) -> Result<LineItem, SaleError> {
    let description = input.description.trim();
    let len = description.chars().count();
    if !(2..=255).contains(&len) {
        return Err(SaleError::InvalidDescription);
    }

    let quantity = round_quantity(input.quantity);
    if quantity <= Decimal::ZERO {
        return Err(SaleError::NonPositiveQuantity);
    }
    if quantity > config.max_quantity {
        return Err(SaleError::QuantityTooLarge {
            max: config.max_quantity,
        });
    }

    let unit_price = round_amount(input.unit_price);
    if unit_price <= Decimal::ZERO {
        return Err(SaleError::NonPositiveUnitPrice);
    }
    if unit_price > config.max_unit_price {
        return Err(SaleError::UnitPriceTooLarge {
            max: config.max_unit_price,
        });
    }

    let subtotal = round_amount(quantity * unit_price);
    if let Some(expected) = input.expected_subtotal
        && (expected - subtotal).abs() > CENT
    {
        return Err(SaleError::SubtotalMismatch {
            expected,
            computed: subtotal,
        });
    }

    Ok(LineItem {
        id: LineItemId::new(),
        description: description.to_string(),
        quantity,
        unit_price,
        subtotal,
    })
}

/// Validates a full item list and computes the sale total.
///
/// # Errors
///
/// Returns an error when the list is empty, any item is invalid, or the
/// total falls below the configured minimum sale value.
pub fn validate_sale_items(
    inputs: &[LineItemInput],
    config: &CreditConfig,
) -> Result<(Vec<LineItem>, Decimal), SaleError> {
    if inputs.is_empty() {
        return Err(SaleError::NoItems);
    }

    let items = inputs
        .iter()
        .map(|input| validate_line_item(input, config))
        .collect::<Result<Vec<_>, _>>()?;

    let total = round_amount(items.iter().map(|item| item.subtotal).sum());
    if total < config.min_sale_value {
        return Err(SaleError::BelowMinimum {
            minimum: config.min_sale_value,
        });
    }

    Ok((items, total))
}

/// Validates that the due date does not precede the sale date.
///
/// # Errors
///
/// Returns `DueDateBeforeSaleDate` otherwise.
pub fn validate_dates(sale_date: NaiveDate, due_date: NaiveDate) -> Result<(), SaleError> {
    if due_date < sale_date {
        return Err(SaleError::DueDateBeforeSaleDate);
    }
    Ok(())
}

/// Default due date: sale date plus the configured term.
#[must_use]
pub fn default_due_date(sale_date: NaiveDate, config: &CreditConfig) -> NaiveDate {
    let days = u64::try_from(config.due_term_days).unwrap_or(0);
    sale_date
        .checked_add_days(Days::new(days))
        .unwrap_or(sale_date)
}

/// Guards sale edits: only open, user-created, payment-free sales change.
///
/// # Errors
///
/// Returns the blocking condition.
pub fn ensure_editable(
    status: SaleStatus,
    is_remainder: bool,
    payments: u64,
) -> Result<(), SaleError> {
    if is_remainder {
        return Err(SaleError::RemainderImmutable);
    }
    if !status.is_editable() {
        return Err(SaleError::AlreadyPaid);
    }
    if payments > 0 {
        return Err(SaleError::HasPayments { payments });
    }
    Ok(())
}

/// Guards sale deletion; same conditions as editing.
///
/// # Errors
///
/// Returns the blocking condition.
pub fn ensure_deletable(
    status: SaleStatus,
    is_remainder: bool,
    payments: u64,
) -> Result<(), SaleError> {
    ensure_editable(status, is_remainder, payments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn item(description: &str, quantity: Decimal, unit_price: Decimal) -> LineItemInput {
        LineItemInput {
            description: description.to_string(),
            quantity,
            unit_price,
            expected_subtotal: None,
        }
    }

    #[test]
    fn test_valid_item() {
        let config = CreditConfig::default();
        let result = validate_line_item(&item("Arroz 5kg", dec!(2), dec!(25.90)), &config).unwrap();
        assert_eq!(result.subtotal, dec!(51.80));
        assert_eq!(result.quantity, dec!(2.000));
    }

    #[test]
    fn test_fractional_quantity_subtotal() {
        let config = CreditConfig::default();
        let result = validate_line_item(&item("Queijo", dec!(1.5), dec!(33.33)), &config).unwrap();
        // 1.5 * 33.33 = 49.995 -> 50.00 half-up
        assert_eq!(result.subtotal, dec!(50.00));
    }

    #[rstest]
    #[case("a")]
    #[case(" ")]
    fn test_description_too_short(#[case] description: &str) {
        let config = CreditConfig::default();
        assert_eq!(
            validate_line_item(&item(description, dec!(1), dec!(1.00)), &config),
            Err(SaleError::InvalidDescription)
        );
    }

    #[test]
    fn test_description_too_long() {
        let config = CreditConfig::default();
        let long = "x".repeat(256);
        assert_eq!(
            validate_line_item(&item(&long, dec!(1), dec!(1.00)), &config),
            Err(SaleError::InvalidDescription)
        );
    }

    #[test]
    fn test_quantity_bounds() {
        let config = CreditConfig::default();
        assert_eq!(
            validate_line_item(&item("Feijão", dec!(0), dec!(1.00)), &config),
            Err(SaleError::NonPositiveQuantity)
        );
        assert_eq!(
            validate_line_item(&item("Feijão", dec!(10000), dec!(1.00)), &config),
            Err(SaleError::QuantityTooLarge {
                max: dec!(9999.999)
            })
        );
        assert!(validate_line_item(&item("Feijão", dec!(9999.999), dec!(1.00)), &config).is_ok());
    }

    #[test]
    fn test_unit_price_bounds() {
        let config = CreditConfig::default();
        assert_eq!(
            validate_line_item(&item("Carne", dec!(1), dec!(0.00)), &config),
            Err(SaleError::NonPositiveUnitPrice)
        );
        assert_eq!(
            validate_line_item(&item("Carne", dec!(1), dec!(100000.00)), &config),
            Err(SaleError::UnitPriceTooLarge {
                max: dec!(99999.99)
            })
        );
    }

    #[test]
    fn test_subtotal_tolerance() {
        let config = CreditConfig::default();
        let mut input = item("Leite", dec!(3), dec!(4.99));
        input.expected_subtotal = Some(dec!(14.98)); // computed is 14.97
        assert!(validate_line_item(&input, &config).is_ok());

        input.expected_subtotal = Some(dec!(14.99));
        assert!(matches!(
            validate_line_item(&input, &config),
            Err(SaleError::SubtotalMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_items_rejected() {
        let config = CreditConfig::default();
        assert_eq!(
            validate_sale_items(&[], &config),
            Err(SaleError::NoItems)
        );
    }

    #[test]
    fn test_total_sums_items() {
        let config = CreditConfig::default();
        let items = vec![
            item("Arroz", dec!(1), dec!(25.90)),
            item("Feijão", dec!(2), dec!(8.50)),
        ];
        let (validated, total) = validate_sale_items(&items, &config).unwrap();
        assert_eq!(validated.len(), 2);
        assert_eq!(total, dec!(42.90));
    }

    #[test]
    fn test_dates() {
        let sale = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        assert!(validate_dates(sale, sale).is_ok());
        assert!(validate_dates(sale, sale.succ_opt().unwrap()).is_ok());
        assert_eq!(
            validate_dates(sale, sale.pred_opt().unwrap()),
            Err(SaleError::DueDateBeforeSaleDate)
        );
    }

    #[test]
    fn test_default_due_date() {
        let config = CreditConfig::default();
        let sale = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        assert_eq!(
            default_due_date(sale, &config),
            NaiveDate::from_ymd_opt(2026, 2, 9).unwrap()
        );
    }

    #[test]
    fn test_edit_guards() {
        assert!(ensure_editable(SaleStatus::Open, false, 0).is_ok());
        assert_eq!(
            ensure_editable(SaleStatus::Paid, false, 0),
            Err(SaleError::AlreadyPaid)
        );
        assert_eq!(
            ensure_editable(SaleStatus::Open, true, 0),
            Err(SaleError::RemainderImmutable)
        );
        assert_eq!(
            ensure_editable(SaleStatus::Open, false, 2),
            Err(SaleError::HasPayments { payments: 2 })
        );
    }
}
