//! Remainder sale planning.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use fiado_shared::config::CreditConfig;
use fiado_shared::types::{BatchPaymentId, CustomerId, SaleId};

use crate::sale::default_due_date;

/// Plan for the system-generated sale that carries unpaid batch debt.
///
/// The repository persists this as a sale with `is_remainder = true` and a
/// single synthetic line item. The plan's total equals the remainder
/// exactly; nothing re-derives it.
#[derive(Debug, Clone, PartialEq)]
pub struct RemainderPlan {
    /// The customer who still owes the remainder.
    pub customer_id: CustomerId,
    /// The batch payment that left this remainder.
    pub batch_payment_id: BatchPaymentId,
    /// Sale date: the batch payment's date.
    pub sale_date: NaiveDate,
    /// Due date: sale date plus the configured term.
    pub due_date: NaiveDate,
    /// Synthetic line-item description naming the originating sales.
    pub description: String,
    /// Always one unit.
    pub quantity: Decimal,
    /// Unit price: the remainder amount.
    pub unit_price: Decimal,
    /// Sale total: the remainder amount.
    pub total: Decimal,
    /// Note linking back to the batch payment.
    pub notes: String,
}

/// Builds the remainder-sale plan.
///
/// Call only when the allocator signals
/// [`generates_remainder`](super::AllocationOutcome::generates_remainder).
#[must_use]
pub fn plan_remainder_sale(
    remainder: Decimal,
    source_sales: &[SaleId],
    customer_id: CustomerId,
    batch_payment_id: BatchPaymentId,
    payment_date: NaiveDate,
    config: &CreditConfig,
) -> RemainderPlan {
    RemainderPlan {
        customer_id,
        batch_payment_id,
        sale_date: payment_date,
        due_date: default_due_date(payment_date, config),
        description: remainder_item_description(source_sales),
        quantity: Decimal::ONE,
        unit_price: remainder,
        total: remainder,
        notes: format!("Restante do pagamento múltiplo #{}", short_id(batch_payment_id.into_inner())),
    }
}

/// Description of the synthetic line item: "Saldo restante das notas ...".
///
/// Up to three sale ids are listed in full; beyond that the first two are
/// listed with a count. A hard fallback keeps the text under the 255-char
/// column limit whatever the id format.
#[must_use]
pub fn remainder_item_description(source_sales: &[SaleId]) -> String {
    let ids: Vec<String> = source_sales
        .iter()
        .map(|id| format!("#{}", short_id(id.into_inner())))
        .collect();

    let listed = if ids.len() <= 3 {
        ids.join(", ")
    } else {
        format!("{}, {} e mais {} nota(s)", ids[0], ids[1], ids.len() - 2)
    };

    let description = format!("Saldo restante das notas {listed}");
    if description.chars().count() > 250 {
        let first = ids.first().map_or_else(String::new, Clone::clone);
        return format!(
            "Saldo restante das notas {first} e mais {} nota(s)",
            ids.len().saturating_sub(1)
        );
    }
    description
}

/// First UUID block, the customary short display form.
fn short_id(id: uuid::Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_plan_total_equals_remainder() {
        let config = CreditConfig::default();
        let payment_date = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        let plan = plan_remainder_sale(
            dec!(20.00),
            &[SaleId::new(), SaleId::new()],
            CustomerId::new(),
            BatchPaymentId::new(),
            payment_date,
            &config,
        );

        assert_eq!(plan.total, dec!(20.00));
        assert_eq!(plan.unit_price, dec!(20.00));
        assert_eq!(plan.quantity, Decimal::ONE);
        assert_eq!(plan.sale_date, payment_date);
        assert_eq!(
            plan.due_date,
            NaiveDate::from_ymd_opt(2026, 3, 12).unwrap()
        );
    }

    #[test]
    fn test_description_lists_up_to_three_ids() {
        let ids = vec![SaleId::new(), SaleId::new(), SaleId::new()];
        let description = remainder_item_description(&ids);
        assert!(description.starts_with("Saldo restante das notas #"));
        assert_eq!(description.matches('#').count(), 3);
        assert!(!description.contains("e mais"));
    }

    #[test]
    fn test_description_truncates_beyond_three() {
        let ids = vec![SaleId::new(); 5];
        let description = remainder_item_description(&ids);
        assert_eq!(description.matches('#').count(), 2);
        assert!(description.ends_with("e mais 3 nota(s)"));
    }

    #[test]
    fn test_description_fits_column() {
        let ids = vec![SaleId::new(); 40];
        let description = remainder_item_description(&ids);
        assert!(description.chars().count() <= 255);
    }
}
