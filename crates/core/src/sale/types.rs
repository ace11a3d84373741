//! Sale domain types and the status machine.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fiado_shared::types::{BatchPaymentId, CustomerId, LineItemId, SaleId};

/// Persisted sale status.
///
/// Overdue is a derived view (`Sale::is_overdue`), never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    /// Sale has an outstanding balance.
    Open,
    /// Sale is fully paid (terminal).
    Paid,
}

impl SaleStatus {
    /// Returns true if the sale can still be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns true if the status admits no further transitions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// The status machine: the only way a sale changes status.
///
/// Open moves to Paid when the balance due reaches zero. Paid is terminal;
/// it never demotes back to Open even if the balance is recomputed later.
#[must_use]
pub fn resolve_status(current: SaleStatus, balance_due: Decimal) -> SaleStatus {
    match current {
        SaleStatus::Paid => SaleStatus::Paid,
        SaleStatus::Open => {
            if balance_due <= Decimal::ZERO {
                SaleStatus::Paid
            } else {
                SaleStatus::Open
            }
        }
    }
}

/// A sale on store credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    /// Unique identifier.
    pub id: SaleId,
    /// The customer who owes this sale.
    pub customer_id: CustomerId,
    /// Date of purchase.
    pub sale_date: NaiveDate,
    /// Payment deadline.
    pub due_date: NaiveDate,
    /// Sum of line-item subtotals.
    pub subtotal: Decimal,
    /// Amount owed. Equal to subtotal; kept separate for future charges.
    pub total: Decimal,
    /// Current status.
    pub status: SaleStatus,
    /// True for system-generated remainder sales.
    pub is_remainder: bool,
    /// Batch payment that generated this remainder sale.
    pub batch_payment_id: Option<BatchPaymentId>,
    /// Date the sale was fully paid.
    pub payment_date: Option<NaiveDate>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Amount still owed given the total paid so far.
    #[must_use]
    pub fn balance_due(&self, amount_paid: Decimal) -> Decimal {
        (self.total - amount_paid).max(Decimal::ZERO)
    }

    /// True when nothing is owed.
    #[must_use]
    pub fn is_fully_paid(&self, amount_paid: Decimal) -> bool {
        self.total - amount_paid <= Decimal::ZERO
    }

    /// True when the sale is open and past its due date.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == SaleStatus::Open && today > self.due_date
    }

    /// Days past the due date, zero when not overdue.
    #[must_use]
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        if self.is_overdue(today) {
            (today - self.due_date).num_days()
        } else {
            0
        }
    }
}

/// A single line on a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique identifier.
    pub id: LineItemId,
    /// What was sold (2 to 255 characters).
    pub description: String,
    /// Quantity at 3 decimal places (supports 1.5 kg etc).
    pub quantity: Decimal,
    /// Price per unit at 2 decimal places.
    pub unit_price: Decimal,
    /// `round(quantity * unit_price, 2)`.
    pub subtotal: Decimal,
}

/// Input for one line item on a new or edited sale.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemInput {
    /// What was sold.
    pub description: String,
    /// Quantity; rounded to 3 decimal places.
    pub quantity: Decimal,
    /// Price per unit; rounded to 2 decimal places.
    pub unit_price: Decimal,
    /// Subtotal as the caller computed it, checked within one cent.
    pub expected_subtotal: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sale(total: Decimal, status: SaleStatus, due: NaiveDate) -> Sale {
        Sale {
            id: SaleId::new(),
            customer_id: CustomerId::new(),
            sale_date: due - chrono::Days::new(30),
            due_date: due,
            subtotal: total,
            total,
            status,
            is_remainder: false,
            batch_payment_id: None,
            payment_date: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolve_status_open_to_paid() {
        assert_eq!(resolve_status(SaleStatus::Open, dec!(0.00)), SaleStatus::Paid);
        assert_eq!(resolve_status(SaleStatus::Open, dec!(-0.01)), SaleStatus::Paid);
        assert_eq!(resolve_status(SaleStatus::Open, dec!(0.01)), SaleStatus::Open);
    }

    #[test]
    fn test_paid_is_terminal() {
        assert_eq!(resolve_status(SaleStatus::Paid, dec!(100.00)), SaleStatus::Paid);
    }

    #[test]
    fn test_balance_due_never_negative() {
        let s = sale(dec!(50.00), SaleStatus::Open, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(s.balance_due(dec!(60.00)), Decimal::ZERO);
        assert_eq!(s.balance_due(dec!(20.00)), dec!(30.00));
    }

    #[test]
    fn test_overdue_only_when_open() {
        let due = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();

        let open = sale(dec!(50.00), SaleStatus::Open, due);
        assert!(open.is_overdue(today));
        assert_eq!(open.days_overdue(today), 14);

        let paid = sale(dec!(50.00), SaleStatus::Paid, due);
        assert!(!paid.is_overdue(today));
        assert_eq!(paid.days_overdue(today), 0);
    }

    #[test]
    fn test_due_date_itself_is_not_overdue() {
        let due = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let s = sale(dec!(50.00), SaleStatus::Open, due);
        assert!(!s.is_overdue(due));
    }
}
