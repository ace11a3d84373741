//! Receipt data assembly.
//!
//! Pure data for the printing collaborator; no formatting or I/O here.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use fiado_shared::types::{BatchPaymentId, PaymentId, SaleId};

use super::types::PaymentMethod;

/// Receipt for a single payment against one sale.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    /// The payment this receipt documents.
    pub payment_id: PaymentId,
    /// The sale that was paid.
    pub sale_id: SaleId,
    /// Customer name as registered.
    pub customer_name: String,
    /// Date of the original sale.
    pub sale_date: NaiveDate,
    /// Total of the original sale.
    pub sale_total: Decimal,
    /// Amount paid now.
    pub value: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// Cash tendered, for cash payments.
    pub tendered: Option<Decimal>,
    /// Change returned, for cash payments.
    pub change: Option<Decimal>,
    /// Date of the payment.
    pub payment_date: NaiveDate,
    /// Balance still owed on the sale after this payment.
    pub balance_after: Decimal,
    /// When the receipt data was assembled.
    pub issued_at: DateTime<Utc>,
}

/// One settled-or-reduced sale on a batch receipt.
#[derive(Debug, Clone, Serialize)]
pub struct PaidSaleLine {
    /// The sale.
    pub sale_id: SaleId,
    /// Date of the sale.
    pub sale_date: NaiveDate,
    /// Balance the sale carried before the batch payment.
    pub original_balance: Decimal,
    /// Amount allocated to this sale.
    pub amount_paid: Decimal,
    /// True when the allocation settled the sale.
    pub settled: bool,
}

/// Receipt for a batch payment across several sales.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReceipt {
    /// The batch payment.
    pub batch_payment_id: BatchPaymentId,
    /// Customer name as registered.
    pub customer_name: String,
    /// Date of the payment.
    pub payment_date: NaiveDate,
    /// Combined balance of the selected sales before payment.
    pub total_balance: Decimal,
    /// Amount the customer paid.
    pub amount_paid: Decimal,
    /// Debt left over, consolidated into the remainder sale.
    pub remainder: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// Cash tendered, for cash payments.
    pub tendered: Option<Decimal>,
    /// Change returned, for cash payments.
    pub change: Option<Decimal>,
    /// Per-sale breakdown.
    pub paid_sales: Vec<PaidSaleLine>,
    /// Remainder sale generated by this payment, if any.
    pub remainder_sale_id: Option<SaleId>,
    /// When the receipt data was assembled.
    pub issued_at: DateTime<Utc>,
}

impl BatchReceipt {
    /// True when the payment left a remainder.
    #[must_use]
    pub fn has_remainder(&self) -> bool {
        self.remainder > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_has_remainder() {
        let receipt = BatchReceipt {
            batch_payment_id: BatchPaymentId::new(),
            customer_name: "Maria Silva".to_string(),
            payment_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            total_balance: dec!(100.00),
            amount_paid: dec!(70.00),
            remainder: dec!(30.00),
            method: PaymentMethod::Cash,
            tendered: Some(dec!(70.00)),
            change: Some(dec!(0.00)),
            paid_sales: vec![],
            remainder_sale_id: Some(SaleId::new()),
            issued_at: Utc::now(),
        };
        assert!(receipt.has_remainder());
    }

    #[test]
    fn test_receipt_serializes_for_printing() {
        let receipt = Receipt {
            payment_id: PaymentId::new(),
            sale_id: SaleId::new(),
            customer_name: "João Pereira".to_string(),
            sale_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            sale_total: dec!(80.00),
            value: dec!(50.00),
            method: PaymentMethod::Pix,
            tendered: None,
            change: None,
            payment_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            balance_after: dec!(30.00),
            issued_at: Utc::now(),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["value"], "50.00");
        assert_eq!(json["method"], "pix");
        assert!(json["tendered"].is_null());
    }
}
