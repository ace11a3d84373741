//! Payment repository: single payments, batch payments, and receipts.
//!
//! The batch path is the heart of the system: one paid amount is split
//! across several open sales inside a single database transaction, with
//! the customer and every selected sale row locked. Either everything
//! lands (batch header, allocation details, per-sale payments, status
//! updates, remainder sale) or nothing does.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use fiado_core::allocation::{
    AllocationError, AllocationOutcome, SaleBalance, allocate, plan_remainder_sale,
};
use fiado_core::payment::{
    BatchReceipt, PaidSaleLine, Payment, PaymentError, PaymentMethod, Receipt, validate_payment,
};
use fiado_core::sale::{Sale, resolve_status};
use fiado_shared::config::CreditConfig;
use fiado_shared::types::{BatchPaymentId, CustomerId, LineItemId, PaymentId, SaleId};

use crate::entities::{
    batch_payment_details, batch_payments, customers, payments, sale_items, sales,
    sea_orm_active_enums::SaleStatus,
};
use crate::repositories::customer::{amounts_paid, balance_due};

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentRepoError {
    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(Uuid),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),

    /// Batch payment not found.
    #[error("Batch payment not found: {0}")]
    BatchNotFound(Uuid),

    /// A selected sale is missing, paid, or belongs to another customer.
    #[error("Sale is not eligible for this batch payment: {0}")]
    SaleNotEligible(Uuid),

    /// A payment rule was violated.
    #[error(transparent)]
    Rule(#[from] PaymentError),

    /// The allocator rejected the input.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl PaymentRepoError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SaleNotFound(_) => "SALE_NOT_FOUND",
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::BatchNotFound(_) => "BATCH_PAYMENT_NOT_FOUND",
            Self::SaleNotEligible(_) => "SALE_NOT_ELIGIBLE",
            Self::Rule(e) => e.error_code(),
            Self::Allocation(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::SaleNotFound(_)
            | Self::CustomerNotFound(_)
            | Self::PaymentNotFound(_)
            | Self::BatchNotFound(_) => 404,
            Self::SaleNotEligible(_) => 409,
            Self::Rule(e) => e.http_status_code(),
            Self::Allocation(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

/// Input for registering a payment against one sale.
#[derive(Debug, Clone)]
pub struct RegisterPaymentInput {
    /// The sale being paid.
    pub sale_id: Uuid,
    /// Amount applied to the balance.
    pub value: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// Cash tendered, for cash payments.
    pub tendered: Option<Decimal>,
    /// Date of the payment.
    pub payment_date: NaiveDate,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for a batch payment across several of a customer's open sales.
#[derive(Debug, Clone)]
pub struct BatchPaymentInput {
    /// The paying customer.
    pub customer_id: Uuid,
    /// The selected open sales.
    pub sale_ids: Vec<Uuid>,
    /// Amount the customer is paying.
    pub amount: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// Cash tendered, for cash payments.
    pub tendered: Option<Decimal>,
    /// Date of the payment.
    pub payment_date: NaiveDate,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Everything a batch payment produced, for the confirmation screen.
#[derive(Debug, Clone)]
pub struct BatchPaymentResult {
    /// The persisted batch header.
    pub batch: batch_payments::Model,
    /// The allocator's verdicts.
    pub outcome: AllocationOutcome,
    /// The remainder sale, when the payment left uncovered debt.
    pub remainder_sale: Option<Sale>,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a payment against one sale.
    ///
    /// The sale row is locked so the balance check and the status update
    /// see the same payment sums. A payment that clears the balance moves
    /// the sale to paid and stamps the payment date.
    ///
    /// # Errors
    ///
    /// Returns an error if the sale is missing or already paid, the value
    /// exceeds the balance due, or cash tender is insufficient.
    pub async fn register_payment(
        &self,
        input: RegisterPaymentInput,
    ) -> Result<(Payment, Sale), PaymentRepoError> {
        let txn = self.db.begin().await?;

        let sale = sales::Entity::find_by_id(input.sale_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(PaymentRepoError::SaleNotFound(input.sale_id))?;

        let paid = amounts_paid(&txn, std::iter::once(sale.id)).await?;
        let balance = balance_due(sale.total, paid.get(&sale.id));

        let plan = validate_payment(input.value, balance, input.method, input.tendered)?;

        let payment = payments::ActiveModel {
            id: Set(PaymentId::new().into_inner()),
            sale_id: Set(sale.id),
            amount: Set(plan.value),
            method: Set(input.method.into()),
            tendered: Set(plan.tendered),
            change_due: Set(plan.change),
            payment_date: Set(input.payment_date),
            notes: Set(input.notes),
            created_at: Set(Utc::now().into()),
        };
        let payment = payment.insert(&txn).await?;

        let new_status = resolve_status(sale.status.clone().into(), balance - plan.value);
        let sale = if new_status.is_terminal() {
            let mut active: sales::ActiveModel = sale.into();
            active.status = Set(SaleStatus::Paid);
            active.payment_date = Set(Some(input.payment_date));
            active.updated_at = Set(Utc::now().into());
            active.update(&txn).await?
        } else {
            sale
        };

        txn.commit().await?;
        Ok((payment.into(), sale.into()))
    }

    /// Registers a batch payment across several open sales.
    ///
    /// Locks the customer and the selected sales (oldest due first), splits
    /// the amount proportionally, records one allocation detail per sale,
    /// one payment per sale that received anything, settles sales the
    /// allocator marked settled, and consolidates any uncovered debt into a
    /// system-generated remainder sale.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is missing, a selected sale is not
    /// an open sale of this customer, the amount exceeds the combined
    /// balance, or cash tender is insufficient.
    pub async fn register_batch_payment(
        &self,
        input: BatchPaymentInput,
        config: &CreditConfig,
    ) -> Result<BatchPaymentResult, PaymentRepoError> {
        let txn = self.db.begin().await?;

        customers::Entity::find_by_id(input.customer_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(PaymentRepoError::CustomerNotFound(input.customer_id))?;

        let locked = sales::Entity::find()
            .filter(sales::Column::Id.is_in(input.sale_ids.clone()))
            .filter(sales::Column::CustomerId.eq(input.customer_id))
            .filter(sales::Column::Status.eq(SaleStatus::Open))
            .order_by_asc(sales::Column::DueDate)
            .lock_exclusive()
            .all(&txn)
            .await?;

        for requested in &input.sale_ids {
            if !locked.iter().any(|sale| sale.id == *requested) {
                return Err(PaymentRepoError::SaleNotEligible(*requested));
            }
        }

        let paid = amounts_paid(&txn, locked.iter().map(|s| s.id)).await?;
        let balances: Vec<SaleBalance> = locked
            .iter()
            .map(|sale| SaleBalance {
                sale_id: SaleId::from_uuid(sale.id),
                balance_due: balance_due(sale.total, paid.get(&sale.id)),
            })
            .collect();
        let total_balance: Decimal = balances.iter().map(|b| b.balance_due).sum();

        // Overpayment over the combined balance is rejected here; the
        // allocator itself only clamps.
        let plan = validate_payment(input.amount, total_balance, input.method, input.tendered)?;
        let outcome = allocate(plan.value, &balances)?;

        let now = Utc::now().into();
        let batch_id = BatchPaymentId::new();
        let batch = batch_payments::ActiveModel {
            id: Set(batch_id.into_inner()),
            customer_id: Set(input.customer_id),
            total_balance: Set(outcome.total_balance),
            amount_paid: Set(outcome.amount_applied),
            remainder: Set(outcome.remainder),
            method: Set(input.method.into()),
            tendered: Set(plan.tendered),
            change_due: Set(plan.change),
            payment_date: Set(input.payment_date),
            notes: Set(input.notes),
            created_at: Set(now),
        };
        let batch = batch.insert(&txn).await?;

        for allocation in &outcome.allocations {
            let detail = batch_payment_details::ActiveModel {
                id: Set(Uuid::new_v4()),
                batch_payment_id: Set(batch.id),
                sale_id: Set(allocation.sale_id.into_inner()),
                original_balance: Set(allocation.original_balance),
                amount_paid: Set(allocation.amount),
                settled: Set(allocation.settled),
                created_at: Set(now),
            };
            detail.insert(&txn).await?;

            if allocation.amount > Decimal::ZERO {
                let payment = payments::ActiveModel {
                    id: Set(PaymentId::new().into_inner()),
                    sale_id: Set(allocation.sale_id.into_inner()),
                    amount: Set(allocation.amount),
                    method: Set(input.method.into()),
                    tendered: Set(None),
                    change_due: Set(None),
                    payment_date: Set(input.payment_date),
                    notes: Set(Some(batch_note(batch.id))),
                    created_at: Set(now),
                };
                payment.insert(&txn).await?;
            }

            if allocation.settled {
                settle_sale(&txn, allocation.sale_id.into_inner(), input.payment_date).await?;
            }
        }

        let remainder_sale: Option<Sale> = if outcome.generates_remainder() {
            let source_ids: Vec<SaleId> =
                balances.iter().map(|balance| balance.sale_id).collect();
            let remainder_plan = plan_remainder_sale(
                outcome.remainder,
                &source_ids,
                CustomerId::from_uuid(input.customer_id),
                batch_id,
                input.payment_date,
                config,
            );
            Some(insert_remainder_sale(&txn, &remainder_plan).await?.into())
        } else {
            None
        };

        txn.commit().await?;

        Ok(BatchPaymentResult {
            batch,
            outcome,
            remainder_sale,
        })
    }

    /// Previews a batch distribution without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected sale is not an open sale of this
    /// customer, or the allocator rejects the input.
    pub async fn simulate_batch_payment(
        &self,
        customer_id: Uuid,
        sale_ids: &[Uuid],
        amount: Decimal,
    ) -> Result<AllocationOutcome, PaymentRepoError> {
        let rows = sales::Entity::find()
            .filter(sales::Column::Id.is_in(sale_ids.to_vec()))
            .filter(sales::Column::CustomerId.eq(customer_id))
            .filter(sales::Column::Status.eq(SaleStatus::Open))
            .order_by_asc(sales::Column::DueDate)
            .all(&self.db)
            .await?;

        for requested in sale_ids {
            if !rows.iter().any(|sale| sale.id == *requested) {
                return Err(PaymentRepoError::SaleNotEligible(*requested));
            }
        }

        let paid = amounts_paid(&self.db, rows.iter().map(|s| s.id)).await?;
        let balances: Vec<SaleBalance> = rows
            .iter()
            .map(|sale| SaleBalance {
                sale_id: SaleId::from_uuid(sale.id),
                balance_due: balance_due(sale.total, paid.get(&sale.id)),
            })
            .collect();

        Ok(allocate(amount, &balances)?)
    }

    /// Assembles the receipt data for a single payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment, sale, or customer cannot be found.
    pub async fn receipt(&self, payment_id: Uuid) -> Result<Receipt, PaymentRepoError> {
        let payment = payments::Entity::find_by_id(payment_id)
            .one(&self.db)
            .await?
            .ok_or(PaymentRepoError::PaymentNotFound(payment_id))?;

        let sale = sales::Entity::find_by_id(payment.sale_id)
            .one(&self.db)
            .await?
            .ok_or(PaymentRepoError::SaleNotFound(payment.sale_id))?;

        let customer = customers::Entity::find_by_id(sale.customer_id)
            .one(&self.db)
            .await?
            .ok_or(PaymentRepoError::CustomerNotFound(sale.customer_id))?;

        let paid = amounts_paid(&self.db, std::iter::once(sale.id)).await?;

        Ok(Receipt {
            payment_id: PaymentId::from_uuid(payment.id),
            sale_id: SaleId::from_uuid(sale.id),
            customer_name: customer.name,
            sale_date: sale.sale_date,
            sale_total: sale.total,
            value: payment.amount,
            method: payment.method.into(),
            tendered: payment.tendered,
            change: payment.change_due,
            payment_date: payment.payment_date,
            balance_after: balance_due(sale.total, paid.get(&sale.id)),
            issued_at: Utc::now(),
        })
    }

    /// Assembles the receipt data for a batch payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch or its customer cannot be found.
    pub async fn batch_receipt(&self, batch_id: Uuid) -> Result<BatchReceipt, PaymentRepoError> {
        let batch = batch_payments::Entity::find_by_id(batch_id)
            .one(&self.db)
            .await?
            .ok_or(PaymentRepoError::BatchNotFound(batch_id))?;

        let customer = customers::Entity::find_by_id(batch.customer_id)
            .one(&self.db)
            .await?
            .ok_or(PaymentRepoError::CustomerNotFound(batch.customer_id))?;

        let details = batch_payment_details::Entity::find()
            .filter(batch_payment_details::Column::BatchPaymentId.eq(batch_id))
            .order_by_asc(batch_payment_details::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let sale_dates: std::collections::HashMap<Uuid, NaiveDate> = sales::Entity::find()
            .filter(sales::Column::Id.is_in(details.iter().map(|d| d.sale_id).collect::<Vec<_>>()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|sale| (sale.id, sale.sale_date))
            .collect();

        let paid_sales = details
            .iter()
            .map(|detail| PaidSaleLine {
                sale_id: SaleId::from_uuid(detail.sale_id),
                sale_date: sale_dates
                    .get(&detail.sale_id)
                    .copied()
                    .unwrap_or(batch.payment_date),
                original_balance: detail.original_balance,
                amount_paid: detail.amount_paid,
                settled: detail.settled,
            })
            .collect();

        let remainder_sale = sales::Entity::find()
            .filter(sales::Column::BatchPaymentId.eq(batch_id))
            .filter(sales::Column::IsRemainder.eq(true))
            .one(&self.db)
            .await?;

        Ok(BatchReceipt {
            batch_payment_id: BatchPaymentId::from_uuid(batch.id),
            customer_name: customer.name,
            payment_date: batch.payment_date,
            total_balance: batch.total_balance,
            amount_paid: batch.amount_paid,
            remainder: batch.remainder,
            method: batch.method.into(),
            tendered: batch.tendered,
            change: batch.change_due,
            paid_sales,
            remainder_sale_id: remainder_sale.map(|sale| SaleId::from_uuid(sale.id)),
            issued_at: Utc::now(),
        })
    }

    /// Lists the payments registered against a sale, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_for_sale(&self, sale_id: Uuid) -> Result<Vec<Payment>, PaymentRepoError> {
        let rows = payments::Entity::find()
            .filter(payments::Column::SaleId.eq(sale_id))
            .order_by_asc(payments::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Note stamped on each per-sale payment generated by a batch.
fn batch_note(batch_id: Uuid) -> String {
    let short: String = batch_id.to_string().chars().take(8).collect();
    format!("Pagamento múltiplo #{short}")
}

/// Moves a sale to paid and stamps the payment date.
async fn settle_sale(
    txn: &DatabaseTransaction,
    sale_id: Uuid,
    payment_date: NaiveDate,
) -> Result<(), PaymentRepoError> {
    let sale = sales::Entity::find_by_id(sale_id)
        .one(txn)
        .await?
        .ok_or(PaymentRepoError::SaleNotFound(sale_id))?;

    let mut active: sales::ActiveModel = sale.into();
    active.status = Set(SaleStatus::Paid);
    active.payment_date = Set(Some(payment_date));
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await?;
    Ok(())
}

/// Persists the remainder plan as a sale with one synthetic line item.
async fn insert_remainder_sale(
    txn: &DatabaseTransaction,
    plan: &fiado_core::allocation::RemainderPlan,
) -> Result<sales::Model, PaymentRepoError> {
    let now = Utc::now().into();
    let sale = sales::ActiveModel {
        id: Set(SaleId::new().into_inner()),
        customer_id: Set(plan.customer_id.into_inner()),
        sale_date: Set(plan.sale_date),
        due_date: Set(plan.due_date),
        subtotal: Set(plan.total),
        total: Set(plan.total),
        status: Set(SaleStatus::Open),
        is_remainder: Set(true),
        batch_payment_id: Set(Some(plan.batch_payment_id.into_inner())),
        payment_date: Set(None),
        notes: Set(Some(plan.notes.clone())),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let sale = sale.insert(txn).await?;

    let item = sale_items::ActiveModel {
        id: Set(LineItemId::new().into_inner()),
        sale_id: Set(sale.id),
        description: Set(plan.description.clone()),
        quantity: Set(plan.quantity),
        unit_price: Set(plan.unit_price),
        subtotal: Set(plan.total),
        created_at: Set(now),
    };
    item.insert(txn).await?;

    Ok(sale)
}
