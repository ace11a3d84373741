//! Sale repository for credit sales and their line items.
//!
//! Every mutation runs inside one database transaction with the customer
//! row locked, so the credit check and the write see the same balances.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use fiado_core::credit::{CreditError, can_extend, can_extend_replacing};
use fiado_core::sale::{
    LineItem, LineItemInput, Sale, SaleError, default_due_date, ensure_deletable,
    ensure_editable, validate_dates, validate_sale_items,
};
use fiado_shared::config::CreditConfig;
use fiado_shared::types::{PageRequest, PageResponse, SaleId, round_amount};

use crate::entities::{customers, payments, sale_items, sales, sea_orm_active_enums::SaleStatus};
use crate::repositories::customer::{amounts_paid, balance_due, standing_for};

/// Error types for sale operations.
#[derive(Debug, thiserror::Error)]
pub enum SaleRepoError {
    /// Sale not found.
    #[error("Sale not found: {0}")]
    NotFound(Uuid),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// A sale rule was violated.
    #[error(transparent)]
    Rule(#[from] SaleError),

    /// The credit policy rejected the sale.
    #[error(transparent)]
    Credit(#[from] CreditError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl SaleRepoError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "SALE_NOT_FOUND",
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::Rule(e) => e.error_code(),
            Self::Credit(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::CustomerNotFound(_) => 404,
            Self::Rule(e) => e.http_status_code(),
            Self::Credit(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

/// Input for creating a sale.
#[derive(Debug, Clone)]
pub struct CreateSaleInput {
    /// The buying customer.
    pub customer_id: Uuid,
    /// Date of purchase.
    pub sale_date: NaiveDate,
    /// Payment deadline; `None` applies the configured term.
    pub due_date: Option<NaiveDate>,
    /// Line items.
    pub items: Vec<LineItemInput>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for editing an open sale. The item list replaces the old one.
#[derive(Debug, Clone)]
pub struct UpdateSaleInput {
    /// Date of purchase.
    pub sale_date: NaiveDate,
    /// Payment deadline; `None` applies the configured term.
    pub due_date: Option<NaiveDate>,
    /// Line items, replacing the previous list atomically.
    pub items: Vec<LineItemInput>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Ordering options for sale listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaleOrder {
    /// Newest sale date first.
    #[default]
    NewestFirst,
    /// Oldest sale date first.
    OldestFirst,
    /// Earliest due date first.
    DueDateAsc,
    /// Largest total first.
    HighestTotal,
}

/// Filter options for listing sales.
#[derive(Debug, Clone, Default)]
pub struct SaleFilter {
    /// Filter by customer.
    pub customer_id: Option<Uuid>,
    /// Filter by status.
    pub status: Option<fiado_core::sale::SaleStatus>,
    /// Only sales past their due date.
    pub overdue_only: bool,
    /// Only system-generated remainder sales, or only regular ones.
    pub is_remainder: Option<bool>,
    /// Filter by sale date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by sale date range end.
    pub date_to: Option<NaiveDate>,
    /// Filter by minimum sale total.
    pub min_total: Option<Decimal>,
    /// Filter by maximum sale total.
    pub max_total: Option<Decimal>,
    /// Result ordering.
    pub order: SaleOrder,
}

/// A sale with its items and derived payment figures.
#[derive(Debug, Clone)]
pub struct SaleWithItems {
    /// Sale header.
    pub sale: Sale,
    /// Line items.
    pub items: Vec<LineItem>,
    /// Sum of registered payments.
    pub amount_paid: Decimal,
    /// Balance still owed, never negative.
    pub balance_due: Decimal,
}

/// Aggregate sale statistics.
#[derive(Debug, Clone, Serialize)]
pub struct SaleStatistics {
    /// Number of sales on record.
    pub total_sales: u64,
    /// Number of open sales.
    pub open_sales: u64,
    /// Number of paid sales.
    pub paid_sales: u64,
    /// Number of open sales past their due date.
    pub overdue_sales: u64,
    /// Combined balance due across open sales.
    pub open_value: Decimal,
    /// Combined total of every sale, paid or open.
    pub total_sold: Decimal,
    /// Average sale total.
    pub average_ticket: Decimal,
}

/// A sale row with derived payment figures, for listings.
#[derive(Debug, Clone)]
pub struct SaleSummary {
    /// Sale header.
    pub sale: Sale,
    /// Sum of registered payments.
    pub amount_paid: Decimal,
    /// Balance still owed, never negative.
    pub balance_due: Decimal,
}

/// Sale repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: DatabaseConnection,
}

impl SaleRepository {
    /// Creates a new sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a sale with its line items.
    ///
    /// The customer row is locked for the duration; the credit check runs
    /// against the balances as of this transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is missing or inactive, the items
    /// are invalid, or the sale would exceed the credit limit.
    pub async fn create_sale(
        &self,
        input: CreateSaleInput,
        config: &CreditConfig,
    ) -> Result<SaleWithItems, SaleRepoError> {
        let txn = self.db.begin().await?;

        let customer = lock_customer(&txn, input.customer_id).await?;
        if !customer.is_active {
            return Err(CreditError::CustomerInactive.into());
        }

        let due_date = input
            .due_date
            .unwrap_or_else(|| default_due_date(input.sale_date, config));
        validate_dates(input.sale_date, due_date)?;

        let (items, total) = validate_sale_items(&input.items, config)?;

        let today = Utc::now().date_naive();
        let standing = standing_for(&txn, &customer, today, config).await?;
        can_extend(&standing, total)?;

        let now = Utc::now().into();
        let sale_id = SaleId::new().into_inner();
        let sale = sales::ActiveModel {
            id: Set(sale_id),
            customer_id: Set(customer.id),
            sale_date: Set(input.sale_date),
            due_date: Set(due_date),
            subtotal: Set(total),
            total: Set(total),
            status: Set(SaleStatus::Open),
            is_remainder: Set(false),
            batch_payment_id: Set(None),
            payment_date: Set(None),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let sale = sale.insert(&txn).await?;

        insert_items(&txn, sale_id, &items).await?;

        txn.commit().await?;

        let sale: Sale = sale.into();
        Ok(SaleWithItems {
            balance_due: sale.total,
            sale,
            items,
            amount_paid: Decimal::ZERO,
        })
    }

    /// Edits an open sale, replacing its item list atomically.
    ///
    /// Only open, user-created sales without payments can change. The credit
    /// check excludes the sale's previous total before testing the new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the sale cannot be edited, the items are invalid,
    /// or the edited total would exceed the credit limit.
    pub async fn update_sale(
        &self,
        id: Uuid,
        input: UpdateSaleInput,
        config: &CreditConfig,
    ) -> Result<SaleWithItems, SaleRepoError> {
        let txn = self.db.begin().await?;

        let sale = lock_sale(&txn, id).await?;
        let customer = lock_customer(&txn, sale.customer_id).await?;

        let payment_count = payments::Entity::find()
            .filter(payments::Column::SaleId.eq(id))
            .count(&txn)
            .await?;
        ensure_editable(sale.status.clone().into(), sale.is_remainder, payment_count)?;

        let due_date = input
            .due_date
            .unwrap_or_else(|| default_due_date(input.sale_date, config));
        validate_dates(input.sale_date, due_date)?;

        let (items, total) = validate_sale_items(&input.items, config)?;

        let today = Utc::now().date_naive();
        let standing = standing_for(&txn, &customer, today, config).await?;
        can_extend_replacing(&standing, sale.total, total)?;

        sale_items::Entity::delete_many()
            .filter(sale_items::Column::SaleId.eq(id))
            .exec(&txn)
            .await?;
        insert_items(&txn, id, &items).await?;

        let mut active: sales::ActiveModel = sale.into();
        active.sale_date = Set(input.sale_date);
        active.due_date = Set(due_date);
        active.subtotal = Set(total);
        active.total = Set(total);
        active.notes = Set(input.notes);
        active.updated_at = Set(Utc::now().into());
        let sale = active.update(&txn).await?;

        txn.commit().await?;

        let sale: Sale = sale.into();
        Ok(SaleWithItems {
            balance_due: sale.total,
            sale,
            items,
            amount_paid: Decimal::ZERO,
        })
    }

    /// Deletes an open sale and its items. Same guards as editing.
    ///
    /// # Errors
    ///
    /// Returns an error if the sale is paid, system-generated, or has
    /// payments registered.
    pub async fn delete_sale(&self, id: Uuid) -> Result<(), SaleRepoError> {
        let txn = self.db.begin().await?;

        let sale = lock_sale(&txn, id).await?;

        let payment_count = payments::Entity::find()
            .filter(payments::Column::SaleId.eq(id))
            .count(&txn)
            .await?;
        ensure_deletable(sale.status.clone().into(), sale.is_remainder, payment_count)?;

        sale_items::Entity::delete_many()
            .filter(sale_items::Column::SaleId.eq(id))
            .exec(&txn)
            .await?;
        sales::Entity::delete_by_id(sale.id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Loads a sale with its items and payment figures.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such sale exists.
    pub async fn get(&self, id: Uuid) -> Result<SaleWithItems, SaleRepoError> {
        let sale = sales::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(SaleRepoError::NotFound(id))?;

        let items = sale_items::Entity::find()
            .filter(sale_items::Column::SaleId.eq(id))
            .order_by_asc(sale_items::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let paid = amounts_paid(&self.db, std::iter::once(id)).await?;
        let amount_paid = paid.get(&id).copied().unwrap_or(Decimal::ZERO);

        let sale: Sale = sale.into();
        Ok(SaleWithItems {
            balance_due: sale.balance_due(amount_paid),
            sale,
            items: items.into_iter().map(Into::into).collect(),
            amount_paid,
        })
    }

    /// Lists sales with filters and pagination, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(
        &self,
        filter: &SaleFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<SaleSummary>, SaleRepoError> {
        let mut query = sales::Entity::find();

        if let Some(customer_id) = filter.customer_id {
            query = query.filter(sales::Column::CustomerId.eq(customer_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(sales::Column::Status.eq(SaleStatus::from(status)));
        }
        if filter.overdue_only {
            let today = Utc::now().date_naive();
            query = query
                .filter(sales::Column::Status.eq(SaleStatus::Open))
                .filter(sales::Column::DueDate.lt(today));
        }
        if let Some(is_remainder) = filter.is_remainder {
            query = query.filter(sales::Column::IsRemainder.eq(is_remainder));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(sales::Column::SaleDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(sales::Column::SaleDate.lte(to));
        }
        if let Some(min) = filter.min_total {
            query = query.filter(sales::Column::Total.gte(min));
        }
        if let Some(max) = filter.max_total {
            query = query.filter(sales::Column::Total.lte(max));
        }

        let total = query.clone().count(&self.db).await?;

        query = match filter.order {
            SaleOrder::NewestFirst => query
                .order_by_desc(sales::Column::SaleDate)
                .order_by_desc(sales::Column::CreatedAt),
            SaleOrder::OldestFirst => query
                .order_by_asc(sales::Column::SaleDate)
                .order_by_asc(sales::Column::CreatedAt),
            SaleOrder::DueDateAsc => query.order_by_asc(sales::Column::DueDate),
            SaleOrder::HighestTotal => query.order_by_desc(sales::Column::Total),
        };

        let rows = query
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let paid = amounts_paid(&self.db, rows.iter().map(|s| s.id)).await?;
        let data = rows
            .into_iter()
            .map(|sale| {
                let amount_paid = paid.get(&sale.id).copied().unwrap_or(Decimal::ZERO);
                let sale: Sale = sale.into();
                SaleSummary {
                    balance_due: sale.balance_due(amount_paid),
                    sale,
                    amount_paid,
                }
            })
            .collect();

        Ok(PageResponse::new(
            data,
            page.page,
            page.clamped_per_page(),
            total,
        ))
    }

    /// Computes aggregate sale statistics, optionally for one customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn statistics(
        &self,
        customer_id: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<SaleStatistics, SaleRepoError> {
        let mut query = sales::Entity::find();
        if let Some(customer_id) = customer_id {
            query = query.filter(sales::Column::CustomerId.eq(customer_id));
        }
        let rows = query.all(&self.db).await?;

        let open_ids: Vec<Uuid> = rows
            .iter()
            .filter(|sale| sale.status == SaleStatus::Open)
            .map(|sale| sale.id)
            .collect();
        let paid = amounts_paid(&self.db, open_ids.into_iter()).await?;

        let mut stats = SaleStatistics {
            total_sales: rows.len() as u64,
            open_sales: 0,
            paid_sales: 0,
            overdue_sales: 0,
            open_value: Decimal::ZERO,
            total_sold: Decimal::ZERO,
            average_ticket: Decimal::ZERO,
        };

        for sale in &rows {
            stats.total_sold += sale.total;
            match sale.status {
                SaleStatus::Open => {
                    stats.open_sales += 1;
                    stats.open_value += balance_due(sale.total, paid.get(&sale.id));
                    if today > sale.due_date {
                        stats.overdue_sales += 1;
                    }
                }
                SaleStatus::Paid => stats.paid_sales += 1,
            }
        }

        if stats.total_sales > 0 {
            stats.average_ticket =
                round_amount(stats.total_sold / Decimal::from(stats.total_sales));
        }

        Ok(stats)
    }

    /// Lists a customer's open sales with balances, oldest due first.
    ///
    /// This is the selection list for batch payments.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_open_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<SaleSummary>, SaleRepoError> {
        let rows = sales::Entity::find()
            .filter(sales::Column::CustomerId.eq(customer_id))
            .filter(sales::Column::Status.eq(SaleStatus::Open))
            .order_by_asc(sales::Column::DueDate)
            .all(&self.db)
            .await?;

        let paid = amounts_paid(&self.db, rows.iter().map(|s| s.id)).await?;
        Ok(rows
            .into_iter()
            .map(|sale| {
                let amount_paid = paid.get(&sale.id).copied().unwrap_or(Decimal::ZERO);
                let sale: Sale = sale.into();
                SaleSummary {
                    balance_due: sale.balance_due(amount_paid),
                    sale,
                    amount_paid,
                }
            })
            .collect())
    }
}

/// Locks the customer row for the duration of the transaction.
async fn lock_customer(
    txn: &DatabaseTransaction,
    id: Uuid,
) -> Result<customers::Model, SaleRepoError> {
    customers::Entity::find_by_id(id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(SaleRepoError::CustomerNotFound(id))
}

/// Locks the sale row for the duration of the transaction.
async fn lock_sale(txn: &DatabaseTransaction, id: Uuid) -> Result<sales::Model, SaleRepoError> {
    sales::Entity::find_by_id(id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(SaleRepoError::NotFound(id))
}

/// Inserts validated line items for a sale.
async fn insert_items(
    txn: &DatabaseTransaction,
    sale_id: Uuid,
    items: &[LineItem],
) -> Result<(), SaleRepoError> {
    let now = Utc::now().into();
    for item in items {
        let row = sale_items::ActiveModel {
            id: Set(item.id.into_inner()),
            sale_id: Set(sale_id),
            description: Set(item.description.clone()),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            subtotal: Set(item.subtotal),
            created_at: Set(now),
        };
        row.insert(txn).await?;
    }
    Ok(())
}
