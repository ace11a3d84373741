//! Dashboard repository: the at-a-glance numbers for the counter screen.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use serde::Serialize;
use uuid::Uuid;

use fiado_shared::config::CreditConfig;

use crate::entities::{payments, sales, sea_orm_active_enums::SaleStatus};
use crate::repositories::customer::{amounts_paid, balance_due, is_past_threshold};

/// Error types for dashboard queries.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl DashboardError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Database(_) => 500,
        }
    }
}

/// Summary figures for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Combined balance due across all open sales.
    pub open_balance_total: Decimal,
    /// Portion of the open balance past the due date.
    pub overdue_balance_total: Decimal,
    /// Number of open sales.
    pub open_sales: u64,
    /// Number of open sales past their due date.
    pub overdue_sales: u64,
    /// Sales registered today.
    pub sales_today: u64,
    /// Combined total of today's sales.
    pub sales_today_total: Decimal,
    /// Combined value of today's payments.
    pub payments_today_total: Decimal,
    /// Customers with debt past the delinquency threshold.
    pub delinquent_customers: u64,
}

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes the dashboard summary as of `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn summary(
        &self,
        today: NaiveDate,
        config: &CreditConfig,
    ) -> Result<DashboardSummary, DashboardError> {
        let open_sales = sales::Entity::find()
            .filter(sales::Column::Status.eq(SaleStatus::Open))
            .all(&self.db)
            .await?;

        let paid = amounts_paid(&self.db, open_sales.iter().map(|s| s.id)).await?;

        let mut open_balance_total = Decimal::ZERO;
        let mut overdue_balance_total = Decimal::ZERO;
        let mut overdue_sales: u64 = 0;
        let mut delinquent: HashSet<Uuid> = HashSet::new();
        for sale in &open_sales {
            let balance = balance_due(sale.total, paid.get(&sale.id));
            open_balance_total += balance;
            if today > sale.due_date {
                overdue_balance_total += balance;
                overdue_sales += 1;
            }
            if balance > Decimal::ZERO && is_past_threshold(sale.due_date, today, config) {
                delinquent.insert(sale.customer_id);
            }
        }

        let todays_sales = sales::Entity::find()
            .filter(sales::Column::SaleDate.eq(today))
            .all(&self.db)
            .await?;
        let sales_today = todays_sales.len() as u64;
        let sales_today_total = todays_sales.iter().map(|sale| sale.total).sum();

        let todays_payments = payments::Entity::find()
            .filter(payments::Column::PaymentDate.eq(today))
            .all(&self.db)
            .await?;
        let payments_today_total = todays_payments.iter().map(|payment| payment.amount).sum();

        Ok(DashboardSummary {
            open_balance_total,
            overdue_balance_total,
            open_sales: open_sales.len() as u64,
            overdue_sales,
            sales_today,
            sales_today_total,
            payments_today_total,
            delinquent_customers: delinquent.len() as u64,
        })
    }
}
