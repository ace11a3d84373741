//! Customer repository for registration, credit standing, and lifecycle.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use fiado_core::customer::{
    CreditStanding, Customer, CustomerError, CustomerInput, ensure_can_deactivate,
    ensure_can_delete, validate_customer_input,
};
use fiado_shared::config::CreditConfig;
use fiado_shared::cpf::{strip_cpf, validate_cpf};
use fiado_shared::types::{CustomerId, PageRequest, PageResponse};

use crate::entities::{customers, payments, sales, sea_orm_active_enums::SaleStatus};

/// Error types for customer operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomerRepoError {
    /// Customer not found.
    #[error("Customer not found: {0}")]
    NotFound(Uuid),

    /// Another customer already holds this CPF.
    #[error("CPF already registered: {0}")]
    CpfTaken(String),

    /// A business rule was violated.
    #[error(transparent)]
    Rule(#[from] CustomerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl CustomerRepoError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::CpfTaken(_) => "CPF_TAKEN",
            Self::Rule(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::CpfTaken(_) => 409,
            Self::Rule(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

/// A customer flagged as delinquent, with the amounts behind the flag.
#[derive(Debug, Clone)]
pub struct DelinquentCustomer {
    /// The customer.
    pub customer: Customer,
    /// Balance past due beyond the configured threshold.
    pub overdue_balance: Decimal,
    /// Due date of the oldest overdue sale.
    pub oldest_due_date: NaiveDate,
}

/// Customer repository for CRUD and credit-standing queries.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a customer.
    ///
    /// The CPF is stored digits-only; a missing credit limit falls back to
    /// the configured default.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the CPF is already registered,
    /// or the database operation fails.
    pub async fn create(
        &self,
        input: CustomerInput,
        config: &CreditConfig,
    ) -> Result<Customer, CustomerRepoError> {
        validate_customer_input(&input, validate_cpf)?;

        let cpf = normalized_cpf(input.cpf.as_deref());
        if let Some(cpf) = &cpf {
            self.ensure_cpf_free(cpf, None).await?;
        }

        let now = Utc::now().into();
        let customer = customers::ActiveModel {
            id: Set(CustomerId::new().into_inner()),
            name: Set(input.name.trim().to_string()),
            cpf: Set(cpf),
            phone: Set(input.phone),
            address: Set(input.address),
            credit_limit: Set(input.credit_limit.unwrap_or(config.default_credit_limit)),
            is_active: Set(true),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = customer.insert(&self.db).await?;
        Ok(result.into())
    }

    /// Updates a customer's registration data.
    ///
    /// A `None` credit limit keeps the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer does not exist, validation fails,
    /// or the CPF belongs to someone else.
    pub async fn update(
        &self,
        id: Uuid,
        input: CustomerInput,
    ) -> Result<Customer, CustomerRepoError> {
        validate_customer_input(&input, validate_cpf)?;

        let existing = self.find_model(id).await?;

        let cpf = normalized_cpf(input.cpf.as_deref());
        if let Some(cpf) = &cpf {
            self.ensure_cpf_free(cpf, Some(id)).await?;
        }

        let mut active: customers::ActiveModel = existing.into();
        active.name = Set(input.name.trim().to_string());
        active.cpf = Set(cpf);
        active.phone = Set(input.phone);
        active.address = Set(input.address);
        if let Some(limit) = input.credit_limit {
            active.credit_limit = Set(limit);
        }
        active.notes = Set(input.notes);
        active.updated_at = Set(Utc::now().into());

        let result = active.update(&self.db).await?;
        Ok(result.into())
    }

    /// Finds a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such customer exists.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Customer, CustomerRepoError> {
        Ok(self.find_model(id).await?.into())
    }

    async fn find_model(&self, id: Uuid) -> Result<customers::Model, CustomerRepoError> {
        customers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CustomerRepoError::NotFound(id))
    }

    /// Lists customers with optional search over name, CPF, and phone.
    ///
    /// Inactive customers are included only when `include_inactive` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(
        &self,
        page: &PageRequest,
        search: Option<&str>,
        include_inactive: bool,
    ) -> Result<PageResponse<Customer>, CustomerRepoError> {
        let mut query = customers::Entity::find();

        if !include_inactive {
            query = query.filter(customers::Column::IsActive.eq(true));
        }
        if let Some(term) = search {
            let term = term.trim();
            if !term.is_empty() {
                let digits = strip_cpf(term);
                let mut condition = Condition::any()
                    .add(customers::Column::Name.contains(term))
                    .add(customers::Column::Phone.contains(term));
                if !digits.is_empty() {
                    condition = condition.add(customers::Column::Cpf.contains(&digits));
                }
                query = query.filter(condition);
            }
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_asc(customers::Column::Name)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(
            data.into_iter().map(Customer::from).collect(),
            page.page,
            page.clamped_per_page(),
            total,
        ))
    }

    /// Computes the customer's credit standing from their open sales.
    ///
    /// The overdue balance counts only sales past due beyond the configured
    /// delinquency threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer does not exist or a query fails.
    pub async fn credit_standing(
        &self,
        id: Uuid,
        today: NaiveDate,
        config: &CreditConfig,
    ) -> Result<CreditStanding, CustomerRepoError> {
        let customer = self.find_model(id).await?;
        let standing = standing_for(&self.db, &customer, today, config).await?;
        Ok(standing)
    }

    /// Deactivates a customer. Blocked while any sale is still open.
    ///
    /// # Errors
    ///
    /// Returns `HasOpenSales` when the customer owes anything.
    pub async fn deactivate(&self, id: Uuid) -> Result<Customer, CustomerRepoError> {
        let txn = self.db.begin().await?;

        let customer = customers::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CustomerRepoError::NotFound(id))?;

        let open_sales = sales::Entity::find()
            .filter(sales::Column::CustomerId.eq(id))
            .filter(sales::Column::Status.eq(SaleStatus::Open))
            .count(&txn)
            .await?;
        ensure_can_deactivate(open_sales)?;

        let mut active: customers::ActiveModel = customer.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        let result = active.update(&txn).await?;

        txn.commit().await?;
        Ok(result.into())
    }

    /// Reactivates a previously deactivated customer.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such customer exists.
    pub async fn reactivate(&self, id: Uuid) -> Result<Customer, CustomerRepoError> {
        let customer = self.find_model(id).await?;

        let mut active: customers::ActiveModel = customer.into();
        active.is_active = Set(true);
        active.updated_at = Set(Utc::now().into());
        let result = active.update(&self.db).await?;
        Ok(result.into())
    }

    /// Deletes a customer. Blocked when any sale exists, paid or open.
    ///
    /// # Errors
    ///
    /// Returns `HasSaleHistory` when the customer has purchase history.
    pub async fn delete(&self, id: Uuid) -> Result<(), CustomerRepoError> {
        let txn = self.db.begin().await?;

        let customer = customers::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CustomerRepoError::NotFound(id))?;

        let total_sales = sales::Entity::find()
            .filter(sales::Column::CustomerId.eq(id))
            .count(&txn)
            .await?;
        ensure_can_delete(total_sales)?;

        customers::Entity::delete_by_id(customer.id)
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    /// Lists customers with balances past due beyond the delinquency
    /// threshold, oldest debt first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_delinquent(
        &self,
        today: NaiveDate,
        config: &CreditConfig,
    ) -> Result<Vec<DelinquentCustomer>, CustomerRepoError> {
        let open_sales = sales::Entity::find()
            .filter(sales::Column::Status.eq(SaleStatus::Open))
            .order_by_asc(sales::Column::DueDate)
            .all(&self.db)
            .await?;

        let paid = amounts_paid(&self.db, open_sales.iter().map(|s| s.id)).await?;

        // customer_id -> (overdue balance, oldest overdue due date)
        let mut overdue: HashMap<Uuid, (Decimal, NaiveDate)> = HashMap::new();
        for sale in &open_sales {
            if !is_past_threshold(sale.due_date, today, config) {
                continue;
            }
            let balance = balance_due(sale.total, paid.get(&sale.id));
            if balance <= Decimal::ZERO {
                continue;
            }
            overdue
                .entry(sale.customer_id)
                .and_modify(|(total, oldest)| {
                    *total += balance;
                    *oldest = (*oldest).min(sale.due_date);
                })
                .or_insert((balance, sale.due_date));
        }

        if overdue.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = overdue.keys().copied().collect();
        let customers = customers::Entity::find()
            .filter(customers::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        let mut result: Vec<DelinquentCustomer> = customers
            .into_iter()
            .filter_map(|customer| {
                overdue
                    .get(&customer.id)
                    .map(|&(overdue_balance, oldest_due_date)| DelinquentCustomer {
                        customer: customer.into(),
                        overdue_balance,
                        oldest_due_date,
                    })
            })
            .collect();
        result.sort_by_key(|d| d.oldest_due_date);
        Ok(result)
    }

    /// Fails with `CpfTaken` when another customer holds the CPF.
    async fn ensure_cpf_free(
        &self,
        cpf: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), CustomerRepoError> {
        let mut query = customers::Entity::find().filter(customers::Column::Cpf.eq(cpf));
        if let Some(id) = exclude {
            query = query.filter(customers::Column::Id.ne(id));
        }
        if query.count(&self.db).await? > 0 {
            return Err(CustomerRepoError::CpfTaken(cpf.to_string()));
        }
        Ok(())
    }
}

/// Digits-only CPF; blank input counts as absent.
fn normalized_cpf(cpf: Option<&str>) -> Option<String> {
    let cpf = cpf?.trim();
    if cpf.is_empty() {
        return None;
    }
    Some(strip_cpf(cpf))
}

/// True when the sale is overdue past the delinquency threshold.
pub(crate) fn is_past_threshold(due_date: NaiveDate, today: NaiveDate, config: &CreditConfig) -> bool {
    (today - due_date).num_days() > config.delinquency_days
}

/// Balance still owed given an optional paid sum.
pub(crate) fn balance_due(total: Decimal, paid: Option<&Decimal>) -> Decimal {
    (total - paid.copied().unwrap_or(Decimal::ZERO)).max(Decimal::ZERO)
}

/// Sums registered payments per sale.
pub(crate) async fn amounts_paid<C>(
    conn: &C,
    sale_ids: impl Iterator<Item = Uuid>,
) -> Result<HashMap<Uuid, Decimal>, DbErr>
where
    C: ConnectionTrait,
{
    let ids: Vec<Uuid> = sale_ids.collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = payments::Entity::find()
        .filter(payments::Column::SaleId.is_in(ids))
        .all(conn)
        .await?;

    let mut sums: HashMap<Uuid, Decimal> = HashMap::new();
    for row in rows {
        *sums.entry(row.sale_id).or_insert(Decimal::ZERO) += row.amount;
    }
    Ok(sums)
}

/// Computes a credit standing snapshot over any connection, so the sale
/// repository can reuse it inside a write transaction with the customer
/// row locked.
pub(crate) async fn standing_for<C>(
    conn: &C,
    customer: &customers::Model,
    today: NaiveDate,
    config: &CreditConfig,
) -> Result<CreditStanding, DbErr>
where
    C: ConnectionTrait,
{
    let open_sales = sales::Entity::find()
        .filter(sales::Column::CustomerId.eq(customer.id))
        .filter(sales::Column::Status.eq(SaleStatus::Open))
        .all(conn)
        .await?;

    // Each open sale consumes its full total against the limit; partial
    // payments free credit only when the sale settles.
    let mut open_balance = Decimal::ZERO;
    let mut overdue_balance = Decimal::ZERO;
    for sale in &open_sales {
        open_balance += sale.total;
        if is_past_threshold(sale.due_date, today, config) {
            overdue_balance += sale.total;
        }
    }

    Ok(CreditStanding {
        credit_limit: customer.credit_limit,
        open_balance,
        overdue_balance,
    })
}
