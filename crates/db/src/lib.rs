//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! The repositories are the operation façade: every ledger mutation runs
//! inside one database transaction, delegates its decisions to
//! `fiado-core`, and either commits as a whole or rolls back.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    CustomerRepository, DashboardRepository, PaymentRepository, SaleRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
