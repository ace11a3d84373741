//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Business decisions are delegated to `fiado-core`; the
//! repositories supply locking, transactions, and persistence.

pub mod customer;
pub mod dashboard;
pub mod payment;
pub mod sale;

pub use customer::{CustomerRepoError, CustomerRepository, DelinquentCustomer};
pub use dashboard::{DashboardError, DashboardRepository, DashboardSummary};
pub use payment::{
    BatchPaymentInput, BatchPaymentResult, PaymentRepoError, PaymentRepository,
    RegisterPaymentInput,
};
pub use sale::{
    CreateSaleInput, SaleFilter, SaleOrder, SaleRepoError, SaleRepository, SaleStatistics,
    SaleSummary, SaleWithItems, UpdateSaleInput,
};
