//! Customer records and credit standing.
//!
//! This module implements the customer side of the ledger:
//! - Customer domain types
//! - Credit standing snapshots (open/overdue balances)
//! - Registration validation and lifecycle guards

pub mod error;
pub mod types;
pub mod validation;

pub use error::CustomerError;
pub use types::{CreditStanding, Customer, CustomerInput};
pub use validation::{ensure_can_deactivate, ensure_can_delete, validate_customer_input};
