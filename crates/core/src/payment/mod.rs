//! Payment rules and receipt data.
//!
//! Payments are immutable once registered. Cash payments carry the amount
//! tendered and the change handed back; card and Pix do not.

pub mod error;
pub mod receipt;
pub mod types;
pub mod validation;

pub use error::PaymentError;
pub use receipt::{BatchReceipt, PaidSaleLine, Receipt};
pub use types::{Payment, PaymentMethod, PaymentPlan};
pub use validation::validate_payment;
