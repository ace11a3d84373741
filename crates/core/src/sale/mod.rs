//! Sales, line items, and the status machine.
//!
//! A sale is a dated purchase on credit with one or more line items. Status
//! transitions are an explicit function of the balance due; nothing moves a
//! sale between states as a side effect.

pub mod error;
pub mod types;
pub mod validation;

pub use error::SaleError;
pub use types::{LineItem, LineItemInput, Sale, SaleStatus, resolve_status};
pub use validation::{
    default_due_date, ensure_deletable, ensure_editable, validate_dates, validate_line_item,
    validate_sale_items,
};
