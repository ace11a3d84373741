//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{CENT, format_brl, parse_brl, round_amount, round_quantity};
pub use pagination::{PageRequest, PageResponse};
