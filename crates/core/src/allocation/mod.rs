//! Proportional payment distribution across open sales.
//!
//! This module implements the batch-payment algorithm:
//! - The allocator splits one paid amount across several open sales,
//!   proportionally to their balances, with sequential clamping
//! - The remainder planner synthesizes the follow-up sale that carries
//!   whatever debt the payment did not cover
//!
//! Both are pure, so the "simulate distribution" preview is a direct call
//! to [`allocate`] with no persistence involved.

pub mod allocator;
pub mod error;
pub mod remainder;

#[cfg(test)]
mod allocator_props;

pub use allocator::{Allocation, AllocationOutcome, SaleBalance, allocate};
pub use error::AllocationError;
pub use remainder::{RemainderPlan, plan_remainder_sale, remainder_item_description};
