//! Credit limit policy.
//!
//! Pure decisions over a [`CreditStanding`](crate::customer::CreditStanding)
//! snapshot. The repository re-evaluates these checks inside the same
//! database transaction that writes the sale, with the customer row locked.

pub mod error;
pub mod policy;

#[cfg(test)]
mod policy_props;

pub use error::CreditError;
pub use policy::{can_extend, can_extend_replacing};
