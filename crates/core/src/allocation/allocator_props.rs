//! Property-based tests for the payment allocator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use fiado_shared::types::{CENT, SaleId};

use super::allocator::{SaleBalance, allocate};

/// Strategy for a balance from 0.01 to 10,000.00.
fn balance() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for 1 to 8 open sales.
fn sale_set() -> impl Strategy<Value = Vec<SaleBalance>> {
    prop::collection::vec(balance(), 1..=8).prop_map(|balances| {
        balances
            .into_iter()
            .map(|balance_due| SaleBalance {
                sale_id: SaleId::new(),
                balance_due,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Allocations never exceed the paid amount, and no sale receives more
    /// than it was owed.
    #[test]
    fn prop_allocation_sums(sales in sale_set(), paid_cents in 1i64..1_000_000i64) {
        let paid = Decimal::new(paid_cents, 2);
        let outcome = allocate(paid, &sales).unwrap();

        prop_assert!(outcome.total_allocated <= paid);
        for (allocation, sale) in outcome.allocations.iter().zip(&sales) {
            prop_assert!(allocation.amount >= Decimal::ZERO);
            prop_assert!(
                allocation.amount <= sale.balance_due,
                "allocated {} over balance {}",
                allocation.amount,
                sale.balance_due
            );
        }
    }

    /// The remainder is exactly the debt the payment did not cover.
    #[test]
    fn prop_remainder_correctness(sales in sale_set(), paid_cents in 1i64..1_000_000i64) {
        let paid = Decimal::new(paid_cents, 2);
        let total: Decimal = sales.iter().map(|s| s.balance_due).sum();
        let outcome = allocate(paid, &sales).unwrap();

        if paid < total {
            prop_assert_eq!(outcome.remainder, total - paid);
        } else {
            prop_assert_eq!(outcome.remainder, Decimal::ZERO);
        }
    }

    /// Paying the exact total allocates everything and settles every sale.
    #[test]
    fn prop_exact_payment_settles_all(sales in sale_set()) {
        let total: Decimal = sales.iter().map(|s| s.balance_due).sum();
        let outcome = allocate(total, &sales).unwrap();

        prop_assert_eq!(outcome.remainder, Decimal::ZERO);
        prop_assert!(!outcome.generates_remainder());
        for allocation in &outcome.allocations {
            prop_assert!(allocation.settled);
        }
        // Everything allocated, modulo undistributed rounding pennies.
        prop_assert!(outcome.undistributed() >= Decimal::ZERO);
    }

    /// A sale is flagged settled exactly when its leftover is within one cent.
    #[test]
    fn prop_settled_flag_matches_tolerance(sales in sale_set(), paid_cents in 1i64..1_000_000i64) {
        let paid = Decimal::new(paid_cents, 2);
        let outcome = allocate(paid, &sales).unwrap();

        for allocation in &outcome.allocations {
            let leftover = allocation.original_balance - allocation.amount;
            prop_assert_eq!(allocation.settled, leftover <= CENT);
        }
    }

    /// Undistributed pennies are bounded by one cent per sale.
    #[test]
    fn prop_undistributed_is_rounding_noise(sales in sale_set(), paid_cents in 1i64..1_000_000i64) {
        let paid = Decimal::new(paid_cents, 2);
        let outcome = allocate(paid, &sales).unwrap();

        let bound = CENT * Decimal::from(sales.len());
        prop_assert!(outcome.undistributed() >= Decimal::ZERO);
        prop_assert!(
            outcome.undistributed() <= bound,
            "undistributed {} over bound {}",
            outcome.undistributed(),
            bound
        );
    }

    /// The allocator is deterministic: same inputs, same outcome.
    #[test]
    fn prop_deterministic(sales in sale_set(), paid_cents in 1i64..1_000_000i64) {
        let paid = Decimal::new(paid_cents, 2);
        let first = allocate(paid, &sales).unwrap();
        let second = allocate(paid, &sales).unwrap();
        prop_assert_eq!(first, second);
    }
}
