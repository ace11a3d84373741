//! Property-based tests for the credit policy.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::customer::CreditStanding;

use super::error::CreditError;
use super::policy::{can_extend, can_extend_replacing};

/// Strategy for amounts from 0.00 to 10,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Re-running the check with identical inputs gives an identical verdict.
    #[test]
    fn prop_check_is_idempotent(
        limit in amount(),
        open in amount(),
        additional in amount(),
    ) {
        let standing = CreditStanding {
            credit_limit: limit,
            open_balance: open,
            overdue_balance: Decimal::ZERO,
        };
        let first = can_extend(&standing, additional);
        let second = can_extend(&standing, additional);
        prop_assert_eq!(first.is_ok(), second.is_ok());
    }

    /// The verdict matches the arithmetic definition exactly.
    #[test]
    fn prop_verdict_matches_definition(
        limit in amount(),
        open in amount(),
        additional in amount(),
    ) {
        let standing = CreditStanding {
            credit_limit: limit,
            open_balance: open,
            overdue_balance: Decimal::ZERO,
        };
        let fits = open + additional <= limit;
        prop_assert_eq!(can_extend(&standing, additional).is_ok(), fits);
    }

    /// A rejection always reports the true available credit.
    #[test]
    fn prop_rejection_reports_available(
        limit in amount(),
        open in amount(),
        additional in amount(),
    ) {
        let standing = CreditStanding {
            credit_limit: limit,
            open_balance: open,
            overdue_balance: Decimal::ZERO,
        };
        if let Err(CreditError::LimitExceeded { available }) = can_extend(&standing, additional) {
            prop_assert_eq!(available, (limit - open).max(Decimal::ZERO));
        }
    }

    /// Re-saving a sale unchanged never trips the limit, wherever the
    /// balance sits relative to it.
    #[test]
    fn prop_unchanged_edit_always_fits(
        limit in amount(),
        other_debt in amount(),
        sale_total in amount(),
    ) {
        prop_assume!(other_debt + sale_total <= limit);
        let standing = CreditStanding {
            credit_limit: limit,
            open_balance: other_debt + sale_total,
            overdue_balance: Decimal::ZERO,
        };
        prop_assert!(can_extend_replacing(&standing, sale_total, sale_total).is_ok());
    }
}
