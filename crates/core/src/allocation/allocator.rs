//! The payment allocator.

use rust_decimal::Decimal;
use serde::Serialize;

use fiado_shared::types::{CENT, SaleId, round_amount};

use super::error::AllocationError;

/// One open sale as seen by the allocator: id plus its balance due.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaleBalance {
    /// The sale.
    pub sale_id: SaleId,
    /// Outstanding balance at allocation time. Must be positive.
    pub balance_due: Decimal,
}

/// The allocator's verdict for one sale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Allocation {
    /// The sale.
    pub sale_id: SaleId,
    /// Balance the sale carried going in.
    pub original_balance: Decimal,
    /// Amount of the payment applied to this sale. May be zero when the
    /// paid amount ran out before this sale's turn.
    pub amount: Decimal,
    /// True when the allocation settles the sale (within one cent).
    pub settled: bool,
}

impl Allocation {
    /// Balance left on the sale after this allocation.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        self.original_balance - self.amount
    }
}

/// Result of distributing one payment across a set of sales.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationOutcome {
    /// Per-sale allocations, one per input sale, in input order.
    pub allocations: Vec<Allocation>,
    /// Combined balance of the input sales.
    pub total_balance: Decimal,
    /// Paid amount after the defensive clamp to the total balance.
    pub amount_applied: Decimal,
    /// Sum of the per-sale allocations.
    pub total_allocated: Decimal,
    /// Debt the payment did not cover: `max(total_balance - paid, 0)`.
    pub remainder: Decimal,
}

impl AllocationOutcome {
    /// Pennies the rounding clamps left unassigned to any sale.
    ///
    /// By design these are not redistributed; they fold into the remainder.
    #[must_use]
    pub fn undistributed(&self) -> Decimal {
        self.amount_applied - self.total_allocated
    }

    /// True when the leftover debt warrants a remainder sale.
    ///
    /// Sub-cent noise is treated as fully paid.
    #[must_use]
    pub fn generates_remainder(&self) -> bool {
        self.remainder > CENT
    }
}

/// Distributes `amount` across `sales` proportionally to their balances.
///
/// Sales are processed in the given order; the caller sorts (oldest due
/// first, by convention). For each sale the share is
/// `min(amount * balance/total, balance, remaining)`, rounded half-up to
/// 2 decimals. Leftover pennies from rounding clamps stay undistributed.
/// Amounts beyond the combined balance are clamped; rejecting overpayment
/// is the caller's job. A combined balance of zero yields an empty outcome
/// with remainder zero.
///
/// # Errors
///
/// Returns an error when no sales are given or the amount is not positive.
pub fn allocate(
    amount: Decimal,
    sales: &[SaleBalance],
) -> Result<AllocationOutcome, AllocationError> {
    if sales.is_empty() {
        return Err(AllocationError::NoSales);
    }
    let amount = round_amount(amount);
    if amount <= Decimal::ZERO {
        return Err(AllocationError::NonPositiveAmount);
    }

    let total_balance: Decimal = sales.iter().map(|sale| sale.balance_due).sum();
    if total_balance <= Decimal::ZERO {
        return Ok(AllocationOutcome {
            allocations: Vec::new(),
            total_balance: Decimal::ZERO,
            amount_applied: Decimal::ZERO,
            total_allocated: Decimal::ZERO,
            remainder: Decimal::ZERO,
        });
    }
    let amount_applied = amount.min(total_balance);

    let mut remaining = amount_applied;
    let mut allocations = Vec::with_capacity(sales.len());

    for sale in sales {
        let allocated = if remaining <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            let proportion = sale.balance_due / total_balance;
            let raw_share = amount_applied * proportion;
            round_amount(raw_share.min(sale.balance_due).min(remaining))
        };

        remaining -= allocated;
        allocations.push(Allocation {
            sale_id: sale.sale_id,
            original_balance: sale.balance_due,
            amount: allocated,
            settled: sale.balance_due - allocated <= CENT,
        });
    }

    let total_allocated = amount_applied - remaining;
    let remainder = (total_balance - amount_applied).max(Decimal::ZERO);

    Ok(AllocationOutcome {
        allocations,
        total_balance,
        amount_applied,
        total_allocated,
        remainder,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sales(balances: &[Decimal]) -> Vec<SaleBalance> {
        balances
            .iter()
            .map(|&balance_due| SaleBalance {
                sale_id: SaleId::new(),
                balance_due,
            })
            .collect()
    }

    // Balances 15 / 30 / 25, payment 50: proportional shares round to
    // 10.71, 21.43, 17.86 and the remainder sale carries 20.00.
    #[test]
    fn test_proportional_distribution() {
        let sales = sales(&[dec!(15.00), dec!(30.00), dec!(25.00)]);
        let outcome = allocate(dec!(50.00), &sales).unwrap();

        let amounts: Vec<Decimal> = outcome.allocations.iter().map(|a| a.amount).collect();
        assert_eq!(amounts, vec![dec!(10.71), dec!(21.43), dec!(17.86)]);
        assert_eq!(outcome.total_allocated, dec!(50.00));
        assert_eq!(outcome.remainder, dec!(20.00));
        assert!(outcome.generates_remainder());
        assert!(outcome.allocations.iter().all(|a| !a.settled));
    }

    #[test]
    fn test_full_payment_settles_everything() {
        let sales = sales(&[dec!(15.00), dec!(30.00), dec!(25.00)]);
        let outcome = allocate(dec!(70.00), &sales).unwrap();

        assert_eq!(outcome.total_allocated, dec!(70.00));
        assert_eq!(outcome.remainder, Decimal::ZERO);
        assert!(!outcome.generates_remainder());
        for allocation in &outcome.allocations {
            assert_eq!(allocation.amount, allocation.original_balance);
            assert!(allocation.settled);
        }
    }

    #[test]
    fn test_overpayment_is_clamped() {
        let sales = sales(&[dec!(10.00), dec!(20.00)]);
        let outcome = allocate(dec!(100.00), &sales).unwrap();
        assert_eq!(outcome.amount_applied, dec!(30.00));
        assert_eq!(outcome.total_allocated, dec!(30.00));
        assert_eq!(outcome.remainder, Decimal::ZERO);
    }

    #[test]
    fn test_early_sales_absorb_the_clamp() {
        // Equal balances: identical shares; the paid amount runs out in
        // input order when rounding eats the budget.
        let sales = sales(&[dec!(0.10), dec!(0.10), dec!(0.10)]);
        let outcome = allocate(dec!(0.25), &sales).unwrap();

        let amounts: Vec<Decimal> = outcome.allocations.iter().map(|a| a.amount).collect();
        // Shares are 0.0833.. -> 0.08 each; 0.01 stays undistributed.
        assert_eq!(amounts, vec![dec!(0.08), dec!(0.08), dec!(0.08)]);
        assert_eq!(outcome.undistributed(), dec!(0.01));
        assert_eq!(outcome.remainder, dec!(0.05));
    }

    #[test]
    fn test_sub_cent_remainder_treated_as_paid() {
        let sales = sales(&[dec!(10.00)]);
        let outcome = allocate(dec!(9.99), &sales).unwrap();
        assert_eq!(outcome.remainder, dec!(0.01));
        assert!(!outcome.generates_remainder());
        assert!(outcome.allocations[0].settled);
    }

    #[test]
    fn test_zero_allocation_rows_are_recorded() {
        let sales = sales(&[dec!(99.00), dec!(1.00)]);
        let outcome = allocate(dec!(0.01), &sales).unwrap();
        assert_eq!(outcome.allocations.len(), 2);
        assert_eq!(outcome.allocations[0].amount, dec!(0.01));
        assert_eq!(outcome.allocations[1].amount, Decimal::ZERO);
    }

    #[test]
    fn test_input_validation() {
        assert_eq!(allocate(dec!(10.00), &[]), Err(AllocationError::NoSales));

        let sales = sales(&[dec!(10.00)]);
        assert_eq!(
            allocate(dec!(0.00), &sales),
            Err(AllocationError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_zero_total_balance_yields_empty_outcome() {
        let drained = SaleBalance {
            sale_id: SaleId::new(),
            balance_due: Decimal::ZERO,
        };
        let outcome = allocate(dec!(10.00), &[drained]).unwrap();
        assert!(outcome.allocations.is_empty());
        assert_eq!(outcome.total_allocated, Decimal::ZERO);
        assert_eq!(outcome.remainder, Decimal::ZERO);
        assert!(!outcome.generates_remainder());
    }
}
