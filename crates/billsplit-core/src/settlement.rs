//! # Settlement
//!
//! The single entry point: one bill in, the transfers that settle it out.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Bill ──► validate ──► BalanceSheet ──► net balances ──► match_balances │
//! │            │               │                                  │         │
//! │            │     distribute each item                         ▼         │
//! │            │     (exact Rational)                      exact invoices   │
//! │            │                                                  │         │
//! │            ▼                                                  ▼         │
//! │     SettlementError                round_invoices + fix_invoices_total  │
//! │     (first failure)                                           │         │
//! │                                                               ▼         │
//! │                                                      Vec<Invoice>       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure and deterministic: the same bill always yields the same invoices in
//! the same order. Safe to call from any number of threads at once.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::balance::BalanceSheet;
use crate::error::SettlementResult;
use crate::matcher::match_balances;
use crate::rounding::{fix_invoices_total, round_invoices, target_total, RoundingBias};
use crate::types::{Bill, Invoice};

/// Knobs for a single settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettlementOptions {
    #[serde(default)]
    pub bias: RoundingBias,
}

impl SettlementOptions {
    pub fn with_bias(bias: RoundingBias) -> Self {
        SettlementOptions { bias }
    }
}

/// Settles a bill with default options.
///
/// ## Example
/// ```rust
/// use billsplit_core::{settle, Bill, BillItem, Money, UserId};
///
/// let bill = Bill::default()
///     .with_item(
///         BillItem::new("Cake", Money::from_cents(10000), 1)
///             .with_share(UserId(1), 1)
///             .with_share(UserId(2), 1)
///             .with_share(UserId(3), 1),
///     )
///     .with_payment(UserId(5), Money::from_cents(10000));
///
/// let invoices = settle(&bill).unwrap();
/// let values: Vec<String> = invoices.iter().map(|i| i.value.to_string()).collect();
/// assert_eq!(values, ["33.34", "33.33", "33.33"]);
/// ```
pub fn settle(bill: &Bill) -> SettlementResult<Vec<Invoice>> {
    settle_with(bill, &SettlementOptions::default())
}

/// Settles a bill.
///
/// Either every invoice is returned or an error is; there are no partial
/// results.
pub fn settle_with(bill: &Bill, options: &SettlementOptions) -> SettlementResult<Vec<Invoice>> {
    let sheet = BalanceSheet::from_bill(bill)?;
    let balances = sheet.net_balances()?;

    let exact = match_balances(&balances)?;
    let target = target_total(&sheet.total_credit(), options.bias)?;

    debug!(
        bill_id = bill.id.0,
        participants = balances.len(),
        transfers = exact.len(),
        %target,
        bias = %options.bias,
        "Balances matched"
    );

    let rounded = round_invoices(&exact)?;
    fix_invoices_total(rounded, target)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SettlementError;
    use crate::money::Money;
    use crate::rational::Rational;
    use crate::types::{invoices_total, BillItem, UserId};
    use std::collections::BTreeMap;

    fn invoice(from: i64, to: i64, cents: i64) -> Invoice {
        Invoice::new(UserId(from), UserId(to), Money::from_cents(cents))
    }

    fn split(title: &str, cents: i64, users: &[i64]) -> BillItem {
        users.iter().fold(
            BillItem::new(title, Money::from_cents(cents), 1),
            |item, user| item.with_share(UserId(*user), 1),
        )
    }

    fn cake_bill() -> Bill {
        Bill::default()
            .with_item(split("Cake", 10000, &[1, 2, 3]))
            .with_payment(UserId(5), Money::from_cents(10000))
    }

    /// Net money received minus money paid, per user.
    fn settled_positions(invoices: &[Invoice]) -> BTreeMap<UserId, Money> {
        let mut positions = BTreeMap::new();
        for invoice in invoices {
            *positions.entry(invoice.user_to).or_insert_with(Money::zero) += invoice.value;
            *positions.entry(invoice.user_from).or_insert_with(Money::zero) -= invoice.value;
        }
        positions
    }

    #[test]
    fn test_three_way_cake() {
        let invoices = settle(&cake_bill()).unwrap();
        assert_eq!(
            invoices,
            vec![invoice(1, 5, 3334), invoice(2, 5, 3333), invoice(3, 5, 3333)]
        );
        assert_eq!(invoices_total(&invoices), Money::from_cents(10000));
    }

    #[test]
    fn test_payer_shares_the_item() {
        let bill = Bill::default()
            .with_item(split("Lunch", 1000, &[1, 2]))
            .with_payment(UserId(1), Money::from_cents(1000));

        assert_eq!(settle(&bill).unwrap(), vec![invoice(2, 1, 500)]);
    }

    #[test]
    fn test_rounding_bias() {
        let bill = Bill::default()
            .with_item(split("Pie", 1000, &[1, 2, 3]))
            .with_payment(UserId(1), Money::from_cents(1000));

        let ceiling = settle(&bill).unwrap();
        assert_eq!(ceiling, vec![invoice(2, 1, 334), invoice(3, 1, 333)]);

        let floor = settle_with(&bill, &SettlementOptions::with_bias(RoundingBias::Floor)).unwrap();
        assert_eq!(floor, vec![invoice(2, 1, 333), invoice(3, 1, 333)]);
    }

    #[test]
    fn test_floor_bias_with_zero_rounded_invoice() {
        let bill = Bill::default()
            .with_item(
                BillItem::new("Tea", Money::from_cents(16), 1)
                    .with_share(UserId(4), 7)
                    .with_share(UserId(1), 5)
                    .with_share(UserId(7), 1),
            )
            .with_item(BillItem::new("Bun", Money::from_cents(15), 1).with_share(UserId(2), 3))
            .with_item(
                BillItem::new("Jam", Money::from_cents(14), 2)
                    .with_share(UserId(4), 6)
                    .with_share(UserId(3), 1)
                    .with_share(UserId(1), 1),
            )
            .with_item(BillItem::new("Milk", Money::from_cents(12), 2).with_share(UserId(4), 3))
            .with_payment(UserId(7), Money::from_cents(55))
            .with_payment(UserId(2), Money::from_cents(28));

        // U1 -> U7 rounds to 0.00 and must not absorb the -0.02 fix
        let floor = settle_with(&bill, &SettlementOptions::with_bias(RoundingBias::Floor)).unwrap();
        assert_eq!(
            floor,
            vec![invoice(4, 7, 53), invoice(1, 2, 9), invoice(3, 2, 4)]
        );
        assert_eq!(invoices_total(&floor), Money::from_cents(66));
    }

    #[test]
    fn test_zero_invoice_is_dropped() {
        let bill = Bill::default()
            .with_item(split("Mint", 1, &[1, 2]))
            .with_payment(UserId(3), Money::cent());

        assert_eq!(settle(&bill).unwrap(), vec![invoice(2, 3, 1)]);
    }

    #[test]
    fn test_nothing_to_settle() {
        assert!(settle(&Bill::default()).unwrap().is_empty());

        // Everyone paid for exactly what they ate
        let bill = Bill::default()
            .with_item(split("Tea", 300, &[1]))
            .with_item(split("Soup", 450, &[2]))
            .with_payment(UserId(1), Money::from_cents(300))
            .with_payment(UserId(2), Money::from_cents(450));
        assert!(settle(&bill).unwrap().is_empty());

        // Free items cost nobody anything
        let bill = Bill::default().with_item(split("Water", 0, &[1, 2]));
        assert!(settle(&bill).unwrap().is_empty());
    }

    #[test]
    fn test_is_deterministic() {
        let bill = Bill::default()
            .with_item(split("Wine", 4999, &[1, 2, 3, 4, 5, 6, 7]))
            .with_item(split("Bread", 301, &[2, 4]))
            .with_payment(UserId(3), Money::from_cents(2000))
            .with_payment(UserId(6), Money::from_cents(3300));

        let first = settle(&bill).unwrap();
        for _ in 0..5 {
            assert_eq!(settle(&bill).unwrap(), first);
        }
    }

    #[test]
    fn test_validation_errors_surface() {
        let mut bill = cake_bill();
        bill.items[0].quantity = 0;
        assert!(matches!(
            settle(&bill),
            Err(SettlementError::ZeroQuantity { index: 0 })
        ));

        let mut bill = cake_bill();
        bill.items[0].shares.clear();
        assert!(matches!(
            settle(&bill),
            Err(SettlementError::NoShares { index: 0 })
        ));

        let bill = cake_bill().with_payment(UserId(6), Money::cent());
        let err = settle(&bill).unwrap_err();
        assert!(!err.is_internal());
        assert!(err.to_string().contains("100.00"));
        assert!(err.to_string().contains("100.01"));
    }

    /// Bills where no payer consumes anything, over a spread of awkward
    /// prices and weights.
    #[test]
    fn test_settles_to_total_payments() {
        let prices = [1, 7, 100, 333, 1001, 9999, 123457];
        let weights: [&[u32]; 4] = [&[1, 1], &[1, 2, 3], &[5, 7, 11, 13], &[1, 1, 1, 1, 1, 1]];

        for price in prices {
            for shares in weights {
                let mut item = BillItem::new("Item", Money::from_cents(price), 3);
                for (user, weight) in shares.iter().enumerate() {
                    item = item.with_share(UserId(user as i64 + 1), *weight);
                }
                let total = Money::from_cents(price * 3);
                let bill = Bill::default()
                    .with_item(item)
                    .with_payment(UserId(100), total - Money::cent())
                    .with_payment(UserId(101), Money::cent());

                let invoices = settle(&bill).unwrap();
                assert_eq!(invoices_total(&invoices), total, "price {price} weights {shares:?}");
                assert!(invoices.len() <= shares.len() + 1);
                assert!(invoices.iter().all(|i| i.value.is_positive()));
            }
        }
    }

    /// Each user ends up within two cents per invoice of their exact balance:
    /// half a cent from rounding plus the reconciliation step.
    #[test]
    fn test_positions_close_to_exact_balances() {
        let bill = Bill::default()
            .with_item(split("Wine", 4999, &[1, 2, 3, 4, 5, 6, 7]))
            .with_item(split("Bread", 301, &[2, 4]))
            .with_item(
                BillItem::new("Cheese", Money::from_cents(1234), 2)
                    .with_share(UserId(1), 3)
                    .with_share(UserId(6), 2),
            )
            .with_payment(UserId(3), Money::from_cents(4000))
            .with_payment(UserId(6), Money::from_cents(3768));

        let invoices = settle(&bill).unwrap();
        let settled = settled_positions(&invoices);

        let sheet = BalanceSheet::from_bill(&bill).unwrap();
        for (user, balance) in sheet.net_balances().unwrap() {
            let involved = invoices
                .iter()
                .filter(|i| i.user_from == user || i.user_to == user)
                .count() as i64;
            let received = Rational::from(settled.get(&user).copied().unwrap_or_default());
            let error = (received - balance).abs();
            assert!(
                error <= Rational::new(2 * involved, 100).unwrap(),
                "{user} off by {error}"
            );
        }
    }
}
