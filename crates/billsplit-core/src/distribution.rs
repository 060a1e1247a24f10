//! # Share Distributor
//!
//! Splits one item's total price across its weighted shares.
//!
//! ```text
//! Pizza 12.50 × 2 = 25.00, shares { Alice: 2, Bob: 1 }
//!
//!   Alice: 25.00 × 2/3 = 50/3     (16.666…)
//!   Bob:   25.00 × 1/3 = 25/3     ( 8.333…)
//!                        ─────
//!                         75/3 = 25 exactly
//! ```
//!
//! Nothing is rounded here. The per-user amounts always add back up to the
//! item total.

use std::collections::BTreeMap;

use crate::error::{AmountField, SettlementError, SettlementResult};
use crate::rational::Rational;
use crate::types::{BillItem, UserId};

/// Exact amount each user owes for one item.
///
/// Several shares for the same user are added together. `index` is the
/// item's position in its bill, used only for error reporting.
///
/// ## Example
/// ```rust
/// use billsplit_core::distribution::distribute;
/// use billsplit_core::rational::Rational;
/// use billsplit_core::{BillItem, Money, UserId};
///
/// let item = BillItem::new("Cake", Money::from_cents(10000), 1)
///     .with_share(UserId(1), 1)
///     .with_share(UserId(2), 1)
///     .with_share(UserId(3), 1);
///
/// let shares = distribute(0, &item).unwrap();
/// assert_eq!(shares[&UserId(1)], Rational::new(100, 3).unwrap());
/// ```
pub fn distribute(index: usize, item: &BillItem) -> SettlementResult<BTreeMap<UserId, Rational>> {
    if item.shares.is_empty() {
        return Err(SettlementError::NoShares { index });
    }
    if let Some(share) = item.shares.iter().position(|share| share.weight == 0) {
        return Err(SettlementError::ZeroWeight { index, share });
    }

    let total_price = Rational::from(item.total_price().ok_or(SettlementError::AmountOutOfRange {
        field: AmountField::ItemTotal,
        index,
    })?);
    let total_weight = item.total_weight();

    let mut prices: BTreeMap<UserId, Rational> = BTreeMap::new();
    for share in &item.shares {
        let ratio = Rational::ratio(u64::from(share.weight), total_weight)
            .ok_or(SettlementError::NoShares { index })?;
        *prices.entry(share.user_id).or_default() += &(&total_price * &ratio);
    }

    Ok(prices)
}

// =============================================================================
// Unit Tests
// =============================================================================
