//! # Validation Module
//!
//! Bill checks that must pass before any balance is computed.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Order                                   │
//! │                                                                         │
//! │  1. Items, in order                                                     │
//! │     ├── quantity ≥ 1                   → ZeroQuantity { index }        │
//! │     ├── shares non-empty               → NoShares { index }            │
//! │     ├── every weight > 0               → ZeroWeight { index, share }   │
//! │     ├── price has ≤ 2 digits           → MoneyPrecisionExceeded        │
//! │     └── price ≥ 0                      → NegativePrice { index }       │
//! │                                                                         │
//! │  2. Payments, in order                                                  │
//! │     └── amount has ≤ 2 digits          → MoneyPrecisionExceeded        │
//! │                                                                         │
//! │  3. Totals (checked sums)              → AmountOutOfRange              │
//! │                                                                         │
//! │  4. total price == total payments      → Discrepancy { both totals }   │
//! │                                                                         │
//! │  The first failure wins. Nothing is computed on a bill that fails.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billsplit_core::validation::validate_bill;
//! use billsplit_core::{Bill, BillItem, Money, UserId};
//!
//! let bill = Bill::default()
//!     .with_item(BillItem::new("Cake", Money::from_cents(1000), 1).with_share(UserId(1), 1))
//!     .with_payment(UserId(2), Money::from_cents(1000));
//!
//! assert_eq!(validate_bill(&bill).unwrap(), Money::from_cents(1000));
//! ```

use crate::error::{AmountField, SettlementError, SettlementResult};
use crate::money::Money;
use crate::types::{Bill, BillItem, BillPayment};

// =============================================================================
// Item Validators
// =============================================================================

/// Validates one item on its own.
///
/// `index` is the item's position in the bill and ends up in the error.
pub fn validate_item(index: usize, item: &BillItem) -> SettlementResult<()> {
    if item.quantity < 1 {
        return Err(SettlementError::ZeroQuantity { index });
    }

    if item.shares.is_empty() {
        return Err(SettlementError::NoShares { index });
    }

    if let Some(share) = item.shares.iter().position(|share| share.weight == 0) {
        return Err(SettlementError::ZeroWeight { index, share });
    }

    if !item.price_per_one.has_valid_precision() {
        return Err(SettlementError::MoneyPrecisionExceeded {
            field: AmountField::PricePerOne,
            index,
            value: item.price_per_one.amount(),
        });
    }

    if item.price_per_one.is_negative() {
        return Err(SettlementError::NegativePrice {
            index,
            price: item.price_per_one,
        });
    }

    Ok(())
}

// =============================================================================
// Payment Validators
// =============================================================================

/// Validates one payment on its own.
pub fn validate_payment(index: usize, payment: &BillPayment) -> SettlementResult<()> {
    if !payment.amount.has_valid_precision() {
        return Err(SettlementError::MoneyPrecisionExceeded {
            field: AmountField::Payment,
            index,
            value: payment.amount.amount(),
        });
    }

    Ok(())
}

// =============================================================================
// Bill Validator
// =============================================================================

/// Validates a whole bill and returns its total.
///
/// On success the returned amount is both the total price and the total
/// payments, which are equal at this point.
pub fn validate_bill(bill: &Bill) -> SettlementResult<Money> {
    let mut total_price = Money::zero();
    for (index, item) in bill.items.iter().enumerate() {
        validate_item(index, item)?;

        let item_total = item.total_price().ok_or(SettlementError::AmountOutOfRange {
            field: AmountField::ItemTotal,
            index,
        })?;
        total_price = total_price
            .checked_add(item_total)
            .ok_or(SettlementError::AmountOutOfRange {
                field: AmountField::TotalPrice,
                index,
            })?;
    }

    let mut total_payments = Money::zero();
    for (index, payment) in bill.payments.iter().enumerate() {
        validate_payment(index, payment)?;

        total_payments = total_payments.checked_add(payment.amount).ok_or(
            SettlementError::AmountOutOfRange {
                field: AmountField::TotalPayments,
                index,
            },
        )?;
    }

    if total_price != total_payments {
        return Err(SettlementError::Discrepancy {
            total_price,
            total_payments,
        });
    }

    Ok(total_price)
}

// =============================================================================
// Unit Tests
// =============================================================================
