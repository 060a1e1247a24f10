//! # Domain Types
//!
//! The bill as the engine receives it, and the invoices it hands back.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │      Bill       │                                                    │
//! │  │  ─────────────  │        ┌─────────────────┐   ┌─────────────────┐  │
//! │  │  id             │   ┌───►│    BillItem     │──►│    BillShare    │  │
//! │  │  items ─────────┼───┘    │  title          │   │  user_id        │  │
//! │  │  payments ──────┼───┐    │  price_per_one  │   │  weight         │  │
//! │  └─────────────────┘   │    │  quantity       │   └─────────────────┘  │
//! │                        │    │  shares         │                        │
//! │                        │    └─────────────────┘                        │
//! │                        │    ┌─────────────────┐   ┌─────────────────┐  │
//! │                        └───►│   BillPayment   │   │     Invoice     │  │
//! │                             │  user_id        │   │  user_from      │  │
//! │                             │  amount         │   │  user_to        │  │
//! │                             └─────────────────┘   │  value          │  │
//! │                                                   └─────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use num_integer::Integer;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

/// Version of the persisted bill snapshot layout.
pub const BILL_SCHEMA_VERSION: u32 = 1;

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque user identifier. The engine only compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

/// Identifier of a bill, assigned by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct BillId(pub i64);

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BillId({})", self.0)
    }
}

// =============================================================================
// Bill Share
// =============================================================================

/// One user's part of an item, as a relative weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillShare {
    pub user_id: UserId,
    /// Relative weight; must be positive.
    pub weight: u32,
}

impl BillShare {
    #[inline]
    pub const fn new(user_id: UserId, weight: u32) -> Self {
        BillShare { user_id, weight }
    }
}

// =============================================================================
// Bill Item
// =============================================================================

/// A purchased line, shared between users by weight.
///
/// ## Example
/// ```rust
/// use billsplit_core::{BillItem, Money, UserId};
///
/// // Two pizzas at 12.50, Alice eats twice as much as Bob
/// let item = BillItem::new("Pizza", Money::from_cents(1250), 2)
///     .with_share(UserId(1), 2)
///     .with_share(UserId(2), 1);
///
/// assert_eq!(item.total_price(), Some(Money::from_cents(2500)));
/// assert_eq!(item.total_weight(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillItem {
    pub title: String,
    #[ts(as = "String")]
    pub price_per_one: Money,
    pub quantity: u32,
    /// Category code for clients. Not used by settlement.
    #[serde(default)]
    pub kind: u8,
    pub shares: Vec<BillShare>,
}

impl BillItem {
    /// An item with no shares yet.
    pub fn new(title: impl Into<String>, price_per_one: Money, quantity: u32) -> Self {
        BillItem {
            title: title.into(),
            price_per_one,
            quantity,
            kind: 0,
            shares: Vec::new(),
        }
    }

    /// Builder-style share append.
    pub fn with_share(mut self, user_id: UserId, weight: u32) -> Self {
        self.shares.push(BillShare::new(user_id, weight));
        self
    }

    /// `price_per_one × quantity`, `None` on overflow.
    pub fn total_price(&self) -> Option<Money> {
        self.price_per_one.checked_multiply_quantity(self.quantity)
    }

    /// Sum of all share weights.
    pub fn total_weight(&self) -> u64 {
        self.shares.iter().map(|share| u64::from(share.weight)).sum()
    }

    /// Divides every weight by their greatest common divisor.
    ///
    /// Weights `[2, 4, 6]` become `[1, 2, 3]`. Share prices don't change.
    /// Does nothing when any weight is zero.
    pub fn simplify_shares(&mut self) {
        if self.shares.iter().any(|share| share.weight == 0) {
            return;
        }

        let gcd = self
            .shares
            .iter()
            .map(|share| share.weight)
            .reduce(|acc, weight| acc.gcd(&weight))
            .unwrap_or(1);

        if gcd <= 1 {
            return;
        }

        for share in &mut self.shares {
            share.weight /= gcd;
        }
    }
}

// =============================================================================
// Bill Payment
// =============================================================================

/// Money a user actually put down for the bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillPayment {
    pub user_id: UserId,
    #[ts(as = "String")]
    pub amount: Money,
}

impl BillPayment {
    #[inline]
    pub const fn new(user_id: UserId, amount: Money) -> Self {
        BillPayment { user_id, amount }
    }
}

// =============================================================================
// Bill
// =============================================================================

/// A shared purchase: what was bought and who paid.
///
/// The id is assigned by storage and never travels on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bill {
    #[serde(skip)]
    #[ts(skip)]
    pub id: BillId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<BillItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payments: Vec<BillPayment>,
}

impl Bill {
    pub fn new(id: BillId) -> Self {
        Bill {
            id,
            ..Default::default()
        }
    }

    pub fn with_item(mut self, item: BillItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_payment(mut self, user_id: UserId, amount: Money) -> Self {
        self.payments.push(BillPayment::new(user_id, amount));
        self
    }

    /// Sum of all item totals, `None` on overflow.
    pub fn total_price(&self) -> Option<Money> {
        self.items.iter().try_fold(Money::zero(), |acc, item| {
            acc.checked_add(item.total_price()?)
        })
    }

    /// Sum of all payments, `None` on overflow.
    pub fn total_payments(&self) -> Option<Money> {
        self.payments
            .iter()
            .try_fold(Money::zero(), |acc, payment| acc.checked_add(payment.amount))
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// One settled transfer: `user_from` pays `user_to` exactly `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invoice {
    pub user_from: UserId,
    pub user_to: UserId,
    #[ts(as = "String")]
    pub value: Money,
}

impl Invoice {
    #[inline]
    pub const fn new(user_from: UserId, user_to: UserId, value: Money) -> Self {
        Invoice {
            user_from,
            user_to,
            value,
        }
    }
}

/// Sum of invoice values.
pub fn invoices_total(invoices: &[Invoice]) -> Money {
    invoices.iter().map(|invoice| invoice.value).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
