//! # Balance Aggregator
//!
//! Folds a whole bill into one net position per participant.
//!
//! ## Sign Convention
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   credit(user) = Σ payments made by user                                │
//! │   debit(user)  = Σ share prices of every item the user consumed        │
//! │                                                                         │
//! │   balance = credit − debit                                              │
//! │                                                                         │
//! │     > 0  Surplus   the user paid more than consumed  → is owed         │
//! │     < 0  Scarcity  the user consumed more than paid  → owes            │
//! │     = 0  Zero      nothing to settle                                    │
//! │                                                                         │
//! │   For a valid bill Σ balance over all users is exactly zero.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::distribution::distribute;
use crate::error::{InternalError, SettlementResult};
use crate::rational::Rational;
use crate::types::{Bill, UserId};
use crate::validation::validate_bill;

// =============================================================================
// Net Kind
// =============================================================================

/// Direction of a net amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetKind {
    Zero,
    /// Credit exceeds debit.
    Surplus,
    /// Debit exceeds credit.
    Scarcity,
}

// =============================================================================
// Position
// =============================================================================

/// Exact credit and debit of one user within one bill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Position {
    pub credit: Rational,
    pub debit: Rational,
}

impl Position {
    /// `credit − debit`.
    pub fn net(&self) -> Rational {
        &self.credit - &self.debit
    }

    pub fn kind(&self) -> NetKind {
        match self.credit.cmp(&self.debit) {
            std::cmp::Ordering::Greater => NetKind::Surplus,
            std::cmp::Ordering::Less => NetKind::Scarcity,
            std::cmp::Ordering::Equal => NetKind::Zero,
        }
    }
}

// =============================================================================
// Balance Sheet
// =============================================================================

/// Every participant's position in one validated bill.
///
/// ## Example
/// ```rust
/// use billsplit_core::balance::BalanceSheet;
/// use billsplit_core::rational::Rational;
/// use billsplit_core::{Bill, BillItem, Money, UserId};
///
/// let bill = Bill::default()
///     .with_item(
///         BillItem::new("Lunch", Money::from_cents(1000), 1)
///             .with_share(UserId(1), 1)
///             .with_share(UserId(2), 1),
///     )
///     .with_payment(UserId(1), Money::from_cents(1000));
///
/// let sheet = BalanceSheet::from_bill(&bill).unwrap();
/// let balances = sheet.net_balances().unwrap();
/// assert_eq!(balances[&UserId(1)], Rational::from_integer(5));
/// assert_eq!(balances[&UserId(2)], Rational::from_integer(-5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BalanceSheet {
    positions: BTreeMap<UserId, Position>,
}

impl BalanceSheet {
    /// Validates the bill, then accumulates debits and credits.
    pub fn from_bill(bill: &Bill) -> SettlementResult<Self> {
        validate_bill(bill)?;

        let mut positions: BTreeMap<UserId, Position> = BTreeMap::new();

        for (index, item) in bill.items.iter().enumerate() {
            for (user, price) in distribute(index, item)? {
                positions.entry(user).or_default().debit += &price;
            }
        }

        for payment in &bill.payments {
            positions.entry(payment.user_id).or_default().credit +=
                &Rational::from(payment.amount);
        }

        debug!(
            bill_id = bill.id.0,
            participants = positions.len(),
            "Balance sheet built"
        );

        Ok(BalanceSheet { positions })
    }

    /// All positions, including users whose balance nets to zero.
    pub fn positions(&self) -> &BTreeMap<UserId, Position> {
        &self.positions
    }

    /// Position of a single user, if they appear in the bill.
    pub fn position(&self, user: UserId) -> Option<&Position> {
        self.positions.get(&user)
    }

    /// Sum of all positive balances.
    pub fn total_credit(&self) -> Rational {
        self.positions
            .values()
            .map(Position::net)
            .filter(Rational::is_positive)
            .sum()
    }

    /// Non-zero balances keyed by user.
    ///
    /// Fails with [`InternalError::BalanceNotZero`] if the balances don't
    /// cancel out, which a validated bill never produces.
    pub fn net_balances(&self) -> SettlementResult<BTreeMap<UserId, Rational>> {
        let balances: BTreeMap<UserId, Rational> = self
            .positions
            .iter()
            .map(|(user, position)| (*user, position.net()))
            .filter(|(_, balance)| !balance.is_zero())
            .collect();

        let residual: Rational = balances.values().sum();
        if !residual.is_zero() {
            return Err(InternalError::BalanceNotZero { residual }.into());
        }

        Ok(balances)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
