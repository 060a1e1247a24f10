//! # Ledger
//!
//! Persisted invoices (ledger rows) folded into per-user accounts.
//!
//! ```text
//! LedgerEntry { bill, from: U1, to: U5, 33.34 }
//!                          │         │
//!                          │         └──► U5.credit += 33.34
//!                          └────────────► U1.debit  += 33.34
//! ```
//!
//! Storage reads the rows; the fold here is pure.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::balance::NetKind;
use crate::money::Money;
use crate::types::{BillId, Invoice, UserId};

// =============================================================================
// Ledger Entry
// =============================================================================

/// One settled transfer as it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LedgerEntry {
    pub bill_id: BillId,
    pub user_from: UserId,
    pub user_to: UserId,
    #[ts(as = "String")]
    pub amount: Money,
}

impl LedgerEntry {
    pub fn from_invoice(bill_id: BillId, invoice: &Invoice) -> Self {
        LedgerEntry {
            bill_id,
            user_from: invoice.user_from,
            user_to: invoice.user_to,
            amount: invoice.value,
        }
    }
}

/// Ledger rows for every invoice of a bill, in invoice order.
pub fn ledger_entries(bill_id: BillId, invoices: &[Invoice]) -> Vec<LedgerEntry> {
    invoices
        .iter()
        .map(|invoice| LedgerEntry::from_invoice(bill_id, invoice))
        .collect()
}

// =============================================================================
// Account
// =============================================================================

/// What a user has received (credit) and paid (debit) across the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Account {
    #[ts(as = "String")]
    pub credit: Money,
    #[ts(as = "String")]
    pub debit: Money,
}

impl Account {
    /// Folds every entry that involves `user`.
    ///
    /// ## Panics
    /// If a running credit or debit leaves the `Decimal` range. Entries come
    /// from settled bills, whose totals already passed the range checks, so
    /// only a ledger summing past ~7.9e28 can hit this.
    ///
    /// ## Example
    /// ```rust
    /// use billsplit_core::ledger::{Account, LedgerEntry};
    /// use billsplit_core::{BillId, Money, UserId};
    ///
    /// let entries = [
    ///     LedgerEntry { bill_id: BillId(1), user_from: UserId(1), user_to: UserId(5), amount: Money::from_cents(3334) },
    ///     LedgerEntry { bill_id: BillId(2), user_from: UserId(5), user_to: UserId(1), amount: Money::from_cents(1000) },
    /// ];
    ///
    /// let account = Account::for_user(UserId(1), &entries);
    /// assert_eq!(account.debit, Money::from_cents(3334));
    /// assert_eq!(account.credit, Money::from_cents(1000));
    /// assert!(account.is_scarcity());
    /// ```
    pub fn for_user(user: UserId, entries: &[LedgerEntry]) -> Self {
        entries.iter().fold(Account::default(), |mut account, entry| {
            if entry.user_to == user {
                account.credit += entry.amount;
            }
            if entry.user_from == user {
                account.debit += entry.amount;
            }
            account
        })
    }

    /// Absolute net amount and its direction.
    pub fn abs_net(&self) -> (Money, NetKind) {
        let diff = self.credit - self.debit;
        let kind = if diff.is_positive() {
            NetKind::Surplus
        } else if diff.is_negative() {
            NetKind::Scarcity
        } else {
            NetKind::Zero
        };
        (diff.abs(), kind)
    }

    pub fn is_surplus(&self) -> bool {
        self.abs_net().1 == NetKind::Surplus
    }

    pub fn is_scarcity(&self) -> bool {
        self.abs_net().1 == NetKind::Scarcity
    }

    pub fn is_zero(&self) -> bool {
        self.abs_net().1 == NetKind::Zero
    }
}

/// Accounts of every user that appears in `entries`.
///
/// Panics like [`Account::for_user`] if a running sum overflows.
pub fn accounts(entries: &[LedgerEntry]) -> BTreeMap<UserId, Account> {
    let mut accounts: BTreeMap<UserId, Account> = BTreeMap::new();
    for entry in entries {
        accounts.entry(entry.user_to).or_default().credit += entry.amount;
        accounts.entry(entry.user_from).or_default().debit += entry.amount;
    }
    accounts
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(bill: i64, from: i64, to: i64, cents: i64) -> LedgerEntry {
        LedgerEntry {
            bill_id: BillId(bill),
            user_from: UserId(from),
            user_to: UserId(to),
            amount: Money::from_cents(cents),
        }
    }

    #[test]
    fn test_entries_from_invoices() {
        let invoices = [
            Invoice::new(UserId(1), UserId(5), Money::from_cents(3334)),
            Invoice::new(UserId(2), UserId(5), Money::from_cents(3333)),
        ];

        let rows = ledger_entries(BillId(7), &invoices);
        assert_eq!(rows, vec![entry(7, 1, 5, 3334), entry(7, 2, 5, 3333)]);
    }

    #[test]
    #[should_panic]
    fn test_accounts_overflow_panics() {
        let huge = Money::from_decimal(rust_decimal::Decimal::MAX);
        let row = LedgerEntry {
            bill_id: BillId(1),
            user_from: UserId(1),
            user_to: UserId(2),
            amount: huge,
        };
        accounts(&[row, row]);
    }

    #[test]
    fn test_abs_net() {
        let account = Account {
            credit: Money::from_cents(500),
            debit: Money::from_cents(1200),
        };
        assert_eq!(account.abs_net(), (Money::from_cents(700), NetKind::Scarcity));
        assert!(account.is_scarcity());
        assert!(!account.is_surplus());

        let even = Account {
            credit: Money::from_cents(300),
            debit: Money::from_cents(300),
        };
        assert_eq!(even.abs_net(), (Money::zero(), NetKind::Zero));
        assert!(even.is_zero());
        assert!(Account::default().is_zero());
    }

    #[test]
    fn test_for_user_across_bills() {
        let entries = [
            entry(1, 1, 5, 3334),
            entry(1, 2, 5, 3333),
            entry(2, 5, 1, 1000),
            entry(3, 5, 2, 4000),
        ];

        let five = Account::for_user(UserId(5), &entries);
        assert_eq!(five.credit, Money::from_cents(6667));
        assert_eq!(five.debit, Money::from_cents(5000));
        assert_eq!(five.abs_net(), (Money::from_cents(1667), NetKind::Surplus));

        assert!(Account::for_user(UserId(9), &entries).is_zero());
    }

    #[test]
    fn test_accounts_match_for_user() {
        let entries = [entry(1, 1, 5, 3334), entry(2, 5, 1, 1000), entry(2, 2, 1, 250)];

        let all = accounts(&entries);
        assert_eq!(all.len(), 3);
        for (user, account) in &all {
            assert_eq!(*account, Account::for_user(*user, &entries));
        }

        let net: Money = all
            .values()
            .map(|account| account.credit - account.debit)
            .sum();
        assert!(net.is_zero());
    }

    #[test]
    fn test_entry_json() {
        let json = serde_json::to_value(entry(3, 1, 2, 550)).unwrap();
        assert_eq!(json["bill_id"], 3);
        assert_eq!(json["amount"], "5.50");
    }
}
