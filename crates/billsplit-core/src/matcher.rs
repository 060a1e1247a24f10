//! # Settlement Matcher
//!
//! Nets creditors against debtors into pairwise transfers.
//!
//! ## Greedy Two-Cursor Match
//! ```text
//! creditors (desc)        debtors (desc, as magnitude)
//! ┌──────────────┐        ┌──────────────┐
//! │ U5   100     │ ◄──┬── │ U1   33⅓     │
//! │              │    ├── │ U2   33⅓     │
//! │              │    └── │ U3   33⅓     │
//! └──────────────┘        └──────────────┘
//!
//! step: amount = min(creditor.remaining, debtor.remaining)
//!       emit debtor → creditor for amount
//!       subtract from both, advance whichever hit zero (or both)
//! ```
//!
//! Every step zeroes at least one side, so n participants produce at most
//! n − 1 transfers. Ties in magnitude are broken by ascending user id, so
//! the output only depends on the balances.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{InternalError, LedgerSide, SettlementResult};
use crate::rational::Rational;
use crate::types::UserId;

/// A transfer before rounding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactInvoice {
    pub user_from: UserId,
    pub user_to: UserId,
    pub value: Rational,
}

/// One side of the match: a user and what is still left to settle.
struct Party {
    user: UserId,
    remaining: Rational,
}

/// Largest magnitude first, then lowest user id.
fn by_magnitude(a: &Party, b: &Party) -> Ordering {
    b.remaining
        .cmp(&a.remaining)
        .then_with(|| a.user.cmp(&b.user))
}

/// Matches non-zero balances into exact transfers.
///
/// `balances` must not contain zeros and must sum to zero. Breaking either
/// yields an internal error rather than a wrong answer.
///
/// ## Example
/// ```rust
/// use std::collections::BTreeMap;
/// use billsplit_core::matcher::match_balances;
/// use billsplit_core::rational::Rational;
/// use billsplit_core::UserId;
///
/// let balances = BTreeMap::from([
///     (UserId(1), Rational::from_integer(5)),
///     (UserId(2), Rational::from_integer(-5)),
/// ]);
///
/// let invoices = match_balances(&balances).unwrap();
/// assert_eq!(invoices.len(), 1);
/// assert_eq!(invoices[0].user_from, UserId(2));
/// assert_eq!(invoices[0].user_to, UserId(1));
/// ```
pub fn match_balances(balances: &BTreeMap<UserId, Rational>) -> SettlementResult<Vec<ExactInvoice>> {
    let mut creditors: Vec<Party> = Vec::new();
    let mut debtors: Vec<Party> = Vec::new();

    for (user, balance) in balances {
        match balance.sign() {
            Ordering::Greater => creditors.push(Party {
                user: *user,
                remaining: balance.clone(),
            }),
            Ordering::Less => debtors.push(Party {
                user: *user,
                remaining: balance.abs(),
            }),
            Ordering::Equal => {}
        }
    }

    creditors.sort_by(by_magnitude);
    debtors.sort_by(by_magnitude);

    let mut invoices = Vec::with_capacity(creditors.len() + debtors.len());
    let (mut c, mut d) = (0, 0);

    while c < creditors.len() && d < debtors.len() {
        let amount = creditors[c].remaining.clone().min(debtors[d].remaining.clone());

        invoices.push(ExactInvoice {
            user_from: debtors[d].user,
            user_to: creditors[c].user,
            value: amount.clone(),
        });

        creditors[c].remaining -= &amount;
        debtors[d].remaining -= &amount;

        check_overdraft(&creditors[c], LedgerSide::Credit)?;
        check_overdraft(&debtors[d], LedgerSide::Debit)?;

        if creditors[c].remaining.is_zero() {
            c += 1;
        }
        if debtors[d].remaining.is_zero() {
            d += 1;
        }
    }

    if c < creditors.len() || d < debtors.len() {
        let residual: Rational = creditors[c..]
            .iter()
            .map(|party| party.remaining.clone())
            .chain(debtors[d..].iter().map(|party| -party.remaining.clone()))
            .sum();
        return Err(InternalError::BalanceNotZero { residual }.into());
    }

    Ok(invoices)
}

fn check_overdraft(party: &Party, side: LedgerSide) -> SettlementResult<()> {
    if party.remaining.is_negative() {
        return Err(InternalError::CreditOrDebitOverdraft {
            side,
            user: party.user,
            remaining: party.remaining.clone(),
        }
        .into());
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SettlementError;

    fn rat(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    fn balances(entries: &[(i64, Rational)]) -> BTreeMap<UserId, Rational> {
        entries
            .iter()
            .map(|(user, balance)| (UserId(*user), balance.clone()))
            .collect()
    }

    #[test]
    fn test_single_creditor_many_debtors() {
        let input = balances(&[
            (1, rat(-100, 3)),
            (2, rat(-100, 3)),
            (3, rat(-100, 3)),
            (5, Rational::from_integer(100)),
        ]);

        let invoices = match_balances(&input).unwrap();
        assert_eq!(invoices.len(), 3);
        for (invoice, debtor) in invoices.iter().zip([1, 2, 3]) {
            assert_eq!(invoice.user_from, UserId(debtor));
            assert_eq!(invoice.user_to, UserId(5));
            assert_eq!(invoice.value, rat(100, 3));
        }
    }

    #[test]
    fn test_largest_first() {
        let input = balances(&[
            (1, Rational::from_integer(3)),
            (2, Rational::from_integer(7)),
            (3, Rational::from_integer(-6)),
            (4, Rational::from_integer(-4)),
        ]);

        let invoices = match_balances(&input).unwrap();
        let summary: Vec<(i64, i64, Rational)> = invoices
            .iter()
            .map(|i| (i.user_from.0, i.user_to.0, i.value.clone()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (3, 2, Rational::from_integer(6)),
                (4, 2, Rational::from_integer(1)),
                (4, 1, Rational::from_integer(3)),
            ]
        );
    }

    #[test]
    fn test_ties_break_on_user_id() {
        let input = balances(&[
            (9, Rational::from_integer(2)),
            (4, Rational::from_integer(2)),
            (7, Rational::from_integer(-2)),
            (2, Rational::from_integer(-2)),
        ]);

        let invoices = match_balances(&input).unwrap();
        assert_eq!(invoices[0].user_from, UserId(2));
        assert_eq!(invoices[0].user_to, UserId(4));
        assert_eq!(invoices[1].user_from, UserId(7));
        assert_eq!(invoices[1].user_to, UserId(9));
    }

    #[test]
    fn test_at_most_n_minus_one_invoices() {
        let input = balances(&[
            (1, Rational::from_integer(10)),
            (2, Rational::from_integer(5)),
            (3, rat(-7, 2)),
            (4, rat(-9, 2)),
            (5, Rational::from_integer(-7)),
        ]);

        let invoices = match_balances(&input).unwrap();
        assert!(invoices.len() <= input.len() - 1);

        let moved: Rational = invoices.iter().map(|i| i.value.clone()).sum();
        assert_eq!(moved, Rational::from_integer(15));
    }

    #[test]
    fn test_empty_input() {
        assert!(match_balances(&BTreeMap::new()).unwrap().is_empty());
    }

    #[test]
    fn test_unbalanced_input_is_internal_error() {
        let input = balances(&[(1, Rational::from_integer(5)), (2, Rational::from_integer(-3))]);

        match match_balances(&input) {
            Err(SettlementError::Internal(InternalError::BalanceNotZero { residual })) => {
                assert_eq!(residual, Rational::from_integer(2));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
