//! # Error Types
//!
//! Domain-specific error types for billsplit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billsplit-core errors (this file)                                     │
//! │  ├── SettlementError  - Everything `settle` can return                 │
//! │  │   ├── validation variants (caller fault, carry index/totals)        │
//! │  │   └── Internal(InternalError)                                       │
//! │  └── InternalError    - Engine defects, unreachable on valid input     │
//! │                                                                         │
//! │  billsplit-service errors (separate crate)                             │
//! │  └── ApiError         - What request handlers see (serialized)         │
//! │                                                                         │
//! │  Flow: InternalError → SettlementError → ApiError → Caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item index, both totals)
//! 3. Errors are enum variants matched explicitly, never compared by identity
//! 4. Internal assertions are always wrapped so they can't pass for bad input

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use crate::money::Money;
use crate::rational::Rational;
use crate::types::UserId;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification of a [`SettlementError`].
///
/// Validation errors go back to whoever sent the bill. Internal errors are
/// server faults and must be logged as defects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The bill itself is wrong.
    Validation,
    /// The engine broke one of its own invariants.
    Internal,
}

// =============================================================================
// Amount Field
// =============================================================================

/// Which monetary field of a bill an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountField {
    /// `BillItem::price_per_one`
    PricePerOne,
    /// `price_per_one × quantity` of one item
    ItemTotal,
    /// `BillPayment::amount`
    Payment,
    /// Sum of all item totals
    TotalPrice,
    /// Sum of all payments
    TotalPayments,
}

impl fmt::Display for AmountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountField::PricePerOne => write!(f, "price per one of item"),
            AmountField::ItemTotal => write!(f, "total price of item"),
            AmountField::Payment => write!(f, "payment"),
            AmountField::TotalPrice => write!(f, "total price up to item"),
            AmountField::TotalPayments => write!(f, "total payments up to payment"),
        }
    }
}

// =============================================================================
// Settlement Error
// =============================================================================

/// Errors returned by [`settle`](crate::settlement::settle).
///
/// ## User Workflow
/// ```text
/// settle(bill)
///      │
///      ├── item 2 has quantity 0 ──► ZeroQuantity { index: 2 }
///      │                              → reported to the bill author
///      │
///      ├── totals differ ──────────► Discrepancy { 100.00, 99.00 }
///      │                              → reported to the bill author
///      │
///      └── engine bug ─────────────► Internal(FinalTotalMismatch { .. })
///                                     → server fault, logged as a defect
/// ```
#[derive(Debug, Error)]
pub enum SettlementError {
    /// An item has quantity zero.
    #[error("item at index {index} has zero quantity")]
    ZeroQuantity { index: usize },

    /// An item has no shares at all.
    #[error("item at index {index} has no shares")]
    NoShares { index: usize },

    /// A share inside an item has weight zero.
    #[error("share {share} of item at index {index} has zero weight")]
    ZeroWeight { index: usize, share: usize },

    /// An amount has more than two fractional digits.
    #[error("{field} at index {index} has more than 2 fractional digits: {value}")]
    MoneyPrecisionExceeded {
        field: AmountField,
        index: usize,
        value: Decimal,
    },

    /// An item price is below zero.
    #[error("item at index {index} has negative price: {price}")]
    NegativePrice { index: usize, price: Money },

    /// Summing amounts overflowed the decimal range.
    #[error("{field} at index {index} is out of range")]
    AmountOutOfRange { field: AmountField, index: usize },

    /// What was bought and what was paid do not match.
    #[error("total price and total payments must be equal (total price: {total_price}, total payments: {total_payments})")]
    Discrepancy {
        total_price: Money,
        total_payments: Money,
    },

    /// An internal invariant was violated.
    #[error("internal assertion: {0}")]
    Internal(#[source] InternalError),
}

impl SettlementError {
    /// Returns whether this error is the caller's fault or the engine's.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SettlementError::Internal(_) => ErrorKind::Internal,
            _ => ErrorKind::Validation,
        }
    }

    /// Shorthand for `kind() == ErrorKind::Internal`.
    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }
}

impl From<InternalError> for SettlementError {
    fn from(err: InternalError) -> Self {
        SettlementError::Internal(err)
    }
}

// =============================================================================
// Internal Error
// =============================================================================

/// Which side of a match ran past zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerSide {
    Credit,
    Debit,
}

impl fmt::Display for LedgerSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerSide::Credit => write!(f, "credit"),
            LedgerSide::Debit => write!(f, "debit"),
        }
    }
}

/// Engine defects.
///
/// None of these can be produced by a bill that passed validation. Seeing one
/// means the arithmetic above it is wrong.
#[derive(Debug, Error)]
pub enum InternalError {
    /// Balances of a validated bill do not sum to zero.
    #[error("balance isn't zero: {residual}")]
    BalanceNotZero { residual: Rational },

    /// A creditor was paid more than owed, or a debtor paid more than owed.
    #[error("{side} overdraft for {user}: remaining {remaining}")]
    CreditOrDebitOverdraft {
        side: LedgerSide,
        user: UserId,
        remaining: Rational,
    },

    /// The rounding discrepancy can't be spread over the invoices.
    #[error("cannot distribute rounding fix of {discrepancy} over {invoices} invoices")]
    RoundingFixInfeasible { discrepancy: Money, invoices: usize },

    /// Corrected invoices don't add up to the target.
    #[error("invoice total {actual} does not match target {target}")]
    FinalTotalMismatch { target: Money, actual: Money },

    /// An exact amount doesn't fit in a decimal.
    #[error("amount {value} does not fit into money")]
    MoneyOutOfRange { value: Rational },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with SettlementError.
pub type SettlementResult<T> = Result<T, SettlementError>;

// =============================================================================
// Unit Tests
// =============================================================================
