//! # Rounding Corrector
//!
//! Turns exact transfers into cent amounts without losing or inventing money.
//!
//! ## Reconciliation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  exact invoices      100/3    100/3    100/3        total credit = 100  │
//! │        │                                                     │          │
//! │   to_money()          33.33    33.33    33.33          bias (ceiling)   │
//! │        │                                                     │          │
//! │        ▼                                                     ▼          │
//! │  current = 99.99                                  target = 100.00       │
//! │                                                                         │
//! │  discrepancy = target − current = 0.01                                  │
//! │  step        = sign × max(0.01, trunc(|0.01| / 3)) = 0.01               │
//! │                                                                         │
//! │  walk invoices adding step while |remaining| ≥ |step|                   │
//! │     33.34    33.33    33.33           remaining = 0.00                  │
//! │                                                                         │
//! │  leftover (if any) goes to the first invoice that can absorb it         │
//! │  zero-valued invoices are dropped                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The target is the rounded total credit, i.e. everything creditors are
//! owed. When no payer consumed anything that is exactly the sum of payments.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::error::{InternalError, SettlementResult};
use crate::matcher::ExactInvoice;
use crate::money::Money;
use crate::rational::Rational;
use crate::types::{invoices_total, Invoice};

// =============================================================================
// Rounding Bias
// =============================================================================

/// How the reconciliation target is rounded to a cent.
///
/// ```text
/// total credit 6.666…
///   Ceiling → 6.67   creditors never receive less than owed
///   Floor   → 6.66   debtors never pay more than owed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingBias {
    /// Round the target up. Debtors absorb the sub-cent.
    #[default]
    Ceiling,

    /// Round the target down. Creditors absorb the sub-cent.
    Floor,
}

impl fmt::Display for RoundingBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingBias::Ceiling => write!(f, "ceiling"),
            RoundingBias::Floor => write!(f, "floor"),
        }
    }
}

/// Returned when parsing an unknown bias name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rounding bias: '{0}'. Valid options: ceiling, floor")]
pub struct UnknownRoundingBias(pub String);

impl std::str::FromStr for RoundingBias {
    type Err = UnknownRoundingBias;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ceiling" | "ceil" | "up" => Ok(RoundingBias::Ceiling),
            "floor" | "down" => Ok(RoundingBias::Floor),
            other => Err(UnknownRoundingBias(other.to_string())),
        }
    }
}

// =============================================================================
// Target
// =============================================================================

/// Rounds the exact total credit to the amount the invoices must add up to.
pub fn target_total(total_credit: &Rational, bias: RoundingBias) -> SettlementResult<Money> {
    let rounded = match bias {
        RoundingBias::Ceiling => total_credit.ceil_to_money(),
        RoundingBias::Floor => total_credit.floor_to_money(),
    };

    rounded.ok_or_else(|| {
        InternalError::MoneyOutOfRange {
            value: total_credit.clone(),
        }
        .into()
    })
}

// =============================================================================
// Per-Invoice Rounding
// =============================================================================

/// Rounds each exact invoice to the nearest cent, halves away from zero.
pub fn round_invoices(exact: &[ExactInvoice]) -> SettlementResult<Vec<Invoice>> {
    exact
        .iter()
        .map(|invoice| -> SettlementResult<Invoice> {
            let value = invoice
                .value
                .to_money()
                .ok_or_else(|| InternalError::MoneyOutOfRange {
                    value: invoice.value.clone(),
                })?;
            Ok(Invoice::new(invoice.user_from, invoice.user_to, value))
        })
        .collect()
}

// =============================================================================
// Discrepancy Fix
// =============================================================================

/// Adjusts rounded invoices so they add up to `target` exactly.
///
/// The fix is spread in equal steps of at least one cent from the first
/// invoice onward, skipping invoices a negative step would take below zero.
/// Whatever doesn't divide evenly lands on the first invoice that can absorb
/// it. Zero-valued invoices are dropped from the result.
///
/// ## Example
/// ```rust
/// use billsplit_core::rounding::fix_invoices_total;
/// use billsplit_core::{Invoice, Money, UserId};
///
/// let rounded = vec![
///     Invoice::new(UserId(1), UserId(5), Money::from_cents(3333)),
///     Invoice::new(UserId(2), UserId(5), Money::from_cents(3333)),
///     Invoice::new(UserId(3), UserId(5), Money::from_cents(3333)),
/// ];
///
/// let fixed = fix_invoices_total(rounded, Money::from_cents(10000)).unwrap();
/// assert_eq!(fixed[0].value, Money::from_cents(3334));
/// assert_eq!(fixed[1].value, Money::from_cents(3333));
/// ```
pub fn fix_invoices_total(mut invoices: Vec<Invoice>, target: Money) -> SettlementResult<Vec<Invoice>> {
    let current = invoices_total(&invoices);
    let discrepancy = target - current;

    if !discrepancy.is_zero() {
        if invoices.is_empty() {
            return Err(InternalError::RoundingFixInfeasible {
                discrepancy,
                invoices: 0,
            }
            .into());
        }

        let magnitude = discrepancy
            .abs()
            .split_truncated(invoices.len())
            .max(Money::cent());
        let step = if discrepancy.is_negative() {
            -magnitude
        } else {
            magnitude
        };

        debug!(
            %discrepancy,
            %step,
            invoices = invoices.len(),
            "Distributing rounding fix"
        );

        let mut remaining = discrepancy;
        for invoice in invoices.iter_mut() {
            if remaining.abs() < step.abs() {
                break;
            }
            // A step down must not push an invoice below zero
            if (invoice.value + step).is_negative() {
                continue;
            }
            invoice.value += step;
            remaining -= step;
        }

        // Leftover: a surplus lands on the first invoice, a shortfall is
        // taken from invoices in order as far as each can give
        for invoice in invoices.iter_mut() {
            if remaining.is_zero() {
                break;
            }
            let delta = if remaining.is_negative() {
                remaining.max(-invoice.value).min(Money::zero())
            } else {
                remaining
            };
            invoice.value += delta;
            remaining -= delta;
        }

        if !remaining.is_zero() || invoices.iter().any(|invoice| invoice.value.is_negative()) {
            return Err(InternalError::RoundingFixInfeasible {
                discrepancy,
                invoices: invoices.len(),
            }
            .into());
        }

        let actual = invoices_total(&invoices);
        if actual != target {
            return Err(InternalError::FinalTotalMismatch { target, actual }.into());
        }
    }

    invoices.retain(|invoice| !invoice.value.is_zero());
    Ok(invoices)
}

// =============================================================================
// Unit Tests
// =============================================================================
