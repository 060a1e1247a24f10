//! # billsplit-core: Pure Settlement Engine
//!
//! This crate turns one bill (what was bought, who shared it, who paid) into
//! the list of transfers that zeroes everyone's balance. It contains no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        billsplit Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Transport / Storage (outside this workspace)         │   │
//! │  │      request handlers, auth, bill persistence, ledger rows     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                billsplit-service (orchestration)                │   │
//! │  │        config, limits, logging, error mapping, JSON            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ billsplit-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │  balance  │  │  matcher  │  │ rounding  │  │   │
//! │  │   │ rational  │  │distribute │  │  greedy   │  │  target   │  │   │
//! │  │   │   types   │  │validation │  │  netting  │  │  fix-up   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Bill, items, shares, payments, invoices
//! - [`money`] - Two-digit decimal Money
//! - [`rational`] - Exact fractions used between input and output
//! - [`validation`] - Bill checks, first failure wins
//! - [`distribution`] - Weighted split of one item
//! - [`balance`] - Per-user credit, debit and net balance
//! - [`matcher`] - Creditor/debtor netting
//! - [`rounding`] - Cent rounding and total reconciliation
//! - [`settlement`] - `settle`, the entry point
//! - [`ledger`] - Per-user accounts over stored invoices
//! - [`error`] - Settlement error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same bill in, same invoices out, in the same order
//! 2. **No I/O**: storage and transport live outside this crate
//! 3. **Exact Arithmetic**: fractions until the last step, never floats
//! 4. **Explicit Errors**: typed errors, no panics on bad input
//!
//! ## Example Usage
//!
//! ```rust
//! use billsplit_core::{settle, Bill, BillItem, Money, UserId};
//!
//! // Alice pays 10.00 for lunch she shares with Bob
//! let bill = Bill::default()
//!     .with_item(
//!         BillItem::new("Lunch", Money::from_cents(1000), 1)
//!             .with_share(UserId(1), 1)
//!             .with_share(UserId(2), 1),
//!     )
//!     .with_payment(UserId(1), Money::from_cents(1000));
//!
//! let invoices = settle(&bill).unwrap();
//! assert_eq!(invoices.len(), 1);
//! assert_eq!(invoices[0].user_from, UserId(2));
//! assert_eq!(invoices[0].value, Money::from_cents(500));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod balance;
pub mod distribution;
pub mod error;
pub mod ledger;
pub mod matcher;
pub mod money;
pub mod rational;
pub mod rounding;
pub mod settlement;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use billsplit_core::Money` instead of
// `use billsplit_core::money::Money`

pub use error::{ErrorKind, InternalError, SettlementError, SettlementResult};
pub use ledger::{Account, LedgerEntry};
pub use money::Money;
pub use rounding::RoundingBias;
pub use settlement::{settle, settle_with, SettlementOptions};
pub use types::*;
