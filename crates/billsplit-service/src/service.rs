//! # Settlement Service
//!
//! What request handlers hold on to: configured once, shared everywhere.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  settle_json(bill_id, body)                                            │
//! │      │                                                                  │
//! │      ├── serde_json::from_str ──► MalformedRequest                      │
//! │      ▼                                                                  │
//! │  settle(&bill)                                                          │
//! │      │                                                                  │
//! │      ├── check_limits ──────────► LimitExceeded                         │
//! │      ├── billsplit_core::settle_with                                    │
//! │      │        ├── bad bill ─────► ValidationError                       │
//! │      │        └── engine bug ───► Internal (logged)                     │
//! │      ▼                                                                  │
//! │  Settlement { bill_id, invoices, total }                                │
//! │      │                                                                  │
//! │      └── ledger_entries() ──────► rows for the storage layer            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The service holds no mutable state. Wrap it in an `Arc` and call it from
//! as many threads as needed.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use billsplit_core::ledger::ledger_entries;
use billsplit_core::{invoices_total, settle_with, Bill, BillId, Invoice, LedgerEntry, Money};

use crate::config::SettlementConfig;
use crate::error::ApiError;

// =============================================================================
// Settlement Result
// =============================================================================

/// The outcome of settling one bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub bill_id: BillId,
    pub invoices: Vec<Invoice>,
    /// Sum of all invoice values.
    pub total: Money,
}

impl Settlement {
    /// Ledger rows to persist for this bill, one per invoice.
    pub fn ledger_entries(&self) -> Vec<LedgerEntry> {
        ledger_entries(self.bill_id, &self.invoices)
    }
}

// =============================================================================
// Service
// =============================================================================

/// Settles bills under a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct SettlementService {
    config: SettlementConfig,
}

impl SettlementService {
    pub fn new(config: SettlementConfig) -> Self {
        SettlementService { config }
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Settles a bill after checking it against the configured limits.
    #[instrument(
        skip(self, bill),
        fields(
            bill_id = bill.id.0,
            items = bill.items.len(),
            payments = bill.payments.len()
        )
    )]
    pub fn settle(&self, bill: &Bill) -> Result<Settlement, ApiError> {
        self.check_limits(bill)?;

        let invoices = settle_with(bill, &self.config.settlement_options())?;
        let total = invoices_total(&invoices);

        info!(invoices = invoices.len(), %total, "Bill settled");

        Ok(Settlement {
            bill_id: bill.id,
            invoices,
            total,
        })
    }

    /// Parses a wire bill and settles it.
    ///
    /// The id never travels inside the body, so the caller passes it in.
    pub fn settle_json(&self, bill_id: BillId, payload: &str) -> Result<Settlement, ApiError> {
        let mut bill: Bill = serde_json::from_str(payload).map_err(|e| {
            warn!(bill_id = bill_id.0, error = %e, "Rejected malformed bill");
            ApiError::from(e)
        })?;
        bill.id = bill_id;

        self.settle(&bill)
    }

    fn check_limits(&self, bill: &Bill) -> Result<(), ApiError> {
        let limits = &self.config.limits;

        if bill.items.len() > limits.max_items {
            return Err(ApiError::limit_exceeded("items", bill.items.len(), limits.max_items));
        }

        if bill.payments.len() > limits.max_payments {
            return Err(ApiError::limit_exceeded(
                "payments",
                bill.payments.len(),
                limits.max_payments,
            ));
        }

        if let Some(item) = bill
            .items
            .iter()
            .find(|item| item.shares.len() > limits.max_shares_per_item)
        {
            return Err(ApiError::limit_exceeded(
                "shares per item",
                item.shares.len(),
                limits.max_shares_per_item,
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
