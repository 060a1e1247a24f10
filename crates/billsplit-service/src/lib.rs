//! # billsplit-service: Settlement Service Layer
//!
//! Wraps the pure engine in `billsplit-core` with everything a request
//! handler needs around it.
//!
//! ## Modules
//!
//! - [`config`] - `SettlementConfig`: TOML file, env overrides, validation
//! - [`service`] - `SettlementService` and the `Settlement` it returns
//! - [`error`] - `ApiError` (what callers see) and `ConfigError`
//! - [`telemetry`] - `tracing` subscriber setup
//!
//! ## Example Usage
//!
//! ```rust
//! use billsplit_service::{SettlementConfig, SettlementService};
//! use billsplit_core::BillId;
//!
//! let service = SettlementService::new(SettlementConfig::default());
//!
//! let body = r#"{
//!     "items": [{ "title": "Lunch", "price_per_one": "10.00", "quantity": 1,
//!                 "shares": [{ "user_id": 1, "weight": 1 }, { "user_id": 2, "weight": 1 }] }],
//!     "payments": [{ "user_id": 1, "amount": "10.00" }]
//! }"#;
//!
//! let settlement = service.settle_json(BillId(7), body).unwrap();
//! assert_eq!(settlement.invoices.len(), 1);
//! assert_eq!(settlement.total.to_string(), "5.00");
//! ```

pub mod config;
pub mod error;
pub mod service;
pub mod telemetry;

pub use config::{LimitsConfig, RoundingConfig, SettlementConfig};
pub use error::{ApiError, ConfigError, ErrorCode};
pub use service::{Settlement, SettlementService};
