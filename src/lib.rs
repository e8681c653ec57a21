//! # Shiftbook Core
//!
//! A cash-shift reconciliation library for retail and lottery
//! point-of-sale operations, covering report capture, daily
//! aggregation, and employee over/short tracking.
//!
//! ## Features
//!
//! - **Shift reports**: Day and night shift capture with POS drawer and lottery till sections
//! - **Reconciliation arithmetic**: Derived sales, deposit, and over/short figures with exact cent rounding
//! - **Tolerant intake**: Hand-keyed amounts arrive as numbers, strings, or `"even"` and coerce safely
//! - **Derived collections**: Daily aggregates and per-employee over/short totals rebuilt by full folds
//! - **Edit policy**: Submission grace window for employees, full amendment rights for managers
//! - **Storage abstraction**: JSON file and in-memory backends behind a trait-based design
//!
//! ## Quick Start
//!
//! ```rust
//! use shiftbook_core::{ShiftReportBuilder, ShiftType};
//! use shiftbook_core::reconcile::PosShiftInput;
//! use chrono::NaiveDate;
//!
//! let report = ShiftReportBuilder::with_generated_id(
//!     NaiveDate::from_ymd_opt(2025, 5, 7).unwrap(),
//!     ShiftType::Day,
//!     "John Smith".to_string(),
//! )
//! .pos_shift(PosShiftInput {
//!     am_start_till: Some(500.0.into()),
//!     expected_deposit: Some(2500.0.into()),
//!     lottery_till_added: Some(200.0.into()),
//!     transfer_bank_actually_have: Some(2480.0.into()),
//!     comments: None,
//! })
//! .build()
//! .unwrap();
//!
//! let pos = report.pos_shift_data.as_ref().unwrap();
//! assert_eq!(pos.total_pos_sales.to_string(), "1800.00");
//! assert_eq!(pos.over_short.to_string(), "-20.00");
//!
//! // Recording, submission and aggregation run against a storage backend:
//! // let mut book = ShiftBook::new(MemoryStorage::new());
//! // let stored = book.record_report(report).await?;
//! // book.submit_report(&stored.id).await?;
//! // book.rebuild_derived().await?;
//! ```

pub mod reconcile;
pub mod reports;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use reconcile::*;
pub use reports::*;
pub use traits::*;
pub use types::*;
pub use utils::*;

// Re-export report patterns for convenience
pub use reports::report::patterns;
