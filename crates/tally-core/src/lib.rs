//! # tally-core: Document Totals Engine for Tally
//!
//! This crate turns line items plus document-level discounts and deposits
//! into a reconciled financial breakdown. Everything here is a pure
//! function with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Tally Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Document editor / summary panel                     │   │
//! │  │    Catalogue ──► Line items ──► Totals panel ──► Export          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   line    │  │  totals   │  │    tax    │  │ validation│  │   │
//! │  │   │ per-line  │  │ document  │  │ treatment │  │  caller   │  │   │
//! │  │   │  figures  │  │ aggregate │  │  groups   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic and the rounding rule
//! - [`types`] - Line items, discounts, deposits, document kinds
//! - [`tax`] - Tax treatments, legacy code translation, tax groups
//! - [`line`] - Per-line calculation
//! - [`totals`] - Document aggregation, deposit and balance
//! - [`validation`] - Caller-side checks
//! - [`document`] - Draft/issued lifecycle and totals snapshot
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, byte for byte
//! 2. **Integer Money**: all amounts are minor units (i64)
//! 3. **Round Per Line**: displayed line totals always add up
//! 4. **Engine Never Fails**: validation lives with the caller
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::totals::{calculate_document, DocumentInput};
//! use tally_core::{DepositRequest, LineItem, TaxTreatment};
//!
//! let lines = vec![LineItem::new("Deck build", Decimal::ONE, 20_000, TaxTreatment::exempt())];
//! let input = DocumentInput {
//!     deposit: Some(DepositRequest::percent(Decimal::from(25))),
//!     paid_cents: 3_000,
//!     ..DocumentInput::new(&lines)
//! };
//!
//! let summary = calculate_document(&input);
//! assert_eq!(summary.deposit_amount_cents, Some(5_000));
//! assert_eq!(summary.balance_cents, 17_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod document;
pub mod error;
pub mod line;
pub mod money;
pub mod tax;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use document::{Document, DocumentNumberAllocator};
pub use error::{CoreError, CoreResult, ValidationError};
pub use line::{calculate_line, LineCalculation};
pub use money::Money;
pub use tax::{LegacyTaxCode, TaxGroup, TaxTreatment};
pub use totals::{calculate_document, DocumentInput, DocumentSummary, DocumentTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines on a single document.
///
/// Keeps editor tables and exported snapshots to a reasonable size.
pub const MAX_LINE_ITEMS: usize = 500;

/// Largest accepted unit price, in minor units ($100,000,000.00).
pub const MAX_UNIT_PRICE_CENTS: i64 = 10_000_000_000;

/// Largest accepted line quantity.
///
/// With [`MAX_UNIT_PRICE_CENTS`] and [`MAX_LINE_ITEMS`] this keeps every
/// validated document total well inside `i64`, even at a 100% tax rate.
pub const MAX_QUANTITY: i64 = 100_000;
