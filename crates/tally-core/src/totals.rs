//! # Document Totals
//!
//! Aggregates line calculations into the reconciled breakdown shown on a
//! quote, invoice or credit memo.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. calculate_line() for every line                                     │
//! │        Σ base ──► subtotal     Σ applied discount ──► line discount     │
//! │        Σ tax  ──► tax          group by (name, rate, reverse charge)    │
//! │                                                                         │
//! │  2. document discount on (subtotal − line discount)                     │
//! │        Percent ──► round(net subtotal × v / 100)                        │
//! │        Fixed   ──► round(v × 100)                                       │
//! │        Tax is NOT recomputed after this step.                           │
//! │                                                                         │
//! │  3. total = subtotal − line discount − document discount + tax          │
//! │        (inclusive pricing: tax is already inside, not added)            │
//! │                                                                         │
//! │  4. deposit = Percent ? round(total × v / 100) : round(v × 100)         │
//! │                                                                         │
//! │  5. balance = total − paid − deposit paid                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Document Discount and Tax
//! Tax is computed on the line nets before the document discount is
//! subtracted, so it is charged on a slightly larger base than the final
//! discounted net. Changing the order would change issued figures, so it
//! stays this way until the business decides otherwise.
//!
//! ## Failure Semantics
//! Nothing here fails. Overpayment gives a negative balance (credit due);
//! an oversized discount gives a negative total. Callers validate with
//! [`crate::validation`] before saving.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::line::{calculate_line, LineCalculation};
use crate::money::Money;
use crate::tax::{has_mixed_rates, has_reverse_charge, TaxGroup, TaxGroupAccumulator};
use crate::types::{AdjustmentKind, DepositRequest, DocumentDiscount, LineItem, PricingMode};

// =============================================================================
// Input
// =============================================================================

/// Everything the aggregation depends on. Two equal inputs always give
/// equal summaries, so this is also the complete cache key.
#[derive(Debug, Clone, Copy)]
pub struct DocumentInput<'a> {
    pub lines: &'a [LineItem],
    pub pricing_mode: PricingMode,
    pub discount: Option<DocumentDiscount>,
    pub deposit: Option<DepositRequest>,
    /// General payments received, independent of deposit payments.
    pub paid_cents: i64,
}

impl<'a> DocumentInput<'a> {
    /// Lines only: exclusive pricing, no discount, deposit or payments.
    pub fn new(lines: &'a [LineItem]) -> Self {
        DocumentInput {
            lines,
            pricing_mode: PricingMode::Exclusive,
            discount: None,
            deposit: None,
            paid_cents: 0,
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// The reconciled financial breakdown of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    /// Σ line base.
    pub subtotal_cents: i64,
    /// Σ applied line discount.
    pub line_discount_cents: i64,
    pub document_discount_cents: i64,
    /// Σ line tax.
    pub tax_cents: i64,
    pub total_cents: i64,
    pub tax_breakdown: Vec<TaxGroup>,
}

impl DocumentTotals {
    /// Subtotal after line discounts, before the document discount.
    #[inline]
    pub fn net_subtotal_cents(&self) -> i64 {
        self.subtotal_cents - self.line_discount_cents
    }
}

/// Totals plus per-line figures, deposit, balance and rendering hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub pricing_mode: PricingMode,
    pub totals: DocumentTotals,
    /// One entry per input line, in input order.
    pub lines: Vec<LineCalculation>,
    /// Requested deposit, when a deposit is configured.
    pub deposit_amount_cents: Option<i64>,
    pub deposit_paid_cents: i64,
    pub paid_cents: i64,
    /// `total − paid − deposit paid`; negative means credit is due.
    pub balance_cents: i64,
    /// More than one distinct nominal rate: render an itemized breakdown.
    pub has_mixed_rates: bool,
    /// At least one reverse-charged group: render it on its own line.
    pub has_reverse_charge: bool,
}

impl DocumentSummary {
    /// Whether the presentation layer should itemize tax per group instead
    /// of showing a single tax line.
    #[inline]
    pub fn itemize_tax(&self) -> bool {
        self.has_mixed_rates || self.has_reverse_charge
    }

    /// Re-derives the balance from these (possibly frozen) totals and new
    /// payment figures. Totals, lines and the deposit amount are untouched.
    pub fn with_payments(&self, paid_cents: i64, deposit_paid_cents: i64) -> DocumentSummary {
        DocumentSummary {
            paid_cents,
            deposit_paid_cents,
            balance_cents: balance_cents(self.totals.total_cents, paid_cents, deposit_paid_cents),
            ..self.clone()
        }
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Computes the full document summary.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use tally_core::totals::{calculate_document, DocumentInput};
/// use tally_core::{DocumentDiscount, LineItem, TaxTreatment};
///
/// let lines = vec![LineItem::new(
///     "Retainer",
///     Decimal::ONE,
///     100_000,
///     TaxTreatment::new("GST", Decimal::TEN),
/// )];
/// let input = DocumentInput {
///     discount: Some(DocumentDiscount::percent(Decimal::TEN)),
///     ..DocumentInput::new(&lines)
/// };
///
/// let summary = calculate_document(&input);
/// assert_eq!(summary.totals.document_discount_cents, 10_000);
/// // 100000 − 10000 + 10000 tax
/// assert_eq!(summary.totals.total_cents, 100_000);
/// ```
pub fn calculate_document(input: &DocumentInput<'_>) -> DocumentSummary {
    let mut subtotal = Money::zero();
    let mut line_discount = Money::zero();
    let mut tax = Money::zero();
    let mut groups = TaxGroupAccumulator::default();
    let mut lines = Vec::with_capacity(input.lines.len());

    for item in input.lines {
        let calc = calculate_line(item, input.pricing_mode);
        subtotal += Money::from_cents(calc.base_cents);
        line_discount += Money::from_cents(calc.applied_discount_cents());
        tax += Money::from_cents(calc.tax_cents);
        groups.add(&item.tax, &calc);
        lines.push(calc);
    }

    let net_subtotal = subtotal - line_discount;
    let document_discount = input
        .discount
        .map(|d| document_discount_cents(&d, net_subtotal.cents()))
        .unwrap_or_default();

    let mut total = net_subtotal - Money::from_cents(document_discount);
    if input.pricing_mode == PricingMode::Exclusive {
        total += tax;
    }

    let deposit_amount = input
        .deposit
        .map(|d| deposit_amount_cents(&d, total.cents()));
    let deposit_paid = input.deposit.map(|d| d.amount_paid_cents).unwrap_or(0);

    let tax_breakdown = groups.finish();
    let mixed = has_mixed_rates(&tax_breakdown);
    let reverse = has_reverse_charge(&tax_breakdown);

    debug!(
        lines = lines.len(),
        subtotal_cents = subtotal.cents(),
        tax_cents = tax.cents(),
        total_cents = total.cents(),
        groups = tax_breakdown.len(),
        "document totals calculated"
    );

    DocumentSummary {
        pricing_mode: input.pricing_mode,
        totals: DocumentTotals {
            subtotal_cents: subtotal.cents(),
            line_discount_cents: line_discount.cents(),
            document_discount_cents: document_discount,
            tax_cents: tax.cents(),
            total_cents: total.cents(),
            tax_breakdown,
        },
        lines,
        deposit_amount_cents: deposit_amount,
        deposit_paid_cents: deposit_paid,
        paid_cents: input.paid_cents,
        balance_cents: balance_cents(total.cents(), input.paid_cents, deposit_paid),
        has_mixed_rates: mixed,
        has_reverse_charge: reverse,
    }
}

/// Document discount in cents for the given net subtotal.
pub fn document_discount_cents(discount: &DocumentDiscount, net_subtotal_cents: i64) -> i64 {
    match discount.kind {
        AdjustmentKind::Percent => Money::from_cents(net_subtotal_cents)
            .percent(discount.value)
            .cents(),
        AdjustmentKind::Fixed => Money::from_major(discount.value).cents(),
    }
}

/// Deposit requested against `total_cents`. Not bounds-checked; see
/// [`crate::validation::validate_deposit_amount`].
pub fn deposit_amount_cents(deposit: &DepositRequest, total_cents: i64) -> i64 {
    match deposit.kind {
        AdjustmentKind::Percent => Money::from_cents(total_cents).percent(deposit.value).cents(),
        AdjustmentKind::Fixed => Money::from_major(deposit.value).cents(),
    }
}

/// `total − paid − deposit paid`. Both payment streams reduce the same total.
#[inline]
pub fn balance_cents(total_cents: i64, paid_cents: i64, deposit_paid_cents: i64) -> i64 {
    total_cents
        .saturating_sub(paid_cents)
        .saturating_sub(deposit_paid_cents)
}

// =============================================================================
// Unit Tests
// =============================================================================
