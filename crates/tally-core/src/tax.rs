//! # Tax Treatments and Tax Groups
//!
//! One representation for how a line is taxed, plus the grouping used for
//! itemized tax breakdowns.
//!
//! ## Legacy Codes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Older callers send a three-value tax code. It is translated ONCE at    │
//! │  the boundary; the engine only ever sees a TaxTreatment.                │
//! │                                                                         │
//! │    GST       ──►  TaxTreatment { "GST",      10%, reverse: false }      │
//! │    GST_FREE  ──►  TaxTreatment { "GST Free",  0%, reverse: false }      │
//! │    NONE      ──►  TaxTreatment { "No Tax",    0%, reverse: false }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::line::LineCalculation;

/// Rate applied by the legacy `GST` code.
pub const LEGACY_GST_RATE_PERCENT: Decimal = Decimal::TEN;

// =============================================================================
// Tax Treatment
// =============================================================================

/// How a line is taxed: rate snapshot, display label, reverse-charge flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxTreatment {
    /// Display label ("GST", "VAT 20%").
    pub name: String,

    /// Nominal rate in percent (10 = 10%).
    #[ts(type = "string")]
    pub rate_percent: Decimal,

    /// The customer accounts for the tax; the document shows none.
    #[serde(default)]
    pub is_reverse_charge: bool,
}

impl TaxTreatment {
    /// Creates a standard (not reverse charged) treatment.
    pub fn new(name: impl Into<String>, rate_percent: Decimal) -> Self {
        TaxTreatment {
            name: name.into(),
            rate_percent,
            is_reverse_charge: false,
        }
    }

    /// Creates a reverse-charged treatment. The nominal rate is kept for
    /// reporting; the effective rate is zero.
    pub fn reverse_charge(name: impl Into<String>, rate_percent: Decimal) -> Self {
        TaxTreatment {
            name: name.into(),
            rate_percent,
            is_reverse_charge: true,
        }
    }

    /// No tax at all.
    pub fn exempt() -> Self {
        TaxTreatment::from(LegacyTaxCode::None)
    }

    /// Rate actually charged on the document.
    #[inline]
    pub fn effective_rate(&self) -> Decimal {
        if self.is_reverse_charge {
            Decimal::ZERO
        } else {
            self.rate_percent
        }
    }
}

impl Default for TaxTreatment {
    fn default() -> Self {
        TaxTreatment::exempt()
    }
}

// =============================================================================
// Legacy Tax Code
// =============================================================================

/// The three-value tax code used by older document records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegacyTaxCode {
    Gst,
    GstFree,
    None,
}

impl From<LegacyTaxCode> for TaxTreatment {
    fn from(code: LegacyTaxCode) -> Self {
        match code {
            LegacyTaxCode::Gst => TaxTreatment::new("GST", LEGACY_GST_RATE_PERCENT),
            LegacyTaxCode::GstFree => TaxTreatment::new("GST Free", Decimal::ZERO),
            LegacyTaxCode::None => TaxTreatment::new("No Tax", Decimal::ZERO),
        }
    }
}

// =============================================================================
// Tax Group
// =============================================================================

/// A bucket of lines sharing tax name, nominal rate and reverse-charge flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxGroup {
    pub name: String,
    #[ts(type = "string")]
    pub rate_percent: Decimal,
    /// Sum of the tax-exclusive net of the grouped lines.
    pub taxable_cents: i64,
    pub tax_cents: i64,
    pub is_reverse_charge: bool,
}

impl TaxGroup {
    fn matches(&self, tax: &TaxTreatment) -> bool {
        self.name == tax.name
            && self.rate_percent == tax.rate_percent
            && self.is_reverse_charge == tax.is_reverse_charge
    }
}

/// Accumulates lines into tax groups, in order of first appearance.
///
/// Documents rarely carry more than a handful of distinct treatments, so a
/// linear scan keeps the output order stable without a map.
#[derive(Debug, Default)]
pub(crate) struct TaxGroupAccumulator {
    groups: Vec<TaxGroup>,
}

impl TaxGroupAccumulator {
    pub(crate) fn add(&mut self, tax: &TaxTreatment, line: &LineCalculation) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.matches(tax)) {
            group.taxable_cents = group.taxable_cents.saturating_add(line.net_cents);
            group.tax_cents = group.tax_cents.saturating_add(line.tax_cents);
            return;
        }

        self.groups.push(TaxGroup {
            name: tax.name.clone(),
            rate_percent: tax.rate_percent,
            taxable_cents: line.net_cents,
            tax_cents: line.tax_cents,
            is_reverse_charge: tax.is_reverse_charge,
        });
    }

    pub(crate) fn finish(self) -> Vec<TaxGroup> {
        self.groups
    }
}

/// True when the groups carry more than one distinct nominal rate.
pub fn has_mixed_rates(groups: &[TaxGroup]) -> bool {
    match groups.split_first() {
        Some((first, rest)) => rest.iter().any(|g| g.rate_percent != first.rate_percent),
        None => false,
    }
}

/// True when any group is reverse charged.
pub fn has_reverse_charge(groups: &[TaxGroup]) -> bool {
    groups.iter().any(|g| g.is_reverse_charge)
}

// =============================================================================
// Unit Tests
// =============================================================================
