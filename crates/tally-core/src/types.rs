//! # Domain Types
//!
//! Input types for the totals engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ CatalogueItem   │──►│    LineItem     │   │ DocumentDiscount│       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  unit price     │   │  quantity       │   │  Percent | Fixed│       │
//! │  │  tax treatment  │   │  unit price     │   └─────────────────┘       │
//! │  └─────────────────┘   │  LineDiscount   │   ┌─────────────────┐       │
//! │        (live)          │  TaxTreatment   │   │ DepositRequest  │       │
//! │                        └─────────────────┘   │  ─────────────  │       │
//! │                            (snapshot)        │  Percent | Fixed│       │
//! │                                              │  amount paid    │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `LineItem` copies price and tax out of the catalogue when it is
//! created. Editing the catalogue afterwards never changes existing lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::tax::TaxTreatment;

// =============================================================================
// Pricing Mode
// =============================================================================

/// How entered prices relate to tax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// Price + tax shown separately.
    /// Display: $10.00 + $1.00 tax = $11.00
    #[default]
    Exclusive,

    /// Price includes tax.
    /// Display: $11.00 (includes $1.00 tax)
    Inclusive,
}

// =============================================================================
// Line Discount
// =============================================================================

/// Discount attached to a single line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineDiscount {
    #[default]
    None,

    /// Percentage of the line base, 0..=100.
    Percent {
        #[ts(type = "string")]
        value: Decimal,
    },

    /// Fixed amount in minor units, taken as-is.
    Amount {
        #[serde(rename = "valueCents")]
        value_cents: i64,
    },
}

// =============================================================================
// Catalogue Item
// =============================================================================

/// A sellable item or service as currently listed in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueItem {
    pub id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub tax: TaxTreatment,
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of a quote, invoice or credit memo.
///
/// Uses the snapshot pattern: price and tax are frozen copies, not
/// references into the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Free text shown on the document.
    #[serde(default)]
    pub description: String,

    /// Catalogue item this line was created from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalogue_item_id: Option<String>,

    /// Quantity; may be fractional (1.5 hours).
    #[ts(type = "string")]
    pub quantity: Decimal,

    /// Unit price in cents at the time the line was created.
    pub unit_price_cents: i64,

    #[serde(default)]
    pub discount: LineDiscount,

    /// Tax treatment at the time the line was created.
    pub tax: TaxTreatment,
}

impl LineItem {
    /// Creates a manually entered line.
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_price_cents: i64,
        tax: TaxTreatment,
    ) -> Self {
        LineItem {
            description: description.into(),
            catalogue_item_id: None,
            quantity,
            unit_price_cents,
            discount: LineDiscount::None,
            tax,
        }
    }

    /// Creates a line from a catalogue selection, freezing its price and tax.
    pub fn from_catalogue(item: &CatalogueItem, quantity: Decimal) -> Self {
        LineItem {
            description: item.name.clone(),
            catalogue_item_id: Some(item.id.clone()),
            quantity,
            unit_price_cents: item.unit_price_cents,
            discount: LineDiscount::None,
            tax: item.tax.clone(),
        }
    }

    /// Creates a line billing tracked time. `hours` may be fractional.
    pub fn from_time_entry(
        description: impl Into<String>,
        hours: Decimal,
        hourly_rate_cents: i64,
        tax: TaxTreatment,
    ) -> Self {
        LineItem::new(description, hours, hourly_rate_cents, tax)
    }

    /// Builder-style discount setter.
    pub fn with_discount(mut self, discount: LineDiscount) -> Self {
        self.discount = discount;
        self
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Document-Level Adjustments
// =============================================================================

/// Whether a document-level value is a percentage or a fixed amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Percent,
    /// Amount in major currency units (15 = $15.00).
    Fixed,
}

/// Discount on the whole document, applied after line discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDiscount {
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    #[ts(type = "string")]
    pub value: Decimal,
}

impl DocumentDiscount {
    pub fn percent(value: Decimal) -> Self {
        DocumentDiscount {
            kind: AdjustmentKind::Percent,
            value,
        }
    }

    pub fn fixed(value: Decimal) -> Self {
        DocumentDiscount {
            kind: AdjustmentKind::Fixed,
            value,
        }
    }
}

/// A partial-payment claim against the document total.
///
/// `amount_paid_cents` tracks payments against the deposit only; general
/// payments are tracked separately on the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    #[ts(type = "string")]
    pub value: Decimal,
    #[serde(default)]
    pub amount_paid_cents: i64,
}

impl DepositRequest {
    pub fn percent(value: Decimal) -> Self {
        DepositRequest {
            kind: AdjustmentKind::Percent,
            value,
            amount_paid_cents: 0,
        }
    }

    pub fn fixed(value: Decimal) -> Self {
        DepositRequest {
            kind: AdjustmentKind::Fixed,
            value,
            amount_paid_cents: 0,
        }
    }
}

// =============================================================================
// Document Kind & Status
// =============================================================================

/// The kind of document, used for numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Invoice,
    Quote,
    CreditMemo,
}

/// Lifecycle of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Lines may still be edited.
    #[default]
    Draft,
    /// Sent or saved for the first time; lines and totals are frozen.
    Issued,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn consulting() -> CatalogueItem {
        CatalogueItem {
            id: "cat-1".to_string(),
            name: "Consulting".to_string(),
            unit_price_cents: 12000,
            tax: TaxTreatment::new("GST", dec!(10)),
        }
    }

    #[test]
    fn test_from_catalogue_snapshots_price() {
        let mut item = consulting();
        let line = LineItem::from_catalogue(&item, dec!(2));

        // Catalogue price changes after the line was created
        item.unit_price_cents = 15000;
        item.tax = TaxTreatment::new("GST", dec!(15));

        assert_eq!(line.unit_price_cents, 12000);
        assert_eq!(line.tax.rate_percent, dec!(10));
        assert_eq!(line.catalogue_item_id.as_deref(), Some("cat-1"));
        assert_eq!(line.description, "Consulting");
    }

    #[test]
    fn test_time_entry_keeps_fractional_hours() {
        let line = LineItem::from_time_entry("Design", dec!(1.5), 8000, TaxTreatment::exempt());
        assert_eq!(line.quantity, dec!(1.5));
        assert_eq!(line.unit_price().cents(), 8000);
        assert_eq!(line.discount, LineDiscount::None);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(PricingMode::default(), PricingMode::Exclusive);
        assert_eq!(DocumentStatus::default(), DocumentStatus::Draft);
        assert_eq!(LineDiscount::default(), LineDiscount::None);
    }

    #[test]
    fn test_line_discount_json_shape() {
        let json = serde_json::to_value(LineDiscount::Amount { value_cents: 1500 }).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "AMOUNT", "valueCents": 1500 }));

        let parsed: LineDiscount =
            serde_json::from_str(r#"{ "type": "PERCENT", "value": 25 }"#).unwrap();
        assert_eq!(parsed, LineDiscount::Percent { value: dec!(25) });
    }

    #[test]
    fn test_line_item_parses_without_optional_fields() {
        let line: LineItem = serde_json::from_str(
            r#"{
                "quantity": "1.5",
                "unitPriceCents": 8000,
                "tax": { "name": "GST", "ratePercent": 10 }
            }"#,
        )
        .unwrap();
        assert_eq!(line.discount, LineDiscount::None);
        assert!(!line.tax.is_reverse_charge);
        assert_eq!(line.quantity, dec!(1.5));
    }
}
