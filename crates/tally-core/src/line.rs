//! # Line Calculation
//!
//! Turns one [`LineItem`] into its base, discount, net, tax and total.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quantity × unit price ──round──► base                                  │
//! │                                     │                                   │
//! │                      LineDiscount ──┤──round──► discount                │
//! │                                     ▼                                   │
//! │                        max(0, base − discount)                          │
//! │                                     │                                   │
//! │           Exclusive ◄───────────────┴───────────► Inclusive             │
//! │     net   = that amount                 gross = that amount             │
//! │     tax   = round(net × r / 100)        tax   = round(gross × r/(100+r))│
//! │     total = net + tax                   net   = gross − tax             │
//! │                                         total = gross                   │
//! │                                                                         │
//! │  r = 0 when the line is reverse charged                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step rounds to a whole cent on its own, so a document total is
//! always the plain sum of what each line displays.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{LineDiscount, LineItem, PricingMode};

/// Per-line figures, all in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineCalculation {
    /// `round(quantity × unit price)`.
    pub base_cents: i64,
    /// Requested discount. May exceed `base_cents` on unvalidated input.
    pub discount_cents: i64,
    /// Tax-exclusive amount the tax applies to.
    pub net_cents: i64,
    pub tax_cents: i64,
    /// Always `net_cents + tax_cents`.
    pub total_cents: i64,
}

impl LineCalculation {
    /// The part of the requested discount that actually reduced the line.
    ///
    /// Equal to `discount_cents` unless the discount exceeded the base.
    #[inline]
    pub fn applied_discount_cents(&self) -> i64 {
        let reduced = self.base_cents.saturating_sub(self.discount_cents).max(0);
        self.base_cents.saturating_sub(reduced)
    }
}

/// Computes one line. Never fails; out-of-range input yields clamped or
/// mathematically consistent figures.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use tally_core::line::calculate_line;
/// use tally_core::{LineItem, PricingMode, TaxTreatment};
///
/// let line = LineItem::new("Widget", Decimal::from(2), 1000, TaxTreatment::new("GST", Decimal::from(10)));
/// let calc = calculate_line(&line, PricingMode::Exclusive);
///
/// assert_eq!(calc.base_cents, 2000);
/// assert_eq!(calc.tax_cents, 200);
/// assert_eq!(calc.total_cents, 2200);
/// ```
pub fn calculate_line(item: &LineItem, mode: PricingMode) -> LineCalculation {
    let base = item.unit_price().times(item.quantity);

    let discount = match item.discount {
        LineDiscount::None => Money::zero(),
        LineDiscount::Percent { value } => base.percent(value),
        LineDiscount::Amount { value_cents } => Money::from_cents(value_cents),
    };

    if discount > base {
        debug!(
            base_cents = base.cents(),
            discount_cents = discount.cents(),
            "line discount exceeds base, net clamped to zero"
        );
    }

    let discounted = (base - discount).clamp_non_negative();
    let rate = item.tax.effective_rate();

    let (net, tax) = match mode {
        PricingMode::Exclusive => (discounted, discounted.percent(rate)),
        PricingMode::Inclusive => {
            let tax = discounted.included_tax(rate);
            (discounted - tax, tax)
        }
    };

    LineCalculation {
        base_cents: base.cents(),
        discount_cents: discount.cents(),
        net_cents: net.cents(),
        tax_cents: tax.cents(),
        total_cents: (net + tax).cents(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
