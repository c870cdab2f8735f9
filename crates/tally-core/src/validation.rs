//! # Validation Module
//!
//! Caller-side checks that run before the totals engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Document editor                                              │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Quantity, price, rate and discount bounds                         │
//! │  └── Deposit against the computed total                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Totals engine                                                │
//! │  └── Assumes valid input, never fails, clamps where it can             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::validation::{validate_quantity, validate_deposit_amount};
//!
//! assert!(validate_quantity(Decimal::new(15, 1)).is_ok());
//! assert!(validate_deposit_amount(25_000, 20_000).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::line::calculate_line;
use crate::money::Money;
use crate::types::{
    AdjustmentKind, DepositRequest, DocumentDiscount, LineDiscount, LineItem, PricingMode,
};
use crate::{MAX_LINE_ITEMS, MAX_QUANTITY, MAX_UNIT_PRICE_CENTS};

/// Result type for field-level validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a tax display label.
pub const MAX_TAX_NAME_LEN: usize = 50;

// =============================================================================
// Line Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must not be negative
/// - Must be positive (> 0); fractional values are fine
/// - Must not exceed [`MAX_QUANTITY`]
pub fn validate_quantity(quantity: Decimal) -> CoreResult<()> {
    if quantity.is_sign_negative() && !quantity.is_zero() {
        return Err(CoreError::NegativeQuantityOrPrice {
            field: "quantity".to_string(),
        });
    }

    if quantity.is_zero() {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }

    if quantity > Decimal::from(MAX_QUANTITY) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: "0".to_string(),
            max: MAX_QUANTITY.to_string(),
        }
        .into());
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_unit_price_cents;
///
/// assert!(validate_unit_price_cents(1099).is_ok());  // $10.99
/// assert!(validate_unit_price_cents(0).is_ok());     // Free item
/// assert!(validate_unit_price_cents(-100).is_err()); // Invalid
/// assert!(validate_unit_price_cents(i64::MAX).is_err());
/// ```
pub fn validate_unit_price_cents(cents: i64) -> CoreResult<()> {
    if cents < 0 {
        return Err(CoreError::NegativeQuantityOrPrice {
            field: "unit price".to_string(),
        });
    }

    if cents > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: "0".to_string(),
            max: MAX_UNIT_PRICE_CENTS.to_string(),
        }
        .into());
    }

    Ok(())
}

/// Validates a percentage in 0..=100.
pub fn validate_percent(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        });
    }

    Ok(())
}

/// Validates a tax rate and its display label.
pub fn validate_tax_rate(name: &str, rate_percent: Decimal) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "tax name".to_string(),
        });
    }

    if name.len() > MAX_TAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "tax name".to_string(),
            max: MAX_TAX_NAME_LEN,
        });
    }

    validate_percent("tax rate", rate_percent)
}

/// Validates a line discount against the base it discounts.
///
/// ## Rules
/// - Percent must be within 0..=100
/// - Amount must be non-negative and not exceed `base_cents`
pub fn validate_line_discount(discount: &LineDiscount, base_cents: i64) -> CoreResult<()> {
    match *discount {
        LineDiscount::None => Ok(()),
        LineDiscount::Percent { value } => {
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(CoreError::InvalidDiscountRange {
                    reason: format!("percent discount {} is outside 0-100", value),
                });
            }
            Ok(())
        }
        LineDiscount::Amount { value_cents } => {
            if value_cents < 0 {
                return Err(CoreError::InvalidDiscountRange {
                    reason: "discount amount cannot be negative".to_string(),
                });
            }
            if value_cents > base_cents {
                return Err(CoreError::InvalidDiscountRange {
                    reason: format!(
                        "discount {} exceeds line amount {}",
                        Money::from_cents(value_cents),
                        Money::from_cents(base_cents)
                    ),
                });
            }
            Ok(())
        }
    }
}

/// Validates everything about a single line.
pub fn validate_line_item(item: &LineItem) -> CoreResult<()> {
    validate_quantity(item.quantity)?;
    validate_unit_price_cents(item.unit_price_cents)?;
    validate_tax_rate(&item.tax.name, item.tax.rate_percent)?;

    let base_cents = calculate_line(item, PricingMode::Exclusive).base_cents;
    validate_line_discount(&item.discount, base_cents)
}

/// Validates the number of lines on a document.
pub fn validate_line_count(count: usize) -> ValidationResult<()> {
    if count > MAX_LINE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "line items".to_string(),
            min: "0".to_string(),
            max: MAX_LINE_ITEMS.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Document Validators
// =============================================================================

/// Validates a document discount against the net subtotal it reduces.
pub fn validate_document_discount(
    discount: &DocumentDiscount,
    net_subtotal_cents: i64,
) -> CoreResult<()> {
    match discount.kind {
        AdjustmentKind::Percent => {
            if discount.value < Decimal::ZERO || discount.value > Decimal::ONE_HUNDRED {
                return Err(CoreError::InvalidDiscountRange {
                    reason: format!("percent discount {} is outside 0-100", discount.value),
                });
            }
        }
        AdjustmentKind::Fixed => {
            let cents = Money::from_major(discount.value).cents();
            if cents < 0 {
                return Err(CoreError::InvalidDiscountRange {
                    reason: "discount amount cannot be negative".to_string(),
                });
            }
            if cents > net_subtotal_cents {
                return Err(CoreError::InvalidDiscountRange {
                    reason: format!(
                        "discount {} exceeds subtotal {}",
                        Money::from_cents(cents),
                        Money::from_cents(net_subtotal_cents)
                    ),
                });
            }
        }
    }

    Ok(())
}

/// Validates the shape of a deposit request (before a total is known).
pub fn validate_deposit_request(deposit: &DepositRequest) -> ValidationResult<()> {
    match deposit.kind {
        AdjustmentKind::Percent => validate_percent("deposit", deposit.value)?,
        AdjustmentKind::Fixed => {
            if deposit.value.is_sign_negative() && !deposit.value.is_zero() {
                return Err(ValidationError::MustBePositive {
                    field: "deposit".to_string(),
                });
            }
        }
    }

    validate_paid_cents("deposit paid", deposit.amount_paid_cents)
}

/// Validates a computed deposit against the document total.
///
/// ## Rules
/// - `0 < deposit <= total`
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Deposit dialog: "Request 25%"                                          │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  calculate_document() → deposit 5000, total 20000                       │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_deposit_amount(5000, 20000) ← THIS FUNCTION                   │
/// │       │                                                                 │
/// │       ├── deposit <= 0?     → "Deposit must be greater than zero"       │
/// │       ├── deposit > total?  → "Deposit cannot exceed the document total"│
/// │       └── OK → save deposit configuration                               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_deposit_amount(deposit_cents: i64, total_cents: i64) -> CoreResult<()> {
    if deposit_cents <= 0 || deposit_cents > total_cents {
        return Err(CoreError::InvalidDepositAmount {
            deposit_cents,
            total_cents,
        });
    }

    Ok(())
}

/// Validates a payment figure.
pub fn validate_paid_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: i64::MAX.to_string(),
        });
    }

    Ok(())
}

/// Validates an ISO 4217 style currency code ("USD", "AUD").
pub fn validate_currency_code(code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "currency".to_string(),
        });
    }

    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must be three uppercase letters".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
