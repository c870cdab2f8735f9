//! # Configuration
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TALLY_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only after initialization.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tally_core::validation::{validate_currency_code, validate_tax_rate};
use tally_core::{DocumentKind, PricingMode, TaxTreatment};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Currency code (ISO 4217) stamped on new documents.
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Pricing mode for documents that don't specify one.
    pub pricing_mode: PricingMode,

    /// Tax treatment for lines that carry neither a treatment nor a
    /// legacy tax code.
    pub default_tax: TaxTreatment,

    pub numbering: NumberingConfig,
}

/// Prefixes and padding for document numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberingConfig {
    pub invoice_prefix: String,
    pub quote_prefix: String,
    pub credit_memo_prefix: String,
    /// Zero padding of the sequence part ("0042" for width 4).
    pub width: usize,
}

impl NumberingConfig {
    pub fn prefix(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::Invoice => &self.invoice_prefix,
            DocumentKind::Quote => &self.quote_prefix,
            DocumentKind::CreditMemo => &self.credit_memo_prefix,
        }
    }
}

impl Default for NumberingConfig {
    fn default() -> Self {
        NumberingConfig {
            invoice_prefix: "INV-".to_string(),
            quote_prefix: "QUO-".to_string(),
            credit_memo_prefix: "CM-".to_string(),
            width: 4,
        }
    }
}

impl Default for AppConfig {
    /// Defaults suitable for an Australian small business.
    ///
    /// - Currency: AUD ($, 2 decimals)
    /// - Pricing: tax exclusive
    /// - Default tax: GST 10%
    fn default() -> Self {
        AppConfig {
            currency_code: "AUD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            pricing_mode: PricingMode::Exclusive,
            default_tax: TaxTreatment::new("GST", Decimal::TEN),
            numbering: NumberingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// ## Environment Variables
    /// - `TALLY_CURRENCY_CODE`: e.g. "USD"
    /// - `TALLY_CURRENCY_SYMBOL`: e.g. "$"
    /// - `TALLY_CURRENCY_DECIMALS`: 0-4
    /// - `TALLY_PRICING_MODE`: "exclusive" or "inclusive"
    /// - `TALLY_DEFAULT_TAX_NAME`, `TALLY_DEFAULT_TAX_RATE` (percent, e.g. "8.25")
    /// - `TALLY_INVOICE_PREFIX`, `TALLY_QUOTE_PREFIX`, `TALLY_CREDIT_MEMO_PREFIX`
    /// - `TALLY_NUMBER_WIDTH`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from any key lookup (environment, tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(code) = lookup("TALLY_CURRENCY_CODE") {
            validate_currency_code(&code)
                .map_err(|_| ConfigError::InvalidValue("TALLY_CURRENCY_CODE".to_string()))?;
            config.currency_code = code;
        }

        if let Some(symbol) = lookup("TALLY_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(decimals) = lookup("TALLY_CURRENCY_DECIMALS") {
            config.currency_decimals = decimals
                .parse::<u8>()
                .ok()
                .filter(|d| *d <= 4)
                .ok_or_else(|| ConfigError::InvalidValue("TALLY_CURRENCY_DECIMALS".to_string()))?;
        }

        if let Some(mode) = lookup("TALLY_PRICING_MODE") {
            config.pricing_mode = match mode.to_ascii_lowercase().as_str() {
                "exclusive" => PricingMode::Exclusive,
                "inclusive" => PricingMode::Inclusive,
                _ => return Err(ConfigError::InvalidValue("TALLY_PRICING_MODE".to_string())),
            };
        }

        if let Some(name) = lookup("TALLY_DEFAULT_TAX_NAME") {
            config.default_tax.name = name;
        }

        if let Some(rate) = lookup("TALLY_DEFAULT_TAX_RATE") {
            config.default_tax.rate_percent = Decimal::from_str(rate.trim())
                .map_err(|_| ConfigError::InvalidValue("TALLY_DEFAULT_TAX_RATE".to_string()))?;
        }

        validate_tax_rate(&config.default_tax.name, config.default_tax.rate_percent)
            .map_err(|e| ConfigError::InvalidDefaultTax(e.to_string()))?;

        if let Some(prefix) = lookup("TALLY_INVOICE_PREFIX") {
            config.numbering.invoice_prefix = prefix;
        }
        if let Some(prefix) = lookup("TALLY_QUOTE_PREFIX") {
            config.numbering.quote_prefix = prefix;
        }
        if let Some(prefix) = lookup("TALLY_CREDIT_MEMO_PREFIX") {
            config.numbering.credit_memo_prefix = prefix;
        }

        if let Some(width) = lookup("TALLY_NUMBER_WIDTH") {
            config.numbering.width = width
                .parse()
                .ok()
                .filter(|w| (1..=12).contains(w))
                .ok_or_else(|| ConfigError::InvalidValue("TALLY_NUMBER_WIDTH".to_string()))?;
        }

        Ok(config)
    }

    /// Formats a minor-unit amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use tally_cli::config::AppConfig;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Invalid default tax: {0}")]
    InvalidDefaultTax(String),
}
