//! # Document Files
//!
//! JSON document files as written by hand or exported from the editor.
//!
//! ```text
//! {
//!   "kind": "invoice",
//!   "pricingMode": "exclusive",          // optional, config default
//!   "catalogue": [ { "id": "cat-1", ... } ],
//!   "lines": [
//!     { "catalogueItemId": "cat-1", "quantity": 2 },
//!     { "description": "Design", "hours": "1.5", "unitPriceCents": 8000 },
//!     { "description": "Legacy", "quantity": 1, "unitPriceCents": 500, "taxCode": "GST" }
//!   ],
//!   "discount": { "type": "percent", "value": 10 },
//!   "deposit":  { "type": "fixed", "value": 100, "amountPaidCents": 10000 },
//!   "paidCents": 0
//! }
//! ```
//!
//! Every value goes through the `Document` editing API, so a file that loads
//! has already passed the same validation the editor applies.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tally_core::{
    CatalogueItem, DepositRequest, Document, DocumentDiscount, DocumentKind, LegacyTaxCode,
    LineDiscount, LineItem, PricingMode, TaxTreatment,
};
use tracing::debug;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    pub kind: DocumentKind,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub pricing_mode: Option<PricingMode>,
    /// Items that lines may reference by id.
    #[serde(default)]
    pub catalogue: Vec<CatalogueItem>,
    #[serde(default)]
    pub lines: Vec<LineInput>,
    #[serde(default)]
    pub discount: Option<DocumentDiscount>,
    #[serde(default)]
    pub deposit: Option<DepositRequest>,
    #[serde(default)]
    pub paid_cents: i64,
}

/// One line as it appears in a file.
///
/// A line is either picked from the catalogue, billed as time (`hours`), or
/// entered by hand (`quantity` + `unitPriceCents`). Tax comes from `tax`,
/// then the legacy `taxCode`, then the configured default.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineInput {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub catalogue_item_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub hours: Option<Decimal>,
    #[serde(default)]
    pub unit_price_cents: Option<i64>,
    #[serde(default)]
    pub discount: LineDiscount,
    #[serde(default)]
    pub tax: Option<TaxTreatment>,
    #[serde(default)]
    pub tax_code: Option<LegacyTaxCode>,
}

impl LineInput {
    fn into_line_item(
        self,
        position: usize,
        catalogue: &[CatalogueItem],
        config: &AppConfig,
    ) -> AppResult<LineItem> {
        let input_error = |reason: &str| AppError::Input {
            line: position,
            reason: reason.to_string(),
        };

        let explicit_tax = self
            .tax
            .or_else(|| self.tax_code.map(TaxTreatment::from));

        let mut line = if let Some(id) = &self.catalogue_item_id {
            let item = catalogue
                .iter()
                .find(|item| &item.id == id)
                .ok_or_else(|| input_error(&format!("unknown catalogue item '{}'", id)))?;
            let mut line = LineItem::from_catalogue(item, self.quantity.unwrap_or(Decimal::ONE));
            if let Some(price) = self.unit_price_cents {
                line.unit_price_cents = price;
            }
            if let Some(tax) = explicit_tax {
                line.tax = tax;
            }
            line
        } else {
            let price = self
                .unit_price_cents
                .ok_or_else(|| input_error("unitPriceCents is required"))?;
            let tax = explicit_tax.unwrap_or_else(|| config.default_tax.clone());
            let description = self.description.clone().unwrap_or_default();

            match (self.hours, self.quantity) {
                (Some(hours), None) => LineItem::from_time_entry(description, hours, price, tax),
                (None, Some(quantity)) => LineItem::new(description, quantity, price, tax),
                (Some(_), Some(_)) => return Err(input_error("use either hours or quantity")),
                (None, None) => return Err(input_error("quantity is required")),
            }
        };

        if let Some(description) = self.description {
            line.description = description;
        }
        Ok(line.with_discount(self.discount))
    }
}

/// Builds a draft document from JSON text.
pub fn parse_document(json: &str, config: &AppConfig) -> AppResult<Document> {
    let file: DocumentFile = serde_json::from_str(json).map_err(|source| AppError::Parse {
        path: "<input>".into(),
        source,
    })?;
    build_document(file, config)
}

/// Reads and builds a draft document from a file on disk.
pub fn load_document(path: &Path, config: &AppConfig) -> AppResult<Document> {
    let json = fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: DocumentFile = serde_json::from_str(&json).map_err(|source| AppError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), lines = file.lines.len(), "document file loaded");
    build_document(file, config)
}

fn build_document(file: DocumentFile, config: &AppConfig) -> AppResult<Document> {
    let currency = file
        .currency_code
        .unwrap_or_else(|| config.currency_code.clone());
    let mut doc = Document::new(file.kind, currency);
    doc.set_pricing_mode(file.pricing_mode.unwrap_or(config.pricing_mode))?;

    for (index, input) in file.lines.into_iter().enumerate() {
        let line = input.into_line_item(index + 1, &file.catalogue, config)?;
        doc.add_line(line)?;
    }

    doc.set_discount(file.discount)?;

    if let Some(deposit) = file.deposit {
        let already_paid = deposit.amount_paid_cents;
        doc.set_deposit(Some(DepositRequest {
            amount_paid_cents: 0,
            ..deposit
        }))?;
        if already_paid != 0 {
            doc.record_deposit_payment(already_paid)?;
        }
    }

    if file.paid_cents != 0 {
        doc.record_payment(file.paid_cents)?;
    }

    Ok(doc)
}
