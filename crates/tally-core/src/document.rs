//! # Document Lifecycle
//!
//! A quote, invoice or credit memo together with its draft/issued rules.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐    issue(numbers, now)    ┌──────────┐                    │
//! │  │  Draft   │ ─────────────────────────►│  Issued  │                    │
//! │  └──────────┘                           └──────────┘                    │
//! │   add_line                               lines frozen                   │
//! │   update_line                            number assigned                │
//! │   remove_line                            totals snapshot stored         │
//! │   set_discount / set_deposit                                            │
//! │                                                                         │
//! │   record_payment / record_deposit_payment: allowed in both states       │
//! │                                                                         │
//! │   summary(): Draft  → computed fresh from the lines                     │
//! │              Issued → frozen snapshot, balance from current payments    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Once issued, a document's totals are never recomputed from its lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::totals::{calculate_document, DocumentInput, DocumentSummary};
use crate::types::{
    DepositRequest, DocumentDiscount, DocumentKind, DocumentStatus, LineItem, PricingMode,
};
use crate::validation::{
    validate_currency_code, validate_deposit_amount, validate_deposit_request,
    validate_document_discount, validate_line_count, validate_line_item, validate_paid_cents,
};

// =============================================================================
// Numbering
// =============================================================================

/// Hands out document numbers.
///
/// Injected into [`Document::issue`] so numbering stays out of the core
/// and can be backed by whatever counter the application owns.
pub trait DocumentNumberAllocator {
    /// Returns the next number for `kind` ("INV-0001").
    fn next_number(&self, kind: DocumentKind) -> String;
}

// =============================================================================
// Document
// =============================================================================

/// A quote, invoice or credit memo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub kind: DocumentKind,
    /// Assigned on issue.
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub status: DocumentStatus,
    /// Display only; the engine works in minor units.
    pub currency_code: String,
    #[serde(default)]
    pub pricing_mode: PricingMode,
    #[serde(default)]
    pub lines: Vec<LineItem>,
    #[serde(default)]
    pub discount: Option<DocumentDiscount>,
    #[serde(default)]
    pub deposit: Option<DepositRequest>,
    /// General payments received.
    #[serde(default)]
    pub paid_cents: i64,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub issued_at: Option<DateTime<Utc>>,
    /// Totals frozen at issue time.
    #[serde(default)]
    pub snapshot: Option<DocumentSummary>,
}

impl Document {
    /// Creates an empty draft.
    pub fn new(kind: DocumentKind, currency_code: impl Into<String>) -> Self {
        Document {
            id: Uuid::new_v4().to_string(),
            kind,
            number: None,
            status: DocumentStatus::Draft,
            currency_code: currency_code.into(),
            pricing_mode: PricingMode::Exclusive,
            lines: Vec::new(),
            discount: None,
            deposit: None,
            paid_cents: 0,
            issued_at: None,
            snapshot: None,
        }
    }

    #[inline]
    pub fn is_issued(&self) -> bool {
        self.status == DocumentStatus::Issued
    }

    fn ensure_draft(&self) -> CoreResult<()> {
        if self.is_issued() {
            return Err(CoreError::DocumentFrozen {
                document_id: self.id.clone(),
            });
        }
        Ok(())
    }

    fn input(&self) -> DocumentInput<'_> {
        DocumentInput {
            lines: &self.lines,
            pricing_mode: self.pricing_mode,
            discount: self.discount,
            deposit: self.deposit,
            paid_cents: self.paid_cents,
        }
    }

    // -------------------------------------------------------------------------
    // Draft editing
    // -------------------------------------------------------------------------

    /// Appends a validated line. Returns its index.
    pub fn add_line(&mut self, line: LineItem) -> CoreResult<usize> {
        self.ensure_draft()?;
        validate_line_count(self.lines.len() + 1)?;
        validate_line_item(&line)?;
        self.lines.push(line);
        Ok(self.lines.len() - 1)
    }

    /// Replaces the line at `index`.
    pub fn update_line(&mut self, index: usize, line: LineItem) -> CoreResult<()> {
        self.ensure_draft()?;
        validate_line_item(&line)?;
        let len = self.lines.len();
        let slot = self
            .lines
            .get_mut(index)
            .ok_or(CoreError::LineNotFound { index, len })?;
        *slot = line;
        Ok(())
    }

    /// Removes and returns the line at `index`.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<LineItem> {
        self.ensure_draft()?;
        if index >= self.lines.len() {
            return Err(CoreError::LineNotFound {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    pub fn set_pricing_mode(&mut self, mode: PricingMode) -> CoreResult<()> {
        self.ensure_draft()?;
        self.pricing_mode = mode;
        Ok(())
    }

    /// Sets or clears the document discount.
    pub fn set_discount(&mut self, discount: Option<DocumentDiscount>) -> CoreResult<()> {
        self.ensure_draft()?;
        if let Some(d) = &discount {
            let net_subtotal = self.summary().totals.net_subtotal_cents();
            validate_document_discount(d, net_subtotal)?;
        }
        self.discount = discount;
        Ok(())
    }

    /// Sets or clears the deposit request.
    ///
    /// The deposit is checked against the total the document would have with
    /// it applied; a deposit above that total is rejected.
    pub fn set_deposit(&mut self, deposit: Option<DepositRequest>) -> CoreResult<()> {
        self.ensure_draft()?;
        if let Some(d) = &deposit {
            validate_deposit_request(d)?;
            let summary = calculate_document(&DocumentInput {
                deposit: Some(*d),
                ..self.input()
            });
            validate_deposit_amount(
                summary.deposit_amount_cents.unwrap_or(0),
                summary.totals.total_cents,
            )?;
        }
        self.deposit = deposit;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Payments
    // -------------------------------------------------------------------------

    /// Records a general payment. Overpayment is allowed and shows up as a
    /// negative balance.
    pub fn record_payment(&mut self, cents: i64) -> CoreResult<()> {
        validate_paid_cents("payment", cents)?;
        self.paid_cents = self.paid_cents.saturating_add(cents);
        Ok(())
    }

    /// Records a payment against the deposit request.
    pub fn record_deposit_payment(&mut self, cents: i64) -> CoreResult<()> {
        validate_paid_cents("deposit payment", cents)?;
        match self.deposit.as_mut() {
            Some(deposit) => {
                deposit.amount_paid_cents = deposit.amount_paid_cents.saturating_add(cents);
                Ok(())
            }
            None => Err(CoreError::InvalidDepositAmount {
                deposit_cents: 0,
                total_cents: self.summary().totals.total_cents,
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Totals & issuing
    // -------------------------------------------------------------------------

    /// Current totals.
    ///
    /// Drafts are computed fresh. Issued documents return the frozen
    /// snapshot with the balance brought up to date with payments.
    pub fn summary(&self) -> DocumentSummary {
        let deposit_paid = self.deposit.map(|d| d.amount_paid_cents).unwrap_or(0);
        match &self.snapshot {
            Some(frozen) if self.is_issued() => frozen.with_payments(self.paid_cents, deposit_paid),
            _ => calculate_document(&self.input()),
        }
    }

    /// Validates every line, assigns a number and freezes the totals.
    pub fn issue(
        &mut self,
        numbers: &dyn DocumentNumberAllocator,
        now: DateTime<Utc>,
    ) -> CoreResult<&DocumentSummary> {
        self.ensure_draft()?;
        validate_currency_code(&self.currency_code)?;
        validate_line_count(self.lines.len())?;
        for line in &self.lines {
            validate_line_item(line)?;
        }

        let summary = calculate_document(&self.input());
        if let Some(d) = &self.discount {
            validate_document_discount(d, summary.totals.net_subtotal_cents())?;
        }
        if let Some(amount) = summary.deposit_amount_cents {
            validate_deposit_amount(amount, summary.totals.total_cents)?;
        }

        let number = numbers.next_number(self.kind);
        info!(
            document_id = %self.id,
            number = %number,
            total_cents = summary.totals.total_cents,
            "document issued"
        );

        self.number = Some(number);
        self.status = DocumentStatus::Issued;
        self.issued_at = Some(now);
        let frozen = self.snapshot.insert(summary);
        Ok(&*frozen)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::tax::TaxTreatment;
    use crate::types::LineDiscount;
    use rust_decimal_macros::dec;
    use std::cell::Cell;

    struct FixedNumbers(Cell<u32>);

    impl DocumentNumberAllocator for FixedNumbers {
        fn next_number(&self, kind: DocumentKind) -> String {
            let next = self.0.get() + 1;
            self.0.set(next);
            match kind {
                DocumentKind::Invoice => format!("INV-{:04}", next),
                DocumentKind::Quote => format!("QUO-{:04}", next),
                DocumentKind::CreditMemo => format!("CM-{:04}", next),
            }
        }
    }

    fn gst_line(price: i64) -> LineItem {
        LineItem::new("Service", dec!(1), price, TaxTreatment::new("GST", dec!(10)))
    }

    fn draft() -> Document {
        let mut doc = Document::new(DocumentKind::Invoice, "AUD");
        doc.add_line(gst_line(10000)).unwrap();
        doc
    }

    #[test]
    fn test_add_line_rejects_invalid() {
        let mut doc = Document::new(DocumentKind::Quote, "AUD");
        let bad = gst_line(1000).with_discount(LineDiscount::Percent { value: dec!(150) });
        assert!(matches!(
            doc.add_line(bad),
            Err(CoreError::InvalidDiscountRange { .. })
        ));
        assert!(doc.lines.is_empty());
    }

    #[test]
    fn test_update_and_remove_line() {
        let mut doc = draft();
        doc.update_line(0, gst_line(5000)).unwrap();
        assert_eq!(doc.summary().totals.total_cents, 5500);

        assert!(matches!(
            doc.update_line(3, gst_line(1)),
            Err(CoreError::LineNotFound { index: 3, len: 1 })
        ));

        let removed = doc.remove_line(0).unwrap();
        assert_eq!(removed.unit_price_cents, 5000);
        assert_eq!(doc.summary().totals.total_cents, 0);
    }

    #[test]
    fn test_set_deposit_rejects_more_than_total() {
        let mut doc = draft();
        let err = doc.set_deposit(Some(DepositRequest::fixed(dec!(200)))).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDepositAmount { .. }));
        assert_eq!(err.user_message(), "Deposit cannot exceed the document total");
        assert!(doc.deposit.is_none());

        doc.set_deposit(Some(DepositRequest::percent(dec!(25)))).unwrap();
        assert_eq!(doc.summary().deposit_amount_cents, Some(2750));
    }

    #[test]
    fn test_set_discount_validates_against_subtotal() {
        let mut doc = draft();
        assert!(doc.set_discount(Some(DocumentDiscount::fixed(dec!(101)))).is_err());
        doc.set_discount(Some(DocumentDiscount::fixed(dec!(10)))).unwrap();
        assert_eq!(doc.summary().totals.document_discount_cents, 1000);
    }

    #[test]
    fn test_issue_freezes_lines_and_totals() {
        let mut doc = draft();
        let numbers = FixedNumbers(Cell::new(0));

        let total = doc.issue(&numbers, Utc::now()).unwrap().totals.total_cents;
        assert_eq!(total, 11000);
        assert_eq!(doc.number.as_deref(), Some("INV-0001"));
        assert!(doc.is_issued());
        assert!(doc.issued_at.is_some());

        assert!(matches!(
            doc.add_line(gst_line(1)),
            Err(CoreError::DocumentFrozen { .. })
        ));
        assert!(doc.remove_line(0).is_err());
        assert!(doc.set_discount(None).is_err());
        assert!(doc.issue(&numbers, Utc::now()).is_err());
    }

    #[test]
    fn test_issued_summary_never_recomputes_lines() {
        let mut doc = draft();
        doc.issue(&FixedNumbers(Cell::new(0)), Utc::now()).unwrap();

        // Someone edits the line behind the API's back
        doc.lines[0].unit_price_cents = 99999;

        assert_eq!(doc.summary().totals.total_cents, 11000);
    }

    #[test]
    fn test_payments_after_issue_update_balance() {
        let mut doc = draft();
        doc.set_deposit(Some(DepositRequest::percent(dec!(50)))).unwrap();
        doc.issue(&FixedNumbers(Cell::new(0)), Utc::now()).unwrap();

        doc.record_deposit_payment(5500).unwrap();
        doc.record_payment(1000).unwrap();

        let summary = doc.summary();
        assert_eq!(summary.deposit_amount_cents, Some(5500));
        assert_eq!(summary.balance_cents, 11000 - 5500 - 1000);
        assert!(doc.record_payment(-1).is_err());
    }

    #[test]
    fn test_oversized_lines_are_rejected_not_panicking() {
        let mut doc = Document::new(DocumentKind::Invoice, "AUD");
        assert!(matches!(
            doc.add_line(gst_line(i64::MAX)),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(doc.add_line(gst_line(i64::MAX / 2 + 1)).is_err());

        let huge = LineItem::new("Bulk", dec!(1000000), 100, TaxTreatment::new("GST", dec!(10)));
        assert!(doc.add_line(huge).is_err());
        assert!(doc.lines.is_empty());
        assert_eq!(doc.summary().totals.total_cents, 0);
    }

    #[test]
    fn test_payments_saturate() {
        let mut doc = draft();
        doc.set_deposit(Some(DepositRequest::percent(dec!(50)))).unwrap();
        doc.record_payment(i64::MAX).unwrap();
        doc.record_payment(i64::MAX).unwrap();
        doc.record_deposit_payment(i64::MAX).unwrap();
        doc.record_deposit_payment(1).unwrap();

        assert_eq!(doc.paid_cents, i64::MAX);
        assert_eq!(doc.deposit.map(|d| d.amount_paid_cents), Some(i64::MAX));
        assert_eq!(doc.summary().balance_cents, i64::MIN);
    }

    #[test]
    fn test_deposit_payment_without_deposit_fails() {
        let mut doc = draft();
        assert!(matches!(
            doc.record_deposit_payment(100),
            Err(CoreError::InvalidDepositAmount { .. })
        ));
    }

    #[test]
    fn test_issue_rejects_bad_currency() {
        let mut doc = Document::new(DocumentKind::CreditMemo, "dollars");
        assert!(doc.issue(&FixedNumbers(Cell::new(0)), Utc::now()).is_err());
        assert!(doc.number.is_none());
    }
}
