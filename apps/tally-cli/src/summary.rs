//! # Summary Panel
//!
//! Plain-text rendering of a [`DocumentSummary`], laid out like the totals
//! panel at the foot of a document:
//!
//! ```text
//! Subtotal                      $150.00
//! Line discounts                 -$5.00
//! Discount                      -$14.50
//! GST 10%                        $10.00
//! VAT 20% (reverse charge)        $0.00
//! Total                         $140.50
//! Deposit requested              $35.13
//! Paid                            $0.00
//! Balance due                   $140.50
//! ```
//!
//! Tax is itemized per group only when rates are mixed or a group is
//! reverse-charged; otherwise a single "Tax" row is shown.

use tally_core::{DocumentSummary, PricingMode, TaxGroup};

use crate::config::AppConfig;

const LABEL_WIDTH: usize = 26;
const AMOUNT_WIDTH: usize = 14;

fn row(out: &mut String, label: &str, amount: &str) {
    out.push_str(&format!(
        "{:<lw$}{:>aw$}\n",
        label,
        amount,
        lw = LABEL_WIDTH,
        aw = AMOUNT_WIDTH
    ));
}

fn tax_label(group: &TaxGroup, mode: PricingMode) -> String {
    let mut label = format!("{} {}%", group.name, group.rate_percent.normalize());
    if group.is_reverse_charge {
        label.push_str(" (reverse charge)");
    } else if mode == PricingMode::Inclusive {
        label.push_str(" incl.");
    }
    label
}

/// Renders the summary panel.
pub fn render_summary(summary: &DocumentSummary, config: &AppConfig) -> String {
    let totals = &summary.totals;
    let money = |cents: i64| config.format_currency(cents);
    let mut out = String::new();

    row(&mut out, "Subtotal", &money(totals.subtotal_cents));
    if totals.line_discount_cents != 0 {
        row(&mut out, "Line discounts", &money(totals.line_discount_cents.saturating_neg()));
    }
    if totals.document_discount_cents != 0 {
        row(&mut out, "Discount", &money(totals.document_discount_cents.saturating_neg()));
    }

    if summary.itemize_tax() {
        for group in &totals.tax_breakdown {
            row(&mut out, &tax_label(group, summary.pricing_mode), &money(group.tax_cents));
        }
    } else {
        let label = match summary.pricing_mode {
            PricingMode::Exclusive => "Tax",
            PricingMode::Inclusive => "Includes tax",
        };
        row(&mut out, label, &money(totals.tax_cents));
    }

    row(&mut out, "Total", &money(totals.total_cents));

    if let Some(deposit) = summary.deposit_amount_cents {
        row(&mut out, "Deposit requested", &money(deposit));
        row(&mut out, "Deposit paid", &money(summary.deposit_paid_cents));
    }
    row(&mut out, "Paid", &money(summary.paid_cents));
    row(&mut out, "Balance due", &money(summary.balance_cents));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tally_core::totals::{calculate_document, DocumentInput};
    use tally_core::{DepositRequest, LineItem, TaxTreatment};

    fn labels(panel: &str) -> Vec<&str> {
        panel
            .lines()
            .map(|line| line[..LABEL_WIDTH].trim_end())
            .collect()
    }

    #[test]
    fn test_single_rate_shows_one_tax_row() {
        let lines = vec![
            LineItem::new("A", Decimal::ONE, 10000, TaxTreatment::new("GST", dec!(10))),
            LineItem::new("B", Decimal::ONE, 5000, TaxTreatment::new("GST", dec!(10))),
        ];
        let summary = calculate_document(&DocumentInput::new(&lines));
        let panel = render_summary(&summary, &AppConfig::default());

        assert_eq!(
            labels(&panel),
            vec!["Subtotal", "Tax", "Total", "Paid", "Balance due"]
        );
        assert!(panel.contains("$165.00"));
    }

    #[test]
    fn test_mixed_rates_and_reverse_charge_are_itemized() {
        let lines = vec![
            LineItem::new("Local", Decimal::ONE, 10000, TaxTreatment::new("GST", dec!(10))),
            LineItem::new("Import", Decimal::ONE, 5000, TaxTreatment::reverse_charge("VAT", dec!(20))),
        ];
        let input = DocumentInput {
            deposit: Some(DepositRequest::percent(dec!(50))),
            ..DocumentInput::new(&lines)
        };
        let summary = calculate_document(&input);
        let panel = render_summary(&summary, &AppConfig::default());

        assert_eq!(
            labels(&panel),
            vec![
                "Subtotal",
                "GST 10%",
                "VAT 20% (reverse charge)",
                "Total",
                "Deposit requested",
                "Deposit paid",
                "Paid",
                "Balance due",
            ]
        );
    }

    #[test]
    fn test_rows_are_fixed_width_lines() {
        let lines = vec![LineItem::new("A", Decimal::ONE, 10000, TaxTreatment::new("GST", dec!(10)))];
        let panel = render_summary(&calculate_document(&DocumentInput::new(&lines)), &AppConfig::default());

        assert!(panel.ends_with('\n'));
        for line in panel.lines() {
            assert_eq!(line.len(), LABEL_WIDTH + AMOUNT_WIDTH);
        }
    }

    #[test]
    fn test_inclusive_single_rate_label() {
        let lines = vec![LineItem::new("Retail", Decimal::ONE, 11000, TaxTreatment::new("GST", dec!(10)))];
        let input = DocumentInput {
            pricing_mode: PricingMode::Inclusive,
            ..DocumentInput::new(&lines)
        };
        let panel = render_summary(&calculate_document(&input), &AppConfig::default());
        assert!(panel.lines().any(|l| l.starts_with("Includes tax") && l.ends_with("$10.00")));
    }
}
