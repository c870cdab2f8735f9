//! Property-based tests for the totals engine.
//!
//! Run with: `cargo test -p tally-core --test totals_properties`

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_core::totals::{calculate_document, DocumentInput};
use tally_core::validation::validate_deposit_amount;
use tally_core::{
    calculate_line, DepositRequest, DocumentDiscount, LineDiscount, LineItem, PricingMode,
    TaxTreatment,
};

// ── Proptest Strategies ─────────────────────────────────────────────────────

/// Quantity 0.01 to 100.00, two decimal places.
fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000i64).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

/// Unit price 0 to $10,000.00.
fn arb_price() -> impl Strategy<Value = i64> {
    0i64..=1_000_000i64
}

/// Percent 0.00 to 100.00.
fn arb_percent() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

/// Includes fixed discounts larger than any base to exercise clamping.
fn arb_discount() -> impl Strategy<Value = LineDiscount> {
    prop_oneof![
        Just(LineDiscount::None),
        arb_percent().prop_map(|value| LineDiscount::Percent { value }),
        (0i64..=2_000_000i64).prop_map(|value_cents| LineDiscount::Amount { value_cents }),
    ]
}

fn arb_tax() -> impl Strategy<Value = TaxTreatment> {
    prop_oneof![
        Just(TaxTreatment::new("GST", dec!(10))),
        Just(TaxTreatment::new("Sales Tax", dec!(8.25))),
        Just(TaxTreatment::new("VAT", dec!(20))),
        Just(TaxTreatment::reverse_charge("VAT", dec!(20))),
        Just(TaxTreatment::exempt()),
    ]
}

fn arb_line() -> impl Strategy<Value = LineItem> {
    (arb_quantity(), arb_price(), arb_discount(), arb_tax()).prop_map(
        |(qty, price, discount, tax)| {
            LineItem::new("Item", qty, price, tax).with_discount(discount)
        },
    )
}

fn arb_lines() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(arb_line(), 0..=12)
}

fn arb_mode() -> impl Strategy<Value = PricingMode> {
    prop_oneof![Just(PricingMode::Exclusive), Just(PricingMode::Inclusive)]
}

fn arb_document_discount() -> impl Strategy<Value = Option<DocumentDiscount>> {
    prop_oneof![
        Just(None),
        arb_percent().prop_map(|v| Some(DocumentDiscount::percent(v))),
        (0i64..=50_000i64).prop_map(|cents| Some(DocumentDiscount::fixed(Decimal::new(cents, 2)))),
    ]
}

// ── Properties ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn line_rounding_closure(line in arb_line(), mode in arb_mode()) {
        let calc = calculate_line(&line, mode);

        prop_assert_eq!(calc.total_cents, calc.net_cents + calc.tax_cents);
        let discounted = (calc.base_cents - calc.discount_cents).max(0);
        match mode {
            PricingMode::Exclusive => prop_assert_eq!(calc.net_cents, discounted),
            PricingMode::Inclusive => prop_assert_eq!(calc.total_cents, discounted),
        }
    }

    #[test]
    fn reverse_charge_lines_carry_no_tax(
        qty in arb_quantity(),
        price in arb_price(),
        discount in arb_discount(),
        mode in arb_mode(),
    ) {
        let line = LineItem::new("Import", qty, price, TaxTreatment::reverse_charge("VAT", dec!(20)))
            .with_discount(discount);
        prop_assert_eq!(calculate_line(&line, mode).tax_cents, 0);
    }

    #[test]
    fn aggregate_matches_sum_of_lines(lines in arb_lines(), discount in arb_document_discount()) {
        let input = DocumentInput { discount, ..DocumentInput::new(&lines) };
        let summary = calculate_document(&input);
        let totals = &summary.totals;

        let line_sum: i64 = summary.lines.iter().map(|l| l.total_cents).sum();
        prop_assert_eq!(
            line_sum,
            totals.subtotal_cents - totals.line_discount_cents + totals.tax_cents
        );
        prop_assert_eq!(
            totals.total_cents,
            line_sum - totals.document_discount_cents
        );
    }

    #[test]
    fn tax_groups_are_complete(lines in arb_lines(), mode in arb_mode()) {
        let input = DocumentInput { pricing_mode: mode, ..DocumentInput::new(&lines) };
        let totals = calculate_document(&input).totals;

        let group_tax: i64 = totals.tax_breakdown.iter().map(|g| g.tax_cents).sum();
        let group_taxable: i64 = totals.tax_breakdown.iter().map(|g| g.taxable_cents).sum();
        prop_assert_eq!(group_tax, totals.tax_cents);

        let net_subtotal = totals.subtotal_cents - totals.line_discount_cents;
        match mode {
            PricingMode::Exclusive => prop_assert_eq!(group_taxable, net_subtotal),
            PricingMode::Inclusive => prop_assert_eq!(group_taxable + group_tax, net_subtotal),
        }

        for group in totals.tax_breakdown.iter().filter(|g| g.is_reverse_charge) {
            prop_assert_eq!(group.tax_cents, 0);
        }
    }

    #[test]
    fn calculation_is_idempotent(
        lines in arb_lines(),
        mode in arb_mode(),
        discount in arb_document_discount(),
        deposit_pct in arb_percent(),
        paid in 0i64..=1_000_000i64,
    ) {
        let input = DocumentInput {
            lines: &lines,
            pricing_mode: mode,
            discount,
            deposit: Some(DepositRequest::percent(deposit_pct)),
            paid_cents: paid,
        };
        let first = serde_json::to_string(&calculate_document(&input)).unwrap();
        let second = serde_json::to_string(&calculate_document(&input)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn percent_deposit_stays_within_total(
        price in 100i64..=1_000_000i64,
        whole_percent in 1i64..=100i64,
    ) {
        let lines = vec![LineItem::new("Job", Decimal::ONE, price, TaxTreatment::exempt())];
        let input = DocumentInput {
            deposit: Some(DepositRequest::percent(Decimal::from(whole_percent))),
            ..DocumentInput::new(&lines)
        };
        let summary = calculate_document(&input);
        let deposit = summary.deposit_amount_cents.unwrap();

        prop_assert!(deposit > 0);
        prop_assert!(deposit <= summary.totals.total_cents);
        prop_assert!(validate_deposit_amount(deposit, summary.totals.total_cents).is_ok());
    }

    #[test]
    fn balance_subtracts_both_payment_streams(
        lines in arb_lines(),
        paid in 0i64..=5_000_000i64,
        deposit_paid in 0i64..=5_000_000i64,
    ) {
        let deposit = DepositRequest { amount_paid_cents: deposit_paid, ..DepositRequest::percent(dec!(50)) };
        let input = DocumentInput {
            deposit: Some(deposit),
            paid_cents: paid,
            ..DocumentInput::new(&lines)
        };
        let summary = calculate_document(&input);
        prop_assert_eq!(
            summary.balance_cents,
            summary.totals.total_cents - paid - deposit_paid
        );
    }
}

// ── Worked Scenarios ────────────────────────────────────────────────────────

#[test]
fn scenario_reverse_charge_itemized_alongside_gst() {
    let lines = vec![
        LineItem::new("Local work", Decimal::ONE, 10_000, TaxTreatment::new("GST", dec!(10))),
        LineItem::new(
            "Offshore licence",
            Decimal::ONE,
            5_000,
            TaxTreatment::reverse_charge("VAT", dec!(20)),
        ),
    ];
    let summary = calculate_document(&DocumentInput::new(&lines));

    assert_eq!(summary.totals.tax_breakdown.len(), 2);
    assert_eq!(summary.totals.tax_breakdown[1].tax_cents, 0);
    assert_eq!(summary.totals.tax_cents, 1_000);
    assert!(summary.itemize_tax());
}

#[test]
fn scenario_fixed_discount_over_base_clamps_to_zero() {
    let line = LineItem::new("Sample", Decimal::ONE, 1_000, TaxTreatment::new("GST", dec!(10)))
        .with_discount(LineDiscount::Amount { value_cents: 1_500 });
    let calc = calculate_line(&line, PricingMode::Exclusive);

    assert_eq!(calc.net_cents, 0);
    assert_eq!(calc.total_cents, 0);
}
