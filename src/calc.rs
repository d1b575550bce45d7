use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{LineItem, QuotationRecord};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Document-level totals. Derived on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotationSummary {
    pub subtotal: Decimal,
    pub shipping_charges: Decimal,
    pub packaging_charges: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub grand_total: Decimal,
}

/// Computes the financial summary of a quotation.
///
/// Inputs are taken as given: validation happens upstream, and negative
/// amounts simply flow through the arithmetic. No rounding is applied here;
/// see [`crate::money`] for presentation. Amounts beyond the `Decimal` range
/// saturate instead of panicking; [`checked_summarize`] reports them.
pub fn summarize(
    items: &[LineItem],
    shipping_charges: Decimal,
    packaging_charges: Decimal,
    tax_rate: Decimal,
) -> QuotationSummary {
    let subtotal = items
        .iter()
        .map(LineItem::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add);
    let tax_amount = subtotal.saturating_mul(tax_rate) / HUNDRED;
    let grand_total = subtotal
        .saturating_add(shipping_charges)
        .saturating_add(packaging_charges)
        .saturating_add(tax_amount);

    tracing::debug!(
        items = items.len(),
        %subtotal,
        %tax_amount,
        %grand_total,
        "computed quotation totals"
    );

    QuotationSummary {
        subtotal,
        shipping_charges,
        packaging_charges,
        tax_rate,
        tax_amount,
        grand_total,
    }
}

/// Same totals as [`summarize`], or `None` if any step leaves the `Decimal` range.
pub fn checked_summarize(
    items: &[LineItem],
    shipping_charges: Decimal,
    packaging_charges: Decimal,
    tax_rate: Decimal,
) -> Option<QuotationSummary> {
    let mut subtotal = Decimal::ZERO;
    for item in items {
        subtotal = subtotal.checked_add(item.checked_line_total()?)?;
    }
    let tax_amount = subtotal.checked_mul(tax_rate)?.checked_div(HUNDRED)?;
    let grand_total = subtotal
        .checked_add(shipping_charges)?
        .checked_add(packaging_charges)?
        .checked_add(tax_amount)?;

    Some(QuotationSummary {
        subtotal,
        shipping_charges,
        packaging_charges,
        tax_rate,
        tax_amount,
        grand_total,
    })
}

impl QuotationRecord {
    pub fn summary(&self) -> QuotationSummary {
        summarize(
            &self.items,
            self.shipping_charges,
            self.packaging_charges,
            self.tax_rate,
        )
    }

    pub fn checked_summary(&self) -> Option<QuotationSummary> {
        checked_summarize(
            &self.items,
            self.shipping_charges,
            self.packaging_charges,
            self.tax_rate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn worked_example() {
        let items = vec![
            LineItem::new("1", "Panel", 2, dec!(100)),
            LineItem::new("2", "Frame", 1, dec!(50)),
        ];
        let s = summarize(&items, dec!(10), dec!(5), dec!(10));

        assert_eq!(s.subtotal, dec!(250));
        assert_eq!(s.tax_amount, dec!(25));
        assert_eq!(s.grand_total, dec!(290));
    }

    #[test]
    fn empty_items_are_all_zero() {
        let s = summarize(&[], Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(s.subtotal, Decimal::ZERO);
        assert_eq!(s.tax_amount, Decimal::ZERO);
        assert_eq!(s.grand_total, Decimal::ZERO);
    }

    #[test]
    fn empty_items_still_add_charges() {
        let s = summarize(&[], dec!(12.5), dec!(3), dec!(17));
        assert_eq!(s.subtotal, Decimal::ZERO);
        assert_eq!(s.tax_amount, Decimal::ZERO);
        assert_eq!(s.grand_total, dec!(15.5));
    }

    #[test]
    fn subtotal_is_exact_sum_of_line_totals() {
        // 0.1 + 0.2 style inputs that drift under binary floating point
        let items: Vec<LineItem> = (1..=30)
            .map(|n| LineItem::new(n.to_string(), "Bolt", n, dec!(0.10)))
            .chain(std::iter::once(LineItem::new("31", "Nut", 7, dec!(0.20))))
            .collect();

        let expected: Decimal = items
            .iter()
            .map(|i| Decimal::from(i.quantity) * i.unit_price)
            .sum();
        let s = summarize(&items, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);

        assert_eq!(s.subtotal, expected);
        assert_eq!(s.subtotal, dec!(47.90));
    }

    #[test]
    fn no_intermediate_rounding() {
        let items = vec![LineItem::new("1", "Fee", 1, dec!(0.333))];
        let s = summarize(&items, Decimal::ZERO, Decimal::ZERO, dec!(10));
        assert_eq!(s.tax_amount, dec!(0.0333));
        assert_eq!(s.grand_total, dec!(0.3663));
    }

    #[test]
    fn negative_inputs_flow_through() {
        let items = vec![LineItem::new("1", "Discount", 1, dec!(-20))];
        let s = summarize(&items, dec!(5), Decimal::ZERO, Decimal::ZERO);
        assert_eq!(s.grand_total, dec!(-15));
    }

    #[test]
    fn out_of_range_amounts_saturate() {
        let items = vec![LineItem::new("1", "Gold", 10, Decimal::MAX / Decimal::TWO)];
        let s = summarize(&items, dec!(1), dec!(1), dec!(10));

        assert_eq!(s.subtotal, Decimal::MAX);
        assert_eq!(s.grand_total, Decimal::MAX);
        assert!(checked_summarize(&items, dec!(1), dec!(1), dec!(10)).is_none());
    }

    #[test]
    fn charges_alone_can_overflow() {
        let items = vec![LineItem::new("1", "Panel", 1, dec!(1))];
        let s = summarize(&items, Decimal::MAX, Decimal::MAX, Decimal::ZERO);

        assert_eq!(s.grand_total, Decimal::MAX);
        assert!(checked_summarize(&items, Decimal::MAX, Decimal::MAX, Decimal::ZERO).is_none());
    }

    #[test]
    fn checked_matches_summarize_in_range() {
        let items = vec![
            LineItem::new("1", "Panel", 2, dec!(100)),
            LineItem::new("2", "Frame", 1, dec!(50)),
        ];
        assert_eq!(
            checked_summarize(&items, dec!(10), dec!(5), dec!(10)),
            Some(summarize(&items, dec!(10), dec!(5), dec!(10)))
        );
    }

    #[test]
    fn summary_json_keeps_decimals_as_strings() {
        let items = vec![
            LineItem::new("1", "Panel", 2, dec!(100)),
            LineItem::new("2", "Frame", 1, dec!(50)),
        ];
        let json = serde_json::to_value(summarize(&items, dec!(10), dec!(5), dec!(10))).unwrap();
        let object = json.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "grand_total",
                "packaging_charges",
                "shipping_charges",
                "subtotal",
                "tax_amount",
                "tax_rate",
            ]
        );
        assert!(object.values().all(|v| v.is_string()));

        let amount = |key: &str| json[key].as_str().unwrap().parse::<Decimal>().unwrap();
        assert_eq!(amount("subtotal"), dec!(250));
        assert_eq!(amount("tax_amount"), dec!(25));
        assert_eq!(amount("grand_total"), dec!(290));
    }

    #[test]
    fn summarize_is_idempotent() {
        let record = QuotationRecord {
            items: vec![
                LineItem::new("1", "A", 3, dec!(19.99)),
                LineItem::new("2", "B", 11, dec!(4.05)),
            ],
            shipping_charges: dec!(7.25),
            packaging_charges: dec!(1.10),
            tax_rate: dec!(17),
            ..Default::default()
        };

        assert_eq!(record.summary(), record.summary());
    }
}
