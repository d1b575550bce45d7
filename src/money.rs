//! Presentation of monetary amounts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two fractional digits, half-up.
pub fn round(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `250` -> `"250.00"`, `0.125` -> `"0.13"`.
pub fn format(amount: Decimal) -> String {
    let mut rounded = round(amount);
    rounded.rescale(2);
    rounded.to_string()
}

pub fn format_with_currency(amount: Decimal, currency: &str) -> String {
    format!("{} {}", format(amount), currency)
}

/// Tax rates print without trailing zeros: `10.00` -> `"10"`, `8.875` stays.
pub fn format_rate(rate: Decimal) -> String {
    rate.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn pads_to_two_digits() {
        assert_eq!(format(dec!(250)), "250.00");
        assert_eq!(format(dec!(12.5)), "12.50");
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(format(dec!(0.125)), "0.13");
        assert_eq!(format(dec!(2.675)), "2.68");
        assert_eq!(format(dec!(0.124)), "0.12");
        assert_eq!(format(dec!(-0.125)), "-0.13");
    }

    #[test]
    fn currency_suffix() {
        assert_eq!(format_with_currency(dec!(290), "PKR"), "290.00 PKR");
    }

    #[test]
    fn rate_drops_trailing_zeros() {
        assert_eq!(format_rate(dec!(10.00)), "10");
        assert_eq!(format_rate(dec!(8.875)), "8.875");
    }
}
