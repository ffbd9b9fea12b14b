//! Money rounding and display formatting.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Round to `places` decimals, halves away from zero.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use lodge_quotes::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(1.235), 2), dec!(1.24));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// How amounts are written in customer messages.
///
/// Defaults follow the es-AR convention: `$` prefix, `.` between thousands,
/// `,` before decimals, at most three decimals and no trailing zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    pub symbol: String,
    pub thousands_separator: char,
    pub decimal_separator: char,
    pub max_fraction_digits: u32,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            thousands_separator: '.',
            decimal_separator: ',',
            max_fraction_digits: 3,
        }
    }
}

impl MoneyFormat {
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = round_money(amount, self.max_fraction_digits).normalize();
        let digits = rounded.abs().to_string();
        let (integer, fraction) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits.as_str(), None),
        };

        let mut out = self.symbol.clone();
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        }
        out.push_str(&group_thousands(integer, self.thousands_separator));
        if let Some(fraction) = fraction {
            out.push(self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }
}

fn group_thousands(integer: &str, separator: char) -> String {
    let len = integer.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Format with the default es-AR convention, e.g. `$1.234,5`.
pub fn format_currency(amount: Decimal) -> String {
    MoneyFormat::default().format(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(3));
        assert_eq!(round_money(dec!(-2.5), 0), dec!(-3));
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(999999.995), 2), dec!(1000000.00));
    }

    #[test]
    fn test_format_currency_groups_and_decimals() {
        assert_eq!(format_currency(dec!(1234.5)), "$1.234,5");
        assert_eq!(format_currency(dec!(1000)), "$1.000");
        assert_eq!(format_currency(dec!(1234567.891)), "$1.234.567,891");
        assert_eq!(format_currency(dec!(1234.5678)), "$1.234,568");
        assert_eq!(format_currency(dec!(999)), "$999");
    }

    #[test]
    fn test_format_currency_drops_trailing_zeros() {
        assert_eq!(format_currency(dec!(2700.000)), "$2.700");
        assert_eq!(format_currency(dec!(10.50)), "$10,5");
    }

    #[test]
    fn test_format_currency_zero_and_negative() {
        assert_eq!(format_currency(dec!(0)), "$0");
        assert_eq!(format_currency(dec!(0.001)), "$0,001");
        assert_eq!(format_currency(dec!(0.0004)), "$0");
        assert_eq!(format_currency(dec!(-0.0004)), "$0");
        assert_eq!(format_currency(dec!(-1500)), "$-1.500");
    }

    #[test]
    fn test_custom_format() {
        let fmt = MoneyFormat {
            symbol: "US$ ".to_string(),
            thousands_separator: ',',
            decimal_separator: '.',
            max_fraction_digits: 2,
        };
        assert_eq!(fmt.format(dec!(12345.678)), "US$ 12,345.68");
    }
}
