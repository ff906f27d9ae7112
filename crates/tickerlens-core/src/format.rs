//! Display formatting for scalar metrics.

use crate::CurrencyContext;

/// Placeholder for metrics without enough history.
pub const NOT_AVAILABLE: &str = "N/A";

/// Render an amount with the market's currency symbol.
///
/// Rupee amounts use thousands separators, dollar amounts do not; both use
/// two decimals.
pub fn format_currency(value: f64, currency: CurrencyContext) -> String {
    let amount = match currency {
        CurrencyContext::Rupee => group_decimal(&format!("{value:.2}")),
        CurrencyContext::Dollar => format!("{value:.2}"),
    };
    format!("{}{amount}", currency.symbol())
}

/// Signed percentage with two decimals, e.g. `+10.00%`.
pub fn format_percent_change(percent: f64) -> String {
    format!("{percent:+.2}%")
}

/// Integer with thousands separators, e.g. `1,234,567`.
pub fn format_volume(volume: u64) -> String {
    group_decimal(&volume.to_string())
}

// Inserts ',' every three digits of the integer part of an already
// formatted decimal string.
fn group_decimal(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    if !integer.chars().all(|ch| ch.is_ascii_digit()) {
        // inf / NaN
        return formatted.to_owned();
    }

    let mut grouped = String::with_capacity(formatted.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (index, ch) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rupee_amounts_are_grouped() {
        assert_eq!(format_currency(1234.5, CurrencyContext::Rupee), "₹1,234.50");
        assert_eq!(
            format_currency(1_234_567.891, CurrencyContext::Rupee),
            "₹1,234,567.89"
        );
        assert_eq!(format_currency(999.0, CurrencyContext::Rupee), "₹999.00");
    }

    #[test]
    fn dollar_amounts_are_plain() {
        assert_eq!(format_currency(1234.5, CurrencyContext::Dollar), "$1234.50");
    }

    #[test]
    fn negative_rupee_amount_keeps_sign() {
        assert_eq!(format_currency(-1234.5, CurrencyContext::Rupee), "₹-1,234.50");
    }

    #[test]
    fn percent_change_is_signed() {
        assert_eq!(format_percent_change(10.0), "+10.00%");
        assert_eq!(format_percent_change(-2.5), "-2.50%");
    }

    #[test]
    fn volume_is_grouped() {
        assert_eq!(format_volume(0), "0");
        assert_eq!(format_volume(1_234_567), "1,234,567");
        assert_eq!(format_volume(123), "123");
    }
}
