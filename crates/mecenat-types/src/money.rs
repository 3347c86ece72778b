//! Euro rounding, derivation and display helpers.
//!
//! Both dashboards derive every euro figure the same way: a percentage of a
//! base amount, rounded to the nearest whole euro. Display follows the fr-FR
//! convention (narrow no-break space as thousands separator, trailing " €").

/// Round a raw amount to the nearest whole euro.
pub fn round_euro(value: f64) -> i64 {
    value.round() as i64
}

/// Derive a euro amount from a percentage of a base amount.
///
/// This is the single derivation rule of the whole engine:
/// `round(percent / 100 × base)`.
pub fn derive_amount(percent: f64, base: f64) -> i64 {
    round_euro(percent / 100.0 * base)
}

/// Format an amount as a French currency string, e.g. `12 000 €`.
pub fn fmt_euro(value: f64) -> String {
    let rounded = round_euro(value);
    let digits = rounded.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            // narrow no-break space, as produced by fr-FR locale formatting
            grouped.push('\u{202f}');
        }
        grouped.push(ch);
    }
    if rounded < 0 { format!("-{grouped} €") } else { format!("{grouped} €") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_euro_rounds_to_nearest() {
        assert_eq!(round_euro(24.4), 24);
        assert_eq!(round_euro(24.5), 25);
        assert_eq!(round_euro(0.0), 0);
    }

    #[test]
    fn derive_amount_is_rounded_share() {
        assert_eq!(derive_amount(20.0, 120.0), 24);
        assert_eq!(derive_amount(5.0, 120.0), 6);
        // 33% of 100 = 33, 33% of 50 = 16.5 -> 17
        assert_eq!(derive_amount(33.0, 50.0), 17);
        assert_eq!(derive_amount(0.0, 1000.0), 0);
    }

    #[test]
    fn fmt_euro_groups_thousands() {
        assert_eq!(fmt_euro(950.0), "950 €");
        assert_eq!(fmt_euro(12000.0), "12\u{202f}000 €");
        assert_eq!(fmt_euro(128000.0), "128\u{202f}000 €");
        assert_eq!(fmt_euro(1234567.0), "1\u{202f}234\u{202f}567 €");
    }

    #[test]
    fn fmt_euro_handles_negative_and_fractional() {
        assert_eq!(fmt_euro(-1500.0), "-1\u{202f}500 €");
        assert_eq!(fmt_euro(49.6), "50 €");
    }
}
