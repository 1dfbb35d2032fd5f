//! Display helpers for front-ends. Report values themselves are never rounded.

use thousands::Separable;

/// Rounds `value` to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Truncates to whole currency units and groups thousands: `1234567.9` -> `1,234,567`.
pub fn format_currency(value: f64) -> String {
    (value.trunc() as i64).separate_with_commas()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_two_decimals() {
        assert_eq!(round_to(360.296_296, 2), 360.3);
        assert_eq!(round_to(1.599_999_999, 2), 1.6);
        assert_eq!(round_to(4.5, 0), 5.0);
    }

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "0");
        assert_eq!(format_currency(999.99), "999");
        assert_eq!(format_currency(1_000.0), "1,000");
        assert_eq!(format_currency(125_000_000.0), "125,000,000");
        assert_eq!(format_currency(17_294_222.5), "17,294,222");
        assert_eq!(format_currency(-4_500.0), "-4,500");
    }
}
