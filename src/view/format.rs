//! Display formatting for indicator values

use crate::view::rows::PLACEHOLDER;

/// Two decimal places, placeholder for a missing value
pub fn format_decimal(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => PLACEHOLDER.to_string(),
    }
}

/// Dollar price with two decimal places
pub fn format_price(value: Option<f64>) -> String {
    match value {
        Some(v) if v < 0.0 => format!("-${:.2}", -v),
        Some(v) => format!("${:.2}", v),
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_decimals() {
        assert_eq!(format_decimal(Some(38.456)), "38.46");
        assert_eq!(format_decimal(Some(-80.0)), "-80.00");
        assert_eq!(format_decimal(Some(0.004)), "0.00");
        assert_eq!(format_decimal(None), "N/A");
    }

    #[test]
    fn test_price() {
        assert_eq!(format_price(Some(226.2)), "$226.20");
        assert_eq!(format_price(Some(-1.5)), "-$1.50");
        assert_eq!(format_price(None), "N/A");
    }

    #[test]
    fn test_non_finite_does_not_panic() {
        assert_eq!(format_decimal(Some(f64::NAN)), "NaN");
        assert_eq!(format_decimal(Some(f64::INFINITY)), "inf");
    }
}
