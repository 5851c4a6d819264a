//! Locale-tolerant decimal parsing
//!
//! Measurement values arrive as text that may use either `,` or `.` as the
//! decimal separator depending on the keyboard/regional settings of the
//! device the reading was typed on. Everything numeric crosses this module
//! on the way in; persisted form is always point-decimal.

/// Decimal parse error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecimalError {
    #[error("not a number: {0:?}")]
    NotNumeric(String),

    #[error("non-finite value: {0:?}")]
    NonFinite(String),
}

/// Parse a comma- or point-separated decimal into an `f64`.
///
/// No rounding is applied; this is the computation-path entry point.
/// Non-numeric and non-finite inputs are explicit errors, never clamped.
pub fn parse_decimal(raw: &str) -> Result<f64, DecimalError> {
    let candidate = raw.trim().replace(',', ".");
    let value: f64 = candidate
        .parse()
        .map_err(|_| DecimalError::NotNumeric(raw.to_string()))?;
    if !value.is_finite() {
        return Err(DecimalError::NonFinite(raw.to_string()));
    }
    Ok(value)
}

/// Normalize a decimal string for display/persistence.
///
/// Replaces `,` with `.`, rounds to 3 decimal places, and re-renders with
/// at least one fractional digit (`"7.0"`, not `"7"`). Non-numeric input
/// falls back to the literal `"0.0"` so a bad paste can never take the
/// dashboard down. Idempotent on its own output.
pub fn normalize_decimal(raw: &str) -> String {
    match parse_decimal(raw) {
        Ok(value) => render(round3(value)),
        Err(_) => "0.0".to_string(),
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn render(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_and_point_agree() {
        assert_eq!(normalize_decimal("7,4"), normalize_decimal("7.4"));
        assert_eq!(normalize_decimal("7,4"), "7.4");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["7,4", "3000", "0.125", "7.1239", "garbage", "-1,5"] {
            let once = normalize_decimal(raw);
            assert_eq!(
                normalize_decimal(&once),
                once,
                "normalize_decimal not idempotent for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_rounds_to_three_decimals() {
        assert_eq!(normalize_decimal("7.12345"), "7.123");
        assert_eq!(normalize_decimal("7.1239"), "7.124");
    }

    #[test]
    fn test_integral_values_keep_a_fraction_digit() {
        assert_eq!(normalize_decimal("3000"), "3000.0");
        assert_eq!(normalize_decimal("7"), "7.0");
    }

    #[test]
    fn test_non_numeric_falls_back_to_zero() {
        assert_eq!(normalize_decimal(""), "0.0");
        assert_eq!(normalize_decimal("abc"), "0.0");
        assert_eq!(normalize_decimal("7,4,2"), "0.0");
    }

    #[test]
    fn test_parse_decimal_does_not_round() {
        assert_eq!(parse_decimal("7.12345").unwrap(), 7.12345);
        assert_eq!(parse_decimal(" 7,5 ").unwrap(), 7.5);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage_and_infinities() {
        assert!(matches!(
            parse_decimal("x"),
            Err(DecimalError::NotNumeric(_))
        ));
        assert!(matches!(
            parse_decimal("inf"),
            Err(DecimalError::NonFinite(_))
        ));
        assert!(matches!(
            parse_decimal("NaN"),
            Err(DecimalError::NonFinite(_))
        ));
    }
}
