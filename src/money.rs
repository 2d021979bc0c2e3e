//! Conversions between user-facing dollar amounts and stored cents.
//!
//! All monetary values are stored and computed as integer cents. Forms accept
//! and display dollars, so the conversion happens exactly once at the form
//! boundary.

use crate::Error;

/// Convert a dollar amount from a form into cents, rounding half away from
/// zero so that e.g. 10.005 becomes 1001 and -10.005 becomes -1001.
pub fn dollars_to_cents(dollars: f64) -> i64 {
    (dollars * 100.0).round() as i64
}

/// Convert stored cents into dollars for display.
pub fn cents_to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Parse a dollar amount from free-form input into cents.
///
/// Returns `Ok(None)` for blank input so callers can treat untouched form
/// fields as "no value" rather than zero.
///
/// # Errors
/// Returns [Error::InvalidAmount] when the input is non-blank and not a
/// number.
pub fn parse_dollars_to_cents(input: &str) -> Result<Option<i64>, Error> {
    let input = input.trim();

    if input.is_empty() {
        return Ok(None);
    }

    input
        .parse::<f64>()
        .map(|dollars| Some(dollars_to_cents(dollars)))
        .map_err(|_| Error::InvalidAmount(input.to_owned()))
}


#[cfg(test)]
mod parse_dollars_to_cents_tests {
    use crate::Error;

    use super::parse_dollars_to_cents;

    #[test]
    fn blank_input_is_none() {
        assert_eq!(parse_dollars_to_cents(""), Ok(None));
        assert_eq!(parse_dollars_to_cents("   "), Ok(None));
    }

    #[test]
    fn parses_decimal_input() {
        assert_eq!(parse_dollars_to_cents("42.50"), Ok(Some(4250)));
    }

    #[test]
    fn parses_whole_dollar_input() {
        assert_eq!(parse_dollars_to_cents("100"), Ok(Some(10000)));
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert_eq!(
            parse_dollars_to_cents("ten dollars"),
            Err(Error::InvalidAmount("ten dollars".to_owned()))
        );
    }
}
