//! Tolerant parsing of recorded lab values.
//!
//! Values arrive as free text ("450", "1.8 mg/dL", "n/a").  The leading
//! numeric token is taken and anything after it is ignored, which is how the
//! dashboard has always read them.  Parsing is locale-insensitive: `.` is the
//! only decimal separator, and a numeric token that runs into a `,`, a second
//! `.`, or whitespace followed by another digit (`"1,200"`, `"2,1"`,
//! `"1.2.3"`, `"1 200"`) is rejected rather than guessed at.  An exponent
//! (`"4.5e2"`) is part of the number.

use thiserror::Error;

/// Why a recorded value could not be read as a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueParseError {
    #[error("value is empty")]
    Empty,

    #[error("value '{0}' does not start with a number")]
    NotNumeric(String),

    #[error("value '{0}' has an ambiguous decimal or thousands separator")]
    AmbiguousSeparator(String),
}

/// Read the leading decimal number of `raw`.
pub fn parse_lab_value(raw: &str) -> Result<f64, ValueParseError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(ValueParseError::Empty);
    }

    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..].iter().take_while(|b| b.is_ascii_digit()).count()
    };

    let mut end = usize::from(matches!(bytes[0], b'+' | b'-'));
    let int_digits = digits_from(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        end += 1 + frac_digits;
    }

    if int_digits + frac_digits == 0 {
        return Err(ValueParseError::NotNumeric(raw.to_string()));
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_digits = digits_from((end + 1 + sign).min(bytes.len()));
        if exp_digits > 0 {
            end += 1 + sign + exp_digits;
        }
    }

    let separator_follows = matches!(bytes.get(end), Some(b',' | b'.'))
        && bytes.get(end + 1).is_some_and(u8::is_ascii_digit);
    let spaced_digit_follows = {
        let gap = bytes[end..].iter().take_while(|b| b.is_ascii_whitespace()).count();
        gap > 0 && bytes.get(end + gap).is_some_and(u8::is_ascii_digit)
    };
    if separator_follows || spaced_digit_follows {
        return Err(ValueParseError::AmbiguousSeparator(raw.to_string()));
    }

    // The token is pure ASCII, so `end` is a char boundary.
    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValueParseError::NotNumeric(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_numbers() {
        assert_eq!(parse_lab_value("401"), Ok(401.0));
        assert_eq!(parse_lab_value("2.1"), Ok(2.1));
        assert_eq!(parse_lab_value("  85  "), Ok(85.0));
        assert_eq!(parse_lab_value("-3"), Ok(-3.0));
        assert_eq!(parse_lab_value("+7.5"), Ok(7.5));
        assert_eq!(parse_lab_value(".5"), Ok(0.5));
        assert_eq!(parse_lab_value("12."), Ok(12.0));
    }

    #[test]
    fn trailing_units_are_ignored() {
        assert_eq!(parse_lab_value("450 ng/mL"), Ok(450.0));
        assert_eq!(parse_lab_value("1.8mg/dL"), Ok(1.8));
        assert_eq!(parse_lab_value("92 U/L (repeat)"), Ok(92.0));
        assert_eq!(parse_lab_value("450, repeated"), Ok(450.0));
    }

    #[test]
    fn non_numeric_values_fail() {
        assert_eq!(
            parse_lab_value("not-a-number"),
            Err(ValueParseError::NotNumeric("not-a-number".to_string()))
        );
        assert!(matches!(parse_lab_value("n/a"), Err(ValueParseError::NotNumeric(_))));
        assert!(matches!(parse_lab_value("<0.5"), Err(ValueParseError::NotNumeric(_))));
        assert!(matches!(parse_lab_value("-"), Err(ValueParseError::NotNumeric(_))));
        assert!(matches!(parse_lab_value("."), Err(ValueParseError::NotNumeric(_))));
        assert!(matches!(parse_lab_value("NaN"), Err(ValueParseError::NotNumeric(_))));
        assert!(matches!(parse_lab_value("inf"), Err(ValueParseError::NotNumeric(_))));
    }

    #[test]
    fn exponent_is_part_of_the_number() {
        assert_eq!(parse_lab_value("4.5e2"), Ok(450.0));
        assert_eq!(parse_lab_value("1.2E+3 ng/mL"), Ok(1200.0));
        assert_eq!(parse_lab_value("25e-1"), Ok(2.5));
        assert_eq!(parse_lab_value("5e"), Ok(5.0));
        assert_eq!(parse_lab_value("5e-"), Ok(5.0));
        assert!(matches!(parse_lab_value("1e400"), Err(ValueParseError::NotNumeric(_))));
    }

    #[test]
    fn space_grouped_digits_are_not_guessed() {
        assert!(matches!(
            parse_lab_value("1 200"),
            Err(ValueParseError::AmbiguousSeparator(_))
        ));
        assert!(matches!(
            parse_lab_value("4.5  1"),
            Err(ValueParseError::AmbiguousSeparator(_))
        ));
        assert_eq!(parse_lab_value("450 ng/mL"), Ok(450.0));
    }

    #[test]
    fn empty_values_fail() {
        assert_eq!(parse_lab_value(""), Err(ValueParseError::Empty));
        assert_eq!(parse_lab_value("   "), Err(ValueParseError::Empty));
    }

    #[test]
    fn locale_separators_are_not_guessed() {
        assert!(matches!(
            parse_lab_value("1,200"),
            Err(ValueParseError::AmbiguousSeparator(_))
        ));
        assert!(matches!(
            parse_lab_value("2,1"),
            Err(ValueParseError::AmbiguousSeparator(_))
        ));
        assert!(matches!(
            parse_lab_value("1.2.3"),
            Err(ValueParseError::AmbiguousSeparator(_))
        ));
    }
}
