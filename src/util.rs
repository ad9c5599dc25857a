//! Small string and number helpers shared by the codecs.

use std::str::FromStr;

use crate::{ParseError, SerializationError};

/// Trait extension utility for [`str`].
pub trait StrExtension {
    /// Returns `true` if `needle` is a prefix of the string regardless of its case.
    fn starts_with_ignore_case(&self, needle: &str) -> bool;

    /// Returns a string slice with the prefix removed regardless of its case.
    ///
    /// Unlike [`str::strip_prefix`], the remainder may be empty.
    fn strip_prefix_ignore_case(&self, prefix: &str) -> Option<&Self>;
}

impl StrExtension for str {
    fn starts_with_ignore_case(&self, needle: &str) -> bool {
        self.get(..needle.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(needle))
    }

    fn strip_prefix_ignore_case(&self, prefix: &str) -> Option<&Self> {
        if !self.starts_with_ignore_case(prefix) {
            return None;
        }
        self.get(prefix.len()..)
    }
}

/// Formats a float in its shortest round-trip form, without a trailing `.0`.
///
/// `1.0` becomes `1`, `0.25` stays `0.25`. Magnitudes from `1e16` up and below `1e-4`
/// switch to exponent form with a signed two-digit exponent, `1e+21` and `1e-07`.
/// Non-finite values have no textual form in the file grammar and are rejected.
pub(crate) fn format_float(value: f64) -> Result<String, SerializationError> {
    if !value.is_finite() {
        return Err(SerializationError::NonFiniteNumber(value));
    }
    let magnitude = value.abs();
    if magnitude < 1e16 && (magnitude >= 1e-4 || magnitude == 0.0) {
        return Ok(format!("{value}"));
    }
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return Ok(scientific);
    };
    let (sign, digits) = exponent
        .strip_prefix('-')
        .map_or(('+', exponent), |digits| ('-', digits));
    Ok(format!("{mantissa}e{sign}{digits:0>2}"))
}

/// Checks that a file path can be written as one comma-separated field.
pub(crate) fn check_path(path: &str) -> Result<&str, SerializationError> {
    if path.contains(['"', ',', '\n', '\r']) {
        return Err(SerializationError::UnrepresentablePath(path.to_owned()));
    }
    Ok(path)
}

/// Removes one pair of surrounding double quotes, if present.
pub(crate) fn unquote(field: &str) -> &str {
    field
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(field)
}

/// Parses an integer field. Surrounding spaces are ignored.
pub(crate) fn parse_int<T: FromStr>(field: &str, what: &'static str) -> Result<T, ParseError> {
    field
        .trim()
        .parse()
        .map_err(|_| ParseError::invalid(what, field))
}

/// Parses a finite float field.
pub(crate) fn parse_float(field: &str, what: &'static str) -> Result<f64, ParseError> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseError::invalid(what, field))
}

/// Parses a millisecond time. Fractional times such as `1E-06` are truncated.
pub(crate) fn parse_time(field: &str) -> Result<i32, ParseError> {
    if let Ok(time) = field.trim().parse() {
        return Ok(time);
    }
    let time = parse_float(field, "time")?;
    if time < f64::from(i32::MIN) || time > f64::from(i32::MAX) {
        return Err(ParseError::invalid("time", field));
    }
    Ok(time as i32)
}
