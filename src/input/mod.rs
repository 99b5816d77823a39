//! Module defining the parsing logic used to convert raw file content into validated movement lines that can be provided to the core logic of the engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::Money;
use crate::error::{EXPECTED_FIELDS, LineError};


const DATE_FORMAT: &str = "%Y-%m-%d";

/// The three trimmed tokens of a non-blank line: `owner,date,amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedFields<'a> {
    pub owner_ref: &'a str,
    pub date_text: &'a str,
    pub amount_text: &'a str,
}

/// A line whose date and amount tokens were successfully parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedLine<'a> {
    pub fields: ParsedFields<'a>,
    pub date: NaiveDate,
    pub amount: Money,
}

/// Splits raw content into lines, paired with their 1-based ordinal.
///
/// Ordinals follow the raw position, blank lines included. A trailing `\r` is stripped from each
/// line and a trailing newline at the end of the content does not start another line.
pub fn split_lines<'a>(content: &'a [u8]) -> impl Iterator<Item = (usize, &'a [u8])> {
    let body = content.strip_suffix(b"\n").unwrap_or(content);
    (!content.is_empty())
        .then(|| body.split(|&b| b == b'\n'))
        .into_iter()
        .flatten()
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
}

/// Interprets the raw bytes of one line as UTF-8 text.
pub fn decode_line(raw: &[u8]) -> Result<&str, LineError> {
    std::str::from_utf8(raw).map_err(|_| LineError::InvalidEncoding)
}

/// Splits one line into its three trimmed fields. Returns `Ok(None)` for a blank line.
pub fn split_fields(line: &str) -> Result<Option<ParsedFields<'_>>, LineError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let tokens: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    let &[owner_ref, date_text, amount_text] = tokens.as_slice() else {
        return Err(LineError::Malformed {
            expected: EXPECTED_FIELDS,
            actual: tokens.len(),
        });
    };

    if owner_ref.is_empty() {
        return Err(LineError::EmptyOwnerRef);
    }

    Ok(Some(ParsedFields {
        owner_ref,
        date_text,
        amount_text,
    }))
}

/// Parses one line into a validated movement. Returns `Ok(None)` for a blank line.
///
/// The date is validated before the amount, so a line with both fields broken reports the date.
pub fn parse_line(line: &str) -> Result<Option<ValidatedLine<'_>>, LineError> {
    let Some(fields) = split_fields(line)? else {
        return Ok(None);
    };

    let date = parse_date(fields.date_text)?;
    let amount = parse_amount(fields.amount_text)?;

    Ok(Some(ValidatedLine {
        fields,
        date,
        amount,
    }))
}

/// Parses a date in strict `YYYY-MM-DD` form.
fn parse_date(raw: &str) -> Result<NaiveDate, LineError> {
    let invalid = || LineError::InvalidDate {
        raw: raw.to_string(),
    };

    // chrono accepts unpadded months and days, so the shape is checked first
    let bytes = raw.as_bytes();
    let well_shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, b)| match idx {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_shaped {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())
}

/// Parses a base-10 decimal: optional sign, digits, optional fraction with at least one digit.
///
/// Amounts are kept exactly, never rounded. Values that `Money` cannot hold (more than 28
/// fractional digits or a magnitude beyond `Decimal::MAX`) are rejected as invalid.
fn parse_amount(raw: &str) -> Result<Money, LineError> {
    let invalid = || LineError::InvalidAmount {
        raw: raw.to_string(),
    };

    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let well_formed = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => is_digits(int_part) && is_digits(frac_part),
        None => is_digits(unsigned),
    };
    if !well_formed {
        return Err(invalid());
    }

    let magnitude = Decimal::from_str_exact(unsigned).map_err(|_| invalid())?;
    Ok(if negative { -magnitude } else { magnitude })
}
