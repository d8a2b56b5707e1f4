//! # Interval Parsing
//!
//! Parses durations written the way Go's `time.ParseDuration` accepts them,
//! so existing invocations such as `--interval 5m` or `--interval 1h30m`
//! keep working.
//!
//! A duration is an optional sign followed by one or more `<number><unit>`
//! pairs. Numbers may carry a fraction (`1.5h`). Valid units are `ns`,
//! `us` (or `µs` / `μs`), `ms`, `s`, `m` and `h`. A bare `0` is accepted.
//! Negative durations are clamped to zero, which means "run once".

use std::time::Duration;

use thiserror::Error;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const MAX_FRACTION_DIGITS: usize = 18;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,
    #[error("invalid duration '{0}'")]
    Invalid(String),
    #[error("missing unit in duration '{0}'")]
    MissingUnit(String),
    #[error("unknown unit '{unit}' in duration '{input}'")]
    UnknownUnit { unit: String, input: String },
    #[error("duration '{0}' is out of range")]
    Overflow(String),
}

pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationError::Empty);
    }

    let (negative, mut rest) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(DurationError::Invalid(input.to_string()));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, fraction, after_number) = split_number(rest)
            .ok_or_else(|| DurationError::Invalid(input.to_string()))?;

        let unit_len = after_number
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after_number.len());
        let unit = &after_number[..unit_len];
        if unit.is_empty() {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let unit_nanos = unit_in_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        total = whole
            .checked_mul(unit_nanos)
            .and_then(|nanos| nanos.checked_add(fraction_nanos(fraction, unit_nanos)))
            .and_then(|nanos| total.checked_add(nanos))
            .filter(|nanos| *nanos <= i64::MAX as u128)
            .ok_or_else(|| DurationError::Overflow(input.to_string()))?;

        rest = &after_number[unit_len..];
    }

    if negative {
        return Ok(Duration::ZERO);
    }

    let secs = (total / NANOS_PER_SEC) as u64;
    let nanos = (total % NANOS_PER_SEC) as u32;
    Ok(Duration::new(secs, nanos))
}

/// Splits a leading `123.456` off `s`.
/// At least one digit is required on one side of the dot.
fn split_number(s: &str) -> Option<(u128, &str, &str)> {
    let whole_len = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let whole_digits = &s[..whole_len];
    let mut rest = &s[whole_len..];

    let mut fraction = "";
    if let Some(after_dot) = rest.strip_prefix('.') {
        let fraction_len = after_dot
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after_dot.len());
        fraction = &after_dot[..fraction_len];
        rest = &after_dot[fraction_len..];
    }

    if whole_digits.is_empty() && fraction.is_empty() {
        return None;
    }

    let whole = if whole_digits.is_empty() {
        0
    } else {
        whole_digits.parse::<u128>().ok()?
    };
    Some((whole, fraction, rest))
}

fn fraction_nanos(fraction: &str, unit_nanos: u128) -> u128 {
    let digits = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    if digits.is_empty() {
        return 0;
    }
    let value: u128 = digits.parse().unwrap_or(0);
    let scale = 10u128.pow(digits.len() as u32);
    value * unit_nanos / scale
}

fn unit_in_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}
