use std::num::NonZeroUsize;
use std::time::Duration;

use crate::domain::HttpMethod;
use crate::error::ValidationError;

/// Case-insensitive method parser for clap.
///
/// # Errors
///
/// Returns an error for anything other than the five supported methods.
pub fn parse_method(s: &str) -> Result<HttpMethod, ValidationError> {
    s.parse::<HttpMethod>()
}

/// # Errors
///
/// Returns an error when the value is not a positive integer.
pub fn parse_concurrency(s: &str) -> Result<NonZeroUsize, ValidationError> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|err| ValidationError::InvalidNumber { source: err })?;
    NonZeroUsize::new(value).ok_or(ValidationError::ValueTooSmall { min: 1 })
}

/// Parses `250ms`, `5s`, `2m` or `1h`; a bare number means seconds.
///
/// # Errors
///
/// Returns an error for empty input, an unknown unit, overflow or a zero
/// duration.
pub fn parse_duration_arg(s: &str) -> Result<Duration, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }

    let mut digits_len = 0usize;
    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits_len = digits_len.saturating_add(1);
        } else {
            break;
        }
    }
    if digits_len == 0 {
        return Err(ValidationError::InvalidDurationFormat {
            value: value.to_owned(),
        });
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part
        .parse()
        .map_err(|err| ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    let duration = match unit {
        "ms" => Duration::from_millis(number),
        "s" => Duration::from_secs(number),
        "m" => {
            let secs = number
                .checked_mul(60)
                .ok_or(ValidationError::DurationOverflow)?;
            Duration::from_secs(secs)
        }
        "h" => {
            let secs = number
                .checked_mul(60)
                .and_then(|seconds| seconds.checked_mul(60))
                .ok_or(ValidationError::DurationOverflow)?;
            Duration::from_secs(secs)
        }
        _ => {
            return Err(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            });
        }
    };

    if duration.as_millis() == 0 {
        return Err(ValidationError::DurationZero);
    }

    Ok(duration)
}
