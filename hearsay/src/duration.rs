//! Short-unit duration text, e.g. `5s`, `100ms`, `1h30m` or `1.5µs`.

use std::time::Duration;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

// Digits past this are below nanosecond precision for every unit.
const MAX_FRACTION_DIGITS: usize = 18;

/// Error returned when text is not a valid duration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("duration is empty")]
    Empty,
    #[error("negative durations are not supported")]
    Negative,
    #[error("invalid number in duration `{0}`")]
    InvalidNumber(String),
    #[error("missing unit in duration `{0}`")]
    MissingUnit(String),
    #[error("unknown unit `{unit}` in duration `{input}`")]
    UnknownUnit { unit: String, input: String },
    #[error("duration `{0}` is out of range")]
    Overflow(String),
}

/// Parse a sequence of decimal numbers, each with an optional fraction and a unit suffix. Valid
/// units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare `0` is accepted without a unit.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let text = input.strip_prefix('+').unwrap_or(input);
    if text.starts_with('-') {
        return Err(DurationError::Negative);
    }
    if text.is_empty() {
        return Err(DurationError::Empty);
    }
    if text == "0" {
        return Ok(Duration::ZERO);
    }

    let overflow = || DurationError::Overflow(input.to_string());
    let mut rest = text;
    let mut total: u128 = 0;

    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_end);
        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return Err(DurationError::InvalidNumber(input.to_string()));
        }

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        if unit.is_empty() {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let scale = unit_scale(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(overflow)?;

        let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
        if !fraction.is_empty() {
            let digits: u128 = fraction.parse().map_err(|_| overflow())?;
            nanos = nanos
                .checked_add(digits * scale / 10u128.pow(fraction.len() as u32))
                .ok_or_else(overflow)?;
        }

        total = total.checked_add(nanos).ok_or_else(overflow)?;
        rest = tail;
    }

    u64::try_from(total)
        .map(Duration::from_nanos)
        .map_err(|_| overflow())
}

fn unit_scale(unit: &str) -> Option<u128> {
    Some(match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => NANOS_PER_MICRO,
        "ms" => NANOS_PER_MILLI,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3_600 * NANOS_PER_SEC,
        _ => return None,
    })
}

/// Format a duration in the same short-unit form accepted by [`parse_duration`]. Sub-second
/// durations use the largest fitting unit below a second, everything else is spelled out as
/// hours, minutes and (fractional) seconds with leading zero components omitted.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_MICRO {
        return format!("{nanos}ns");
    }
    if nanos < NANOS_PER_MILLI {
        return format!("{}µs", decimal(nanos, NANOS_PER_MICRO));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", decimal(nanos, NANOS_PER_MILLI));
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3_600;
    let minutes = total_secs % 3_600 / 60;
    let seconds = decimal(
        (total_secs % 60) as u128 * NANOS_PER_SEC + duration.subsec_nanos() as u128,
        NANOS_PER_SEC,
    );

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

fn decimal(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let remainder = value % unit;
    if remainder == 0 {
        return whole.to_string();
    }

    let width = unit.ilog10() as usize;
    let digits = format!("{remainder:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_units() {
        assert_eq!(Ok(Duration::from_secs(5)), parse_duration("5s"));
        assert_eq!(Ok(Duration::from_millis(100)), parse_duration("100ms"));
        assert_eq!(Ok(Duration::from_micros(7)), parse_duration("7us"));
        assert_eq!(Ok(Duration::from_micros(7)), parse_duration("7µs"));
        assert_eq!(Ok(Duration::from_nanos(42)), parse_duration("42ns"));
        assert_eq!(Ok(Duration::from_secs(120)), parse_duration("2m"));
        assert_eq!(Ok(Duration::from_secs(7_200)), parse_duration("2h"));
    }

    #[test]
    fn parses_compound_and_fractional() {
        assert_eq!(Ok(Duration::from_secs(5_400)), parse_duration("1h30m"));
        assert_eq!(Ok(Duration::from_millis(1_500)), parse_duration("1.5s"));
        assert_eq!(Ok(Duration::from_millis(500)), parse_duration(".5s"));
        assert_eq!(Ok(Duration::from_secs(3)), parse_duration("3.s"));
        assert_eq!(
            Ok(Duration::from_millis(2 * 3_600_000 + 45 * 60_000 + 10_250)),
            parse_duration("2h45m10.25s")
        );
    }

    #[test]
    fn zero_and_sign() {
        assert_eq!(Ok(Duration::ZERO), parse_duration("0"));
        assert_eq!(Ok(Duration::ZERO), parse_duration("0s"));
        assert_eq!(Ok(Duration::from_secs(1)), parse_duration("+1s"));
        assert_eq!(Err(DurationError::Negative), parse_duration("-1s"));
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!(Err(DurationError::Empty), parse_duration(""));
        assert!(matches!(
            parse_duration("5"),
            Err(DurationError::MissingUnit(_))
        ));
        assert!(matches!(
            parse_duration("5d"),
            Err(DurationError::UnknownUnit { unit, .. }) if unit == "d"
        ));
        assert!(matches!(
            parse_duration("abc"),
            Err(DurationError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_duration("1.2.3s"),
            Err(DurationError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_duration("99999999999h"),
            Err(DurationError::Overflow(_))
        ));
        // Whole part fits, adding the fraction doesn't.
        assert!(matches!(
            parse_duration("340282366920938463463374607431768211.999us"),
            Err(DurationError::Overflow(_))
        ));
    }

    #[test]
    fn formats_canonically() {
        assert_eq!("0s", format_duration(Duration::ZERO));
        assert_eq!("750ns", format_duration(Duration::from_nanos(750)));
        assert_eq!("1.5µs", format_duration(Duration::from_nanos(1_500)));
        assert_eq!("100ms", format_duration(Duration::from_millis(100)));
        assert_eq!("5s", format_duration(Duration::from_secs(5)));
        assert_eq!("1.5s", format_duration(Duration::from_millis(1_500)));
        assert_eq!("1m30s", format_duration(Duration::from_secs(90)));
        assert_eq!("1h0m0s", format_duration(Duration::from_secs(3_600)));
    }

    #[test]
    fn formatted_text_parses_back() {
        for duration in [
            Duration::from_nanos(3),
            Duration::from_micros(1_250),
            Duration::from_millis(61_001),
            Duration::from_secs(86_400 + 1),
        ] {
            assert_eq!(Ok(duration), parse_duration(&format_duration(duration)));
        }
    }
}
