// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! ISO 8601 durations as found in flight schedules, e.g. `PT1H25M`.

use chrono::Duration;
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map_res, opt};
use nom::sequence::{preceded, terminated, tuple};
use nom::IResult;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DurationError {
    #[error("Invalid ISO 8601 duration: {0:?}")]
    Invalid(String),
    #[error("Duration out of range: {0:?}")]
    OutOfRange(String),
}

type TimePart = (Option<i64>, Option<i64>, Option<i64>);

fn number(input: &str) -> IResult<&str, i64> {
    map_res(digit1, str::parse::<i64>)(input)
}

fn days(input: &str) -> IResult<&str, Option<i64>> {
    opt(terminated(number, char('D')))(input)
}

fn hours(input: &str) -> IResult<&str, Option<i64>> {
    opt(terminated(number, char('H')))(input)
}

fn minutes(input: &str) -> IResult<&str, Option<i64>> {
    opt(terminated(number, char('M')))(input)
}

fn seconds(input: &str) -> IResult<&str, Option<i64>> {
    opt(terminated(number, char('S')))(input)
}

fn time_part(input: &str) -> IResult<&str, Option<TimePart>> {
    opt(preceded(char('T'), tuple((hours, minutes, seconds))))(input)
}

fn duration(input: &str) -> IResult<&str, (Option<i64>, Option<TimePart>)> {
    preceded(char('P'), tuple((days, time_part)))(input)
}

/// Parses `P[nD][T[nH][nM][nS]]`. At least one component must be present
/// and a `T` must be followed by one.
pub fn parse_iso8601_duration(text: &str) -> Result<Duration, DurationError> {
    let invalid = || DurationError::Invalid(text.to_string());
    let (_, (d, time)) = all_consuming(duration)(text.trim()).map_err(|_| invalid())?;
    let (h, m, s) = match time {
        Some((None, None, None)) => return Err(invalid()),
        Some(parts) => parts,
        None if d.is_none() => return Err(invalid()),
        None => (None, None, None),
    };

    let total = [(d, 86_400i64), (h, 3_600), (m, 60), (s, 1)]
        .into_iter()
        .try_fold(0i64, |acc, (value, unit)| {
            value.unwrap_or(0).checked_mul(unit)?.checked_add(acc)
        })
        .ok_or_else(|| DurationError::OutOfRange(text.to_string()))?;
    Duration::try_seconds(total).ok_or_else(|| DurationError::OutOfRange(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_components() {
        assert_eq!(parse_iso8601_duration("PT1H25M"), Ok(Duration::minutes(85)));
        assert_eq!(parse_iso8601_duration("PT45S"), Ok(Duration::seconds(45)));
        assert_eq!(parse_iso8601_duration("P1D"), Ok(Duration::hours(24)));
        assert_eq!(
            parse_iso8601_duration("P1DT2H3M4S"),
            Ok(Duration::seconds(86_400 + 7_200 + 180 + 4))
        );
        assert_eq!(parse_iso8601_duration(" PT90M "), Ok(Duration::minutes(90)));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "P", "PT", "1H", "PT1H25", "PT1M1H", "PT1HX", "pt1h", "PT-1H"] {
            assert!(
                matches!(parse_iso8601_duration(bad), Err(DurationError::Invalid(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            parse_iso8601_duration("P99999999999999999D"),
            Err(DurationError::OutOfRange(_))
        ));
    }
}
