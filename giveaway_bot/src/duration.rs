//! Compact duration tokens such as `30s`, `2m`, `1h` or `1d`.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::GiveawayError;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)([smhd])$").expect("duration pattern is valid"));

/// Parse `<digits><unit>` into a [`Duration`]. Units are `s`, `m`, `h`
/// and `d`. No upper bound is applied here.
pub fn parse_duration(token: &str) -> Result<Duration, GiveawayError> {
    let invalid = || GiveawayError::InvalidDurationFormat(token.to_string());

    let caps = TOKEN.captures(token.trim()).ok_or_else(invalid)?;
    let value: u64 = caps[1].parse().map_err(|_| invalid())?;
    let unit_secs = match &caps[2] {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        _ => return Err(invalid()),
    };

    value
        .checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}

/// Clock-style rendering: `0:00:30`, `2:00:00`, `1 day, 0:00:00`.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let clock = format!("{hours}:{minutes:02}:{seconds:02}");
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_unit() {
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3_600));
        assert_eq!(parse_duration("1d").unwrap(), Duration::from_secs(86_400));
    }

    #[test]
    fn zero_is_a_valid_token() {
        assert_eq!(parse_duration("0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn rejects_bad_tokens() {
        for bad in ["5x", "abc", "", "s", "10", "-5s", "1.5h", "10 s", "1hm", "٣s"] {
            assert!(
                matches!(parse_duration(bad), Err(GiveawayError::InvalidDurationFormat(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn overflow_is_a_format_error() {
        assert!(matches!(
            parse_duration("99999999999999999999d"),
            Err(GiveawayError::InvalidDurationFormat(_))
        ));
        assert!(matches!(
            parse_duration("18446744073709551615d"),
            Err(GiveawayError::InvalidDurationFormat(_))
        ));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(parse_duration(" 45s ").unwrap(), Duration::from_secs(45));
    }

    #[test]
    fn formats_like_a_clock() {
        assert_eq!(format_duration(Duration::from_secs(30)), "0:00:30");
        assert_eq!(format_duration(Duration::from_secs(7_200)), "2:00:00");
        assert_eq!(format_duration(Duration::from_secs(86_400)), "1 day, 0:00:00");
        assert_eq!(format_duration(Duration::from_secs(2 * 86_400 + 61)), "2 days, 0:01:01");
    }
}
