// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::Time;

/// Formats accepted for times in the local store, tried in order.
const TIME_FORMATS: &[&str] = &["%H:%M", "%I:%M %p", "%I:%M%p", "%H:%M:%S"];

/// Parses a time string that could be in 12-hour or 24-hour format.
///
/// Local store files are hand-edited, so `"10:00"`, `"1:30 PM"`, `"1:30pm"`
/// and `"13:30:00"` are all accepted. An empty or unparsable value yields
/// `None` with a logged warning rather than an error; absence of a time is a
/// legitimate state (all-day events).
pub fn parse_time_flexible(value: Option<&str>) -> Option<Time> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }

    let normalized = raw.to_uppercase();
    for fmt in TIME_FORMATS {
        if let Ok(time) = Time::strptime(fmt, &normalized) {
            return Some(time);
        }
    }

    tracing::warn!(value = raw, "could not parse time string with known formats");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::time;

    #[test]
    fn parses_24_hour() {
        assert_eq!(parse_time_flexible(Some("10:00")), Some(time(10, 0, 0, 0)));
        assert_eq!(parse_time_flexible(Some("23:45")), Some(time(23, 45, 0, 0)));
    }

    #[test]
    fn parses_12_hour_with_and_without_space() {
        assert_eq!(
            parse_time_flexible(Some("1:30 PM")),
            Some(time(13, 30, 0, 0))
        );
        assert_eq!(
            parse_time_flexible(Some("1:30pm")),
            Some(time(13, 30, 0, 0))
        );
        assert_eq!(
            parse_time_flexible(Some("12:00 AM")),
            Some(time(0, 0, 0, 0))
        );
    }

    #[test]
    fn parses_iso_with_seconds() {
        assert_eq!(
            parse_time_flexible(Some("13:30:00")),
            Some(time(13, 30, 0, 0))
        );
    }

    #[test]
    fn rejects_garbage_and_empty() {
        assert_eq!(parse_time_flexible(Some("not a time")), None);
        assert_eq!(parse_time_flexible(Some("")), None);
        assert_eq!(parse_time_flexible(None), None);
    }
}
