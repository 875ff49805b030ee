//! Human-readable duration strings for tick and group intervals.

use std::time::Duration;

/// Parse a duration string such as `"10ms"`, `"1s"` or `"2m30s"`.
///
/// Supports components `Xd`, `Xh`, `Xm`, `Xs` and `Xms`, combinable in any
/// order. A bare number is seconds. Only the first whitespace-separated word
/// is read, so `"10ms // note"` parses as ten milliseconds.
/// Returns `None` if the string is empty, unparseable or zero.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let word = s.split_whitespace().next()?;

    let mut total_ms: u64 = 0;
    let mut num_buf = String::new();
    let mut found_unit = false;
    let mut chars = word.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch.is_ascii_digit() {
            num_buf.push(ch);
            continue;
        }

        let n: u64 = num_buf.parse().ok()?;
        num_buf.clear();
        let factor = match ch {
            'd' => 86_400_000,
            'h' => 3_600_000,
            'm' if chars.peek() == Some(&'s') => {
                chars.next();
                1
            }
            'm' => 60_000,
            's' => 1_000,
            _ => return None,
        };
        total_ms = total_ms.checked_add(n.checked_mul(factor)?)?;
        found_unit = true;
    }

    if !num_buf.is_empty() {
        // "30m15" is ambiguous.
        if found_unit {
            return None;
        }
        let n: u64 = num_buf.parse().ok()?;
        total_ms = n.checked_mul(1_000)?;
    }

    if total_ms == 0 {
        return None;
    }

    Some(Duration::from_millis(total_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_milliseconds() {
        assert_eq!(parse_duration("10ms"), Some(Duration::from_millis(10)));
    }

    #[test]
    fn parse_seconds_and_minutes() {
        assert_eq!(parse_duration("1s"), Some(Duration::from_secs(1)));
        assert_eq!(parse_duration("2m30s"), Some(Duration::from_secs(150)));
    }

    #[test]
    fn parse_mixed_units() {
        assert_eq!(
            parse_duration("1d2h3m4s5ms"),
            Some(Duration::from_millis(
                86_400_000 + 7_200_000 + 180_000 + 4_000 + 5
            ))
        );
    }

    #[test]
    fn bare_number_is_seconds() {
        assert_eq!(parse_duration("120"), Some(Duration::from_secs(120)));
    }

    #[test]
    fn trailing_comment_ignored() {
        assert_eq!(
            parse_duration("10ms //comment"),
            Some(Duration::from_millis(10))
        );
    }

    #[test]
    fn invalid_inputs() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("   "), None);
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration("30m15"), None);
        assert_eq!(parse_duration("5x"), None);
        assert_eq!(parse_duration("0s"), None);
        assert_eq!(parse_duration("ms"), None);
    }
}
