use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("`{0}` is not a whole number of minutes")]
pub struct MinutesParseError(pub String);

/// Parse a free-text minutes field.
///
/// Blank input and non-positive numbers yield `Ok(None)`, meaning no expiry
/// was supplied. Anything else that isn't an integer is an error.
pub fn parse_minutes(raw: &str) -> Result<Option<u64>, MinutesParseError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let minutes = value
        .parse::<i64>()
        .map_err(|_| MinutesParseError(value.to_owned()))?;

    Ok(u64::try_from(minutes).ok().filter(|minutes| *minutes > 0))
}

/// `1 minute`, `30 minutes`.
pub fn minutes_label(minutes: u64) -> String {
    if minutes == 1 {
        "1 minute".to_owned()
    } else {
        format!("{minutes} minutes")
    }
}

/// Shorten `text` to at most `max_chars` characters, never splitting a char.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::{MinutesParseError, minutes_label, parse_minutes, truncate_chars};

    #[test]
    fn blank_minutes_mean_no_expiry() {
        assert_eq!(parse_minutes(""), Ok(None));
        assert_eq!(parse_minutes("   "), Ok(None));
    }

    #[test]
    fn positive_minutes_parse() {
        assert_eq!(parse_minutes("30"), Ok(Some(30)));
        assert_eq!(parse_minutes(" 1440 "), Ok(Some(1440)));
    }

    #[test]
    fn non_positive_minutes_mean_no_expiry() {
        assert_eq!(parse_minutes("-1"), Ok(None));
        assert_eq!(parse_minutes("0"), Ok(None));
    }

    #[test]
    fn malformed_minutes_are_rejected() {
        assert_eq!(parse_minutes("ten"), Err(MinutesParseError("ten".to_owned())));
        assert!(parse_minutes("1.5").is_err());
        assert!(parse_minutes("30m").is_err());
        assert!(parse_minutes("99999999999999999999").is_err());
    }

    #[test]
    fn labels_minutes() {
        assert_eq!(minutes_label(1), "1 minute");
        assert_eq!(minutes_label(45), "45 minutes");
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
