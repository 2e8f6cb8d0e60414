use chrono_tz::Tz;
use daybook_core::error::CoreError;
use daybook_core::timezone::{parse_timezone, validate_timezone};

/// Detect system timezone
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if !tz.is_empty() && validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    if let Ok(tz) = iana_time_zone::get_timezone() {
        if validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    "UTC".to_string()
}

/// Common timezones offered as suggestions
pub fn get_common_timezones() -> Vec<&'static str> {
    vec![
        "UTC",
        "America/New_York",
        "America/Chicago",
        "America/Denver",
        "America/Los_Angeles",
        "America/Sao_Paulo",
        "Europe/London",
        "Europe/Paris",
        "Europe/Berlin",
        "Europe/Madrid",
        "Europe/Istanbul",
        "Asia/Tokyo",
        "Asia/Seoul",
        "Asia/Shanghai",
        "Asia/Singapore",
        "Asia/Kolkata",
        "Asia/Dubai",
        "Australia/Sydney",
        "Pacific/Auckland",
    ]
}

/// Suggest similar timezones for invalid input
pub fn suggest_timezone(invalid: &str) -> Vec<&'static str> {
    let invalid_lower = invalid.to_lowercase();

    let mut matches: Vec<_> = get_common_timezones()
        .into_iter()
        .filter(|tz| {
            let tz_lower = tz.to_lowercase();
            tz_lower.contains(&invalid_lower)
                || invalid_lower.contains(&tz_lower)
                || tz
                    .split('/')
                    .any(|part| part.to_lowercase().contains(&invalid_lower))
        })
        .collect();

    matches.truncate(5);
    matches
}

/// Resolve user input (IANA name or a few common abbreviations) to a zone.
pub fn normalize_timezone_input(input: &str) -> Result<Tz, CoreError> {
    if let Ok(tz) = parse_timezone(input) {
        return Ok(tz);
    }

    let normalized = match input.to_lowercase().as_str() {
        "est" | "eastern" => "America/New_York",
        "cst" | "central" => "America/Chicago",
        "mst" | "mountain" => "America/Denver",
        "pst" | "pacific" => "America/Los_Angeles",
        "gmt" | "utc" | "z" => "UTC",
        "bst" | "london" => "Europe/London",
        "cet" | "paris" => "Europe/Paris",
        "jst" | "tokyo" => "Asia/Tokyo",
        _ => {
            let suggestions = suggest_timezone(input);
            return Err(if suggestions.is_empty() {
                CoreError::InvalidTimezone(format!(
                    "Unknown timezone '{}'. Use IANA names like 'America/New_York'",
                    input
                ))
            } else {
                CoreError::InvalidTimezone(format!(
                    "Unknown timezone '{}'. Did you mean: {}?",
                    input,
                    suggestions.join(", ")
                ))
            });
        }
    };

    parse_timezone(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Europe/Berlin", "Europe/Berlin")]
    #[case("PST", "America/Los_Angeles")]
    #[case("utc", "UTC")]
    #[case("tokyo", "Asia/Tokyo")]
    fn test_normalize_timezone_input(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_timezone_input(input).unwrap().name(), expected);
    }

    #[test]
    fn test_unknown_timezone_gets_suggestions() {
        let err = normalize_timezone_input("Berlin").unwrap_err();
        match err {
            CoreError::InvalidTimezone(message) => assert!(message.contains("Europe/Berlin")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_detected_timezone_is_valid() {
        assert!(validate_timezone(&detect_system_timezone()).is_ok());
    }
}
