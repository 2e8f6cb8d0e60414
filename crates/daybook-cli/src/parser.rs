use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_english::{parse_date_string, Dialect};
use daybook_core::error::CoreError;
use daybook_core::models::{DaySet, ParseDayError};

/// Parse a calendar day: ISO `YYYY-MM-DD` or English like "yesterday",
/// "next friday", relative to `now`.
pub fn parse_day<Tz: TimeZone>(input: &str, now: DateTime<Tz>) -> Result<NaiveDate>
where
    Tz::Offset: Copy,
{
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_date_string(input, now, Dialect::Uk)
        .map(|parsed| parsed.date_naive())
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", input, e))
}

/// Parse day words from the command line ("mon wed", "mon,wed", "weekdays").
pub fn parse_days(words: &[String]) -> Result<DaySet, CoreError> {
    let days: DaySet = words
        .join(" ")
        .parse()
        .map_err(|e: ParseDayError| CoreError::InvalidDay(e.to_string()))?;
    if days.is_empty() {
        return Err(CoreError::InvalidInput("no days given".to_string()));
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use daybook_core::models::DayCode;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        // Wednesday
        Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()
    }

    #[rstest]
    #[case("2024-01-31", NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())]
    #[case("yesterday", NaiveDate::from_ymd_opt(2024, 5, 14).unwrap())]
    #[case("tomorrow", NaiveDate::from_ymd_opt(2024, 5, 16).unwrap())]
    fn test_parse_day(#[case] input: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_day(input, now()).unwrap(), expected);
    }

    #[test]
    fn test_parse_day_rejects_garbage() {
        assert!(parse_day("not a date at all", now()).is_err());
    }

    #[rstest]
    #[case(&["mon", "wed"], vec![DayCode::Mon, DayCode::Wed])]
    #[case(&["Fri,Mon"], vec![DayCode::Mon, DayCode::Fri])]
    #[case(&["every", "day"], DayCode::ALL.to_vec())]
    #[case(&["weekends"], vec![DayCode::Sat, DayCode::Sun])]
    fn test_parse_days(#[case] words: &[&str], #[case] expected: Vec<DayCode>) {
        let words: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        assert_eq!(parse_days(&words).unwrap().days(), expected.as_slice());
    }

    #[test]
    fn test_parse_days_rejects_unknown_day() {
        let words = vec!["mon".to_string(), "funday".to_string()];
        assert!(matches!(parse_days(&words), Err(CoreError::InvalidDay(_))));
    }
}
