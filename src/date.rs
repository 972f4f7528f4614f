//! Date values travel through the form as `DD/MM/YYYY` strings, never as
//! native dates, so submissions serialize without special cases.

use chrono::{DateTime, NaiveDate};

use crate::error::{FormError, FormResult};

/// Display and storage pattern for date fields
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Store a picked date. No date means the field is omitted from the submission.
pub fn parse_date(value: Option<NaiveDate>) -> Option<String> {
    value.map(|date| date.format(DATE_FORMAT).to_string())
}

/// Store raw widget text. Empty text is "no date"; otherwise ISO dates, RFC 3339
/// timestamps and the display pattern itself are accepted.
pub fn parse_date_input(raw: &str) -> FormResult<Option<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, DATE_FORMAT))
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| FormError::InvalidDate {
            value: raw.to_string(),
        })?;

    Ok(parse_date(Some(date)))
}

/// Turn a stored value back into a picker selection; `None` is "nothing selected"
pub fn format_date(stored: Option<&str>) -> FormResult<Option<NaiveDate>> {
    match stored {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Some)
            .map_err(|_| FormError::InvalidDate {
                value: text.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_zero_pads() {
        let date = NaiveDate::from_ymd_opt(1985, 7, 3).unwrap();
        assert_eq!(parse_date(Some(date)), Some("03/07/1985".to_string()));
        assert_eq!(parse_date(None), None);
    }

    #[test]
    fn test_parse_date_input_formats() {
        assert_eq!(parse_date_input("1985-07-03").unwrap().as_deref(), Some("03/07/1985"));
        assert_eq!(parse_date_input("03/07/1985").unwrap().as_deref(), Some("03/07/1985"));
        assert_eq!(
            parse_date_input("1985-07-03T10:00:00+00:00").unwrap().as_deref(),
            Some("03/07/1985")
        );
        assert_eq!(parse_date_input("").unwrap(), None);
        assert_eq!(parse_date_input("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_date_input_rejects_garbage() {
        assert!(matches!(
            parse_date_input("yesterday"),
            Err(FormError::InvalidDate { .. })
        ));
        assert!(parse_date_input("31/02/2020").is_err());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(None).unwrap(), None);
        assert_eq!(
            format_date(Some("03/07/1985")).unwrap(),
            NaiveDate::from_ymd_opt(1985, 7, 3)
        );
        assert!(format_date(Some("1985-07-03")).is_err());
    }
}
