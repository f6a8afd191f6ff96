// Query parameter building.
//
// Unset values never reach the wire: `None`, blank strings, and empty
// lists are skipped. Dates are always sent as `YYYY-MM-DD`.

use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire format for every date filter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Ordered list of query parameters with unset values stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string value. `None` and whitespace-only values are skipped.
    pub fn text(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.0.push((key.to_owned(), v.to_owned()));
        }
        self
    }

    /// Add any displayable value (numbers, booleans, enums).
    pub fn value<T: Display>(mut self, key: &str, value: Option<T>) -> Self {
        if let Some(v) = value {
            self.0.push((key.to_owned(), v.to_string()));
        }
        self
    }

    /// Add a date, normalized to `YYYY-MM-DD`.
    pub fn date(mut self, key: &str, value: Option<NaiveDate>) -> Self {
        if let Some(d) = value {
            self.0.push((key.to_owned(), d.format(DATE_FORMAT).to_string()));
        }
        self
    }

    /// Append every pair of another parameter list.
    pub fn extend(mut self, other: QueryParams) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

/// Parse a user-supplied date: `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| dt.date_naive())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unset_values_are_omitted() {
        let params = QueryParams::new()
            .text("status", Some(""))
            .value::<bool>("hasErrors", None)
            .text("recordType", Some("BKS24"))
            .date("startDate", None);

        assert_eq!(
            params.pairs(),
            &[("recordType".to_owned(), "BKS24".to_owned())]
        );
    }

    #[test]
    fn whitespace_only_text_is_unset() {
        let params = QueryParams::new().text("search", Some("   "));
        assert!(params.is_empty());
    }

    #[test]
    fn dates_use_wire_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let params = QueryParams::new().date("startDate", Some(date));
        assert_eq!(params.get("startDate"), Some("2024-03-07"));
    }

    #[test]
    fn parse_date_accepts_rfc3339() {
        assert_eq!(
            parse_date("2024-03-07T23:10:00Z"),
            NaiveDate::from_ymd_opt(2024, 3, 7)
        );
        assert_eq!(parse_date("2024-03-07"), NaiveDate::from_ymd_opt(2024, 3, 7));
        assert_eq!(parse_date("07/03/2024"), None);
    }
}
