//! Validators for single values.

use std::fmt;
use std::future::ready;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;
use tessera_core::{BoxFuture, ValidationError};
use tessera_docs::Schema;
use uuid::Uuid;

use crate::validator::{ParameterValidator, ValidationResult};

/// Accepts one of a fixed set of strings, ignoring case.
///
/// The declared spelling is returned, not the received one.
#[derive(Debug, Clone)]
pub struct StringEnum {
    values: Vec<String>,
}

/// Creates a validator accepting any of `values`, case-insensitively.
pub fn string_enum<I, S>(values: I) -> StringEnum
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    StringEnum {
        values: values.into_iter().map(Into::into).collect(),
    }
}

impl StringEnum {
    fn matching(&self, raw: &str) -> Option<&String> {
        let lowered = raw.to_lowercase();
        self.values
            .iter()
            .find(|value| value.to_lowercase() == lowered)
    }
}

impl ParameterValidator for StringEnum {
    type Output = String;

    fn type_name(&self) -> String {
        self.values
            .iter()
            .map(|value| format!("'{value}'"))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    fn schema(&self) -> Schema {
        let mut schema = Schema::string();
        if let [only] = self.values.as_slice() {
            schema.const_value = Some(Value::String(only.clone()));
        } else {
            schema.enum_values = self.values.iter().cloned().map(Value::String).collect();
        }
        schema
    }

    fn validate<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, ValidationResult<String>> {
        let result = self.matching(raw).cloned().ok_or_else(|| {
            ValidationError::new(format!(
                "Expected {} but received: '{raw}'",
                self.type_name()
            ))
        });
        Box::pin(ready(result))
    }
}

/// Accepts base-10 integers without leading zeros, optionally bounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integer {
    min: Option<i64>,
    max: Option<i64>,
}

/// Creates an unbounded integer validator.
pub fn integer() -> Integer {
    Integer::default()
}

impl Integer {
    /// Sets the inclusive lower bound.
    #[must_use]
    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the inclusive upper bound.
    #[must_use]
    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    fn parse(&self, raw: &str) -> Option<i64> {
        let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return None;
        }
        let value: i64 = raw.parse().ok()?;
        let in_range = self.min.map_or(true, |min| value >= min)
            && self.max.map_or(true, |max| value <= max);
        in_range.then_some(value)
    }
}

impl ParameterValidator for Integer {
    type Output = i64;

    fn type_name(&self) -> String {
        "integer".to_string()
    }

    fn schema(&self) -> Schema {
        let mut schema = Schema::integer();
        schema.minimum = self.min.map(Into::into);
        schema.maximum = self.max.map(Into::into);
        schema
    }

    fn validate<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, ValidationResult<i64>> {
        let result = self.parse(raw).ok_or_else(|| {
            ValidationError::new(format!("Expected an integer but received: '{raw}'"))
        });
        Box::pin(ready(result))
    }
}

/// Accepts hyphenated RFC 4122 UUIDs and returns them lower-cased.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidValidator;

/// Creates a UUID validator.
pub fn uuid() -> UuidValidator {
    UuidValidator
}

impl ParameterValidator for UuidValidator {
    type Output = String;

    fn type_name(&self) -> String {
        "UUID".to_string()
    }

    fn schema(&self) -> Schema {
        Schema::string()
            .with_format("uuid")
            .with_description("A valid RFC 4122 UUID.")
    }

    fn validate<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, ValidationResult<String>> {
        // Only the 8-4-4-4-12 form; the uuid crate also takes simple, braced and urn forms.
        let parsed = (raw.len() == 36)
            .then(|| Uuid::try_parse(raw).ok())
            .flatten();
        let result = parsed
            .map(|id| id.hyphenated().to_string())
            .ok_or_else(|| {
                ValidationError::new(format!(
                    "Expected a valid RFC 4122 UUID but received: '{raw}'"
                ))
            });
        Box::pin(ready(result))
    }
}

/// Accepts ISO 8601 dates and date-times.
///
/// Values without an offset are read as UTC; a bare date is midnight UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateValidator;

/// Creates a date validator.
pub fn date() -> DateValidator {
    DateValidator
}

fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

impl ParameterValidator for DateValidator {
    type Output = DateTime<Utc>;

    fn type_name(&self) -> String {
        "Date".to_string()
    }

    fn schema(&self) -> Schema {
        Schema::string()
            .with_format("date-time")
            .with_description("An [ISO 8601 date](https://en.wikipedia.org/wiki/ISO_8601).")
    }

    fn validate<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, ValidationResult<DateTime<Utc>>> {
        let result = parse_iso8601(raw).ok_or_else(|| {
            ValidationError::new(format!(
                "Expected a valid ISO 8601 date but received: '{raw}'"
            ))
        });
        Box::pin(ready(result))
    }
}

/// Accepts strings containing a match of a regular expression.
pub struct RegexValidator<T> {
    regex: Regex,
    mapper: Arc<dyn Fn(&str) -> T + Send + Sync>,
}

/// Creates a validator returning the matched string unchanged.
pub fn regex(regex: Regex) -> RegexValidator<String> {
    regex_with(regex, |raw: &str| raw.to_string())
}

/// Creates a validator that converts matching strings with `mapper`.
pub fn regex_with<T, F>(regex: Regex, mapper: F) -> RegexValidator<T>
where
    F: Fn(&str) -> T + Send + Sync + 'static,
{
    RegexValidator {
        regex,
        mapper: Arc::new(mapper),
    }
}

impl<T> fmt::Debug for RegexValidator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegexValidator")
            .field("regex", &self.regex.as_str())
            .finish_non_exhaustive()
    }
}

impl<T> ParameterValidator for RegexValidator<T>
where
    T: Send + 'static,
{
    type Output = T;

    fn type_name(&self) -> String {
        format!("/{}/", self.regex.as_str())
    }

    fn schema(&self) -> Schema {
        Schema::string().with_pattern(self.regex.as_str())
    }

    fn validate<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, ValidationResult<T>> {
        let result = if self.regex.is_match(raw) {
            Ok((self.mapper)(raw))
        } else {
            Err(ValidationError::new(format!(
                "Expected a string matching {} but received: '{raw}'",
                self.type_name()
            )))
        };
        Box::pin(ready(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[tokio::test]
    async fn test_string_enum_is_case_insensitive() {
        let v = string_enum(["asc", "desc"]);
        assert_eq!(v.validate("DESC").await.unwrap(), "desc");
        let err = v.validate("up").await.unwrap_err();
        assert_eq!(err.message(), "Expected 'asc' | 'desc' but received: 'up'");
    }

    #[test]
    fn test_string_enum_schema() {
        let single = serde_json::to_value(string_enum(["only"]).schema()).unwrap();
        assert_eq!(single, json!({"type": "string", "const": "only"}));

        let many = serde_json::to_value(string_enum(["a", "b"]).schema()).unwrap();
        assert_eq!(many, json!({"type": "string", "enum": ["a", "b"]}));
    }

    #[tokio::test]
    async fn test_integer() {
        let v = integer().min(0).max(100);
        assert_eq!(v.validate("42").await.unwrap(), 42);
        assert_eq!(v.validate("0").await.unwrap(), 0);
        assert_eq!(v.validate("+7").await.unwrap(), 7);

        for bad in ["", "007", "1.5", "abc", "-1", "101", " 1", "+", "99999999999999999999"] {
            let err = v.validate(bad).await.unwrap_err();
            assert_eq!(
                err.message(),
                format!("Expected an integer but received: '{bad}'")
            );
        }
    }

    #[test]
    fn test_integer_schema() {
        let schema = serde_json::to_value(integer().min(1).schema()).unwrap();
        assert_eq!(schema, json!({"type": "integer", "minimum": 1}));
    }

    #[tokio::test]
    async fn test_uuid_lowercases() {
        let v = uuid();
        assert_eq!(
            v.validate("0B8E8F6A-1C9E-4F4B-9C3A-3F5D2B7A9E10").await.unwrap(),
            "0b8e8f6a-1c9e-4f4b-9c3a-3f5d2b7a9e10"
        );
        for bad in ["not-a-uuid", "0b8e8f6a1c9e4f4b9c3a3f5d2b7a9e10"] {
            let err = v.validate(bad).await.unwrap_err();
            assert!(err.message().starts_with("Expected a valid RFC 4122 UUID"));
        }
    }

    #[tokio::test]
    async fn test_date_formats() {
        let v = date();
        let full = v.validate("2024-03-01T12:30:00+02:00").await.unwrap();
        assert_eq!(full.hour(), 10);

        let naive = v.validate("2024-03-01T12:30:00").await.unwrap();
        assert_eq!(naive.hour(), 12);

        let day = v.validate("2024-03-01").await.unwrap();
        assert_eq!((day.year(), day.month(), day.day(), day.hour()), (2024, 3, 1, 0));

        let err = v.validate("yesterday").await.unwrap_err();
        assert_eq!(
            err.message(),
            "Expected a valid ISO 8601 date but received: 'yesterday'"
        );
    }

    #[tokio::test]
    async fn test_regex_with_mapper() {
        let plain = regex(Regex::new(r"^[a-z]+$").unwrap());
        assert_eq!(plain.type_name(), "/^[a-z]+$/");
        assert_eq!(plain.validate("abc").await.unwrap(), "abc");
        assert!(plain.validate("ABC").await.is_err());

        let mapped = regex_with(Regex::new(r"^\d+px$").unwrap(), |raw| {
            raw.trim_end_matches("px").len()
        });
        assert_eq!(mapped.validate("120px").await.unwrap(), 3);
        assert_eq!(mapped.schema().pattern.as_deref(), Some(r"^\d+px$"));
    }
}
