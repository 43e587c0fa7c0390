//! Field helpers for the loosely typed parts of the backend payloads.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Text {
    Number(i64),
    Text(String),
}

/// Accepts a JSON string or number, e.g. DNI or license numbers.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Text::deserialize(deserializer)? {
        Text::Number(value) => value.to_string(),
        Text::Text(value) => value,
    })
}

/// Like [`text`] but maps `null` and blank strings to `None`.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Text>::deserialize(deserializer)?
        .map(|value| match value {
            Text::Number(value) => value.to_string(),
            Text::Text(value) => value,
        })
        .filter(|value| !value.trim().is_empty()))
}

pub fn default_true() -> bool {
    true
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|ts| ts.and_utc())
        })
        .or_else(|| {
            parse_date(value)
                .and_then(|day| day.and_hms_opt(0, 0, 0))
                .map(|ts| ts.and_utc())
        })
}

/// Date that may arrive as `YYYY-MM-DD` or as a full timestamp.
pub fn date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_date(&value).ok_or_else(|| D::Error::custom(format!("invalid date: {value}")))
}

pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => parse_date(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date: {value}"))),
        _ => Ok(None),
    }
}

/// Timestamp with or without offset; naive values are taken as UTC.
pub fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_timestamp(&value).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {value}")))
}

pub fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => parse_timestamp(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {value}"))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "super::text")]
        dni: String,
        #[serde(default, deserialize_with = "super::optional_text")]
        phone: Option<String>,
    }

    #[derive(Deserialize)]
    struct Dated {
        #[serde(deserialize_with = "super::date")]
        day: chrono::NaiveDate,
        #[serde(default, deserialize_with = "super::optional_timestamp")]
        at: Option<chrono::DateTime<chrono::Utc>>,
    }

    #[test]
    fn dates_and_timestamps_in_several_shapes() {
        let row: Dated =
            serde_json::from_str(r#"{"day": "2024-05-10T13:00:00Z", "at": "2024-05-10T13:00:00.123"}"#)
                .unwrap();
        assert_eq!(row.day.to_string(), "2024-05-10");
        assert_eq!(
            row.at.unwrap().to_rfc3339(),
            "2024-05-10T13:00:00.123+00:00"
        );

        let row: Dated = serde_json::from_str(
            r#"{"day": "2024-05-10", "at": "2024-05-10T10:00:00-03:00"}"#,
        )
        .unwrap();
        assert_eq!(row.at.unwrap().to_rfc3339(), "2024-05-10T13:00:00+00:00");

        let row: Dated = serde_json::from_str(r#"{"day": "2024-05-10", "at": null}"#).unwrap();
        assert!(row.at.is_none());

        assert!(serde_json::from_str::<Dated>(r#"{"day": "10/05/2024"}"#).is_err());
    }

    #[test]
    fn numbers_and_blanks() {
        let row: Row = serde_json::from_str(r#"{"dni": 30123456, "phone": ""}"#).unwrap();
        assert_eq!(row.dni, "30123456");
        assert_eq!(row.phone, None);

        let row: Row = serde_json::from_str(r#"{"dni": "30123456"}"#).unwrap();
        assert_eq!(row.phone, None);
    }
}
