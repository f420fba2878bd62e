//! Timestamp (de)serialization tolerant of Postgres `TIMESTAMP` columns.
//!
//! PostgREST renders `timestamptz` as RFC 3339 but `timestamp` without an
//! offset. Offset-less values are read as UTC. Output is always RFC 3339.

use serde::{Deserialize, Deserializer, Serializer, de::Error as _, ser::Error as _};
use time::{
    OffsetDateTime, PrimitiveDateTime,
    format_description::{FormatItem, well_known::Rfc3339},
    macros::format_description,
};

const NAIVE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const NAIVE_FRACTION_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");

/// Parse an RFC 3339 timestamp, falling back to an offset-less UTC reading.
pub fn parse(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(parsed);
    }

    let normalized = value.trim().replacen(' ', "T", 1);
    let primitive = PrimitiveDateTime::parse(&normalized, NAIVE_FRACTION_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(&normalized, NAIVE_FORMAT))?;
    Ok(primitive.assume_utc())
}

/// Render a timestamp as RFC 3339.
pub fn format(value: OffsetDateTime) -> Result<String, time::error::Format> {
    value.format(&Rfc3339)
}

pub fn serialize<S: Serializer>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    let rendered = format(*value).map_err(S::Error::custom)?;
    serializer.serialize_str(&rendered)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(D::Error::custom)
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<OffsetDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<OffsetDateTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|value| parse(&value).map_err(D::Error::custom))
            .transpose()
    }
}
