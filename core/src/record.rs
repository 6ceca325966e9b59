//! Decoding of a single event record into a `Transaction`.
//!
//! # Design
//! Records arrive as loosely typed JSON objects: numbers may be sent as
//! strings, enum members as bare strings, and optional keys are simply left
//! out. Everything is checked and converted here, once, so the rest of the
//! crate only ever sees typed values.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::types::{BreastSide, StatType, UnitOfMeasurement};

/// Length of the verb in front of the category in `event` (`Add` in `AddWet`).
pub const VERB_PREFIX_LEN: usize = 3;

const UTC_FORMAT: &str = "%Y-%m-%dT%H:%MZ";
const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// `0` stands for any ASCII digit; every other byte must match literally.
const UTC_TEMPLATE: &str = "0000-00-00T00:00Z";
const LOCAL_TEMPLATE: &str = "0000-00-00T00:00:00";

/// Identifier assigned to a transaction by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionId {
    Text(String),
    Number(i64),
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionId::Text(id) => f.write_str(id),
            TransactionId::Number(id) => write!(f, "{id}"),
        }
    }
}

/// One logged event, decoded from a service record.
///
/// Built once by `Transaction::from_record` and never modified afterwards;
/// all fields are private and exposed through accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: TransactionId,
    stat_type: StatType,
    event_time_utc: DateTime<Utc>,
    event_time_local: NaiveDateTime,
    note: Option<String>,
    weight: Option<i64>,
    duration: Option<Duration>,
    unit_of_measurement: Option<UnitOfMeasurement>,
    breast_side: Option<BreastSide>,
    bottle_ounces: Option<f64>,
}

impl Transaction {
    /// Decode one raw record.
    ///
    /// `uid` (or `id`), `event`, `eventDateTimeUTC` and `eventDateTimeLocal`
    /// are required. Every other field is optional and independent; a key
    /// holding `null` counts as absent.
    pub fn from_record(record: &Map<String, Value>) -> Result<Self, DecodeError> {
        Ok(Self {
            id: decode_id(record)?,
            stat_type: decode_stat_type(record)?,
            event_time_utc: decode_timestamp(record, "eventDateTimeUTC", UTC_FORMAT, UTC_TEMPLATE)?
                .and_utc(),
            event_time_local: decode_timestamp(
                record,
                "eventDateTimeLocal",
                LOCAL_FORMAT,
                LOCAL_TEMPLATE,
            )?,
            note: optional(record, "note").map(|v| text("note", v)).transpose()?,
            weight: optional(record, "weight")
                .map(|v| integer("weight", v))
                .transpose()?,
            duration: decode_duration(record)?,
            unit_of_measurement: optional(record, "uom")
                .map(|v| wire_enum("uom", v))
                .transpose()?,
            breast_side: optional(record, "breastSide")
                .map(|v| wire_enum("breastSide", v))
                .transpose()?,
            bottle_ounces: optional(record, "bOz")
                .map(|v| number("bOz", v))
                .transpose()?,
        })
    }

    /// Decode a record that may not even be a JSON object.
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let record = value
            .as_object()
            .ok_or_else(|| DecodeError::malformed("record", "expected a JSON object"))?;
        Self::from_record(record)
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn stat_type(&self) -> StatType {
        self.stat_type
    }

    pub fn event_time_utc(&self) -> DateTime<Utc> {
        self.event_time_utc
    }

    /// Event time in the account's local time zone, without zone information.
    pub fn event_time_local(&self) -> NaiveDateTime {
        self.event_time_local
    }

    /// Wall-clock event time, local or UTC.
    pub fn event_time(&self, local: bool) -> NaiveDateTime {
        if local {
            self.event_time_local
        } else {
            self.event_time_utc.naive_utc()
        }
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn weight(&self) -> Option<i64> {
        self.weight
    }

    /// Feeding or sleep length.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn unit_of_measurement(&self) -> Option<UnitOfMeasurement> {
        self.unit_of_measurement
    }

    pub fn breast_side(&self) -> Option<BreastSide> {
        self.breast_side
    }

    pub fn bottle_ounces(&self) -> Option<f64> {
        self.bottle_ounces
    }
}

impl TryFrom<&Value> for Transaction {
    type Error = DecodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Transaction::from_value(value)
    }
}

fn optional<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|value| !value.is_null())
}

fn required<'a>(record: &'a Map<String, Value>, key: &'static str) -> Result<&'a Value, DecodeError> {
    optional(record, key).ok_or(DecodeError::MissingField { field: key })
}

fn decode_id(record: &Map<String, Value>) -> Result<TransactionId, DecodeError> {
    let value = optional(record, "uid")
        .or_else(|| optional(record, "id"))
        .ok_or(DecodeError::MissingField { field: "uid" })?;
    match value {
        Value::String(id) => Ok(TransactionId::Text(id.clone())),
        Value::Number(n) => n
            .as_i64()
            .map(TransactionId::Number)
            .ok_or_else(|| DecodeError::malformed("uid", format!("`{n}` is not an integer"))),
        other => Err(DecodeError::malformed(
            "uid",
            format!("expected a string or integer, got `{other}`"),
        )),
    }
}

fn decode_stat_type(record: &Map<String, Value>) -> Result<StatType, DecodeError> {
    let event = text("event", required(record, "event")?)?;
    event
        .get(VERB_PREFIX_LEN..)
        .and_then(|category| category.parse().ok())
        .ok_or(DecodeError::UnknownStatType { event })
}

fn decode_timestamp(
    record: &Map<String, Value>,
    field: &'static str,
    format: &str,
    template: &str,
) -> Result<NaiveDateTime, DecodeError> {
    let malformed = |value: String| DecodeError::MalformedTimestamp { field, value };
    let raw = match required(record, field)? {
        Value::String(raw) => raw,
        other => return Err(malformed(other.to_string())),
    };
    // chrono tolerates unpadded and space-padded fields; the service sends neither.
    if !matches_template(raw, template) {
        return Err(malformed(raw.clone()));
    }
    NaiveDateTime::parse_from_str(raw, format).map_err(|_| malformed(raw.clone()))
}

fn matches_template(raw: &str, template: &str) -> bool {
    raw.len() == template.len()
        && raw.bytes().zip(template.bytes()).all(|(byte, expected)| match expected {
            b'0' => byte.is_ascii_digit(),
            literal => byte == literal,
        })
}

/// `feedingMinutes` and `sleepMinutes` both feed `duration`; a record carrying
/// both is rejected rather than silently preferring one.
fn decode_duration(record: &Map<String, Value>) -> Result<Option<Duration>, DecodeError> {
    let (field, value) = match (
        optional(record, "feedingMinutes"),
        optional(record, "sleepMinutes"),
    ) {
        (Some(_), Some(_)) => {
            return Err(DecodeError::malformed(
                "feedingMinutes",
                "`feedingMinutes` and `sleepMinutes` are both present",
            ))
        }
        (Some(value), None) => ("feedingMinutes", value),
        (None, Some(value)) => ("sleepMinutes", value),
        (None, None) => return Ok(None),
    };
    let minutes = number(field, value)?;
    Duration::try_from_secs_f64(minutes * 60.0)
        .map(Some)
        .map_err(|e| DecodeError::malformed(field, format!("{minutes} minutes: {e}")))
}

fn text(field: &'static str, value: &Value) -> Result<String, DecodeError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DecodeError::malformed(field, format!("expected a string, got `{value}`")))
}

fn integer(field: &'static str, value: &Value) -> Result<i64, DecodeError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| DecodeError::malformed(field, format!("`{value}` is not an integer")))
}

fn number(field: &'static str, value: &Value) -> Result<f64, DecodeError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| DecodeError::malformed(field, format!("`{value}` is not a number")))
}

fn wire_enum<T: std::str::FromStr>(field: &'static str, value: &Value) -> Result<T, DecodeError> {
    let raw = text(field, value)?;
    raw.parse()
        .map_err(|_| DecodeError::malformed(field, format!("unknown value `{raw}`")))
}
