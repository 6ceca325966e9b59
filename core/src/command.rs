//! Typed commands understood by the public endpoint.
//!
//! # Design
//! Each `Command` value knows its event name and its command-specific
//! parameters. A fresh parameter map is produced for every call, so no state
//! leaks between requests. Optional numeric parameters the caller leaves out
//! are sent as empty strings, which the service reads as "not recorded".

use chrono::NaiveDate;
use serde_json::{json, Map, Number, Value};

use crate::error::ApiError;
use crate::types::{BreastSide, StatType, UnitOfMeasurement};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days to fetch with `GetTransactionData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    /// Let the service pick its default range.
    #[default]
    Unbounded,
    /// A single day.
    Day(NaiveDate),
    /// From the first day through the second, inclusive.
    Span(NaiveDate, NaiveDate),
}

impl DateRange {
    /// Build a range from optional bounds.
    ///
    /// An end date needs a start date, and must not precede it.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, ApiError> {
        match (start, end) {
            (None, None) => Ok(DateRange::Unbounded),
            (Some(day), None) => Ok(DateRange::Day(day)),
            (Some(start), Some(end)) if end < start => Err(ApiError::InvalidDateRange(format!(
                "end date {end} is before start date {start}"
            ))),
            (Some(start), Some(end)) => Ok(DateRange::Span(start, end)),
            (None, Some(end)) => Err(ApiError::InvalidDateRange(format!(
                "end date {end} given without a start date"
            ))),
        }
    }

    /// Wire form: `""`, `YYYY-MM-DD` or `YYYY-MM-DD/YYYY-MM-DD`.
    pub fn encode(&self) -> String {
        match self {
            DateRange::Unbounded => String::new(),
            DateRange::Day(day) => day.format(DATE_FORMAT).to_string(),
            DateRange::Span(start, end) => {
                format!("{}/{}", start.format(DATE_FORMAT), end.format(DATE_FORMAT))
            }
        }
    }
}

/// Bottle and breast details for `AddFeeding`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feeding {
    pub bottle_amount: Option<f64>,
    pub minutes: Option<u32>,
    pub breast_side: BreastSide,
    pub unit: UnitOfMeasurement,
}

/// One remote command with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddWet,
    AddKick,
    AddStool,
    AddNote { note: String },
    AddFeeding(Feeding),
    AddPumping {
        bottle_amount: Option<f64>,
        unit: UnitOfMeasurement,
    },
    AddWeight {
        pounds: Option<u32>,
        ounces: Option<f64>,
    },
    AddSleep {
        hours: Option<u32>,
        minutes: Option<u32>,
    },
    StartSleep,
    StopSleep,
    StartFeeding { breast_side: BreastSide },
    StopFeeding { breast_side: BreastSide },
    RemoveLast { stat_type: StatType },
    GetTransactionData { range: DateRange },
}

impl Command {
    /// Event name sent in the `event` field.
    pub fn event_name(&self) -> String {
        match self {
            Command::AddWet => "AddWet".to_string(),
            Command::AddKick => "AddKick".to_string(),
            Command::AddStool => "AddStool".to_string(),
            Command::AddNote { .. } => "AddNote".to_string(),
            Command::AddFeeding(_) => "AddFeeding".to_string(),
            Command::AddPumping { .. } => "AddPumping".to_string(),
            Command::AddWeight { .. } => "AddWeight".to_string(),
            Command::AddSleep { .. } => "AddSleep".to_string(),
            Command::StartSleep => "StartSleep".to_string(),
            Command::StopSleep => "EndSleep".to_string(),
            Command::StartFeeding { .. } => "StartFeeding".to_string(),
            Command::StopFeeding { .. } => "EndFeeding".to_string(),
            Command::RemoveLast { stat_type } => format!("Remove{stat_type}"),
            Command::GetTransactionData { .. } => "GetTransactionData".to_string(),
        }
    }

    /// Command-specific request fields.
    ///
    /// Fails when a numeric amount cannot be represented in JSON.
    pub fn params(&self) -> Result<Map<String, Value>, ApiError> {
        let params = match self {
            Command::AddWet
            | Command::AddKick
            | Command::AddStool
            | Command::StartSleep
            | Command::StopSleep
            | Command::RemoveLast { .. } => json!({}),
            Command::AddNote { note } => json!({ "note": note }),
            Command::AddFeeding(feeding) => json!({
                "bottleOunces": amount_or_blank("bottleOunces", feeding.bottle_amount)?,
                "breastSide": feeding.breast_side,
                "feedingMinutes": count_or_blank(feeding.minutes),
                "uom": feeding.unit,
            }),
            Command::AddPumping {
                bottle_amount,
                unit,
            } => json!({
                "bottleOunces": amount_or_blank("bottleOunces", *bottle_amount)?,
                "uom": unit,
            }),
            Command::AddWeight { pounds, ounces } => json!({
                "pounds": count_or_blank(*pounds),
                "ounces": amount_or_blank("ounces", *ounces)?,
            }),
            Command::AddSleep { hours, minutes } => json!({
                "hours": count_or_blank(*hours),
                "minutes": count_or_blank(*minutes),
            }),
            Command::StartFeeding { breast_side } | Command::StopFeeding { breast_side } => {
                json!({ "breastSide": breast_side })
            }
            Command::GetTransactionData { range } => json!({ "dateRange": range.encode() }),
        };
        match params {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

fn blank() -> Value {
    Value::String(String::new())
}

fn count_or_blank(value: Option<u32>) -> Value {
    value.map_or_else(blank, Value::from)
}

// JSON has no NaN or infinity.
fn amount_or_blank(field: &'static str, value: Option<f64>) -> Result<Value, ApiError> {
    match value {
        None => Ok(blank()),
        Some(amount) => Number::from_f64(amount)
            .map(Value::Number)
            .ok_or_else(|| ApiError::InvalidParameter {
                field,
                reason: format!("{amount} is not a finite number"),
            }),
    }
}
