//! In-memory account state behind the mock endpoint.
//!
//! Every request is answered with a JSON body and a 200 status, as the real
//! service does; problems are reported in an `error` field.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

const UTC_FORMAT: &str = "%Y-%m-%dT%H:%MZ";
const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const CATEGORIES: [&str; 8] = [
    "Wet", "Feeding", "Stool", "Weight", "Note", "Sleep", "Pumping", "Kick",
];

#[derive(Debug, Default)]
struct Baby {
    events: Vec<Map<String, Value>>,
    sleep_started: Option<DateTime<Utc>>,
    feeding_started: Option<(DateTime<Utc>, String)>,
}

#[derive(Debug)]
struct Account {
    access_token: String,
    babies: HashMap<String, Baby>,
}

/// Accounts keyed by id.
#[derive(Debug, Default)]
pub struct Store {
    accounts: HashMap<String, Account>,
}

type Outcome = Result<Value, String>;

/// Fields every request carries. Missing ones read as blank.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Envelope {
    id: String,
    access_token: String,
    event: String,
    baby_name: String,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_account(&mut self, id: &str, access_token: &str) {
        self.accounts.insert(
            id.to_string(),
            Account {
                access_token: access_token.to_string(),
                babies: HashMap::new(),
            },
        );
    }

    /// Handle one request body as of `now`.
    pub fn apply(&mut self, request: &Map<String, Value>, now: DateTime<Utc>) -> Value {
        match self.dispatch(request, now) {
            Ok(value) => value,
            Err(message) => json!({ "error": message }),
        }
    }

    fn dispatch(&mut self, request: &Map<String, Value>, now: DateTime<Utc>) -> Outcome {
        let envelope: Envelope = serde_json::from_value(Value::Object(request.clone()))
            .map_err(|e| format!("Malformed request: {e}"))?;
        let account = self
            .accounts
            .get_mut(&envelope.id)
            .filter(|account| account.access_token == envelope.access_token)
            .ok_or_else(|| "Invalid id or access token".to_string())?;

        let event = envelope.event.as_str();
        let baby = account.babies.entry(envelope.baby_name).or_default();

        match event {
            "AddWet" | "AddKick" | "AddStool" => Ok(baby.record(event, Map::new(), now)),
            "AddNote" => {
                let note = request
                    .get("note")
                    .and_then(Value::as_str)
                    .ok_or_else(|| "AddNote requires a note".to_string())?;
                Ok(baby.record(event, fields([("note", json!(note))]), now))
            }
            "AddFeeding" => {
                let mut extra = fluid_fields(request)?;
                extra.insert("breastSide".into(), json!(side_param(request)?));
                if let Some(minutes) = number_param(request, "feedingMinutes")? {
                    extra.insert("feedingMinutes".into(), json!(minutes));
                }
                Ok(baby.record(event, extra, now))
            }
            "AddPumping" => Ok(baby.record(event, fluid_fields(request)?, now)),
            "AddWeight" => {
                let pounds = number_param(request, "pounds")?.unwrap_or(0.0);
                let ounces = number_param(request, "ounces")?.unwrap_or(0.0);
                let weight = (pounds * 16.0 + ounces).round() as i64;
                Ok(baby.record(event, fields([("weight", json!(weight))]), now))
            }
            "AddSleep" => {
                let hours = number_param(request, "hours")?.unwrap_or(0.0);
                let minutes = number_param(request, "minutes")?.unwrap_or(0.0);
                let total = (hours * 60.0 + minutes).round() as i64;
                Ok(baby.record(event, fields([("sleepMinutes", json!(total))]), now))
            }
            "StartSleep" => {
                if baby.sleep_started.is_some() {
                    return Err("Sleep already started".to_string());
                }
                baby.sleep_started = Some(now);
                Ok(json!({ "result": "success" }))
            }
            "EndSleep" => {
                let started = baby
                    .sleep_started
                    .take()
                    .ok_or_else(|| "No sleep in progress".to_string())?;
                let minutes = (now - started).num_minutes();
                Ok(baby.record("AddSleep", fields([("sleepMinutes", json!(minutes))]), started))
            }
            "StartFeeding" => {
                if baby.feeding_started.is_some() {
                    return Err("Feeding already started".to_string());
                }
                baby.feeding_started = Some((now, side_param(request)?.to_string()));
                Ok(json!({ "result": "success" }))
            }
            "EndFeeding" => {
                let side = side_param(request)?;
                let (started, start_side) = baby
                    .feeding_started
                    .take()
                    .ok_or_else(|| "No feeding in progress".to_string())?;
                let side = if start_side.is_empty() { side.to_string() } else { start_side };
                let minutes = (now - started).num_minutes();
                let extra = fields([
                    ("feedingMinutes", json!(minutes)),
                    ("breastSide", json!(side)),
                ]);
                Ok(baby.record("AddFeeding", extra, started))
            }
            "GetTransactionData" => {
                let range = parse_range(str_param(request, "dateRange"))?;
                let data: Vec<Value> = baby
                    .events
                    .iter()
                    .filter(|record| in_range(record, range))
                    .cloned()
                    .map(Value::Object)
                    .collect();
                Ok(json!({ "data": data }))
            }
            other => match other.strip_prefix("Remove") {
                Some(category) if CATEGORIES.contains(&category) => baby.remove_last(category),
                _ => Err(format!("Unknown event {other}")),
            },
        }
    }
}

impl Baby {
    fn record(&mut self, event: &str, extra: Map<String, Value>, at: DateTime<Utc>) -> Value {
        let uid = Uuid::new_v4().to_string();
        let mut record = fields([
            ("uid", json!(uid)),
            ("event", json!(event)),
            ("eventDateTimeUTC", json!(at.format(UTC_FORMAT).to_string())),
            ("eventDateTimeLocal", json!(at.format(LOCAL_FORMAT).to_string())),
        ]);
        record.extend(extra);
        self.events.push(record);
        json!({ "result": "success", "uid": uid })
    }

    fn remove_last(&mut self, category: &str) -> Outcome {
        let event = format!("Add{category}");
        let position = self
            .events
            .iter()
            .rposition(|record| record.get("event").and_then(Value::as_str) == Some(event.as_str()))
            .ok_or_else(|| format!("No {category} to remove"))?;
        let removed = self.events.remove(position);
        Ok(json!({ "result": "success", "uid": removed.get("uid") }))
    }
}

fn fields<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn str_param<'a>(request: &'a Map<String, Value>, key: &str) -> &'a str {
    request.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Blank or missing means "not recorded".
fn number_param(request: &Map<String, Value>, key: &str) -> Result<Option<f64>, String> {
    match request.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format!("Invalid {key}")),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(_) => Err(format!("Invalid {key}")),
    }
}

fn side_param(request: &Map<String, Value>) -> Result<&str, String> {
    match str_param(request, "breastSide") {
        side @ ("" | "left" | "right" | "both") => Ok(side),
        other => Err(format!("Invalid breastSide {other}")),
    }
}

fn fluid_fields(request: &Map<String, Value>) -> Result<Map<String, Value>, String> {
    let uom = match str_param(request, "uom") {
        uom @ ("" | "oz" | "ml") => uom,
        other => return Err(format!("Invalid uom {other}")),
    };
    let mut extra = fields([("uom", json!(uom))]);
    if let Some(amount) = number_param(request, "bottleOunces")? {
        extra.insert("bOz".into(), json!(amount));
    }
    Ok(extra)
}

fn parse_range(raw: &str) -> Result<Option<(NaiveDate, NaiveDate)>, String> {
    let day = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("Invalid dateRange {raw}"))
    };
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.split_once('/') {
        Some((start, end)) => Ok(Some((day(start)?, day(end)?))),
        None => {
            let only = day(raw)?;
            Ok(Some((only, only)))
        }
    }
}

fn in_range(record: &Map<String, Value>, range: Option<(NaiveDate, NaiveDate)>) -> bool {
    let Some((start, end)) = range else {
        return true;
    };
    record
        .get("eventDateTimeLocal")
        .and_then(Value::as_str)
        .and_then(|s| s.get(..10))
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .is_some_and(|date| start <= date && date <= end)
}
