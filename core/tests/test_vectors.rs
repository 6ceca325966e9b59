//! Verify request building and payload decoding against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Request bodies are compared as parsed JSON (not raw strings) to avoid
//! false negatives from field ordering.

use babystats_core::{
    ApiError, BabyStatsClient, BreastSide, ClientConfig, CollectionError, Command, DateRange,
    DecodeError, Feeding, HttpResponse, StatType, TransactionCollection, UnitOfMeasurement,
};
use chrono::NaiveDate;
use serde_json::Value;

const ENDPOINT: &str = "http://localhost:3000/api/public";

fn stat_type(s: &str) -> StatType {
    s.parse().unwrap_or_else(|_| panic!("unknown stat type: {s}"))
}

fn breast_side(input: &Value) -> BreastSide {
    let raw = input["breast_side"].as_str().unwrap_or_default();
    raw.parse().unwrap_or_else(|_| panic!("unknown breast side: {raw}"))
}

fn unit(input: &Value) -> UnitOfMeasurement {
    let raw = input["unit"].as_str().unwrap_or_default();
    raw.parse().unwrap_or_else(|_| panic!("unknown unit: {raw}"))
}

fn date(input: &Value, key: &str) -> Option<NaiveDate> {
    input[key].as_str().map(|s| s.parse().unwrap())
}

fn small(input: &Value, key: &str) -> Option<u32> {
    input[key].as_u64().map(|n| n as u32)
}

/// Turn a vector's `command` + `input` into a `Command`.
fn command(case: &Value) -> Command {
    let input = &case["input"];
    match case["command"].as_str().unwrap() {
        "AddWet" => Command::AddWet,
        "AddKick" => Command::AddKick,
        "AddStool" => Command::AddStool,
        "AddNote" => Command::AddNote {
            note: input["note"].as_str().unwrap().to_string(),
        },
        "AddFeeding" => Command::AddFeeding(Feeding {
            bottle_amount: input["bottle_amount"].as_f64(),
            minutes: small(input, "minutes"),
            breast_side: breast_side(input),
            unit: unit(input),
        }),
        "AddPumping" => Command::AddPumping {
            bottle_amount: input["bottle_amount"].as_f64(),
            unit: unit(input),
        },
        "AddWeight" => Command::AddWeight {
            pounds: small(input, "pounds"),
            ounces: input["ounces"].as_f64(),
        },
        "AddSleep" => Command::AddSleep {
            hours: small(input, "hours"),
            minutes: small(input, "minutes"),
        },
        "StartSleep" => Command::StartSleep,
        "StopSleep" => Command::StopSleep,
        "StartFeeding" => Command::StartFeeding {
            breast_side: breast_side(input),
        },
        "StopFeeding" => Command::StopFeeding {
            breast_side: breast_side(input),
        },
        "RemoveLast" => Command::RemoveLast {
            stat_type: stat_type(input["stat_type"].as_str().unwrap()),
        },
        "GetTransactionData" => Command::GetTransactionData {
            range: DateRange::from_bounds(date(input, "start"), date(input, "end")).unwrap(),
        },
        other => panic!("unknown command: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[test]
fn command_test_vectors() {
    let raw = include_str!("../../test-vectors/commands.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let account = &vectors["account"];
    let client = BabyStatsClient::with_config(
        ClientConfig::new(ENDPOINT),
        account["id"].as_str().unwrap(),
        account["accessToken"].as_str().unwrap(),
    );

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let cmd = command(case);
        let req = client
            .build_command(&cmd, case["baby_name"].as_str())
            .unwrap();

        assert_eq!(req.url, ENDPOINT, "{name}: url");
        assert_eq!(req.command, case["expected_body"]["event"], "{name}: command");
        let body: Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(body, case["expected_body"], "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

fn error_kind(err: &DecodeError) -> &'static str {
    match err {
        DecodeError::MissingField { .. } => "MissingField",
        DecodeError::UnknownStatType { .. } => "UnknownStatType",
        DecodeError::MalformedTimestamp { .. } => "MalformedTimestamp",
        DecodeError::MalformedField { .. } => "MalformedField",
    }
}

#[test]
fn transaction_test_vectors() {
    let raw = include_str!("../../test-vectors/transactions.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let client = BabyStatsClient::with_config(ClientConfig::new(ENDPOINT), "acct", "tok");
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        // Decode directly and through a simulated response; both must agree.
        let direct = TransactionCollection::from_payload(&case["payload"]);
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: case["payload"].to_string(),
        };
        let parsed = client.parse_transactions(response);

        if let Some(expected_error) = case.get("expected_error") {
            let expected_index = expected_error["index"].as_u64().unwrap() as usize;
            let expected_kind = expected_error["kind"].as_str().unwrap();

            match direct.unwrap_err() {
                CollectionError::Record { index, source } => {
                    assert_eq!(index, expected_index, "{name}: index");
                    assert_eq!(error_kind(&source), expected_kind, "{name}: kind");
                }
                other => panic!("{name}: unexpected error {other:?}"),
            }
            assert!(
                matches!(
                    parsed.unwrap_err(),
                    ApiError::Collection(CollectionError::Record { index, .. }) if index == expected_index
                ),
                "{name}: parse_transactions error"
            );
            continue;
        }

        let collection = direct.unwrap();
        assert_eq!(parsed.unwrap(), collection, "{name}: parsed result");

        let expected = &case["expected"];
        assert_eq!(
            collection.count() as u64,
            expected["count"].as_u64().unwrap(),
            "{name}: count"
        );
        for (stat, count) in expected["by_type"].as_object().unwrap() {
            assert_eq!(
                collection.count_by_type(stat_type(stat)) as u64,
                count.as_u64().unwrap(),
                "{name}: count of {stat}"
            );
        }
        let feeding_ids: Vec<String> = collection
            .filter_by_type(StatType::Feeding)
            .map(|tx| tx.id().to_string())
            .collect();
        let expected_ids: Vec<String> = expected["feeding_ids"]
            .as_array()
            .unwrap()
            .iter()
            .map(|id| id.as_str().unwrap().to_string())
            .collect();
        assert_eq!(feeding_ids, expected_ids, "{name}: feeding order");
    }
}
