use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, API_PATH};
use serde_json::{json, Value};
use tower::ServiceExt;

const ACCOUNTS: &[(&str, &str)] = &[("acct", "tok")];

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn api_request(body: Value) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(API_PATH)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn command(event: &str, extra: Value) -> Value {
    let mut body = json!({
        "id": "acct",
        "accessToken": "tok",
        "event": event,
        "babyName": "",
    });
    if let Some(extra) = extra.as_object() {
        body.as_object_mut().unwrap().extend(extra.clone());
    }
    body
}

// --- auth ---

#[tokio::test]
async fn bad_token_is_reported_in_a_200_body() {
    let resp = app(ACCOUNTS)
        .oneshot(api_request(json!({
            "id": "acct",
            "accessToken": "nope",
            "event": "AddWet",
            "babyName": "",
        })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Invalid id or access token");
}

// --- write ---

#[tokio::test]
async fn add_wet_returns_uid() {
    let resp = app(ACCOUNTS)
        .oneshot(api_request(command("AddWet", json!({}))))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["result"], "success");
    assert!(body["uid"].is_string());
}

#[tokio::test]
async fn malformed_json_returns_4xx() {
    let resp = app(ACCOUNTS)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(API_PATH)
                .header(http::header::CONTENT_TYPE, "application/json")
                .body("{not json".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn get_is_not_allowed() {
    let resp = app(ACCOUNTS)
        .oneshot(Request::builder().uri(API_PATH).body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- write then read ---

#[tokio::test]
async fn writes_are_visible_per_baby() {
    use tower::Service;

    let mut app = app(ACCOUNTS).into_service();

    for (event, baby) in [("AddWet", ""), ("AddNote", "Ada"), ("AddKick", "")] {
        let mut body = command(event, json!({"note": "hi"}));
        body["babyName"] = json!(baby);
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(api_request(body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(api_request(command("GetTransactionData", json!({"dateRange": ""}))))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["event"], "AddWet");
    assert_eq!(data[1]["event"], "AddKick");

    let mut read = command("GetTransactionData", json!({"dateRange": ""}));
    read["babyName"] = json!("Ada");
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(api_request(read))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["note"], "hi");
}
