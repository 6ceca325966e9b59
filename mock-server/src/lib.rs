//! In-memory stand-in for the Baby Stats public endpoint.

pub mod store;

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::Mutex};
use tracing::debug;

pub use store::Store;

/// Path the real service serves its public API on.
pub const API_PATH: &str = "/api/public";

pub type Db = Arc<Mutex<Store>>;

/// Router serving `API_PATH` for the given accounts (`(id, access token)`).
pub fn app(accounts: &[(&str, &str)]) -> Router {
    let mut store = Store::new();
    for (id, token) in accounts {
        store.add_account(id, token);
    }
    let db: Db = Arc::new(Mutex::new(store));
    Router::new().route(API_PATH, post(public_api)).with_state(db)
}

pub async fn run(listener: TcpListener, accounts: &[(&str, &str)]) -> Result<(), std::io::Error> {
    axum::serve(listener, app(accounts)).await
}

async fn public_api(State(db): State<Db>, Json(request): Json<Map<String, Value>>) -> Json<Value> {
    let event = request.get("event").cloned().unwrap_or_default();
    let response = db.lock().await.apply(&request, Utc::now());
    debug!(%event, failed = response.get("error").is_some(), "handled request");
    Json(response)
}
