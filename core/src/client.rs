//! Request builder and response parser for the Baby Stats public API.
//!
//! # Design
//! `BabyStatsClient` holds the endpoint and the account credentials and
//! nothing else. Every command goes through `build_command`, which produces
//! an `HttpRequest`, and one of the `parse_*` methods, which consume the
//! matching `HttpResponse`. The round trip in between is someone else's job
//! (see `BabyStats` for the bundled blocking one).

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::collection::TransactionCollection;
use crate::command::Command;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Event name of the read command.
pub const GET_TRANSACTIONS_EVENT: &str = "GetTransactionData";

/// Universal fields plus the command's own parameters.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody<'a> {
    id: &'a str,
    access_token: &'a str,
    event: &'a str,
    baby_name: &'a str,
    #[serde(flatten)]
    params: Map<String, Value>,
}

/// Stateless client bound to one account.
#[derive(Clone)]
pub struct BabyStatsClient {
    config: ClientConfig,
    account_id: String,
    access_token: String,
}

impl fmt::Debug for BabyStatsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BabyStatsClient")
            .field("config", &self.config)
            .field("account_id", &self.account_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl BabyStatsClient {
    /// Client for the public endpoint with default settings.
    pub fn new(account_id: &str, access_token: &str) -> Self {
        Self::with_config(ClientConfig::default(), account_id, access_token)
    }

    pub fn with_config(config: ClientConfig, account_id: &str, access_token: &str) -> Self {
        Self {
            config,
            account_id: account_id.to_string(),
            access_token: access_token.to_string(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Build the POST for `command`. `None` for `baby_name` targets the
    /// account's default baby.
    pub fn build_command(
        &self,
        command: &Command,
        baby_name: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let event = command.event_name();
        let body = RequestBody {
            id: &self.account_id,
            access_token: &self.access_token,
            event: &event,
            baby_name: baby_name.unwrap_or_default(),
            params: command.params()?,
        };
        let body = serde_json::to_string(&body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            command: event,
            url: self.config.endpoint.clone(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        })
    }

    /// Decode a write command's response. The JSON body is returned as is,
    /// including any error the service reports inside it.
    pub fn parse_command(&self, command: &str, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(command, &response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Decode a `GetTransactionData` response into a collection.
    ///
    /// A 2xx body without a `data` array is the service reporting a problem
    /// and comes back as `RemoteApplicationError`.
    pub fn parse_transactions(&self, response: HttpResponse) -> Result<TransactionCollection, ApiError> {
        let payload = self.parse_command(GET_TRANSACTIONS_EVENT, response)?;
        if !payload.get("data").is_some_and(Value::is_array) {
            return Err(ApiError::RemoteApplicationError {
                command: GET_TRANSACTIONS_EVENT.to_string(),
                body: payload,
            });
        }
        Ok(TransactionCollection::from_payload(&payload)?)
    }
}

/// Non-2xx statuses fail the command; nothing is retried.
fn check_status(command: &str, response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::RequestFailed {
        command: command.to_string(),
        reason: format!("HTTP {}: {}", response.status, response.body),
    })
}
