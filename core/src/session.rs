//! Blocking client: one method per remote command.
//!
//! # Design
//! `BabyStats` pairs a `BabyStatsClient` with a `Transport`. Every method
//! builds a fresh request, performs exactly one exchange and parses the
//! result. There is no shared mutable state, no retry and no caching, so a
//! session is safe to share between threads whenever its transport is.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::BabyStatsClient;
use crate::collection::TransactionCollection;
use crate::command::{Command, DateRange, Feeding};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::transport::{Transport, UreqTransport};
use crate::types::{BreastSide, StatType, UnitOfMeasurement};

/// Account session performing real round trips.
#[derive(Debug, Clone)]
pub struct BabyStats<T = UreqTransport> {
    client: BabyStatsClient,
    transport: T,
}

impl BabyStats<UreqTransport> {
    /// Session against the public endpoint.
    pub fn new(account_id: &str, access_token: &str) -> Self {
        Self::with_config(ClientConfig::default(), account_id, access_token)
    }

    pub fn with_config(config: ClientConfig, account_id: &str, access_token: &str) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(BabyStatsClient::with_config(config, account_id, access_token), transport)
    }
}

impl<T: Transport> BabyStats<T> {
    pub fn with_transport(client: BabyStatsClient, transport: T) -> Self {
        Self { client, transport }
    }

    /// Send any write command and return the service's JSON answer.
    pub fn send(&self, command: &Command, baby_name: Option<&str>) -> Result<Value, ApiError> {
        let (event, response) = self.exchange(command, baby_name)?;
        self.client.parse_command(&event, response)
    }

    fn exchange(
        &self,
        command: &Command,
        baby_name: Option<&str>,
    ) -> Result<(String, HttpResponse), ApiError> {
        let request = self.client.build_command(command, baby_name)?;
        let event = request.command.clone();
        debug!(command = %event, account = %self.client.account_id(), "sending command");

        let response = self
            .transport
            .execute(&request)
            .map_err(|e| ApiError::RequestFailed {
                command: event.clone(),
                reason: e.to_string(),
            })?;

        if response.is_success() {
            debug!(command = %event, status = response.status, "command completed");
        } else {
            warn!(command = %event, status = response.status, "command rejected by endpoint");
        }
        Ok((event, response))
    }

    pub fn add_wet(&self, baby_name: Option<&str>) -> Result<Value, ApiError> {
        self.send(&Command::AddWet, baby_name)
    }

    pub fn add_kick(&self, baby_name: Option<&str>) -> Result<Value, ApiError> {
        self.send(&Command::AddKick, baby_name)
    }

    pub fn add_stool(&self, baby_name: Option<&str>) -> Result<Value, ApiError> {
        self.send(&Command::AddStool, baby_name)
    }

    pub fn add_note(&self, note: &str, baby_name: Option<&str>) -> Result<Value, ApiError> {
        self.send(
            &Command::AddNote {
                note: note.to_string(),
            },
            baby_name,
        )
    }

    pub fn add_feeding(&self, feeding: Feeding, baby_name: Option<&str>) -> Result<Value, ApiError> {
        self.send(&Command::AddFeeding(feeding), baby_name)
    }

    pub fn add_pumping(
        &self,
        bottle_amount: Option<f64>,
        unit: UnitOfMeasurement,
        baby_name: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.send(&Command::AddPumping { bottle_amount, unit }, baby_name)
    }

    pub fn add_weight(
        &self,
        pounds: Option<u32>,
        ounces: Option<f64>,
        baby_name: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.send(&Command::AddWeight { pounds, ounces }, baby_name)
    }

    pub fn add_sleep(
        &self,
        hours: Option<u32>,
        minutes: Option<u32>,
        baby_name: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.send(&Command::AddSleep { hours, minutes }, baby_name)
    }

    pub fn start_sleep(&self, baby_name: Option<&str>) -> Result<Value, ApiError> {
        self.send(&Command::StartSleep, baby_name)
    }

    pub fn stop_sleep(&self, baby_name: Option<&str>) -> Result<Value, ApiError> {
        self.send(&Command::StopSleep, baby_name)
    }

    /// A side given here is kept when the feeding is stopped.
    pub fn start_feeding(&self, breast_side: BreastSide, baby_name: Option<&str>) -> Result<Value, ApiError> {
        self.send(&Command::StartFeeding { breast_side }, baby_name)
    }

    /// Sets the side if none was given when the feeding started.
    pub fn stop_feeding(&self, breast_side: BreastSide, baby_name: Option<&str>) -> Result<Value, ApiError> {
        self.send(&Command::StopFeeding { breast_side }, baby_name)
    }

    pub fn remove_last(&self, stat_type: StatType, baby_name: Option<&str>) -> Result<Value, ApiError> {
        self.send(&Command::RemoveLast { stat_type }, baby_name)
    }

    /// Fetch and decode events.
    ///
    /// No dates lets the service choose; a start date alone fetches that day.
    /// Large unbounded ranges can be slow and return a lot of data.
    pub fn get_transactions(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        baby_name: Option<&str>,
    ) -> Result<TransactionCollection, ApiError> {
        let range = DateRange::from_bounds(start, end)?;
        let (_, response) = self.exchange(&Command::GetTransactionData { range }, baby_name)?;
        self.client.parse_transactions(response)
    }
}
