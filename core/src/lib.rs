//! Client library for the Baby Stats public API.
//!
//! # Overview
//! Sends write commands (log a feeding, a wet diaper, a sleep, ...) and the
//! read command to the single public endpoint, and decodes the returned event
//! records into typed `Transaction` values held in a `TransactionCollection`.
//!
//! # Design
//! - `record` is the decode boundary: loose JSON in, typed `Transaction` out.
//!   No raw category or unit strings travel past it.
//! - `TransactionCollection` is built wholesale and is read-only.
//! - `BabyStatsClient` only builds `HttpRequest` values and parses
//!   `HttpResponse` values; `BabyStats` adds a blocking `Transport` on top.
//! - The service caps callers at `RATE_LIMIT_REQUESTS` per
//!   `RATE_LIMIT_WINDOW`. The client does not throttle.

pub mod client;
pub mod collection;
pub mod command;
pub mod config;
pub mod error;
pub mod http;
pub mod record;
pub mod session;
pub mod transport;
pub mod types;

pub use client::BabyStatsClient;
pub use collection::TransactionCollection;
pub use command::{Command, DateRange, Feeding};
pub use config::{ClientConfig, RATE_LIMIT_REQUESTS, RATE_LIMIT_WINDOW};
pub use error::{ApiError, CollectionError, DecodeError};
pub use http::{HttpRequest, HttpResponse};
pub use record::{Transaction, TransactionId};
pub use session::BabyStats;
pub use transport::{Transport, TransportError, UreqTransport};
pub use types::{BreastSide, StatType, UnitOfMeasurement};
