//! Error types for record decoding, collection construction and the client.
//!
//! # Design
//! Errors are layered the same way the crate is. `DecodeError` describes why a
//! single event record was rejected, `CollectionError` adds the position of
//! that record inside a batch, and `ApiError` is what every client operation
//! returns. Nothing here is retried or logged; the caller decides.

use thiserror::Error;

/// Why a single raw event record could not become a `Transaction`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// A key every record must carry is absent.
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    /// The category part of `event` is not one of the known stat types.
    #[error("unknown stat type in event `{event}`")]
    UnknownStatType { event: String },

    /// A timestamp does not match its fixed pattern.
    #[error("malformed timestamp in `{field}`: `{value}`")]
    MalformedTimestamp { field: &'static str, value: String },

    /// A field is present but cannot be coerced to its expected type.
    #[error("malformed field `{field}`: {reason}")]
    MalformedField { field: &'static str, reason: String },
}

impl DecodeError {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedField {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure to build a `TransactionCollection` from a batch payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollectionError {
    /// The payload has no `data` array.
    #[error("payload has no `data` array")]
    MissingData,

    /// The record at `index` failed to decode; no partial collection is kept.
    #[error("record {index} could not be decoded")]
    Record {
        index: usize,
        #[source]
        source: DecodeError,
    },
}

/// Errors returned by `BabyStatsClient` and `BabyStats` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP exchange for `command` did not complete with a 2xx status.
    #[error("request `{command}` failed: {reason}")]
    RequestFailed { command: String, reason: String },

    /// The service answered 2xx but the body is not the expected payload.
    #[error("remote service rejected `{command}`: {body}")]
    RemoteApplicationError {
        command: String,
        body: serde_json::Value,
    },

    /// The requested date range cannot be encoded.
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    /// A command parameter has a value the wire format cannot carry.
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    /// The transaction payload was well formed but a record was not.
    #[error(transparent)]
    Collection(#[from] CollectionError),

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body is not valid JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn record_error_chains_to_decode_error() {
        let err = CollectionError::Record {
            index: 3,
            source: DecodeError::UnknownStatType {
                event: "AddBath".to_string(),
            },
        };
        assert_eq!(err.to_string(), "record 3 could not be decoded");
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "unknown stat type in event `AddBath`");
    }

    #[test]
    fn collection_error_is_transparent_in_api_error() {
        let err: ApiError = CollectionError::MissingData.into();
        assert_eq!(err.to_string(), "payload has no `data` array");
    }

    #[test]
    fn request_failed_names_the_command() {
        let err = ApiError::RequestFailed {
            command: "AddWet".to_string(),
            reason: "HTTP 503".to_string(),
        };
        assert_eq!(err.to_string(), "request `AddWet` failed: HTTP 503");
    }
}
