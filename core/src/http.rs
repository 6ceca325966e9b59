//! HTTP exchanges described as plain data.
//!
//! # Design
//! The client builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. Whoever executes the exchange (the bundled
//! `UreqTransport` or the caller's own HTTP stack) only moves bytes. The
//! public endpoint accepts a single method, so requests are always a JSON
//! POST and carry no method field.

/// A JSON POST to the service endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Event name of the command, kept for error reporting and logging.
    pub command: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// A response as received from the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    #[test]
    fn only_2xx_is_success() {
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(301).is_success());
        assert!(!response(429).is_success());
        assert!(!response(500).is_success());
    }
}
