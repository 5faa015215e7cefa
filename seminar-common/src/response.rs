//! Response envelope shared by every portal endpoint
//!
//! Every JSON response carries `{code, data, error}`; list endpoints wrap
//! their page in `{count, next, previous, results}` inside `data`.

use serde::{Deserialize, Serialize};

/// Uniform response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Application-level status code (mirrors the HTTP status)
    pub code: u16,
    /// Payload, absent on errors
    pub data: Option<T>,
    /// Human-readable error message, empty on success
    pub error: String,
}

impl<T> Envelope<T> {
    /// Successful envelope wrapping `data`
    pub fn ok(data: T) -> Self {
        Self {
            code: 200,
            data: Some(data),
            error: String::new(),
        }
    }

    /// Successful envelope with an explicit code (e.g. 201 on create)
    pub fn with_code(code: u16, data: T) -> Self {
        Self {
            code,
            data: Some(data),
            error: String::new(),
        }
    }
}

impl Envelope<serde_json::Value> {
    /// Error envelope with no payload
    pub fn failure(code: u16, error: impl Into<String>) -> Self {
        Self {
            code,
            data: None,
            error: error.into(),
        }
    }
}

/// One page of list results
#[derive(Debug, Serialize, Deserialize)]
pub struct PageResults<T> {
    /// Total number of matching rows
    pub count: i64,
    /// Link to the next page, if any
    pub next: Option<String>,
    /// Link to the previous page, if any
    pub previous: Option<String>,
    /// Rows on this page
    pub results: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_shape() {
        let env = Envelope::ok(42);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["code"], 200);
        assert_eq!(json["data"], 42);
        assert_eq!(json["error"], "");
    }

    #[test]
    fn test_failure_envelope_shape() {
        let env = Envelope::failure(404, "Seminar not exists");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["code"], 404);
        assert!(json["data"].is_null());
        assert_eq!(json["error"], "Seminar not exists");
    }
}
