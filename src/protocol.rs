use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_ID: AtomicU32 = AtomicU32::new(1);

/// Allocate a request id. The device echoes it back in the reply, so ids
/// must be unique across in-flight requests from this process.
fn next_id() -> u32 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// API services exposed under the device's `/sony/` control endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    System,
    Audio,
    AvContent,
    Guide,
}

impl Service {
    /// Path segment of the service endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::System => "system",
            Service::Audio => "audio",
            Service::AvContent => "avContent",
            Service::Guide => "guide",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API request structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: u32,
    pub method: String,
    pub params: Vec<Value>,
    /// API version of the method, sent as a string (e.g. `"1.1"`)
    pub version: String,
}

impl Request {
    /// Create a new request for the given method and API version
    pub fn new(method: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: next_id(),
            method: method.into(),
            params: Vec::new(),
            version: version.into(),
        }
    }

    /// Append a parameter object
    pub fn with_param(mut self, param: Value) -> Self {
        self.params.push(param);
        self
    }
}

/// API response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// Protocol error payload, a `[code, message]` pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError(pub i32, pub String);

impl RpcError {
    /// Numeric error code
    pub fn code(&self) -> i32 {
        self.0
    }

    /// Human-readable error message
    pub fn message(&self) -> &str {
        &self.1
    }
}

impl Response {
    /// Check if the response carries a protocol error
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Take the success payload. Most methods report under `result`;
    /// introspection methods report under `results` instead.
    pub fn into_payload(self) -> Option<Value> {
        self.result.or(self.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_envelope_shape() {
        let request = Request::new("setPowerStatus", "1.1").with_param(json!({"status": "active"}));
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["method"], "setPowerStatus");
        assert_eq!(value["version"], "1.1");
        assert_eq!(value["params"], json!([{"status": "active"}]));
        assert!(value["id"].is_u64());
    }

    #[test]
    fn request_without_params_serializes_empty_array() {
        let request = Request::new("getPowerStatus", "1.1");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["params"], json!([]));
    }

    #[test]
    fn request_ids_are_unique() {
        let a = Request::new("getPowerStatus", "1.1");
        let b = Request::new("getPowerStatus", "1.1");

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn parse_success_response() {
        let response: Response =
            serde_json::from_str(r#"{"result": [{"status": "active"}], "id": 7}"#).unwrap();

        assert!(!response.has_error());
        assert_eq!(response.id, Some(7));
        assert_eq!(response.into_payload(), Some(json!([{"status": "active"}])));
    }

    #[test]
    fn parse_error_response() {
        let response: Response =
            serde_json::from_str(r#"{"error": [12, "Unsupported Version"], "id": 3}"#).unwrap();

        assert!(response.has_error());
        let error = response.error.unwrap();
        assert_eq!(error.code(), 12);
        assert_eq!(error.message(), "Unsupported Version");
    }

    #[test]
    fn payload_falls_back_to_results() {
        let response: Response =
            serde_json::from_str(r#"{"results": [["getMethodTypes", []]], "id": 9}"#).unwrap();

        assert_eq!(
            response.into_payload(),
            Some(json!([["getMethodTypes", []]]))
        );
    }
}
