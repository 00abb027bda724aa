use thiserror::Error;

/// Result type for receiver operations
pub type Result<T> = std::result::Result<T, AvrError>;

/// Errors that can occur when interacting with Sony receivers
#[derive(Error, Debug)]
pub enum AvrError {
    /// Device address failed the syntactic check at construction
    #[error("invalid device address: {0}")]
    InvalidAddress(String),

    /// Input name is not one of the recognized sources
    #[error("unrecognized input: {0}")]
    InvalidInput(String),

    /// HTTP transport error (unreachable host, refused connection, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Device replied with a protocol-level error
    #[error("device error {code}: {message}")]
    Device {
        /// Numeric error code reported by the device
        code: i32,
        /// Error message reported by the device
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reply was parseable but did not carry the expected payload
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
