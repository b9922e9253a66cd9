//! Error types for the YNC client

use thiserror::Error;

/// Errors that can occur while talking to a receiver's control endpoint
#[derive(Debug, Error)]
pub enum YncError {
    /// Network or HTTP communication error
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// XML parsing error, or an empty document where one was expected
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// The receiver answered with a non-zero `RC` response code
    #[error("Receiver rejected request with RC={code}: {body}")]
    Response { code: String, body: String },
}
