use thiserror::Error;
use ync_client::YncError;

/// High-level API errors for receiver operations
///
/// Transport failures are converted from the underlying [`YncError`] and
/// propagate unchanged through multi-step menu navigation. The remaining
/// variants are raised by this crate itself.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network communication error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The receiver returned a document that could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The receiver answered with a non-zero response code
    #[error("Receiver returned RC={code}: {body}")]
    ResponseError { code: String, body: String },

    /// The active input has no content source, so it cannot be browsed
    ///
    /// Raised before any menu request is issued.
    #[error("Menu unavailable on input '{input}' (attempted {action})")]
    MenuUnavailable { input: String, action: String },

    /// The readiness poller ran out of attempts
    #[error("Menu did not reach the expected state after {attempts} attempts")]
    Timeout { attempts: u32 },

    /// The receiver displays a different layer than navigation led to
    ///
    /// Usually means another client moved the cursor.
    #[error("Expected menu layer '{expected}', found '{found}'")]
    UnexpectedLayer { expected: String, found: String },

    /// A named path segment does not exist on any page of its layer
    #[error("Path '{path}' not found: no entry named '{segment}'")]
    PathNotFound { path: String, segment: String },

    /// Playback control was requested on an input that does not support it
    #[error("Playback unavailable on input '{input}' (attempted {action})")]
    PlaybackUnavailable { input: String, action: String },

    /// HDMI output name not of the form `hdmiN`
    #[error("Unknown output port: {0}")]
    UnknownPort(String),

    /// Parameter outside the set the receiver accepts
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A reply lacked an element the operation depends on
    #[error("Missing element in response: {0}")]
    MissingElement(String),
}

impl ApiError {
    pub(crate) fn menu_unavailable(input: impl Into<String>, action: impl Into<String>) -> Self {
        Self::MenuUnavailable {
            input: input.into(),
            action: action.into(),
        }
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<YncError> for ApiError {
    fn from(error: YncError) -> Self {
        match error {
            YncError::Network(msg) => ApiError::NetworkError(msg),
            YncError::Parse(msg) => ApiError::ParseError(msg),
            YncError::Response { code, body } => ApiError::ResponseError { code, body },
        }
    }
}
