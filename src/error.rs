//! Error types for gateway calls.
//!
//! Every operation returns [`Result`]. A response whose status code is not in
//! the operation's success set becomes [`BraintreeError::InvalidResponse`],
//! carrying the status and raw body so callers can inspect what the gateway said.

use reqwest::StatusCode;
use serde::Deserialize;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, BraintreeError>;

/// Client-wide error type.
///
/// # Error Categories
///
/// - **Transport Errors**: connection, timeout or TLS failures from reqwest
/// - **Wire Format Errors**: XML that could not be encoded or decoded
/// - **Gateway Errors**: unexpected status codes from Braintree
/// - **Usage Errors**: requests rejected before any call is made
#[derive(Debug, thiserror::Error)]
pub enum BraintreeError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request body could not be serialized to XML.
    #[error("XML encode error: {0}")]
    Encode(#[from] quick_xml::se::SeError),

    /// Response body could not be deserialized from XML.
    #[error("XML decode error: {0}")]
    Decode(#[from] quick_xml::de::DeError),

    /// Gateway answered with a status code the operation does not accept.
    ///
    /// The body is kept verbatim; see [`BraintreeError::api_message`].
    #[error("Invalid response: {status}")]
    InvalidResponse { status: StatusCode, body: String },

    /// A sandbox-only operation was attempted against production.
    #[error("Operation not allowed in production environment")]
    TestOperationInProduction,

    /// Request is missing data required to build the call.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configured gateway URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration could not be loaded from the environment.
    #[error("Configuration error: {0}")]
    Config(#[from] envy::Error),
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    message: Option<String>,
}

impl BraintreeError {
    /// HTTP status of an [`InvalidResponse`](Self::InvalidResponse), if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            BraintreeError::InvalidResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Best-effort `<api-error-response><message>` from an invalid response body.
    ///
    /// Returns `None` for other variants or when the body is not an API error document.
    pub fn api_message(&self) -> Option<String> {
        let BraintreeError::InvalidResponse { body, .. } = self else {
            return None;
        };
        quick_xml::de::from_str::<ApiErrorResponse>(body)
            .ok()
            .and_then(|response| response.message)
            .filter(|message| !message.trim().is_empty())
    }
}
