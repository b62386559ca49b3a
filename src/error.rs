//! Error types for waifu.it API calls.
//!
//! Calls either fail before touching the network (missing token, bad
//! configuration), fail at the transport layer, or fail because the server
//! answered with something other than the expected payload. Raw response
//! bodies are kept wherever one was received.

use http::StatusCode;

/// The main error type for API calls.
///
/// Note that endpoints using [`ErrorPolicy::Describe`](crate::ErrorPolicy::Describe)
/// (`fact`, `quote`, `waifu`) report non-200 responses as
/// [`Outcome::Failed`](crate::Outcome::Failed) values instead of
/// [`Error::Status`].
///
/// # Examples
///
/// ```no_run
/// use waifu_api::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new(Some("my-token"))?;
///
/// match client.get_hug().await {
///     Ok(body) => println!("Hug: {}", body),
///     Err(Error::MissingToken) => eprintln!("set a token first"),
///     Err(Error::Status { status, raw_response }) => {
///         eprintln!("HTTP error {}: {}", status, raw_response);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The client was built without an authorization token.
    ///
    /// Returned before any request is sent.
    #[error("Missing authorization token")]
    MissingToken,

    /// A network-level error occurred (connection failed, DNS lookup failed, etc.).
    ///
    /// This wraps the underlying `reqwest::Error` and indicates problems at the network layer
    /// rather than the HTTP protocol layer.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered a reaction endpoint with a status other than 200.
    #[error("Server responded with status {}", .status.as_u16())]
    Status {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
    },

    /// A 200 response body was not JSON, or not the shape the endpoint promises.
    ///
    /// # Fields
    ///
    /// * `raw_response` - The raw response body as a string
    /// * `serde_error` - The error message from serde
    /// * `status` - The HTTP status code of the response
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// Invalid configuration was provided.
    ///
    /// This covers invalid default headers, a token that is not a legal
    /// header value, and base URLs that cannot have paths appended.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns the HTTP status code if this error has one.
    ///
    /// ```
    /// use waifu_api::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::Status {
    ///     status: StatusCode::INTERNAL_SERVER_ERROR,
    ///     raw_response: "oops".to_string(),
    /// };
    /// assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    /// assert_eq!(err.to_string(), "Server responded with status 500");
    ///
    /// assert_eq!(Error::MissingToken.status(), None);
    /// ```
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Status { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// A specialized `Result` type for API calls.
///
/// This is a convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
