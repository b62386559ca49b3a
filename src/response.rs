//! Shaped response payloads and the describing-failure outcome.
//!
//! Endpoints using [`ErrorPolicy::Describe`](crate::ErrorPolicy::Describe)
//! return an [`Outcome`]: either the shaped payload or a [`Failure`] that
//! records the status code, the raw body and a human-readable message.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A random anime fact, as returned by [`Client::get_fact`](crate::Client::get_fact).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// The fact's identifier (`_id` on the wire).
    pub id: u64,
    /// The fact itself.
    pub fact: String,
}

/// A random anime quote, as returned by [`Client::get_quote`](crate::Client::get_quote).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// The quote's identifier (`_id` on the wire).
    pub id: u64,
    pub quote: String,
    pub anime: String,
    pub author: String,
}

/// A non-200 response reported as a value rather than an error.
///
/// Serializes as `{ "statusCode": .., "body": .., "error": .. }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    /// The HTTP status code of the response.
    #[serde(serialize_with = "serialize_status")]
    pub status_code: StatusCode,

    /// The response body.
    ///
    /// Parsed as JSON when possible; otherwise the raw text as a JSON string.
    pub body: Value,

    /// `"Could not find any <endpoint>"` for 404, `"Server down"` for 502,
    /// `"Unknown error"` for anything else.
    pub error: String,
}

fn serialize_status<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

/// The result of a call to an endpoint that describes its failures.
///
/// # Examples
///
/// ```no_run
/// use waifu_api::{Client, Outcome};
///
/// # async fn example() -> Result<(), waifu_api::Error> {
/// let client = Client::new(Some("my-token"))?;
///
/// match client.get_fact().await? {
///     Outcome::Found(fact) => println!("#{}: {}", fact.id, fact.fact),
///     Outcome::Failed(failure) => {
///         eprintln!("{} ({})", failure.error, failure.status_code);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The server answered 200 and the body was shaped into `T`.
    Found(T),
    /// The server answered with another status.
    Failed(Failure),
}

impl<T> Outcome<T> {
    /// Maps the found value, leaving failures untouched.
    ///
    /// ```
    /// use waifu_api::Outcome;
    ///
    /// let outcome: Outcome<u64> = Outcome::Found(21);
    /// assert_eq!(outcome.map(|n| n * 2), Outcome::Found(42));
    /// ```
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Found(value) => Outcome::Found(f(value)),
            Outcome::Failed(failure) => Outcome::Failed(failure),
        }
    }

    /// Like [`Outcome::map`], for shaping steps that can fail.
    pub fn try_map<U, E, F>(self, f: F) -> Result<Outcome<U>, E>
    where
        F: FnOnce(T) -> Result<U, E>,
    {
        match self {
            Outcome::Found(value) => f(value).map(Outcome::Found),
            Outcome::Failed(failure) => Ok(Outcome::Failed(failure)),
        }
    }

    /// Returns `true` if the server answered 200.
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    /// Returns the found value, if any.
    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::Failed(_) => None,
        }
    }

    /// Returns the failure description, if any.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Found(_) => None,
            Outcome::Failed(failure) => Some(failure),
        }
    }

    /// Converts a failure into [`Error::Status`](crate::Error::Status), for
    /// callers who would rather propagate it with `?`.
    ///
    /// ```
    /// use http::StatusCode;
    /// use serde_json::json;
    /// use waifu_api::{Failure, Outcome};
    ///
    /// let outcome: Outcome<()> = Outcome::Failed(Failure {
    ///     status_code: StatusCode::BAD_GATEWAY,
    ///     body: json!("bad gateway"),
    ///     error: "Server down".to_string(),
    /// });
    ///
    /// let err = outcome.into_result().unwrap_err();
    /// assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    /// assert_eq!(err.raw_response(), Some("bad gateway"));
    /// ```
    pub fn into_result(self) -> crate::Result<T> {
        match self {
            Outcome::Found(value) => Ok(value),
            Outcome::Failed(failure) => {
                let raw_response = match failure.body {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                Err(crate::Error::Status {
                    status: failure.status_code,
                    raw_response,
                })
            }
        }
    }
}
