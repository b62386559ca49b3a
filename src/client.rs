//! HTTP client for the waifu.it API.
//!
//! The [`Client`] type is the main entry point. Use [`Client::new`] for the
//! packaged base URL, or [`ClientBuilder`] to point it somewhere else.

use crate::{
    endpoint::{Endpoint, ErrorPolicy, Reaction},
    response::{Failure, Fact, Outcome, Quote},
    Error, Result,
};
use http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Base URL every endpoint path is appended to unless the builder overrides it.
pub const DEFAULT_BASE_URL: &str = "https://waifu.it/api";

/// A client for the waifu.it API.
///
/// The client is designed to be reused across multiple requests. Clones share
/// the same connection pool and token; nothing is mutated after construction,
/// so concurrent calls never interfere with each other.
///
/// # Examples
///
/// ```no_run
/// use waifu_api::{Client, Outcome};
///
/// # async fn example() -> Result<(), waifu_api::Error> {
/// let client = Client::new(Some("my-token"))?;
///
/// if let Outcome::Found(quote) = client.get_quote().await? {
///     println!("{} ({}): {}", quote.author, quote.anime, quote.quote);
/// }
///
/// let hug = client.get_hug().await?;
/// println!("Hug: {}", hug);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    default_headers: HeaderMap,
}

/// Status and body of a response, before any policy is applied.
struct RawResponse {
    status: StatusCode,
    body: String,
}

impl Client {
    /// Creates a client for the packaged base URL.
    ///
    /// The token is stored as-is. A missing token is only reported when an
    /// endpoint is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be initialized.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let builder = ClientBuilder::new();
        match token {
            Some(token) => builder.token(token).build(),
            None => builder.build(),
        }
    }

    /// Creates a new `ClientBuilder` for configuring a client.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use waifu_api::Client;
    ///
    /// # async fn example() -> Result<(), waifu_api::Error> {
    /// let client = Client::builder()
    ///     .base_url("https://mirror.example.com/api")?
    ///     .token("my-token")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns the base URL endpoint paths are appended to.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Returns `true` if the client holds an authorization token.
    pub fn has_token(&self) -> bool {
        self.inner.token.is_some()
    }

    /// Calls an endpoint and applies its shape and error policy to an untyped body.
    ///
    /// Every `get_*` method is built on this. Under [`ErrorPolicy::Describe`]
    /// a non-200 status yields [`Outcome::Failed`]; under
    /// [`ErrorPolicy::Raise`] it yields [`Error::Status`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use waifu_api::{Client, Endpoint};
    ///
    /// # async fn example() -> Result<(), waifu_api::Error> {
    /// let client = Client::new(Some("my-token"))?;
    /// let waifu = client.call(&Endpoint::WAIFU).await?;
    /// println!("{:?}", waifu);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call(&self, endpoint: &Endpoint) -> Result<Outcome<Value>> {
        let raw = self.execute_request(endpoint).await?;

        let outcome = match endpoint.policy {
            ErrorPolicy::Describe => describe_failure(endpoint, raw)?,
            ErrorPolicy::Raise => Outcome::Found(raise_failure(endpoint, raw)?),
        };

        Ok(outcome.map(|body| endpoint.shape.apply(body)))
    }

    /// Fetches a reaction by enum rather than by method name.
    ///
    /// ```no_run
    /// use waifu_api::{Client, Reaction};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new(Some("my-token"))?;
    /// let reaction: Reaction = "wave".parse()?;
    /// println!("{}", client.reaction(reaction).await?);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn reaction(&self, reaction: Reaction) -> Result<Value> {
        let endpoint = reaction.endpoint();
        let raw = self.execute_request(&endpoint).await?;
        raise_failure(&endpoint, raw).map(|body| endpoint.shape.apply(body))
    }

    /// Fetches a random fact.
    ///
    /// A non-200 response is returned as [`Outcome::Failed`], not as an error.
    pub async fn get_fact(&self) -> Result<Outcome<Fact>> {
        self.call_typed(&Endpoint::FACT).await
    }

    /// Fetches a random quote.
    ///
    /// A non-200 response is returned as [`Outcome::Failed`], not as an error.
    pub async fn get_quote(&self) -> Result<Outcome<Quote>> {
        self.call_typed(&Endpoint::QUOTE).await
    }

    /// Fetches a random waifu. The body is returned unchanged.
    ///
    /// A non-200 response is returned as [`Outcome::Failed`], not as an error.
    pub async fn get_waifu(&self) -> Result<Outcome<Value>> {
        self.call(&Endpoint::WAIFU).await
    }

    async fn call_typed<T>(&self, endpoint: &Endpoint) -> Result<Outcome<T>>
    where
        T: DeserializeOwned,
    {
        self.call(endpoint).await?.try_map(|shaped| {
            serde_json::from_value(shaped.clone()).map_err(|e| {
                tracing::error!(
                    error = %e,
                    endpoint = endpoint.path,
                    "Response does not match the expected shape"
                );
                Error::DeserializationFailed {
                    raw_response: shaped.to_string(),
                    serde_error: e.to_string(),
                    status: StatusCode::OK,
                }
            })
        })
    }

    /// Executes the single request backing an endpoint call.
    async fn execute_request(&self, endpoint: &Endpoint) -> Result<RawResponse> {
        let token = self.inner.token.as_deref().ok_or(Error::MissingToken)?;
        let mut authorization = HeaderValue::try_from(token).map_err(|e| {
            Error::ConfigurationError(format!("Invalid authorization token: {}", e))
        })?;
        authorization.set_sensitive(true);

        let url = self.endpoint_url(endpoint)?;

        tracing::debug!(
            endpoint = endpoint.path,
            url = %url,
            "Executing HTTP request"
        );

        let mut headers = self.inner.default_headers.clone();
        headers.insert(header::AUTHORIZATION, authorization);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let request = self.inner.http_client.get(url).headers(headers);

        let start_time = Instant::now();
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, endpoint = endpoint.path, "Request failed");
            Error::Network(e)
        })?;

        let status = response.status();
        let body = response.text().await?;
        log_response(endpoint, status, &body, start_time.elapsed());

        Ok(RawResponse { status, body })
    }

    fn endpoint_url(&self, endpoint: &Endpoint) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::ConfigurationError(format!(
                    "Base URL cannot be a base: {}",
                    self.inner.base_url
                ))
            })?
            .pop_if_empty()
            .push(endpoint.path);
        Ok(url)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url.as_str())
            .field("has_token", &self.has_token())
            .finish()
    }
}

fn log_response(endpoint: &Endpoint, status: StatusCode, body: &str, latency: Duration) {
    tracing::info!(
        endpoint = endpoint.path,
        status = status.as_u16(),
        latency_ms = latency.as_millis(),
        "Received HTTP response"
    );

    if status.is_client_error() {
        tracing::error!(status = status.as_u16(), response = %body, "Client error (4xx)");
    } else if status.is_server_error() {
        tracing::warn!(status = status.as_u16(), response = %body, "Server error (5xx)");
    }
}

fn parse_body(status: StatusCode, body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            raw_response = %body,
            "Failed to deserialize response"
        );
        Error::DeserializationFailed {
            raw_response: body.to_string(),
            serde_error: e.to_string(),
            status,
        }
    })
}

/// Non-200 becomes an [`Outcome::Failed`] value.
fn describe_failure(endpoint: &Endpoint, raw: RawResponse) -> Result<Outcome<Value>> {
    if raw.status != StatusCode::OK {
        let body = serde_json::from_str(&raw.body).unwrap_or(Value::String(raw.body));
        return Ok(Outcome::Failed(Failure {
            status_code: raw.status,
            body,
            error: endpoint.failure_message(raw.status.as_u16()),
        }));
    }

    parse_body(raw.status, &raw.body).map(Outcome::Found)
}

/// Non-200 becomes an [`Error::Status`].
fn raise_failure(endpoint: &Endpoint, raw: RawResponse) -> Result<Value> {
    if raw.status != StatusCode::OK {
        let err = Error::Status {
            status: raw.status,
            raw_response: raw.body,
        };
        tracing::warn!(error = %err, endpoint = endpoint.path, "Request failed");
        return Err(err);
    }

    parse_body(raw.status, &raw.body)
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use waifu_api::ClientBuilder;
///
/// # async fn example() -> Result<(), waifu_api::Error> {
/// let client = ClientBuilder::new()
///     .token("my-token")
///     .default_header("User-Agent", "my-bot/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    token: Option<String>,
    default_headers: HeaderMap,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            token: None,
            default_headers: HeaderMap::new(),
        }
    }

    /// Overrides the packaged base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or cannot have paths appended.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(url.as_ref())?;
        if url.cannot_be_a_base() {
            return Err(Error::ConfigurationError(format!(
                "Base URL cannot be a base: {}",
                url
            )));
        }
        self.base_url = Some(url);
        Ok(self)
    }

    /// Sets the authorization token sent with every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// `Authorization` and `Content-Type` are always set by the client and
    /// take precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the packaged base URL fails to parse or the HTTP
    /// client cannot be initialized.
    pub fn build(self) -> Result<Client> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                token: self.token,
                default_headers: self.default_headers,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
