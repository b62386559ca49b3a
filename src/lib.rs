//! # waifu-api - an async client for the waifu.it API
//!
//! Every endpoint is a single authorized `GET` against a fixed base URL. The
//! client attaches the token, parses the JSON body and normalizes the result.
//!
//! ## Quick Start
//!
//! ```no_run
//! use waifu_api::{Client, Outcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), waifu_api::Error> {
//!     let client = Client::new(Some("my-token"))?;
//!
//!     match client.get_fact().await? {
//!         Outcome::Found(fact) => println!("Fact #{}: {}", fact.id, fact.fact),
//!         Outcome::Failed(failure) => eprintln!("No fact: {}", failure.error),
//!     }
//!
//!     let hug = client.get_hug().await?;
//!     println!("Hug: {}", hug);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Two error policies
//!
//! The API's endpoints fall into two groups that report failures differently:
//!
//! - **`fact`, `quote`, `waifu`** ([`ErrorPolicy::Describe`]): a non-200
//!   response is *returned* as [`Outcome::Failed`] carrying the status code,
//!   the body and a message (`"Could not find any fact"`, `"Server down"`,
//!   `"Unknown error"`).
//! - **Reactions** (`angry` … `yes`, [`ErrorPolicy::Raise`]): a non-200
//!   response is an [`Error::Status`] whose message is
//!   `"Server responded with status <code>"`.
//!
//! In both groups a client built without a token fails with
//! [`Error::MissingToken`] before any request is sent, and transport failures
//! surface as [`Error::Network`].
//!
//! ## Response shaping
//!
//! `fact` and `quote` bodies are reduced to [`Fact`] and [`Quote`], with the
//! wire's `_id` renamed to `id`. Every other endpoint returns the body
//! unchanged as a [`serde_json::Value`].
//!
//! ## Logging
//!
//! Requests and responses are logged through `tracing`. The token is never
//! logged; install a subscriber to see the events.

mod client;
pub mod endpoint;
mod error;
mod response;

pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL};
pub use endpoint::{Endpoint, ErrorPolicy, Reaction, Shape, UnknownReaction};
pub use error::{Error, Result};
pub use response::{Fact, Failure, Outcome, Quote};
