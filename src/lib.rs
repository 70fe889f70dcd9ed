//! restget: minimal blocking REST client for GET and HEAD.
//!
//! This library isolates callers from the quirks of the underlying HTTP
//! transport for stateless REST interactions against a single server root:
//! URL and query construction, status-code classification, Basic
//! authentication (forced or challenge-response) and redirect handling.
//! The wire protocol itself is delegated to a blocking transport primitive
//! ([`HttpTransport`], backed by `reqwest` in production); this crate adds
//! policy on top of it.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use restget::{BufferedResponse, RestClient, RestError, SimpleAuthentication};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let auth = Arc::new(SimpleAuthentication::new("admin", "secret"));
//! let client = RestClient::new("https://example.net", Some(auth))?;
//!
//! let mut response = BufferedResponse::with_accept("application/json");
//! match client.get("/status?verbose=1", &mut response) {
//!     Ok(()) => println!("{}", response.body()),
//!     Err(RestError::Status(e)) => eprintln!("{}: {}", e.status(), e.body()),
//!     Err(other) => return Err(other.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! A single [`RestClient`] is safe to share across threads; every call
//! blocks until classification and, on success, body draining complete.

#![warn(missing_docs)]

pub mod config;

mod auth;
mod client;
mod error;
mod headers;
mod response;
mod transport;
mod url;

pub use crate::auth::{ClientCertAuthentication, ClientTls, RestAuthentication, SimpleAuthentication};
pub use crate::client::RestClient;
pub use crate::error::{HttpStatusError, RestError, TransportError};
pub use crate::headers::ResponseHeaders;
pub use crate::response::{BufferedResponse, ResponseSink};
pub use crate::transport::{
    HttpTransport, Method, ReqwestTransport, TransportRequest, TransportResponse,
};
pub use crate::url::{parse_query, serialize_query, RestUrl};
