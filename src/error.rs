//! Error taxonomy for the REST client.
//!
//! Three classes, matched by variant rather than caught by inheritance:
//! argument errors fail fast before any I/O, transport errors pass through
//! the underlying connectivity failure unclassified, and status errors carry
//! the full non-success response so callers can inspect and branch.

use thiserror::Error;

use crate::headers::ResponseHeaders;

/// Error returned by every fallible operation in this crate.
#[derive(Debug, Error)]
pub enum RestError {
    /// Caller-programming errors: malformed path, fragment in a URL,
    /// undecodable query value. Raised before any network activity.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Connectivity failures from the transport primitive: DNS, connection
    /// refused, timeout, malformed underlying response. Not classified
    /// further by this crate.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server was reached but answered with a non-success status.
    #[error(transparent)]
    Status(#[from] HttpStatusError),
}

/// Opaque failure from the injected transport primitive.
///
/// Wraps whatever the transport produced (a `reqwest` error, an I/O error
/// from a mock) so all transports share one error shape.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct TransportError(#[from] anyhow::Error);

impl TransportError {
    /// Wraps any error type the transport ran into.
    pub fn new(err: impl Into<anyhow::Error>) -> Self {
        TransportError(err.into())
    }
}

/// A connection succeeded but the server returned a status classified as an
/// error.
///
/// Carries the locator used, the header snapshot and the response body. The
/// body is fully buffered before this error is constructed, so the server's
/// message stays available after the underlying connection is released.
#[derive(Debug, Clone, Error)]
#[error("server returned HTTP response code {status} for URL: {url}")]
pub struct HttpStatusError {
    status: u16,
    url: String,
    headers: ResponseHeaders,
    body: String,
}

impl HttpStatusError {
    /// Snapshots a non-success response for the given locator.
    pub fn new(url: impl Into<String>, headers: ResponseHeaders, body: impl Into<String>) -> Self {
        HttpStatusError {
            status: headers.status(),
            url: url.into(),
            headers,
            body: body.into(),
        }
    }

    /// HTTP status code the server answered with.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The URL used to make the connection.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Header snapshot taken before the body was read.
    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    /// Response body from the server, assumed readable as text.
    pub fn body(&self) -> &str {
        &self.body
    }
}
