//! The injected blocking HTTP transport primitive.
//!
//! The request executor never talks to the network directly; it hands a
//! [`TransportRequest`] to an [`HttpTransport`] and classifies the returned
//! status and headers before touching the body stream. [`ReqwestTransport`]
//! is the production adapter on top of `reqwest`'s blocking client; tests
//! inject a scripted mock instead.

use std::io::Read;
use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::redirect;

use crate::auth::ClientTls;
use crate::config::MAX_REDIRECT_HOPS;
use crate::error::{RestError, TransportError};
use crate::headers::ResponseHeaders;

/// Request methods this client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Body-returning retrieval.
    Get,
    /// Header-only retrieval, raw status reported.
    Head,
}

/// One prepared request attempt, borrowed from the executor.
#[derive(Debug, Clone, Copy)]
pub struct TransportRequest<'a> {
    /// GET or HEAD.
    pub method: Method,
    /// Absolute URL to dispatch to.
    pub url: &'a str,
    /// Outbound headers, already including Accept/Authorization if any.
    pub headers: &'a [(String, String)],
    /// Whether the transport should transparently follow same-protocol
    /// redirects for this attempt.
    pub follow_redirects: bool,
}

/// Headers resolved up front, body left as a lazily-read stream.
pub struct TransportResponse {
    /// Status line and header map, available before any body access.
    pub headers: ResponseHeaders,
    /// Response body. Only read after the status has been classified.
    pub body: Box<dyn Read + Send>,
}

/// Blocking request/response primitive the executor is built on.
///
/// Implementations must resolve status and headers before returning, so the
/// executor can classify without risking an unclassified failure from body
/// access. One instance is shared across concurrent calls.
pub trait HttpTransport: Send + Sync {
    /// Issues a single request attempt.
    fn send(&self, request: TransportRequest<'_>) -> Result<TransportResponse, TransportError>;
}

/// Production transport on top of `reqwest::blocking`.
///
/// Keeps two underlying clients built once at construction: one that follows
/// redirects to same-protocol destinations (bounded by
/// [`MAX_REDIRECT_HOPS`]) for GET, and one that never follows for HEAD. A
/// protocol-changing redirect (http to https, say) is declined and surfaced
/// to the executor as the raw 3xx response.
pub struct ReqwestTransport {
    follow: Client,
    no_follow: Client,
}

impl ReqwestTransport {
    /// Builds the two clients with the given timeout and optional TLS
    /// client identity. The timeout covers connect and read, identically
    /// for every attempt.
    pub fn new(timeout: Duration, tls: Option<&ClientTls>) -> Result<Self, RestError> {
        let follow = configure(timeout, tls)?
            .redirect(same_protocol_policy())
            .build()
            .map_err(TransportError::new)?;
        let no_follow = configure(timeout, tls)?
            .redirect(redirect::Policy::none())
            .build()
            .map_err(TransportError::new)?;
        Ok(ReqwestTransport { follow, no_follow })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: TransportRequest<'_>) -> Result<TransportResponse, TransportError> {
        let client = if request.follow_redirects {
            &self.follow
        } else {
            &self.no_follow
        };
        let mut builder = match request.method {
            Method::Get => client.get(request.url),
            Method::Head => client.head(request.url),
        };
        for (name, value) in request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        debug!("{:?} dispatch to {}", request.method, request.url);
        let response = builder.send().map_err(TransportError::new)?;

        let status = response.status().as_u16();
        let pairs: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        Ok(TransportResponse {
            headers: ResponseHeaders::new(status, pairs),
            body: Box::new(response),
        })
    }
}

fn configure(timeout: Duration, tls: Option<&ClientTls>) -> Result<ClientBuilder, RestError> {
    let mut builder = Client::builder().connect_timeout(timeout).timeout(timeout);
    if let Some(tls) = tls {
        let identity = reqwest::Identity::from_pem(&tls.identity_pem)
            .map_err(|e| RestError::InvalidArgument(format!("invalid client identity PEM: {e}")))?;
        builder = builder.identity(identity);
        if let Some(ca_pem) = &tls.extra_root_ca_pem {
            let certificate = reqwest::Certificate::from_pem(ca_pem)
                .map_err(|e| RestError::InvalidArgument(format!("invalid root CA PEM: {e}")))?;
            builder = builder.add_root_certificate(certificate);
        }
    }
    Ok(builder)
}

/// Redirect policy that follows within the same protocol only.
fn same_protocol_policy() -> redirect::Policy {
    redirect::Policy::custom(|attempt| {
        if attempt.previous().len() > MAX_REDIRECT_HOPS {
            return attempt.error("too many redirects");
        }
        let same_protocol = attempt
            .previous()
            .first()
            .map_or(true, |origin| origin.scheme() == attempt.url().scheme());
        if same_protocol {
            attempt.follow()
        } else {
            // surfaced as the raw 3xx so the executor can report it
            attempt.stop()
        }
    })
}
