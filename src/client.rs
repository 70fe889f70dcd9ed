//! The request executor: GET/HEAD against a single server root.

use std::io::{self, Read};
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::{debug, info, warn};
use url::Url;

use crate::auth::RestAuthentication;
use crate::config::{
    AUTH_BASIC_PREFIX, DEFAULT_TIMEOUT, HEADER_ACCEPT, HEADER_AUTHORIZATION, HEADER_LOCATION,
    HEADER_WWW_AUTHENTICATE,
};
use crate::error::{HttpStatusError, RestError, TransportError};
use crate::headers::ResponseHeaders;
use crate::response::ResponseSink;
use crate::transport::{
    HttpTransport, Method, ReqwestTransport, TransportRequest, TransportResponse,
};

/// Blocking REST client bound to one server root.
///
/// Each call blocks the calling thread until response classification and,
/// for success, stream draining complete. One instance is safe for
/// concurrent calls from multiple threads; the timeout is fixed at
/// construction and applies identically to every attempt, so callers
/// needing a different bound build a separate instance.
///
/// # Status classification for GET
///
/// - `200`: the body is streamed to the caller's sink, headers first.
/// - `301`/`302`: the transport has already followed same-protocol
///   redirects transparently, so a 3xx seen here is one it declined (a
///   protocol change, say). The error body is buffered and a
///   [`HttpStatusError`] raised; nothing is retried.
/// - `401`: with an authentication provider configured, forced mode off and
///   a `WWW-Authenticate` challenge present, the request is repeated
///   exactly once with Basic credentials. Anything else about a 401,
///   including a second one after the retry, is a terminal
///   [`HttpStatusError`].
/// - other codes below 400: not a supported outcome of this API. Logged as
///   a warning, body left unconsumed, no error raised.
/// - `400` and above: error body buffered, [`HttpStatusError`] raised.
///
/// # Example
///
/// ```no_run
/// use restget::{BufferedResponse, RestClient};
///
/// # fn main() -> Result<(), restget::RestError> {
/// let client = RestClient::new("http://localhost:8080", None)?;
/// let mut response = BufferedResponse::new();
/// client.get("/status?verbose=1", &mut response)?;
/// println!("{}", response.body());
/// # Ok(())
/// # }
/// ```
pub struct RestClient {
    root: String,
    transport: Arc<dyn HttpTransport>,
    auth: Option<Arc<dyn RestAuthentication>>,
    forced_auth: bool,
}

impl RestClient {
    /// Client for the given server root with the default timeout.
    ///
    /// The root is scheme, host and possibly port, no trailing slash. The
    /// authentication provider, when given, answers 401 challenges; its TLS
    /// identity (if any) is applied to every connection.
    pub fn new(
        server_root: &str,
        auth: Option<Arc<dyn RestAuthentication>>,
    ) -> Result<Self, RestError> {
        Self::with_timeout(server_root, auth, DEFAULT_TIMEOUT)
    }

    /// Client with an explicit connect/read timeout.
    pub fn with_timeout(
        server_root: &str,
        auth: Option<Arc<dyn RestAuthentication>>,
        timeout: Duration,
    ) -> Result<Self, RestError> {
        let root = validate_root(server_root)?;
        // TLS setup is resolved once here, not per connection
        let tls = auth.as_deref().and_then(|a| a.tls(&root));
        let transport = Arc::new(ReqwestTransport::new(timeout, tls.as_ref())?);
        Ok(RestClient {
            root,
            transport,
            auth,
            forced_auth: false,
        })
    }

    /// Client on an externally supplied transport primitive.
    pub fn with_transport(
        server_root: &str,
        auth: Option<Arc<dyn RestAuthentication>>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, RestError> {
        Ok(RestClient {
            root: validate_root(server_root)?,
            transport,
            auth,
            forced_auth: false,
        })
    }

    /// Switches between forced and challenge-response Basic auth.
    ///
    /// Forced mode sends `Authorization` on the first attempt and never
    /// retries a 401; challenge-response mode (the default) waits for a 401
    /// carrying `WWW-Authenticate` and retries once.
    pub fn forced_authentication(mut self, forced: bool) -> Result<Self, RestError> {
        if forced && self.auth.is_none() {
            return Err(RestError::InvalidArgument(
                "forced authentication assumes an authentication provider".to_string(),
            ));
        }
        self.forced_auth = forced;
        Ok(self)
    }

    /// The server root this client is bound to.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Requests a resource and writes the body to the provided sink.
    ///
    /// `uri` is the resource address from the server root, starting with
    /// `/`, typically an encoded URI built with [`RestUrl`](crate::RestUrl).
    ///
    /// # Errors
    ///
    /// [`RestError::InvalidArgument`] before any network activity for a
    /// malformed uri, [`RestError::Transport`] on connectivity failures and
    /// [`RestError::Status`] per the classification rules above.
    pub fn get(&self, uri: &str, response: &mut dyn ResponseSink) -> Result<(), RestError> {
        let url = self.resolve(uri)?;

        let mut request_headers: Vec<(String, String)> = Vec::with_capacity(2);
        if let Some(accept) = response.accept() {
            request_headers.push((HEADER_ACCEPT.to_string(), accept.to_string()));
        }
        if self.forced_auth {
            if let Some(auth) = &self.auth {
                if let Some(username) = auth.username(&self.root, uri, None) {
                    debug!("Authenticating user {username}, forced");
                    let password = auth
                        .password(&self.root, uri, None, &username)
                        .unwrap_or_default();
                    set_basic_auth(&mut request_headers, &username, &password);
                }
            }
        }

        match self.dispatch_get(&url, &request_headers, response) {
            Err(RestError::Status(error)) if error.status() == 401 && !self.forced_auth => {
                let Some(auth) = &self.auth else {
                    return Err(error.into());
                };
                let Some(challenge) = error.headers().get(HEADER_WWW_AUTHENTICATE).first().cloned()
                else {
                    warn!("Got 401 status without WWW-Authenticate header");
                    return Err(error.into());
                };
                let realm = basic_realm(&challenge).map(str::to_string);
                let Some(username) = auth.username(&self.root, uri, realm.as_deref()) else {
                    // no credentials available means no auth attempt
                    return Err(error.into());
                };
                debug!("Authenticating user {username} as retry for {challenge}");
                let password = auth
                    .password(&self.root, uri, realm.as_deref(), &username)
                    .unwrap_or_default();
                set_basic_auth(&mut request_headers, &username, &password);
                // the 401 body was fully buffered above, so the original
                // response is drained before this second attempt
                self.dispatch_get(&url, &request_headers, response)
            }
            outcome => outcome,
        }
    }

    /// Performs a HEAD request and returns the raw response headers.
    ///
    /// HEAD exposes metadata for the exact resource addressed: redirects
    /// are not followed (a 302 is reported as a 302) and no status is
    /// classified as an error, so the returned headers can carry a 401 when
    /// no credentials were sent.
    pub fn head(&self, uri: &str) -> Result<ResponseHeaders, RestError> {
        let url = self.resolve(uri)?;
        debug!("attempting HEAD request to {url}");
        let TransportResponse { headers, .. } = self.transport.send(TransportRequest {
            method: Method::Head,
            url: &url,
            headers: &[],
            follow_redirects: false,
        })?;
        Ok(headers)
    }

    /// One GET attempt: dispatch, classify, stream or raise.
    fn dispatch_get(
        &self,
        url: &str,
        request_headers: &[(String, String)],
        response: &mut dyn ResponseSink,
    ) -> Result<(), RestError> {
        info!("GET connection to {url}");
        let TransportResponse { headers, mut body } = self.transport.send(TransportRequest {
            method: Method::Get,
            url,
            headers: request_headers,
            follow_redirects: true,
        })?;

        // classify on the status before any body access, so a body failure
        // can never masquerade as an unclassified transport error
        let status = headers.status();
        if status == 200 {
            let receiver = response.response_stream(&headers);
            io::copy(&mut body, receiver).map_err(TransportError::new)?;
            Ok(())
        } else if status == 301 || status == 302 {
            info!(
                "Server responded with redirect ({status}): {:?}",
                headers.get(HEADER_LOCATION)
            );
            let body_text = buffer_body(&mut body)?;
            Err(HttpStatusError::new(url, headers, body_text).into())
        } else if status < 400 {
            warn!("Unsupported HTTP response code: {status}");
            Ok(())
        } else {
            let body_text = buffer_body(&mut body)?;
            Err(HttpStatusError::new(url, headers, body_text).into())
        }
    }

    fn resolve(&self, uri: &str) -> Result<String, RestError> {
        if !uri.starts_with('/') {
            return Err(RestError::InvalidArgument(format!(
                "URIs must be relative to server root starting with slash, got {uri}"
            )));
        }
        Ok(format!("{}{}", self.root, uri))
    }
}

fn validate_root(server_root: &str) -> Result<String, RestError> {
    if server_root.is_empty() {
        return Err(RestError::InvalidArgument(
            "server root URL can not be empty".to_string(),
        ));
    }
    if server_root.ends_with('/') {
        // picky because resource URIs must start with slash per the contract
        return Err(RestError::InvalidArgument(format!(
            "server root URL must not end with slash, got {server_root}"
        )));
    }
    let parsed = Url::parse(server_root)
        .map_err(|e| RestError::InvalidArgument(format!("invalid server root URL {server_root}: {e}")))?;
    if !parsed.has_host() {
        return Err(RestError::InvalidArgument(format!(
            "server root URL must name a host, got {server_root}"
        )));
    }
    Ok(server_root.to_string())
}

/// Buffers an error body completely so the message survives the connection.
fn buffer_body<R: Read>(body: &mut R) -> Result<String, RestError> {
    let mut buffer = Vec::new();
    body.read_to_end(&mut buffer).map_err(TransportError::new)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Replaces any Authorization header with Basic credentials.
fn set_basic_auth(headers: &mut Vec<(String, String)>, username: &str, password: &str) {
    let encoded = BASE64.encode(format!("{username}:{password}"));
    headers.retain(|(name, _)| name != HEADER_AUTHORIZATION);
    headers.push((
        HEADER_AUTHORIZATION.to_string(),
        format!("{AUTH_BASIC_PREFIX}{encoded}"),
    ));
}

/// Extracts the realm from a `Basic realm="..."` challenge, if present.
fn basic_realm(challenge: &str) -> Option<&str> {
    let lower = challenge.to_ascii_lowercase();
    let start = lower.find("realm=\"")? + "realm=\"".len();
    let end = challenge[start..].find('"')? + start;
    Some(&challenge[start..end])
}
