//! Client configuration constants.
//!
//! Timeouts and redirect bounds are fixed at client construction and apply
//! identically to every attempt, including the single authentication retry.
//! Callers that need different bounds build separate client instances.

use std::time::Duration;

/// Connect and read timeout applied to every request attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum redirect hops the transport follows for GET before giving up.
/// HEAD requests never follow redirects.
pub const MAX_REDIRECT_HOPS: usize = 10;

// HTTP header names used by the request executor
/// Accept header, set when the response sink declares a content preference.
pub const HEADER_ACCEPT: &str = "Accept";
/// Authorization header, set for forced auth or the 401 challenge retry.
pub const HEADER_AUTHORIZATION: &str = "Authorization";
/// WWW-Authenticate header, inbound challenge that drives the auth retry.
pub const HEADER_WWW_AUTHENTICATE: &str = "WWW-Authenticate";
/// Location header, informational on redirects the transport declined.
pub const HEADER_LOCATION: &str = "Location";
/// Content-Type header, surfaced through `ResponseHeaders::content_type`.
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

/// Authorization scheme prefix for HTTP Basic credentials.
pub const AUTH_BASIC_PREFIX: &str = "Basic ";
