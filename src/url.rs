//! Resource locator construction and query string handling.
//!
//! [`RestUrl`] keeps conversions to and from the single string passed to
//! [`RestClient::get`](crate::RestClient::get) and
//! [`RestClient::head`](crate::RestClient::head) in one place, so client
//! implementations can stay string-only and easy to mock. Both full URLs and
//! resource URIs from the server root (starting with `/`) are supported.

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::error::RestError;

/// Percent-encoding set for query parameter values: everything outside the
/// RFC 3986 unreserved set is encoded as UTF-8 bytes.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A resource locator: optional server root plus path and query string.
///
/// The root is scheme, host and possibly port with no trailing slash. When no
/// root is present the locator is an absolute URI from the server root,
/// starting with `/`. Fragment identifiers are rejected unconditionally:
/// they never reach the server, so encoding them in this API is meaningless.
///
/// Query parameters added through [`add_param`](RestUrl::add_param) are
/// percent-encoded and accumulate in call order; parameter names are never
/// encoded. A name that would require encoding is the web service's defect,
/// not this type's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestUrl {
    root: Option<String>,
    rest: String,
    has_query: bool,
}

impl RestUrl {
    /// Parses an encoded full URL or an absolute URI from the server root.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidArgument`] if the string carries a
    /// fragment identifier, is relative without a leading slash, or cannot
    /// be parsed as a URL at all.
    pub fn new(encoded_uri: &str) -> Result<Self, RestError> {
        if encoded_uri.contains('#') {
            return Err(RestError::InvalidArgument(
                "fragment identifiers not supported in this API".to_string(),
            ));
        }
        let (root, rest) = match Url::parse(encoded_uri) {
            Ok(url) if url.has_host() => split_root(encoded_uri),
            Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => {
                if !encoded_uri.starts_with('/') {
                    return Err(RestError::InvalidArgument(format!(
                        "URI must be absolute from server root, got {encoded_uri}"
                    )));
                }
                (None, encoded_uri.to_string())
            }
            Err(e) => {
                return Err(RestError::InvalidArgument(format!(
                    "invalid URI {encoded_uri}: {e}"
                )))
            }
        };
        Ok(RestUrl {
            root,
            rest,
            has_query: encoded_uri.contains('?'),
        })
    }

    /// Parses a locator and appends query parameters in iteration order.
    pub fn with_params<'a, I>(encoded_uri: &str, params: I) -> Result<Self, RestError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut url = Self::new(encoded_uri)?;
        for (name, value) in params {
            url = url.add_param(name, value);
        }
        Ok(url)
    }

    /// Appends a query parameter, percent-encoding the raw value.
    ///
    /// Repeated calls with the same name accumulate one `name=value` pair
    /// per call, in call order. The name is appended verbatim.
    #[must_use]
    pub fn add_param(mut self, name: &str, value_raw: &str) -> Self {
        let separator = if self.has_query { '&' } else { '?' };
        let value = utf8_percent_encode(value_raw, QUERY_VALUE);
        self.rest = format!("{}{}{}={}", self.rest, separator, name, value);
        self.has_query = true;
        self
    }

    /// The server root (scheme, host, port) if the locator carries one.
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// The server-relative part: path plus query string, starting with `/`.
    pub fn part(&self) -> &str {
        &self.rest
    }

    /// The raw query string without the leading question mark, if any.
    pub fn query_string(&self) -> Option<&str> {
        self.rest.split_once('?').map(|(_, query)| query)
    }

    /// Parses the query string into ordered `name -> values` groups.
    ///
    /// Same-named pairs are grouped into one entry whose values keep the
    /// order they appeared in. Values are percent-decoded as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidArgument`] on an empty query segment, a
    /// segment that cannot be split as `name=value`, or a value that does
    /// not decode as UTF-8.
    pub fn query(&self) -> Result<Vec<(String, Vec<String>)>, RestError> {
        match self.query_string() {
            Some(raw) => parse_query(raw),
            None => Ok(Vec::new()),
        }
    }
}

impl fmt::Display for RestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => write!(f, "{}{}", root, self.rest),
            None => f.write_str(&self.rest),
        }
    }
}

/// Splits a validated absolute URL string into root and server-relative rest.
fn split_root(encoded_uri: &str) -> (Option<String>, String) {
    // scheme has already been validated, so "://" is present
    let authority_start = encoded_uri.find("://").map(|i| i + 3).unwrap_or(0);
    match encoded_uri[authority_start..].find('/') {
        Some(slash) => {
            let split = authority_start + slash;
            (
                Some(encoded_uri[..split].to_string()),
                encoded_uri[split..].to_string(),
            )
        }
        None => (Some(encoded_uri.to_string()), String::new()),
    }
}

/// Parses a raw query string into ordered `name -> values` groups.
///
/// See [`RestUrl::query`] for the grouping and error rules.
pub fn parse_query(query_string_encoded: &str) -> Result<Vec<(String, Vec<String>)>, RestError> {
    let mut params: Vec<(String, Vec<String>)> = Vec::new();
    for part in query_string_encoded.split('&') {
        if part.is_empty() {
            return Err(RestError::InvalidArgument(format!(
                "found empty query string part in {query_string_encoded}"
            )));
        }
        let split = match part.find('=') {
            Some(n) if n >= 1 => n,
            _ => {
                return Err(RestError::InvalidArgument(format!(
                    "query string part could not be parsed as key=value: {part}"
                )))
            }
        };
        let name = &part[..split];
        let value = decode_value(&part[split + 1..])?;
        match params.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, values)) => values.push(value),
            None => params.push((name.to_string(), vec![value])),
        }
    }
    Ok(params)
}

/// Reassembles parsed query parameters into `&`-joined `name=value` pairs,
/// re-encoding the values. Order of names and of values per name is kept.
pub fn serialize_query(params: &[(String, Vec<String>)]) -> String {
    let mut query = String::new();
    for (name, values) in params {
        for value in values {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(name);
            query.push('=');
            query.push_str(&utf8_percent_encode(value, QUERY_VALUE).to_string());
        }
    }
    query
}

/// Percent-decodes a query value as UTF-8, treating `+` as space.
fn decode_value(encoded: &str) -> Result<String, RestError> {
    let spaced = encoded.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| {
            RestError::InvalidArgument(format!(
                "query value does not decode as UTF-8: {encoded}: {e}"
            ))
        })
}
