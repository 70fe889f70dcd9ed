//! Immutable view over a received response's status line and header map.

use std::collections::HashMap;
use std::fmt;

use crate::config::HEADER_CONTENT_TYPE;

/// Status code, content type and header map of a received response.
///
/// Produced by the transport adapter as soon as headers are available,
/// before any decision about body handling, and never mutated afterwards.
/// Header lookup is case-insensitive per HTTP semantics; values for a
/// repeated header keep the order they were received in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeaders {
    status: u16,
    content_type: Option<String>,
    headers: HashMap<String, Vec<String>>,
}

impl ResponseHeaders {
    /// Builds the view from a status code and `(name, value)` pairs.
    ///
    /// Names are folded to lowercase for case-insensitive lookup; the
    /// content type is derived from the `Content-Type` header.
    pub fn new<I>(status: u16, headers: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            map.entry(name.to_ascii_lowercase()).or_default().push(value);
        }
        let content_type = map
            .get(&HEADER_CONTENT_TYPE.to_ascii_lowercase())
            .and_then(|values| values.first())
            .cloned();
        ResponseHeaders {
            status,
            content_type,
            headers: map,
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Value of the `Content-Type` header, if the server sent one.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// All values received for a header, in order. Empty if absent.
    pub fn get(&self, name: &str) -> &[String] {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the server sent the named header at all.
    pub fn contains(&self, name: &str) -> bool {
        self.headers.contains_key(&name.to_ascii_lowercase())
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// True when no headers were received.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Iterates over `(name, values)` entries in unspecified name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.headers
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl fmt::Display for ResponseHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.headers.is_empty() {
            return f.write_str("(empty headers)");
        }
        let mut first = true;
        for (name, values) in self.headers.iter() {
            for value in values {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{name}: {value}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(status: u16, pairs: &[(&str, &str)]) -> ResponseHeaders {
        ResponseHeaders::new(
            status,
            pairs
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string())),
        )
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let h = headers(200, &[("Content-Type", "text/plain"), ("ETag", "\"x\"")]);
        assert_eq!(&["text/plain".to_string()], h.get("content-type"));
        assert_eq!(&["\"x\"".to_string()], h.get("etag"));
        assert!(h.contains("Etag"));
        assert!(!h.contains("Location"));
    }

    #[test]
    fn test_content_type_derived_from_map() {
        let h = headers(200, &[("Content-Type", "application/json")]);
        assert_eq!(Some("application/json"), h.content_type());
        assert_eq!(None, headers(200, &[]).content_type());
    }

    #[test]
    fn test_repeated_header_keeps_value_order() {
        let h = headers(
            200,
            &[("Set-Cookie", "a=1"), ("Set-Cookie", "b=2"), ("Set-Cookie", "c=3")],
        );
        assert_eq!(
            &["a=1".to_string(), "b=2".to_string(), "c=3".to_string()],
            h.get("set-cookie")
        );
        assert_eq!(1, h.len());
    }

    #[test]
    fn test_missing_header_is_empty_slice() {
        let h = headers(404, &[]);
        assert!(h.get("WWW-Authenticate").is_empty());
        assert!(h.is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!("(empty headers)", headers(200, &[]).to_string());
        assert_eq!(
            "server: jetty",
            headers(200, &[("Server", "jetty")]).to_string()
        );
    }
}
