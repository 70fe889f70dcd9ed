//! Caller-supplied consumers for successful response bodies.

use std::borrow::Cow;
use std::fmt;
use std::io::Write;

use crate::headers::ResponseHeaders;

/// Consumer of a successful response: header metadata first, then body
/// bytes.
///
/// The executor calls [`response_stream`](ResponseSink::response_stream)
/// only after a 200 status has been observed; error bodies go into
/// [`HttpStatusError`](crate::HttpStatusError) instead, so a sink never
/// sees a failed response.
pub trait ResponseSink {
    /// Value for the outbound `Accept` header: a single mime type or a
    /// comma-separated list with quality factors. `None` sends no header.
    fn accept(&self) -> Option<&str> {
        None
    }

    /// Hands over the received headers and returns where body bytes should
    /// be written. The executor drains the whole body into the returned
    /// writer before the call completes.
    fn response_stream(&mut self, headers: &ResponseHeaders) -> &mut dyn Write;
}

/// Sink that buffers the whole body in memory.
///
/// Convenient for small text responses: exposes the headers snapshot and
/// the body decoded as UTF-8. When the executor classifies a response as an
/// unsupported non-error status (see the classification rules on
/// [`RestClient::get`](crate::RestClient::get)) the sink is never touched,
/// so [`headers`](BufferedResponse::headers) stays `None`.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    accept: Option<String>,
    headers: Option<ResponseHeaders>,
    buffer: Vec<u8>,
}

impl BufferedResponse {
    /// Empty buffer, no `Accept` preference.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer that asks the server for the given `Accept` value.
    pub fn with_accept(accept: impl Into<String>) -> Self {
        BufferedResponse {
            accept: Some(accept.into()),
            ..Self::default()
        }
    }

    /// Headers of the consumed response, `None` until a body arrived.
    pub fn headers(&self) -> Option<&ResponseHeaders> {
        self.headers.as_ref()
    }

    /// Raw body bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Body decoded as UTF-8 text (lossy).
    pub fn body(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.buffer)
    }
}

impl ResponseSink for BufferedResponse {
    fn accept(&self) -> Option<&str> {
        self.accept.as_deref()
    }

    fn response_stream(&mut self, headers: &ResponseHeaders) -> &mut dyn Write {
        self.headers = Some(headers.clone());
        &mut self.buffer
    }
}

impl fmt::Display for BufferedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffers_headers_then_body() {
        let mut sink = BufferedResponse::new();
        let headers = ResponseHeaders::new(
            200,
            [("Content-Type".to_string(), "text/plain".to_string())],
        );
        let stream = sink.response_stream(&headers);
        stream.write_all(b"hello").unwrap();

        assert_eq!("hello", sink.body());
        assert_eq!("hello", sink.to_string());
        assert_eq!(Some("text/plain"), sink.headers().unwrap().content_type());
    }

    #[test]
    fn test_accept_preference() {
        assert_eq!(None, BufferedResponse::new().accept());
        let sink = BufferedResponse::with_accept("application/json");
        assert_eq!(Some("application/json"), sink.accept());
    }

    #[test]
    fn test_untouched_sink_has_no_headers() {
        let sink = BufferedResponse::new();
        assert!(sink.headers().is_none());
        assert!(sink.bytes().is_empty());
    }
}
