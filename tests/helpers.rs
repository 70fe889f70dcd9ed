// Shared test helpers: a scripted transport standing in for the network.
//
// The client's transport seam is a trait, so tests inject canned responses
// instead of spinning up an HTTP server, and inspect exactly what the
// executor dispatched.

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::Mutex;

use restget::{
    HttpTransport, Method, ResponseHeaders, TransportError, TransportRequest, TransportResponse,
};

/// One request as the transport saw it.
#[derive(Debug, Clone)]
#[allow(dead_code)] // Used by other test files
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub follow_redirects: bool,
}

#[allow(dead_code)] // Used by other test files
impl RecordedRequest {
    /// First value sent for the named request header, if any.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

enum Step {
    Respond {
        status: u16,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    },
    Fail(String),
}

/// Transport that replays scripted responses in order and records every
/// request it is handed.
pub struct MockTransport {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

#[allow(dead_code)] // Used by other test files
impl MockTransport {
    pub fn new() -> Self {
        MockTransport {
            steps: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Scripts the next response.
    pub fn respond(self, status: u16, headers: &[(&str, &str)], body: &str) -> Self {
        self.steps.lock().unwrap().push_back(Step::Respond {
            status,
            headers: headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            body: body.as_bytes().to_vec(),
        });
        self
    }

    /// Scripts a connectivity failure for the next request.
    pub fn fail(self, message: &str) -> Self {
        self.steps
            .lock()
            .unwrap()
            .push_back(Step::Fail(message.to_string()));
        self
    }

    /// Everything dispatched so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for MockTransport {
    fn send(&self, request: TransportRequest<'_>) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method,
            url: request.url.to_string(),
            headers: request.headers.to_vec(),
            follow_redirects: request.follow_redirects,
        });
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left for request");
        match step {
            Step::Respond {
                status,
                headers,
                body,
            } => Ok(TransportResponse {
                headers: ResponseHeaders::new(status, headers),
                body: Box::new(Cursor::new(body)),
            }),
            Step::Fail(message) => Err(TransportError::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                message,
            ))),
        }
    }
}

/// Initializes test logging once; safe to call from every test.
#[allow(dead_code)] // Used by other test files
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
