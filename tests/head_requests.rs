//! HEAD reports raw metadata for the exact resource addressed: no redirect
//! following, no status classified as an error.

use std::sync::Arc;

use restget::{Method, RestClient, RestError};

mod helpers;
use helpers::{init_logging, MockTransport};

const ROOT: &str = "http://localhost:8080";

fn client_with(transport: Arc<MockTransport>) -> RestClient {
    RestClient::with_transport(ROOT, None, transport).unwrap()
}

#[test]
fn test_head_reports_raw_redirect_status() {
    init_logging();
    let transport = Arc::new(MockTransport::new().respond(302, &[("Location", "/x")], ""));
    let client = client_with(transport.clone());

    let headers = client.head("/").expect("302 is reported, not raised");
    assert_eq!(302, headers.status());
    assert_eq!(&["/x".to_string()], headers.get("Location"));

    let requests = transport.requests();
    assert_eq!(Method::Head, requests[0].method);
    assert_eq!(format!("{ROOT}/"), requests[0].url);
    assert!(!requests[0].follow_redirects, "HEAD never follows redirects");
}

#[test]
fn test_head_200_surfaces_content_type() {
    let transport = Arc::new(MockTransport::new().respond(
        200,
        &[("Content-Type", "application/xml"), ("Content-Length", "12")],
        "",
    ));
    let client = client_with(transport);

    let headers = client.head("/doc.xml").unwrap();
    assert_eq!(200, headers.status());
    assert_eq!(Some("application/xml"), headers.content_type());
    assert_eq!(&["12".to_string()], headers.get("content-length"));
}

#[test]
fn test_head_401_is_returned_not_raised() {
    let transport = Arc::new(MockTransport::new().respond(
        401,
        &[("WWW-Authenticate", "Basic realm=\"repos\"")],
        "",
    ));
    let client = client_with(transport.clone());

    let headers = client.head("/private").unwrap();
    assert_eq!(401, headers.status());
    // HEAD does not negotiate authentication
    assert_eq!(1, transport.requests().len());
    assert_eq!(None, transport.requests()[0].header("Authorization"));
}

#[test]
fn test_head_rejects_relative_uri_before_any_network() {
    let transport = Arc::new(MockTransport::new());
    let client = client_with(transport.clone());

    let err = client.head("no-slash").unwrap_err();
    assert!(matches!(err, RestError::InvalidArgument(_)));
    assert!(transport.requests().is_empty());
}

#[test]
fn test_head_transport_failure_propagates() {
    let transport = Arc::new(MockTransport::new().fail("dns failure"));
    let client = client_with(transport);

    let err = client.head("/").unwrap_err();
    assert!(matches!(err, RestError::Transport(_)));
}
