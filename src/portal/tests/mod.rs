// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::types::Identifier;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JOB_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <body>
    <form id="filter" method="post">
      <input type="hidden" name="csrf_fhci" value="tok123">
      <select name="company"><option value="all">All</option></select>
    </form>
  </body>
</html>"#;

fn client_for(server: &MockServer) -> PortalClient {
    let config = PortalConfig {
        base_url: server.uri(),
        ..Default::default()
    };
    PortalClient::new(config, Some(Duration::from_secs(5))).unwrap()
}

// --- token extraction ---

#[test]
fn extract_token_reads_hidden_input_value() {
    let token = extract_token(JOB_PAGE, "csrf_fhci").unwrap();
    assert_eq!(token.as_str(), "tok123");
}

#[test]
fn extract_token_missing_input_is_none() {
    assert!(extract_token("<html><body><p>maintenance</p></body></html>", "csrf_fhci").is_none());
    assert!(extract_token(JOB_PAGE, "csrf_other").is_none());
}

#[test]
fn extract_token_input_without_value_is_none() {
    let html = r#"<form><input type="hidden" name="csrf_fhci"></form>"#;
    assert!(extract_token(html, "csrf_fhci").is_none());
}

#[test]
fn extract_token_takes_first_match() {
    let html = r#"<input name="csrf_fhci" value="first"><input name="csrf_fhci" value="second">"#;
    assert_eq!(extract_token(html, "csrf_fhci").unwrap().as_str(), "first");
}

#[tokio::test]
async fn fetch_token_parses_job_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job"))
        .respond_with(ResponseTemplate::new(200).set_body_string(JOB_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let token = client_for(&server).fetch_token().await.unwrap();
    assert_eq!(token, Token::new("tok123"));
}

#[tokio::test]
async fn fetch_token_without_input_reports_token_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    match client_for(&server).fetch_token().await.unwrap_err() {
        Error::TokenNotFound { field } => assert_eq!(field, "csrf_fhci"),
        other => panic!("expected TokenNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_token_connection_refused_is_network_error() {
    // Reserve a free port, then release it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = PortalConfig {
        base_url: format!("http://127.0.0.1:{}", port),
        ..Default::default()
    };
    let client = PortalClient::new(config, Some(Duration::from_secs(2))).unwrap();

    let err = client.fetch_token().await.unwrap_err();
    assert!(err.is_transport(), "expected transport error, got {err:?}");
}

// --- detail fetch ---

#[tokio::test]
async fn fetch_detail_sends_token_as_field_and_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/job/get_detail_vac"))
        .and(header("cookie", "csrf_cookie_fhci=tok123"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("csrf_fhci=tok123&id=V-17"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "vacancy_id": "V-17",
            "title": "Data Engineer",
            "quota": 3,
            "remote": false,
            "closing": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server)
        .fetch_detail(&Identifier::new("V-17"), &Token::new("tok123"))
        .await
        .unwrap();

    assert_eq!(record["title"], "Data Engineer");
    assert_eq!(record["quota"], 3);
    assert!(record["closing"].is_null());
    assert_eq!(record.len(), 5);
}

#[tokio::test]
async fn fetch_detail_url_encodes_form_values() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/job/get_detail_vac"))
        .and(body_string("csrf_fhci=a%2Bb%3D&id=12+34"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server)
        .fetch_detail(&Identifier::new("12 34"), &Token::new("a+b="))
        .await
        .unwrap();
    assert_eq!(record["ok"], true);
}

#[tokio::test]
async fn fetch_detail_decodes_body_regardless_of_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/job/get_detail_vac"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"status": "error"})))
        .mount(&server)
        .await;

    let record = client_for(&server)
        .fetch_detail(&Identifier::new("1"), &Token::new("t"))
        .await
        .unwrap();
    assert_eq!(record["status"], "error");
}

#[tokio::test]
async fn fetch_detail_rejects_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/job/get_detail_vac"))
        .respond_with(ResponseTemplate::new(403).set_body_string("<html>Forbidden</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_detail(&Identifier::new("1"), &Token::new("t"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Serialization(_)), "got {err:?}");
}

#[tokio::test]
async fn fetch_detail_rejects_null_and_arrays() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string("csrf_fhci=t&id=null"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string("csrf_fhci=t&id=array"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[1,2]"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    for (id, kind) in [("null", "null"), ("array", "array")] {
        match client
            .fetch_detail(&Identifier::new(id), &Token::new("t"))
            .await
            .unwrap_err()
        {
            Error::UnexpectedShape(msg) => assert!(msg.contains(kind), "{msg}"),
            other => panic!("expected UnexpectedShape, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn fetch_detail_ignores_bytes_after_the_json_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/job/get_detail_vac"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{\"vacancy_id\":\"7\"}\n<!-- rendered in 0.02s -->"),
        )
        .mount(&server)
        .await;

    let record = client_for(&server)
        .fetch_detail(&Identifier::new("7"), &Token::new("t"))
        .await
        .unwrap();
    assert_eq!(record["vacancy_id"], "7");
    assert_eq!(record.len(), 1);
}

#[test]
fn decode_record_takes_first_value_only() {
    let record = detail::decode_record(br#"{"a":1} {"b":2}"#).unwrap();
    assert_eq!(record.len(), 1);
    assert_eq!(record["a"], 1);
}

#[test]
fn decode_record_empty_body_is_unexpected_shape() {
    for body in [&b""[..], &b"  \n"[..]] {
        let err = detail::decode_record(body).unwrap_err();
        assert!(matches!(err, Error::UnexpectedShape(_)), "got {err:?}");
    }
}

// --- listing fetch ---

#[tokio::test]
async fn fetch_listing_returns_result_objects() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/job/loadRecord"))
        .and(header("cookie", "csrf_cookie_fhci=tok123"))
        .and(body_string("csrf_fhci=tok123&company=all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "result": [
                    {"vacancy_id": "10", "company": "PT Alpha"},
                    {"vacancy_id": "11", "company": "PT Beta"}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let listing = client_for(&server)
        .fetch_listing(&Token::new("tok123"))
        .await
        .unwrap();

    assert_eq!(listing.len(), 2);
    assert_eq!(listing[1]["company"], "PT Beta");
}

#[test]
fn decode_listing_skips_non_objects() {
    let body = br#"{"data":{"result":[{"vacancy_id":"1"},"junk",null,{"vacancy_id":"2"}]}}"#;
    let listing = listing::decode_listing(body).unwrap();
    assert_eq!(listing.len(), 2);
}

#[test]
fn decode_listing_ignores_trailing_bytes() {
    let body = b"{\"data\":{\"result\":[{\"vacancy_id\":\"1\"}]}}\n<!-- debug -->";
    let listing = listing::decode_listing(body).unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0]["vacancy_id"], "1");
}

#[test]
fn decode_listing_without_result_is_empty() {
    let listing = listing::decode_listing(br#"{"data":{}}"#).unwrap();
    assert!(listing.is_empty());
}

#[test]
fn decode_listing_without_envelope_fails() {
    let err = listing::decode_listing(br#"{"result":[]}"#).unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
}

#[test]
fn decode_listing_with_only_junk_entries_fails() {
    let err = listing::decode_listing(br#"{"data":{"result":[1,2,3]}}"#).unwrap_err();
    assert!(matches!(err, Error::UnexpectedShape(_)));
}

#[test]
fn cookie_header_uses_configured_name() {
    let config = PortalConfig {
        cookie_name: "xsrf".into(),
        ..Default::default()
    };
    let client = PortalClient::new(config, None).unwrap();
    assert_eq!(client.cookie_header(&Token::new("abc")), "xsrf=abc");
}
