//! Validation tests: every rejection body, check ordering, and the exact
//! round-trip contract.

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::json;

mod common;

const REVERSED: &str = r#"{"data":"gnirts emos"}"#;
const NOT_JSON_HEADER: &str = r#"{"error":"Content-Type header is not application/json"}"#;
const BODY_TOO_LARGE: &str =
    r#"{"error":"Can't read request body: http: request body too large"}"#;
const BODY_EMPTY: &str = r#"{"error":"Request body must not be empty"}"#;
const BADLY_FORMED: &str =
    r#"{"error":"Request body contains badly-formed JSON (at position 1)"}"#;
const INTEGER_PAYLOAD: &str = r#"{"error":"data is an int and not a string"}"#;

/// One mock backend plus the balancer in front of it, with time to let the
/// first health sweep land.
async fn start_stack(backend_port: u16, proxy_port: u16) -> String {
    let backend_addr: SocketAddr = format!("127.0.0.1:{}", backend_port).parse().unwrap();
    let proxy_addr: SocketAddr = format!("127.0.0.1:{}", proxy_port).parse().unwrap();

    common::start_business_server(backend_addr).await;
    common::start_balancer(common::test_config(proxy_addr, &[backend_addr])).await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    format!("http://{}", proxy_addr)
}

#[tokio::test]
async fn round_trip_reverses_the_string() {
    let url = start_stack(27101, 27102).await;
    let client = common::client();

    // Identical requests against a stable topology stay identical.
    for _ in 0..3 {
        let res = client
            .post(&url)
            .json(&json!({ "data": "some string" }))
            .send()
            .await
            .expect("balancer unreachable");
        assert_eq!(res.status(), 200);
        assert_eq!(res.text().await.unwrap(), REVERSED);
    }
}

#[tokio::test]
async fn wrong_content_type_wins_over_everything_else() {
    let url = start_stack(27111, 27112).await;
    let client = common::client();

    let res = client
        .post(&url)
        .header("Content-Type", "text/plain")
        .body(r#"{"data": "some string"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 415);
    assert_eq!(res.text().await.unwrap(), NOT_JSON_HEADER);

    // Wrong Content-Type AND an oversized body: first check wins.
    let oversized = "A".repeat(1_048_577);
    let res = client
        .post(&url)
        .header("Content-Type", "text/plain")
        .body(oversized)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 415);
    assert_eq!(res.text().await.unwrap(), NOT_JSON_HEADER);
}

#[tokio::test]
async fn body_shape_rejections() {
    let url = start_stack(27121, 27122).await;
    let client = common::client();

    // Empty body.
    let res = client
        .post(&url)
        .header("Content-Type", "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), BODY_EMPTY);

    // An unquoted string is not JSON; the error points at byte 1.
    let res = client
        .post(&url)
        .header("Content-Type", "application/json")
        .body("some string")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), BADLY_FORMED);

    // Two JSON documents in one body.
    let res = client
        .post(&url)
        .header("Content-Type", "application/json")
        .body(r#"{"data":"a"} {"data":"b"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(
        res.text().await.unwrap(),
        r#"{"error":"Request body must only contain a single JSON object"}"#
    );

    // A valid JSON value that is not an object.
    let res = client
        .post(&url)
        .header("Content-Type", "application/json")
        .body(r#""quoted""#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(
        res.text().await.unwrap(),
        r#"{"error":"Request body must contain a JSON object"}"#
    );
}

#[tokio::test]
async fn body_size_boundary() {
    let url = start_stack(27131, 27132).await;
    let client = common::client();

    // `{"data":"…"}` wrapping adds 11 bytes; this body is exactly 1 MiB.
    let at_limit = format!(r#"{{"data":"{}"}}"#, "A".repeat(1_048_565));
    assert_eq!(at_limit.len(), 1_048_576);
    let res = client
        .post(&url)
        .header("Content-Type", "application/json")
        .body(at_limit.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    // All-A data reverses to itself.
    assert_eq!(res.text().await.unwrap(), at_limit);

    // One byte over the ceiling.
    let over_limit = format!(r#"{{"data":"{}"}}"#, "A".repeat(1_048_566));
    let res = client
        .post(&url)
        .header("Content-Type", "application/json")
        .body(over_limit)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 413);
    assert_eq!(res.text().await.unwrap(), BODY_TOO_LARGE);
}

#[tokio::test]
async fn data_field_rejections() {
    let url = start_stack(27141, 27142).await;
    let client = common::client();

    // A JSON number, a digit-only string, and a missing field are all ints
    // to the business contract.
    for body in [
        json!({ "data": 100 }),
        json!({ "data": "12345" }),
        json!({}),
    ] {
        let res = client.post(&url).json(&body).send().await.unwrap();
        assert_eq!(res.status(), 400, "body: {}", body);
        assert_eq!(res.text().await.unwrap(), INTEGER_PAYLOAD, "body: {}", body);
    }

    // Other non-string types name the observed type.
    let res = client
        .post(&url)
        .json(&json!({ "data": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(
        res.text().await.unwrap(),
        r#"{"error":"data is a bool and not a string"}"#
    );

    // Unknown fields are rejected by name.
    let res = client
        .post(&url)
        .json(&json!({ "data": "x", "extra": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(
        res.text().await.unwrap(),
        r#"{"error":"Request body contains unknown field \"extra\""}"#
    );
}
