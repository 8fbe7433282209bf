use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use serde_json::{json, Value};

use clob_latency_probe::{discovery, ProbeConfig, RunError, Runner};

struct MockApi {
    events: Value,
    book_fails: bool,
}

async fn events(State(api): State<Arc<MockApi>>) -> Json<Value> {
    Json(api.events.clone())
}

// Only the token id "good" is accepted, mirroring a CLOB that rejects stale ids.
async fn price(Query(q): Query<HashMap<String, String>>) -> Response {
    if q.get("token_id").map(String::as_str) == Some("good") {
        Json(json!({"price": "0.42"})).into_response()
    } else {
        (StatusCode::NOT_FOUND, "no market found").into_response()
    }
}

async fn book(State(api): State<Arc<MockApi>>) -> Response {
    if api.book_fails {
        (StatusCode::INTERNAL_SERVER_ERROR, "book service\nmelted down").into_response()
    } else {
        Json(json!({"bids": [], "asks": []})).into_response()
    }
}

async fn midpoint() -> Json<Value> {
    Json(json!({"mid": "0.5"}))
}

async fn serve(api: MockApi) -> SocketAddr {
    let app = axum::Router::new()
        .route("/events", get(events))
        .route("/price", get(price))
        .route("/book", get(book))
        .route("/midpoint", get(midpoint))
        .with_state(Arc::new(api));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config_for(addr: SocketAddr, out_dir: &std::path::Path) -> ProbeConfig {
    let mut cfg = ProbeConfig::sample();
    cfg.gamma_url = format!("http://{addr}");
    cfg.clob_url = format!("http://{addr}");
    cfg.iterations = 2;
    cfg.delay_ms = 0;
    cfg.region = "test".into();
    cfg.out_dir = out_dir.to_path_buf();
    cfg
}

fn events_with_encoded_good() -> Value {
    json!([{
        "slug": "big-event",
        "markets": [{
            "slug": "big-market",
            "question": "Will it settle?",
            "clobTokenIds": "[\"good\", \"other\"]"
        }]
    }])
}

#[tokio::test]
async fn full_run_writes_contract_report() {
    let addr = serve(MockApi {
        events: events_with_encoded_good(),
        book_fails: false,
    })
    .await;
    let dir = tempfile::tempdir().unwrap();

    let runner = Runner::new(config_for(addr, dir.path())).unwrap();
    let path = runner.run().await.unwrap();

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["meta"]["region"], "test");
    assert_eq!(doc["meta"]["slug"], "big-event");
    assert_eq!(doc["meta"]["tokenId"], "good");

    let log = doc["detailed_log"].as_array().unwrap();
    assert_eq!(log.len(), 2 * 3);
    assert!(log.iter().all(|m| m["success"] == "YES"));
    assert_eq!(log[0]["type"], "CLOB Book");
    assert_eq!(log[1]["type"], "CLOB Price");
    assert_eq!(log[2]["type"], "CLOB Midpoint");
    assert_eq!(log[3]["id"], 2);

    let summary = doc["summary"].as_array().unwrap();
    assert_eq!(summary.len(), 3);
    assert!(summary.iter().all(|s| s["status"] == "OK"));
    assert!(summary.iter().all(|s| s["samples"] == 2));
}

#[tokio::test]
async fn dead_endpoint_yields_fail_summary_not_abort() {
    let addr = serve(MockApi {
        events: events_with_encoded_good(),
        book_fails: true,
    })
    .await;
    let dir = tempfile::tempdir().unwrap();

    let runner = Runner::new(config_for(addr, dir.path())).unwrap();
    let path = runner.run().await.unwrap();

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let log = doc["detailed_log"].as_array().unwrap();
    assert_eq!(log.len(), 6);

    let summary = doc["summary"].as_array().unwrap();
    let book = summary.iter().find(|s| s["type"] == "CLOB Book").unwrap();
    assert_eq!(book["status"], "FAIL");
    let err = book["error"].as_str().unwrap();
    assert!(err.starts_with("HTTP 500:"), "got {err:?}");
    assert!(!err.contains('\n'));
    assert!(book.get("min").is_none());
    assert!(summary
        .iter()
        .filter(|s| s["type"] != "CLOB Book")
        .all(|s| s["status"] == "OK"));
}

#[tokio::test]
async fn discovery_falls_through_rejected_and_malformed_listings() {
    let addr = serve(MockApi {
        events: json!([
            {
                "slug": "rejected-event",
                "markets": [{"slug": "m1", "question": "q1", "clobTokenIds": ["stale"]}]
            },
            {
                "slug": "malformed-event",
                "markets": [{"slug": "m2", "question": "q2", "clobTokenIds": "not json"}]
            },
            {
                "slug": "marketless-event",
                "markets": []
            },
            {
                "slug": "live-event",
                "markets": [{"slug": "m3", "question": "q3", "clobTokenIds": "[\"good\"]"}]
            }
        ]),
        book_fails: false,
    })
    .await;

    let client = reqwest::Client::new();
    let base = format!("http://{addr}");
    let target = discovery::find_valid_market(&client, &base, &base)
        .await
        .unwrap();
    assert_eq!(target.token_id, "good");
    assert_eq!(target.slug, "live-event");
    assert_eq!(target.question, "q3");
}

#[tokio::test]
async fn discovery_exhaustion_is_fatal() {
    let addr = serve(MockApi {
        events: json!([{
            "slug": "e",
            "markets": [{"slug": "m", "question": "q", "clobTokenIds": ["stale"]}]
        }]),
        book_fails: false,
    })
    .await;

    let client = reqwest::Client::new();
    let base = format!("http://{addr}");
    let err = discovery::find_valid_market(&client, &base, &base)
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::NoValidMarket));
}

#[tokio::test]
async fn empty_listings_is_fatal() {
    let addr = serve(MockApi {
        events: json!([]),
        book_fails: false,
    })
    .await;

    let client = reqwest::Client::new();
    let base = format!("http://{addr}");
    let err = discovery::find_valid_market(&client, &base, &base)
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::NoListings));
}

#[tokio::test]
async fn rejected_override_aborts_before_any_file() {
    let addr = serve(MockApi {
        events: events_with_encoded_good(),
        book_fails: false,
    })
    .await;
    let dir = tempfile::tempdir().unwrap();

    let mut cfg = config_for(addr, dir.path());
    cfg.token_id = Some("stale".into());

    let runner = Runner::new(cfg).unwrap();
    let err = runner.run().await.unwrap_err();
    let run_err = err.downcast::<RunError>().unwrap();
    assert!(matches!(
        run_err,
        RunError::OverrideRejected { ref token_id, status: 404 } if token_id == "stale"
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn accepted_override_skips_discovery() {
    // No /events fixture needed: the route would 200, but discovery must not run.
    let addr = serve(MockApi {
        events: json!("never a valid listings payload"),
        book_fails: false,
    })
    .await;
    let dir = tempfile::tempdir().unwrap();

    let mut cfg = config_for(addr, dir.path());
    cfg.token_id = Some("good".into());

    let runner = Runner::new(cfg).unwrap();
    let path = runner.run().await.unwrap();
    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["meta"]["slug"], "manual-override");
    assert_eq!(doc["meta"]["tokenId"], "good");
}
