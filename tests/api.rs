mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{boat, piece, temp_config};
use seat_race_ranking::api::routes::create_router;
use seat_race_ranking::services::server::build_state;

fn app() -> (Router, tempfile::TempDir) {
    let (config, dir) = temp_config();
    let state = Arc::new(build_state(config).unwrap());
    (create_router(state), dir)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_rank_flow_over_http() {
    let (app, _dir) = app();

    for (id, name) in [(1, "Ada"), (2, "Bea"), (3, "Cat"), (4, "Dot"), (5, "Eve")] {
        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/teams/7/athletes",
            Some(json!({ "id": id, "name": name, "side": "port" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = send(&app, Method::GET, "/api/teams/7/rankings", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let pieces = [
        piece(1, 0, vec![boat("1", &[1, 3], 102.0), boat("2", &[2, 4], 100.0)]),
        piece(1, 10, vec![boat("1", &[1, 4], 100.0), boat("2", &[2, 3], 101.0)]),
    ];
    for p in &pieces {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/teams/7/pieces",
            Some(serde_json::to_value(p).unwrap()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].as_i64().unwrap() > 0);
    }

    let (status, history) = send(&app, Method::GET, "/api/teams/7/pieces", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 2);
    assert_eq!(history[1]["kind"]["type"], "swap");

    let (status, snapshot) =
        send(&app, Method::POST, "/api/teams/7/rankings/recalculate", None).await;
    assert_eq!(status, StatusCode::OK);
    let athletes = snapshot["athletes"].as_array().unwrap();
    assert_eq!(athletes.len(), 5);
    assert_eq!(athletes[0]["athleteId"], 4);
    assert_eq!(athletes[0]["rank"], 1);
    assert_eq!(athletes[4]["athleteId"], 5);
    assert_eq!(athletes[4]["racesCompleted"], 0);
    assert_eq!(athletes[4]["confidenceTier"], "low");
    assert_eq!(snapshot["converged"], true);

    let (status, fetched) = send(&app, Method::GET, "/api/teams/7/rankings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["snapshotId"], snapshot["snapshotId"]);
}

#[tokio::test]
async fn test_double_swap_returns_bad_request() {
    let (app, _dir) = app();
    let first = piece(1, 0, vec![boat("1", &[1, 2], 100.0), boat("2", &[3, 4], 100.0)]);
    let double = piece(1, 5, vec![boat("1", &[3, 4], 100.0), boat("2", &[1, 2], 100.0)]);

    send(&app, Method::POST, "/api/teams/1/pieces", Some(serde_json::to_value(&first).unwrap())).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/teams/1/pieces",
        Some(serde_json::to_value(&double).unwrap()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    let (_, history) = send(&app, Method::GET, "/api/teams/1/pieces", None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_schedule_endpoint() {
    let (app, _dir) = app();

    let (status, schedule) = send(
        &app,
        Method::POST,
        "/api/schedule",
        Some(json!({
            "athleteIds": [11, 12, 13, 14, 15, 16, 17, 18],
            "boatConfig": { "boats": 2, "seatsPerBoat": 4 },
            "pieceCount": 8
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(schedule["coverage"], "connected");
    assert_eq!(schedule["pieces"].as_array().unwrap().len(), 8);
    assert_eq!(schedule["pieces"][0]["swapPair"], Value::Null);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/schedule",
        Some(json!({
            "athleteIds": [1, 2, 3],
            "boatConfig": { "boats": 2, "seatsPerBoat": 2 },
            "pieceCount": 4
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "insufficient_roster");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/schedule",
        Some(json!({
            "athleteIds": [1, 2, 3, 4],
            "boatConfig": { "boats": 1, "seatsPerBoat": 2 },
            "pieceCount": 4
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/schedule",
        Some(json!({
            "athleteIds": [11, 12, 13, 14, 15, 16, 17, 18],
            "boatConfig": { "boats": 2, "seatsPerBoat": 4 },
            "pieceCount": 1_000_000_000u64
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}
