//! In-process stand-in for the orchestration API.
//!
//! Behaviour keyed on the submitted topic:
//! - `"slow"` sleeps before answering
//! - `"fail"` answers 500 with a FastAPI-style `detail`
//! - `"garbled"` answers 200 with a plain-text body
//! - anything else renders a plan/assets/final_mp4 payload

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

pub fn router() -> Router {
    Router::new()
        .route("/v1/generate", post(generate))
        .route("/v1/plan", post(plan))
        .route("/v1/anim", post(anim))
        .route("/v1/voice", post(voice))
        .route("/v1/captions", post(captions))
        .route("/v1/images", post(images))
}

/// Serve the mock on an ephemeral port inside the current runtime.
pub async fn spawn_mock() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock orchestrator");
    let addr = listener.local_addr().expect("mock address");
    tokio::spawn(async move {
        axum::serve(listener, router()).await.expect("mock server");
    });
    addr
}

/// Serve the mock from a background thread, for blocking CLI tests.
pub fn spawn_mock_blocking() -> SocketAddr {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("mock runtime");
        runtime.block_on(async move {
            let addr = spawn_mock().await;
            tx.send(addr).expect("report mock address");
            std::future::pending::<()>().await;
        });
    });
    rx.recv_timeout(Duration::from_secs(10))
        .expect("mock orchestrator did not start")
}

async fn generate(Json(body): Json<Value>) -> Response {
    let topic = body["topic"].as_str().unwrap_or_default().to_string();
    match topic.as_str() {
        "fail" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Narration invalid or too short; aborting render."})),
        )
            .into_response(),
        "garbled" => (StatusCode::OK, "ok").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_millis(400)).await;
            Json(rendered(&topic, &body)).into_response()
        }
        _ => Json(rendered(&topic, &body)).into_response(),
    }
}

fn rendered(topic: &str, body: &Value) -> Value {
    let slug = topic.replace(' ', "_");
    json!({
        "plan": {"topic": topic, "sections": [], "narration_full": ""},
        "assets": {
            "clips": ["data/anim/beat_0.mp4", "data/anim/beat_1.mp4"],
            "wav": "data/voice/narration.wav",
            "srt": "data/voice/narration.srt"
        },
        "final_mp4": format!("data/final/{slug}.mp4"),
        "share": {"url": format!("https://cdn.example.com/{slug}.mp4")},
        "echo": body.clone()
    })
}

async fn plan(Json(body): Json<Value>) -> Json<Value> {
    let topic = body["topic"].as_str().unwrap_or_default();
    Json(json!({
        "topic": topic,
        "length_min": body["length"]["value"],
        "sections": [
            {"id": "hook", "goal": "Grab attention", "beats": [
                {"type": "layout", "narration": "Why do tides happen?", "duration_s": 6.0}
            ]},
            {"id": "core", "goal": "Explain gravity", "beats": [
                {"type": "diagram", "narration": "The moon pulls.", "duration_s": 6.0},
                {"type": "timeline", "narration": "Twice a day.", "duration_s": 6.0}
            ]}
        ],
        "narration_full": "Why do tides happen? The moon pulls. Twice a day."
    }))
}

async fn anim(Json(body): Json<Value>) -> Json<Value> {
    let kind = body["spec"]["kind"].as_str().unwrap_or("diagram");
    Json(json!({"mp4": format!("data/anim/{kind}.mp4")}))
}

async fn voice(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["model_path"].as_str().unwrap_or_default().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "model_path required"})),
        );
    }
    (StatusCode::OK, Json(json!({"wav": "data/voice/out.wav"})))
}

async fn captions(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let wav = params.get("wav").cloned().unwrap_or_default();
    Json(json!({"srt": wav.replace(".wav", ".srt")}))
}

async fn images(Json(tasks): Json<Vec<Value>>) -> Json<Value> {
    let paths: Vec<String> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| format!("data/images/{i}_{}.png", t["seed"]))
        .collect();
    Json(json!({"paths": paths}))
}
