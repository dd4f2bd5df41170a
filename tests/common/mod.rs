#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use std::net::TcpListener;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub const EXERCISES_APP: &str = "6981cc8a4b3fbde2c92a2299";
pub const GOALS_APP: &str = "6981cc8f4250fc57a9a63a6e";
pub const MEASUREMENTS_APP: &str = "6981cc90bd34b0752d169796";
pub const SESSIONS_APP: &str = "6981cc906bdf8cfb3e2d5422";

/// In-memory stand-in for the hosted-records REST backend.
#[derive(Clone, Default)]
pub struct MockBackend {
    apps: Arc<Mutex<HashMap<String, Vec<(String, Value)>>>>,
    next_id: Arc<AtomicU64>,
    failing: Arc<Mutex<HashSet<String>>>,
    cookies: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Ids are zero-padded hex, so key order equals insertion order.
    pub fn insert(&self, app_id: &str, createdat: &str, fields: Value) -> String {
        let id = format!("{:024x}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let record = json!({ "createdat": createdat, "updatedat": null, "fields": fields });
        self.apps
            .lock()
            .unwrap()
            .entry(app_id.to_string())
            .or_default()
            .push((id.clone(), record));
        id
    }

    pub fn fail(&self, app_id: &str) {
        self.failing.lock().unwrap().insert(app_id.to_string());
    }

    pub fn count(&self, app_id: &str) -> usize {
        self.apps
            .lock()
            .unwrap()
            .get(app_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn fields(&self, app_id: &str, record_id: &str) -> Option<Value> {
        self.apps
            .lock()
            .unwrap()
            .get(app_id)?
            .iter()
            .find(|(id, _)| id == record_id)
            .map(|(_, record)| record["fields"].clone())
    }

    pub fn seen_cookies(&self) -> Vec<String> {
        self.cookies.lock().unwrap().clone()
    }

    fn check(&self, app_id: &str, headers: &axum::http::HeaderMap) -> Option<Response> {
        if let Some(cookie) = headers.get("cookie").and_then(|value| value.to_str().ok()) {
            self.cookies.lock().unwrap().push(cookie.to_string());
        }
        if self.failing.lock().unwrap().contains(app_id) {
            return Some((StatusCode::INTERNAL_SERVER_ERROR, "backend exploded").into_response());
        }
        None
    }
}

async fn list_records(
    State(backend): State<MockBackend>,
    Path(app_id): Path<String>,
    headers: axum::http::HeaderMap,
) -> Response {
    if let Some(failure) = backend.check(&app_id, &headers) {
        return failure;
    }
    let apps = backend.apps.lock().unwrap();
    let mut body = Map::new();
    for (id, record) in apps.get(&app_id).into_iter().flatten() {
        body.insert(id.clone(), record.clone());
    }
    Json(Value::Object(body)).into_response()
}

async fn create_record(
    State(backend): State<MockBackend>,
    Path(app_id): Path<String>,
    headers: axum::http::HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    if let Some(failure) = backend.check(&app_id, &headers) {
        return failure;
    }
    let fields = payload.get("fields").cloned().unwrap_or_else(|| json!({}));
    let id = backend.insert(&app_id, "2024-06-12T08:00:00", fields.clone());
    Json(json!({ "id": id, "createdat": "2024-06-12T08:00:00", "updatedat": null, "fields": fields }))
        .into_response()
}

async fn get_record(
    State(backend): State<MockBackend>,
    Path((app_id, record_id)): Path<(String, String)>,
    headers: axum::http::HeaderMap,
) -> Response {
    if let Some(failure) = backend.check(&app_id, &headers) {
        return failure;
    }
    let apps = backend.apps.lock().unwrap();
    let found = apps
        .get(&app_id)
        .and_then(|records| records.iter().find(|(id, _)| *id == record_id));
    match found {
        Some((id, record)) => {
            let mut body = record.clone();
            body["id"] = json!(id);
            Json(body).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no such record").into_response(),
    }
}

async fn update_record(
    State(backend): State<MockBackend>,
    Path((app_id, record_id)): Path<(String, String)>,
    headers: axum::http::HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    if let Some(failure) = backend.check(&app_id, &headers) {
        return failure;
    }
    let mut apps = backend.apps.lock().unwrap();
    let found = apps
        .get_mut(&app_id)
        .and_then(|records| records.iter_mut().find(|(id, _)| *id == record_id));
    let Some((_, record)) = found else {
        return (StatusCode::NOT_FOUND, "no such record").into_response();
    };
    if let (Some(existing), Some(Value::Object(patch))) =
        (record["fields"].as_object_mut(), payload.get("fields"))
    {
        for (key, value) in patch {
            existing.insert(key.clone(), value.clone());
        }
    }
    record["updatedat"] = json!("2024-06-12T09:00:00");
    Json(json!({ "id": record_id })).into_response()
}

async fn delete_record(
    State(backend): State<MockBackend>,
    Path((app_id, record_id)): Path<(String, String)>,
    headers: axum::http::HeaderMap,
) -> Response {
    if let Some(failure) = backend.check(&app_id, &headers) {
        return failure;
    }
    let mut apps = backend.apps.lock().unwrap();
    let Some(records) = apps.get_mut(&app_id) else {
        return (StatusCode::NOT_FOUND, "no such record").into_response();
    };
    let before = records.len();
    records.retain(|(id, _)| *id != record_id);
    if records.len() == before {
        return (StatusCode::NOT_FOUND, "no such record").into_response();
    }
    StatusCode::OK.into_response()
}

/// Serves the mock on its own runtime thread and returns the `/rest` base URL.
pub fn spawn_backend(backend: MockBackend) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock backend");
    listener.set_nonblocking(true).expect("nonblocking listener");
    let port = listener.local_addr().unwrap().port();

    let app = Router::new()
        .route("/rest/apps/:app_id/records", get(list_records).post(create_record))
        .route(
            "/rest/apps/:app_id/records/:record_id",
            get(get_record).patch(update_record).delete(delete_record),
        )
        .with_state(backend);

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("mock backend runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, app).await.expect("mock backend serve");
        });
    });

    format!("http://127.0.0.1:{port}/rest")
}
