//! Mock catalog backend lifecycle management
//!
//! Each test spawns its own axum server on a random port that mimics the
//! endpoints the admin client talks to, and records what it received.

use super::constants::*;
use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Knobs for a spawned backend
#[derive(Clone, Default)]
pub struct BackendOptions {
    /// Body returned by `GET /backup/export`
    pub export: Value,
    /// Delay before answering the export request
    pub export_delay: Option<Duration>,
    /// Delay before answering the restore request, after the upload was read
    pub restore_delay: Option<Duration>,
}

/// An upload received by the mock backend
#[derive(Clone, Debug)]
pub struct ReceivedUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct BackendState {
    options: BackendOptions,
    pub export_calls: AtomicUsize,
    pub restore_calls: AtomicUsize,
    pub last_restore: Mutex<Option<ReceivedUpload>>,
    pub last_import: Mutex<Option<(String, ReceivedUpload)>>,
    /// Live inquiry collection, seeded from the export
    pub inquiries: Mutex<Vec<Value>>,
}

/// Mock backend instance
///
/// When dropped, the server gracefully shuts down.
pub struct TestBackend {
    /// API base URL (e.g., "http://127.0.0.1:12345/api")
    pub base_url: String,

    pub state: Arc<BackendState>,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestBackend {
    /// Spawns a backend serving `export` from the export endpoint
    pub async fn spawn(export: Value) -> Self {
        Self::spawn_with(BackendOptions {
            export,
            ..Default::default()
        })
        .await
    }

    pub async fn spawn_with(options: BackendOptions) -> Self {
        let inquiries = collection(&options.export, "inquiries");
        let state = Arc::new(BackendState {
            options,
            inquiries: Mutex::new(inquiries),
            ..Default::default()
        });

        let app = Router::new()
            .route("/api/health", get(|| async { "ok" }))
            .route("/api/auth/login", post(login))
            .route("/api/backup/export", get(export))
            .route("/api/backup/restore", post(restore))
            .route("/api/backup/download", get(download_json))
            .route("/api/backup/download-excel", get(download_excel))
            .route("/api/backup/download-editable/{brand_id}", get(download_brand_editable))
            .route("/api/catalog/brands", get(list_brands))
            .route("/api/catalog/devices/{brand_id}", get(list_devices))
            .route("/api/catalog/services/{device_id}", get(list_services))
            .route("/api/inquiry/all", get(list_inquiries).delete(clear_inquiries))
            .route("/api/inquiry/{id}", put(update_inquiry).delete(delete_inquiry))
            .route("/api/catalog/upload", post(upload_catalog))
            .route("/api/catalog/brand/{brand_id}/upload", post(upload_brand))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Mock backend failed");
        });

        let backend = Self {
            base_url: format!("http://127.0.0.1:{}/api", port),
            state,
            _shutdown_tx: Some(shutdown_tx),
        };
        backend.wait_for_ready().await;
        backend
    }

    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Mock backend did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/health", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }

    pub fn restore_calls(&self) -> usize {
        self.state.restore_calls.load(Ordering::SeqCst)
    }

    pub fn last_restore(&self) -> Option<ReceivedUpload> {
        self.state.last_restore.lock().unwrap().clone()
    }

    /// Upload path and file of the last bulk import
    pub fn last_import(&self) -> Option<(String, ReceivedUpload)> {
        self.state.last_import.lock().unwrap().clone()
    }

    pub fn inquiries(&self) -> Vec<Value> {
        self.state.inquiries.lock().unwrap().clone()
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn require_admin(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {}", ADMIN_TOKEN);
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(error(StatusCode::UNAUTHORIZED, "Not authorized, token failed")),
    }
}

async fn read_file_field(mut multipart: Multipart) -> Option<ReceivedUpload> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("").to_string();
        let bytes = field.bytes().await.ok()?.to_vec();
        return Some(ReceivedUpload { file_name, bytes });
    }
    None
}

async fn login(Json(body): Json<Value>) -> Response {
    let email = body.get("email").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);
    if email == Some(ADMIN_EMAIL) && password == Some(ADMIN_PASSWORD) {
        Json(json!({ "success": true, "token": ADMIN_TOKEN, "user": { "role": "admin" } }))
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Invalid Credentials" })),
        )
            .into_response()
    }
}

async fn export(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    state.export_calls.fetch_add(1, Ordering::SeqCst);
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    if let Some(delay) = state.options.export_delay {
        tokio::time::sleep(delay).await;
    }
    Json(state.options.export.clone()).into_response()
}

async fn restore(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    state.restore_calls.fetch_add(1, Ordering::SeqCst);
    if let Err(response) = require_admin(&headers) {
        return response;
    }

    let Some(upload) = read_file_field(multipart).await else {
        return error(StatusCode::BAD_REQUEST, "No file uploaded");
    };
    let is_zip = upload.bytes.starts_with(b"PK\x03\x04");
    *state.last_restore.lock().unwrap() = Some(upload);

    if let Some(delay) = state.options.restore_delay {
        tokio::time::sleep(delay).await;
    }

    if is_zip {
        Json(json!({ "message": "Database restored successfully" })).into_response()
    } else {
        error(StatusCode::BAD_REQUEST, "Invalid backup file")
    }
}

async fn download_json(headers: HeaderMap) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    (
        [(header::CONTENT_DISPOSITION, "attachment; filename=backup-2026-03-14.json")],
        r#"{"brands":[]}"#,
    )
        .into_response()
}

async fn download_excel(headers: HeaderMap) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    let disposition = format!("attachment; filename=\"{}\"", EXCEL_REPORT_FILE_NAME);
    (
        [(header::CONTENT_DISPOSITION, disposition)],
        b"excel-report-bytes".to_vec(),
    )
        .into_response()
}

async fn download_brand_editable(
    headers: HeaderMap,
    Path(brand_id): Path<String>,
) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    if brand_id != BRAND_APPLE_ID {
        return error(StatusCode::NOT_FOUND, "Brand not found");
    }
    b"brand-editable-bytes".to_vec().into_response()
}

async fn upload_catalog(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    store_import(&state, &headers, "/catalog/upload".to_string(), multipart).await
}

async fn upload_brand(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(brand_id): Path<String>,
    multipart: Multipart,
) -> Response {
    let path = format!("/catalog/brand/{}/upload", brand_id);
    store_import(&state, &headers, path, multipart).await
}

async fn store_import(
    state: &BackendState,
    headers: &HeaderMap,
    path: String,
    multipart: Multipart,
) -> Response {
    if let Err(response) = require_admin(headers) {
        return response;
    }
    let Some(upload) = read_file_field(multipart).await else {
        return error(StatusCode::BAD_REQUEST, "No file uploaded");
    };
    let size = upload.bytes.len();
    *state.last_import.lock().unwrap() = Some((path, upload));
    Json(json!({ "message": format!("Imported {} bytes of catalog data", size) })).into_response()
}

// ============================================================================
// Catalog listings
// ============================================================================

/// A collection of the served export's `data`, empty when absent
fn collection(export: &Value, key: &str) -> Vec<Value> {
    export["data"][key].as_array().cloned().unwrap_or_default()
}

fn listing(items: Vec<Value>) -> Response {
    Json(json!({ "success": true, "data": items })).into_response()
}

fn filtered(export: &Value, key: &str, field: &str, id: &str) -> Vec<Value> {
    collection(export, key)
        .into_iter()
        .filter(|item| item[field].as_str() == Some(id))
        .collect()
}

async fn list_brands(State(state): State<Arc<BackendState>>) -> Response {
    listing(collection(&state.options.export, "brands"))
}

async fn list_devices(
    State(state): State<Arc<BackendState>>,
    Path(brand_id): Path<String>,
) -> Response {
    listing(filtered(&state.options.export, "devices", "brand", &brand_id))
}

async fn list_services(
    State(state): State<Arc<BackendState>>,
    Path(device_id): Path<String>,
) -> Response {
    listing(filtered(&state.options.export, "services", "device", &device_id))
}

// ============================================================================
// Inquiries
// ============================================================================

async fn list_inquiries(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    listing(state.inquiries.lock().unwrap().clone())
}

async fn update_inquiry(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    let mut inquiries = state.inquiries.lock().unwrap();
    let Some(inquiry) = inquiries.iter_mut().find(|i| i["_id"].as_str() == Some(id.as_str()))
    else {
        return error(StatusCode::NOT_FOUND, "Inquiry not found");
    };
    if let (Some(target), Some(update)) = (inquiry.as_object_mut(), body.as_object()) {
        for (key, value) in update {
            target.insert(key.clone(), value.clone());
        }
    }
    Json(json!({ "success": true, "data": inquiry.clone() })).into_response()
}

async fn delete_inquiry(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    let mut inquiries = state.inquiries.lock().unwrap();
    let before = inquiries.len();
    inquiries.retain(|i| i["_id"].as_str() != Some(id.as_str()));
    if inquiries.len() == before {
        return error(StatusCode::NOT_FOUND, "Inquiry not found");
    }
    Json(json!({ "success": true, "message": "Inquiry deleted" })).into_response()
}

async fn clear_inquiries(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    let mut inquiries = state.inquiries.lock().unwrap();
    let count = inquiries.len();
    inquiries.clear();
    Json(json!({ "success": true, "message": format!("Deleted {} inquiries", count) }))
        .into_response()
}
