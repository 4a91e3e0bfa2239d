//! HTTP service: multipart OCR upload, liveness, per-account state.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path as UrlPath, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

use hudscan_core::models::config::HudscanConfig;
use hudscan_core::ocr::{OnnxOcrEngine, RecognitionEngine};
use hudscan_core::values::{build_fragments, ExtractedValues, ValueExtractor};
use hudscan_core::HudscanError;

use crate::state::StateStore;

#[derive(Clone)]
struct AppState {
    engine: Arc<Mutex<OnnxOcrEngine>>,
    extractor: Arc<ValueExtractor>,
    upload_dir: PathBuf,
    store: Arc<StateStore>,
}

/// Build the engine and state directories, then serve until shutdown.
pub async fn start_server(config: HudscanConfig) -> anyhow::Result<()> {
    let engine = OnnxOcrEngine::from_config(&config.models, config.ocr.clone())?;

    std::fs::create_dir_all(&config.server.upload_dir)?;
    let store = StateStore::new(config.server.state_dir.clone())?;

    let state = AppState {
        engine: Arc::new(Mutex::new(engine)),
        extractor: Arc::new(ValueExtractor::from_config(&config.extraction)),
        upload_dir: config.server.upload_dir.clone(),
        store: Arc::new(store),
    };

    let app = Router::new()
        .route("/ocr", post(ocr_handler))
        .route("/health", get(health_handler))
        .route("/state/:account", get(get_state_handler))
        .route("/state/:account", put(put_state_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("hudscan server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// POST /ocr - extract HUD values from an uploaded screenshot.
///
/// Accepts a multipart form with a `file` part. The upload is persisted
/// under the upload directory as `<uuid><extension>` and kept; the
/// response references the storage path alongside the value mapping.
async fn ocr_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, (StatusCode, String)> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or((StatusCode::BAD_REQUEST, "No file uploaded".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
        upload = Some((filename, data.to_vec()));
        break;
    }

    let Some((filename, data)) = upload else {
        return Err((StatusCode::BAD_REQUEST, "No file uploaded".to_string()));
    };
    if data.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Empty file".to_string()));
    }

    let extension = std::path::Path::new(&filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_else(|| ".png".to_string());
    let stored_path = state
        .upload_dir
        .join(format!("{}{}", Uuid::new_v4(), extension));

    tokio::fs::write(&stored_path, &data).await.map_err(|e| {
        warn!("Failed to save upload: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to save upload: {}", e),
        )
    })?;

    info!("Saved upload {} as {}", filename, stored_path.display());

    // The engine is blocking and single-instance; run it off the async
    // runtime behind its mutex.
    let engine = state.engine.clone();
    let extractor = state.extractor.clone();
    let values = tokio::task::spawn_blocking(move || -> Result<ExtractedValues, HudscanError> {
        let image = image::load_from_memory(&data)?;
        let engine = engine.blocking_lock();
        let ocr = engine.recognize(&image)?;
        let fragments = build_fragments(&ocr.detections);
        Ok(extractor.extract(&fragments))
    })
    .await
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("OCR task failed: {}", e),
        )
    })?
    .map_err(|e| {
        warn!("OCR failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, format!("OCR failed: {}", e))
    })?;

    Ok(Json(json!({
        "filename": filename,
        "path": stored_path.display().to_string(),
        "values": values,
    })))
}

/// GET /state/{account} - read per-account JSON state.
async fn get_state_handler(
    State(state): State<AppState>,
    UrlPath(account): UrlPath<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    if !StateStore::valid_account(&account) {
        return Err((StatusCode::BAD_REQUEST, "Invalid account name".to_string()));
    }
    state
        .store
        .get(&account)
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// PUT /state/{account} - replace per-account JSON state.
async fn put_state_handler(
    State(state): State<AppState>,
    UrlPath(account): UrlPath<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    if !StateStore::valid_account(&account) {
        return Err((StatusCode::BAD_REQUEST, "Invalid account name".to_string()));
    }
    state
        .store
        .set(&account, &body)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(json!({"status": "ok"})))
}
