use crate::addon::Addon;
use crate::config::Config;
use crate::error::AddonError;
use crate::manifest::{self, MANIFEST};
use crate::models::{CatalogResponse, ContentKind, MetaResponse};
use crate::tmdb::{TmdbApi, TmdbClient};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub addon: Addon,
}

impl AppState {
    pub fn new(tmdb: Arc<dyn TmdbApi>) -> Self {
        Self {
            addon: Addon::new(tmdb),
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::from_config(&config)?);
    let app = build_router(AppState::new(tmdb));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Addon active on: http://127.0.0.1:{}/manifest.json", config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Addon server stopped unexpectedly")?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/manifest.json", get(manifest_handler))
        .route("/catalog/:kind/:id", get(catalog_handler))
        .route("/catalog/:kind/:id/:extra", get(catalog_extra_handler))
        .route("/meta/:kind/:id", get(meta_handler))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn manifest_handler() -> Json<&'static manifest::Manifest> {
    Json(&*MANIFEST)
}

async fn catalog_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<CatalogResponse>, ApiError> {
    catalog(&state, &kind, &id, None).await
}

async fn catalog_extra_handler(
    State(state): State<AppState>,
    Path((kind, id, _extra)): Path<(String, String, String)>,
    uri: Uri,
) -> Result<Json<CatalogResponse>, ApiError> {
    // `Path` has already percent-decoded the segment; pairs are split on the raw one.
    let raw_extra = uri.path().rsplit('/').next().unwrap_or_default();
    catalog(&state, &kind, &id, Some(raw_extra)).await
}

async fn catalog(
    state: &AppState,
    kind: &str,
    id: &str,
    extra: Option<&str>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let kind = parse_kind(kind)?;
    // With an extra segment the `.json` suffix sits on the extra, not the catalog id.
    let catalog_id = match extra {
        Some(_) => id,
        None => strip_json(id)?,
    };
    if !manifest::has_catalog(kind, catalog_id) {
        debug!("Unknown catalog {}/{}", kind, catalog_id);
        return Err(ApiError::NotFound);
    }
    let skip = match extra {
        Some(raw) => parse_skip(strip_json(raw)?),
        None => None,
    };
    let metas = state.addon.list_catalog(kind, skip).await?;
    Ok(Json(CatalogResponse { metas }))
}

async fn meta_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<MetaResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let id = strip_json(&id)?;
    let meta = state.addon.get_detail(kind, id).await?;
    Ok(Json(MetaResponse { meta }))
}

fn parse_kind(raw: &str) -> Result<ContentKind, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

fn strip_json(segment: &str) -> Result<&str, ApiError> {
    segment.strip_suffix(".json").ok_or(ApiError::NotFound)
}

/// Reads `skip` from a still-encoded extra segment such as `skip=20` or
/// `genre=x&skip=40`. Values that are not non-negative integers count as absent.
pub fn parse_skip(extra: &str) -> Option<u64> {
    extra
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| {
            urlencoding::decode(key)
                .map(|k| k == "skip")
                .unwrap_or(false)
        })
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .and_then(|value| value.trim().parse().ok())
}

/// Request-boundary error: everything escaping a handler ends up here.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Addon(AddonError),
}

impl From<AddonError> for ApiError {
    fn from(err: AddonError) -> Self {
        ApiError::Addon(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Addon(err) => {
                let status = match err {
                    AddonError::InvalidIdentifierFormat(_) => StatusCode::BAD_REQUEST,
                    AddonError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                    AddonError::UpstreamOperationFailed { .. } => StatusCode::BAD_GATEWAY,
                };
                if status == StatusCode::BAD_REQUEST {
                    warn!("Rejecting request: {}", err);
                }
                (status, err.to_string())
            }
        };
        (status, Json(json!({ "err": message }))).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
