//! HTTP boundary.
//!
//! Routes:
//! - `GET /translations` renders the default domain as a script fragment
//! - `GET /translations/{domain}.{format}` renders `domain` as `js` or `json`
//! - `GET /health`, `GET /metrics`
//!
//! Every rejected request answers 404 with an empty body.

use crate::cache::FsRenderCache;
use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::render::Format;
use crate::service::TranslationService;
use anyhow::{Context, Result};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TranslationService>,
    pub http_cache_time: u32,
}

impl AppState {
    /// Load catalogs and set up the render cache from configuration.
    ///
    /// With `cache_dir` set, the directory is created and rendered output is
    /// cached on disk; otherwise every request is rendered.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = Arc::new(CatalogStore::load_dir(&config.translations_dir)?);

        let mut service = TranslationService::from_store(config, store)
            .context("Invalid translation configuration")?;

        match &config.cache_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create cache directory {}", dir.display())
                })?;
                info!("Caching rendered translations in {}", dir.display());
                service = service.with_cache(Arc::new(FsRenderCache::new(dir.clone())));
            }
            None => info!("CACHE_DIR not set, rendered translations are not cached"),
        }

        Ok(Self {
            service: Arc::new(service),
            http_cache_time: config.http_cache_time,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TranslationsQuery {
    pub locales: Option<String>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/translations", get(get_default_translations))
        .route("/translations/:file", get(get_translations))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn get_default_translations(
    State(state): State<AppState>,
    query: Result<Query<TranslationsQuery>, QueryRejection>,
) -> Response {
    let Ok(Query(query)) = query else {
        return reject_query(&state);
    };
    let domain = state.service.default_domain().to_string();
    respond(&state, &domain, query.locales.as_deref(), Format::Js.extension())
}

async fn get_translations(
    State(state): State<AppState>,
    Path(file): Path<String>,
    query: Result<Query<TranslationsQuery>, QueryRejection>,
) -> Response {
    let Ok(Query(query)) = query else {
        return reject_query(&state);
    };
    let (domain, format) = split_file(&file);
    respond(&state, domain, query.locales.as_deref(), format)
}

/// A query string that does not decode (such as a repeated `locales`) is a
/// locale validation failure like any other.
fn reject_query(state: &AppState) -> Response {
    state.service.metrics().record_rejected();
    debug!("Rejected translation request: malformed query string");
    StatusCode::NOT_FOUND.into_response()
}

/// Split `messages.json` into domain and format. The format is whatever
/// follows the last `.`; with no `.` the script format is used.
fn split_file(file: &str) -> (&str, &str) {
    file.rsplit_once('.')
        .unwrap_or((file, Format::Js.extension()))
}

fn respond(state: &AppState, domain: &str, locales: Option<&str>, format: &str) -> Response {
    match state.service.render(domain, locales, format) {
        Ok(body) => {
            // render() only succeeds for a supported format
            let content_type = format
                .parse::<Format>()
                .map(|f| f.content_type())
                .unwrap_or_default();
            (
                [
                    (header::CONTENT_TYPE, content_type.to_string()),
                    (
                        header::CACHE_CONTROL,
                        format!("public, max-age={}", state.http_cache_time),
                    ),
                ],
                body,
            )
                .into_response()
        }
        Err(e) if e.is_not_found() => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!("Failed to render translations: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn metrics(State(state): State<AppState>) -> Response {
    Json(state.service.metrics().report()).into_response()
}
