//! Read-only JSON API over the catalog.
//!
//! Every request reads and compiles from the content store; nothing is
//! cached between requests.

use super::{load_catalog, renderer_for};
use crate::payload::{self, EntryData, ErrorData, SlugListData, SummaryListData};
use anyhow::{Context, Result};
use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use patternkit_core::{
    Catalog, CatalogError, DataStructureFrontmatter, PatternFrontmatter, StoreError, Topic,
    TopicFrontmatter,
};
use patternkit_render::DocumentRenderer;
use std::path::Path;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
struct AppState {
    catalog: Catalog,
    renderer: DocumentRenderer,
}

/// Start the API server
pub async fn serve(config_path: &Path, port: Option<u16>) -> Result<()> {
    let (config, catalog) = load_catalog(config_path)?;
    let port = port.unwrap_or(config.server.port);

    let state = AppState {
        renderer: renderer_for(&config),
        catalog,
    };

    tracing::info!(
        "Serving {} from {:?} on http://localhost:{}",
        config.site.title,
        config.content_root(),
        port
    );

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/{topic}", get(api_summaries))
        .route("/api/{topic}/slugs", get(api_slugs))
        .route("/api/{topic}/{slug}", get(api_entry))
        .fallback(|| async { error_response(StatusCode::NOT_FOUND, "Not found".to_string()) })
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn api_summaries(
    AxumPath(topic): AxumPath<String>,
    State(state): State<AppState>,
) -> Response {
    match topic.parse::<Topic>() {
        Ok(Topic::Pattern) => summaries_response::<PatternFrontmatter>(&state.catalog).await,
        Ok(Topic::DataStructure) => {
            summaries_response::<DataStructureFrontmatter>(&state.catalog).await
        }
        Err(message) => error_response(StatusCode::NOT_FOUND, message),
    }
}

async fn api_slugs(AxumPath(topic): AxumPath<String>, State(state): State<AppState>) -> Response {
    let topic = match topic.parse::<Topic>() {
        Ok(topic) => topic,
        Err(message) => return error_response(StatusCode::NOT_FOUND, message),
    };

    match state.catalog.list_slugs(topic).await {
        Ok(slugs) => {
            Json(payload::envelope("slug.list", SlugListData { topic, slugs })).into_response()
        }
        Err(e) => catalog_error_response(e),
    }
}

async fn api_entry(
    AxumPath((topic, slug)): AxumPath<(String, String)>,
    State(state): State<AppState>,
) -> Response {
    match topic.parse::<Topic>() {
        Ok(Topic::Pattern) => entry_response::<PatternFrontmatter>(&state, &slug).await,
        Ok(Topic::DataStructure) => {
            entry_response::<DataStructureFrontmatter>(&state, &slug).await
        }
        Err(message) => error_response(StatusCode::NOT_FOUND, message),
    }
}

async fn summaries_response<F: TopicFrontmatter>(catalog: &Catalog) -> Response {
    match catalog.summaries::<F>().await {
        Ok(summaries) => Json(payload::envelope(
            "summary.list",
            SummaryListData::new(summaries),
        ))
        .into_response(),
        Err(e) => catalog_error_response(e),
    }
}

async fn entry_response<F: TopicFrontmatter>(state: &AppState, slug: &str) -> Response {
    let entry = match state.catalog.get_by_slug::<F>(slug).await {
        Ok(entry) => entry,
        Err(e) => return catalog_error_response(e),
    };

    match state.renderer.render(&entry.document).await {
        Ok(html) => {
            Json(payload::envelope("entry.full", EntryData::new(entry, html))).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to render '{}': {}", slug, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn catalog_error_response(err: CatalogError) -> Response {
    let status = match &err {
        CatalogError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
        CatalogError::Malformed { .. } | CatalogError::Compile { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CatalogError::Store(StoreError::Io { .. }) | CatalogError::Join(_) => {
            tracing::error!("Catalog read failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    error_response(status, err.to_string())
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(payload::envelope("error", ErrorData { message }))).into_response()
}
