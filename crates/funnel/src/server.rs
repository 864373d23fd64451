//! Static page server behind `funnel serve`.
//!
//! Two entry routes, `/` and `/filtering`, return the configured pages from
//! `dist_dir`. Every other path is looked up in `dist_dir` and then `assets_dir`.
//! Paths that would climb out of those directories are answered with 404.

use anyhow::Result;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use funnelapp::config::FunnelConfig;
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[derive(Clone)]
struct AppState {
    config: Arc<FunnelConfig>,
}

pub async fn serve(config: FunnelConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!("funnel listening on http://{addr}");
    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("funnel stopped");
    Ok(())
}

fn router(config: FunnelConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };
    Router::new()
        .route("/", get(index_handler))
        .route("/filtering", get(filtering_handler))
        .fallback(asset_handler)
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

async fn index_handler(State(state): State<AppState>, uri: Uri) -> Result<Response, AppError> {
    info!(path = %uri.path(), "serving entry page");
    let config = &state.config;
    send_file(&config.dist_dir.join(&config.index_page)).await
}

async fn filtering_handler(State(state): State<AppState>, uri: Uri) -> Result<Response, AppError> {
    info!(path = %uri.path(), "serving entry page");
    let config = &state.config;
    send_file(&config.dist_dir.join(&config.filtering_page)).await
}

async fn asset_handler(State(state): State<AppState>, uri: Uri) -> Result<Response, AppError> {
    let relative = relative_asset_path(uri.path()).ok_or_else(|| AppError::not_found(uri.path()))?;
    for root in [&state.config.dist_dir, &state.config.assets_dir] {
        let candidate = root.join(&relative);
        if tokio::fs::metadata(&candidate)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
        {
            return send_file(&candidate).await;
        }
    }
    Err(AppError::not_found(uri.path()))
}

/// Turn a request path into a path relative to an asset root.
///
/// The path is percent-decoded first, so `%20` finds a file with a space and
/// `%2e%2e` is caught like `..`. `None` for the bare root, for invalid UTF-8 and
/// for anything containing `..`, a drive prefix, a backslash or a NUL byte.
fn relative_asset_path(request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path).decode_utf8().ok()?;
    let trimmed = decoded.trim_start_matches('/');
    if trimmed.is_empty() || trimmed.contains(|c| c == '\\' || c == '\0') {
        return None;
    }
    let mut relative = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative)
    }
}

async fn send_file(path: &Path) -> Result<Response, AppError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            debug!(path = %path.display(), %mime, "serving file");
            Ok(([(CONTENT_TYPE, mime.to_string())], bytes).into_response())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::not_found(&path.display().to_string()))
        }
        Err(err) => Err(AppError::internal(err)),
    }
}

#[derive(Debug)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn not_found(what: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("not found: {what}"),
        }
    }

    fn internal(err: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = %self.status, message = %self.message, "request failed");
        } else {
            debug!(status = %self.status, message = %self.message, "request rejected");
        }
        (self.status, self.message).into_response()
    }
}
