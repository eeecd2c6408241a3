use crate::config::Config;
use crate::error::AppError;
use crate::figure::FigureRenderer;
use crate::preprocessing::Pipeline;
use crate::storage::Storage;
use askama::Template;
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use url::Url;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub pipeline: Pipeline,
    pub config: Arc<Config>,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate;

#[derive(Template)]
#[template(path = "results.html")]
struct ResultsTemplate<'a> {
    filename: &'a str,
    image_url: String,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let storage = Storage::init(&config.upload_dir, &config.processed_dir)?;
    tracing::info!(
        "Uploads in {}, figures in {}",
        storage.upload_dir().display(),
        storage.processed_dir().display()
    );

    let renderer = FigureRenderer::new(config.font_path.as_deref())?;
    let addr = format!("{}:{}", config.host, config.port);

    let state = AppState {
        pipeline: Pipeline::new(storage.clone(), Arc::new(renderer)),
        storage,
        config: Arc::new(config),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    let max_file_size = state.config.max_file_size;

    Router::new()
        .route("/", get(handle_index).post(handle_upload))
        .route("/results/:filename", get(handle_results))
        .route("/processed/:filename", get(handle_processed))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(max_file_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Upload form
async fn handle_index() -> Result<Html<String>, AppError> {
    render(&IndexTemplate)
}

/// Save the upload, run the pipeline, redirect to its results page
async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let max = state.config.max_file_size;
    let mut upload: Option<(Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().map(|s| s.to_string());
            let data = field.bytes().await.map_err(|e| multipart_error(e, max))?;
            upload = Some((filename, data));
        }
    }

    // A `file` part without a filename is a text field, not an upload
    let (filename, data) = match upload {
        Some((Some(filename), data)) => (filename, data),
        _ => return Err(AppError::MissingFile),
    };
    if filename.is_empty() {
        return Err(AppError::NoFileSelected);
    }

    tracing::info!("Received {} ({} bytes)", filename, data.len());

    let storage = state.storage.clone();
    let pipeline = state.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || {
        let input = storage.save_upload(&filename, &data)?;
        pipeline.process(&input)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Processing task failed: {}", e)))??;

    let steps: Vec<String> = result
        .steps
        .iter()
        .map(|step| format!("{}={}ms", step.name, step.time_ms))
        .collect();
    tracing::debug!(
        "Pipeline finished in {}ms [{}]",
        result.total_time_ms,
        steps.join(" ")
    );

    let basename = result
        .output_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::Internal("Processed file has no name".to_string()))?;

    Ok(Redirect::to(&route_path("results", &basename)?))
}

/// Results page for a processed figure
async fn handle_results(Path(filename): Path<String>) -> Result<Html<String>, AppError> {
    let image_url = route_path("processed", &filename)?;
    render(&ResultsTemplate {
        filename: &filename,
        image_url,
    })
}

/// Raw figure bytes
async fn handle_processed(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let path = state
        .storage
        .processed_file(&filename)
        .ok_or_else(|| AppError::NotFound(filename.clone()))?;

    let data = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::NotFound(format!("{}: {}", filename, e)))?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.to_string())], data).into_response())
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Failed to render page: {}", e)))
}

fn multipart_error(err: MultipartError, max: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadTooLarge { max }
    } else {
        AppError::InvalidRequest(format!("Failed to parse multipart: {}", err))
    }
}

/// `/<route>/<filename>` with the filename percent-encoded as one segment
fn route_path(route: &str, filename: &str) -> Result<String, AppError> {
    let mut url = Url::parse("http://localhost/")
        .map_err(|e| AppError::Internal(format!("Failed to build URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| AppError::Internal("Base URL cannot hold a path".to_string()))?
        .pop_if_empty()
        .push(route)
        .push(filename);
    Ok(url.path().to_string())
}
