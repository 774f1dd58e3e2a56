use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::warn;

use super::protocol::{FetchRequest, FetchResponse};
use super::service::{PropertyFetcher, DEFAULT_LIMIT};
use super::source::ListingsSource;

/// Router exposing the fetch and download endpoints.
pub fn fetch_router<S>(fetcher: Arc<PropertyFetcher<S>>) -> Router
where
    S: ListingsSource + 'static,
{
    Router::new()
        .route("/fetch-city-data", post(fetch_handler::<S>))
        .route("/download/:filename", get(download_handler::<S>))
        .with_state(fetcher)
}

pub(crate) async fn fetch_handler<S>(
    State(fetcher): State<Arc<PropertyFetcher<S>>>,
    Json(request): Json<FetchRequest>,
) -> Response
where
    S: ListingsSource + 'static,
{
    let present = |value: Option<String>| value.filter(|text| !text.trim().is_empty());
    let (Some(city), Some(state)) = (present(request.city), present(request.state)) else {
        let payload = FetchResponse::failure("Missing city or state");
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    };

    let outcome = fetcher
        .fetch(&city, &state, request.limit.unwrap_or(DEFAULT_LIMIT))
        .await;
    (StatusCode::OK, Json(outcome.into_response())).into_response()
}

pub(crate) async fn download_handler<S>(
    State(fetcher): State<Arc<PropertyFetcher<S>>>,
    Path(filename): Path<String>,
) -> Response
where
    S: ListingsSource + 'static,
{
    let Some(path) = fetcher.store().resolve(&filename) else {
        let payload = FetchResponse::failure("File not found");
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let content_type = mime_guess::from_path(&path)
                .first_or_octet_stream()
                .to_string();
            let disposition = format!("attachment; filename=\"{filename}\"");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(err) => {
            warn!(%filename, error = %err, "failed to read results file");
            let payload = FetchResponse::failure(format!("could not read {filename}: {err}"));
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
