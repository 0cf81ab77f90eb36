//! Poster file endpoints under `/file`. Downloads stream from disk.

use crate::{
    errors::AppError,
    services::movie_service::{MovieError, PosterUpload},
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{HeaderValue, StatusCode, header},
    response::Response,
};
use tokio_util::io::ReaderStream;

/// `POST /file/upload`: store a standalone file in the poster directory.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<String, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(e.to_string()))?;

        let stored = state
            .movies
            .upload_file(PosterUpload::new(filename, bytes))
            .await?;
        return Ok(format!("File uploaded : {}", stored));
    }

    Err(AppError::bad_request("Missing required 'file' field"))
}

/// Content type guessed from the extension, `application/octet-stream` when
/// unknown.
fn content_type(file_name: &str) -> HeaderValue {
    let mime = mime_guess::from_path(file_name).first_or_octet_stream();
    HeaderValue::from_str(mime.as_ref())
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"))
}

/// `GET /file/{file_name}`: stream a stored poster.
pub async fn serve_file(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    let (file, len) = state
        .files
        .open_for_read(&state.poster_dir, &file_name)
        .await?;
    let body = Body::from_stream(ReaderStream::new(file));

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type(&file_name));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));

    Ok(response)
}
