//! HTTP handlers for the movie catalog under `/api/v1/movie`.
//! Multipart bodies carry the poster as `file` and the metadata as a JSON
//! string part; everything else is delegated to `MovieService`.

use crate::{
    errors::AppError,
    models::movie::{MovieDto, MoviePageResponse, MovieRequest},
    services::movie_service::{MovieError, PosterUpload},
    state::AppState,
};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

pub const DEFAULT_PAGE_NUMBER: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_SORT_BY: &str = "movieId";
pub const DEFAULT_SORT_ORDER: &str = "asc";

/// Names accepted for the metadata part of a movie form.
const METADATA_PARTS: [&str; 3] = ["movieDto", "movieDTO", "movieDTOobj"];

/// Query params for `GET /allMoviesPage`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default = "default_page_number")]
    pub page_number: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Query params for `GET /allMoviesPageSort`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortedPageQuery {
    #[serde(default = "default_page_number")]
    pub page_number: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
}

fn default_page_number() -> u32 {
    DEFAULT_PAGE_NUMBER
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_sort_by() -> String {
    DEFAULT_SORT_BY.into()
}

fn default_sort_order() -> String {
    DEFAULT_SORT_ORDER.into()
}

/// Parts of a movie form, before any of them is required.
struct MovieForm {
    file: Option<PosterUpload>,
    metadata: Option<MovieRequest>,
}

async fn read_movie_form(mut multipart: Multipart) -> Result<MovieForm, AppError> {
    let mut form = MovieForm {
        file: None,
        metadata: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let filename = field.file_name().unwrap_or("").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::bad_request(e.to_string()))?;
            form.file = Some(PosterUpload::new(filename, bytes));
        } else if METADATA_PARTS.contains(&name.as_str()) {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::bad_request(e.to_string()))?;
            let metadata = serde_json::from_str::<MovieRequest>(&text)
                .map_err(|e| AppError::bad_request(format!("invalid movie metadata: {}", e)))?;
            form.metadata = Some(metadata);
        }
    }

    Ok(form)
}

fn require_metadata(form: &mut MovieForm) -> Result<MovieRequest, AppError> {
    form.metadata
        .take()
        .ok_or_else(|| AppError::bad_request("Missing required 'movieDto' field"))
}

/// `POST /api/v1/movie/add-movie`
pub async fn add_movie(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut form = read_movie_form(multipart).await?;
    let file = form
        .file
        .take()
        .ok_or_else(|| AppError::bad_request("Missing required 'file' field"))?;
    if file.is_empty() {
        return Err(MovieError::EmptyPayload.into());
    }
    let metadata = require_metadata(&mut form)?;

    let dto = state.movies.add_movie(metadata, file).await?;
    Ok((StatusCode::CREATED, Json(dto)))
}

/// `GET /api/v1/movie/{movie_id}`
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> Result<Json<MovieDto>, AppError> {
    Ok(Json(state.movies.get_movie(movie_id).await?))
}

/// `GET /api/v1/movie`
pub async fn get_all_movies(
    State(state): State<AppState>,
) -> Result<Json<Vec<MovieDto>>, AppError> {
    Ok(Json(state.movies.get_all_movies().await?))
}

/// `PUT /api/v1/movie/{movie_id}`: an absent or empty `file` keeps the
/// current poster.
pub async fn update_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<MovieDto>, AppError> {
    let mut form = read_movie_form(multipart).await?;
    let metadata = require_metadata(&mut form)?;
    let file = form.file.filter(|f| !f.is_empty());

    let dto = state.movies.update_movie(movie_id, metadata, file).await?;
    Ok(Json(dto))
}

/// `DELETE /api/v1/movie/{movie_id}`
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> Result<String, AppError> {
    Ok(state.movies.delete_movie(movie_id).await?)
}

/// `GET /api/v1/movie/allMoviesPage?pageNumber=&pageSize=`
pub async fn get_movies_with_pagination(
    State(state): State<AppState>,
    Query(q): Query<PageQuery>,
) -> Result<Json<MoviePageResponse>, AppError> {
    let page = state
        .movies
        .get_all_movies_with_pagination(q.page_number, q.page_size)
        .await?;
    Ok(Json(page))
}

/// `GET /api/v1/movie/allMoviesPageSort?pageNumber=&pageSize=&sortBy=&sortOrder=`
pub async fn get_movies_with_pagination_and_sorting(
    State(state): State<AppState>,
    Query(q): Query<SortedPageQuery>,
) -> Result<Json<MoviePageResponse>, AppError> {
    let page = state
        .movies
        .get_all_movies_with_pagination_and_sorting(
            q.page_number,
            q.page_size,
            &q.sort_by,
            &q.sort_order,
        )
        .await?;
    Ok(Json(page))
}
