//! Defines routes for the movie catalog.
//!
//! ## Structure
//! - **Movie endpoints** (`/api/v1/movie`)
//!   - `POST   /add-movie`         - multipart poster + metadata
//!   - `GET    /`                  - list every movie
//!   - `GET    /{movie_id}`        - fetch one movie
//!   - `PUT    /{movie_id}`        - replace metadata, optionally the poster
//!   - `DELETE /{movie_id}`        - delete row and poster
//!   - `GET    /allMoviesPage`     - paged listing
//!   - `GET    /allMoviesPageSort` - paged + sorted listing
//!
//! - **File endpoints**
//!   - `POST   /file/upload`
//!   - `GET    /file/{file_name}`  - the target of every `posterUrl`
//!
//! The static listing paths take priority over `/{movie_id}`.

use crate::{
    handlers::{
        file_handlers::{serve_file, upload_file},
        health_handlers::{healthz, readyz},
        movie_handlers::{
            add_movie, delete_movie, get_all_movies, get_movie, get_movies_with_pagination,
            get_movies_with_pagination_and_sorting, update_movie,
        },
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the router for all catalog routes. Carries `AppState` to handlers.
pub fn routes() -> Router<AppState> {
    let movie_routes = Router::new()
        .route("/", get(get_all_movies))
        .route("/add-movie", post(add_movie))
        .route("/allMoviesPage", get(get_movies_with_pagination))
        .route("/allMoviesPageSort", get(get_movies_with_pagination_and_sorting))
        .route(
            "/{movie_id}",
            get(get_movie).put(update_movie).delete(delete_movie),
        );

    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/file/upload", post(upload_file))
        .route("/file/{file_name}", get(serve_file))
        .nest("/api/v1/movie", movie_routes)
}

/// The complete application: routes, upload size limit and request tracing.
pub fn app(state: AppState, max_upload_bytes: usize) -> Router {
    routes()
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
