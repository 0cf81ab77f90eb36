use crate::services::{file_service::FileService, movie_service::MovieService};
use sqlx::SqlitePool;
use std::{path::PathBuf, sync::Arc};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<SqlitePool>,
    pub movies: MovieService,
    pub files: FileService,
    /// Directory holding poster files, shared by the movie and file endpoints.
    pub poster_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(db: Arc<SqlitePool>, movies: MovieService, files: FileService) -> Self {
        let poster_dir = Arc::new(movies.poster_dir().to_path_buf());
        Self {
            db,
            movies,
            files,
            poster_dir,
        }
    }
}
