//! src/services/movie_service.rs
//!
//! MovieService: keeps a movie's row in SQLite and its poster file on disk
//! in step. The two stores are not covered by one transaction: a crash
//! between the file write and the row insert leaves an orphaned poster, and
//! a crash between the file delete and the row delete leaves a row whose
//! poster is gone. Same-id and same-filename operations are serialized
//! in-process by `KeyedLock`.

use crate::{
    models::{
        movie::{Movie, MovieDto, MoviePageResponse, MovieRequest},
        page::{PageRequest, Sort, SortDirection, SortField},
    },
    repositories::movie_repository::MovieRepository,
    services::{
        file_service::{FileError, FileService},
        keyed_lock::KeyedLock,
    },
};
use bytes::Bytes;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

/// A poster file received from a client.
#[derive(Clone, Debug)]
pub struct PosterUpload {
    pub filename: String,
    pub bytes: Bytes,
}

impl PosterUpload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Movie not found with id = {0}")]
    NotFound(i64),
    #[error("File already exists! Please enter another file name! ({0})")]
    FileAlreadyExists(String),
    #[error("File is empty! Please send another file!")]
    EmptyPayload,
    #[error("cannot sort by unknown field `{0}`")]
    InvalidSortField(String),
    #[error("page size must be greater than zero")]
    InvalidPageRequest,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    File(FileError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<FileError> for MovieError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::AlreadyExists(name) => MovieError::FileAlreadyExists(name),
            other => MovieError::File(other),
        }
    }
}

impl From<ValidationErrors> for MovieError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("invalid {}", field),
                })
            })
            .collect::<Vec<_>>();
        messages.sort();
        MovieError::Validation(messages.join("; "))
    }
}

pub type MovieResult<T> = Result<T, MovieError>;

#[derive(Clone)]
pub struct MovieService {
    repo: MovieRepository,
    files: FileService,
    poster_dir: Arc<PathBuf>,
    base_url: Arc<str>,
    locks: KeyedLock,
}

impl MovieService {
    /// `base_url` is used verbatim as the prefix of every `posterUrl`; a
    /// trailing `/` is dropped.
    pub fn new(
        repo: MovieRepository,
        files: FileService,
        poster_dir: impl Into<PathBuf>,
        base_url: &str,
    ) -> Self {
        Self {
            repo,
            files,
            poster_dir: Arc::new(poster_dir.into()),
            base_url: Arc::from(base_url.trim_end_matches('/')),
            locks: KeyedLock::new(),
        }
    }

    pub fn poster_dir(&self) -> &Path {
        &self.poster_dir
    }

    fn to_dto(&self, movie: Movie) -> MovieDto {
        MovieDto::from_movie(movie, &self.base_url)
    }

    async fn find(&self, movie_id: i64) -> MovieResult<Movie> {
        self.repo
            .find_by_id(movie_id)
            .await?
            .ok_or(MovieError::NotFound(movie_id))
    }

    /// Store the poster, then insert a new row pointing at it.
    ///
    /// Fails with `FileAlreadyExists` before writing anything when a poster
    /// with the same name is already stored.
    pub async fn add_movie(
        &self,
        request: MovieRequest,
        poster: PosterUpload,
    ) -> MovieResult<MovieDto> {
        request.validate()?;
        self.files.ensure_filename_safe(&poster.filename)?;
        let _guard = self.locks.lock(format!("poster:{}", poster.filename)).await;

        if self.files.exists(&self.poster_dir, &poster.filename).await? {
            return Err(MovieError::FileAlreadyExists(poster.filename));
        }
        let stored = self
            .files
            .upload(&self.poster_dir, &poster.filename, &poster.bytes)
            .await?;

        let movie = request.into_movie(None, stored.clone());
        let saved = match self.repo.save(&movie).await {
            Ok(saved) => saved,
            Err(err) => {
                if let Err(cleanup) = self.files.delete_if_exists(&self.poster_dir, &stored).await {
                    warn!(poster = %stored, error = %cleanup, "could not remove poster after failed insert");
                }
                return Err(MovieError::Sqlx(err));
            }
        };

        info!(movie_id = ?saved.movie_id, poster = %saved.poster, "movie added");
        Ok(self.to_dto(saved))
    }

    pub async fn get_movie(&self, movie_id: i64) -> MovieResult<MovieDto> {
        let movie = self.find(movie_id).await?;
        Ok(self.to_dto(movie))
    }

    pub async fn get_all_movies(&self) -> MovieResult<Vec<MovieDto>> {
        let movies = self.repo.find_all().await?;
        Ok(movies.into_iter().map(|m| self.to_dto(m)).collect())
    }

    /// Replace every field of movie `movie_id`. Without a new poster the
    /// stored one is kept. A poster under a new name is written before the
    /// old file is removed, so a rejected upload leaves the movie intact.
    /// Returns the row as saved.
    pub async fn update_movie(
        &self,
        movie_id: i64,
        request: MovieRequest,
        poster: Option<PosterUpload>,
    ) -> MovieResult<MovieDto> {
        request.validate()?;
        if let Some(upload) = &poster {
            self.files.ensure_filename_safe(&upload.filename)?;
        }
        let _guard = self.locks.lock(format!("movie:{}", movie_id)).await;
        let existing = self.find(movie_id).await?;

        let Some(upload) = poster else {
            let saved = self
                .repo
                .save(&request.into_movie(Some(movie_id), existing.poster))
                .await?;
            info!(movie_id, poster = %saved.poster, "movie updated");
            return Ok(self.to_dto(saved));
        };

        let file_guard = self.locks.lock(format!("poster:{}", upload.filename)).await;
        let renamed = upload.filename != existing.poster;
        if !renamed {
            self.files
                .delete_if_exists(&self.poster_dir, &existing.poster)
                .await?;
        }
        let stored = self
            .files
            .upload(&self.poster_dir, &upload.filename, &upload.bytes)
            .await?;

        let saved = match self
            .repo
            .save(&request.into_movie(Some(movie_id), stored.clone()))
            .await
        {
            Ok(saved) => saved,
            Err(err) => {
                if renamed {
                    if let Err(cleanup) = self.files.delete_if_exists(&self.poster_dir, &stored).await {
                        warn!(poster = %stored, error = %cleanup, "could not remove poster after failed update");
                    }
                }
                return Err(MovieError::Sqlx(err));
            }
        };

        drop(file_guard);

        if renamed {
            let _old_guard = self.locks.lock(format!("poster:{}", existing.poster)).await;
            if let Err(err) = self
                .files
                .delete_if_exists(&self.poster_dir, &existing.poster)
                .await
            {
                warn!(poster = %existing.poster, error = %err, "could not remove replaced poster");
            }
        }

        info!(movie_id, poster = %saved.poster, "movie updated");
        Ok(self.to_dto(saved))
    }

    /// Store a file in the poster directory without attaching it to a movie.
    /// Holds the same per-filename lock as adds and updates.
    pub async fn upload_file(&self, upload: PosterUpload) -> MovieResult<String> {
        if upload.is_empty() {
            return Err(MovieError::EmptyPayload);
        }
        self.files.ensure_filename_safe(&upload.filename)?;
        let _guard = self.locks.lock(format!("poster:{}", upload.filename)).await;
        let stored = self
            .files
            .upload(&self.poster_dir, &upload.filename, &upload.bytes)
            .await?;
        info!(file = %stored, "file uploaded");
        Ok(stored)
    }

    /// Delete the poster, then the row. If the poster cannot be removed for
    /// any reason other than already being gone, the row is left in place.
    pub async fn delete_movie(&self, movie_id: i64) -> MovieResult<String> {
        let _guard = self.locks.lock(format!("movie:{}", movie_id)).await;
        let movie = self.find(movie_id).await?;

        self.files
            .delete_if_exists(&self.poster_dir, &movie.poster)
            .await?;
        self.repo.delete(&movie).await?;

        info!(movie_id, poster = %movie.poster, "movie deleted");
        Ok(format!("Movie deleted with id = {}", movie_id))
    }

    pub async fn get_all_movies_with_pagination(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> MovieResult<MoviePageResponse> {
        self.page(PageRequest {
            page_number,
            page_size,
            sort: None,
        })
        .await
    }

    /// `sort_order` of `"asc"` (any case) sorts ascending, anything else
    /// descending. `sort_by` must name a sortable movie attribute.
    pub async fn get_all_movies_with_pagination_and_sorting(
        &self,
        page_number: u32,
        page_size: u32,
        sort_by: &str,
        sort_order: &str,
    ) -> MovieResult<MoviePageResponse> {
        let field = sort_by
            .parse::<SortField>()
            .map_err(|err| MovieError::InvalidSortField(err.0))?;
        self.page(PageRequest {
            page_number,
            page_size,
            sort: Some(Sort {
                field,
                direction: SortDirection::from_order(sort_order),
            }),
        })
        .await
    }

    async fn page(&self, request: PageRequest) -> MovieResult<MoviePageResponse> {
        if request.page_size == 0 {
            return Err(MovieError::InvalidPageRequest);
        }
        let page = self.repo.find_all_paged(&request).await?;
        Ok(MoviePageResponse::from_page(page, &self.base_url))
    }
}
