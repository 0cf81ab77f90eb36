//! Represents a movie record and its transfer shapes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use super::page::Page;

/// A movie row as persisted in the `movies` table.
///
/// `poster` holds the stored filename only; the public URL is derived on read
/// and never written back.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct Movie {
    /// Surrogate key. `None` until SQLite assigns one on insert.
    pub movie_id: Option<i64>,

    pub title: String,

    pub director: String,

    pub studio: String,

    /// Ordered cast list, stored as a JSON array column.
    #[sqlx(json)]
    pub movie_cast: Vec<String>,

    pub release_year: i32,

    /// Filename of the poster inside the configured poster directory.
    pub poster: String,
}

/// Movie metadata as sent by clients on add and update.
///
/// Identity and poster fields are owned by the server, so anything the client
/// puts in `movieId`, `poster` or `posterUrl` is ignored.
#[derive(Deserialize, Validate, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MovieRequest {
    #[validate(custom(function = "not_blank", message = "Please provide movie's title!"))]
    pub title: String,

    #[validate(custom(function = "not_blank", message = "Please provide movie's director!"))]
    pub director: String,

    #[validate(custom(function = "not_blank", message = "Please provide movie's studio!"))]
    pub studio: String,

    #[serde(default, alias = "cast")]
    pub movie_cast: Vec<String>,

    pub release_year: i32,
}

impl MovieRequest {
    /// Build an unsaved row from this metadata and a stored poster filename.
    pub fn into_movie(self, movie_id: Option<i64>, poster: String) -> Movie {
        Movie {
            movie_id,
            title: self.title,
            director: self.director,
            studio: self.studio,
            movie_cast: self.movie_cast,
            release_year: self.release_year,
            poster,
        }
    }
}

/// Public representation of a movie, carrying the resolved poster URL.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieDto {
    pub movie_id: Option<i64>,
    pub title: String,
    pub director: String,
    pub studio: String,
    pub movie_cast: Vec<String>,
    pub release_year: i32,
    pub poster: String,
    pub poster_url: String,
}

impl MovieDto {
    /// Convert a stored row, resolving `posterUrl` as `{base_url}/file/{poster}`.
    pub fn from_movie(movie: Movie, base_url: &str) -> Self {
        let poster_url = poster_url(base_url, &movie.poster);
        Self {
            movie_id: movie.movie_id,
            title: movie.title,
            director: movie.director,
            studio: movie.studio,
            movie_cast: movie.movie_cast,
            release_year: movie.release_year,
            poster: movie.poster,
            poster_url,
        }
    }
}

/// One page of movies plus the page metadata reported by the repository.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MoviePageResponse {
    pub movie_dtos: Vec<MovieDto>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: i64,
    pub total_pages: i64,
    pub is_last: bool,
}

impl MoviePageResponse {
    pub fn from_page(page: Page<Movie>, base_url: &str) -> Self {
        Self {
            movie_dtos: page
                .content
                .into_iter()
                .map(|movie| MovieDto::from_movie(movie, base_url))
                .collect(),
            page_number: page.page_number,
            page_size: page.page_size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            is_last: page.is_last,
        }
    }
}

pub fn poster_url(base_url: &str, poster: &str) -> String {
    format!("{}/file/{}", base_url, poster)
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
