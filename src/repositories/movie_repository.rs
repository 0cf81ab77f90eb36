//! Persistence gateway for the `movies` table.

use crate::models::{
    movie::Movie,
    page::{Page, PageRequest, SortField},
};
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite, types::Json};
use std::sync::Arc;

const MOVIE_COLUMNS: &str = "movie_id, title, director, studio, movie_cast, release_year, poster";

/// Row-level access to movies. Each method is a single statement (or a
/// count plus a select for pages) and relies on SQLite's implicit
/// transaction per statement.
#[derive(Clone)]
pub struct MovieRepository {
    db: Arc<SqlitePool>,
}

impl MovieRepository {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, movie_id: i64) -> Result<Option<Movie>, sqlx::Error> {
        sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE movie_id = ?"
        ))
        .bind(movie_id)
        .fetch_optional(&*self.db)
        .await
    }

    pub async fn find_all(&self) -> Result<Vec<Movie>, sqlx::Error> {
        sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY movie_id ASC"
        ))
        .fetch_all(&*self.db)
        .await
    }

    /// One page of movies, optionally sorted, with totals for the whole table.
    ///
    /// Rows that tie on the sort column keep `movie_id` order so consecutive
    /// pages neither repeat nor skip rows.
    pub async fn find_all_paged(&self, request: &PageRequest) -> Result<Page<Movie>, sqlx::Error> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&*self.db)
            .await?;

        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {MOVIE_COLUMNS} FROM movies ORDER BY "));
        match request.sort {
            Some(sort) => {
                builder.push(sort.field.column());
                builder.push(" ");
                builder.push(sort.direction.keyword());
                if sort.field != SortField::MovieId {
                    builder.push(", movie_id ASC");
                }
            }
            None => {
                builder.push("movie_id ASC");
            }
        }
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(request.page_size));
        builder.push(" OFFSET ");
        builder.push_bind(request.offset());

        let rows: Vec<Movie> = builder.build_query_as().fetch_all(&*self.db).await?;

        Ok(Page::new(rows, request, total))
    }

    /// Insert when `movie_id` is `None`, otherwise replace every column of
    /// the row with that id. Returns the row as stored.
    pub async fn save(&self, movie: &Movie) -> Result<Movie, sqlx::Error> {
        sqlx::query_as::<_, Movie>(&format!(
            r#"
            INSERT INTO movies (
                movie_id, title, director, studio, movie_cast, release_year, poster
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(movie_id) DO UPDATE SET
                title = excluded.title,
                director = excluded.director,
                studio = excluded.studio,
                movie_cast = excluded.movie_cast,
                release_year = excluded.release_year,
                poster = excluded.poster
            RETURNING {MOVIE_COLUMNS}
            "#
        ))
        .bind(movie.movie_id)
        .bind(&movie.title)
        .bind(&movie.director)
        .bind(&movie.studio)
        .bind(Json(&movie.movie_cast))
        .bind(movie.release_year)
        .bind(&movie.poster)
        .fetch_one(&*self.db)
        .await
    }

    /// Delete the row behind `movie`. Returns whether a row was removed.
    pub async fn delete(&self, movie: &Movie) -> Result<bool, sqlx::Error> {
        let Some(movie_id) = movie.movie_id else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM movies WHERE movie_id = ?")
            .bind(movie_id)
            .execute(&*self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
