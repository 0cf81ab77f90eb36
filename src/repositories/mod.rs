//! SQLite-backed repositories, one per table.

pub mod movie_repository;
pub mod refresh_token_repository;
