//! Core data models for the movie catalog.
//!
//! Rows map to SQLite tables via `sqlx::FromRow`; transfer shapes serialize
//! as camelCase JSON via `serde`.

pub mod movie;
pub mod page;
pub mod refresh_token;
