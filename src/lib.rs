//! Movie catalog service: poster files on disk, metadata rows in SQLite.

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
