pub mod file_service;
pub mod keyed_lock;
pub mod movie_service;
