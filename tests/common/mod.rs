use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use movie_catalog::db;
use movie_catalog::repositories::movie_repository::MovieRepository;
use movie_catalog::routes::routes;
use movie_catalog::services::file_service::FileService;
use movie_catalog::services::movie_service::MovieService;
use movie_catalog::state::AppState;

pub const BASE_URL: &str = "http://x";
const BOUNDARY: &str = "movie-catalog-test-boundary";

/// A router over an in-memory database and a temporary poster directory.
/// Keep the `TempDir` alive for the duration of the test.
pub struct TestApp {
    pub router: Router,
    pub posters: TempDir,
}

pub async fn build_test_app() -> TestApp {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    let pool = Arc::new(pool);

    let posters = tempfile::tempdir().unwrap();
    let files = FileService::new();
    let movies = MovieService::new(
        MovieRepository::new(pool.clone()),
        files,
        posters.path(),
        BASE_URL,
    );
    let state = AppState::new(pool, movies, files);

    TestApp {
        router: routes::app(state, 1024 * 1024),
        posters,
    }
}

/// One part of a multipart body: `(name, filename, content)`.
pub type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(file) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send_multipart(
    app: &TestApp,
    method: Method,
    uri: &str,
    parts: &[Part<'_>],
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn send(app: &TestApp, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn movie_json(title: &str, year: i32) -> String {
    serde_json::json!({
        "title": title,
        "director": "Christopher Nolan",
        "studio": "Warner Bros",
        "movieCast": ["Leonardo DiCaprio", "Elliot Page"],
        "releaseYear": year,
    })
    .to_string()
}

/// Add a movie through the API and return its id.
pub async fn add_movie(app: &TestApp, title: &str, year: i32, poster: &str) -> i64 {
    let meta = movie_json(title, year);
    let response = send_multipart(
        app,
        Method::POST,
        "/api/v1/movie/add-movie",
        &[
            ("file", Some(poster), &b"poster-bytes"[..]),
            ("movieDto", None, meta.as_bytes()),
        ],
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["movieId"].as_i64().unwrap()
}
