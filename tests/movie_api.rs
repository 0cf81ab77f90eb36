//! HTTP-level integration tests for the movie and file endpoints.
//!
//! Requests go straight into the router via `tower::ServiceExt::oneshot`,
//! backed by an in-memory SQLite database and a temporary poster directory.

mod common;

use axum::http::{Method, StatusCode, header};
use common::{
    BASE_URL, add_movie, body_bytes, body_json, build_test_app, get, movie_json, send,
    send_multipart,
};

#[tokio::test]
async fn add_movie_returns_201_with_poster_url() {
    let app = build_test_app().await;
    let meta = movie_json("Inception", 2010);

    let response = send_multipart(
        &app,
        Method::POST,
        "/api/v1/movie/add-movie",
        &[
            ("file", Some("inception.jpg"), &b"jpeg"[..]),
            ("movieDto", None, meta.as_bytes()),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Inception");
    assert_eq!(json["poster"], "inception.jpg");
    assert_eq!(json["posterUrl"], format!("{BASE_URL}/file/inception.jpg"));
    assert!(json["movieId"].is_number());
    assert!(app.posters.path().join("inception.jpg").exists());
}

#[tokio::test]
async fn get_movie_after_add() {
    let app = build_test_app().await;
    let id = add_movie(&app, "Inception", 2010, "inception.jpg").await;

    let response = get(&app, &format!("/api/v1/movie/{id}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["movieId"], id);
    assert_eq!(json["director"], "Christopher Nolan");
    assert_eq!(json["movieCast"][0], "Leonardo DiCaprio");
    assert_eq!(json["posterUrl"], "http://x/file/inception.jpg");
}

#[tokio::test]
async fn get_unknown_movie_returns_404() {
    let app = build_test_app().await;
    let response = get(&app, "/api/v1/movie/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Movie not found with id = 999");
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn empty_file_returns_400() {
    let app = build_test_app().await;
    let meta = movie_json("Inception", 2010);

    let response = send_multipart(
        &app,
        Method::POST,
        "/api/v1/movie/add-movie",
        &[
            ("file", Some("empty.jpg"), &b""[..]),
            ("movieDto", None, meta.as_bytes()),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!app.posters.path().join("empty.jpg").exists());
}

#[tokio::test]
async fn duplicate_poster_returns_409() {
    let app = build_test_app().await;
    add_movie(&app, "Inception", 2010, "same.jpg").await;
    let meta = movie_json("Tenet", 2020);

    let response = send_multipart(
        &app,
        Method::POST,
        "/api/v1/movie/add-movie",
        &[
            ("file", Some("same.jpg"), &b"other"[..]),
            ("movieDto", None, meta.as_bytes()),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let list = body_json(get(&app, "/api/v1/movie").await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn traversal_filename_returns_400() {
    let app = build_test_app().await;
    let meta = movie_json("Inception", 2010);

    let response = send_multipart(
        &app,
        Method::POST,
        "/api/v1/movie/add-movie",
        &[
            ("file", Some("../escape.jpg"), &b"jpeg"[..]),
            ("movieDto", None, meta.as_bytes()),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_metadata_returns_400() {
    let app = build_test_app().await;

    let response = send_multipart(
        &app,
        Method::POST,
        "/api/v1/movie/add-movie",
        &[
            ("file", Some("a.jpg"), &b"jpeg"[..]),
            ("movieDto", None, &b"{not json"[..]),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!app.posters.path().join("a.jpg").exists());
}

#[tokio::test]
async fn update_without_file_keeps_poster() {
    let app = build_test_app().await;
    let id = add_movie(&app, "Inception", 2010, "inception.jpg").await;
    let meta = movie_json("Inception (IMAX)", 2011);

    let response = send_multipart(
        &app,
        Method::PUT,
        &format!("/api/v1/movie/{id}"),
        &[
            ("file", Some(""), &b""[..]),
            ("movieDTOobj", None, meta.as_bytes()),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["movieId"], id);
    assert_eq!(json["title"], "Inception (IMAX)");
    assert_eq!(json["releaseYear"], 2011);
    assert_eq!(json["poster"], "inception.jpg");
}

#[tokio::test]
async fn update_with_file_replaces_poster() {
    let app = build_test_app().await;
    let id = add_movie(&app, "Inception", 2010, "old.jpg").await;
    let meta = movie_json("Inception", 2010);

    let response = send_multipart(
        &app,
        Method::PUT,
        &format!("/api/v1/movie/{id}"),
        &[
            ("file", Some("new.png"), &b"png"[..]),
            ("movieDto", None, meta.as_bytes()),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["poster"], "new.png");
    assert_eq!(json["posterUrl"], "http://x/file/new.png");
    assert!(!app.posters.path().join("old.jpg").exists());
    assert!(app.posters.path().join("new.png").exists());
}

#[tokio::test]
async fn delete_removes_movie_and_poster() {
    let app = build_test_app().await;
    let id = add_movie(&app, "Inception", 2010, "inception.jpg").await;

    let response = send(&app, Method::DELETE, &format!("/api/v1/movie/{id}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_bytes(response).await,
        format!("Movie deleted with id = {id}").into_bytes()
    );
    assert_eq!(
        get(&app, &format!("/api/v1/movie/{id}")).await.status(),
        StatusCode::NOT_FOUND
    );
    assert!(!app.posters.path().join("inception.jpg").exists());
}

#[tokio::test]
async fn paged_listing_uses_defaults_and_reports_metadata() {
    let app = build_test_app().await;
    for i in 0..3 {
        add_movie(&app, &format!("Movie {i}"), 2000 + i, &format!("{i}.jpg")).await;
    }

    let json = body_json(get(&app, "/api/v1/movie/allMoviesPage?pageNumber=1&pageSize=2").await).await;
    assert_eq!(json["movieDtos"].as_array().unwrap().len(), 1);
    assert_eq!(json["pageNumber"], 1);
    assert_eq!(json["pageSize"], 2);
    assert_eq!(json["totalElements"], 3);
    assert_eq!(json["totalPages"], 2);
    assert_eq!(json["isLast"], true);

    let json = body_json(get(&app, "/api/v1/movie/allMoviesPage").await).await;
    assert_eq!(json["pageSize"], 10);
    assert_eq!(json["movieDtos"].as_array().unwrap().len(), 3);
    assert_eq!(json["isLast"], true);
}

#[tokio::test]
async fn zero_page_size_returns_400() {
    let app = build_test_app().await;
    let response = get(&app, "/api/v1/movie/allMoviesPage?pageSize=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sorted_listing() {
    let app = build_test_app().await;
    add_movie(&app, "Heat", 1995, "heat.jpg").await;
    add_movie(&app, "Alien", 1979, "alien.jpg").await;
    add_movie(&app, "Drive", 2011, "drive.jpg").await;

    let json = body_json(
        get(
            &app,
            "/api/v1/movie/allMoviesPageSort?pageNumber=0&pageSize=10&sortBy=title&sortOrder=ASC",
        )
        .await,
    )
    .await;
    let titles: Vec<&str> = json["movieDtos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Alien", "Drive", "Heat"]);

    let json = body_json(
        get(&app, "/api/v1/movie/allMoviesPageSort?sortBy=releaseYear&sortOrder=desc").await,
    )
    .await;
    let years: Vec<i64> = json["movieDtos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["releaseYear"].as_i64().unwrap())
        .collect();
    assert_eq!(years, vec![2011, 1995, 1979]);

    let response = get(&app, "/api/v1/movie/allMoviesPageSort?sortBy=budget").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn poster_url_serves_the_stored_file() {
    let app = build_test_app().await;
    add_movie(&app, "Inception", 2010, "inception.jpg").await;

    let response = get(&app, "/file/inception.jpg").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(body_bytes(response).await, b"poster-bytes");

    let missing = get(&app, "/file/missing.png").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn standalone_file_upload() {
    let app = build_test_app().await;

    let response = send_multipart(
        &app,
        Method::POST,
        "/file/upload",
        &[("file", Some("still.png"), &b"png"[..])],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"File uploaded : still.png");
    assert!(app.posters.path().join("still.png").exists());
}

#[tokio::test]
async fn health_and_readiness() {
    let app = build_test_app().await;

    let response = get(&app, "/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, "/readyz").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["checks"]["sqlite"]["ok"], true);
    assert_eq!(json["checks"]["disk"]["ok"], true);
}
