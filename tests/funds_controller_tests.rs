use axum::{
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use http_body_util::BodyExt;
use mongodb::Client;
use tower::ServiceExt;

use fundwatch::{config, controllers::funds_controller, AppState};

async fn test_state() -> AppState {
    let settings = config::load();

    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("mongodb client");
    let db = client.database(&settings.mongodb_db);

    AppState::new(db, settings)
}

async fn response_body_string(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

#[tokio::test]
async fn get_funds_rejects_page_zero() {
    let state = test_state().await;
    let app = Router::new()
        .route("/funds", get(funds_controller::get_funds))
        .with_state(state);

    let req = Request::builder()
        .method("GET")
        .uri("/funds?page=0&limit=10")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("page must be >= 1"));
}

#[tokio::test]
async fn get_funds_rejects_limit_zero() {
    let state = test_state().await;
    let app = Router::new()
        .route("/funds", get(funds_controller::get_funds))
        .with_state(state);

    let req = Request::builder()
        .method("GET")
        .uri("/funds?page=1&limit=0")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("limit must be between 1 and 100"));
}

#[tokio::test]
async fn get_funds_rejects_oversized_limit() {
    let state = test_state().await;
    let app = Router::new()
        .route("/funds", get(funds_controller::get_funds))
        .with_state(state);

    let req = Request::builder()
        .method("GET")
        .uri("/funds?page=1&limit=101")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("limit must be between 1 and 100"));
}
