use axum::{
    http::{Request, StatusCode},
    routing::{delete, get, post},
    Router,
};
use http_body_util::BodyExt;
use mongodb::Client;
use tower::ServiceExt;

use fundwatch::{config, controllers::links_controller, AppState};

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
async fn add_favorite_unauthorized_is_rejected() {
    let state = test_state().await;
    let app = Router::new()
        .route("/favorites/:code", post(links_controller::post_add_favorite))
        .with_state(state);

    let req = Request::builder()
        .method("POST")
        .uri("/favorites/000001")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = response_body_string(res).await;
    assert!(body.contains("not authenticated"));
}

#[tokio::test]
async fn add_monitor_unauthorized_is_rejected() {
    let state = test_state().await;
    let app = Router::new()
        .route("/monitors/:code", post(links_controller::post_add_monitor))
        .with_state(state);

    let req = Request::builder()
        .method("POST")
        .uri("/monitors/000001")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn remove_favorite_unauthorized_is_rejected() {
    let state = test_state().await;
    let app = Router::new()
        .route("/favorites/:code", delete(links_controller::delete_favorite))
        .with_state(state);

    let req = Request::builder()
        .method("DELETE")
        .uri("/favorites/000001")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_monitors_unauthorized_is_rejected() {
    let state = test_state().await;
    let app = Router::new()
        .route("/monitors", get(links_controller::get_monitors))
        .with_state(state);

    let req = Request::builder()
        .method("GET")
        .uri("/monitors")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = response_body_string(res).await;
    assert!(body.contains("not authenticated"));
}
