use axum::{
    http::{header, Request, StatusCode},
    routing::post,
    Router,
};
use http_body_util::BodyExt;
use mongodb::Client;
use tower::ServiceExt;

use fundwatch::models::CurrentUser;
use fundwatch::{config, controllers::alerts_controller, controllers::rules_controller, AppState};

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

fn current_user() -> CurrentUser {
    CurrentUser {
        id: "user-1".to_string(),
        nickname: Some("tester".to_string()),
    }
}

#[tokio::test]
async fn save_rule_unauthorized_is_rejected() {
    let state = test_state().await;
    let app = Router::new()
        .route("/monitors/:code/rules", post(rules_controller::post_save_rule))
        .with_state(state);

    let req = Request::builder()
        .method("POST")
        .uri("/monitors/000001/rules")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(r#"{"riseThreshold": 2.0}"#))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn save_rule_without_any_threshold_is_rejected() {
    let state = test_state().await;
    let app = Router::new()
        .route("/monitors/:code/rules", post(rules_controller::post_save_rule))
        .with_state(state);

    let mut req = Request::builder()
        .method("POST")
        .uri("/monitors/000001/rules")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(r#"{"ruleName": "no thresholds"}"#))
        .unwrap();

    req.extensions_mut().insert(current_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("at least one"));
}

#[tokio::test]
async fn save_rule_with_malformed_push_time_is_rejected() {
    let state = test_state().await;
    let app = Router::new()
        .route("/monitors/:code/rules", post(rules_controller::post_save_rule))
        .with_state(state);

    let mut req = Request::builder()
        .method("POST")
        .uri("/monitors/000001/rules")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            r#"{"riseThreshold": 2.0, "pushTime": "25:99"}"#,
        ))
        .unwrap();

    req.extensions_mut().insert(current_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("pushTime must be HH:mm"));
}

#[tokio::test]
async fn save_rule_with_negative_rise_threshold_is_rejected() {
    let state = test_state().await;
    let app = Router::new()
        .route("/monitors/:code/rules", post(rules_controller::post_save_rule))
        .with_state(state);

    let mut req = Request::builder()
        .method("POST")
        .uri("/monitors/000001/rules")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(r#"{"riseThreshold": -1.0}"#))
        .unwrap();

    req.extensions_mut().insert(current_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("riseThreshold"));
}

#[tokio::test]
async fn save_rule_with_bad_rule_id_is_rejected() {
    let state = test_state().await;
    let app = Router::new()
        .route("/monitors/:code/rules", post(rules_controller::post_save_rule))
        .with_state(state);

    let mut req = Request::builder()
        .method("POST")
        .uri("/monitors/000001/rules")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            r#"{"riseThreshold": 2.0, "ruleId": "not-an-object-id"}"#,
        ))
        .unwrap();

    req.extensions_mut().insert(current_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("bad rule id"));
}

#[tokio::test]
async fn push_now_unauthorized_is_rejected() {
    let state = test_state().await;
    let app = Router::new()
        .route("/monitors/:code/push", post(alerts_controller::post_push_now))
        .with_state(state);

    let req = Request::builder()
        .method("POST")
        .uri("/monitors/000001/push")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(r#"{"ruleId": "abc"}"#))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn push_now_with_bad_rule_id_is_rejected() {
    let state = test_state().await;
    let app = Router::new()
        .route("/monitors/:code/push", post(alerts_controller::post_push_now))
        .with_state(state);

    let mut req = Request::builder()
        .method("POST")
        .uri("/monitors/000001/push")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(r#"{"ruleId": "not-an-object-id"}"#))
        .unwrap();

    req.extensions_mut().insert(current_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("bad rule id"));
}
