//! Shared helpers for driving the router end-to-end against an in-memory
//! store. Each test builds its own pool, so tests never share state.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use donate_secure::{app, db, AppState};
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

pub async fn test_state() -> AppState {
    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory store");
    db::init_schema(&pool).await.expect("init schema");
    AppState { db: pool }
}

pub async fn send(state: &AppState, request: Request<Body>) -> Response<Body> {
    app(state.clone())
        .oneshot(request)
        .await
        .expect("router response")
}

pub fn get(uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = session {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

pub fn post_form(uri: &str, body: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = session {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

/// `name=value` pair of a cookie set on the response, if any.
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .find_map(|cookie| {
            let pair = cookie.split(';').next()?.trim();
            let (key, _) = pair.split_once('=')?;
            (key == name).then(|| pair.to_string())
        })
}

/// Decoded flash notice attached to a redirect.
pub fn flash_message(response: &Response<Body>) -> Option<String> {
    let pair = set_cookie(response, "flash")?;
    let (_, raw) = pair.split_once('=')?;
    url::form_urlencoded::parse(format!("m={}", raw).as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

pub fn assert_redirects_to(response: &Response<Body>, target: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response).as_deref(), Some(target));
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Register an account through the HTTP surface and return its session
/// cookie pair.
pub async fn register(state: &AppState, email: &str, role: &str) -> String {
    let body = format!(
        "email={}&password=password123&role={}",
        email.replace('@', "%40"),
        role
    );
    let response = send(state, post_form("/process_register", &body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    set_cookie(&response, "session").expect("session cookie after registration")
}

pub async fn count(state: &AppState, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(&state.db)
        .await
        .expect("count query")
}
