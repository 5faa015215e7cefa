//! Integration tests: health, session auth, local login, current user

mod common;

use axum::http::{header, StatusCode};
use serde_json::json;

use common::*;

#[tokio::test]
async fn test_health_no_auth_required() {
    let app = spawn_app().await;

    let (status, body) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "seminar-console");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let app = spawn_app().await;

    for uri in ["/seminars", "/avatars", "/speakers", "/voices", "/tts_orders", "/user/me"] {
        let (status, body) = send(&app, get(uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["code"], 401, "{uri}");
        assert!(body["data"].is_null(), "{uri}");
    }
}

#[tokio::test]
async fn test_unknown_session_rejected() {
    let app = spawn_app().await;

    let (status, _) = send(&app, get("/user/me", Some(uuid::Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_oauth_session_rejected() {
    let app = spawn_app().await;
    let (_, token) = seed_user_expired(&app.db, "alice").await;

    let (status, body) = send(&app, get("/user/me", Some(token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token expired");
}

#[tokio::test]
async fn test_local_session_never_expires() {
    let app = spawn_app().await;
    let (user, token) = seed_user(&app.db, "alice").await;

    let (status, body) = send(&app, get("/user/me", Some(token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], user.username);
    assert_eq!(body["data"]["portrait"], "./portrait");
}

#[tokio::test]
async fn test_local_login_opens_session() {
    let app = spawn_app().await;
    seed_user(&app.db, "alice").await;

    let request = json_request(
        "POST",
        "/login",
        None,
        json!({"username": "alice", "password": "secret"}),
    );
    let response = send_raw(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The session cookie from the response authenticates /user/me
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("session cookie");
    let token = cookie
        .split(';')
        .next()
        .and_then(|kv| kv.strip_prefix("session_id="))
        .and_then(|v| uuid::Uuid::parse_str(v).ok())
        .expect("token in cookie");
    assert!(cookie.contains("Max-Age=3600"));

    let (status, body) = send(&app, get("/user/me", Some(token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");
}

#[tokio::test]
async fn test_local_login_wrong_password() {
    let app = spawn_app().await;
    seed_user(&app.db, "alice").await;

    let request = json_request(
        "POST",
        "/login",
        None,
        json!({"username": "alice", "password": "wrong"}),
    );
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_portrait_falls_back_to_placeholder() {
    let app = spawn_app().await;
    // Local session: no provider token, so the proxy cannot be attempted
    let (_, token) = seed_user(&app.db, "alice").await;

    let response = send_raw(&app, get("/user/me/portrait", Some(token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("image/svg+xml")
    );
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = spawn_app().await;
    let (_, token) = seed_user(&app.db, "alice").await;

    let response = send_raw(&app, get("/logout", Some(token))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // The session row is gone, so the old cookie no longer authenticates
    let (status, _) = send(&app, get("/user/me", Some(token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_oauth_login_redirects_to_provider() {
    let app = spawn_app().await;

    let response = send_raw(&app, get("/oauth2/login?next=/somewhere", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("redirect location");
    assert!(location.starts_with("https://idp.invalid/oauth2/authorize"));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("state="));
}
