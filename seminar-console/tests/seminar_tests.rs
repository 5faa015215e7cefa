//! Integration tests: seminar lifecycle and generation orders

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;
use seminar_console::db;
use seminar_console::models::ResourceType;

#[tokio::test]
async fn test_seminar_lifecycle_scenario() {
    let app = spawn_app().await;
    let (user, token) = seed_user(&app.db, "alice").await;
    let speaker = seed_speaker(&app.db, user.id, ResourceType::System).await;

    // Create: state=empty, status.step=1
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/seminars",
            Some(token),
            json!({"title": "T", "speaker": speaker.id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["state"], "empty");
    assert_eq!(body["data"]["status"]["step"], 1);
    let seminar_id = uuid_field(&body["data"]["id"]);

    // empty --> draft: state=draft, status.step=2
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/seminars/{}", seminar_id),
            Some(token),
            json!({"state": "draft"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "draft");
    assert_eq!(body["data"]["status"]["step"], 2);

    // draft --> archived: persisted state is pending, one order created
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/seminars/{}", seminar_id),
            Some(token),
            json!({"state": "archived"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "pending");

    let order = db::generation_orders::get_by_seminar(&app.db, seminar_id)
        .await
        .unwrap()
        .expect("generation order exists");
    assert_eq!(order.seminar, seminar_id);

    // Second archive attempt: 400, state unchanged
    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/seminars/{}", seminar_id),
            Some(token),
            json!({"state": "archived"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, get(&format!("/seminars/{}", seminar_id), Some(token))).await;
    assert_eq!(body["data"]["state"], "pending");
}

#[tokio::test]
async fn test_create_seminar_requires_title_and_speaker() {
    let app = spawn_app().await;
    let (_, token) = seed_user(&app.db, "alice").await;

    let (status, _) = send(
        &app,
        json_request("POST", "/seminars", Some(token), json!({"title": "T"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/seminars",
            Some(token),
            json!({"title": "T", "speaker": uuid::Uuid::new_v4()}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not exists"));
}

#[tokio::test]
async fn test_speaker_of_another_user_not_referencable() {
    let app = spawn_app().await;
    let (alice, _) = seed_user(&app.db, "alice").await;
    let (_, bob_token) = seed_user(&app.db, "bob").await;
    let private_speaker = seed_speaker(&app.db, alice.id, ResourceType::User).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/seminars",
            Some(bob_token),
            json!({"title": "T", "speaker": private_speaker.id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_state_values_rejected() {
    let app = spawn_app().await;
    let (user, token) = seed_user(&app.db, "alice").await;
    let speaker = seed_speaker(&app.db, user.id, ResourceType::System).await;

    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/seminars",
            Some(token),
            json!({"title": "T", "speaker": speaker.id}),
        ),
    )
    .await;
    let seminar_id = uuid_field(&body["data"]["id"]);

    // Neither draft nor archived
    for bad in ["pending", "empty", "generating"] {
        let (status, _) = send(
            &app,
            json_request(
                "PUT",
                &format!("/seminars/{}", seminar_id),
                Some(token),
                json!({"state": bad}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");
    }

    // Legal value, illegal pair: empty --> archived
    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/seminars/{}", seminar_id),
            Some(token),
            json!({"state": "archived"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was persisted on the failed attempts
    let (_, body) = send(&app, get(&format!("/seminars/{}", seminar_id), Some(token))).await;
    assert_eq!(body["data"]["state"], "empty");
}

#[tokio::test]
async fn test_field_update_without_transition() {
    let app = spawn_app().await;
    let (user, token) = seed_user(&app.db, "alice").await;
    let speaker = seed_speaker(&app.db, user.id, ResourceType::System).await;

    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/seminars",
            Some(token),
            json!({"title": "T", "speaker": speaker.id}),
        ),
    )
    .await;
    let seminar_id = uuid_field(&body["data"]["id"]);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/seminars/{}", seminar_id),
            Some(token),
            json!({"title": "Renamed", "cover": "cover.png", "resources": {"slides": ["s1.png"]}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Renamed");
    assert_eq!(body["data"]["cover"], "cover.png");
    assert_eq!(body["data"]["resources"]["slides"][0], "s1.png");
    // no transition requested, state untouched
    assert_eq!(body["data"]["state"], "empty");
}

#[tokio::test]
async fn test_seminar_visibility_and_delete() {
    let app = spawn_app().await;
    let (alice, alice_token) = seed_user(&app.db, "alice").await;
    let (_, bob_token) = seed_user(&app.db, "bob").await;
    let speaker = seed_speaker(&app.db, alice.id, ResourceType::System).await;

    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/seminars",
            Some(alice_token),
            json!({"title": "T", "speaker": speaker.id}),
        ),
    )
    .await;
    let seminar_id = uuid_field(&body["data"]["id"]);

    // Bob cannot see or delete Alice's seminar
    let (status, _) = send(&app, get(&format!("/seminars/{}", seminar_id), Some(bob_token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/seminars/{}", seminar_id),
            Some(bob_token),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Alice deletes it; a second delete is NotFound
    let (status, _) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/seminars/{}", seminar_id),
            Some(alice_token),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/seminars/{}", seminar_id),
            Some(alice_token),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seminar_list_filters() {
    let app = spawn_app().await;
    let (user, token) = seed_user(&app.db, "alice").await;
    let speaker = seed_speaker(&app.db, user.id, ResourceType::System).await;

    for title in ["Alpha intro", "Beta deep dive"] {
        send(
            &app,
            json_request(
                "POST",
                "/seminars",
                Some(token),
                json!({"title": title, "speaker": speaker.id}),
            ),
        )
        .await;
    }

    let (_, body) = send(&app, get("/seminars", Some(token))).await;
    assert_eq!(body["data"]["count"], 2);

    let (_, body) = send(&app, get("/seminars?name=alpha", Some(token))).await;
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["results"][0]["title"], "Alpha intro");

    let (_, body) = send(&app, get("/seminars?state=empty", Some(token))).await;
    assert_eq!(body["data"]["count"], 2);
    let (_, body) = send(&app, get("/seminars?state=pending", Some(token))).await;
    assert_eq!(body["data"]["count"], 0);
    let (_, body) = send(&app, get("/seminars?state=all", Some(token))).await;
    assert_eq!(body["data"]["count"], 2);
}

#[tokio::test]
async fn test_explicit_generation_order_unique_per_seminar() {
    let app = spawn_app().await;
    let (user, token) = seed_user(&app.db, "alice").await;
    let (_, bob_token) = seed_user(&app.db, "bob").await;
    let speaker = seed_speaker(&app.db, user.id, ResourceType::System).await;

    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/seminars",
            Some(token),
            json!({"title": "T", "speaker": speaker.id}),
        ),
    )
    .await;
    let seminar_id = uuid_field(&body["data"]["id"]);

    // Bob cannot target Alice's seminar: hidden as NotFound
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/generation_orders",
            Some(bob_token),
            json!({"seminar": seminar_id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/generation_orders",
            Some(token),
            json!({"seminar": seminar_id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "pending");

    // The unique index rejects a second order
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/generation_orders",
            Some(token),
            json!({"seminar": seminar_id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_archive_after_explicit_order_fails_dependency() {
    let app = spawn_app().await;
    let (user, token) = seed_user(&app.db, "alice").await;
    let speaker = seed_speaker(&app.db, user.id, ResourceType::System).await;

    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/seminars",
            Some(token),
            json!({"title": "T", "speaker": speaker.id}),
        ),
    )
    .await;
    let seminar_id = uuid_field(&body["data"]["id"]);

    send(
        &app,
        json_request(
            "PUT",
            &format!("/seminars/{}", seminar_id),
            Some(token),
            json!({"state": "draft"}),
        ),
    )
    .await;
    send(
        &app,
        json_request(
            "POST",
            "/generation_orders",
            Some(token),
            json!({"seminar": seminar_id}),
        ),
    )
    .await;

    // Archiving needs to create its order, which already exists: the whole
    // update fails and the seminar stays draft
    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/seminars/{}", seminar_id),
            Some(token),
            json!({"state": "archived"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, get(&format!("/seminars/{}", seminar_id), Some(token))).await;
    assert_eq!(body["data"]["state"], "draft");
}
