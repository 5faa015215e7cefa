//! Integration tests: speaker/avatar visibility rules and the voice catalog

mod common;

use axum::http::StatusCode;
use base64::Engine;
use serde_json::json;
use uuid::Uuid;

use common::*;
use seminar_console::db;
use seminar_console::models::{Avatar, ResourceType};

#[tokio::test]
async fn test_speaker_visibility() {
    let app = spawn_app().await;
    let (alice, alice_token) = seed_user(&app.db, "alice").await;
    let (_, bob_token) = seed_user(&app.db, "bob").await;

    let private_speaker = seed_speaker(&app.db, alice.id, ResourceType::User).await;
    let system_speaker = seed_speaker(&app.db, alice.id, ResourceType::System).await;

    // Alice sees both
    let (_, body) = send(&app, get("/speakers", Some(alice_token))).await;
    assert_eq!(body["data"]["count"], 2);

    // Bob sees only the system speaker
    let (_, body) = send(&app, get("/speakers", Some(bob_token))).await;
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(
        uuid_field(&body["data"]["results"][0]["id"]),
        system_speaker.id
    );

    // Direct fetch by Bob: system visible, private hidden as NotFound
    let (status, _) = send(
        &app,
        get(&format!("/speakers/{}", system_speaker.id), Some(bob_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        get(&format!("/speakers/{}", private_speaker.id), Some(bob_token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_speaker_mutation_rules() {
    let app = spawn_app().await;
    let (alice, alice_token) = seed_user(&app.db, "alice").await;
    let (_, bob_token) = seed_user(&app.db, "bob").await;

    let private_speaker = seed_speaker(&app.db, alice.id, ResourceType::User).await;
    let system_speaker = seed_speaker(&app.db, alice.id, ResourceType::System).await;

    // Bob cannot rename Alice's speaker
    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/speakers/{}", private_speaker.id),
            Some(bob_token),
            json!({"name": "hijacked"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // System speakers are never deletable, not even by their owner record
    let (status, _) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/speakers/{}", system_speaker.id),
            Some(alice_token),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The owner deletes a user-type speaker
    let (status, _) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/speakers/{}", private_speaker.id),
            Some(alice_token),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_speaker_registration_binds_avatar_and_voice() {
    let app = spawn_app().await;
    let (_, token) = seed_user(&app.db, "alice").await;
    let voice = seed_voice(&app.db).await;

    let portrait = base64::engine::general_purpose::STANDARD.encode(b"not-really-a-photo");
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/speakers",
            Some(token),
            json!({
                "name": "My Speaker",
                "description": "mine",
                "voice": voice.id,
                "portrait": portrait,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["type"], "user");
    assert_eq!(uuid_field(&body["data"]["voice"]), voice.id);

    // The auto-created avatar exists, is user-typed and carries the portrait
    let avatar_id = uuid_field(&body["data"]["avatar"]);
    let (_, detail) = send(&app, get(&format!("/avatars/{}", avatar_id), Some(token))).await;
    assert_eq!(detail["data"]["type"], "user");
    assert!(detail["data"]["name"].as_str().unwrap().starts_with("alice-"));
    assert!(detail["data"]["portrait"]
        .as_str()
        .unwrap()
        .starts_with("avatars/alice/"));
}

#[tokio::test]
async fn test_speaker_registration_validation() {
    let app = spawn_app().await;
    let (_, token) = seed_user(&app.db, "alice").await;
    let voice = seed_voice(&app.db).await;
    let portrait = base64::engine::general_purpose::STANDARD.encode(b"photo");

    // portrait missing
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/speakers",
            Some(token),
            json!({"name": "S", "voice": voice.id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // voice missing
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/speakers",
            Some(token),
            json!({"name": "S", "portrait": portrait}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // unknown voice
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/speakers",
            Some(token),
            json!({"name": "S", "portrait": portrait, "voice": Uuid::new_v4()}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // invalid base64
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/speakers",
            Some(token),
            json!({"name": "S", "portrait": "!!!", "voice": voice.id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_avatar_rules() {
    let app = spawn_app().await;
    let (alice, alice_token) = seed_user(&app.db, "alice").await;
    let (_, bob_token) = seed_user(&app.db, "bob").await;

    let user_avatar = Avatar::new_user_owned("alice-avatar".into(), "p.png".into(), alice.id);
    db::avatars::create(&app.db, &user_avatar).await.unwrap();
    let mut system_avatar =
        Avatar::new_user_owned("platform-avatar".into(), "s.png".into(), alice.id);
    system_avatar.kind = ResourceType::System;
    db::avatars::create(&app.db, &system_avatar).await.unwrap();

    // Bob's list holds only the system avatar; detail of the private one hides
    let (_, body) = send(&app, get("/avatars", Some(bob_token))).await;
    assert_eq!(body["data"]["count"], 1);
    let (status, _) = send(
        &app,
        get(&format!("/avatars/{}", user_avatar.id), Some(bob_token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Owner can rename; system avatars are never deletable
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/avatars/{}", user_avatar.id),
            Some(alice_token),
            json!({"name": "renamed"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "renamed");

    let (status, _) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/avatars/{}", system_avatar.id),
            Some(alice_token),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/avatars/{}", user_avatar.id),
            Some(alice_token),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_voice_catalog() {
    let app = spawn_app().await;
    let (_, token) = seed_user(&app.db, "alice").await;
    let voice = seed_voice(&app.db).await;

    // default source lists the stored catalog
    let (status, body) = send(&app, get("/voices", Some(token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(uuid_field(&body["data"][0]["id"]), voice.id);

    let (status, _) = send(&app, get("/voices?source=db", Some(token))).await;
    assert_eq!(status, StatusCode::OK);

    // tts source is not configured in tests
    let (status, _) = send(&app, get("/voices?source=tts", Some(token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // unknown source
    let (status, _) = send(&app, get("/voices?source=cloud", Some(token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
