//! Integration tests for chat, votes, selections and presence over HTTP,
//! including the events each action hands to the hub.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_chat_post_broadcasts_and_lists() {
    let app = helpers::TestApp::new().await;
    let share_id = app.create_share().await;
    let mut observer = app.observe(&share_id, "ben").await;

    let response = app
        .request(
            "POST",
            "/api/chat/messages",
            Some(json!({
                "share_id": share_id,
                "user_name": "ana",
                "message": "love this one",
                "photo_ref": "IMG_0001.jpg",
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let message_id = response.body["id"].as_str().unwrap().to_string();

    let event = helpers::next_event(&mut observer).await;
    assert_eq!(event["type"], "chat.message");
    assert_eq!(event["shareId"], share_id.as_str());
    assert_eq!(event["user"], "ana");
    assert_eq!(event["photoId"], "IMG_0001.jpg");
    assert_eq!(event["data"]["id"], message_id.as_str());
    assert_eq!(event["data"]["message"], "love this one");

    let history = app
        .request(
            "GET",
            &format!("/api/chat/messages/get?share_id={share_id}"),
            None,
        )
        .await;
    assert_eq!(history.status, StatusCode::OK);
    assert_eq!(history.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_chat_delete_is_author_only() {
    let app = helpers::TestApp::new().await;
    let share_id = app.create_share().await;

    let posted = app
        .request(
            "POST",
            "/api/chat/messages",
            Some(json!({
                "share_id": share_id,
                "user_name": "ana",
                "message": "hi",
            })),
        )
        .await;
    let message_id = posted.body["id"].as_str().unwrap().to_string();
    let mut observer = app.observe(&share_id, "ben").await;

    let forbidden = app
        .request(
            "POST",
            "/api/chat/messages/delete",
            Some(json!({
                "share_id": share_id,
                "message_id": message_id,
                "user_name": "ben",
            })),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let deleted = app
        .request(
            "POST",
            "/api/chat/messages/delete",
            Some(json!({
                "share_id": share_id,
                "message_id": message_id,
                "user_name": "ana",
            })),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["success"], true);

    let event = helpers::next_event(&mut observer).await;
    assert_eq!(event["type"], "chat.delete");
    assert_eq!(event["data"], json!({ "id": message_id }));
    assert!(event.get("photoId").is_none());
}

#[tokio::test]
async fn test_revote_updates_in_place() {
    let app = helpers::TestApp::new().await;
    let share_id = app.create_share().await;
    let mut observer = app.observe(&share_id, "viewer").await;

    for choice in ["yes", "no"] {
        let response = app
            .request(
                "POST",
                "/api/votes",
                Some(json!({
                    "share_id": share_id,
                    "file_name": "IMG_0002.jpg",
                    "user_name": "ana",
                    "choice": choice,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
    app.request(
        "POST",
        "/api/votes",
        Some(json!({
            "share_id": share_id,
            "file_name": "IMG_0002.jpg",
            "user_name": "ben",
            "choice": "Maybe",
        })),
    )
    .await;

    let first = helpers::next_event(&mut observer).await;
    assert_eq!(first["type"], "vote.cast");
    assert_eq!(first["photoId"], "IMG_0002.jpg");
    assert_eq!(first["action"], "yes");

    let listing = app
        .request(
            "GET",
            &format!("/api/votes/get?share_id={share_id}&file_name=IMG_0002.jpg"),
            None,
        )
        .await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body["votes"].as_array().unwrap().len(), 2);
    let expected = json!({ "yes": 0, "no": 1, "maybe": 1 });
    assert_eq!(listing.body["summary"], expected);
}

#[tokio::test]
async fn test_invalid_vote_choice() {
    let app = helpers::TestApp::new().await;
    let share_id = app.create_share().await;

    let response = app
        .request(
            "POST",
            "/api/votes",
            Some(json!({
                "share_id": share_id,
                "file_name": "a.jpg",
                "user_name": "ana",
                "choice": "perhaps",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_selections_drive_favorite_counts() {
    let app = helpers::TestApp::new().await;
    let share_id = app.create_share().await;

    for (user, file, favorite) in [
        ("ana", "a.jpg", true),
        ("ben", "a.jpg", true),
        ("ben", "b.jpg", true),
        ("ben", "b.jpg", false),
        ("cy", "c.jpg", false),
    ] {
        let response = app
            .request(
                "POST",
                "/api/selections",
                Some(json!({
                    "share_id": share_id,
                    "file_name": file,
                    "user_name": user,
                    "is_favorite": favorite,
                    "tags": ["keep"],
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let counts = app
        .request(
            "GET",
            &format!("/api/selections/counts?share_id={share_id}"),
            None,
        )
        .await;
    assert_eq!(counts.status, StatusCode::OK);
    assert_eq!(
        counts.body,
        json!({ "a.jpg": { "favorites": 2, "users": ["ana", "ben"] } })
    );

    let all = app
        .request(
            "GET",
            &format!("/api/selections/get?share_id={share_id}"),
            None,
        )
        .await;
    assert_eq!(all.body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_active_users_lists_connections() {
    let app = helpers::TestApp::new().await;
    let share_id = app.create_share().await;
    let _ana = app.observe(&share_id, "ana").await;
    let _ben = app.observe(&share_id, "ben").await;

    let path = format!("/api/active-users?shareId={share_id}");
    let response = app.request("GET", &path, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 2);
    let ana = json!({ "name": "ana", "viewing": null });
    assert_eq!(response.body["users"][0], ana);
    assert_eq!(response.body["users"][1]["name"], "ben");
}

#[tokio::test]
async fn test_queries_require_share_id() {
    let app = helpers::TestApp::new().await;

    for path in [
        "/api/chat/messages/get",
        "/api/votes/get",
        "/api/selections/get",
        "/api/selections/counts",
        "/api/active-users",
    ] {
        let response = app.request("GET", path, None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{path}");
    }
}

#[tokio::test]
async fn test_actions_on_unknown_share() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/selections",
            Some(json!({
                "share_id": "gone0000",
                "file_name": "a.jpg",
                "user_name": "ana",
                "is_favorite": true,
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
