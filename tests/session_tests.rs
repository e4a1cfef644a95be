// tests/session_tests.rs
//
// Session CRUD, like/unlike idempotence, comments, and the friends feed.

use sqlx::postgres::PgPoolOptions;
use surflog::{config::Config, routes, state::AppState};

async fn spawn_app() -> String {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: database_url.clone(),
        jwt_secret: "session_test_secret".to_string(),
        jwt_expiration: 600,
        request_timeout: 10,
        rust_log: "error".to_string(),
    };

    let state = AppState { pool, config };
    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

const PASSWORD: &str = "Password123!";

async fn register_and_login(client: &reqwest::Client, address: &str, prefix: &str) -> (String, i64) {
    let username = format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8]);

    client
        .post(&format!("{}/users/register", address))
        .json(&serde_json::json!({"username": username, "password": PASSWORD}))
        .send()
        .await
        .expect("Register failed");

    let login: serde_json::Value = client
        .post(&format!("{}/users/login", address))
        .json(&serde_json::json!({"username": username, "password": PASSWORD}))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    let token = login["data"]["token"].as_str().unwrap().to_string();
    let id = login["data"]["id"].as_i64().unwrap();
    (token, id)
}

fn session_payload(date: &str) -> serde_json::Value {
    serde_json::json!({
        "date": date,
        "sport": "surfing",
        "location": {"name": "Pipeline", "coords": [21.6, -158.0]},
        "equipment": {"board": "6ft shortboard"},
        "description": "Clean overhead sets all morning",
        "conditions": {
            "wind": {"direction": 45.0, "speed": 12.0, "gust": 18.0},
            "swell": {"direction": 310.0, "height": 2.5, "frequency": 14.0}
        }
    })
}

async fn create_session(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    date: &str,
) -> i64 {
    let response = client
        .post(&format!("{}/sessions", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&session_payload(date))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    body["data"]["id"].as_i64().unwrap()
}

async fn session_detail(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    session_id: i64,
) -> serde_json::Value {
    let body: serde_json::Value = client
        .get(&format!("{}/sessions/{}", address, session_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["data"].clone()
}

/// Befriends two users via the full request/accept flow.
async fn befriend(
    client: &reqwest::Client,
    address: &str,
    requester_token: &str,
    requestee_token: &str,
    requestee_id: i64,
) {
    client
        .post(&format!("{}/friends/request/{}", address, requestee_id))
        .header("Authorization", format!("Bearer {}", requester_token))
        .send()
        .await
        .unwrap();

    let pending: serde_json::Value = client
        .get(&format!("{}/friends/requests", address))
        .header("Authorization", format!("Bearer {}", requestee_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let request_id = pending["data"][0]["id"].as_i64().unwrap();

    let accept = client
        .put(&format!("{}/friends/request/{}", address, request_id))
        .header("Authorization", format!("Bearer {}", requestee_token))
        .send()
        .await
        .unwrap();
    assert_eq!(accept.status().as_u16(), 200);
}

#[tokio::test]
async fn session_validation_rejects_out_of_range_conditions() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, _) = register_and_login(&client, &address, "val").await;

    let mut payload = session_payload("2024-01-01T10:00:00Z");
    payload["conditions"]["wind"]["direction"] = serde_json::json!(400.0);

    let response = client
        .post(&format!("{}/sessions", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn like_is_conflict_on_repeat_and_unlike_is_idempotent() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let (alice_token, _) = register_and_login(&client, &address, "alice").await;
    let (bob_token, _) = register_and_login(&client, &address, "bob").await;

    let session_id = create_session(&client, &address, &alice_token, "2024-01-01T10:00:00Z").await;

    let like_url = format!("{}/sessions/{}/like", address, session_id);

    let first = client
        .put(&like_url)
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status().as_u16(), 201);

    let second = client
        .put(&like_url)
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status().as_u16(), 409);

    let detail = session_detail(&client, &address, &bob_token, session_id).await;
    assert_eq!(detail["likes_count"].as_i64().unwrap(), 1);

    // Unlike twice: second is a no-op, not an error.
    for expected_count in [0, 0] {
        let unlike = client
            .delete(&like_url)
            .header("Authorization", format!("Bearer {}", bob_token))
            .send()
            .await
            .unwrap();
        assert_eq!(unlike.status().as_u16(), 200);

        let detail = session_detail(&client, &address, &bob_token, session_id).await;
        assert_eq!(detail["likes_count"].as_i64().unwrap(), expected_count);
    }
}

#[tokio::test]
async fn detail_reports_viewer_relative_has_liked() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let (alice_token, _) = register_and_login(&client, &address, "alice").await;
    let (bob_token, _) = register_and_login(&client, &address, "bob").await;
    let (carol_token, _) = register_and_login(&client, &address, "carol").await;

    let session_id = create_session(&client, &address, &alice_token, "2024-01-01T10:00:00Z").await;

    let like = client
        .put(&format!("{}/sessions/{}/like", address, session_id))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    assert_eq!(like.status().as_u16(), 201);

    let as_bob = session_detail(&client, &address, &bob_token, session_id).await;
    assert_eq!(as_bob["likes_count"].as_i64().unwrap(), 1);
    assert_eq!(as_bob["has_liked"], true);

    let as_carol = session_detail(&client, &address, &carol_token, session_id).await;
    assert_eq!(as_carol["likes_count"].as_i64().unwrap(), 1);
    assert_eq!(as_carol["has_liked"], false);

    // The raw like set is never exposed.
    assert!(as_bob.get("likes").is_none());
}

#[tokio::test]
async fn only_the_author_may_modify_a_session() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let (alice_token, _) = register_and_login(&client, &address, "alice").await;
    let (bob_token, _) = register_and_login(&client, &address, "bob").await;

    let session_id = create_session(&client, &address, &alice_token, "2024-01-01T10:00:00Z").await;

    let update = client
        .put(&format!("{}/sessions/{}", address, session_id))
        .header("Authorization", format!("Bearer {}", bob_token))
        .json(&session_payload("2024-02-01T10:00:00Z"))
        .send()
        .await
        .unwrap();
    assert_eq!(update.status().as_u16(), 403);

    let delete = client
        .delete(&format!("{}/sessions/{}", address, session_id))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    assert_eq!(delete.status().as_u16(), 403);

    // The author can.
    let delete = client
        .delete(&format!("{}/sessions/{}", address, session_id))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(delete.status().as_u16(), 200);
}

#[tokio::test]
async fn feed_shows_each_friends_latest_session_only() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let (alice_token, alice_id) = register_and_login(&client, &address, "alice").await;
    let (bob_token, bob_id) = register_and_login(&client, &address, "bob").await;
    let (carol_token, carol_id) = register_and_login(&client, &address, "carol").await;

    befriend(&client, &address, &alice_token, &bob_token, bob_id).await;
    befriend(&client, &address, &alice_token, &carol_token, carol_id).await;

    // Bob posts twice; only the later session should surface.
    create_session(&client, &address, &bob_token, "2024-01-01T10:00:00Z").await;
    let bob_latest = create_session(&client, &address, &bob_token, "2024-03-01T10:00:00Z").await;
    let carol_session = create_session(&client, &address, &carol_token, "2024-02-01T10:00:00Z").await;

    let body: serde_json::Value = client
        .get(&format!("{}/sessions/feed/{}", address, alice_id))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let feed = body["data"].as_array().unwrap();
    assert_eq!(feed.len(), 2);

    // Ordered by activity date descending: Bob's March session, then Carol's.
    assert_eq!(feed[0]["id"].as_i64().unwrap(), bob_latest);
    assert_eq!(feed[1]["id"].as_i64().unwrap(), carol_session);

    // Feed cards are stripped of heavyweight fields.
    assert!(feed[0].get("description").is_none());
    assert!(feed[0].get("equipment").is_none());

    // The feed is self-gated.
    let other = client
        .get(&format!("{}/sessions/feed/{}", address, bob_id))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(other.status().as_u16(), 403);
}

#[tokio::test]
async fn comments_flow_with_likes_and_ownership() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let (alice_token, _) = register_and_login(&client, &address, "alice").await;
    let (bob_token, _) = register_and_login(&client, &address, "bob").await;

    let session_id = create_session(&client, &address, &alice_token, "2024-01-01T10:00:00Z").await;

    let create = client
        .post(&format!("{}/sessions/{}/comments", address, session_id))
        .header("Authorization", format!("Bearer {}", bob_token))
        .json(&serde_json::json!({"text": "Looked firing out there"}))
        .send()
        .await
        .unwrap();
    assert_eq!(create.status().as_u16(), 201);
    let created: serde_json::Value = create.json().await.unwrap();
    let comment_id = created["data"]["id"].as_i64().unwrap();

    // Alice likes Bob's comment; a repeat like conflicts.
    let like_url = format!(
        "{}/sessions/{}/comments/{}/like",
        address, session_id, comment_id
    );
    let like = client
        .put(&like_url)
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(like.status().as_u16(), 201);

    let repeat = client
        .put(&like_url)
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(repeat.status().as_u16(), 409);

    let listed: serde_json::Value = client
        .get(&format!("{}/sessions/{}/comments", address, session_id))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let comments = listed["data"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["likes_count"].as_i64().unwrap(), 1);
    assert_eq!(comments[0]["has_liked"], true);

    // Only the comment's author may delete it.
    let delete_url = format!("{}/sessions/{}/comments/{}", address, session_id, comment_id);
    let forged = client
        .delete(&delete_url)
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(forged.status().as_u16(), 403);

    let delete = client
        .delete(&delete_url)
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    assert_eq!(delete.status().as_u16(), 200);
}

#[tokio::test]
async fn overviews_list_newest_first_with_viewer_annotations() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let (alice_token, alice_id) = register_and_login(&client, &address, "alice").await;
    let (bob_token, _) = register_and_login(&client, &address, "bob").await;

    let older = create_session(&client, &address, &alice_token, "2024-01-01T10:00:00Z").await;
    let newer = create_session(&client, &address, &alice_token, "2024-03-01T10:00:00Z").await;

    // Bob likes only the older session.
    let like = client
        .put(&format!("{}/sessions/{}/like", address, older))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    assert_eq!(like.status().as_u16(), 201);

    let body: serde_json::Value = client
        .get(&format!("{}/sessions/user/{}", address, alice_id))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let overviews = body["data"].as_array().unwrap();
    assert_eq!(overviews.len(), 2);

    // Newest activity first.
    assert_eq!(overviews[0]["id"].as_i64().unwrap(), newer);
    assert_eq!(overviews[1]["id"].as_i64().unwrap(), older);

    // Viewer-relative annotations follow Bob's like.
    assert_eq!(overviews[0]["has_liked"], false);
    assert_eq!(overviews[0]["likes_count"].as_i64().unwrap(), 0);
    assert_eq!(overviews[1]["has_liked"], true);
    assert_eq!(overviews[1]["likes_count"].as_i64().unwrap(), 1);

    // Heavy fields are stripped; conditions and coords survive.
    assert!(overviews[0].get("description").is_none());
    assert!(overviews[0].get("equipment").is_none());
    assert!(overviews[0].get("created_date").is_none());
    assert!(overviews[0]["conditions"].is_object());
    assert!(overviews[0]["coords"].is_array());

    // An absent user yields 404, not an empty list.
    let missing = client
        .get(&format!("{}/sessions/user/{}", address, i64::MAX))
        .header("Authorization", format!("Bearer {}", bob_token))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn comment_like_requires_matching_session_path() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let (alice_token, _) = register_and_login(&client, &address, "alice").await;
    let (bob_token, _) = register_and_login(&client, &address, "bob").await;

    let session_a = create_session(&client, &address, &alice_token, "2024-01-01T10:00:00Z").await;
    let session_b = create_session(&client, &address, &alice_token, "2024-02-01T10:00:00Z").await;

    let created: serde_json::Value = client
        .post(&format!("{}/sessions/{}/comments", address, session_a))
        .header("Authorization", format!("Bearer {}", bob_token))
        .json(&serde_json::json!({"text": "Solid session"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let comment_id = created["data"]["id"].as_i64().unwrap();

    // Addressing the comment through the wrong session is a 404.
    let mismatched = client
        .put(&format!(
            "{}/sessions/{}/comments/{}/like",
            address, session_b, comment_id
        ))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(mismatched.status().as_u16(), 404);

    // So is an unlike through the wrong session.
    let mismatched_unlike = client
        .delete(&format!(
            "{}/sessions/{}/comments/{}/like",
            address, session_b, comment_id
        ))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(mismatched_unlike.status().as_u16(), 404);

    // The correct path still works.
    let like = client
        .put(&format!(
            "{}/sessions/{}/comments/{}/like",
            address, session_a, comment_id
        ))
        .header("Authorization", format!("Bearer {}", alice_token))
        .send()
        .await
        .unwrap();
    assert_eq!(like.status().as_u16(), 201);
}
