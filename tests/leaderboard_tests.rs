// tests/leaderboard_tests.rs

use std::sync::Arc;

use quiz_backend::{
    config::Config,
    routes,
    state::AppState,
    store::{UserLocks, memory::MemoryStore},
};

async fn spawn_app() -> (String, MemoryStore) {
    let store = MemoryStore::new();

    let config = Config {
        database_url: "unused-in-tests".to_string(),
        rust_log: "error".to_string(),
    };

    let state = AppState {
        profiles: Arc::new(store.clone()),
        catalog: Arc::new(store.clone()),
        locks: UserLocks::default(),
        config,
    };

    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, store)
}

/// Seeds a profile document with the given points directly in the store.
/// Ids are chosen so the store enumerates them in seeding order.
async fn seed_profile(store: &MemoryStore, id: &str, name: &str, points: i64) {
    store
        .seed_profile_doc(
            id,
            serde_json::json!({
                "email": format!("{}@example.com", id),
                "name": name,
                "points": points,
                "totalQuestionsAnswered": 0,
                "correctAnswers": 0,
                "streak": 0,
                "rank": 0,
                "completedQuestions": [],
                "favoriteQuestions": [],
                "notificationSettings": { "email": true, "push": true, "dailyReminder": true },
                "activityHistory": [],
                "createdAt": "2025-01-01T00:00:00Z",
                "lastLoginAt": "2025-01-01T00:00:00Z"
            }),
        )
        .await;
}

#[tokio::test]
async fn empty_leaderboard_is_empty() {
    let (address, _store) = spawn_app().await;
    let client = reqwest::Client::new();

    let entries: Vec<serde_json::Value> = client
        .get(format!("{}/api/leaderboard", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(entries.is_empty());
}

#[tokio::test]
async fn leaderboard_orders_points_and_breaks_ties_stably() {
    let (address, store) = spawn_app().await;
    let client = reqwest::Client::new();

    // Enumeration order is id order: u1 (50), u2 (80), u3 (80).
    seed_profile(&store, "u1", "Low", 50).await;
    seed_profile(&store, "u2", "First Eighty", 80).await;
    seed_profile(&store, "u3", "Second Eighty", 80).await;

    let entries: Vec<serde_json::Value> = client
        .get(format!("{}/api/leaderboard", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(entries.len(), 3);

    // The two 80s keep their prior relative order; ranks are 1-indexed.
    assert_eq!(entries[0]["id"], "u2");
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[1]["id"], "u3");
    assert_eq!(entries[1]["rank"], 2);
    assert_eq!(entries[2]["id"], "u1");
    assert_eq!(entries[2]["rank"], 3);

    for pair in entries.windows(2) {
        assert!(pair[0]["points"].as_i64().unwrap() >= pair[1]["points"].as_i64().unwrap());
    }
}

#[tokio::test]
async fn leaderboard_persists_ranks_back_to_profiles() {
    let (address, store) = spawn_app().await;
    let client = reqwest::Client::new();

    seed_profile(&store, "u1", "Low", 50).await;
    seed_profile(&store, "u2", "High", 80).await;

    client
        .get(format!("{}/api/leaderboard", address))
        .send()
        .await
        .unwrap();

    let high: serde_json::Value = client
        .get(format!("{}/api/users/u2", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(high["rank"], 1);

    let low: serde_json::Value = client
        .get(format!("{}/api/users/u1", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(low["rank"], 2);
}

#[tokio::test]
async fn leaderboard_recompute_is_idempotent() {
    let (address, store) = spawn_app().await;
    let client = reqwest::Client::new();

    seed_profile(&store, "u1", "Low", 50).await;
    seed_profile(&store, "u2", "First Eighty", 80).await;
    seed_profile(&store, "u3", "Second Eighty", 80).await;

    let url = format!("{}/api/leaderboard", address);
    let once: Vec<serde_json::Value> =
        client.get(&url).send().await.unwrap().json().await.unwrap();
    let twice: Vec<serde_json::Value> =
        client.get(&url).send().await.unwrap().json().await.unwrap();

    assert_eq!(once, twice);
}

#[tokio::test]
async fn partial_profile_document_fills_defaults() {
    let (address, store) = spawn_app().await;
    let client = reqwest::Client::new();

    // A document from an older revision: most fields missing.
    store
        .seed_profile_doc("ghost", serde_json::json!({ "name": "Ghost", "points": 12 }))
        .await;

    let profile: serde_json::Value = client
        .get(format!("{}/api/users/ghost", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(profile["name"], "Ghost");
    assert_eq!(profile["points"], 12);
    assert_eq!(profile["correctAnswers"], 0);
    assert_eq!(profile["streak"], 0);
    assert_eq!(profile["completedQuestions"], serde_json::json!([]));
    assert_eq!(profile["favoriteQuestions"], serde_json::json!([]));

    // And it still shows up on the leaderboard.
    let entries: Vec<serde_json::Value> = client
        .get(format!("{}/api/leaderboard", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["points"], 12);
}

#[tokio::test]
async fn garbled_profile_errors_but_leaderboard_skips_it() {
    let (address, store) = spawn_app().await;
    let client = reqwest::Client::new();

    seed_profile(&store, "ok", "Fine", 30).await;
    store
        .seed_profile_doc("broken", serde_json::json!({ "points": "twelve" }))
        .await;

    // Direct read surfaces the malformed document.
    let response = client
        .get(format!("{}/api/users/broken", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 500);

    // The leaderboard snapshot tolerates the gap.
    let entries: Vec<serde_json::Value> = client
        .get(format!("{}/api/leaderboard", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], "ok");
}
