//! API integration tests

use std::sync::Arc;

use bibliotheca_server::{build_router, clock::ManualClock, AppConfig, AppState};
use chrono::{Duration, TimeZone, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
async fn spawn_test_server(clock: Arc<ManualClock>) -> String {
    let app = build_router(AppState::new(AppConfig::default(), clock));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}/api/v1", port)
}

fn test_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 10, 7, 9, 0, 0).unwrap(),
    ))
}

async fn create_book(client: &Client, base: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}/books", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

async fn create_user(client: &Client, base: &str, name: &str) -> Value {
    let response = client
        .post(format!("{}/users", base))
        .json(&json!({ "name": name, "email": format!("{}@example.org", name.to_lowercase()) }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

async fn borrow(client: &Client, base: &str, book_id: &Value, user_id: &Value) -> reqwest::Response {
    client
        .post(format!("{}/loans", base))
        .json(&json!({ "book_id": book_id, "user_id": user_id }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let base = spawn_test_server(test_clock()).await;

    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_book_crud() {
    let base = spawn_test_server(test_clock()).await;
    let client = Client::new();

    let book = create_book(
        &client,
        &base,
        json!({
            "title": "A Wizard of Earthsea",
            "author": "Ursula K. Le Guin",
            "quantity": 2,
            "book_type": "loanable",
            "loan_duration_days": 12
        }),
    )
    .await;
    let id = book["id"].as_i64().unwrap();
    assert_eq!(id, 1);

    let response = client
        .put(format!("{}/books/{}", base, id))
        .json(&json!({
            "title": "A Wizard of Earthsea",
            "author": "Ursula K. Le Guin",
            "quantity": 4,
            "book_type": "loanable",
            "loan_duration_days": 30
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["quantity"], 4);
    assert_eq!(updated["created_at"], book["created_at"]);

    let found: Vec<Value> = client
        .get(format!("{}/books/search?q=earthsea", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let response = client
        .delete(format!("{}/books/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(format!("{}/books/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "NoSuchData");
}

#[tokio::test]
async fn test_invalid_book_is_rejected() {
    let base = spawn_test_server(test_clock()).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/books", base))
        .json(&json!({
            "title": "Tehanu",
            "author": "Ursula K. Le Guin",
            "quantity": 1,
            "book_type": "loanable",
            "loan_duration_days": 8
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_loan_lifecycle_with_fine() {
    let clock = test_clock();
    let base = spawn_test_server(clock.clone()).await;
    let client = Client::new();

    let book = create_book(
        &client,
        &base,
        json!({
            "title": "The Lathe of Heaven",
            "author": "Ursula K. Le Guin",
            "quantity": 1,
            "book_type": "loanable",
            "loan_duration_days": 6
        }),
    )
    .await;
    let user = create_user(&client, &base, "George").await;

    let response = borrow(&client, &base, &book["id"], &user["id"]).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let loan: Value = response.json().await.unwrap();
    assert_eq!(loan["status"], "active");
    assert_eq!(loan["book_id"], book["id"]);
    assert_eq!(loan["user_id"], user["id"]);
    assert!(loan["returned_at"].is_null());
    let loan_id = loan["id"].as_i64().unwrap();

    let stored: Value = client
        .get(format!("{}/books/{}", base, book["id"]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored["quantity"], 0);

    let user_loans: Vec<Value> = client
        .get(format!("{}/users/{}/loans", base, user["id"]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(user_loans.len(), 1);

    // three days past due
    clock.advance(Duration::days(9));

    let live: Value = client
        .get(format!("{}/loans/{}", base, loan_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(live["is_overdue"], true);
    assert_eq!(live["current_fine"], "6.00");

    let response = client
        .put(format!("{}/loans/{}/return", base, loan_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let returned: Value = response.json().await.unwrap();
    assert_eq!(returned["status"], "returned");
    assert_eq!(returned["loan"]["status"], "returned");
    assert_eq!(returned["loan"]["fine"], "6.00");

    let response = client
        .put(format!("{}/loans/{}/return", base, loan_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let stored: Value = client
        .get(format!("{}/books/{}", base, book["id"]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored["quantity"], 1);

    let user_loans: Vec<Value> = client
        .get(format!("{}/users/{}/loans", base, user["id"]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(user_loans.is_empty());

    let history: Vec<Value> = client
        .get(format!("{}/loans/search?status=returned", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_loan_rejections_map_to_status_codes() {
    let base = spawn_test_server(test_clock()).await;
    let client = Client::new();

    let reference = create_book(
        &client,
        &base,
        json!({
            "title": "Oxford English Dictionary",
            "author": "Oxford University Press",
            "quantity": 3,
            "book_type": "reference"
        }),
    )
    .await;
    let loanable = create_book(
        &client,
        &base,
        json!({
            "title": "Always Coming Home",
            "author": "Ursula K. Le Guin",
            "quantity": 1,
            "book_type": "loanable",
            "loan_duration_days": 30
        }),
    )
    .await;
    let first = create_user(&client, &base, "Stone").await;
    let second = create_user(&client, &base, "North").await;

    let response = borrow(&client, &base, &reference["id"], &first["id"]).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = borrow(&client, &base, &json!(999), &first["id"]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = borrow(&client, &base, &loanable["id"], &json!(999)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = borrow(&client, &base, &loanable["id"], &first["id"]).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = borrow(&client, &base, &loanable["id"], &second["id"]).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "BookNotAvailable");

    let response = client
        .delete(format!("{}/users/{}", base, first["id"]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let stats: Value = client
        .get(format!("{}/stats", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["total_books"], 2);
    assert_eq!(stats["total_users"], 2);
    assert_eq!(stats["active_loans"], 1);
    assert_eq!(stats["available_books"], 1);
}

#[tokio::test]
async fn test_concurrent_borrowers_for_last_copy() {
    let base = spawn_test_server(test_clock()).await;
    let client = Client::new();

    let book = create_book(
        &client,
        &base,
        json!({
            "title": "The Word for World Is Forest",
            "author": "Ursula K. Le Guin",
            "quantity": 1,
            "book_type": "loanable",
            "loan_duration_days": 12
        }),
    )
    .await;
    let a = create_user(&client, &base, "Selver").await;
    let b = create_user(&client, &base, "Lyubov").await;

    let (first, second) = tokio::join!(
        borrow(&client, &base, &book["id"], &a["id"]),
        borrow(&client, &base, &book["id"], &b["id"]),
    );

    let mut statuses = vec![first.status(), second.status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let base = spawn_test_server(test_clock()).await;
    let response = reqwest::get(format!("{}/nonexistent", base)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
