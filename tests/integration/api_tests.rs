//! API integration tests against a running check-in server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:5000";

/// Submit a check-in and return its id
async fn submit(client: &Client, name: &str, purpose: &str) -> String {
    let response = client
        .post(format!("{}/submit_checkin", BASE_URL))
        .json(&json!({ "name": name, "purpose": purpose }))
        .send()
        .await
        .expect("Failed to send check-in");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse check-in response");
    body["id"].as_str().expect("No id in response").to_string()
}

async fn find_visitor(client: &Client, id: &str) -> Value {
    let visitors: Value = client
        .get(format!("{}/visitors", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse listing");

    visitors
        .as_array()
        .expect("Listing is not an array")
        .iter()
        .find(|v| v["id"] == id)
        .cloned()
        .expect("Visitor missing from listing")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_home() {
    let client = Client::new();

    let response = client
        .get(BASE_URL)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body = response.text().await.expect("Failed to read body");
    assert_eq!(body, "Visitor Check-In System is Running!");
}

#[tokio::test]
#[ignore]
async fn test_checkin_is_pending() {
    let client = Client::new();
    let id = submit(&client, "Integration Visitor", "Testing").await;

    let visitor = find_visitor(&client, &id).await;
    assert_eq!(visitor["status"], "pending");
    assert_eq!(visitor["name"], "Integration Visitor");
    assert!(!visitor["time_in"].as_str().unwrap_or_default().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_checkin_missing_purpose() {
    let client = Client::new();

    let response = client
        .post(format!("{}/submit_checkin", BASE_URL))
        .json(&json!({ "name": "No Purpose" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_approve_then_reject() {
    let client = Client::new();
    let id = submit(&client, "Decided Visitor", "Testing").await;

    for action in ["approve", "reject"] {
        let response = client
            .post(format!("{}/{}/{}", BASE_URL, action, id))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());
    }

    let visitor = find_visitor(&client, &id).await;
    assert_eq!(visitor["status"], "rejected");
    assert_eq!(visitor["purpose"], "Testing");
}

#[tokio::test]
#[ignore]
async fn test_approve_unknown_visitor() {
    let client = Client::new();

    let response = client
        .post(format!("{}/approve/does-not-exist", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 500);
}

#[tokio::test]
#[ignore]
async fn test_generate_qr_twice() {
    let client = Client::new();
    let mut urls = Vec::new();

    for _ in 0..2 {
        let body: Value = client
            .post(format!("{}/generate_qr", BASE_URL))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response");
        urls.push(body["qr_code_url"].as_str().expect("No URL").to_string());
    }

    assert_ne!(urls[0], urls[1]);
}

#[tokio::test]
#[ignore]
async fn test_preflight() {
    let client = Client::new();

    let response = client
        .request(reqwest::Method::OPTIONS, format!("{}/update_status", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-methods"],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(
        headers["access-control-allow-headers"],
        "Content-Type, Authorization"
    );
}
