use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use serial_test::serial;

use crate::setup::{register, setup_test, AuthResponse};

mod setup;

#[tokio::test]
#[serial]
async fn home_answers_in_plain_text() {
    let (client, url) = setup_test().await;

    let res = client.get(url.clone()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("/api/Products"));
}

#[tokio::test]
#[serial]
async fn registered_user_can_login() {
    let (client, url) = setup_test().await;
    let registered = register(&client, &url, "someone@example.com", Some("09876543210")).await;
    assert_eq!(registered.email, "someone@example.com");
    assert!(!registered.token.is_empty());

    let res = client
        .post(url.join("/api/Account/login").unwrap())
        .json(&json!({ "email": "someone@example.com", "password": "secure:12345678" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let login: AuthResponse = res.json().await.unwrap();
    assert_eq!(login.email, "someone@example.com");

    let res = client
        .post(url.join("/api/Product").unwrap())
        .bearer_auth(&login.token)
        .json(&json!({ "name": "Headphones", "isAvailable": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
#[serial]
async fn account_emails_ignore_case() {
    let (client, url) = setup_test().await;
    let registered = register(&client, &url, "User@Example.com", None).await;
    assert_eq!(registered.email, "user@example.com");

    let res = client
        .post(url.join("/api/Account/register").unwrap())
        .json(&json!({
            "email": "USER@example.com",
            "password": "secure:12345678",
            "confirmPassword": "secure:12345678",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(url.join("/api/Account/login").unwrap())
        .json(&json!({ "email": "user@EXAMPLE.com", "password": "secure:12345678" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let login: AuthResponse = res.json().await.unwrap();
    assert_eq!(login.email, "user@example.com");
}

#[tokio::test]
#[serial]
async fn login_rejects_bad_credentials() {
    let (client, url) = setup_test().await;
    register(&client, &url, "someone@example.com", None).await;

    let res = client
        .post(url.join("/api/Account/login").unwrap())
        .json(&json!({ "email": "someone@example.com", "password": "secure:00000000" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(url.join("/api/Account/login").unwrap())
        .json(&json!({ "email": "nobody@example.com", "password": "secure:12345678" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn registration_validates_the_account() {
    let (client, url) = setup_test().await;
    register(&client, &url, "someone@example.com", None).await;

    let res = client
        .post(url.join("/api/Account/register").unwrap())
        .json(&json!({
            "email": "someone@example.com",
            "password": "secure:12345678",
            "confirmPassword": "secure:12345678",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["Validation"]["fields"][0]["path"], "/email");
    assert_eq!(
        body["error"]["Validation"]["fields"][0]["kinds"][0],
        "AlreadyExists"
    );

    let res = client
        .post(url.join("/api/Account/register").unwrap())
        .json(&json!({
            "Email": "new@example.com",
            "Password": "secure:12345678",
            "ConfirmPassword": "secure:87654321",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["error"]["Validation"]["fields"][0]["path"],
        "/confirmPassword"
    );

    let res = client
        .post(url.join("/api/Account/register").unwrap())
        .json(&json!({
            "email": "not-an-email",
            "phone": "12345",
            "password": "secure:12345678",
            "confirmPassword": "secure:12345678",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    let paths: Vec<&str> = body["error"]["Validation"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|field| field["path"].as_str())
        .collect();
    assert_eq!(paths, vec!["/email", "/phone"]);
}
