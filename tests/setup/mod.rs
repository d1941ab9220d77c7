#![allow(dead_code)]

use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client, StatusCode,
};
use salvo::{listener::TcpListener, Server};
use serde::{Deserialize, Serialize};
use url::Url;

use product_catalog::{
    config::env_var::{DatabaseSettings, JwtSettings},
    infra::{database::connection, router, Dependencies},
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDto<'a> {
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub password: &'a str,
    pub confirm_password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub email: String,
    pub expiration: String,
}

pub fn jwt_settings() -> JwtSettings {
    JwtSettings {
        key: "integration-test-secret".into(),
        issuer: "product-catalog".into(),
        audience: "product-catalog-api".into(),
        expiration: Duration::from_secs(60 * 60),
    }
}

/// Starts the api over in-memory storage on a free port.
pub async fn setup_test() -> (Client, Url) {
    let port = free_port();
    let address = format!("127.0.0.1:{port}");
    let app = router::app(Dependencies::in_memory(&jwt_settings()));

    let listener = TcpListener::bind(&address);
    tokio::spawn(async move {
        Server::new(listener).serve(app).await;
    });

    let client = create_client();
    let url = Url::parse(&format!("http://{address}")).unwrap();
    wait_ready(&client, &url).await;

    (client, url)
}

pub async fn register(client: &Client, url: &Url, email: &str, phone: Option<&str>) -> AuthResponse {
    let res = client
        .post(url.join("/api/Account/register").unwrap())
        .json(&RegisterDto {
            email,
            phone,
            password: "secure:12345678",
            confirm_password: "secure:12345678",
        })
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

/// Fresh `catalog` schema on the database named by the `DATABASE_*` variables.
///
/// Returns `None` when no database is configured for the test run.
pub async fn setup_database() -> Option<sqlx::PgPool> {
    dotenv::dotenv().ok();
    let host = match std::env::var("DATABASE_HOST") {
        Ok(host) => host,
        Err(_) => {
            eprintln!("DATABASE_HOST not set, skipping postgres test");
            return None;
        }
    };
    let name = std::env::var("DATABASE_NAME").unwrap();
    let user = std::env::var("DATABASE_USER").unwrap();
    let password = std::env::var("DATABASE_PASSWORD").unwrap();
    let port: u16 = std::env::var("DATABASE_PORT")
        .unwrap()
        .parse()
        .expect("Invalid DATABASE_PORT");

    let url = format!("postgres://{user}:{password}@{host}:{port}/{name}");
    let pool = connection::create_sqlx_pool(&DatabaseSettings {
        host,
        port,
        name,
        user,
        password,
        url,
    })
    .await;

    sqlx::query("DROP SCHEMA IF EXISTS catalog CASCADE")
        .execute(&pool)
        .await
        .unwrap();
    connection::apply_schema(&pool).await.unwrap();

    Some(pool)
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

async fn wait_ready(client: &Client, url: &Url) {
    for _ in 0..50 {
        if let Ok(res) = client.get(url.clone()).send().await {
            if res.status().is_success() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server at {url} did not start");
}

fn create_client() -> reqwest::Client {
    let mut headers = HeaderMap::new();
    headers.append("accept", HeaderValue::from_static("application/json"));

    let connect_timeout = 1000 * 5; // 5 sec
    let timeout = 1000 * 10; // 10 sec

    reqwest::Client::builder()
        .connect_timeout(Duration::from_millis(connect_timeout))
        .timeout(Duration::from_millis(timeout))
        .pool_max_idle_per_host(5)
        .default_headers(headers)
        .brotli(true)
        .gzip(true)
        .build()
        .expect("Expect to create a http client")
}
