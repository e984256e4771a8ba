//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use folio_api::{AppState, build_app};
use folio_auth::JwtEncoder;
use folio_core::config::AppConfig;
use folio_database::{PortfolioRepository, Repositories};
use folio_entity::portfolio::{CreatePortfolio, Portfolio};

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// In-memory storage, for seeding and direct assertions
    pub repositories: Repositories,
    /// Application config
    pub config: AppConfig,
    /// Mints bearer tokens the app accepts
    pub encoder: JwtEncoder,
}

/// A signed-in principal
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.sharing.public_base_url = "https://folio.test".to_string();

        let repositories = Repositories::in_memory();
        let encoder = JwtEncoder::new(&config.auth);
        let router = build_app(AppState::new(config.clone(), repositories.clone()));

        Self {
            router,
            repositories,
            config,
            encoder,
        }
    }

    /// Mint a token for a fresh user
    pub fn user(&self, email: &str) -> TestUser {
        let id = Uuid::new_v4();
        let (token, _) = self
            .encoder
            .issue(id, email, Some("Test User"))
            .expect("Failed to issue token");
        TestUser {
            id,
            email: email.to_string(),
            token,
        }
    }

    /// Insert a portfolio owned by `owner` and return its ID
    pub async fn create_portfolio(&self, owner: &TestUser, title: &str) -> Uuid {
        let portfolio = Portfolio::new(CreatePortfolio {
            owner_id: owner.id,
            title: title.to_string(),
            content: serde_json::json!({ "sections": [] }),
        });
        self.repositories
            .portfolios
            .create(&portfolio)
            .await
            .expect("Failed to create portfolio")
            .id
    }

    /// Load a portfolio straight from storage
    pub async fn portfolio(&self, id: Uuid) -> Portfolio {
        self.repositories
            .portfolios
            .find_by_id(id)
            .await
            .expect("Failed to load portfolio")
            .expect("Portfolio missing")
    }

    /// Generate a link as `owner` and return its token
    pub async fn share(&self, owner: &TestUser, portfolio_id: Uuid) -> String {
        let response = self
            .request(
                "POST",
                &format!("/api/portfolios/{portfolio_id}/sharing/link"),
                None,
                Some(&owner.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["data"]["token"]
            .as_str()
            .expect("No token in response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
