//! Integration tests for the owner-side sharing endpoints.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_generate_link_twice_returns_same_url() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");
    let id = app.create_portfolio(&owner, "Work").await;
    let path = format!("/api/portfolios/{id}/sharing/link");

    let first = app.request("POST", &path, None, Some(&owner.token)).await;
    assert_eq!(first.status, StatusCode::OK);
    let token = first.body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 43);
    assert_eq!(
        first.body["data"]["share_url"],
        json!(format!("https://folio.test/shared/{token}"))
    );

    let second = app.request("POST", &path, None, Some(&owner.token)).await;
    assert_eq!(second.body["data"]["token"], json!(token));
}

#[tokio::test]
async fn test_owner_routes_require_owner() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");
    let stranger = app.user("stranger@example.com");
    let id = app.create_portfolio(&owner, "Work").await;
    let path = format!("/api/portfolios/{id}/sharing");

    let anonymous = app.request("GET", &path, None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["error"], "UNAUTHORIZED");

    let forged = app.request("GET", &path, None, Some("not-a-jwt")).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);

    let other = app.request("GET", &path, None, Some(&stranger.token)).await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);
    assert_eq!(other.body["error"], "FORBIDDEN");

    let link = app
        .request(
            "POST",
            &format!("{path}/link"),
            None,
            Some(&stranger.token),
        )
        .await;
    assert_eq!(link.status, StatusCode::FORBIDDEN);
    assert!(app.portfolio(id).await.share_token.is_none());
}

#[tokio::test]
async fn test_unknown_and_malformed_portfolio_ids() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");

    let missing = app
        .request(
            "GET",
            &format!("/api/portfolios/{}/sharing", uuid::Uuid::new_v4()),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let malformed = app
        .request(
            "GET",
            "/api/portfolios/not-a-uuid/sharing",
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(malformed.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_status_reflects_configuration() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");
    let id = app.create_portfolio(&owner, "Work").await;
    let path = format!("/api/portfolios/{id}/sharing");

    let initial = app.request("GET", &path, None, Some(&owner.token)).await;
    assert_eq!(initial.status, StatusCode::OK);
    let data = &initial.body["data"];
    assert_eq!(data["access_mode"], "owner_only");
    assert_eq!(data["link_permission"], "view");
    assert_eq!(data["link_audience_type"], "any_with_link");
    assert_eq!(data["has_active_link"], false);
    assert!(data["share_token"].is_null());
    assert!(data["share_url"].is_null());
    assert_eq!(data["authorized_emails"], json!([]));

    let token = app.share(&owner, id).await;
    let shared = app.request("GET", &path, None, Some(&owner.token)).await;
    let data = &shared.body["data"];
    assert_eq!(data["access_mode"], "link");
    assert_eq!(data["has_active_link"], true);
    assert_eq!(data["share_token"], json!(token));
    assert!(data["link_created_at"].is_string());

    let disabled = app
        .request("DELETE", &format!("{path}/link"), None, Some(&owner.token))
        .await;
    assert_eq!(disabled.status, StatusCode::OK);
    assert_eq!(disabled.body["data"]["ok"], true);

    let after = app.request("GET", &path, None, Some(&owner.token)).await;
    assert_eq!(after.body["data"]["has_active_link"], false);
    assert_eq!(after.body["data"]["share_token"], json!(token));
}

#[tokio::test]
async fn test_rotate_link_issues_new_token() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");
    let id = app.create_portfolio(&owner, "Work").await;
    let old = app.share(&owner, id).await;

    let rotated = app
        .request(
            "POST",
            &format!("/api/portfolios/{id}/sharing/link/rotate"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(rotated.status, StatusCode::OK);
    let new = rotated.body["data"]["token"].as_str().unwrap();
    assert_ne!(new, old);

    let stale = app
        .request("GET", &format!("/api/shared/{old}"), None, None)
        .await;
    assert_eq!(stale.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_permission_and_audience_updates() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");
    let id = app.create_portfolio(&owner, "Work").await;

    let permission = app
        .request(
            "PATCH",
            &format!("/api/portfolios/{id}/sharing/permission"),
            Some(json!({ "link_permission": "view_edit" })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(permission.status, StatusCode::OK);
    assert_eq!(permission.body["data"]["link_permission"], "view_edit");

    let audience = app
        .request(
            "PATCH",
            &format!("/api/portfolios/{id}/sharing/audience"),
            Some(json!({ "link_audience_type": "emails_only" })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(audience.status, StatusCode::OK);
    assert_eq!(audience.body["data"]["link_audience_type"], "emails_only");

    let invalid = app
        .request(
            "PATCH",
            &format!("/api/portfolios/{id}/sharing/permission"),
            Some(json!({ "link_permission": "admin" })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(invalid.body["error"], "VALIDATION_ERROR");

    let stored = app.portfolio(id).await;
    assert_eq!(stored.link_permission.as_str(), "view_edit");
    assert_eq!(stored.link_audience_type.as_str(), "emails_only");
}

#[tokio::test]
async fn test_full_config_update() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");
    let id = app.create_portfolio(&owner, "Work").await;
    let path = format!("/api/portfolios/{id}/sharing");

    let incomplete = app
        .request(
            "PUT",
            &path,
            Some(json!({ "access_mode": "link", "link_permission": "view" })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(incomplete.status, StatusCode::UNPROCESSABLE_ENTITY);

    let enabled = app
        .request(
            "PUT",
            &path,
            Some(json!({
                "access_mode": "link",
                "link_permission": "view_edit",
                "link_audience_type": "emails_only"
            })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(enabled.status, StatusCode::OK);
    let data = &enabled.body["data"];
    assert_eq!(data["access_mode"], "link");
    assert_eq!(data["link_permission"], "view_edit");
    assert_eq!(data["link_audience_type"], "emails_only");
    assert_eq!(data["has_active_link"], true);
    let token = data["share_token"].clone();

    let disabled = app
        .request(
            "PUT",
            &path,
            Some(json!({ "access_mode": "owner_only" })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(disabled.status, StatusCode::OK);
    assert_eq!(disabled.body["data"]["access_mode"], "owner_only");
    assert_eq!(disabled.body["data"]["share_token"], token);
}

#[tokio::test]
async fn test_authorized_email_lifecycle() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");
    let id = app.create_portfolio(&owner, "Work").await;
    let path = format!("/api/portfolios/{id}/sharing/emails");

    let created = app
        .request(
            "POST",
            &path,
            Some(json!({ "email": "  Reviewer@Example.COM " })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["email"], "reviewer@example.com");
    assert_eq!(created.body["data"]["invited_by_name"], "Test User");
    assert!(created.body["data"]["accessed_at"].is_null());

    let duplicate = app
        .request(
            "POST",
            &path,
            Some(json!({ "email": "reviewer@example.com" })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::OK);
    assert_eq!(duplicate.body["data"]["id"], created.body["data"]["id"]);

    let malformed = app
        .request(
            "POST",
            &path,
            Some(json!({ "email": "reviewer-at-example" })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(malformed.status, StatusCode::UNPROCESSABLE_ENTITY);

    let listed = app.request("GET", &path, None, Some(&owner.token)).await;
    assert_eq!(listed.body["data"].as_array().unwrap().len(), 1);

    let removed = app
        .request(
            "DELETE",
            &format!("{path}/REVIEWER@example.com"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(removed.body["data"]["removed"], true);

    let again = app
        .request(
            "DELETE",
            &format!("{path}/reviewer@example.com"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["data"]["removed"], false);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");

    let detailed = app.request("GET", "/api/health/detailed", None, None).await;
    assert_eq!(detailed.body["data"]["database"], "connected");
    assert_eq!(detailed.body["data"]["provider"], "memory");
}
