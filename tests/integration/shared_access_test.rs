//! Integration tests for the public share-link endpoints.

mod helpers;

use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use helpers::{TestApp, TestUser};

async fn configure(app: &TestApp, owner: &TestUser, id: Uuid, permission: &str, audience: &str) {
    let response = app
        .request(
            "PUT",
            &format!("/api/portfolios/{id}/sharing"),
            Some(json!({
                "access_mode": "link",
                "link_permission": permission,
                "link_audience_type": audience
            })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
}

#[tokio::test]
async fn test_anyone_with_link_can_view() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");
    let id = app.create_portfolio(&owner, "Work").await;
    let token = app.share(&owner, id).await;

    let response = app
        .request("GET", &format!("/api/shared/{token}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["portfolio"]["title"], "Work");
    assert_eq!(data["permission"], "view");
    assert_eq!(data["can_edit"], false);
    assert_eq!(data["is_owner"], false);
    assert!(data["portfolio"].get("share_token").is_none());
}

#[tokio::test]
async fn test_disabled_link_is_denied() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");
    let visitor = app.user("visitor@example.com");
    let id = app.create_portfolio(&owner, "Work").await;
    let token = app.share(&owner, id).await;

    app.request(
        "DELETE",
        &format!("/api/portfolios/{id}/sharing/link"),
        None,
        Some(&owner.token),
    )
    .await;

    for auth in [None, Some(visitor.token.as_str())] {
        let response = app
            .request("GET", &format!("/api/shared/{token}"), None, auth)
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(
            response.body,
            json!({ "success": false, "data": { "allowed": false, "reason": "link_disabled" } })
        );
    }
}

#[tokio::test]
async fn test_emails_only_link() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");
    let id = app.create_portfolio(&owner, "Work").await;
    configure(&app, &owner, id, "view", "emails_only").await;
    let token = app.portfolio(id).await.share_token.unwrap();
    let path = format!("/api/shared/{token}");

    app.request(
        "POST",
        &format!("/api/portfolios/{id}/sharing/emails"),
        Some(json!({ "email": "A@X.com" })),
        Some(&owner.token),
    )
    .await;

    let anonymous = app.request("GET", &path, None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["data"]["reason"], "authentication_required");

    let outsider = app.user("b@x.com");
    let denied = app.request("GET", &path, None, Some(&outsider.token)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.body["data"]["reason"], "email_not_authorized");

    let invited = app.user("a@X.COM");
    let granted = app.request("GET", &path, None, Some(&invited.token)).await;
    assert_eq!(granted.status, StatusCode::OK);
    assert_eq!(granted.body["data"]["permission"], "view");

    let emails = app
        .request(
            "GET",
            &format!("/api/portfolios/{id}/sharing/emails"),
            None,
            Some(&owner.token),
        )
        .await;
    assert!(emails.body["data"][0]["accessed_at"].is_string());
}

#[tokio::test]
async fn test_view_only_link_rejects_edits() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");
    let id = app.create_portfolio(&owner, "Work").await;
    let token = app.share(&owner, id).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/shared/{token}"),
            Some(json!({ "title": "Defaced" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "PERMISSION_DENIED");
    assert_eq!(app.portfolio(id).await.title, "Work");
}

#[tokio::test]
async fn test_view_only_restricted_link_rejects_edits() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");
    let id = app.create_portfolio(&owner, "Work").await;
    configure(&app, &owner, id, "view", "emails_only").await;
    let token = app.portfolio(id).await.share_token.unwrap();
    let path = format!("/api/shared/{token}");
    let edit = json!({ "title": "Defaced" });

    app.request(
        "POST",
        &format!("/api/portfolios/{id}/sharing/emails"),
        Some(json!({ "email": "a@x.com" })),
        Some(&owner.token),
    )
    .await;

    let invited = app.user("a@x.com");
    let forbidden = app
        .request("PUT", &path, Some(edit.clone()), Some(&invited.token))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(forbidden.body["error"], "PERMISSION_DENIED");

    let outsider = app.user("b@x.com");
    let denied = app
        .request("PUT", &path, Some(edit.clone()), Some(&outsider.token))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(
        denied.body,
        json!({ "success": false, "data": { "allowed": false, "reason": "email_not_authorized" } })
    );

    let anonymous = app.request("PUT", &path, Some(edit), None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["data"]["reason"], "authentication_required");

    assert_eq!(app.portfolio(id).await.title, "Work");
}

#[tokio::test]
async fn test_editable_link_updates_content_only() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");
    let id = app.create_portfolio(&owner, "Work").await;
    configure(&app, &owner, id, "view_edit", "any_with_link").await;
    let token = app.portfolio(id).await.share_token.unwrap();
    let path = format!("/api/shared/{token}");

    let updated = app
        .request(
            "PUT",
            &path,
            Some(json!({ "title": "Work, revised", "content": { "sections": ["intro"] } })),
            None,
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["ok"], true);

    let stored = app.portfolio(id).await;
    assert_eq!(stored.title, "Work, revised");
    assert_eq!(stored.content, json!({ "sections": ["intro"] }));

    let sneaky = app
        .request(
            "PUT",
            &path,
            Some(json!({ "title": "x", "access_mode": "owner_only" })),
            None,
        )
        .await;
    assert_eq!(sneaky.status, StatusCode::UNPROCESSABLE_ENTITY);

    let empty = app.request("PUT", &path, Some(json!({})), None).await;
    assert_eq!(empty.status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(app.portfolio(id).await.access_mode.as_str(), "link");
}

#[tokio::test]
async fn test_owner_always_has_full_access() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");
    let id = app.create_portfolio(&owner, "Work").await;
    configure(&app, &owner, id, "view", "emails_only").await;
    let token = app.portfolio(id).await.share_token.unwrap();

    app.request(
        "DELETE",
        &format!("/api/portfolios/{id}/sharing/link"),
        None,
        Some(&owner.token),
    )
    .await;

    let response = app
        .request(
            "GET",
            &format!("/api/shared/{token}"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["is_owner"], true);
    assert_eq!(response.body["data"]["can_edit"], true);
    assert_eq!(response.body["data"]["permission"], "view_edit");
}

#[tokio::test]
async fn test_bad_bearer_on_public_route_is_rejected() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com");
    let id = app.create_portfolio(&owner, "Work").await;
    let token = app.share(&owner, id).await;

    let response = app
        .request(
            "GET",
            &format!("/api/shared/{token}"),
            None,
            Some("garbage"),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_token_is_not_found() {
    let app = TestApp::new();
    let response = app
        .request("GET", "/api/shared/does-not-exist", None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}
