//! HTTP tests for the claims API
//!
//! The router is driven in-process with `oneshot` over in-memory stores.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use core_kernel::Role;
use domain_claims::{ClaimWorkflowService, InMemoryClaimStore};
use domain_identity::{InMemoryUserStore, LoginService, PasswordHasher};
use interface_api::{config::ApiConfig, create_router, AppState};
use test_utils::{UserFixtures, TEST_BCRYPT_COST, TEST_PASSWORD};

const SECRET: &str = "api-test-secret";

async fn app() -> Router {
    let mut accounts = UserFixtures::standard_accounts();
    accounts.push(UserFixtures::account("bob", Role::User));

    let claims = ClaimWorkflowService::new(Arc::new(InMemoryClaimStore::new()));
    let login = LoginService::new(
        Arc::new(InMemoryUserStore::with_users(accounts).await),
        PasswordHasher::with_cost(TEST_BCRYPT_COST),
    );
    let config = ApiConfig::new(SECRET, "postgres://unused");

    create_router(AppState::new(claims, login, config))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn login(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/login",
        None,
        Some(json!({"username": username, "password": TEST_PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn create_claim(app: &Router, token: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/claims",
        Some(token),
        Some(json!({"policy_number": "P-1", "claim_amount": 500.0, "description": "flood"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

fn history_statuses(claim: &Value) -> Vec<String> {
    claim["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["status"].as_str().unwrap().to_string())
        .collect()
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_is_public() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_both_stores() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/health/ready", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["checks"].as_array().unwrap().len(), 2);
    }
}

mod login_tests {
    use super::*;

    #[tokio::test]
    async fn test_login_returns_token_and_user() {
        let app = app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/login",
            None,
            Some(json!({"username": "vera", "password": TEST_PASSWORD})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["user"]["username"], "vera");
        assert_eq!(body["data"]["user"]["role"], "verifier");
        assert!(body["data"]["user"].get("password_hash").is_none());
        assert!(!body["data"]["token"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_credentials_are_indistinguishable() {
        let app = app().await;
        let (wrong_status, wrong) = send(
            &app,
            Method::POST,
            "/api/v1/login",
            None,
            Some(json!({"username": "alice", "password": "nope"})),
        )
        .await;
        let (unknown_status, unknown) = send(
            &app,
            Method::POST,
            "/api/v1/login",
            None,
            Some(json!({"username": "mallory", "password": "nope"})),
        )
        .await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong, unknown);
        assert_eq!(wrong, json!({"success": false, "error": "invalid credentials"}));
    }

    #[tokio::test]
    async fn test_malformed_login_body_is_bad_request() {
        let app = app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/login",
            None,
            Some(json!({"username": "alice"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/api/v1/claims", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_forged_token_is_unauthorized() {
        let app = app().await;
        let actor = core_kernel::Actor::approver(core_kernel::UserId::new());
        let forged = interface_api::auth::create_token(&actor, "another-secret", 60).unwrap();

        let (status, _) = send(&app, Method::GET, "/api/v1/claims/all", Some(&forged), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

mod workflow_tests {
    use super::*;

    #[tokio::test]
    async fn test_full_approval_flow() {
        let app = app().await;
        let alice = login(&app, "alice").await;
        let vera = login(&app, "vera").await;
        let adam = login(&app, "adam").await;

        let id = create_claim(&app, &alice).await;

        let (status, _) = send(&app, Method::PATCH, &format!("/api/v1/claims/{}/submit", id), Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/claims/{}/review", id),
            Some(&vera),
            Some(json!({"note": "ok"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::PATCH, &format!("/api/v1/claims/{}/approve", id), Some(&adam), None).await;
        assert_eq!(status, StatusCode::OK);

        let claim = &body["data"];
        assert_eq!(claim["status"], "approved");
        assert_eq!(claim["claim_amount"], json!(500.0));
        assert_eq!(history_statuses(claim), vec!["draft", "submitted", "reviewed", "approved"]);
        assert_eq!(claim["history"][2]["note"], "ok");
        assert_eq!(claim["history"][0]["changed_by"], claim["user_id"]);
    }

    #[tokio::test]
    async fn test_reject_with_and_without_reason() {
        let app = app().await;
        let alice = login(&app, "alice").await;
        let vera = login(&app, "vera").await;
        let adam = login(&app, "adam").await;

        for reason in [Some(json!({"reason": "not covered"})), None] {
            let id = create_claim(&app, &alice).await;
            send(&app, Method::PATCH, &format!("/api/v1/claims/{}/submit", id), Some(&alice), None).await;
            send(&app, Method::PATCH, &format!("/api/v1/claims/{}/review", id), Some(&vera), None).await;

            let expected_note = reason.as_ref().map(|r| r["reason"].clone());
            let (status, body) = send(
                &app,
                Method::PATCH,
                &format!("/api/v1/claims/{}/reject", id),
                Some(&adam),
                reason,
            )
            .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["data"]["status"], "rejected");
            assert_eq!(body["data"]["history"][3].get("note").cloned(), expected_note);
        }
    }

    #[tokio::test]
    async fn test_wrong_role_or_status_is_conflict() {
        let app = app().await;
        let alice = login(&app, "alice").await;
        let adam = login(&app, "adam").await;
        let id = create_claim(&app, &alice).await;

        // owner cannot review, approver cannot approve a draft
        let (status, body) = send(&app, Method::PATCH, &format!("/api/v1/claims/{}/review", id), Some(&alice), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Cannot review this claim");

        let (status, _) = send(&app, Method::PATCH, &format!("/api/v1/claims/{}/approve", id), Some(&adam), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        send(&app, Method::PATCH, &format!("/api/v1/claims/{}/submit", id), Some(&alice), None).await;
        let (status, body) = send(&app, Method::PATCH, &format!("/api/v1/claims/{}/submit", id), Some(&alice), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Cannot submit this claim");
    }

    #[tokio::test]
    async fn test_edit_and_delete_drafts_only() {
        let app = app().await;
        let alice = login(&app, "alice").await;
        let id = create_claim(&app, &alice).await;

        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/claims/{}", id),
            Some(&alice),
            Some(json!({"description": "storm"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["description"], "storm");
        assert_eq!(body["data"]["policy_number"], "P-1");

        let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/claims/{}", id), Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "message": "claim deleted"}));

        let (status, _) = send(&app, Method::GET, &format!("/api/v1/claims/{}", id), Some(&alice), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let submitted = create_claim(&app, &alice).await;
        send(&app, Method::PATCH, &format!("/api/v1/claims/{}/submit", submitted), Some(&alice), None).await;
        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/claims/{}", submitted), Some(&alice), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_stranger_cannot_read_or_delete() {
        let app = app().await;
        let alice = login(&app, "alice").await;
        let bob = login(&app, "bob").await;
        let vera = login(&app, "vera").await;
        let id = create_claim(&app, &alice).await;

        let (status, _) = send(&app, Method::GET, &format!("/api/v1/claims/{}", id), Some(&bob), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/claims/{}", id), Some(&bob), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Cannot delete this claim");

        let (status, _) = send(&app, Method::GET, &format!("/api/v1/claims/{}", id), Some(&vera), None).await;
        assert_eq!(status, StatusCode::OK);
    }
}

mod request_tests {
    use super::*;

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let app = app().await;
        let alice = login(&app, "alice").await;

        let (status, body) = send(&app, Method::GET, "/api/v1/claims/not-a-uuid", Some(&alice), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let app = app().await;
        let alice = login(&app, "alice").await;
        let uri = format!("/api/v1/claims/{}", uuid::Uuid::new_v4());

        let (status, _) = send(&app, Method::GET, &uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_bodies_are_bad_request() {
        let app = app().await;
        let alice = login(&app, "alice").await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/claims",
            Some(&alice),
            Some(json!({"policy_number": "P-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/claims",
            Some(&alice),
            Some(json!({"policy_number": "P-1", "claim_amount": -5, "description": "flood"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}

mod listing_tests {
    use super::*;

    #[tokio::test]
    async fn test_own_listing_is_paginated() {
        let app = app().await;
        let alice = login(&app, "alice").await;
        let bob = login(&app, "bob").await;
        for _ in 0..3 {
            create_claim(&app, &alice).await;
        }
        create_claim(&app, &bob).await;

        let (status, body) = send(&app, Method::GET, "/api/v1/claims", Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 3);
        assert_eq!(body["data"]["pagination"], json!({"page": 1, "limit": 10, "total": 3}));

        let (_, body) = send(&app, Method::GET, "/api/v1/claims?page=2&limit=2", Some(&alice), None).await;
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["pagination"]["total"], 3);
    }

    #[tokio::test]
    async fn test_invalid_pagination_is_bad_request() {
        let app = app().await;
        let alice = login(&app, "alice").await;

        for query in ["limit=0", "page=0", "limit=101", "page=abc"] {
            let (status, _) = send(&app, Method::GET, &format!("/api/v1/claims?{}", query), Some(&alice), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "query {}", query);
        }
    }

    #[tokio::test]
    async fn test_all_claims_filtered_by_role() {
        let app = app().await;
        let alice = login(&app, "alice").await;
        let vera = login(&app, "vera").await;
        let adam = login(&app, "adam").await;

        create_claim(&app, &alice).await;
        let submitted = create_claim(&app, &alice).await;
        send(&app, Method::PATCH, &format!("/api/v1/claims/{}/submit", submitted), Some(&alice), None).await;

        let (status, _) = send(&app, Method::GET, "/api/v1/claims/all", Some(&alice), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app, Method::GET, "/api/v1/claims/all", Some(&vera), None).await;
        assert_eq!(status, StatusCode::OK);
        let items = body["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["status"], "submitted");

        let (_, body) = send(&app, Method::GET, "/api/v1/claims/all", Some(&adam), None).await;
        assert_eq!(body["data"]["pagination"]["total"], 0);
    }
}
