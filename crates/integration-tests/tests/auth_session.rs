//! Session lifecycle: login, logout and account deletion.
//!
//! Run with: cargo test -p kasuwa-integration-tests

use std::sync::Arc;

use kasuwa_client::api::AuthApi;
use kasuwa_client::models::Credentials;
use kasuwa_client::{ApiClient, ApiError, SessionError, SessionProvider, SessionStore};
use kasuwa_core::{Email, ProductId};
use kasuwa_integration_tests::{MockApi, config_for};
use mockito::Matcher;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;

/// A store whose backing location refuses writes.
struct ReadOnlySession;

impl SessionProvider for ReadOnlySession {
    fn token(&self) -> Option<SecretString> {
        None
    }
}

impl SessionStore for ReadOnlySession {
    fn store(&self, _token: SecretString) -> Result<(), SessionError> {
        Err(SessionError::save(
            "/read-only/session",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        ))
    }

    fn clear(&self) -> Result<(), SessionError> {
        Ok(())
    }
}

fn credentials() -> Credentials {
    Credentials {
        email: Email::parse("ada@example.com").expect("valid email"),
        password: SecretString::from("correct horse".to_string()),
    }
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_stores_token_for_later_requests() {
    let mut api = MockApi::signed_out().await;
    let login = api
        .server
        .mock("POST", "/auth/login")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::Json(
            json!({ "email": "ada@example.com", "password": "correct horse" }),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token":"tok-new"}"#)
        .create_async()
        .await;
    let wishlist = api
        .server
        .mock("POST", "/wishlist")
        .match_header("authorization", "Bearer tok-new")
        .with_status(201)
        .create_async()
        .await;

    let profile = api.auth().login(&credentials()).await.expect("login succeeds");
    assert!(profile.is_none());
    assert_eq!(api.token().as_deref(), Some("tok-new"));

    api.wishlist()
        .add(&ProductId::new("p-1"))
        .await
        .expect("authenticated call succeeds");

    login.assert_async().await;
    wishlist.assert_async().await;
}

#[tokio::test]
async fn test_rejected_login_leaves_session_untouched() {
    let mut api = MockApi::signed_out().await;
    api.server
        .mock("POST", "/auth/login")
        .with_status(401)
        .with_body(r#"{"message":"Invalid email or password"}"#)
        .create_async()
        .await;

    let err = api
        .auth()
        .login(&credentials())
        .await
        .expect_err("credentials rejected");

    assert_eq!(err.status(), Some(401));
    assert_eq!(api.token(), None);
}

#[tokio::test]
async fn test_login_reports_unsaved_session() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token":"tok-new"}"#)
        .create_async()
        .await;
    let session = Arc::new(ReadOnlySession);
    let client = ApiClient::new(&config_for(&server.url()), session.clone()).expect("client builds");

    let err = AuthApi::new(client, session)
        .login(&credentials())
        .await
        .expect_err("token could not be saved");

    assert!(matches!(err, ApiError::Session(_)));
    assert!(err.user_message().contains("/read-only/session"));
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_clears_session_even_when_server_fails() {
    let mut api = MockApi::signed_in("tok-1").await;
    let mock = api
        .server
        .mock("POST", "/auth/logout")
        .match_header("authorization", "Bearer tok-1")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let result = api.auth().logout().await;

    assert!(matches!(result, Err(ApiError::Http { status: 503, .. })));
    assert_eq!(api.token(), None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_logout_when_signed_out_makes_no_request() {
    let mut api = MockApi::signed_out().await;
    let mock = api
        .server
        .mock("POST", "/auth/logout")
        .expect(0)
        .create_async()
        .await;

    api.auth().logout().await.expect("nothing to do");

    mock.assert_async().await;
}

// ============================================================================
// Account deletion
// ============================================================================

#[tokio::test]
async fn test_delete_account_clears_session_on_success() {
    let mut api = MockApi::signed_in("tok-1").await;
    let mock = api
        .server
        .mock("DELETE", "/account")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    api.auth().delete_account().await.expect("account deleted");

    assert_eq!(api.token(), None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_delete_account_failure_keeps_session() {
    let mut api = MockApi::signed_in("tok-1").await;
    api.server
        .mock("DELETE", "/account")
        .with_status(500)
        .create_async()
        .await;

    let result = api.auth().delete_account().await;

    assert!(result.is_err());
    assert_eq!(api.token().as_deref(), Some("tok-1"));
}
