//! Conversation loading and optimistic sends against a mock API.
//!
//! Run with: cargo test -p kasuwa-integration-tests

use kasuwa_client::thread::{Applied, ChatError, ChatThread};
use kasuwa_core::ConversationId;
use kasuwa_integration_tests::{MockApi, message_json};
use mockito::Matcher;
use pretty_assertions::assert_eq;
use serde_json::json;

fn texts(thread: &ChatThread) -> Vec<String> {
    thread
        .entries()
        .iter()
        .map(|entry| entry.text().to_owned())
        .collect()
}

// ============================================================================
// Loading
// ============================================================================

#[tokio::test]
async fn test_load_shows_history() {
    let mut api = MockApi::signed_in("tok-1").await;
    api.server
        .mock("GET", "/chats/c-1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                message_json("m-1", "c-1", "Is this still available?"),
                message_json("m-2", "c-1", "Yes, 12 bags left"),
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let mut thread = ChatThread::new();
    let applied = thread
        .load(&api.chat(), ConversationId::new("c-1"))
        .await
        .expect("history loads");

    assert_eq!(applied, Applied::Updated);
    assert_eq!(
        texts(&thread),
        vec!["Is this still available?", "Yes, 12 bags left"]
    );
    assert!(!thread.is_loading());
}

#[tokio::test]
async fn test_load_failure_is_reported() {
    let mut api = MockApi::signed_in("tok-1").await;
    api.server
        .mock("GET", "/chats/c-1/messages")
        .with_status(500)
        .create_async()
        .await;

    let mut thread = ChatThread::new();
    let result = thread.load(&api.chat(), ConversationId::new("c-1")).await;

    assert!(matches!(result, Err(ChatError::Load(_))));
    assert!(thread.entries().is_empty());
}

// ============================================================================
// Sending
// ============================================================================

#[tokio::test]
async fn test_send_replaces_pending_with_confirmed() {
    let mut api = MockApi::signed_in("tok-1").await;
    api.server
        .mock("GET", "/chats/c-1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
    let send = api
        .server
        .mock("POST", "/chats/c-1/messages")
        .match_body(Matcher::Json(json!({ "text": "I'll take 5 bags" })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(message_json("m-3", "c-1", "I'll take 5 bags").to_string())
        .expect(1)
        .create_async()
        .await;

    let chat = api.chat();
    let mut thread = ChatThread::new();
    thread
        .load(&chat, ConversationId::new("c-1"))
        .await
        .expect("history loads");
    thread
        .send(&chat, "  I'll take 5 bags  ")
        .await
        .expect("message sent");

    assert_eq!(texts(&thread), vec!["I'll take 5 bags"]);
    assert!(thread.entries().iter().all(|entry| !entry.is_pending()));
    send.assert_async().await;
}

#[tokio::test]
async fn test_failed_send_returns_text_and_drops_pending() {
    let mut api = MockApi::signed_in("tok-1").await;
    api.server
        .mock("GET", "/chats/c-1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([message_json("m-1", "c-1", "Hello")]).to_string())
        .create_async()
        .await;
    api.server
        .mock("POST", "/chats/c-1/messages")
        .with_status(502)
        .create_async()
        .await;

    let chat = api.chat();
    let mut thread = ChatThread::new();
    thread
        .load(&chat, ConversationId::new("c-1"))
        .await
        .expect("history loads");
    let err = thread
        .send(&chat, "Can you deliver to Ikeja?")
        .await
        .expect_err("send fails");

    let ChatError::SendFailed { text, .. } = err else {
        panic!("expected SendFailed");
    };
    assert_eq!(text, "Can you deliver to Ikeja?");
    assert_eq!(texts(&thread), vec!["Hello"]);
}

#[tokio::test]
async fn test_blank_message_is_not_sent() {
    let mut api = MockApi::signed_in("tok-1").await;
    api.server
        .mock("GET", "/chats/c-1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
    let send = api
        .server
        .mock("POST", "/chats/c-1/messages")
        .expect(0)
        .create_async()
        .await;

    let chat = api.chat();
    let mut thread = ChatThread::new();
    thread
        .load(&chat, ConversationId::new("c-1"))
        .await
        .expect("history loads");
    let result = thread.send(&chat, "   ").await;

    assert!(matches!(result, Err(ChatError::EmptyMessage)));
    send.assert_async().await;
}
