//! End-to-end streaming through the scripted transport
//!
//! This tests:
//! - chunks are delivered in order and recorded in the conversation
//! - patches are only surfaced for cleanly terminated streams
//! - abandoning or failing a stream never yields a patch

use std::ops::ControlFlow;
use std::sync::Arc;

use navboard_assistant::{
    AssistantClient, AssistantError, MessageKind, MessageStatus, ScriptedTransport,
};
use serde_json::json;

#[tokio::test]
async fn test_streamed_answer_with_fenced_patch() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_answer([
        "已为你生成配置：\n```json\n",
        "{\"filterArea\":{\"columns\":4,",
        "\"filters\":[]}}\n```",
    ]);

    let mut client = AssistantClient::new(transport);
    let mut seen = Vec::new();
    let reply = client
        .send_message("把筛选区改成四列", |chunk| {
            seen.push(chunk.to_string());
            ControlFlow::Continue(())
        })
        .await
        .unwrap();

    assert_eq!(seen.len(), 3);
    assert_eq!(reply.text, seen.concat());
    assert_eq!(
        reply.patch,
        Some(json!({ "filterArea": { "columns": 4, "filters": [] } }))
    );

    let message = client.conversation().get(&reply.message_id).unwrap();
    assert_eq!(message.status, MessageStatus::Complete);
    assert_eq!(message.kind, MessageKind::ConfigPreview);
    assert_eq!(message.content, reply.text);
}

#[tokio::test]
async fn test_plain_answer_has_no_patch() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_answer(["当前配置没有问题。"]);

    let mut client = AssistantClient::new(transport);
    let reply = client.send("检查一下").await.unwrap();

    assert_eq!(reply.patch, None);
    let message = client.conversation().get(&reply.message_id).unwrap();
    assert_eq!(message.kind, MessageKind::Text);
}

#[tokio::test]
async fn test_abandoned_stream_yields_nothing() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_answer([
        "```json\n{\"navGroups\":",
        "[]}\n```",
    ]);

    let mut client = AssistantClient::new(transport);
    let result = client
        .send_message("生成导航", |_| ControlFlow::Break(()))
        .await;

    assert_eq!(result, Err(AssistantError::Cancelled));
    let last = client.conversation().messages().last().unwrap();
    assert_eq!(last.status, MessageStatus::Cancelled);
    assert!(last.config_data.is_none());
}

#[tokio::test]
async fn test_transport_error_mid_stream() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_response(vec![
        Ok(format!(
            "data: {}\n",
            json!({ "type": "answer", "content": "```json\n{\"navGroups\":[]}\n```" })
        )),
        Err(AssistantError::Transport("connection reset".to_string())),
    ]);

    let mut client = AssistantClient::new(transport);
    let result = client.send("生成导航").await;

    assert_eq!(
        result,
        Err(AssistantError::Transport("connection reset".to_string()))
    );
    let last = client.conversation().messages().last().unwrap();
    assert_eq!(last.status, MessageStatus::Error);
}

#[tokio::test]
async fn test_history_carries_previous_turns() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_answer(["第一轮"]);
    transport.push_answer(["第二轮"]);

    let mut client = AssistantClient::new(transport.clone());
    client.send("一").await.unwrap();
    client.send("二").await.unwrap();

    assert_eq!(transport.remaining(), 0);
    let history = client.conversation().history();
    let contents: Vec<&str> = history.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(contents, vec!["一", "第一轮", "二", "第二轮"]);
}

#[test]
fn test_abandon_marks_streaming_messages() {
    let mut client = AssistantClient::new(Arc::new(ScriptedTransport::new()));
    let id = client.conversation_mut().begin_assistant();

    assert_eq!(client.abandon(), 1);
    assert_eq!(
        client.conversation().get(&id).unwrap().status,
        MessageStatus::Cancelled
    );
}
