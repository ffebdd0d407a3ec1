//! # Assistant Client
//!
//! Sends a user message, streams the reply into the conversation and, once
//! the stream has terminated cleanly, surfaces any configuration patch it
//! carried.
//!
//! A `config_json` delivered through a tool response takes precedence over
//! text extraction. A stream that errors or is abandoned never yields a
//! patch.

use std::ops::ControlFlow;
use std::sync::Arc;

use futures::StreamExt;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::conversation::{Conversation, MessageStatus};
use crate::errors::AssistantError;
use crate::extract::extract_patch;
use crate::sse::{SseDecoder, StreamEvent};
use crate::transport::ChatTransport;

/// Outcome of a completed exchange
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub message_id: String,
    pub text: String,
    pub patch: Option<Value>,
    pub follow_ups: Vec<String>,
}

pub struct AssistantClient {
    transport: Arc<dyn ChatTransport>,
    conversation: Conversation,
}

impl AssistantClient {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            conversation: Conversation::new(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    /// Send without observing chunks
    pub async fn send(&mut self, content: &str) -> Result<AssistantReply, AssistantError> {
        self.send_message(content, |_| ControlFlow::Continue(())).await
    }

    /// Send a message and stream the reply. `on_chunk` sees every piece of
    /// answer text; returning `Break` abandons the stream.
    pub async fn send_message<F>(
        &mut self,
        content: &str,
        mut on_chunk: F,
    ) -> Result<AssistantReply, AssistantError>
    where
        F: FnMut(&str) -> ControlFlow<()>,
    {
        let content = content.trim();
        if content.is_empty() {
            return Err(AssistantError::EmptyMessage);
        }

        self.conversation.push_user(content);
        let history = self.conversation.history();
        let reply_id = self.conversation.begin_assistant();

        info!("[Assistant] Sending message ({} turn(s))", history.len());

        let mut stream = match self.transport.open(&history).await {
            Ok(stream) => stream,
            Err(err) => {
                warn!("[Assistant] Failed to open stream: {}", err);
                self.conversation.set_status(&reply_id, MessageStatus::Error);
                return Err(err);
            }
        };

        let mut decoder = SseDecoder::new();
        let mut text = String::new();
        let mut tool_config: Option<Value> = None;
        let mut follow_ups = Vec::new();

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    warn!("[Assistant] Stream failed: {}", err);
                    self.conversation.set_status(&reply_id, MessageStatus::Error);
                    return Err(err);
                }
            };

            for event in decoder.push(&chunk) {
                let flow = self.handle_event(
                    &reply_id,
                    event,
                    &mut text,
                    &mut tool_config,
                    &mut follow_ups,
                    &mut on_chunk,
                );
                if flow.is_break() {
                    debug!("[Assistant] Stream abandoned by caller");
                    self.conversation
                        .set_status(&reply_id, MessageStatus::Cancelled);
                    return Err(AssistantError::Cancelled);
                }
            }
        }

        for event in decoder.finish() {
            // The stream is over, a late break changes nothing
            let _ = self.handle_event(
                &reply_id,
                event,
                &mut text,
                &mut tool_config,
                &mut follow_ups,
                &mut on_chunk,
            );
        }

        let patch = tool_config.or_else(|| extract_patch(&text));
        if patch.is_some() {
            info!("[Assistant] Reply carries a configuration patch");
        }
        self.conversation.complete(&reply_id, patch.clone());

        Ok(AssistantReply {
            message_id: reply_id,
            text,
            patch,
            follow_ups,
        })
    }

    /// Mark any reply still streaming as cancelled, e.g. after the sending
    /// future was dropped
    pub fn abandon(&mut self) -> usize {
        self.conversation.cancel_streaming()
    }

    pub fn clear(&mut self) {
        self.conversation.clear();
    }

    fn handle_event<F>(
        &mut self,
        reply_id: &str,
        event: StreamEvent,
        text: &mut String,
        tool_config: &mut Option<Value>,
        follow_ups: &mut Vec<String>,
        on_chunk: &mut F,
    ) -> ControlFlow<()>
    where
        F: FnMut(&str) -> ControlFlow<()>,
    {
        match event {
            StreamEvent::Answer(piece) => {
                text.push_str(&piece);
                self.conversation.append(reply_id, &piece);
                on_chunk(&piece)
            }
            StreamEvent::ToolResponse { config: Some(config) } => {
                *tool_config = Some(config);
                ControlFlow::Continue(())
            }
            StreamEvent::ToolResponse { config: None } => ControlFlow::Continue(()),
            StreamEvent::FollowUp(suggestion) => {
                follow_ups.push(suggestion);
                ControlFlow::Continue(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let mut client = AssistantClient::new(Arc::new(ScriptedTransport::new()));
        assert_eq!(client.send("   ").await, Err(AssistantError::EmptyMessage));
        assert!(client.conversation().messages().is_empty());
    }

    #[tokio::test]
    async fn test_open_failure_marks_error() {
        let mut client = AssistantClient::new(Arc::new(ScriptedTransport::new()));
        let result = client.send("你好").await;

        assert!(matches!(result, Err(AssistantError::Transport(_))));
        let last = client.conversation().messages().last().unwrap();
        assert_eq!(last.status, MessageStatus::Error);
    }

    #[tokio::test]
    async fn test_tool_config_wins_over_text() {
        let transport = Arc::new(ScriptedTransport::new());
        let tool = json!({
            "type": "tool_response",
            "content": json!({ "config_json": { "navGroups": [] } }).to_string()
        });
        let answer = json!({
            "type": "answer",
            "content": "```json\n{\"filterArea\":{\"columns\":2}}\n```"
        });
        transport.push_chunks([
            format!("data: {}\n", tool),
            format!("data: {}\n", answer),
        ]);

        let mut client = AssistantClient::new(transport);
        let reply = client.send("改一下").await.unwrap();
        assert_eq!(reply.patch, Some(json!({ "navGroups": [] })));
    }
}
