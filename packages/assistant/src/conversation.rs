use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Text,
    /// Assistant reply that carried a configuration patch
    ConfigPreview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sending,
    Streaming,
    Complete,
    Error,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_data: Option<Value>,
    pub timestamp: DateTime<Utc>,
    pub status: MessageStatus,
}

/// Role and text of a completed message, as sent to the transport
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Ordered chat history
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    counter: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn get(&self, id: &str) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn push_user(&mut self, content: &str) -> String {
        self.push(ChatRole::User, content.to_string(), MessageStatus::Complete)
    }

    /// Empty assistant message that will receive streamed text
    pub fn begin_assistant(&mut self) -> String {
        self.push(ChatRole::Assistant, String::new(), MessageStatus::Streaming)
    }

    /// Finished assistant message, e.g. a confirmation notice
    pub fn push_assistant(&mut self, content: &str) -> String {
        self.push(
            ChatRole::Assistant,
            content.to_string(),
            MessageStatus::Complete,
        )
    }

    pub fn append(&mut self, id: &str, chunk: &str) {
        if let Some(message) = self.get_mut(id) {
            message.content.push_str(chunk);
        }
    }

    pub fn complete(&mut self, id: &str, config: Option<Value>) {
        if let Some(message) = self.get_mut(id) {
            message.status = MessageStatus::Complete;
            if config.is_some() {
                message.kind = MessageKind::ConfigPreview;
                message.config_data = config;
            }
        }
    }

    pub fn set_status(&mut self, id: &str, status: MessageStatus) {
        if let Some(message) = self.get_mut(id) {
            message.status = status;
        }
    }

    /// Mark every message still streaming as cancelled
    pub fn cancel_streaming(&mut self) -> usize {
        let mut cancelled = 0;
        for message in &mut self.messages {
            if message.status == MessageStatus::Streaming {
                message.status = MessageStatus::Cancelled;
                cancelled += 1;
            }
        }
        cancelled
    }

    /// Completed messages only, oldest first
    pub fn history(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .filter(|m| m.status == MessageStatus::Complete)
            .map(|m| ChatTurn {
                role: m.role,
                content: m.content.clone(),
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn push(&mut self, role: ChatRole, content: String, status: MessageStatus) -> String {
        self.counter += 1;
        let now = Utc::now();
        let id = format!("msg_{}_{}", now.timestamp_millis(), self.counter);

        self.messages.push(ChatMessage {
            id: id.clone(),
            role,
            content,
            kind: MessageKind::Text,
            config_data: None,
            timestamp: now,
            status,
        });
        id
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().find(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_history_skips_unfinished_messages() {
        let mut conversation = Conversation::new();
        conversation.push_user("加一个页面");
        let reply = conversation.begin_assistant();
        conversation.append(&reply, "好的");

        assert_eq!(conversation.history().len(), 1);

        conversation.complete(&reply, None);
        let history = conversation.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].content, "好的");
    }

    #[test]
    fn test_ids_are_unique() {
        let mut conversation = Conversation::new();
        let a = conversation.push_user("a");
        let b = conversation.push_user("b");
        assert_ne!(a, b);
        assert!(a.starts_with("msg_"));
    }

    #[test]
    fn test_complete_with_config_marks_preview() {
        let mut conversation = Conversation::new();
        let reply = conversation.begin_assistant();
        conversation.complete(&reply, Some(json!({ "navGroups": [] })));

        let message = conversation.get(&reply).unwrap();
        assert_eq!(message.kind, MessageKind::ConfigPreview);
        assert_eq!(
            serde_json::to_value(message).unwrap()["type"],
            "config_preview"
        );
    }
}
