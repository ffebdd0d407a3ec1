//! Chat transport seam.
//!
//! A transport turns the conversation history into a stream of raw SSE text
//! chunks. The network implementation lives outside this crate; the scripted
//! transport replays canned chunks.

use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use crate::conversation::ChatTurn;
use crate::errors::AssistantError;

pub type ChunkStream = BoxStream<'static, Result<String, AssistantError>>;

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn open(&self, turns: &[ChatTurn]) -> Result<ChunkStream, AssistantError>;
}

/// Replays queued responses, one per `open` call
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<Vec<Vec<Result<String, AssistantError>>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response made of raw SSE chunks
    pub fn push_chunks<I, S>(&self, chunks: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_response(chunks.into_iter().map(|c| Ok(c.into())).collect());
    }

    /// Queue a response as plain answer text, one `answer` event per piece
    pub fn push_answer<I, S>(&self, pieces: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let chunks = pieces
            .into_iter()
            .map(|piece| {
                let event = serde_json::json!({ "type": "answer", "content": piece.as_ref() });
                Ok(format!("data: {}\n\n", event))
            })
            .collect();
        self.push_response(chunks);
    }

    pub fn push_response(&self, chunks: Vec<Result<String, AssistantError>>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push(chunks);
        }
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn open(&self, _turns: &[ChatTurn]) -> Result<ChunkStream, AssistantError> {
        let mut responses = self
            .responses
            .lock()
            .map_err(|_| AssistantError::Transport("scripted transport poisoned".to_string()))?;

        if responses.is_empty() {
            return Err(AssistantError::Transport("no scripted response".to_string()));
        }
        let chunks = responses.remove(0);

        Ok(stream::iter(chunks).boxed())
    }
}
