//! # Navboard Assistant
//!
//! Chat client for the configuration assistant.
//!
//! ```text
//! user text ─► ChatTransport ─► SSE chunks ─► SseDecoder ─► StreamEvents
//!                                                              │
//!                         tool_response config_json ◄──────────┤
//!                         extract_patch(answer text) ◄─────────┘
//!                                      │
//!                                      ▼
//!                              AssistantReply.patch
//! ```
//!
//! The patch is returned as raw JSON; normalizing it into a configuration
//! patch is the caller's job.

mod client;
mod conversation;
mod errors;
mod extract;
mod sse;
mod transport;

pub use client::{AssistantClient, AssistantReply};
pub use conversation::{
    ChatMessage, ChatRole, ChatTurn, Conversation, MessageKind, MessageStatus,
};
pub use errors::AssistantError;
pub use extract::{extract_patch, has_indicator, INDICATOR_KEYS};
pub use sse::{decode_line, SseDecoder, StreamEvent};
pub use transport::{ChatTransport, ChunkStream, ScriptedTransport};
