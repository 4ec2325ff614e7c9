//! Language model plumbing
//!
//! Chat completion client, the per-run conversation context and extraction of
//! JSON payloads embedded in free-form model text.

mod client;
mod conversation;
mod structured;

pub use client::{
    completion_body, ChatModel, CompletionChoice, CompletionMessage, CompletionResponse, OpenRouter,
};
pub use conversation::{ChatMessage, Conversation, Role};
pub use structured::{extract_json_block, parse_json_block};
