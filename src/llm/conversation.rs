//! Chat messages and the shared research conversation

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Context shared by every model call of one research run.
///
/// Calls never append to it; each call gets a copy of the history with its
/// own prompt at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    topic: String,
    history: Vec<ChatMessage>,
}

impl Conversation {
    /// Start a conversation about `topic`, dated today
    pub fn new(topic: impl Into<String>) -> Self {
        Self::dated(topic, Local::now().date_naive())
    }

    /// Start a conversation about `topic` with an explicit date
    pub fn dated(topic: impl Into<String>, today: NaiveDate) -> Self {
        let topic = topic.into();
        let history = vec![
            ChatMessage::system(format!(
                "You are a professional research assistant helping the user carry out in-depth research.\n\
                 Current date: {}\n\
                 You decompose the research topic into sub-questions, review search findings for \
                 missing information, and write the final report from the gathered results.",
                today
            )),
            ChatMessage::user(format!("Research topic: {}", topic)),
        ];
        Self { topic, history }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// The history followed by `prompt` as a user message
    pub fn with_prompt(&self, prompt: impl Into<String>) -> Vec<ChatMessage> {
        let mut messages = self.history.clone();
        messages.push(ChatMessage::user(prompt));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_prompt_does_not_mutate() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let conversation = Conversation::dated("solid state batteries", date);

        let messages = conversation.with_prompt("plan it");

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2], ChatMessage::user("plan it"));
        assert_eq!(conversation.history().len(), 2);
        assert!(conversation.history()[0].content.contains("2025-03-01"));
        assert!(conversation.history()[1].content.contains("solid state batteries"));
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&ChatMessage::system("hi")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"hi"}"#);

        let reply: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"ok"}"#).unwrap();
        assert_eq!(reply.role, Role::Assistant);
    }
}
