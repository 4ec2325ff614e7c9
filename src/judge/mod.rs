//! Completeness judgment
//!
//! After each wave the scheduler asks a judge whether the findings for a
//! sub-question are complete and which follow-up queries would close the gap.
//! Judges never fail: anything unusable is reported as `None`.

use crate::error::StructuredOutputError;
use crate::llm::{parse_json_block, ChatModel, Conversation};
use crate::results::SubQuestion;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Structured judgment of a sub-question's coverage
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Judgment {
    /// What is still missing, if the judge said
    #[serde(default)]
    pub missing_info: Option<String>,
    /// Follow-up queries, in suggested order
    #[serde(default, rename = "new_query", alias = "new_queries")]
    pub new_queries: Vec<String>,
}

impl Judgment {
    /// Parse the fenced JSON block of a model response
    pub fn parse(response: &str) -> Result<Self, StructuredOutputError> {
        parse_json_block(response)
    }

    /// Whether the judgment proposes at least one non-blank query
    pub fn is_usable(&self) -> bool {
        self.new_queries.iter().any(|q| !q.trim().is_empty())
    }
}

/// Decides whether a sub-question needs more searching
#[async_trait]
pub trait CompletenessJudge: Send + Sync {
    /// Judge `findings` for `sub_question`; `None` means no expansion
    async fn assess(&self, sub_question: &SubQuestion, findings: &str) -> Option<Judgment>;
}

/// Judge backed by a chat model
pub struct LlmJudge {
    model: Arc<dyn ChatModel>,
    model_name: String,
    conversation: Conversation,
}

impl LlmJudge {
    pub fn new(
        model: Arc<dyn ChatModel>,
        model_name: impl Into<String>,
        conversation: Conversation,
    ) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            conversation,
        }
    }

    fn prompt(&self, sub_question: &SubQuestion, findings: &str) -> String {
        format!(
            "The main goal of the research is: {topic}\n\
             ## Sub question: {question}\n\
             Review the following search results gathered so far.\n\
             ## Current search results:\n\
             {findings}\n\n\
             Then produce:\n\
             1. A statement of the supplementary search directions still needed.\n\
             2. One to three new search queries that follow those directions, each concise but specific.\n\
             Respond with exactly one JSON block in this format:\n\
             ```json\n\
             {{\n  \"missing_info\": \"statement of supplementary search directions\",\n  \"new_query\": [\"new search query\"]\n}}\n\
             ```",
            topic = self.conversation.topic(),
            question = sub_question.description,
            findings = findings,
        )
    }
}

#[async_trait]
impl CompletenessJudge for LlmJudge {
    async fn assess(&self, sub_question: &SubQuestion, findings: &str) -> Option<Judgment> {
        let messages = self.conversation.with_prompt(self.prompt(sub_question, findings));

        let response = match self.model.complete(&self.model_name, &messages).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Completeness judgment failed for '{}': {}", sub_question.description, e);
                return None;
            }
        };

        match Judgment::parse(&response) {
            Ok(judgment) => Some(judgment),
            Err(e) => {
                error!("Unusable completeness judgment: {}", e);
                debug!("Problematic judgment response: {}", response);
                None
            }
        }
    }
}
