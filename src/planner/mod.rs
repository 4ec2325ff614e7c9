//! Task planning
//!
//! Decomposes a research topic into sub-questions, each with one to three
//! seed queries for the scheduler.

use crate::llm::{parse_json_block, ChatModel, Conversation};
use crate::results::SubQuestion;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info};

const PLAN_PROMPT: &str = "Break the research topic discussed above down into detailed sub-questions \
and write one to three specific search queries for each sub-question.\n\
Avoid keywords like a bare year or \"launch date\".\n\
Respond with exactly one JSON block in this format:\n\
```json\n\
{\n  \"sub_questions\": [\n    {\n      \"question\": \"the research goal of the sub-question and what the search should find\",\n      \"query\": [\"detailed search query\"]\n    }\n  ]\n}\n\
```";

/// Decomposition result as returned by the model
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResearchPlan {
    #[serde(default)]
    pub sub_questions: Vec<SubQuestion>,
}

/// Decomposes a topic into sub-questions
#[async_trait]
pub trait TaskPlanner: Send + Sync {
    /// Plan the research; an empty list means nothing can be searched
    async fn plan(&self, topic: &str) -> Vec<SubQuestion>;
}

/// Planner backed by a chat model
pub struct LlmTaskPlanner {
    model: Arc<dyn ChatModel>,
    model_name: String,
    conversation: Conversation,
}

impl LlmTaskPlanner {
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
}

#[async_trait]
impl TaskPlanner for LlmTaskPlanner {
    async fn plan(&self, topic: &str) -> Vec<SubQuestion> {
        let prompt = format!("{}\nResearch topic: {}", PLAN_PROMPT, topic);
        let messages = self.conversation.with_prompt(prompt);

        let response = match self.model.complete(&self.model_name, &messages).await {
            Ok(response) => response,
            Err(e) => {
                error!("Task analysis failed: {}", e);
                return Vec::new();
            }
        };

        match parse_json_block::<ResearchPlan>(&response) {
            Ok(plan) => {
                info!("Planned {} sub-questions", plan.sub_questions.len());
                plan.sub_questions
            }
            Err(e) => {
                error!("Failed to parse analysis response: {}", e);
                debug!("Problematic analysis response: {}", response);
                Vec::new()
            }
        }
    }
}
