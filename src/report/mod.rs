//! Report composition
//!
//! Turns the merged, globally numbered section document into the final
//! research report.

use crate::llm::{ChatModel, Conversation};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::error;

/// Report returned when the writing model cannot be reached
pub const FALLBACK_REPORT: &str = "# Research Report\nGeneration failed due to internal error";

const REPORT_PROMPT: &str = "Using the research discussion above, merge the content of all the search results below, \
add connecting paragraphs, and expand them into an in-depth research report that covers all of the search data. \
The report must mention every search result, be persuasive, and explain cause and effect.\n\
Accompany each important argument or figure with its citation number, e.g. [1][2], keeping the numbers exactly \
as they appear in the search results. Ordinary descriptions need no citation. \
End the report with an ordered list of every reference cited.";

/// Writes the final report from the merged document
#[async_trait]
pub trait ReportComposer: Send + Sync {
    async fn compose(&self, merged_document: &str) -> String;
}

/// Composer backed by a chat model
pub struct LlmReportComposer {
    model: Arc<dyn ChatModel>,
    model_name: String,
    conversation: Conversation,
}

impl LlmReportComposer {
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
impl ReportComposer for LlmReportComposer {
    async fn compose(&self, merged_document: &str) -> String {
        let messages = self
            .conversation
            .with_prompt(format!("{}\n{}", REPORT_PROMPT, merged_document));

        match self.model.complete(&self.model_name, &messages).await {
            Ok(report) => report,
            Err(e) => {
                error!("Report generation failed: {}", e);
                FALLBACK_REPORT.to_string()
            }
        }
    }
}
