//! End-to-end research run

use super::artifacts::ArtifactPaths;
use crate::citations::merge_sections;
use crate::config::Settings;
use crate::engines::{Perplexity, SearchEngine};
use crate::judge::{CompletenessJudge, LlmJudge};
use crate::llm::{ChatModel, Conversation, OpenRouter};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::network::HttpClient;
use crate::planner::{LlmTaskPlanner, TaskPlanner};
use crate::report::{LlmReportComposer, ReportComposer};
use crate::results::{ResultStore, SubQuestion};
use crate::search::{QueryScheduler, SessionOutcome};
use anyhow::Result;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How sub-questions are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub max_depth: usize,
    pub search_timeout: Duration,
    /// Run sub-question sessions concurrently
    pub parallel: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_depth: crate::DEFAULT_MAX_DEPTH,
            search_timeout: Duration::from_secs(crate::DEFAULT_SEARCH_TIMEOUT),
            parallel: false,
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct ResearchOutcome {
    pub topic: String,
    pub sub_questions: Vec<SubQuestion>,
    pub sessions: Vec<SessionOutcome>,
    /// Sections persisted, error sections included
    pub sections: usize,
    pub failed_sections: usize,
    /// Global citation ids assigned by the merge
    pub citations: usize,
    pub report: String,
    pub metrics: MetricsSnapshot,
}

/// Plans a topic, searches every sub-question, merges citations and writes
/// the report
pub struct ResearchPipeline {
    planner: Arc<dyn TaskPlanner>,
    engine: Arc<dyn SearchEngine>,
    judge: Arc<dyn CompletenessJudge>,
    composer: Arc<dyn ReportComposer>,
    artifacts: ArtifactPaths,
    options: PipelineOptions,
}

impl ResearchPipeline {
    pub fn new(
        planner: Arc<dyn TaskPlanner>,
        engine: Arc<dyn SearchEngine>,
        judge: Arc<dyn CompletenessJudge>,
        composer: Arc<dyn ReportComposer>,
        artifacts: ArtifactPaths,
    ) -> Self {
        Self {
            planner,
            engine,
            judge,
            composer,
            artifacts,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Wire the provider-backed collaborators for a run about `topic`
    pub fn from_settings(settings: &Settings, topic: &str) -> Result<Self> {
        let research = &settings.research;
        let providers = &settings.providers;

        let search_client = HttpClient::with_settings(&providers.search)?;
        let engine = Perplexity::new(
            search_client,
            &providers.search,
            research.search_model.clone(),
        )?;

        let chat_client = HttpClient::with_settings(&providers.chat)?;
        let chat: Arc<dyn ChatModel> = Arc::new(OpenRouter::new(chat_client, &providers.chat)?);

        let conversation = Conversation::new(topic);
        let planner =
            LlmTaskPlanner::new(chat.clone(), &research.analysis_model, conversation.clone());
        let judge = LlmJudge::new(chat.clone(), &research.analysis_model, conversation.clone());
        let composer = LlmReportComposer::new(chat, &research.writing_model, conversation);

        info!(
            "Search with {} ({}), analysis with {}, writing with {}",
            engine.name(),
            engine.model(),
            research.analysis_model,
            research.writing_model
        );

        let options = PipelineOptions {
            max_depth: research.max_depth,
            search_timeout: providers.search.timeout(),
            parallel: research.parallel_sub_questions,
        };

        Ok(Self::new(
            Arc::new(planner),
            Arc::new(engine),
            Arc::new(judge),
            Arc::new(composer),
            ArtifactPaths::from_settings(&settings.output),
        )
        .with_options(options))
    }

    pub fn artifacts(&self) -> &ArtifactPaths {
        &self.artifacts
    }

    /// Run the whole research flow for `topic`
    pub async fn run(&self, topic: &str) -> Result<ResearchOutcome> {
        self.artifacts.prepare().await?;

        info!("Planning research for: {}", topic);
        let sub_questions = self.planner.plan(topic).await;
        if sub_questions.is_empty() {
            warn!("No sub-questions planned, the search document will be empty");
        }

        let store = ResultStore::new();
        let metrics = Arc::new(Metrics::new());
        let scheduler = QueryScheduler::new(self.engine.clone(), self.judge.clone(), store.clone())
            .with_max_depth(self.options.max_depth)
            .with_timeout(self.options.search_timeout)
            .with_metrics(metrics.clone());

        let sessions = if self.options.parallel {
            join_all(sub_questions.iter().map(|sq| scheduler.run(sq))).await
        } else {
            let mut sessions = Vec::with_capacity(sub_questions.len());
            for (i, sub_question) in sub_questions.iter().enumerate() {
                info!(
                    "Sub-question {}/{}: {}",
                    i + 1,
                    sub_questions.len(),
                    sub_question.description
                );
                sessions.push(scheduler.run(sub_question).await);
            }
            sessions
        };

        self.artifacts
            .write(&self.artifacts.search_results, &store.to_document())
            .await?;

        let sections = store.sections();
        let merged = merge_sections(&sections);
        let merged_text = merged.render();
        info!(
            "Merged {} sections into {} global citations",
            sections.len(),
            merged.citation_count()
        );
        self.artifacts
            .write(&self.artifacts.merged_results, &merged_text)
            .await?;

        let report = self.composer.compose(&merged_text).await;
        self.artifacts.write(&self.artifacts.report, &report).await?;

        let snapshot = metrics.snapshot();
        info!("Run statistics: {}", serde_json::to_string(&snapshot)?);

        Ok(ResearchOutcome {
            topic: topic.to_string(),
            sub_questions,
            sessions,
            sections: sections.len(),
            failed_sections: store.error_count(),
            citations: merged.citation_count(),
            report,
            metrics: snapshot,
        })
    }
}
