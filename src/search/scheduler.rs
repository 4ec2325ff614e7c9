//! Depth-bounded query scheduling for one sub-question

use super::session::{SearchSession, SessionOutcome};
use crate::engines::SearchEngine;
use crate::error::ProviderError;
use crate::judge::CompletenessJudge;
use crate::metrics::Metrics;
use crate::results::{ResultStore, Section, SubQuestion};
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Drives the iterative search of a single sub-question.
///
/// Queries run in waves: every query of a wave is dispatched concurrently and
/// the wave resolves completely before the judge is asked for follow-ups.
/// At most `max_depth + 1` waves run per sub-question.
pub struct QueryScheduler {
    /// Answer-with-citations provider
    engine: Arc<dyn SearchEngine>,
    /// Coverage judge consulted between waves
    judge: Arc<dyn CompletenessJudge>,
    /// Every search result is appended here as it completes
    store: ResultStore,
    /// Run statistics
    metrics: Arc<Metrics>,
    /// Expansion rounds after the seed wave
    max_depth: usize,
    /// Deadline for a single search call
    search_timeout: Duration,
}

impl QueryScheduler {
    /// Create a new scheduler
    pub fn new(
        engine: Arc<dyn SearchEngine>,
        judge: Arc<dyn CompletenessJudge>,
        store: ResultStore,
    ) -> Self {
        Self {
            engine,
            judge,
            store,
            metrics: Arc::new(Metrics::new()),
            max_depth: crate::DEFAULT_MAX_DEPTH,
            search_timeout: Duration::from_secs(crate::DEFAULT_SEARCH_TIMEOUT),
        }
    }

    /// Set the depth bound
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the per-search timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    /// Share run statistics with other components
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Search one sub-question to completion
    pub async fn run(&self, sub_question: &SubQuestion) -> SessionOutcome {
        let mut session = SearchSession::new(sub_question);

        for depth in 0..=self.max_depth {
            let wave = session.next_wave();
            if wave.is_empty() {
                break;
            }

            info!(
                "Searching [{}] depth {} with {} queries",
                sub_question.description,
                depth,
                wave.len()
            );

            for (section, succeeded) in self.run_wave(&wave).await {
                session.record(&section, succeeded);
            }
            session.finish_wave();
            self.metrics.record_wave();

            // Suggestions after the last wave could never be searched
            if depth < self.max_depth {
                self.expand(sub_question, &mut session).await;
            }

            if !session.has_pending() {
                break;
            }
        }

        let outcome = session.into_outcome();
        info!(
            "Finished [{}]: {} queries in {} waves, {} failed",
            sub_question.description,
            outcome.dispatched.len(),
            outcome.waves,
            outcome.failures
        );
        outcome
    }

    /// Dispatch all queries of a wave and wait for every one to resolve
    async fn run_wave(&self, queries: &[String]) -> Vec<(Section, bool)> {
        let futures: Vec<_> = queries.iter().map(|query| self.search_one(query)).collect();
        join_all(futures).await
    }

    /// Search a single query; failures become error sections
    async fn search_one(&self, query: &str) -> (Section, bool) {
        debug!("Searching '{}' with {} ({})", query, self.engine.name(), self.engine.model());
        let start = Instant::now();

        let result = timeout(self.search_timeout, self.engine.search(query)).await;
        self.metrics.record_search(start.elapsed().as_millis() as u64);

        let (section, succeeded) = match result {
            Ok(Ok(answer)) => {
                debug!(
                    "'{}' answered with {} citations in {:?}",
                    query,
                    answer.citations.len(),
                    start.elapsed()
                );
                (Section::new(query, answer.content, answer.citations), true)
            }
            Ok(Err(e)) => {
                warn!("Search failed for query '{}': {}", query, e);
                self.metrics.record_failure(e.is_timeout());
                (Section::failed(query, &e), false)
            }
            Err(_) => {
                let e = ProviderError::Timeout(self.search_timeout);
                warn!("Search failed for query '{}': {}", query, e);
                self.metrics.record_failure(true);
                (Section::failed(query, &e), false)
            }
        };

        self.store.push(section.clone());
        (section, succeeded)
    }

    /// Ask the judge for follow-up queries and queue them
    async fn expand(&self, sub_question: &SubQuestion, session: &mut SearchSession) {
        let judgment = self
            .judge
            .assess(sub_question, &session.findings_text())
            .await;

        match judgment {
            Some(judgment) if judgment.is_usable() => {
                if let Some(ref missing) = judgment.missing_info {
                    info!("Missing for [{}]: {}", sub_question.description, missing);
                }
                let queued = session.enqueue(judgment.new_queries);
                info!("Added {} supplementary queries", queued);
                self.metrics.record_judgment(true);
            }
            _ => {
                info!("No supplementary search for [{}]", sub_question.description);
                self.metrics.record_judgment(false);
            }
        }
    }
}
