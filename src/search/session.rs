//! Per-sub-question search state

use crate::results::{normalize_query, Section, SubQuestion};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};

/// Work queue, seen-set and accumulated findings of one sub-question.
///
/// Owned by the single control flow driving the sub-question, so sessions of
/// different sub-questions can run concurrently without sharing anything.
#[derive(Debug, Default)]
pub struct SearchSession {
    queue: VecDeque<String>,
    seen: HashSet<String>,
    findings: Vec<String>,
    dispatched: Vec<String>,
    waves: usize,
    failures: usize,
}

impl SearchSession {
    /// Start a session queued with the sub-question's seed queries
    pub fn new(sub_question: &SubQuestion) -> Self {
        let mut session = Self::default();
        session.enqueue(sub_question.queries.iter().cloned());
        session
    }

    /// Queue queries for the next wave, skipping blank ones.
    ///
    /// Whitespace runs are collapsed to one space before queueing, so
    /// `"a\nb"` and `"a b"` are the same query. Already-seen queries are
    /// accepted here and dropped when the wave is drained. Returns the number
    /// of queries queued.
    pub fn enqueue<I>(&mut self, queries: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.queue.len();
        for query in queries {
            let query = normalize_query(&query);
            if query.is_empty() {
                warn!("Ignoring blank search query");
                continue;
            }
            self.queue.push_back(query);
        }
        self.queue.len() - before
    }

    /// Whether any query is waiting for the next wave
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Drain the whole queue into the next wave.
    ///
    /// Each query is marked seen as it is drained, so it can never be issued
    /// again in this session.
    pub fn next_wave(&mut self) -> Vec<String> {
        let mut wave = Vec::with_capacity(self.queue.len());
        while let Some(query) = self.queue.pop_front() {
            if !self.seen.insert(query.clone()) {
                debug!("Skipping already searched query: {}", query);
                continue;
            }
            self.dispatched.push(query.clone());
            wave.push(query);
        }
        wave
    }

    /// Record one section produced by the current wave
    pub fn record(&mut self, section: &Section, succeeded: bool) {
        if succeeded {
            self.findings.push(section.content.clone());
        } else {
            self.failures += 1;
        }
    }

    /// Mark the current wave as complete
    pub fn finish_wave(&mut self) {
        self.waves += 1;
    }

    /// Findings joined into the text handed to the judge
    pub fn findings_text(&self) -> String {
        self.findings.join("\n\n")
    }

    pub fn into_outcome(self) -> SessionOutcome {
        SessionOutcome {
            findings: self.findings,
            dispatched: self.dispatched,
            waves: self.waves,
            failures: self.failures,
        }
    }
}

/// What one sub-question session produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionOutcome {
    /// Successful search contents, in wave-completion order
    pub findings: Vec<String>,
    /// Every query sent to the search engine, in dispatch order
    pub dispatched: Vec<String>,
    /// Number of waves run
    pub waves: usize,
    /// Number of searches that ended in an error section
    pub failures: usize,
}
