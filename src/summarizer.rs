//! The pipeline entry point.
//!
//! Wires the phases together in order: chunk every document, map all
//! chunks in one wave, collapse until the summaries fit the budget, then
//! run the terminal reduce. The completion service is an explicitly
//! passed capability held by the [`Summarizer`]—there is no process-wide
//! model instance.

use crate::{batcher, collapser, mapper, reducer, DocumentChunker};
use crate::{Completer, Document, Error, Result, TokenBudget, TokenMeter};

/// Pipeline configuration.
///
/// Budgets are measured by the service's own tokenizer. The defaults
/// follow the reference pipeline: 500-token chunks for the map phase, a
/// 1000-token collapse ceiling, and at most 5 collapse rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarizeConfig {
    /// Token ceiling per chunk in the map phase.
    pub map_budget: TokenBudget,
    /// Token ceiling for the combined reduced summary set.
    pub collapse_budget: TokenBudget,
    /// Maximum collapse rounds past the first before the best-effort set
    /// is accepted.
    pub max_collapse_iterations: usize,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            map_budget: TokenBudget::new(500),
            collapse_budget: TokenBudget::new(1000),
            max_collapse_iterations: 5,
        }
    }
}

/// Hierarchical map-reduce summarizer over a completion service.
///
/// ## Example
///
/// ```rust,ignore
/// use distill::{Document, SummarizeConfig, Summarizer};
///
/// let summarizer = Summarizer::new(service, SummarizeConfig::default());
/// let summary = summarizer.summarize(&documents).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Summarizer<S> {
    service: S,
    config: SummarizeConfig,
}

impl<S> Summarizer<S>
where
    S: TokenMeter + Completer,
{
    /// Create a summarizer over the given service capability.
    pub fn new(service: S, config: SummarizeConfig) -> Self {
        Self { service, config }
    }

    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &SummarizeConfig {
        &self.config
    }

    /// Reduce `documents` to a single bounded-length summary.
    ///
    /// Either returns the final summary string or fails with one clearly
    /// identified error kind; partial output is never returned as
    /// success.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] when `documents` is empty or contains no
    ///   summarizable text, checked before any service call.
    /// - [`Error::Service`] when any completion or token-count call
    ///   fails; the enclosing wave is abandoned whole.
    pub async fn summarize(&self, documents: &[Document]) -> Result<String> {
        if documents.is_empty() {
            return Err(Error::EmptyInput);
        }

        let chunker = DocumentChunker::new(self.config.map_budget);
        let mut chunks = Vec::new();
        for (doc_index, document) in documents.iter().enumerate() {
            chunks.extend(chunker.split(document, doc_index, &self.service).await?);
        }
        if chunks.is_empty() {
            // Every document was whitespace: nothing to summarize.
            return Err(Error::EmptyInput);
        }
        tracing::debug!(
            documents = documents.len(),
            chunks = chunks.len(),
            "chunking finished"
        );

        let summaries = mapper::map_chunks(&chunks, &self.service).await?;

        let total = batcher::total_tokens(&summaries, &self.service).await?;
        let summaries = if self.config.collapse_budget.exceeded_by(total) {
            collapser::collapse(
                summaries,
                self.config.collapse_budget,
                self.config.max_collapse_iterations,
                &self.service,
            )
            .await?
            .summaries
        } else {
            summaries
        };

        reducer::combine(&summaries, &self.service).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Word-count meter plus a completer that shrinks everything.
    struct MockService {
        completions: AtomicUsize,
    }

    impl MockService {
        fn new() -> Self {
            Self {
                completions: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TokenMeter for MockService {
        async fn count_tokens(&self, text: &str) -> Result<usize> {
            Ok(text.split_whitespace().count())
        }
    }

    #[async_trait]
    impl Completer for MockService {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.completions.fetch_add(1, Ordering::SeqCst);
            Ok("a condensed summary".to_string())
        }
    }

    fn config(map: usize, collapse: usize, iters: usize) -> SummarizeConfig {
        SummarizeConfig {
            map_budget: TokenBudget::new(map),
            collapse_budget: TokenBudget::new(collapse),
            max_collapse_iterations: iters,
        }
    }

    #[test]
    fn test_empty_input_fails_before_any_call() {
        let service = MockService::new();
        let summarizer = Summarizer::new(service, SummarizeConfig::default());
        let err = block_on(summarizer.summarize(&[])).unwrap_err();

        assert!(matches!(err, Error::EmptyInput));
        assert_eq!(summarizer.service.completions.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_whitespace_documents_fail_as_empty() {
        let service = MockService::new();
        let summarizer = Summarizer::new(service, SummarizeConfig::default());
        let docs = vec![Document::new("T", "   "), Document::new("U", "\n\n")];
        let err = block_on(summarizer.summarize(&docs)).unwrap_err();

        assert!(matches!(err, Error::EmptyInput));
        assert_eq!(summarizer.service.completions.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_small_corpus_end_to_end() {
        let service = MockService::new();
        let summarizer = Summarizer::new(service, config(50, 100, 5));
        let docs = vec![
            Document::new("One", "Rust ownership prevents data races."),
            Document::new("Two", "Async Rust uses cooperative scheduling."),
        ];
        let summary = block_on(summarizer.summarize(&docs)).unwrap();

        assert_eq!(summary, "a condensed summary");
        // One map call per doc (each fits in one chunk) + final combine.
        assert_eq!(summarizer.service.completions.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_default_config() {
        let config = SummarizeConfig::default();
        assert_eq!(config.map_budget.limit(), 500);
        assert_eq!(config.collapse_budget.limit(), 1000);
        assert_eq!(config.max_collapse_iterations, 5);
    }
}
