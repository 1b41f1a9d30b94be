//! Property-based tests for the summarization pipeline.
//!
//! These tests verify the pipeline's key invariants:
//! - Order preservation: chunker and batcher never reorder their input
//! - Budget respect: multi-item batches stay under budget
//! - Oversized singleton: over-budget items are isolated, never merged
//! - Termination: collapse finishes within `max_iterations + 1` rounds
//! - Cardinality: the mapper returns one summary per chunk

use async_trait::async_trait;
use futures::executor::block_on;
use proptest::prelude::*;

use distill::{
    collapse, map_chunks, pack, Chunk, Completer, Document, DocumentChunker, Result, Summary,
    TokenBudget, TokenMeter,
};

// =============================================================================
// Mock Services
// =============================================================================

/// One token per whitespace-separated word.
struct WordMeter;

#[async_trait]
impl TokenMeter for WordMeter {
    async fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count())
    }
}

/// Completes every prompt with a fixed short response.
struct FixedCompleter(&'static str);

#[async_trait]
impl Completer for FixedCompleter {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Word meter plus a completer that always answers with `response`.
struct ScriptedService {
    response: String,
}

#[async_trait]
impl TokenMeter for ScriptedService {
    async fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count())
    }
}

#[async_trait]
impl Completer for ScriptedService {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.response.clone())
    }
}

// =============================================================================
// Test Generators
// =============================================================================

/// Summaries with arbitrary word counts.
fn arbitrary_summaries() -> impl Strategy<Value = Vec<Summary>> {
    prop::collection::vec(1usize..40, 1..20).prop_map(|counts| {
        counts
            .iter()
            .enumerate()
            .map(|(i, &n)| Summary::partial(vec![format!("word{i}"); n].join(" ")))
            .collect()
    })
}

/// Text with word and paragraph structure.
fn wordy_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::string::string_regex("[a-z]{2,10}").unwrap(), 5..120).prop_map(
        |words| {
            let mut text = String::new();
            for (i, word) in words.iter().enumerate() {
                text.push_str(word);
                if i % 17 == 16 {
                    text.push_str("\n\n");
                } else if i % 6 == 5 {
                    text.push_str(". ");
                } else {
                    text.push(' ');
                }
            }
            text
        },
    )
}

// =============================================================================
// Batcher Invariants
// =============================================================================

proptest! {
    #[test]
    fn batcher_preserves_order(summaries in arbitrary_summaries(), limit in 5usize..60) {
        let batches = block_on(pack(&summaries, TokenBudget::new(limit), &WordMeter)).unwrap();

        let flattened: Vec<&str> = batches
            .iter()
            .flat_map(|b| b.items.iter().map(|s| s.text.as_str()))
            .collect();
        let original: Vec<&str> = summaries.iter().map(|s| s.text.as_str()).collect();
        prop_assert_eq!(flattened, original);
    }

    #[test]
    fn multi_item_batches_respect_budget(
        summaries in arbitrary_summaries(),
        limit in 5usize..60
    ) {
        let budget = TokenBudget::new(limit);
        let batches = block_on(pack(&summaries, budget, &WordMeter)).unwrap();

        for batch in &batches {
            if batch.len() >= 2 {
                prop_assert!(
                    batch.tokens <= limit,
                    "batch of {} items at {} tokens exceeds {}",
                    batch.len(),
                    batch.tokens,
                    limit
                );
            }
        }
    }

    #[test]
    fn oversized_items_are_isolated(
        summaries in arbitrary_summaries(),
        limit in 5usize..60
    ) {
        let budget = TokenBudget::new(limit);
        let batches = block_on(pack(&summaries, budget, &WordMeter)).unwrap();

        for batch in &batches {
            let oversized = batch
                .items
                .iter()
                .any(|s| s.text.split_whitespace().count() > limit);
            if oversized {
                prop_assert_eq!(batch.len(), 1, "oversized item was merged");
            }
        }
    }

    #[test]
    fn no_empty_batches(summaries in arbitrary_summaries(), limit in 5usize..60) {
        let batches = block_on(pack(&summaries, TokenBudget::new(limit), &WordMeter)).unwrap();
        for batch in &batches {
            prop_assert!(!batch.is_empty());
        }
    }
}

// =============================================================================
// Chunker Invariants
// =============================================================================

proptest! {
    #[test]
    fn chunks_respect_budget(text in wordy_text(), limit in 3usize..30) {
        let chunker = DocumentChunker::new(limit);
        let doc = Document::new("T", text);
        let chunks = block_on(chunker.split(&doc, 0, &WordMeter)).unwrap();

        // A word meter can always split down to one word, so no chunk is
        // ever emitted oversized here.
        for chunk in &chunks {
            let words = chunk.text.split_whitespace().count();
            prop_assert!(words <= limit, "chunk of {} words over budget {}", words, limit);
        }
    }

    #[test]
    fn chunk_ordinals_are_sequential(text in wordy_text(), limit in 3usize..30) {
        let chunker = DocumentChunker::new(limit);
        let doc = Document::new("T", text);
        let chunks = block_on(chunker.split(&doc, 0, &WordMeter)).unwrap();

        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.ordinal, i);
        }
    }

    #[test]
    fn chunks_are_nonempty(text in wordy_text(), limit in 3usize..30) {
        let chunker = DocumentChunker::new(limit);
        let doc = Document::new("T", text);
        let chunks = block_on(chunker.split(&doc, 0, &WordMeter)).unwrap();

        for chunk in &chunks {
            prop_assert!(!chunk.text.trim().is_empty());
        }
    }

    #[test]
    fn chunk_words_preserve_document_order(text in wordy_text(), limit in 7usize..30) {
        // Budgets of at least 7 keep every 6-word sentence splittable at
        // sentence level; the window level may legitimately cut inside a
        // word, which would change the word sequence.
        let chunker = DocumentChunker::new(limit);
        let doc = Document::new("T", text.clone());
        let chunks = block_on(chunker.split(&doc, 0, &WordMeter)).unwrap();

        // Chunk boundaries may trim separators, but the word sequence
        // must survive intact.
        let original: Vec<&str> = text.split_whitespace().collect();
        let rebuilt: Vec<&str> = chunks
            .iter()
            .flat_map(|c| c.text.split_whitespace())
            .collect();
        prop_assert_eq!(rebuilt, original);
    }
}

// =============================================================================
// Mapper Invariants
// =============================================================================

proptest! {
    #[test]
    fn mapper_cardinality_matches_input(n in 0usize..25) {
        let chunks: Vec<Chunk> = (0..n)
            .map(|i| Chunk::new(format!("chunk {i}"), "T", 0, i))
            .collect();
        let summaries = block_on(map_chunks(&chunks, &FixedCompleter("ok"))).unwrap();
        prop_assert_eq!(summaries.len(), n);
    }
}

// =============================================================================
// Collapser Invariants
// =============================================================================

proptest! {
    #[test]
    fn collapse_terminates_within_cap(
        summaries in arbitrary_summaries(),
        limit in 5usize..40,
        max_iterations in 0usize..4,
        response_words in 1usize..80
    ) {
        // The scripted response may be larger than the budget, so
        // convergence is not guaranteed; termination always is.
        let service = ScriptedService {
            response: vec!["word"; response_words].join(" "),
        };
        let out = block_on(collapse(
            summaries,
            TokenBudget::new(limit),
            max_iterations,
            &service,
        ))
        .unwrap();

        prop_assert!(out.rounds <= max_iterations + 1);
        prop_assert!(!out.summaries.is_empty());
        if out.converged {
            let total: usize = out
                .summaries
                .iter()
                .map(|s| s.text.split_whitespace().count())
                .sum();
            prop_assert!(total <= limit);
        }
    }
}
