//! # distill
//!
//! Hierarchical map-reduce summarization for LLM pipelines.
//!
//! ## The Problem
//!
//! A text-completion service accepts inputs only up to a fixed token
//! budget, and the length of what it returns is not directly
//! controllable. You have arbitrarily many documents and want *one*
//! bounded-length summary of all of them.
//!
//! This sounds trivial—just concatenate and summarize, right? But consider:
//!
//! - The concatenation of fifty blog posts does not fit in any request
//! - Summaries of summaries can *grow* when the model paraphrases verbosely
//! - Requests fail transiently, and a thousand sequential calls are slow
//! - Splitting mid-sentence hands the model garbage
//!
//! The fix is the classic map-reduce recipe, applied hierarchically and
//! budget-checked at every stage:
//!
//! ```text
//! Document[] --Chunker--> Chunk[] --Mapper--> Summary[]
//!                                                |
//!                     +--------------------------+
//!                     v
//!              Collapser (loop):
//!                pack into batches under budget
//!                reduce each batch concurrently
//!                fits?  -> done
//!                cap?   -> done (best effort)
//!                     |
//!                     v
//!              final reduce -> String
//! ```
//!
//! ## The Phases
//!
//! | Phase | Unit of work | Concurrency | Budget |
//! |-------|--------------|-------------|--------|
//! | Chunk | one document | none | map budget per chunk |
//! | Map | one chunk | one wave, all chunks | — |
//! | Collapse | one round | one wave per round | collapse budget |
//! | Reduce | one batch | within the round's wave | collapse budget |
//!
//! Order is preserved end-to-end: results are re-associated by index,
//! never by completion order, so the final summary reads in input order.
//!
//! ## Termination
//!
//! Reduction is not guaranteed to shrink token counts, so the collapse
//! loop carries an iteration cap. When the cap is hit, the best-effort
//! reduced set is passed to the final reduce anyway—a deliberate lossy
//! fallback, flagged but not fatal.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use distill::{Document, Summarizer, SummarizeConfig};
//!
//! let service = /* anything implementing TokenMeter + Completer */;
//! let summarizer = Summarizer::new(service, SummarizeConfig::default());
//!
//! let docs = vec![
//!     Document::new("Post one", "..."),
//!     Document::new("Post two", "..."),
//! ];
//! let summary = summarizer.summarize(&docs).await?;
//! ```
//!
//! ## The Capability Boundary
//!
//! The completion service is the only external collaborator, modeled as
//! two explicitly passed capabilities—no process-wide singleton:
//!
//! - [`TokenMeter`]: measure text in the service's own tokenization
//! - [`Completer`]: single-turn text completion
//!
//! The offline [`HeuristicMeter`] (~4 chars/token) covers tests and
//! demos; the `openai` feature adds a reqwest-backed [`Completer`].

mod batcher;
mod budget;
mod chunker;
mod collapser;
mod document;
mod error;
mod mapper;
mod meter;
pub mod prompt;
mod reducer;
mod summarizer;

#[cfg(feature = "openai")]
mod openai;

pub use batcher::{pack, total_tokens, Batch};
pub use budget::TokenBudget;
pub use chunker::DocumentChunker;
pub use collapser::{collapse, Collapsed};
pub use document::{Chunk, Document, MapSummary, Summary, SummaryStage};
pub use error::{Error, Result};
pub use mapper::{map_chunks, map_chunks_structured};
pub use meter::HeuristicMeter;
pub use reducer::{combine, reduce};
pub use summarizer::{SummarizeConfig, Summarizer};

#[cfg(feature = "openai")]
pub use openai::OpenAiClient;

use async_trait::async_trait;

/// Token measurement in the completion service's own tokenization.
///
/// A pure query: deterministic for a given text/model pair, no mutation.
/// Counts are re-queried whenever text changes; the pipeline never caches
/// a count across a mutation of the underlying text.
#[async_trait]
pub trait TokenMeter: Send + Sync {
    /// Count the tokens in `text`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Service`] when the measurement call fails; the
    /// failure aborts the enclosing wave.
    async fn count_tokens(&self, text: &str) -> Result<usize>;
}

/// Single-turn text completion.
///
/// No conversation state is retained between calls. The service is
/// treated as a stateless, reentrant capability; rate limiting and
/// retries, if any, belong to the implementation, not the pipeline.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Complete `prompt` and return the response text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Service`] when the call fails (network, rate
    /// limit, timeout); the failure aborts the enclosing wave.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
