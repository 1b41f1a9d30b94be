//! Summarize a handful of documents end to end.
//!
//! Runs offline against a toy service: the heuristic meter for counting
//! and a trivial completer that truncates its input. Swap in the `openai`
//! feature's client for real summaries:
//!
//! ```text
//! cargo run --example summarize
//! ```

use async_trait::async_trait;

use distill::{
    Completer, Document, HeuristicMeter, Result, Summarizer, SummarizeConfig, TokenMeter,
};

/// A stand-in completion service: answers with the first 200 characters
/// of whatever content appears in the prompt.
struct TruncatingService;

#[async_trait]
impl TokenMeter for TruncatingService {
    async fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(HeuristicMeter::estimate(text))
    }
}

#[async_trait]
impl Completer for TruncatingService {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = prompt
            .split("Document Content: ")
            .nth(1)
            .or_else(|| prompt.split("set of summaries:\n").nth(1))
            .unwrap_or(prompt);
        let end = body
            .char_indices()
            .nth(200)
            .map_or(body.len(), |(i, _)| i);
        Ok(format!("(summary) {}", &body[..end]))
    }
}

#[tokio::main]
async fn main() {
    let docs = vec![
        Document::new(
            "Why Rust for Services",
            "Rust's ownership model eliminates whole classes of bugs. \
             Services written in Rust tend to have predictable latency \
             because there is no garbage collector to pause the world.\n\n\
             The async ecosystem, built around cooperative scheduling, \
             lets one thread drive thousands of outstanding requests.",
        ),
        Document::new(
            "Summarizing at Scale",
            "When a corpus exceeds the context window, hierarchical \
             map-reduce summarization splits documents into chunks, \
             summarizes each independently, and folds the partial \
             summaries together until they fit a token budget.",
        ),
    ];

    let summarizer = Summarizer::new(TruncatingService, SummarizeConfig::default());

    match summarizer.summarize(&docs).await {
        Ok(summary) => println!("Final summary:\n{summary}"),
        Err(e) => eprintln!("summarization failed: {e}"),
    }
}
