//! The map phase: one partial summary per chunk.
//!
//! All requests in a map call are issued as one concurrent wave. Results
//! are re-associated with their chunks by index, never by completion
//! order, so output order and cardinality always equal the input's. Any
//! single failed request fails the whole wave—no partial results leave
//! this layer; retries, if any, belong to the service implementation.

use crate::{prompt, Chunk, Completer, Error, MapSummary, Result, Summary};

/// Summarize each chunk with one completion request, concurrently.
///
/// Returns exactly one [`Summary`] per chunk, in chunk order.
///
/// # Errors
///
/// Returns [`Error::Service`] when any request in the wave fails.
pub async fn map_chunks<C>(chunks: &[Chunk], completer: &C) -> Result<Vec<Summary>>
where
    C: Completer + ?Sized,
{
    tracing::debug!(chunks = chunks.len(), "map wave started");

    // Prompts must outlive the wave: the request futures borrow them.
    let prompts: Vec<String> = chunks
        .iter()
        .map(|chunk| prompt::map_prompt(&chunk.title, &chunk.text))
        .collect();
    let wave = prompts.iter().map(|p| completer.complete(p));
    let responses = futures::future::try_join_all(wave).await?;

    Ok(responses.into_iter().map(Summary::partial).collect())
}

/// Structured variant: each chunk yields a title/summary record.
///
/// Responses are validated eagerly at this boundary; a response that does
/// not parse as a [`MapSummary`] fails the wave with
/// [`Error::MalformedResponse`] rather than propagating an untyped value.
///
/// # Errors
///
/// Returns [`Error::Service`] when any request fails, or
/// [`Error::MalformedResponse`] when a response does not match the
/// expected shape.
pub async fn map_chunks_structured<C>(
    chunks: &[Chunk],
    completer: &C,
) -> Result<Vec<MapSummary>>
where
    C: Completer + ?Sized,
{
    let prompts: Vec<String> = chunks
        .iter()
        .map(|chunk| prompt::map_structured_prompt(&chunk.title, &chunk.text))
        .collect();
    let wave = prompts.iter().map(|p| completer.complete(p));
    let responses = futures::future::try_join_all(wave).await?;

    responses
        .iter()
        .map(|raw| parse_map_summary(raw))
        .collect()
}

/// Parse a structured map response, tolerating Markdown code fences.
fn parse_map_summary(raw: &str) -> Result<MapSummary> {
    let body = strip_code_fence(raw.trim());
    serde_json::from_str(body).map_err(|e| Error::MalformedResponse(e.to_string()))
}

/// Models often wrap JSON in ```json fences despite instructions.
fn strip_code_fence(text: &str) -> &str {
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}
