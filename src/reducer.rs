//! The reduce phase: many summaries in, one summary out.
//!
//! One completion request per batch, with the batch's texts concatenated
//! in order and joined by a paragraph separator. Used both for inner
//! collapse rounds ([`reduce`], one call per batch) and the terminal pass
//! ([`combine`], exactly one call over the final set).
//!
//! ## Reduce-of-One
//!
//! Inner rounds short-circuit single-summary batches: the summary passes
//! through unchanged, with no service call. Re-summarizing a lone summary
//! burns a request to paraphrase it—and paraphrase can *grow* the token
//! count, working against convergence. The terminal [`combine`] always
//! calls the service, even over one summary, so the final output has
//! passed through the consolidation prompt exactly once.

use crate::{prompt, Batch, Completer, Result, Summary};

/// Combine one batch into a single summary via one completion request.
///
/// A single-element batch is returned unchanged in content (retagged as
/// collapsed), without a service call.
///
/// # Errors
///
/// Returns [`Error::Service`](crate::Error::Service) when the completion
/// call fails.
pub async fn reduce<C>(batch: &Batch, completer: &C) -> Result<Summary>
where
    C: Completer + ?Sized,
{
    if let [only] = batch.items.as_slice() {
        return Ok(Summary::collapsed(only.text.clone()));
    }

    let response = completer
        .complete(&prompt::reduce_prompt(&batch.joined_text()))
        .await?;
    Ok(Summary::collapsed(response))
}

/// Terminal pass: combine the final summary set into one string.
///
/// Always issues exactly one completion request, regardless of how many
/// summaries remain. After an iteration-exhausted collapse this request
/// may exceed the collapse budget; the service degrades gracefully on
/// oversized input, so the call is made anyway.
///
/// # Errors
///
/// Returns [`Error::Service`](crate::Error::Service) when the completion
/// call fails.
pub async fn combine<C>(summaries: &[Summary], completer: &C) -> Result<String>
where
    C: Completer + ?Sized,
{
    let joined = summaries
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    completer.complete(&prompt::reduce_prompt(&joined)).await
}
