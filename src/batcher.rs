//! Greedy order-preserving batch packing.
//!
//! ## The Problem
//!
//! A reduce request carries a whole batch of summaries, so the batch's
//! combined token count must stay under the collapse budget. Optimal
//! bin-packing is unnecessary—and actively wrong—here: summaries must
//! stay in input order so the final summary reads coherently, which
//! leaves exactly one packing discipline: greedy, left to right.
//!
//! ```text
//! budget = 1000
//! counts = [400, 500, 300, 900, 1200, 100]
//!
//! [400, 500]   <- adding 300 would hit 1200, close
//! [300]        <- adding 900 would hit 1200, close
//! [900]        <- adding 1200 would hit 2100, close
//! [1200]       <- oversized: alone in its batch, tolerated
//! [100]
//! ```
//!
//! A single item whose own size exceeds the budget is never split at this
//! layer—it becomes its own one-item batch, propagating the chunker's
//! tolerated-exception policy upward.

use crate::{Result, Summary, TokenBudget, TokenMeter};

/// An ordered group of summaries whose combined token count fits the
/// budget (except the one-item oversized case).
///
/// Transient: exists only between one `pack` call and the reduce wave
/// that consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// The summaries in this batch, in input order.
    pub items: Vec<Summary>,
    /// Combined token count of the items, as measured at pack time.
    pub tokens: usize,
}

impl Batch {
    /// Number of items in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The batch texts joined with a paragraph separator, in order.
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.items
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Pack an ordered sequence of summaries into minimal-count groups under
/// `budget`.
///
/// Single pass, order preserving: a running group is closed whenever the
/// next item would overflow it and the group is non-empty. Every returned
/// batch with two or more items respects the budget; an item that alone
/// exceeds the budget is isolated in a one-item batch and flagged.
///
/// # Errors
///
/// Returns [`Error::Service`](crate::Error::Service) when a token-count
/// query fails.
pub async fn pack<M>(
    summaries: &[Summary],
    budget: TokenBudget,
    meter: &M,
) -> Result<Vec<Batch>>
where
    M: TokenMeter + ?Sized,
{
    let mut batches = Vec::new();
    let mut items: Vec<Summary> = Vec::new();
    let mut running = 0usize;

    for summary in summaries {
        let tokens = meter.count_tokens(&summary.text).await?;

        if !items.is_empty() && budget.would_overflow(running, tokens) {
            batches.push(Batch {
                items: std::mem::take(&mut items),
                tokens: running,
            });
            running = 0;
        }

        if budget.exceeded_by(tokens) {
            tracing::warn!(tokens, budget = %budget, "summary alone exceeds batch budget");
        }

        items.push(summary.clone());
        running += tokens;
    }

    if !items.is_empty() {
        batches.push(Batch {
            items,
            tokens: running,
        });
    }

    tracing::debug!(
        summaries = summaries.len(),
        batches = batches.len(),
        budget = %budget,
        "packed summaries"
    );

    Ok(batches)
}

/// Combined token count of a set of summaries, measured concurrently.
///
/// # Errors
///
/// Returns [`Error::Service`](crate::Error::Service) when any count
/// query fails; the whole wave is abandoned.
pub async fn total_tokens<M>(summaries: &[Summary], meter: &M) -> Result<usize>
where
    M: TokenMeter + ?Sized,
{
    let counts = futures::future::try_join_all(
        summaries.iter().map(|s| meter.count_tokens(&s.text)),
    )
    .await?;
    Ok(counts.into_iter().sum())
}
