//! The collapse loop: batch and reduce until the summaries fit.
//!
//! ## The State Machine
//!
//! ```text
//! Round(summaries, iteration):
//!   pack(summaries, budget) -> batches
//!   reduce each batch       -> next (one concurrent wave)
//!   total(next) <= budget?  -> terminal, converged
//!   iteration == cap?       -> terminal, best effort (flagged)
//!   else                    -> Round(next, iteration + 1)
//! ```
//!
//! An explicit loop carries the `(summaries, iteration)` state—recursion
//! depth must not track input size. Input that already fits terminates in
//! zero rounds.
//!
//! ## Why the Cap Exists
//!
//! Reduction is not guaranteed to shrink token counts: the model can
//! paraphrase verbosely, and a round of N batches yields N summaries that
//! may sum larger than before. The cap bounds worst-case latency and cost
//! against such pathological inputs. Hitting it is tolerated, not fatal:
//! the best-effort set is handed to the terminal reduce regardless, and
//! [`Collapsed::converged`] records which exit was taken.

use crate::{batcher, reducer, Completer, Result, Summary, TokenBudget, TokenMeter};

/// Outcome of a collapse run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collapsed {
    /// The reduced summary set, in input order.
    pub summaries: Vec<Summary>,
    /// How many pack-and-reduce rounds ran.
    pub rounds: usize,
    /// Whether the set fits the budget (`false` means the iteration cap
    /// was exhausted and the set is best effort).
    pub converged: bool,
}

/// Repeatedly batch and reduce `summaries` until their combined token
/// count fits `budget` or `max_iterations` rounds have elapsed.
///
/// Terminates within `max_iterations + 1` rounds for any input. All
/// reduce requests within one round run as a single concurrent wave;
/// results keep input order.
///
/// # Errors
///
/// Returns [`Error::Service`](crate::Error::Service) when any token-count
/// or completion call fails; the failing round is abandoned whole.
pub async fn collapse<S>(
    summaries: Vec<Summary>,
    budget: TokenBudget,
    max_iterations: usize,
    service: &S,
) -> Result<Collapsed>
where
    S: TokenMeter + Completer + ?Sized,
{
    let mut current = summaries;

    let total = batcher::total_tokens(&current, service).await?;
    if !budget.exceeded_by(total) {
        return Ok(Collapsed {
            summaries: current,
            rounds: 0,
            converged: true,
        });
    }

    for iteration in 0.. {
        let batches = batcher::pack(&current, budget, service).await?;
        let wave = batches.iter().map(|batch| reducer::reduce(batch, service));
        current = futures::future::try_join_all(wave).await?;

        let total = batcher::total_tokens(&current, service).await?;
        tracing::debug!(
            iteration,
            summaries = current.len(),
            total_tokens = total,
            "collapse round finished"
        );

        if !budget.exceeded_by(total) {
            return Ok(Collapsed {
                summaries: current,
                rounds: iteration + 1,
                converged: true,
            });
        }

        if iteration >= max_iterations {
            tracing::warn!(
                total_tokens = total,
                budget = %budget,
                rounds = iteration + 1,
                "collapse iterations exhausted; passing best-effort set onward"
            );
            return Ok(Collapsed {
                summaries: current,
                rounds: iteration + 1,
                converged: false,
            });
        }
    }

    unreachable!("collapse loop exits via fit or iteration cap");
}
