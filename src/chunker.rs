//! Document chunking under a token budget.
//!
//! ## The Algorithm
//!
//! Split at decreasing granularity, stopping as soon as every piece fits
//! the map budget:
//!
//! ```text
//! 1. Whole document fits? -> one chunk, done
//! 2. Split on "\n\n" (paragraphs), greedily merging adjacent
//!    paragraphs that fit together
//! 3. Any piece over budget? Split that piece on sentence bounds
//!    (UAX #29), merging adjacent sentences that fit together
//! 4. Still over budget? Cut fixed token windows at char boundaries
//! ```
//!
//! Each level preserves order and never reorders text. A paragraph
//! boundary is better than a sentence boundary, which is better than an
//! arbitrary window; the pipeline only descends when it must.
//!
//! ## Why Sentence Detection Is the Hard Part
//!
//! "Dr. Smith went to Washington D.C. on Jan. 15th." has one sentence,
//! not four. Sentence bounds come from Unicode Standard Annex #29, which
//! handles abbreviations, decimal numbers, ellipses, and URLs.
//!
//! ## Token Windows
//!
//! The service only *counts* tokens; it does not expose the token stream.
//! The window level therefore estimates bytes-per-token from the whole
//! piece, cuts a window at that estimate (floored to a char boundary),
//! and shrinks by halving until the window fits. A single character that
//! still exceeds the budget is emitted as-is and flagged: callers treat
//! over-budget chunks as a tolerated exception, not a failure.

use unicode_segmentation::UnicodeSegmentation;

use crate::{Chunk, Document, Result, TokenBudget, TokenMeter};

/// Splits documents into ordered, token-bounded chunks.
///
/// No side effects besides token-count queries against the meter.
///
/// ## Example
///
/// ```rust,ignore
/// use distill::DocumentChunker;
///
/// let chunker = DocumentChunker::new(500);
/// let chunks = chunker.split(&document, 0, &meter).await?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DocumentChunker {
    budget: TokenBudget,
}

impl DocumentChunker {
    /// Create a chunker with the given map-phase budget.
    #[must_use]
    pub fn new(budget: impl Into<TokenBudget>) -> Self {
        Self {
            budget: budget.into(),
        }
    }

    /// The map-phase budget this chunker enforces.
    #[must_use]
    pub const fn budget(&self) -> TokenBudget {
        self.budget
    }

    /// Split one document into ordered chunks.
    ///
    /// Whitespace-only documents produce no chunks. A document that fits
    /// the budget whole is returned as a single chunk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Service`](crate::Error::Service) when a
    /// token-count query fails.
    pub async fn split<M>(
        &self,
        document: &Document,
        doc_index: usize,
        meter: &M,
    ) -> Result<Vec<Chunk>>
    where
        M: TokenMeter + ?Sized,
    {
        let text = document.content.trim();
        if text.is_empty() {
            return Ok(vec![]);
        }

        let total = meter.count_tokens(text).await?;
        if !self.budget.exceeded_by(total) {
            return Ok(vec![Chunk::new(text, &document.title, doc_index, 0)]);
        }

        let mut pieces: Vec<String> = Vec::new();
        let paragraphs: Vec<&str> = text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        for (paragraph, tokens) in self.coalesce(&paragraphs, "\n\n", meter).await? {
            if !self.budget.exceeded_by(tokens) {
                pieces.push(paragraph);
                continue;
            }

            // Paragraph level wasn't enough; descend to sentences.
            let sentences: Vec<&str> = paragraph.split_sentence_bounds().collect();
            for (sentence, tokens) in self.coalesce(&sentences, "", meter).await? {
                if !self.budget.exceeded_by(tokens) {
                    pieces.push(sentence);
                    continue;
                }
                pieces.extend(self.window_split(&sentence, meter).await?);
            }
        }

        tracing::debug!(
            doc_index,
            total_tokens = total,
            chunks = pieces.len(),
            "split document"
        );

        Ok(pieces
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .enumerate()
            .map(|(ordinal, piece)| Chunk::new(piece, &document.title, doc_index, ordinal))
            .collect())
    }

    /// Greedily merge consecutive parts into runs that fit the budget.
    ///
    /// Returns each run with its token count. A run that exceeds the
    /// budget is always a single indivisible part; callers descend a
    /// granularity level for those.
    async fn coalesce<M>(
        &self,
        parts: &[&str],
        sep: &str,
        meter: &M,
    ) -> Result<Vec<(String, usize)>>
    where
        M: TokenMeter + ?Sized,
    {
        let mut runs = Vec::new();
        let mut current = String::new();

        for part in parts {
            if part.trim().is_empty() {
                continue;
            }
            if current.is_empty() {
                current = (*part).to_string();
                continue;
            }

            // Counts are re-queried on the merged text, never summed from
            // stale per-part counts.
            let candidate = format!("{current}{sep}{part}");
            let tokens = meter.count_tokens(&candidate).await?;
            if self.budget.exceeded_by(tokens) {
                let closed = meter.count_tokens(&current).await?;
                runs.push((std::mem::take(&mut current), closed));
                current = (*part).to_string();
            } else {
                current = candidate;
            }
        }

        if !current.is_empty() {
            let tokens = meter.count_tokens(&current).await?;
            runs.push((current, tokens));
        }

        Ok(runs)
    }

    /// Last-resort split: fixed token windows cut at char boundaries.
    async fn window_split<M>(&self, text: &str, meter: &M) -> Result<Vec<String>>
    where
        M: TokenMeter + ?Sized,
    {
        let total = meter.count_tokens(text).await?;
        // Estimated bytes per token for this piece, at least 1.
        let ratio = (text.len() / total.max(1)).max(1);
        let target = self.budget.limit().saturating_mul(ratio);

        let mut windows = Vec::new();
        let mut rest = text;

        while !rest.is_empty() {
            let mut end = floor_char_boundary(rest, target.min(rest.len()));
            if end == 0 {
                end = rest.chars().next().map_or(rest.len(), char::len_utf8);
            }

            loop {
                let tokens = meter.count_tokens(&rest[..end]).await?;
                if !self.budget.exceeded_by(tokens) {
                    break;
                }
                let half = floor_char_boundary(rest, end / 2);
                if half == 0 {
                    // A single character over budget cannot be split
                    // further. Emit it oversized; the batcher isolates it.
                    tracing::warn!(
                        tokens,
                        budget = %self.budget,
                        "indivisible text exceeds map budget"
                    );
                    break;
                }
                end = half;
            }

            windows.push(rest[..end].to_string());
            rest = &rest[end..];
        }

        Ok(windows)
    }
}

/// Largest char boundary at or below `index`.
///
/// Replaces `str::floor_char_boundary` for MSRV < 1.80 compatibility.
fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
