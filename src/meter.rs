//! Offline token estimation.
//!
//! Real token counts come from the service's own tokenizer through
//! [`TokenMeter`]. For tests, demos, and rough budget planning you often
//! want a meter that needs no network at all. The classic approximation
//! for English prose and BPE tokenizers is ~4 characters per token.
//!
//! The estimate is deliberately crude. It under-counts dense code and
//! over-counts whitespace-heavy text; anything that must respect a real
//! service limit should measure through the service.

use async_trait::async_trait;

use crate::{Result, TokenMeter};

const CHARS_PER_TOKEN: usize = 4;

/// Character-count-based token estimator (~4 chars/token, rounded up).
///
/// # Examples
///
/// ```rust
/// use distill::{HeuristicMeter, TokenMeter};
///
/// let meter = HeuristicMeter::default();
/// let count = futures::executor::block_on(meter.count_tokens("hello world"));
/// assert_eq!(count.unwrap(), 3); // 11 chars / 4, rounded up
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMeter;

impl HeuristicMeter {
    /// Estimate the token count of `text` synchronously.
    #[must_use]
    pub fn estimate(text: &str) -> usize {
        text.len().div_ceil(CHARS_PER_TOKEN)
    }
}

#[async_trait]
impl TokenMeter for HeuristicMeter {
    async fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(Self::estimate(text))
    }
}
