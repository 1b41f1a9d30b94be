//! Token budget configuration.
//!
//! ## The Problem
//!
//! The completion service accepts inputs only up to a fixed token count,
//! measured by *its* tokenizer, not by bytes or characters. Every stage of
//! the pipeline therefore carries a ceiling:
//!
//! - The **map budget** caps how large a chunk may be before it is
//!   summarized.
//! - The **collapse budget** caps the combined size of a reduce batch, and
//!   decides when the collapse loop may stop.
//!
//! A budget is a ceiling, not a target. Staying under it is mandatory for
//! multi-item groups; a single semantically indivisible item (one enormous
//! sentence, one summary the model refused to shorten) is allowed through
//! oversized, flagged rather than rejected.
//!
//! ```text
//! budget = 1000
//!
//! [320] [410] [250]        -> one batch, 980 tokens, fits
//! [320] [410] [250] [90]   -> would be 1070: close the batch, start anew
//! [1400]                   -> alone in its batch, oversized, tolerated
//! ```

/// A scalar token ceiling.
///
/// # Examples
///
/// ```rust
/// use distill::TokenBudget;
///
/// let budget = TokenBudget::new(1000);
/// assert_eq!(budget.limit(), 1000);
/// assert!(!budget.would_overflow(600, 400));
/// assert!(budget.would_overflow(600, 401));
///
/// // From a bare count
/// let budget = TokenBudget::from(500);
/// assert!(budget.exceeded_by(501));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    limit: usize,
}

impl TokenBudget {
    /// Create a budget with the given token ceiling.
    ///
    /// # Panics
    ///
    /// Panics if `limit == 0`.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        assert!(limit > 0, "token budget must be > 0");
        Self { limit }
    }

    /// The token ceiling.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Whether `size` alone exceeds this budget.
    #[must_use]
    pub const fn exceeded_by(&self, size: usize) -> bool {
        size > self.limit
    }

    /// Whether adding `additional` tokens to `current` would exceed the budget.
    ///
    /// Useful for incremental group building.
    #[must_use]
    pub fn would_overflow(&self, current: usize, additional: usize) -> bool {
        current.saturating_add(additional) > self.limit
    }
}

impl Default for TokenBudget {
    fn default() -> Self {
        // Matches the reference collapse budget; see SummarizeConfig.
        Self::new(1000)
    }
}

impl From<usize> for TokenBudget {
    fn from(limit: usize) -> Self {
        Self::new(limit)
    }
}

impl std::fmt::Display for TokenBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} tokens", self.limit)
    }
}
