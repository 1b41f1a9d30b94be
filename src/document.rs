//! Core data model: documents in, chunks and summaries through the pipeline.

use serde::{Deserialize, Serialize};

/// A scraped source document.
///
/// Produced by an upstream scraping collaborator and read-only to this
/// crate. `index` and `source` together disambiguate documents that came
/// from the same origin.
///
/// ```rust
/// use distill::Document;
///
/// let doc = Document::new("Intro to Rust", "Rust is a systems language.");
/// assert_eq!(doc.title, "Intro to Rust");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document title.
    pub title: String,
    /// Full body text.
    pub content: String,
    /// Canonical URL the document was scraped from.
    #[serde(default)]
    pub link: String,
    /// Publication date as reported by the source.
    #[serde(default)]
    pub date: String,
    /// Origin identifier (site or feed).
    #[serde(default)]
    pub source: String,
    /// CSS selector the scraper extracted the body with.
    #[serde(default)]
    pub selector: String,
    /// Position within the origin's post list.
    #[serde(default)]
    pub index: usize,
}

impl Document {
    /// Create a document from a title and body, leaving scraper metadata empty.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            link: String::new(),
            date: String::new(),
            source: String::new(),
            selector: String::new(),
            index: 0,
        }
    }
}

/// A token-bounded slice of one document's text.
///
/// `doc_index` is a non-owning back-reference into the input document
/// slice, retained only for traceability. `ordinal` preserves
/// within-document order; cross-document order is the input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk text.
    pub text: String,
    /// Title of the source document, carried so the map prompt can cite it.
    pub title: String,
    /// Index of the source document in the input slice.
    pub doc_index: usize,
    /// Zero-based position of this chunk within its document.
    pub ordinal: usize,
}

impl Chunk {
    /// Create a new chunk.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        title: impl Into<String>,
        doc_index: usize,
        ordinal: usize,
    ) -> Self {
        Self {
            text: text.into(),
            title: title.into(),
            doc_index,
            ordinal,
        }
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunk {{ doc: {}, ordinal: {}, len: {} }}",
            self.doc_index,
            self.ordinal,
            self.text.len()
        )
    }
}

/// Which phase produced a summary.
///
/// Observability only: no control flow depends on the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStage {
    /// Produced by the map phase, one per chunk.
    Partial,
    /// Produced by a collapse round or the final reduce.
    Collapsed,
}

/// A summary produced by the map or reduce phase.
///
/// Immutable once produced; consumed by the next batching/reducing round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// The summary text.
    pub text: String,
    /// Which phase produced this summary.
    pub stage: SummaryStage,
}

impl Summary {
    /// A map-phase summary.
    #[must_use]
    pub fn partial(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            stage: SummaryStage::Partial,
        }
    }

    /// A collapse- or reduce-phase summary.
    #[must_use]
    pub fn collapsed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            stage: SummaryStage::Collapsed,
        }
    }
}

/// Structured map-phase output: a title paired with its summary.
///
/// Validated eagerly at the service boundary; a response that does not
/// deserialize into this shape fails with
/// [`Error::MalformedResponse`](crate::Error::MalformedResponse).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSummary {
    /// Title of the summarized chunk's source document.
    pub title: String,
    /// The summary text.
    pub summary: String,
}
