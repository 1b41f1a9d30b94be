//! Prompt templates for the map and reduce phases.
//!
//! Templates are pure functions `(fields) -> String`, unit-testable
//! without touching the completion service. The wording follows the
//! classic map-reduce summarization recipe: an extraction-oriented map
//! prompt per chunk, and a consolidation-oriented reduce prompt per batch.

/// Build the map-phase prompt for one chunk.
///
/// The source title is cited when the chunker tracked one; untitled
/// content gets the same prompt without the attribution line.
#[must_use]
pub fn map_prompt(title: &str, content: &str) -> String {
    let attribution = if title.trim().is_empty() {
        String::new()
    } else {
        format!("Document Title: {}\n", title.trim())
    };

    format!(
        "You are an expert content analyzer. Your task is to extract and \
         summarize the key information from the following document.\n\
         \n\
         Please analyze the content and provide:\n\
         1. Main topics and themes\n\
         2. Key insights and takeaways\n\
         3. Important facts, statistics, or examples\n\
         4. Core concepts or ideas presented\n\
         \n\
         Format your summary in the bullet points format.\n\
         \n\
         Summary should be brief and to the point.\n\
         \n\
         {attribution}Document Content: {content}\n\
         \n\
         Provide a concise but comprehensive summary that captures the \
         essential information from this document. Focus on the most \
         valuable and actionable content."
    )
}

/// Build the reduce-phase prompt over summaries already joined with a
/// paragraph separator.
#[must_use]
pub fn reduce_prompt(summaries: &str) -> String {
    format!(
        "The following is a set of summaries:\n\
         {summaries}\n\
         Take these and create one summary as a whole context gathered \
         from the summaries.\n\
         \n\
         Keep it concise and focused on the main points, avoiding \
         unnecessary details. The goal is to distill the essence of the \
         summaries into a single, coherent summary."
    )
}

/// Build the structured map-phase prompt, asking for a JSON object with
/// `title` and `summary` fields.
///
/// The response is validated against [`MapSummary`](crate::MapSummary)
/// at the service boundary.
#[must_use]
pub fn map_structured_prompt(title: &str, content: &str) -> String {
    format!(
        "{base}\n\
         \n\
         Respond with a single JSON object of the form \
         {{\"title\": \"...\", \"summary\": \"...\"}} where `title` echoes \
         the document title and `summary` is your bullet-point summary. \
         Output only the JSON object, with no surrounding text.",
        base = map_prompt(title, content)
    )
}
