//! Response-shape extraction
//!
//! Providers answer in one of two known shapes: a flattened final-text
//! field, or a sequence of typed content blocks. Both are modeled as an
//! explicit sum type and matched exhaustively; any third shape is
//! [`ExtractError::EmptyModelOutput`], which names only the top-level
//! fields actually received - never the payload contents.

use crate::error::{ExtractError, Result};
use serde::Deserialize;
use serde_json::Value;

/// The two response shapes we know how to read.
#[derive(Debug, PartialEq)]
enum ResponseShape {
    /// Top-level flattened text field, e.g. `{"output_text": "..."}`
    Flattened(String),
    /// Typed content blocks, e.g. `{"content": [{"type":"text",...}]}`
    Blocks(Vec<OutputBlock>),
}

/// A single block inside the block-shaped response. Unknown kinds are
/// kept (as [`OutputBlock::Other`]) so one tool-use block in an otherwise
/// readable answer does not sink the call.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputBlock {
    Text { text: String },
    SummaryText { text: String },
    #[serde(other)]
    Other,
}

impl OutputBlock {
    fn readable_text(&self) -> Option<&str> {
        match self {
            OutputBlock::Text { text } | OutputBlock::SummaryText { text } => Some(text),
            OutputBlock::Other => None,
        }
    }
}

/// Classify a raw response body into one of the known shapes.
///
/// The flattened field wins only when present and non-empty after trim;
/// otherwise the block array is tried. `None` means neither shape fits.
fn classify(body: &Value) -> Option<ResponseShape> {
    if let Some(text) = body.get("output_text").and_then(Value::as_str) {
        if !text.trim().is_empty() {
            return Some(ResponseShape::Flattened(text.to_string()));
        }
    }

    if let Some(content) = body.get("content") {
        if let Ok(blocks) = serde_json::from_value::<Vec<OutputBlock>>(content.clone()) {
            return Some(ResponseShape::Blocks(blocks));
        }
    }

    None
}

/// Locate the readable text in a provider response.
///
/// Block-shaped answers concatenate every plain-text or summary-text
/// block, each trimmed, joined by newlines. An unreadable or unknown
/// shape fails with the response's top-level field names for diagnosis.
pub fn extract_text(body: &Value) -> Result<String> {
    match classify(body) {
        Some(ResponseShape::Flattened(text)) => Ok(text.trim().to_string()),
        Some(ResponseShape::Blocks(blocks)) => {
            let text = blocks
                .iter()
                .filter_map(OutputBlock::readable_text)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n");

            if text.is_empty() {
                Err(empty_output(body))
            } else {
                Ok(text)
            }
        }
        None => Err(empty_output(body)),
    }
}

fn empty_output(body: &Value) -> ExtractError {
    let mut fields: Vec<String> = match body.as_object() {
        Some(map) => map.keys().cloned().collect(),
        None => vec!["<non-object response>".to_string()],
    };
    fields.sort();
    ExtractError::EmptyModelOutput { fields }
}
