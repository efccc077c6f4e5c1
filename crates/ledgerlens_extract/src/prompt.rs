//! Prompt construction
//!
//! The system instruction pins down the output contract; the user turn
//! carries the two reference lists (ids and display names only) plus the
//! embedded image. Nothing else from the caller's data model leaks into
//! the prompt.

use crate::image::ImagePayload;
use ledgerlens_schema::{ReferenceAccount, ReferenceCategory};
use ledgerlens_vision::{ContentBlock, Message};
use serde_json::{json, Value};

/// System instruction for the extraction call.
///
/// Confidence "high" is only allowed when both amount and date are
/// unambiguous, and the model is told to prefer null plus a warning over
/// guessing - the normalizer enforces the same rules afterwards anyway.
pub const SYSTEM_PROMPT: &str = r#"You are a receipt extraction engine for an expense tracker.

Reply with a single JSON object and nothing else: no prose, no markdown fences, no commentary before or after.

The object has exactly these fields:
- "amount": number or null. The total paid. If several monetary amounts are visible, use the final payable grand total (after tax and tip), not a subtotal or line item.
- "expense_date": string or null. The purchase date, formatted exactly as YYYY-MM-DD.
- "description": string or null. A short human-readable label, typically the merchant name.
- "category_id": string or null. An id chosen from the provided category list, or null.
- "account_id": string or null. An id chosen from the provided account list, or null.
- "confidence": "high", "medium" or "low". Use "high" only when both the amount and the date are unambiguous.
- "warnings": array of strings. Note anything unclear, cut off, or assumed.

Rules:
- Choose category_id and account_id ONLY from the ids in the provided lists. Never invent an id. If nothing fits, return null and add a warning instead of guessing.
- If a value cannot be read from the receipt, return null for it rather than inventing one."#;

/// Build the user turn: reference lists as compact JSON, the task
/// instruction, and the embedded image.
pub fn build_user_message(
    image: &ImagePayload,
    categories: &[ReferenceCategory],
    accounts: &[ReferenceAccount],
) -> Message {
    // Value's Display is infallible, unlike serializing to a string
    let category_list = Value::from(
        categories
            .iter()
            .map(|c| json!({"id": c.id, "name": c.name}))
            .collect::<Vec<_>>(),
    );
    let account_list = Value::from(
        accounts
            .iter()
            .map(|a| json!({"id": a.id, "name": a.name, "type": a.kind}))
            .collect::<Vec<_>>(),
    );

    let instruction = format!(
        "Valid categories (choose category_id from these ids only):\n{category_list}\n\n\
         Valid accounts (choose account_id from these ids only):\n{account_list}\n\n\
         Extract the expense from the attached receipt photo and reply with the JSON object described in your instructions."
    );

    Message::user_with_content(vec![
        ContentBlock::text(instruction),
        ContentBlock::image(image.media_type.clone(), image.data.clone()),
    ])
}
