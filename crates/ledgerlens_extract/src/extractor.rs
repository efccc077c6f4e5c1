//! The draft extractor
//!
//! Stateless per call: the provider client is injected, the reference
//! lists arrive fresh with every request and are never cached or mutated.
//! One inference round trip per invocation, no retries - a caller that
//! wants resilience re-invokes the whole pipeline.

use crate::error::{ExtractError, Result};
use crate::image::ImagePayload;
use crate::{normalize, prompt, response};
use ledgerlens_schema::{DraftExpense, ReferenceAccount, ReferenceCategory};
use ledgerlens_vision::{VisionConfig, VisionProvider, DEFAULT_MODEL};
use serde_json::Value;
use std::sync::Arc;

/// Default amount ceiling: drafts above this many whole currency units
/// are almost certainly misreads, so the value is nulled and warned.
pub const DEFAULT_AMOUNT_CEILING: i64 = 500_000;

/// How much of the model's unparseable text is kept for diagnosis.
const MALFORMED_PREFIX_CHARS: usize = 300;

/// Tunables for one extractor instance.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Model identifier passed to the provider
    pub model: String,
    /// Token budget for the model's answer
    pub max_tokens: u32,
    /// Inclusive upper bound for `amount`, in whole currency units
    pub amount_ceiling: i64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            amount_ceiling: DEFAULT_AMOUNT_CEILING,
        }
    }
}

/// Runs the receipt-to-draft pipeline against an injected provider.
pub struct DraftExtractor {
    provider: Arc<dyn VisionProvider>,
    options: ExtractOptions,
}

impl DraftExtractor {
    /// Create an extractor with default options
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self::with_options(provider, ExtractOptions::default())
    }

    /// Create an extractor with explicit options
    pub fn with_options(provider: Arc<dyn VisionProvider>, options: ExtractOptions) -> Self {
        Self { provider, options }
    }

    /// Extract a best-effort draft from a receipt image.
    ///
    /// `image_data_url` must be a base64 image data URL; `categories` and
    /// `accounts` are the only ids the returned draft may reference.
    pub async fn extract(
        &self,
        image_data_url: &str,
        categories: &[ReferenceCategory],
        accounts: &[ReferenceAccount],
    ) -> Result<DraftExpense> {
        let image = ImagePayload::from_data_url(image_data_url)?;

        tracing::debug!(
            media_type = %image.media_type,
            categories = categories.len(),
            accounts = accounts.len(),
            "starting draft extraction"
        );

        let message = prompt::build_user_message(&image, categories, accounts);
        let config = VisionConfig::with_model(&self.options.model)
            .system(prompt::SYSTEM_PROMPT)
            .max_tokens(self.options.max_tokens);

        let body = self.provider.complete(&[message], Some(&config)).await?;
        let text = response::extract_text(&body)?;

        let raw: Value = serde_json::from_str(&text).map_err(|_| {
            let prefix = truncate_chars(&text, MALFORMED_PREFIX_CHARS);
            // Not fatal from the pipeline's point of view; the caller gets
            // the prefix back for debugging
            tracing::warn!(prefix = %prefix, "model output was not valid JSON");
            ExtractError::MalformedJson { prefix }
        })?;

        let draft = normalize::normalize_draft(
            &raw,
            categories,
            accounts,
            self.options.amount_ceiling,
        )?;

        tracing::info!(
            confidence = %draft.confidence,
            warnings = draft.warnings.len(),
            has_amount = draft.amount.is_some(),
            has_date = draft.expense_date.is_some(),
            "draft extraction complete"
        );

        Ok(draft)
    }
}

/// Truncate on a char boundary, at most `max` characters.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
