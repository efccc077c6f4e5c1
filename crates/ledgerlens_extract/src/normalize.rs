//! Normalization and referential guardrails
//!
//! The model's parsed JSON is walked field by field through a fixed
//! pipeline. Each step yields a [`Checked`] value: present-and-valid,
//! present-but-rejected (null it and warn), or simply missing (null it
//! silently). Running the pipeline over an already-normalized draft is a
//! no-op: valid values stay valid and nulls stay silent, so no new
//! warnings appear and the confidence cannot move.
//!
//! The referential guardrail runs last and is independent of anything the
//! model claims about itself: an id outside the caller-supplied set is
//! nulled, a fixed warning is appended, and confidence is forced to low.
//! The returned draft therefore can never reference a foreign key the
//! caller did not offer in this same request.

use crate::error::{ExtractError, Result};
use ledgerlens_schema::{Confidence, DraftExpense, ReferenceAccount, ReferenceCategory};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Fixed warning texts for the referential guardrail.
pub const WARN_CATEGORY_NOT_ALLOWED: &str = "suggested category not in allowed list";
pub const WARN_ACCOUNT_NOT_ALLOWED: &str = "suggested account not in allowed list";

static DATE_YYYY_MM_DD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Outcome of one per-field sanitization step.
#[derive(Debug, PartialEq)]
enum Checked<T> {
    /// Present and inside the invariant
    Valid(T),
    /// Present but outside the invariant: null it and warn
    Rejected(String),
    /// Absent or null: null it silently
    Missing,
}

/// Amount: numeric, finite, non-negative, at most `ceiling`; rounded to
/// the nearest whole currency unit.
fn check_amount(value: Option<&Value>, ceiling: i64) -> Checked<i64> {
    let value = match value {
        None | Some(Value::Null) => return Checked::Missing,
        Some(v) => v,
    };

    let n = match value.as_f64() {
        Some(n) => n,
        None => return Checked::Rejected("amount is not a number".to_string()),
    };

    if !n.is_finite() {
        Checked::Rejected("amount is not a finite number".to_string())
    } else if n < 0.0 {
        Checked::Rejected("amount is negative".to_string())
    } else if n > ceiling as f64 {
        Checked::Rejected(format!("amount exceeds the ceiling of {ceiling}"))
    } else {
        Checked::Valid(n.round() as i64)
    }
}

/// Date: a string strictly matching `YYYY-MM-DD`. Pattern-level only, no
/// calendar validation.
fn check_date(value: Option<&Value>) -> Checked<String> {
    let value = match value {
        None | Some(Value::Null) => return Checked::Missing,
        Some(v) => v,
    };

    match value.as_str() {
        Some(s) if DATE_YYYY_MM_DD.is_match(s) => Checked::Valid(s.to_string()),
        _ => Checked::Rejected("expense_date is not in YYYY-MM-DD format".to_string()),
    }
}

/// Description: a non-empty-after-trim string, or null. Rejections here
/// are silent - an unreadable merchant name is not worth a warning.
fn check_description(value: Option<&Value>) -> Option<String> {
    let trimmed = value.and_then(Value::as_str).map(str::trim)?;
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Model-supplied warnings: accepted only when an ordered list; each
/// element coerced to a string. Anything else is ignored.
fn model_warnings(value: Option<&Value>) -> Vec<String> {
    match value.and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        None => Vec::new(),
    }
}

/// Referential guardrail for one id field: null unless the id is a string
/// the caller explicitly offered.
fn check_reference_id(
    value: Option<&Value>,
    allowed: &HashSet<&str>,
    warning: &str,
) -> Checked<String> {
    let value = match value {
        None | Some(Value::Null) => return Checked::Missing,
        Some(v) => v,
    };

    match value.as_str() {
        Some(id) if allowed.contains(id) => Checked::Valid(id.to_string()),
        // A non-string id cannot be in the allowed set either
        _ => Checked::Rejected(warning.to_string()),
    }
}

/// Normalize the model's parsed JSON into a safe [`DraftExpense`].
///
/// Applies the fixed pipeline: amount, date, description, confidence,
/// model warnings, then the referential guardrails. Warnings the model
/// reported come first, warnings generated here are appended after, and
/// confidence only ever moves down.
pub fn normalize_draft(
    raw: &Value,
    categories: &[ReferenceCategory],
    accounts: &[ReferenceAccount],
    amount_ceiling: i64,
) -> Result<DraftExpense> {
    let obj = raw.as_object().ok_or(ExtractError::InvalidDraftShape)?;

    let mut draft = DraftExpense::default();
    let mut generated: Vec<String> = Vec::new();

    match check_amount(obj.get("amount"), amount_ceiling) {
        Checked::Valid(amount) => draft.amount = Some(amount),
        Checked::Rejected(warning) => generated.push(warning),
        Checked::Missing => {}
    }

    match check_date(obj.get("expense_date")) {
        Checked::Valid(date) => draft.expense_date = Some(date),
        Checked::Rejected(warning) => generated.push(warning),
        Checked::Missing => {}
    }

    draft.description = check_description(obj.get("description"));
    draft.confidence = Confidence::from_model_value(obj.get("confidence"));

    let reported = model_warnings(obj.get("warnings"));

    let category_ids: HashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();
    match check_reference_id(
        obj.get("category_id"),
        &category_ids,
        WARN_CATEGORY_NOT_ALLOWED,
    ) {
        Checked::Valid(id) => draft.category_id = Some(id),
        Checked::Rejected(warning) => {
            generated.push(warning);
            draft.lower_to(Confidence::Low);
        }
        Checked::Missing => {}
    }

    let account_ids: HashSet<&str> = accounts.iter().map(|a| a.id.as_str()).collect();
    match check_reference_id(obj.get("account_id"), &account_ids, WARN_ACCOUNT_NOT_ALLOWED) {
        Checked::Valid(id) => draft.account_id = Some(id),
        Checked::Rejected(warning) => {
            generated.push(warning);
            draft.lower_to(Confidence::Low);
        }
        Checked::Missing => {}
    }

    draft.warnings = reported;
    draft.warnings.extend(generated);

    Ok(draft)
}
