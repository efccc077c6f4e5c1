//! The draft expense proposed by the extraction pipeline
//!
//! A [`DraftExpense`] is untrusted-model-output after it has been through
//! normalization: every field is either null or provably inside its
//! invariant. The confidence rating only ever moves down during that pass,
//! so `lower_to` is the only mutator exposed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Coarse three-level reliability self-assessment of a draft.
///
/// Defaults to [`Confidence::Low`] on any ambiguity, and is monotonically
/// only-decreasing through the normalization pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Amount and date both unambiguous
    High,
    /// Readable but with some ambiguity
    Medium,
    /// Anything else, including an unrecognized model claim
    #[default]
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

impl Confidence {
    /// Interpret a raw model-supplied value. Only the three exact string
    /// literals are accepted; everything else (wrong type, absence, any
    /// other spelling) is [`Confidence::Low`].
    pub fn from_model_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("high") => Confidence::High,
            Some("medium") => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

/// A provisional, unpersisted expense record proposed by extraction.
///
/// Requires explicit user confirmation before anything is stored; this
/// service never writes it anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftExpense {
    /// Whole currency units, `0 <= amount <= ceiling`, or null
    pub amount: Option<i64>,
    /// `YYYY-MM-DD` or null
    pub expense_date: Option<String>,
    /// Trimmed non-empty string or null
    pub description: Option<String>,
    /// Member of the request's category id set, or null
    pub category_id: Option<String>,
    /// Member of the request's account id set, or null
    pub account_id: Option<String>,
    /// Never blank; defaults to low
    pub confidence: Confidence,
    /// Model-reported warnings first, then guardrail warnings
    pub warnings: Vec<String>,
}

impl Default for DraftExpense {
    fn default() -> Self {
        Self {
            amount: None,
            expense_date: None,
            description: None,
            category_id: None,
            account_id: None,
            confidence: Confidence::Low,
            warnings: Vec::new(),
        }
    }
}

impl DraftExpense {
    /// Lower the confidence to `floor` if it is currently higher.
    ///
    /// Confidence never increases during normalization; this is the only
    /// way the pipeline touches it after the initial read.
    pub fn lower_to(&mut self, floor: Confidence) {
        // Ord derives High < Medium < Low in declaration order
        if self.confidence < floor {
            self.confidence = floor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_confidence_serialization() {
        assert_eq!(serde_json::to_string(&Confidence::High).unwrap(), "\"high\"");
        assert_eq!(
            serde_json::to_string(&Confidence::Medium).unwrap(),
            "\"medium\""
        );
        assert_eq!(serde_json::to_string(&Confidence::Low).unwrap(), "\"low\"");
    }

    #[test]
    fn test_confidence_from_model_value() {
        assert_eq!(
            Confidence::from_model_value(Some(&json!("high"))),
            Confidence::High
        );
        assert_eq!(
            Confidence::from_model_value(Some(&json!("medium"))),
            Confidence::Medium
        );
        assert_eq!(
            Confidence::from_model_value(Some(&json!("low"))),
            Confidence::Low
        );
        // Anything else collapses to low
        assert_eq!(
            Confidence::from_model_value(Some(&json!("HIGH"))),
            Confidence::Low
        );
        assert_eq!(
            Confidence::from_model_value(Some(&json!(0.9))),
            Confidence::Low
        );
        assert_eq!(Confidence::from_model_value(None), Confidence::Low);
    }

    #[test]
    fn test_lower_to_never_raises() {
        let mut draft = DraftExpense {
            confidence: Confidence::High,
            ..Default::default()
        };
        draft.lower_to(Confidence::Low);
        assert_eq!(draft.confidence, Confidence::Low);

        // Already low stays low
        draft.lower_to(Confidence::High);
        assert_eq!(draft.confidence, Confidence::Low);

        let mut medium = DraftExpense {
            confidence: Confidence::Medium,
            ..Default::default()
        };
        medium.lower_to(Confidence::Medium);
        assert_eq!(medium.confidence, Confidence::Medium);
    }

    #[test]
    fn test_draft_wire_shape() {
        let draft = DraftExpense {
            amount: Some(450),
            expense_date: Some("2024-01-15".to_string()),
            description: Some("Coffee".to_string()),
            category_id: None,
            account_id: None,
            confidence: Confidence::Medium,
            warnings: vec!["blurry total".to_string()],
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["amount"], 450);
        assert_eq!(json["expense_date"], "2024-01-15");
        assert_eq!(json["confidence"], "medium");
        assert!(json["category_id"].is_null());
        assert_eq!(json["warnings"][0], "blurry total");
    }
}
