//! Caller-supplied reference lists
//!
//! These are the sole source of valid foreign keys for a single extraction
//! call. They arrive fresh on every request and are never cached by the
//! service - there is no coherency concern because there is no copy.

use serde::{Deserialize, Serialize};

/// An expense category the caller already owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCategory {
    /// Opaque id as stored by the caller's data layer
    pub id: String,
    /// Display name shown to the model alongside the id
    pub name: String,
}

/// A payment account the caller already owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceAccount {
    /// Opaque id as stored by the caller's data layer
    pub id: String,
    /// Display name shown to the model alongside the id
    pub name: String,
    /// Account kind, e.g. "checking" or "credit_card" (wire name `type`)
    #[serde(rename = "type")]
    pub kind: String,
}

impl ReferenceCategory {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl ReferenceAccount {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_kind_serializes_as_type() {
        let account = ReferenceAccount::new("acc-1", "Everyday Checking", "checking");
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["type"], "checking");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_account_deserializes_from_type() {
        let account: ReferenceAccount =
            serde_json::from_str(r#"{"id":"acc-2","name":"Visa","type":"credit_card"}"#).unwrap();
        assert_eq!(account.kind, "credit_card");
    }
}
