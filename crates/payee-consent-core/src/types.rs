//! # Consent Domain Records
//!
//! Wire-level records shared by the HTTP clients and the API layer. All
//! records use camelCase JSON to match the privacy engine.
//!
//! Engine-produced records carry a flattened `extra` map so that fields
//! this crate does not model (display hints, localisation keys, engine
//! bookkeeping) travel through the signed consent token and back to the
//! engine untouched. `serde(deny_unknown_fields)` is intentionally NOT used.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Access type id the privacy engine uses when no specific operation applies.
pub const DEFAULT_ACCESS_TYPE: &str = "default";

/// One requested data access, supplied by the banking application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessItem {
    pub purpose_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_value: Option<String>,
}

impl AccessItem {
    /// Validate a batch of caller-supplied items.
    pub fn validate_all(items: &[AccessItem]) -> Result<(), ValidationError> {
        if items.is_empty() {
            return Err(ValidationError::NoItems);
        }
        for (index, item) in items.iter().enumerate() {
            if item.purpose_id.trim().is_empty() {
                return Err(ValidationError::EmptyPurpose { index });
            }
        }
        Ok(())
    }
}

/// Overall decision returned by the privacy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    /// Every requested item is permitted.
    Approved,
    /// Every requested item is refused.
    Denied,
    /// Some items are permitted and some refused.
    Multistatus,
    /// At least one item needs an explicit user decision.
    Consent,
    /// The engine could not reach a decision.
    Error,
    /// Forward-compatible catch-all for statuses added after this build.
    #[serde(other)]
    Unknown,
}

impl DecisionStatus {
    /// Return the wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Denied => "denied",
            Self::Multistatus => "multistatus",
            Self::Consent => "consent",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of assessing a batch of access items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub status: DecisionStatus,
    #[serde(default)]
    pub assessment: Vec<AssessmentRecord>,
    /// Engine diagnostics, present when `status` is `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// Assessment of one requested purpose/attribute pair.
///
/// A record covering an attribute group may omit `attributeId` and
/// `attributeValue`; the per-attribute values then live on each
/// [`ItemResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub purpose_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_value: Option<String>,
    #[serde(default)]
    pub result: Vec<ItemResult>,
}

/// Per-attribute outcome within an [`AssessmentRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResult {
    #[serde(default)]
    pub requires_consent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_value: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Display metadata for the items that require consent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsentMetadata {
    #[serde(default)]
    pub default: Vec<ConsentMetadataRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Human-facing description of one consentable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentMetadataRecord {
    pub purpose_id: String,
    pub purpose_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_type_id: Option<String>,
    /// Display name of the access type (e.g. "read").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_value: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A user's decision on one consentable item, forwarded to the engine
/// for storage.
///
/// The record is passed through untouched: the engine owns its shape, so
/// only read accessors are offered for the fields the broker logs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsentDecision(pub Map<String, Value>);

impl ConsentDecision {
    pub fn purpose_id(&self) -> Option<&str> {
        self.0.get("purposeId").and_then(Value::as_str)
    }

    /// Engine consent state (1 = allow, 2 = deny, 3 = opt-in, 4 = opt-out).
    pub fn state(&self) -> Option<&Value> {
        self.0.get("state")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(purpose: &str) -> AccessItem {
        AccessItem {
            purpose_id: purpose.to_string(),
            attribute_id: None,
            access_type_id: None,
            attribute_value: None,
        }
    }

    #[test]
    fn decision_status_parses_known_values() {
        for (raw, expected) in [
            ("approved", DecisionStatus::Approved),
            ("denied", DecisionStatus::Denied),
            ("multistatus", DecisionStatus::Multistatus),
            ("consent", DecisionStatus::Consent),
            ("error", DecisionStatus::Error),
        ] {
            let parsed: DecisionStatus = serde_json::from_value(json!(raw)).unwrap();
            assert_eq!(parsed, expected);
            assert_eq!(parsed.as_str(), raw);
        }
    }

    #[test]
    fn decision_status_unknown_value_is_caught() {
        let parsed: DecisionStatus = serde_json::from_value(json!("pending-review")).unwrap();
        assert_eq!(parsed, DecisionStatus::Unknown);
    }

    #[test]
    fn access_item_omits_absent_fields() {
        let json = serde_json::to_value(item("marketing")).unwrap();
        assert_eq!(json, json!({"purposeId": "marketing"}));
    }

    #[test]
    fn validate_rejects_empty_batch() {
        assert_eq!(AccessItem::validate_all(&[]), Err(ValidationError::NoItems));
    }

    #[test]
    fn validate_reports_index_of_blank_purpose() {
        let items = vec![item("payments"), item("  ")];
        assert_eq!(
            AccessItem::validate_all(&items),
            Err(ValidationError::EmptyPurpose { index: 1 })
        );
    }

    #[test]
    fn validate_accepts_well_formed_batch() {
        assert!(AccessItem::validate_all(&[item("payments")]).is_ok());
    }

    #[test]
    fn metadata_record_keeps_unmodelled_fields() {
        let raw = json!({
            "purposeId": "p1",
            "purposeName": "Payments",
            "accessTypeId": "default",
            "version": 3,
            "termsOfUse": {"url": "https://bank.example/terms"}
        });
        let record: ConsentMetadataRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.extra["version"], json!(3));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn consent_decision_passes_any_record_through() {
        let raw = json!({"attributeId": "no-purpose", "state": 300, "note": ["x"]});
        let decision: ConsentDecision = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(decision.purpose_id(), None);
        assert_eq!(decision.state(), Some(&json!(300)));
        assert_eq!(serde_json::to_value(&decision).unwrap(), raw);
    }

    #[test]
    fn assessment_tolerates_missing_result_lists() {
        let raw = json!({
            "status": "approved",
            "assessment": [{"purposeId": "p1", "accessTypeId": "read"}]
        });
        let assessment: Assessment = serde_json::from_value(raw).unwrap();
        assert_eq!(assessment.status, DecisionStatus::Approved);
        assert!(assessment.assessment[0].result.is_empty());
    }
}
