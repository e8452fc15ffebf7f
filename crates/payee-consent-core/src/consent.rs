//! # Consent Derivation
//!
//! Pure functions over engine records: narrowing an assessment to the
//! items needing a user decision, and rendering prompt text.

use crate::types::{AccessItem, Assessment, ConsentMetadataRecord, DEFAULT_ACCESS_TYPE};

/// Collect the access items that require explicit consent.
///
/// Each item result flagged `requiresConsent` yields one item. The
/// attribute id and value come from the enclosing assessment record when
/// it carries them, otherwise from the item result itself. Output order
/// follows the assessment.
pub fn consent_required_items(assessment: &Assessment) -> Vec<AccessItem> {
    let mut items = Vec::new();
    for record in &assessment.assessment {
        for result in &record.result {
            let attribute_id = non_empty(&record.attribute_id).or_else(|| result.attribute_id.clone());
            let attribute_value =
                non_empty(&record.attribute_value).or_else(|| result.attribute_value.clone());

            if !result.requires_consent {
                tracing::debug!(
                    purpose_id = %record.purpose_id,
                    attribute_id = ?attribute_id,
                    access_type_id = ?record.access_type_id,
                    "requires no consent"
                );
                continue;
            }

            tracing::debug!(
                purpose_id = %record.purpose_id,
                attribute_id = ?attribute_id,
                access_type_id = ?record.access_type_id,
                "requires consent"
            );
            items.push(AccessItem {
                purpose_id: record.purpose_id.clone(),
                attribute_id,
                access_type_id: record.access_type_id.clone(),
                attribute_value,
            });
        }
    }
    items
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Build the sentence shown to the user for one consentable item.
///
/// Shape: `Allow [<access type>] access [to my <attribute>] to <purpose>`.
/// The access type is omitted for the default access type, and the
/// attribute phrase is omitted when the record has no attribute.
pub fn build_consent_message(record: &ConsentMetadataRecord) -> String {
    let mut message = String::from("Allow");

    match record.access_type_id.as_deref() {
        Some(id) if id != DEFAULT_ACCESS_TYPE => {
            let access_type = record.access_type.as_deref().unwrap_or(id);
            message.push_str(&format!(" {access_type} access"));
        }
        _ => message.push_str(" access"),
    }

    if let Some(attribute_id) = record.attribute_id.as_deref() {
        let name = record.attribute_name.as_deref().unwrap_or(attribute_id);
        message.push_str(&format!(" to my {}", name.to_lowercase()));
    }

    message.push_str(&format!(" to {}", record.purpose_name.to_lowercase()));
    message
}

/// Synthetic id of a prompt record: purpose, attribute, access type and
/// attribute value concatenated. Absent parts contribute nothing.
pub fn consent_record_id(record: &ConsentMetadataRecord) -> String {
    [
        Some(record.purpose_id.as_str()),
        record.attribute_id.as_deref(),
        record.access_type_id.as_deref(),
        record.attribute_value.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssessmentRecord, DecisionStatus, ItemResult};
    use serde_json::Map;

    fn record(
        access_type_id: Option<&str>,
        access_type: Option<&str>,
        attribute_id: Option<&str>,
        attribute_name: Option<&str>,
        purpose_name: &str,
    ) -> ConsentMetadataRecord {
        ConsentMetadataRecord {
            purpose_id: "p1".to_string(),
            purpose_name: purpose_name.to_string(),
            attribute_id: attribute_id.map(str::to_string),
            attribute_name: attribute_name.map(str::to_string),
            access_type_id: access_type_id.map(str::to_string),
            access_type: access_type.map(str::to_string),
            attribute_value: None,
            extra: Map::new(),
        }
    }

    fn result(requires_consent: bool, attribute_id: Option<&str>) -> ItemResult {
        ItemResult {
            requires_consent,
            attribute_id: attribute_id.map(str::to_string),
            attribute_value: attribute_id.map(|a| format!("{a}-value")),
            extra: Map::new(),
        }
    }

    fn assessment_record(
        purpose: &str,
        attribute_id: Option<&str>,
        results: Vec<ItemResult>,
    ) -> AssessmentRecord {
        AssessmentRecord {
            purpose_id: purpose.to_string(),
            attribute_id: attribute_id.map(str::to_string),
            access_type_id: Some("read".to_string()),
            attribute_value: None,
            result: results,
        }
    }

    // -- build_consent_message ------------------------------------------------

    #[test]
    fn default_access_without_attribute() {
        let r = record(Some("default"), None, None, None, "Payments");
        assert_eq!(build_consent_message(&r), "Allow access to payments");
    }

    #[test]
    fn named_access_with_attribute() {
        let r = record(Some("read"), Some("read"), Some("addr"), Some("Address"), "Billing");
        assert_eq!(
            build_consent_message(&r),
            "Allow read access to my address to billing"
        );
    }

    #[test]
    fn access_type_display_name_is_not_lowercased() {
        let r = record(Some("w"), Some("Write"), None, None, "Marketing");
        assert_eq!(build_consent_message(&r), "Allow Write access to marketing");
    }

    #[test]
    fn missing_access_type_treated_as_default() {
        let r = record(None, None, Some("email"), Some("Email Address"), "Newsletters");
        assert_eq!(
            build_consent_message(&r),
            "Allow access to my email address to newsletters"
        );
    }

    #[test]
    fn display_names_fall_back_to_ids() {
        let r = record(Some("share"), None, Some("Mobile"), None, "Offers");
        assert_eq!(
            build_consent_message(&r),
            "Allow share access to my mobile to offers"
        );
    }

    // -- consent_record_id ----------------------------------------------------

    #[test]
    fn record_id_concatenates_present_parts() {
        let mut r = record(Some("read"), None, Some("addr"), None, "Billing");
        r.attribute_value = Some("home".to_string());
        assert_eq!(consent_record_id(&r), "p1addrreadhome");
    }

    #[test]
    fn record_id_skips_absent_parts() {
        let r = record(Some("default"), None, None, None, "Payments");
        assert_eq!(consent_record_id(&r), "p1default");
    }

    // -- consent_required_items -----------------------------------------------

    #[test]
    fn only_flagged_results_are_kept() {
        let assessment = Assessment {
            status: DecisionStatus::Consent,
            assessment: vec![assessment_record(
                "payments",
                None,
                vec![
                    result(true, Some("iban")),
                    result(false, Some("name")),
                    result(true, Some("email")),
                ],
            )],
            error: None,
        };
        let items = consent_required_items(&assessment);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].attribute_id.as_deref(), Some("iban"));
        assert_eq!(items[0].attribute_value.as_deref(), Some("iban-value"));
        assert_eq!(items[1].attribute_id.as_deref(), Some("email"));
        assert!(items.iter().all(|i| i.access_type_id.as_deref() == Some("read")));
    }

    #[test]
    fn record_level_attribute_takes_precedence() {
        let mut rec = assessment_record("billing", Some("addr"), vec![result(true, Some("other"))]);
        rec.attribute_value = Some("home".to_string());
        let assessment = Assessment {
            status: DecisionStatus::Consent,
            assessment: vec![rec],
            error: None,
        };
        let items = consent_required_items(&assessment);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].attribute_id.as_deref(), Some("addr"));
        assert_eq!(items[0].attribute_value.as_deref(), Some("home"));
    }

    #[test]
    fn empty_record_level_attribute_falls_back() {
        let rec = assessment_record("billing", Some(""), vec![result(true, Some("addr"))]);
        let assessment = Assessment {
            status: DecisionStatus::Consent,
            assessment: vec![rec],
            error: None,
        };
        let items = consent_required_items(&assessment);
        assert_eq!(items[0].attribute_id.as_deref(), Some("addr"));
    }

    #[test]
    fn no_flagged_results_yields_nothing() {
        let assessment = Assessment {
            status: DecisionStatus::Consent,
            assessment: vec![assessment_record("p", None, vec![result(false, Some("a"))])],
            error: None,
        };
        assert!(consent_required_items(&assessment).is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::types::{AssessmentRecord, DecisionStatus, ItemResult};
    use proptest::prelude::*;
    use serde_json::Map;

    fn item_result() -> impl Strategy<Value = ItemResult> {
        (any::<bool>(), proptest::option::of("[a-z]{1,8}")).prop_map(|(requires_consent, attr)| {
            ItemResult {
                requires_consent,
                attribute_value: attr.as_ref().map(|a| format!("{a}!")),
                attribute_id: attr,
                extra: Map::new(),
            }
        })
    }

    fn assessment_record() -> impl Strategy<Value = AssessmentRecord> {
        (
            "[a-z]{1,8}",
            proptest::option::of("[a-z]{0,8}"),
            prop::collection::vec(item_result(), 0..6),
        )
            .prop_map(|(purpose_id, attribute_id, result)| AssessmentRecord {
                purpose_id,
                attribute_id,
                access_type_id: Some("read".to_string()),
                attribute_value: None,
                result,
            })
    }

    proptest! {
        /// Exactly the flagged results survive the filter.
        #[test]
        fn filter_keeps_exactly_flagged_results(
            records in prop::collection::vec(assessment_record(), 0..6)
        ) {
            let expected: usize = records
                .iter()
                .map(|r| r.result.iter().filter(|i| i.requires_consent).count())
                .sum();
            let assessment = Assessment {
                status: DecisionStatus::Consent,
                assessment: records,
                error: None,
            };
            prop_assert_eq!(consent_required_items(&assessment).len(), expected);
        }

        /// Messages always start with "Allow" and end with the lowercased purpose.
        #[test]
        fn message_frames_purpose(
            purpose in "[A-Za-z ]{1,20}",
            access in proptest::option::of("[a-z]{1,8}"),
            attribute in proptest::option::of("[A-Za-z]{1,8}"),
        ) {
            let record = ConsentMetadataRecord {
                purpose_id: "p".to_string(),
                purpose_name: purpose.clone(),
                attribute_id: attribute.clone(),
                attribute_name: attribute,
                access_type_id: access.clone(),
                access_type: access,
                attribute_value: None,
                extra: Map::new(),
            };
            let message = build_consent_message(&record);
            prop_assert!(message.starts_with("Allow "));
            let suffix = format!(" to {}", purpose.to_lowercase());
            prop_assert!(message.ends_with(&suffix));
        }
    }
}
