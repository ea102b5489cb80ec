//! Attribute mapping
//!
//! Turns one provider response into the attribute writes for one subject.
//! Exactly one of three shapes comes out of every attempt: rule-mapped
//! attributes for a clean response, the fixed error-attribute set when the
//! response embeds provider errors, or the same error shape built from a
//! transport failure.

pub mod catalog;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::core::config::MappingRule;
use crate::core::constants::{
    ATTR_ERROR_DETAILS, ATTR_LAST_ENRICHED_AT, ATTR_SUCCESS, ATTRIBUTE_GROUP,
};
use crate::data::provider::{
    ProviderFailure, ProviderResult, embedded_errors, format_error_details,
};
use crate::domain::expr::Expression;
use crate::utils::time::now_iso;

// =============================================================================
// Attribute Types
// =============================================================================

/// How the platform applies an attribute write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WritePolicy {
    /// Write unconditionally
    Set,
    /// Write only when the subject has no value for the attribute yet
    SetIfAbsent,
}

/// A single attribute write
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub value: Value,
    pub policy: WritePolicy,
}

/// Attribute writes produced by one enrichment attempt, keyed by attribute
/// name. Write-only: built, emitted, discarded. Inserting an existing key
/// overwrites it, which gives later mapping rules precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AttributeSet(BTreeMap<String, Attribute>);

impl AttributeSet {
    pub fn insert(&mut self, key: impl Into<String>, value: Value, policy: WritePolicy) {
        self.0.insert(key.into(), Attribute { value, policy });
    }

    pub fn get(&self, key: &str) -> Option<&Attribute> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Attribute)> {
        self.0.iter()
    }
}

// =============================================================================
// Mapping
// =============================================================================

/// Map one provider call outcome to attribute writes
pub fn map_response(result: &ProviderResult, rules: &[MappingRule]) -> AttributeSet {
    match result {
        ProviderResult::Success { document } => {
            let errors = embedded_errors(document);
            if errors.is_empty() {
                map_success(document, rules)
            } else {
                error_attributes(format_error_details(&errors))
            }
        }
        ProviderResult::Failure(failure) => map_failure(failure),
    }
}

/// Apply tenant mapping rules to a clean response document.
///
/// Empty-string and missing results both coerce to null. A null result for
/// a rule with `overwrite == false` emits nothing at all: absence must not
/// clobber a value written earlier.
pub fn map_success(document: &Value, rules: &[MappingRule]) -> AttributeSet {
    let mut attributes = AttributeSet::default();
    for rule in rules {
        if rule.source_expression.trim().is_empty() || rule.target_attribute.trim().is_empty() {
            continue;
        }
        let expression = match Expression::parse(&rule.source_expression) {
            Ok(expression) => expression,
            Err(e) => {
                tracing::warn!(
                    source = %rule.source_expression,
                    target = %rule.target_attribute,
                    error = %e,
                    "Skipping mapping rule with invalid expression"
                );
                continue;
            }
        };
        let value = match expression.evaluate(document) {
            Some(Value::String(s)) if s.is_empty() => Value::Null,
            Some(value) => value,
            None => Value::Null,
        };
        if value.is_null() && !rule.overwrite {
            continue;
        }
        let policy = if rule.overwrite {
            WritePolicy::Set
        } else {
            WritePolicy::SetIfAbsent
        };
        attributes.insert(rule.target_attribute.clone(), value, policy);
    }
    attributes
}

/// Error attributes for a failed provider call
pub fn map_failure(failure: &ProviderFailure) -> AttributeSet {
    error_attributes(failure.message.clone())
}

fn error_attributes(details: String) -> AttributeSet {
    let mut attributes = AttributeSet::default();
    attributes.insert(
        group_key(ATTR_ERROR_DETAILS),
        Value::String(details),
        WritePolicy::Set,
    );
    attributes.insert(group_key(ATTR_SUCCESS), Value::Bool(false), WritePolicy::Set);
    attributes.insert(
        group_key(ATTR_LAST_ENRICHED_AT),
        Value::String(now_iso()),
        WritePolicy::Set,
    );
    attributes
}

fn group_key(name: &str) -> String {
    format!("{ATTRIBUTE_GROUP}/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn city_doc() -> Value {
        json!({
            "Results": [{
                "Result": { "Spend": 1200, "Paths": [] },
                "Meta": { "City": "Austin", "State": "TX", "Vertical": "" }
            }],
            "Errors": []
        })
    }

    fn assert_error_shape(attributes: &AttributeSet, details: &str) {
        assert_eq!(attributes.len(), 3);
        assert_eq!(
            attributes.get("techlens/error_details").map(|a| &a.value),
            Some(&json!(details))
        );
        assert_eq!(
            attributes.get("techlens/success").map(|a| &a.value),
            Some(&json!(false))
        );
        let enriched_at = attributes
            .get("techlens/last_enriched_at")
            .map(|a| a.value.clone())
            .unwrap();
        let enriched_at = enriched_at.as_str().unwrap();
        assert_eq!(enriched_at.len(), 24);
        assert!(enriched_at.ends_with('Z'));
    }

    #[test]
    fn test_rule_with_overwrite_emits_set() {
        let rules = vec![MappingRule::new(
            "Results[0].Meta.City",
            "techlens/city",
            true,
        )];
        let attributes = map_success(&city_doc(), &rules);
        assert_eq!(
            attributes.get("techlens/city"),
            Some(&Attribute {
                value: json!("Austin"),
                policy: WritePolicy::Set,
            })
        );
    }

    #[test]
    fn test_rule_without_overwrite_emits_set_if_absent() {
        let rules = vec![MappingRule::new(
            "Results[0].Meta.State",
            "techlens/state",
            false,
        )];
        let attributes = map_success(&city_doc(), &rules);
        assert_eq!(
            attributes.get("techlens/state").map(|a| a.policy),
            Some(WritePolicy::SetIfAbsent)
        );
    }

    #[test]
    fn test_policies_serialize_camel_case() {
        let mut attributes = AttributeSet::default();
        attributes.insert("a", json!(1), WritePolicy::Set);
        attributes.insert("b", json!(2), WritePolicy::SetIfAbsent);
        assert_eq!(
            serde_json::to_value(&attributes).unwrap(),
            json!({
                "a": { "value": 1, "policy": "set" },
                "b": { "value": 2, "policy": "setIfAbsent" }
            })
        );
    }

    #[test]
    fn test_empty_string_result_coerces_to_null() {
        let rules = vec![MappingRule::new(
            "Results[0].Meta.Vertical",
            "techlens/vertical",
            true,
        )];
        let attributes = map_success(&city_doc(), &rules);
        assert_eq!(
            attributes.get("techlens/vertical").map(|a| &a.value),
            Some(&Value::Null)
        );
    }

    #[test]
    fn test_missing_path_with_overwrite_writes_null() {
        let rules = vec![MappingRule::new(
            "Results[0].Meta.Twitter",
            "techlens/twitter",
            true,
        )];
        let attributes = map_success(&city_doc(), &rules);
        assert_eq!(
            attributes.get("techlens/twitter").map(|a| &a.value),
            Some(&Value::Null)
        );
    }

    #[test]
    fn test_null_without_overwrite_emits_nothing() {
        let rules = vec![
            MappingRule::new("Results[0].Meta.Twitter", "techlens/twitter", false),
            MappingRule::new("Results[0].Meta.Vertical", "techlens/vertical", false),
        ];
        let attributes = map_success(&city_doc(), &rules);
        assert!(attributes.is_empty());
    }

    #[test]
    fn test_blank_rules_skipped() {
        let rules = vec![
            MappingRule::new("", "techlens/city", true),
            MappingRule::new("Results[0].Meta.City", "  ", true),
        ];
        assert!(map_success(&city_doc(), &rules).is_empty());
    }

    #[test]
    fn test_unparseable_expression_skips_rule_only() {
        let rules = vec![
            MappingRule::new("Results[0]..Meta", "techlens/broken", true),
            MappingRule::new("Results[0].Meta.City", "techlens/city", true),
        ];
        let attributes = map_success(&city_doc(), &rules);
        assert_eq!(attributes.len(), 1);
        assert!(attributes.get("techlens/city").is_some());
    }

    #[test]
    fn test_last_rule_wins_per_target() {
        let rules = vec![
            MappingRule::new("Results[0].Meta.City", "techlens/place", true),
            MappingRule::new("Results[0].Meta.State", "techlens/place", true),
        ];
        let attributes = map_success(&city_doc(), &rules);
        assert_eq!(
            attributes.get("techlens/place").map(|a| &a.value),
            Some(&json!("TX"))
        );
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let rules = vec![
            MappingRule::new("Results[0].Meta.City", "techlens/city", true),
            MappingRule::new("Results[0].Result.Spend", "techlens/spend", false),
        ];
        assert_eq!(
            map_success(&city_doc(), &rules),
            map_success(&city_doc(), &rules)
        );
    }

    #[test]
    fn test_embedded_errors_bypass_rules() {
        let document = json!({
            "Results": [{ "Meta": { "City": "Austin" } }],
            "Errors": [{ "Message": "bad domain", "Code": 1 }]
        });
        let rules = vec![MappingRule::new(
            "Results[0].Meta.City",
            "techlens/city",
            true,
        )];
        let attributes = map_response(
            &ProviderResult::Success { document },
            &rules,
        );
        assert_error_shape(&attributes, "bad domain (Code: 1)");
        assert!(attributes.get("techlens/city").is_none());
    }

    #[test]
    fn test_multiple_embedded_errors_joined() {
        let document = json!({
            "Results": [],
            "Errors": [
                { "Message": "bad domain", "Code": 1 },
                { "Message": "quota exceeded", "Code": 7 }
            ]
        });
        let attributes = map_response(&ProviderResult::Success { document }, &[]);
        assert_error_shape(&attributes, "bad domain (Code: 1). quota exceeded (Code: 7)");
    }

    #[test]
    fn test_transport_failure_shape() {
        let failure = ProviderFailure {
            message: "connection refused".to_string(),
            detail: Value::Null,
        };
        assert_error_shape(&map_failure(&failure), "connection refused");
    }

    #[test]
    fn test_clean_response_has_no_error_keys() {
        let rules = vec![MappingRule::new(
            "Results[0].Meta.City",
            "techlens/city",
            true,
        )];
        let attributes = map_response(
            &ProviderResult::Success {
                document: city_doc(),
            },
            &rules,
        );
        assert!(attributes.get("techlens/error_details").is_none());
        assert!(attributes.get("techlens/success").is_none());
        assert!(attributes.get("techlens/last_enriched_at").is_none());
    }
}
