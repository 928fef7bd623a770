use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::types::{PatientId, ResourceType};

/// The two fields the scanner needs from a record line.
///
/// Built from an already parsed object with [`ResourceHeader::from_value`];
/// a field that is missing or not a string is left as `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ResourceHeader {
    /// Extract the header fields from an already parsed resource
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            resource_type: value
                .get("resourceType")
                .and_then(Value::as_str)
                .map(ResourceType::new),
            id: value.get("id").and_then(Value::as_str).map(str::to_string),
        }
    }
}

/// One entry of a FHIR `HumanName` list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
}

/// The subset of a FHIR `Patient` resource used for identity resolution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Vec<HumanName>,
}

impl PatientResource {
    /// Family name of the first listed name followed by its first given name.
    ///
    /// Returns `None` when the resource has no names at all.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let first = self.name.first()?;
        let family = first.family.as_deref().unwrap_or_default();
        let given = first.given.first().map(String::as_str).unwrap_or_default();
        Some(format!("{family}{given}"))
    }
}

/// Whether a parsed resource is the patient itself or references the patient.
///
/// A reference matches when a `reference` string anywhere in the document is
/// the bare ID, `Patient/<id>`, `urn:uuid:<id>` or an absolute URL ending in
/// `/Patient/<id>`.
#[must_use]
pub fn references_patient(resource: &Value, id: &PatientId) -> bool {
    let is_self = resource.get("id").and_then(Value::as_str) == Some(id.as_str());
    is_self || contains_reference(resource, id.as_str())
}

fn contains_reference(value: &Value, id: &str) -> bool {
    match value {
        Value::Object(map) => map.iter().any(|(key, child)| {
            if key == "reference" {
                if let Some(target) = child.as_str() {
                    if reference_targets(target, id) {
                        return true;
                    }
                }
            }
            contains_reference(child, id)
        }),
        Value::Array(items) => items.iter().any(|item| contains_reference(item, id)),
        _ => false,
    }
}

fn reference_targets(reference: &str, id: &str) -> bool {
    if reference == id {
        return true;
    }
    if let Some(rest) = reference.strip_prefix("urn:uuid:") {
        return rest == id;
    }
    reference
        .strip_suffix(id)
        .is_some_and(|prefix| prefix == "Patient/" || prefix.ends_with("/Patient/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_name_concatenates_family_and_given() {
        let patient: PatientResource = serde_json::from_value(json!({
            "id": "abc123",
            "name": [{"family": "Lynch190", "given": ["Rosamond509", "Ada"]}]
        }))
        .unwrap();
        assert_eq!(patient.display_name().as_deref(), Some("Lynch190Rosamond509"));
    }

    #[test]
    fn test_display_name_uses_first_name_entry() {
        let patient: PatientResource = serde_json::from_value(json!({
            "name": [
                {"use": "official", "family": "Lynch190", "given": ["Rosamond509"]},
                {"use": "maiden", "family": "Kub800", "given": ["Rosamond509"]}
            ]
        }))
        .unwrap();
        assert_eq!(patient.display_name().as_deref(), Some("Lynch190Rosamond509"));
    }

    #[test]
    fn test_display_name_missing_parts() {
        let patient: PatientResource =
            serde_json::from_value(json!({"name": [{"family": "Lynch190"}]})).unwrap();
        assert_eq!(patient.display_name().as_deref(), Some("Lynch190"));

        let patient: PatientResource = serde_json::from_value(json!({"id": "x"})).unwrap();
        assert!(patient.display_name().is_none());
    }

    #[test]
    fn test_header_from_value() {
        let value = json!({"resourceType": "Encounter", "id": "e1", "status": "finished"});
        let header = ResourceHeader::from_value(&value);
        assert_eq!(header.resource_type, Some(ResourceType::new("Encounter")));
        assert_eq!(header.id.as_deref(), Some("e1"));
    }

    #[test]
    fn test_references_patient_forms() {
        let id = PatientId::new("abc123");
        for reference in [
            "abc123",
            "Patient/abc123",
            "urn:uuid:abc123",
            "https://fhir.example.org/r4/Patient/abc123",
        ] {
            let value = json!({"resourceType": "Observation", "subject": {"reference": reference}});
            assert!(references_patient(&value, &id), "{reference} should match");
        }
    }

    #[test]
    fn test_references_patient_nested_in_arrays() {
        let id = PatientId::new("abc123");
        let value = json!({
            "resourceType": "CareTeam",
            "participant": [
                {"member": {"reference": "Practitioner/p1"}},
                {"member": {"reference": "urn:uuid:abc123"}}
            ]
        });
        assert!(references_patient(&value, &id));
    }

    #[test]
    fn test_references_patient_rejects_textual_mentions() {
        let id = PatientId::new("abc123");
        let value = json!({
            "resourceType": "DocumentReference",
            "description": "copied from abc123",
            "subject": {"reference": "Patient/abc1234"},
            "author": [{"reference": "Practitioner/abc123"}]
        });
        assert!(!references_patient(&value, &id));
    }

    #[test]
    fn test_references_patient_self() {
        let id = PatientId::new("abc123");
        let value = json!({"resourceType": "Patient", "id": "abc123"});
        assert!(references_patient(&value, &id));
    }
}
