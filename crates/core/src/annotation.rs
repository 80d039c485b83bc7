//! Annotation records returned by the extraction collaborator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The fixed vocabulary of annotation classes.
///
/// The serialised names are part of the collaborator contract and must not be
/// renamed. Tags outside the vocabulary deserialise to [`AnnotationClass::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationClass {
    PatientName,
    DateOfBirth,
    Gender,
    TestDate,
    LabName,
    ReportNumber,
    Parameter,
    #[serde(other)]
    Unknown,
}

/// A single labelled span extracted from a report.
///
/// `text` is the verbatim source text. `attributes` is only populated for
/// [`AnnotationClass::Parameter`] records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "extraction_class", alias = "class")]
    pub class: AnnotationClass,
    #[serde(rename = "extraction_text", alias = "text", default)]
    pub text: String,
    #[serde(default, deserialize_with = "attributes_or_empty")]
    pub attributes: Map<String, Value>,
}

impl Annotation {
    /// Build an annotation with no attributes.
    pub fn new(class: AnnotationClass, text: impl Into<String>) -> Self {
        Self {
            class,
            text: text.into(),
            attributes: Map::new(),
        }
    }

    /// Build a `parameter` annotation from its source text and attributes.
    pub fn parameter(text: impl Into<String>, attributes: Map<String, Value>) -> Self {
        Self {
            class: AnnotationClass::Parameter,
            text: text.into(),
            attributes,
        }
    }
}

// Models occasionally emit `"attributes": null` for non-parameter records.
fn attributes_or_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialises_collaborator_field_names() {
        let annotation: Annotation = serde_json::from_value(json!({
            "extraction_class": "lab_name",
            "extraction_text": "LabCorp",
            "attributes": {}
        }))
        .expect("valid annotation");

        assert_eq!(annotation, Annotation::new(AnnotationClass::LabName, "LabCorp"));
    }

    #[test]
    fn accepts_short_field_names_and_null_attributes() {
        let annotation: Annotation = serde_json::from_value(json!({
            "class": "gender",
            "text": "Female",
            "attributes": null
        }))
        .expect("valid annotation");

        assert_eq!(annotation.class, AnnotationClass::Gender);
        assert!(annotation.attributes.is_empty());
    }

    #[test]
    fn unknown_classes_do_not_fail_deserialisation() {
        let annotation: Annotation = serde_json::from_value(json!({
            "extraction_class": "physician_name",
            "extraction_text": "Dr. Who"
        }))
        .expect("unknown class should still deserialise");

        assert_eq!(annotation.class, AnnotationClass::Unknown);
    }
}
